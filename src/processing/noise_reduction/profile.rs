// src/processing/noise_reduction/profile.rs
//! Noise reference selection

use crate::config::constants::profile::DEFAULT_DURATION_SECS;
use crate::config::processing_config::ProfileStrategy;
use crate::error::{ProcessingStage, RestoreError, Result};
use crate::processing::windowing::sliding_windows;
use crate::signal::SignalBuffer;
use tracing::debug;

/// Segment of a recording taken to represent its background noise
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseProfile {
    segment: SignalBuffer,
    offset: usize,
}

impl NoiseProfile {
    /// Wrap a noise-only segment supplied directly by the caller
    pub fn from_segment(segment: SignalBuffer) -> Self {
        Self { segment, offset: 0 }
    }

    /// Profile samples
    pub fn samples(&self) -> &[f32] {
        self.segment.samples()
    }

    /// Profile as a buffer carrying the source sample rate
    pub fn segment(&self) -> &SignalBuffer {
        &self.segment
    }

    /// Index of the first profile sample within the source signal
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length in samples
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// An empty profile turns spectral subtraction into the identity
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }
}

/// Strategy that picks the noise reference out of a recording
pub trait ProfileSelector {
    /// Choose the profile, failing only on invalid parameters
    fn select(&self, signal: &SignalBuffer) -> Result<NoiseProfile>;
}

/// The first `duration_s` seconds, clamped to the signal length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadingSegment {
    /// Segment length in seconds
    pub duration_s: f64,
}

/// Explicit `[start_s, end_s)` region chosen by the caller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplicitRange {
    /// Start in seconds
    pub start_s: f64,
    /// End in seconds, not before `start_s`
    pub end_s: f64,
}

/// The `duration_s` long window with the lowest RMS energy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuietestWindow {
    /// Window length in seconds
    pub duration_s: f64,
}

impl Default for LeadingSegment {
    fn default() -> Self {
        Self {
            duration_s: DEFAULT_DURATION_SECS,
        }
    }
}

impl ProfileSelector for LeadingSegment {
    fn select(&self, signal: &SignalBuffer) -> Result<NoiseProfile> {
        check_seconds("duration_s", self.duration_s)?;
        let len = signal.seconds_to_samples(self.duration_s).min(signal.len());
        Ok(NoiseProfile {
            segment: signal.slice_samples(0, len),
            offset: 0,
        })
    }
}

impl ProfileSelector for ExplicitRange {
    fn select(&self, signal: &SignalBuffer) -> Result<NoiseProfile> {
        check_seconds("start_s", self.start_s)?;
        check_seconds("end_s", self.end_s)?;
        if self.end_s < self.start_s {
            return Err(RestoreError::invalid_parameter(
                ProcessingStage::NoiseProfile,
                "end_s",
                format!("must not precede start_s ({} < {})", self.end_s, self.start_s),
            ));
        }
        let start = signal.seconds_to_samples(self.start_s).min(signal.len());
        let end = signal.seconds_to_samples(self.end_s).min(signal.len());
        Ok(NoiseProfile {
            segment: signal.slice_samples(start, end),
            offset: start,
        })
    }
}

impl ProfileSelector for QuietestWindow {
    fn select(&self, signal: &SignalBuffer) -> Result<NoiseProfile> {
        check_seconds("duration_s", self.duration_s)?;
        let window = signal.seconds_to_samples(self.duration_s).min(signal.len());
        if window == 0 {
            return Ok(NoiseProfile {
                segment: signal.slice_samples(0, 0),
                offset: 0,
            });
        }

        // quarter-window hops keep the scan cheap on long recordings
        let hop = (window / 4).max(1);
        let quietest = sliding_windows(signal.samples(), window, hop)
            .into_iter()
            .min_by(|a, b| a.rms_amplitude.total_cmp(&b.rms_amplitude))
            .map(|w| w.start)
            .unwrap_or(0);

        Ok(NoiseProfile {
            segment: signal.slice_samples(quietest, quietest + window),
            offset: quietest,
        })
    }
}

impl ProfileSelector for ProfileStrategy {
    fn select(&self, signal: &SignalBuffer) -> Result<NoiseProfile> {
        let profile = match *self {
            ProfileStrategy::Leading { duration_s } => LeadingSegment { duration_s }.select(signal),
            ProfileStrategy::Range { start_s, end_s } => ExplicitRange { start_s, end_s }.select(signal),
            ProfileStrategy::QuietestWindow { duration_s } => QuietestWindow { duration_s }.select(signal),
        }?;
        debug!(
            strategy = ?self,
            offset = profile.offset(),
            samples = profile.len(),
            "noise profile selected"
        );
        Ok(profile)
    }
}

/// Leading `duration_seconds` of `signal`, the whole signal if it is shorter
pub fn extract_noise_profile(signal: &SignalBuffer, duration_seconds: f64) -> Result<NoiseProfile> {
    LeadingSegment {
        duration_s: duration_seconds,
    }
    .select(signal)
}

fn check_seconds(parameter: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RestoreError::invalid_parameter(
            ProcessingStage::NoiseProfile,
            parameter,
            format!("must be a non-negative number of seconds, got {}", value),
        ))
    }
}
