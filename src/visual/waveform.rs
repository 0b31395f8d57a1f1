// src/visual/waveform.rs
//! Amplitude-over-time series

use crate::signal::SignalBuffer;
use serde::Serialize;

/// Sample amplitudes against time in seconds
#[derive(Debug, Clone, Serialize)]
pub struct Waveform {
    /// Panel title
    pub title: String,
    /// Rate of the source buffer
    pub sample_rate: u32,
    /// One timestamp per sample
    pub times_s: Vec<f64>,
    /// Raw sample values
    pub amplitudes: Vec<f32>,
}

/// Min/max envelope of a waveform reduced to a fixed number of buckets
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveformEnvelope {
    /// Panel title
    pub title: String,
    /// Time of each bucket's first sample
    pub bucket_start_s: Vec<f64>,
    /// Lowest sample per bucket
    pub min: Vec<f32>,
    /// Highest sample per bucket
    pub max: Vec<f32>,
}

impl Waveform {
    /// One point per sample, times spread evenly over `[0, duration]`
    ///
    /// Both ends are included, so the last sample sits exactly at the
    /// buffer's duration.
    pub fn from_signal(signal: &SignalBuffer, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sample_rate: signal.sample_rate(),
            times_s: linspace(0.0, signal.duration_secs(), signal.len()),
            amplitudes: signal.samples().to_vec(),
        }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// True for an empty source buffer
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Reduce to at most `buckets` min/max pairs for plotting long recordings
    pub fn envelope(&self, buckets: usize) -> WaveformEnvelope {
        let buckets = buckets.max(1).min(self.len().max(1));
        let per_bucket = self.len().div_ceil(buckets).max(1);

        let mut envelope = WaveformEnvelope {
            title: self.title.clone(),
            bucket_start_s: Vec::with_capacity(buckets),
            min: Vec::with_capacity(buckets),
            max: Vec::with_capacity(buckets),
        };
        for (i, chunk) in self.amplitudes.chunks(per_bucket).enumerate() {
            let (lo, hi) = chunk
                .iter()
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));
            envelope.bucket_start_s.push((i * per_bucket) as f64 / self.sample_rate as f64);
            envelope.min.push(lo);
            envelope.max.push(hi);
        }
        envelope
    }
}

fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            (0..num).map(|i| start + step * i as f64).collect()
        }
    }
}
