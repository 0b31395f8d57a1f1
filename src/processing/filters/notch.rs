// src/processing/filters/notch.rs
//! Notch filter for mains hum and other narrowband interference

use super::{Biquad, BiquadCascade, BiquadCoefficients, Filter};
use crate::config::constants::notch::PRIME_TIME_CONSTANTS;
use crate::config::processing_config::NotchConfig;
use crate::error::{ProcessingStage, RestoreError, Result};
use crate::signal::SignalBuffer;
use std::f64::consts::PI;
use tracing::debug;

/// Second-order band-reject filter at a target frequency, optionally with harmonics
///
/// Each section rejects a band of `f0 / Q` Hz (-3 dB width) centred on its
/// frequency and passes everything else with near-unity gain.
#[derive(Debug, Clone)]
pub struct NotchFilter {
    cascade: BiquadCascade,
    target_freq_hz: f32,
    quality_factor: f32,
    sample_rate: u32,
    prime_state: bool,
}

impl NotchFilter {
    /// Single notch at `target_freq_hz`
    pub fn new(target_freq_hz: f32, quality_factor: f32, sample_rate: u32) -> Result<Self> {
        Self::with_harmonics(target_freq_hz, quality_factor, sample_rate, 1)
    }

    /// Notches at `k * target_freq_hz` for `k = 1..=harmonics`, skipping those at or above Nyquist
    pub fn with_harmonics(
        target_freq_hz: f32,
        quality_factor: f32,
        sample_rate: u32,
        harmonics: u32,
    ) -> Result<Self> {
        let nyquist = sample_rate as f32 / 2.0;
        if sample_rate == 0 {
            return Err(invalid("sample_rate", "must be greater than zero".to_string()));
        }
        if !(target_freq_hz.is_finite() && target_freq_hz > 0.0) {
            return Err(invalid("target_freq_hz", format!(
                "must be a positive frequency, got {}", target_freq_hz
            )));
        }
        if target_freq_hz >= nyquist {
            return Err(invalid("target_freq_hz", format!(
                "{} Hz is not below the Nyquist frequency ({} Hz)", target_freq_hz, nyquist
            )));
        }
        if !(quality_factor.is_finite() && quality_factor > 0.0) {
            return Err(invalid("quality_factor", format!(
                "must be positive, got {}", quality_factor
            )));
        }
        if harmonics == 0 {
            return Err(invalid("harmonics", "must be at least 1".to_string()));
        }

        let sections = (1..=harmonics)
            .map(|k| target_freq_hz as f64 * k as f64)
            .take_while(|&freq| freq < nyquist as f64)
            .map(|freq| Biquad::new(design_notch(freq, quality_factor as f64, sample_rate as f64)))
            .collect();

        Ok(Self {
            cascade: BiquadCascade::new(sections),
            target_freq_hz,
            quality_factor,
            sample_rate,
            prime_state: true,
        })
    }

    /// Build the filter described by `config` for a given sample rate
    pub fn from_config(config: &NotchConfig, sample_rate: u32) -> Result<Self> {
        Ok(Self::with_harmonics(
            config.target_freq_hz,
            config.quality_factor,
            sample_rate,
            config.harmonics,
        )?
        .with_prime_state(config.prime_state))
    }

    /// Enable or disable priming the state on a reflected pre-roll
    pub fn with_prime_state(mut self, prime_state: bool) -> Self {
        self.prime_state = prime_state;
        self
    }

    /// Fundamental being rejected, in Hz
    pub fn target_freq_hz(&self) -> f32 {
        self.target_freq_hz
    }

    /// Q shared by every section
    pub fn quality_factor(&self) -> f32 {
        self.quality_factor
    }

    /// Rate the coefficients were designed for
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of notch sections, one per harmonic below Nyquist
    pub fn section_count(&self) -> usize {
        self.cascade.len()
    }

    /// Combined response magnitude at `freq_hz`
    pub fn magnitude_at(&self, freq_hz: f32) -> f64 {
        self.cascade.magnitude_at(freq_hz as f64, self.sample_rate as f64)
    }

    /// Settling time constant of the narrowest section, in samples
    ///
    /// The pole radius of a notch is about `1 - π·BW/fs`, so the envelope of
    /// its transient decays as `exp(-n·π·f0 / (Q·fs))`.
    pub fn time_constant_samples(&self) -> f64 {
        self.sample_rate as f64 * self.quality_factor as f64 / (PI * self.target_freq_hz as f64)
    }

    /// Filter a whole buffer in a single causal forward pass
    ///
    /// With priming enabled the state is first settled on an odd reflection of
    /// the buffer's head (`2·x[0] - x[k]`), whose output is discarded. For a
    /// tone that was already playing before the recording started this is its
    /// true past, so the onset transient never reaches the output.
    pub fn apply(&self, signal: &SignalBuffer) -> Result<SignalBuffer> {
        if signal.is_empty() {
            return Err(RestoreError::EmptyInput {
                stage: ProcessingStage::NotchFilter,
            });
        }
        if signal.sample_rate() != self.sample_rate {
            return Err(invalid("sample_rate", format!(
                "filter designed for {} Hz, signal is {} Hz", self.sample_rate, signal.sample_rate()
            )));
        }

        let samples = signal.samples();
        let mut cascade = self.cascade.clone();

        if self.prime_state {
            let pre_roll = ((PRIME_TIME_CONSTANTS * self.time_constant_samples()).ceil() as usize)
                .min(samples.len() - 1);
            let head = samples[0] as f64;
            for k in (1..=pre_roll).rev() {
                cascade.process_sample(2.0 * head - samples[k] as f64);
            }
            debug!(pre_roll, "notch state primed");
        }

        let filtered = cascade.process_block(samples);
        debug!(
            target_hz = self.target_freq_hz,
            q = self.quality_factor,
            sections = self.cascade.len(),
            "notch filter applied"
        );
        Ok(signal.with_samples(filtered))
    }
}

/// `apply` with a freshly designed single notch
pub fn apply_notch(signal: &SignalBuffer, target_freq_hz: f32, quality_factor: f32) -> Result<SignalBuffer> {
    NotchFilter::new(target_freq_hz, quality_factor, signal.sample_rate())?.apply(signal)
}

/// Notch biquad whose -3 dB bandwidth is `freq / q`
fn design_notch(freq: f64, q: f64, sample_rate: f64) -> BiquadCoefficients {
    let w0 = 2.0 * PI * freq / sample_rate;
    let bandwidth = w0 / q;
    let beta = (bandwidth / 2.0).tan();
    let gain = 1.0 / (1.0 + beta);
    let cos_w0 = w0.cos();

    BiquadCoefficients {
        b: [gain, -2.0 * gain * cos_w0, gain],
        a: [1.0, -2.0 * gain * cos_w0, 2.0 * gain - 1.0],
    }
}

fn invalid(parameter: &str, reason: String) -> RestoreError {
    RestoreError::invalid_parameter(ProcessingStage::NotchFilter, parameter, reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_frequency_at_or_above_nyquist() {
        assert!(NotchFilter::new(4000.0, 30.0, 8000).is_err());
        assert!(NotchFilter::new(5000.0, 30.0, 8000).is_err());
        assert!(NotchFilter::new(3999.0, 30.0, 8000).is_ok());
    }

    #[test]
    fn test_rejects_bad_quality_and_frequency() {
        assert!(NotchFilter::new(60.0, 0.0, 8000).is_err());
        assert!(NotchFilter::new(60.0, -1.0, 8000).is_err());
        assert!(NotchFilter::new(0.0, 30.0, 8000).is_err());
        assert!(NotchFilter::new(f32::NAN, 30.0, 8000).is_err());
    }

    #[test]
    fn test_empty_input_fails() {
        let filter = NotchFilter::new(60.0, 30.0, 8000).unwrap();
        let empty = SignalBuffer::new(Vec::new(), 8000).unwrap();
        assert!(matches!(
            filter.apply(&empty),
            Err(RestoreError::EmptyInput { stage: ProcessingStage::NotchFilter })
        ));
    }

    #[test]
    fn test_response_shape() {
        let filter = NotchFilter::new(60.0, 30.0, 44100).unwrap();
        assert!(filter.magnitude_at(60.0) < 1e-6);
        // -3 dB points sit half a bandwidth either side of the centre
        let edge = filter.magnitude_at(61.0);
        assert!((edge - std::f64::consts::FRAC_1_SQRT_2).abs() < 0.02);
        assert!(filter.magnitude_at(120.0) > 0.99);
        assert!(filter.magnitude_at(1000.0) > 0.999);
    }

    #[test]
    fn test_harmonics_stop_at_nyquist() {
        let filter = NotchFilter::with_harmonics(50.0, 30.0, 400, 10).unwrap();
        // 50, 100, 150 Hz are below 200 Hz Nyquist; 200 Hz is not
        assert_eq!(filter.section_count(), 3);
        assert!(filter.magnitude_at(150.0) < 1e-6);
    }

    #[test]
    fn test_sample_rate_mismatch_is_rejected() {
        let filter = NotchFilter::new(60.0, 30.0, 8000).unwrap();
        let signal = SignalBuffer::silence(100, 16000).unwrap();
        assert!(filter.apply(&signal).is_err());
    }

    #[test]
    fn test_single_sample_input() {
        let filter = NotchFilter::new(60.0, 30.0, 8000).unwrap();
        let signal = SignalBuffer::new(vec![0.5], 8000).unwrap();
        let out = filter.apply(&signal).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out.samples()[0].is_finite());
    }
}
