// src/signal/mod.rs
//! Mono sample buffers shared by every pipeline stage

pub mod synth;

use crate::error::{ProcessingStage, RestoreError, Result};
use serde::{Deserialize, Serialize};

/// Immutable mono sample sequence with its sample rate
///
/// Stages never mutate a buffer in place; every transformation builds a new
/// buffer that keeps the original sample rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SignalBuffer {
    /// Wrap decoded samples, rejecting a zero sample rate
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(RestoreError::invalid_parameter(
                ProcessingStage::Decode,
                "sample_rate",
                "must be greater than zero",
            ));
        }
        Ok(Self { samples, sample_rate })
    }

    /// Buffer of `len` zeros
    pub fn silence(len: usize, sample_rate: u32) -> Result<Self> {
        Self::new(vec![0.0; len], sample_rate)
    }

    /// New buffer with the same sample rate
    pub fn with_samples(&self, samples: Vec<f32>) -> Self {
        Self {
            samples,
            sample_rate: self.sample_rate,
        }
    }

    /// Mono samples, nominally in [-1, 1]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Samples per second
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Length in samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True for a zero-length recording
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Consume the buffer and hand back its samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute amplitude, 0 for an empty buffer
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
    }

    /// Mean of the squared samples, 0 for an empty buffer
    pub fn mean_power(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let energy: f64 = self.samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
        energy / self.samples.len() as f64
    }

    /// Root mean square amplitude
    pub fn rms(&self) -> f32 {
        self.mean_power().sqrt() as f32
    }

    /// Copy of `samples[start..end]`, both bounds clamped to the buffer
    pub fn slice_samples(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.samples.len());
        let start = start.min(end);
        self.with_samples(self.samples[start..end].to_vec())
    }

    /// Elementwise `self - other`
    ///
    /// Used to form the noise residual `original - cleaned`. Lengths must match.
    pub fn difference(&self, other: &SignalBuffer) -> Result<Self> {
        if self.len() != other.len() {
            return Err(RestoreError::LengthMismatch {
                stage: ProcessingStage::SnrEvaluation,
                expected: self.len(),
                actual: other.len(),
            });
        }
        let samples = self
            .samples
            .iter()
            .zip(other.samples.iter())
            .map(|(&a, &b)| a - b)
            .collect();
        Ok(self.with_samples(samples))
    }

    /// Every sample multiplied by `factor`
    pub fn scaled(&self, factor: f32) -> Self {
        self.with_samples(self.samples.iter().map(|&s| s * factor).collect())
    }

    /// Convert a duration in seconds to a sample count, rounding down
    pub fn seconds_to_samples(&self, seconds: f64) -> usize {
        if !seconds.is_finite() || seconds <= 0.0 {
            return 0;
        }
        (seconds * self.sample_rate as f64).floor() as usize
    }
}
