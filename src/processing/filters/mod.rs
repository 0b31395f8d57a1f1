// src/processing/filters/mod.rs
//! Digital filters applied ahead of spectral denoising

pub mod iir;
pub mod notch;

pub use iir::*;
pub use notch::*;

use std::f64::consts::PI;

/// Sample-by-sample filter with resettable state
pub trait Filter {
    /// Filter one sample, advancing the state
    fn process_sample(&mut self, input: f64) -> f64;
    /// Clear the state as if no sample had been seen
    fn reset(&mut self);

    /// Run a whole block through the filter, continuing from the current state
    fn process_block(&mut self, input: &[f32]) -> Vec<f32> {
        input
            .iter()
            .map(|&x| self.process_sample(x as f64) as f32)
            .collect()
    }
}

/// Normalized second-order section coefficients (`a[0] == 1`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Numerator coefficients
    pub b: [f64; 3],
    /// Denominator coefficients
    pub a: [f64; 3],
}

impl BiquadCoefficients {
    /// Magnitude of the frequency response at `freq_hz`
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        let w = 2.0 * PI * freq_hz / sample_rate;
        let (c1, s1) = (w.cos(), -w.sin());
        let (c2, s2) = ((2.0 * w).cos(), -(2.0 * w).sin());

        let num_re = self.b[0] + self.b[1] * c1 + self.b[2] * c2;
        let num_im = self.b[1] * s1 + self.b[2] * s2;
        let den_re = self.a[0] + self.a[1] * c1 + self.a[2] * c2;
        let den_im = self.a[1] * s1 + self.a[2] * s2;

        (num_re.hypot(num_im)) / (den_re.hypot(den_im))
    }
}
