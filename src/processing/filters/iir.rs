// src/processing/filters/iir.rs
//! IIR (Infinite Impulse Response) second-order sections

use super::{BiquadCoefficients, Filter};

/// Single biquad in Direct Form I
///
/// Coefficients and state are kept in f64: notch poles sit within a fraction
/// of a percent of the unit circle at audio rates and f32 shifts the zeros
/// noticeably off the target frequency.
#[derive(Debug, Clone)]
pub struct Biquad {
    coefficients: BiquadCoefficients,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    /// Section with zeroed state
    pub fn new(coefficients: BiquadCoefficients) -> Self {
        Self {
            coefficients,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }
}

impl Filter for Biquad {
    fn process_sample(&mut self, input: f64) -> f64 {
        let c = &self.coefficients;
        let output = c.b[0] * input + c.b[1] * self.x1 + c.b[2] * self.x2
            - c.a[1] * self.y1
            - c.a[2] * self.y2;

        // Update delay line
        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// Cascade of biquads applied in order
#[derive(Debug, Clone, Default)]
pub struct BiquadCascade {
    sections: Vec<Biquad>,
}

impl BiquadCascade {
    /// Cascade running `sections` first to last
    pub fn new(sections: Vec<Biquad>) -> Self {
        Self { sections }
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True when the cascade passes input through unchanged
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Combined response magnitude of all sections at `freq_hz`
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate: f64) -> f64 {
        self.sections
            .iter()
            .map(|s| s.coefficients.magnitude_at(freq_hz, sample_rate))
            .product()
    }
}

impl Filter for BiquadCascade {
    fn process_sample(&mut self, input: f64) -> f64 {
        self.sections
            .iter_mut()
            .fold(input, |acc, section| section.process_sample(acc))
    }

    fn reset(&mut self) {
        for section in &mut self.sections {
            section.reset();
        }
    }
}
