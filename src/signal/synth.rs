//! Synthetic test signals: tones, seeded noise and impulses
//!
//! Used by the integration tests and benchmarks to build recordings with a
//! known clean component.

use super::SignalBuffer;
use crate::error::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

/// Pure sinusoid of `amplitude` at `frequency_hz`
pub fn sine(frequency_hz: f32, amplitude: f32, duration_secs: f32, sample_rate: u32) -> Result<SignalBuffer> {
    let len = (duration_secs * sample_rate as f32) as usize;
    let step = 2.0 * std::f64::consts::PI * frequency_hz as f64 / sample_rate as f64;
    let samples = (0..len)
        .map(|n| amplitude * (step * n as f64).sin() as f32)
        .collect();
    SignalBuffer::new(samples, sample_rate)
}

/// Gaussian white noise with standard deviation `std_dev`, reproducible by `seed`
pub fn white_noise(std_dev: f32, len: usize, sample_rate: u32, seed: u64) -> Result<SignalBuffer> {
    let mut rng = StdRng::seed_from_u64(seed);
    let samples = (0..len).map(|_| std_dev * gaussian(&mut rng)).collect();
    SignalBuffer::new(samples, sample_rate)
}

/// Silence of `len` samples with a single impulse at `position`
pub fn impulse(len: usize, position: usize, amplitude: f32, sample_rate: u32) -> Result<SignalBuffer> {
    let mut samples = vec![0.0; len];
    if let Some(slot) = samples.get_mut(position) {
        *slot = amplitude;
    }
    SignalBuffer::new(samples, sample_rate)
}

/// Sample-wise sum; the result has the length of the longer input
pub fn mix(a: &SignalBuffer, b: &SignalBuffer) -> SignalBuffer {
    let len = a.len().max(b.len());
    let samples = (0..len)
        .map(|i| a.samples().get(i).copied().unwrap_or(0.0) + b.samples().get(i).copied().unwrap_or(0.0))
        .collect();
    a.with_samples(samples)
}

/// `signal` preceded by `lead_samples` of silence, truncated to `total_len`
pub fn delayed(signal: &SignalBuffer, lead_samples: usize, total_len: usize) -> SignalBuffer {
    let samples = (0..total_len)
        .map(|i| {
            i.checked_sub(lead_samples)
                .and_then(|j| signal.samples().get(j).copied())
                .unwrap_or(0.0)
        })
        .collect();
    signal.with_samples(samples)
}

// Box-Muller transform
fn gaussian(rng: &mut StdRng) -> f32 {
    let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
    let u2: f32 = rng.gen::<f32>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_rms() {
        let tone = sine(100.0, 1.0, 1.0, 8000).unwrap();
        assert_eq!(tone.len(), 8000);
        assert!((tone.rms() - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-3);
    }

    #[test]
    fn test_noise_is_seeded() {
        let a = white_noise(0.1, 1000, 8000, 7).unwrap();
        let b = white_noise(0.1, 1000, 8000, 7).unwrap();
        let c = white_noise(0.1, 1000, 8000, 8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_noise_power_matches_std_dev() {
        let noise = white_noise(0.2, 50_000, 8000, 1).unwrap();
        assert!((noise.rms() - 0.2).abs() < 0.01);
    }

    #[test]
    fn test_impulse_and_delay() {
        let pulse = impulse(10, 3, 1.0, 100).unwrap();
        assert_eq!(pulse.samples()[3], 1.0);
        assert_eq!(pulse.peak(), 1.0);

        let moved = delayed(&pulse, 4, 12);
        assert_eq!(moved.len(), 12);
        assert_eq!(moved.samples()[7], 1.0);
        assert_eq!(moved.samples()[3], 0.0);
    }
}
