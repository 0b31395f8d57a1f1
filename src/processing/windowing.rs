// src/processing/windowing.rs
//! Window functions for short-time analysis

use crate::config::processing_config::WindowType;
use std::f32::consts::PI;

/// Periodic window of `size` samples
///
/// Periodic (DFT-even) windows are the right choice for overlap-add
/// resynthesis; the symmetric variants leave a ripple in the summed window.
pub fn generate_window(window_type: WindowType, size: usize) -> Vec<f32> {
    let n = size as f32;
    match window_type {
        WindowType::Rectangular => vec![1.0; size],
        WindowType::Hamming => (0..size)
            .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f32 / n).cos())
            .collect(),
        WindowType::Hann => (0..size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / n).cos()))
            .collect(),
        WindowType::Blackman => (0..size)
            .map(|i| {
                let x = i as f32 / n;
                0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
            })
            .collect(),
    }
}

/// Summary of one block of samples
#[derive(Debug, Clone, PartialEq)]
pub struct WindowAnalysis {
    /// Offset of the first sample within the signal
    pub start: usize,
    /// Sum of squares
    pub energy: f32,
    /// Largest absolute sample
    pub peak_amplitude: f32,
    /// Root mean square
    pub rms_amplitude: f32,
}

impl WindowAnalysis {
    /// Analyse `samples` that begin at offset `start` of the enclosing signal
    pub fn of(start: usize, samples: &[f32]) -> Self {
        let energy = samples.iter().map(|&x| x * x).sum::<f32>();
        let peak_amplitude = samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max);
        let rms_amplitude = if samples.is_empty() {
            0.0
        } else {
            (energy / samples.len() as f32).sqrt()
        };

        Self {
            start,
            energy,
            peak_amplitude,
            rms_amplitude,
        }
    }
}

/// Analyse consecutive windows of `window_size` samples spaced `hop_size` apart
///
/// Only full windows are produced. A signal shorter than one window yields a
/// single analysis of the whole signal.
pub fn sliding_windows(samples: &[f32], window_size: usize, hop_size: usize) -> Vec<WindowAnalysis> {
    if samples.len() <= window_size || window_size == 0 {
        return vec![WindowAnalysis::of(0, samples)];
    }
    let hop = hop_size.max(1);
    (0..=samples.len() - window_size)
        .step_by(hop)
        .map(|start| WindowAnalysis::of(start, &samples[start..start + window_size]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_functions() {
        let hamming = generate_window(WindowType::Hamming, 10);
        assert_eq!(hamming.len(), 10);
        assert!((hamming[0] - 0.08).abs() < 0.01);

        let hann = generate_window(WindowType::Hann, 10);
        assert!(hann[0] < 1e-6);
        assert!((hann[5] - 1.0).abs() < 1e-6);

        let rect = generate_window(WindowType::Rectangular, 5);
        assert!(rect.iter().all(|&x| x == 1.0));
    }

    #[test]
    fn test_hann_squared_sum_is_constant_at_quarter_hop() {
        let size = 64;
        let hop = 16;
        let window = generate_window(WindowType::Hann, size);
        let mut sum = vec![0.0f32; size * 4];
        for start in (0..sum.len() - size).step_by(hop) {
            for (i, w) in window.iter().enumerate() {
                sum[start + i] += w * w;
            }
        }
        let steady = &sum[size..2 * size];
        let first = steady[0];
        assert!(steady.iter().all(|&s| (s - first).abs() < 1e-4));
    }

    #[test]
    fn test_window_analysis() {
        let analysis = WindowAnalysis::of(3, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(analysis.start, 3);
        assert_eq!(analysis.peak_amplitude, 4.0);
        assert!((analysis.rms_amplitude - (30.0f32 / 4.0).sqrt()).abs() < 0.01);
    }

    #[test]
    fn test_sliding_windows() {
        let samples: Vec<f32> = (0..10).map(|i| i as f32).collect();
        let windows = sliding_windows(&samples, 4, 2);
        assert_eq!(windows.len(), 4);
        assert_eq!(windows[3].start, 6);

        let short = sliding_windows(&samples[..3], 4, 2);
        assert_eq!(short.len(), 1);
        assert_eq!(short[0].start, 0);
    }
}
