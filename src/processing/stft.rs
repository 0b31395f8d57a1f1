// src/processing/stft.rs
//! Short-time Fourier transform with weighted overlap-add resynthesis

use crate::config::constants::denoise::WINDOW_SUM_EPSILON;
use crate::config::processing_config::WindowType;
use crate::processing::windowing::generate_window;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Planned forward/inverse transform pair for one frame/hop geometry
///
/// Framing is centered: the signal is zero padded by half a frame on both
/// sides, so sample `i` sits at the middle of frame `i / hop`. Resynthesis
/// divides by the summed squared window, which makes analysis followed by
/// synthesis an identity whenever every sample is covered by at least one
/// non-zero window value (guaranteed for `hop <= frame / 2`).
pub struct Stft {
    frame_size: usize,
    hop_size: usize,
    window: Vec<f32>,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl Stft {
    /// Plan transforms of `frame_size` points with frames `hop_size` apart
    pub fn new(frame_size: usize, hop_size: usize, window_type: WindowType) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        Self {
            frame_size,
            hop_size: hop_size.max(1),
            window: generate_window(window_type, frame_size),
            forward: planner.plan_fft_forward(frame_size),
            inverse: planner.plan_fft_inverse(frame_size),
        }
    }

    /// Points per frame
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Samples between frame starts
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Number of non-negative frequency bins per frame
    pub fn bin_count(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Number of frames produced for a signal of `len` samples
    pub fn frame_count(&self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            1 + len.div_ceil(self.hop_size)
        }
    }

    /// True when frame `frame` covers only real samples of a `len`-sample signal
    pub fn is_interior(&self, frame: usize, len: usize) -> bool {
        let pad = self.frame_size / 2;
        let start = frame * self.hop_size;
        start >= pad && start - pad + self.frame_size <= len
    }

    /// Visit the forward spectrum of every windowed frame in order
    ///
    /// One frame buffer is reused throughout, so memory does not grow with
    /// the signal length.
    pub fn for_each_spectrum<F>(&self, signal: &[f32], mut visit: F)
    where
        F: FnMut(usize, &[Complex<f32>]),
    {
        let mut buffer = vec![Complex::new(0.0, 0.0); self.frame_size];
        let mut scratch = vec![Complex::new(0.0, 0.0); self.forward.get_inplace_scratch_len()];
        for f in 0..self.frame_count(signal.len()) {
            self.load_frame(signal, f, &mut buffer);
            self.forward.process_with_scratch(&mut buffer, &mut scratch);
            visit(f, &buffer);
        }
    }

    /// Magnitudes of the non-negative bins of every frame
    pub fn magnitudes(&self, signal: &[f32]) -> Vec<Vec<f32>> {
        let bins = self.bin_count();
        let mut frames = Vec::with_capacity(self.frame_count(signal.len()));
        self.for_each_spectrum(signal, |_, spectrum| {
            frames.push(spectrum[..bins].iter().map(|c| c.norm()).collect());
        });
        frames
    }

    /// Analyse, let `modify` edit each full spectrum, then overlap-add back
    ///
    /// Frames are transformed one at a time and accumulated straight into the
    /// output, so peak memory is the output plus its window sum. The result
    /// has exactly `signal.len()` samples.
    pub fn process<F>(&self, signal: &[f32], mut modify: F) -> Vec<f32>
    where
        F: FnMut(&mut [Complex<f32>]),
    {
        let len = signal.len();
        let frames = self.frame_count(len);
        if frames == 0 {
            return Vec::new();
        }

        let pad = self.frame_size / 2;
        let total = ((frames - 1) * self.hop_size + self.frame_size).max(len + 2 * pad);
        let mut output = vec![0.0f32; total];
        let mut window_sum = vec![0.0f32; total];
        let scale = 1.0 / self.frame_size as f32;

        let mut buffer = vec![Complex::new(0.0, 0.0); self.frame_size];
        let scratch_len = self
            .forward
            .get_inplace_scratch_len()
            .max(self.inverse.get_inplace_scratch_len());
        let mut scratch = vec![Complex::new(0.0, 0.0); scratch_len];

        for f in 0..frames {
            self.load_frame(signal, f, &mut buffer);
            self.forward.process_with_scratch(&mut buffer, &mut scratch);
            modify(&mut buffer);
            self.inverse.process_with_scratch(&mut buffer, &mut scratch);

            let start = f * self.hop_size;
            for (i, value) in buffer.iter().enumerate() {
                let w = self.window[i];
                output[start + i] += value.re * scale * w;
                window_sum[start + i] += w * w;
            }
        }

        output.drain(..pad);
        output.truncate(len);
        for (y, &w) in output.iter_mut().zip(window_sum[pad..].iter()) {
            *y = if w > WINDOW_SUM_EPSILON { *y / w } else { 0.0 };
        }
        output
    }

    fn load_frame(&self, signal: &[f32], frame: usize, buffer: &mut [Complex<f32>]) {
        let pad = self.frame_size / 2;
        let start = frame * self.hop_size;
        for (i, slot) in buffer.iter_mut().enumerate() {
            let sample = (start + i)
                .checked_sub(pad)
                .and_then(|j| signal.get(j).copied())
                .unwrap_or(0.0);
            *slot = Complex::new(sample * self.window[i], 0.0);
        }
    }
}
