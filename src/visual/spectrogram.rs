// src/visual/spectrogram.rs
//! Log-magnitude spectrogram

use crate::config::constants::visual::{AMPLITUDE_MIN, DEFAULT_FFT_SIZE, DEFAULT_HOP_SIZE, DEFAULT_TOP_DB};
use crate::config::processing_config::WindowType;
use crate::error::{ProcessingStage, RestoreError, Result};
use crate::processing::stft::Stft;
use crate::signal::SignalBuffer;
use ndarray::Array2;
use serde::Serialize;

/// Decibel magnitudes relative to the loudest bin, laid out `[bin, frame]`
#[derive(Debug, Clone, Serialize)]
pub struct Spectrogram {
    /// Panel title
    pub title: String,
    /// Frame centres in seconds
    pub times_s: Vec<f64>,
    /// Bin centres from 0 Hz to Nyquist
    pub frequencies_hz: Vec<f64>,
    /// Values in `[-top_db, 0]`
    pub magnitudes_db: Array2<f32>,
}

/// Transform geometry and dynamic range of a spectrogram
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectrogramSettings {
    /// Frame length
    pub fft_size: usize,
    /// Frame advance
    pub hop_size: usize,
    /// Cells quieter than this many dB below the peak are clipped
    pub top_db: f32,
}

impl Default for SpectrogramSettings {
    fn default() -> Self {
        Self {
            fft_size: DEFAULT_FFT_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            top_db: DEFAULT_TOP_DB,
        }
    }
}

impl Spectrogram {
    /// Spectrogram with the default Hann 2048/512 geometry
    pub fn from_signal(signal: &SignalBuffer, title: impl Into<String>) -> Result<Self> {
        Self::with_settings(signal, title, SpectrogramSettings::default())
    }

    /// Spectrogram with explicit geometry and dynamic range
    pub fn with_settings(
        signal: &SignalBuffer,
        title: impl Into<String>,
        settings: SpectrogramSettings,
    ) -> Result<Self> {
        if settings.fft_size < 2 || settings.hop_size == 0 {
            return Err(RestoreError::invalid_parameter(
                ProcessingStage::Visualization,
                "fft_size",
                format!(
                    "need fft_size >= 2 and hop_size >= 1, got {} and {}",
                    settings.fft_size, settings.hop_size
                ),
            ));
        }

        let stft = Stft::new(settings.fft_size, settings.hop_size, WindowType::Hann);
        let frames = stft.magnitudes(signal.samples());
        let bins = stft.bin_count();

        let reference = frames
            .iter()
            .flat_map(|f| f.iter().copied())
            .fold(0.0f32, f32::max)
            .max(AMPLITUDE_MIN);
        let ref_db = 20.0 * reference.log10();
        let floor_db = -settings.top_db;

        let magnitudes_db = Array2::from_shape_fn((bins, frames.len()), |(k, t)| {
            let db = 20.0 * frames[t][k].max(AMPLITUDE_MIN).log10() - ref_db;
            db.max(floor_db)
        });

        let sr = signal.sample_rate() as f64;
        Ok(Self {
            title: title.into(),
            times_s: (0..frames.len())
                .map(|t| (t * settings.hop_size) as f64 / sr)
                .collect(),
            frequencies_hz: (0..bins)
                .map(|k| k as f64 * sr / settings.fft_size as f64)
                .collect(),
            magnitudes_db,
        })
    }

    /// Number of time columns
    pub fn frame_count(&self) -> usize {
        self.magnitudes_db.ncols()
    }

    /// Number of frequency rows
    pub fn bin_count(&self) -> usize {
        self.magnitudes_db.nrows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::synth;

    #[test]
    fn test_axes_and_shape() {
        let signal = synth::sine(1000.0, 0.5, 1.0, 8000).unwrap();
        let spec = Spectrogram::from_signal(&signal, "tone").unwrap();
        assert_eq!(spec.bin_count(), 1025);
        assert_eq!(spec.frame_count(), 1 + 8000usize.div_ceil(512));
        assert_eq!(spec.times_s[1], 512.0 / 8000.0);
        assert_eq!(spec.frequencies_hz[1024], 4000.0);
    }

    #[test]
    fn test_db_range_is_clipped() {
        let signal = synth::sine(1000.0, 0.5, 1.0, 8000).unwrap();
        let spec = Spectrogram::from_signal(&signal, "tone").unwrap();
        let max = spec.magnitudes_db.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let min = spec.magnitudes_db.iter().copied().fold(f32::INFINITY, f32::min);
        assert!(max.abs() < 1e-4);
        assert!(min >= -80.0);
    }

    #[test]
    fn test_tone_peak_bin() {
        let signal = synth::sine(1000.0, 0.5, 1.0, 8000).unwrap();
        let spec = Spectrogram::from_signal(&signal, "tone").unwrap();
        let middle = spec.frame_count() / 2;
        let column = spec.magnitudes_db.column(middle);
        let peak = column
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| k)
            .unwrap();
        // 1000 Hz at 8000/2048 Hz per bin
        assert_eq!(peak, 256);
    }

    #[test]
    fn test_silence_is_flat() {
        let signal = SignalBuffer::silence(4096, 8000).unwrap();
        let spec = Spectrogram::from_signal(&signal, "quiet").unwrap();
        assert!(spec.magnitudes_db.iter().all(|&db| db == 0.0));
    }
}
