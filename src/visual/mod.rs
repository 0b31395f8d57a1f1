// src/visual/mod.rs
//! Plot-ready series for comparing original and cleaned recordings
//!
//! Rendering is left to the caller; this module produces the data behind a
//! waveform or spectrogram view and serializes it as JSON.

pub mod spectrogram;
pub mod waveform;

pub use spectrogram::{Spectrogram, SpectrogramSettings};
pub use waveform::{Waveform, WaveformEnvelope};

use crate::config::constants::visual::DEFAULT_MAX_WAVEFORM_POINTS;
use crate::error::{ProcessingStage, RestoreError, Result};
use crate::processing::evaluation::SnrReport;
use crate::signal::SignalBuffer;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which view to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    /// Amplitude against time
    Waveform,
    /// Log magnitude against time and frequency
    Spectrogram,
}

impl FromStr for PlotKind {
    type Err = RestoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "waveform" => Ok(PlotKind::Waveform),
            "spectrogram" => Ok(PlotKind::Spectrogram),
            other => Err(RestoreError::invalid_parameter(
                ProcessingStage::Visualization,
                "plot",
                format!("unknown view '{}', expected waveform or spectrogram", other),
            )),
        }
    }
}

/// One panel of a side-by-side comparison
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Panel {
    /// Bucketed min/max envelope
    Waveform(WaveformEnvelope),
    /// Decibel grid
    Spectrogram(Spectrogram),
}

/// Original and cleaned panels plus the SNR figures shown beneath them
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    /// Left panel, titled "Original (Noisy)"
    pub original: Panel,
    /// Right panel, titled "Cleaned"
    pub cleaned: Panel,
    /// Figures shown under both panels
    pub snr: SnrReport,
}

impl Comparison {
    /// Render both signals as `kind` and evaluate their SNR
    pub fn build(original: &SignalBuffer, cleaned: &SignalBuffer, kind: PlotKind) -> Result<Self> {
        let snr = SnrReport::evaluate(original, cleaned)?;
        Ok(Self {
            original: panel(original, "Original (Noisy)", kind)?,
            cleaned: panel(cleaned, "Cleaned", kind)?,
            snr,
        })
    }

    /// Pretty-printed JSON for an external plotting front end
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn panel(signal: &SignalBuffer, title: &str, kind: PlotKind) -> Result<Panel> {
    Ok(match kind {
        PlotKind::Waveform => {
            Panel::Waveform(Waveform::from_signal(signal, title).envelope(DEFAULT_MAX_WAVEFORM_POINTS))
        }
        PlotKind::Spectrogram => Panel::Spectrogram(Spectrogram::from_signal(signal, title)?),
    })
}
