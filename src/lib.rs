//! AudioVive core: restoration of noisy and hum-laden audio recordings
//!
//! The library turns a decoded mono recording into a cleaned one and reports
//! how much the signal-to-noise ratio changed. It features:
//!
//! - Notch filtering of mains hum (50/60 Hz) and its harmonics
//! - Noise profile selection from the recording itself
//! - Spectral subtraction with weighted overlap-add resynthesis
//! - Before/after SNR evaluation
//! - WAV/MP3 decoding, peak-normalized WAV/MP3 encoding
//! - Waveform and spectrogram data for plotting
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use audiovive_core::codec::{decode_file, write_file};
//! use audiovive_core::config::ConfigLoader;
//! use audiovive_core::processing::RestorationPipeline;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().load()?;
//!     let pipeline = RestorationPipeline::new(config.clone())?;
//!
//!     let recording = decode_file("grandpa_1962.wav")?;
//!     let outcome = pipeline.run(&recording)?;
//!     println!("{}", outcome.report);
//!
//!     write_file(&outcome.cleaned, &config.export, "grandpa_1962_cleaned.wav")?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod codec;
pub mod config;
pub mod error;
pub mod processing;
pub mod signal;
pub mod visual;

// Re-export commonly used types for convenience
pub use config::{ConfigLoader, RestorationConfig};
pub use error::{ProcessingStage, RestoreError, Result};
pub use processing::{
    compute_snr, denoise, extract_noise_profile, reduce_noise, NoiseProfile, NotchFilter,
    RestorationOutcome, RestorationPipeline, SnrReport, SpectralDenoiser,
};
pub use signal::SignalBuffer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Noise reduction and signal evaluation core for restoring old audio recordings".to_string(),
        features: vec![
            "Mains hum notch filtering".to_string(),
            "Spectral subtraction denoising".to_string(),
            "SNR evaluation".to_string(),
            "WAV and MP3 input".to_string(),
            format!("MP3 export: {}", if cfg!(feature = "mp3") { "enabled" } else { "disabled" }),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        let info = version_info();
        assert_eq!(info.name, NAME);
        assert_eq!(info.version, VERSION);
        assert!(!info.features.is_empty());
    }

    #[test]
    fn test_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "audiovive-core");
    }
}
