// src/config/mod.rs
//! Configuration management for the restoration pipeline
//!
//! Every tunable lives in [`RestorationConfig`]; there is no other hidden
//! state. Values are layered by [`ConfigLoader`] from built-in defaults, TOML
//! files and `AUDIOVIVE_*` environment variables.

pub mod constants;
pub mod loader;
pub mod processing_config;

pub use constants::*;
pub use loader::ConfigLoader;
pub use processing_config::*;

use crate::error::{ProcessingStage, RestoreError, Result};
use serde::{Deserialize, Serialize};

/// Complete pipeline configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct RestorationConfig {
    /// Hum rejection
    #[serde(default)]
    pub notch: NotchConfig,

    /// Noise reference selection
    #[serde(default)]
    pub noise_profile: NoiseProfileConfig,

    /// Spectral subtraction
    #[serde(default)]
    pub denoise: DenoiseConfig,

    /// Output encoding
    #[serde(default)]
    pub export: ExportConfig,
}

/// Default value providers using constants
pub(crate) mod defaults {
    use super::constants::*;
    use super::processing_config::{ExportFormat, ProfileStrategy, WindowType};

    pub fn notch_enabled() -> bool { true }
    pub fn notch_target_freq_hz() -> f32 { notch::DEFAULT_TARGET_FREQ_HZ }
    pub fn notch_quality_factor() -> f32 { notch::DEFAULT_QUALITY_FACTOR }
    pub fn notch_harmonics() -> u32 { notch::DEFAULT_HARMONICS }
    pub fn notch_prime_state() -> bool { true }

    pub fn profile_strategy() -> ProfileStrategy {
        ProfileStrategy::Leading { duration_s: profile::DEFAULT_DURATION_SECS }
    }

    pub fn attenuation_strength() -> f32 { denoise::DEFAULT_ATTENUATION_STRENGTH }
    pub fn frame_size() -> usize { denoise::DEFAULT_FRAME_SIZE }
    pub fn hop_size() -> usize { denoise::DEFAULT_HOP_SIZE }
    pub fn window() -> WindowType { WindowType::Hann }
    pub fn spectral_floor() -> f32 { denoise::DEFAULT_SPECTRAL_FLOOR }

    pub fn export_format() -> ExportFormat { ExportFormat::Wav }
    pub fn bit_depth() -> u16 { export::DEFAULT_BIT_DEPTH }
    pub fn bitrate_kbps() -> u32 { export::DEFAULT_BITRATE_KBPS }
}

impl RestorationConfig {
    /// Config built from the four commonly tuned knobs, everything else default
    pub fn from_tunables(
        notch_target_freq_hz: f32,
        notch_quality: f32,
        noise_profile_duration_s: f64,
        attenuation_strength: f32,
    ) -> Self {
        let mut config = Self::default();
        config.notch.target_freq_hz = notch_target_freq_hz;
        config.notch.quality_factor = notch_quality;
        config.noise_profile.strategy = ProfileStrategy::Leading {
            duration_s: noise_profile_duration_s,
        };
        config.denoise.attenuation_strength = attenuation_strength;
        config
    }

    /// Check every constraint that does not depend on the input's sample rate
    ///
    /// The Nyquist check on the notch frequency needs the sample rate and is
    /// done when the filter is designed, still before any sample is touched.
    pub fn validate(&self) -> Result<()> {
        self.validate_notch()?;
        self.validate_profile()?;
        self.validate_denoise()?;
        self.validate_export()
    }

    fn validate_notch(&self) -> Result<()> {
        let notch = &self.notch;
        if !(notch.target_freq_hz.is_finite() && notch.target_freq_hz > 0.0) {
            return Err(param(ProcessingStage::NotchFilter, "notch.target_freq_hz", format!(
                "must be a positive frequency, got {}", notch.target_freq_hz
            )));
        }
        if !(notch.quality_factor.is_finite() && notch.quality_factor > 0.0) {
            return Err(param(ProcessingStage::NotchFilter, "notch.quality_factor", format!(
                "must be positive, got {}", notch.quality_factor
            )));
        }
        if notch.harmonics == 0 || notch.harmonics > notch::MAX_HARMONICS {
            return Err(param(ProcessingStage::NotchFilter, "notch.harmonics", format!(
                "must be between 1 and {}, got {}", notch::MAX_HARMONICS, notch.harmonics
            )));
        }
        Ok(())
    }

    fn validate_profile(&self) -> Result<()> {
        let non_negative = |name: &str, value: f64| -> Result<()> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(param(ProcessingStage::NoiseProfile, name, format!(
                    "must be a non-negative number of seconds, got {}", value
                )))
            }
        };

        match self.noise_profile.strategy {
            ProfileStrategy::Leading { duration_s } => non_negative("noise_profile.duration_s", duration_s),
            ProfileStrategy::QuietestWindow { duration_s } => non_negative("noise_profile.duration_s", duration_s),
            ProfileStrategy::Range { start_s, end_s } => {
                non_negative("noise_profile.start_s", start_s)?;
                non_negative("noise_profile.end_s", end_s)?;
                if end_s < start_s {
                    return Err(param(ProcessingStage::NoiseProfile, "noise_profile.end_s", format!(
                        "must not precede start_s ({} < {})", end_s, start_s
                    )));
                }
                Ok(())
            }
        }
    }

    fn validate_denoise(&self) -> Result<()> {
        let d = &self.denoise;
        let strength_range = denoise::MIN_ATTENUATION_STRENGTH..=denoise::MAX_ATTENUATION_STRENGTH;
        if !strength_range.contains(&d.attenuation_strength) {
            return Err(param(ProcessingStage::SpectralDenoise, "denoise.attenuation_strength", format!(
                "must be within [0, 1], got {}", d.attenuation_strength
            )));
        }
        if d.frame_size < denoise::MIN_FRAME_SIZE || d.frame_size > denoise::MAX_FRAME_SIZE {
            return Err(param(ProcessingStage::SpectralDenoise, "denoise.frame_size", format!(
                "must be between {} and {}, got {}",
                denoise::MIN_FRAME_SIZE, denoise::MAX_FRAME_SIZE, d.frame_size
            )));
        }
        if d.hop_size == 0 || d.hop_size > d.frame_size / 2 {
            return Err(param(ProcessingStage::SpectralDenoise, "denoise.hop_size", format!(
                "must be between 1 and half the frame size ({}), got {}",
                d.frame_size / 2, d.hop_size
            )));
        }
        if !(0.0..1.0).contains(&d.spectral_floor) {
            return Err(param(ProcessingStage::SpectralDenoise, "denoise.spectral_floor", format!(
                "must be within [0, 1), got {}", d.spectral_floor
            )));
        }
        Ok(())
    }

    fn validate_export(&self) -> Result<()> {
        let e = &self.export;
        if !export::SUPPORTED_BIT_DEPTHS.contains(&e.bit_depth) {
            return Err(param(ProcessingStage::Encode, "export.bit_depth", format!(
                "must be one of {:?}, got {}", export::SUPPORTED_BIT_DEPTHS, e.bit_depth
            )));
        }
        if e.bitrate_kbps < export::MIN_BITRATE_KBPS || e.bitrate_kbps > export::MAX_BITRATE_KBPS {
            return Err(param(ProcessingStage::Encode, "export.bitrate_kbps", format!(
                "must be between {} and {}, got {}",
                export::MIN_BITRATE_KBPS, export::MAX_BITRATE_KBPS, e.bitrate_kbps
            )));
        }
        Ok(())
    }

    /// Serialize to TOML, the format the loader reads
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Short summary for logs and reports
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            notch_enabled: self.notch.enabled,
            notch_target_freq_hz: self.notch.target_freq_hz,
            notch_quality: self.notch.quality_factor,
            noise_profile: self.noise_profile.strategy.clone(),
            attenuation_strength: self.denoise.attenuation_strength,
        }
    }
}

/// Configuration summary for display/logging
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    /// Whether hum rejection runs
    pub notch_enabled: bool,
    /// Notch centre in Hz
    pub notch_target_freq_hz: f32,
    /// Notch Q
    pub notch_quality: f32,
    /// Noise reference selection
    pub noise_profile: ProfileStrategy,
    /// Subtraction strength in [0, 1]
    pub attenuation_strength: f32,
}

fn param(stage: ProcessingStage, parameter: &str, reason: String) -> RestoreError {
    RestoreError::invalid_parameter(stage, parameter, reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_creation() {
        let config = RestorationConfig::default();
        assert_eq!(config.notch.target_freq_hz, notch::DEFAULT_TARGET_FREQ_HZ);
        assert_eq!(config.notch.quality_factor, notch::DEFAULT_QUALITY_FACTOR);
        assert_eq!(config.denoise.attenuation_strength, 1.0);
        assert_eq!(
            config.noise_profile.strategy,
            ProfileStrategy::Leading { duration_s: 0.5 }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = RestorationConfig::from_tunables(50.0, 20.0, 0.25, 0.8);
        let toml_str = config.to_toml_string().unwrap();
        let deserialized: RestorationConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config: RestorationConfig = toml::from_str("").unwrap();
        assert_eq!(config, RestorationConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = RestorationConfig::default();
        config.denoise.attenuation_strength = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.is_parameter_error());
        assert!(err.to_string().contains("attenuation_strength"));

        let mut config = RestorationConfig::default();
        config.notch.quality_factor = -3.0;
        assert!(config.validate().is_err());

        let mut config = RestorationConfig::default();
        config.denoise.hop_size = config.denoise.frame_size;
        assert!(config.validate().is_err());

        let mut config = RestorationConfig::default();
        config.noise_profile.strategy = ProfileStrategy::Range { start_s: 2.0, end_s: 1.0 };
        assert!(config.validate().is_err());

        let mut config = RestorationConfig::default();
        config.export.bit_depth = 12;
        assert!(config.validate().is_err());
    }
}
