// src/config/processing_config.rs
//! Per-stage configuration structures

use super::defaults;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notch filter configuration for mains hum and other narrowband interference
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NotchConfig {
    /// Skip the stage entirely when false
    #[serde(default = "defaults::notch_enabled")]
    pub enabled: bool,

    /// Centre of the rejected band, below Nyquist
    #[serde(default = "defaults::notch_target_freq_hz")]
    pub target_freq_hz: f32,

    /// Centre frequency over -3 dB bandwidth
    #[serde(default = "defaults::notch_quality_factor")]
    pub quality_factor: f32,

    /// Number of harmonics to reject, the fundamental counting as 1
    #[serde(default = "defaults::notch_harmonics")]
    pub harmonics: u32,

    /// Settle the filter on a reflected pre-roll before the first real sample
    #[serde(default = "defaults::notch_prime_state")]
    pub prime_state: bool,
}

/// How the noise reference segment is chosen
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfileStrategy {
    /// The first `duration_s` seconds are assumed to hold only background noise
    Leading {
        /// Segment length in seconds
        duration_s: f64,
    },
    /// Caller-selected noise-only region
    Range {
        /// Inclusive start in seconds
        start_s: f64,
        /// Exclusive end in seconds
        end_s: f64,
    },
    /// Lowest-energy window of `duration_s` seconds anywhere in the recording
    QuietestWindow {
        /// Window length in seconds
        duration_s: f64,
    },
}

/// Noise profile configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NoiseProfileConfig {
    /// Region treated as noise-only
    #[serde(default = "defaults::profile_strategy")]
    pub strategy: ProfileStrategy,
}

/// Analysis window used by the short-time transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    /// No taper
    Rectangular,
    /// Raised cosine on a 0.08 pedestal
    Hamming,
    /// Periodic raised cosine, perfect overlap-add at quarter-frame hops
    Hann,
    /// Three-term cosine with lower sidelobes
    Blackman,
}

/// Spectral subtraction configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DenoiseConfig {
    /// Fraction of the estimated noise magnitude removed from every bin
    #[serde(default = "defaults::attenuation_strength")]
    pub attenuation_strength: f32,

    /// FFT length in samples
    #[serde(default = "defaults::frame_size")]
    pub frame_size: usize,

    /// Frame advance in samples, at most `frame_size`
    #[serde(default = "defaults::hop_size")]
    pub hop_size: usize,

    /// Analysis and synthesis window
    #[serde(default = "defaults::window")]
    pub window: WindowType,

    /// Minimum kept fraction of each bin's original magnitude
    #[serde(default = "defaults::spectral_floor")]
    pub spectral_floor: f32,
}

/// Output container for the cleaned recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// PCM WAV at the configured bit depth
    Wav,
    /// Constant bitrate MP3, needs the `mp3` feature
    Mp3,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Wav => f.write_str("wav"),
            ExportFormat::Mp3 => f.write_str("mp3"),
        }
    }
}

/// Export configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExportConfig {
    /// Container written by the exporter
    #[serde(default = "defaults::export_format")]
    pub format: ExportFormat,

    /// PCM bit depth for WAV output
    #[serde(default = "defaults::bit_depth")]
    pub bit_depth: u16,

    /// Constant bitrate for MP3 output
    #[serde(default = "defaults::bitrate_kbps")]
    pub bitrate_kbps: u32,
}

impl Default for NotchConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::notch_enabled(),
            target_freq_hz: defaults::notch_target_freq_hz(),
            quality_factor: defaults::notch_quality_factor(),
            harmonics: defaults::notch_harmonics(),
            prime_state: defaults::notch_prime_state(),
        }
    }
}

impl Default for ProfileStrategy {
    fn default() -> Self {
        defaults::profile_strategy()
    }
}

impl Default for NoiseProfileConfig {
    fn default() -> Self {
        Self {
            strategy: defaults::profile_strategy(),
        }
    }
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            attenuation_strength: defaults::attenuation_strength(),
            frame_size: defaults::frame_size(),
            hop_size: defaults::hop_size(),
            window: defaults::window(),
            spectral_floor: defaults::spectral_floor(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: defaults::export_format(),
            bit_depth: defaults::bit_depth(),
            bitrate_kbps: defaults::bitrate_kbps(),
        }
    }
}

impl DenoiseConfig {
    /// Default transform settings with a custom strength
    pub fn with_strength(attenuation_strength: f32) -> Self {
        Self {
            attenuation_strength,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_toml_shape() {
        let config: NoiseProfileConfig = toml::from_str(
            r#"
            [strategy]
            kind = "range"
            start_s = 1.0
            end_s = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(config.strategy, ProfileStrategy::Range { start_s: 1.0, end_s: 1.5 });
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: DenoiseConfig = toml::from_str("attenuation_strength = 0.5").unwrap();
        assert_eq!(config.attenuation_strength, 0.5);
        assert_eq!(config.frame_size, 2048);
        assert_eq!(config.window, WindowType::Hann);
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(ExportFormat::Wav.to_string(), "wav");
        assert_eq!(ExportFormat::Mp3.to_string(), "mp3");
    }
}
