// ================================================================================
// File: src/processing/noise_reduction/mod.rs
// ================================================================================

//! Noise reduction for restored recordings
//!
//! This module covers the two halves of stationary-noise removal:
//! - Noise profile selection (which part of the recording is "just noise")
//! - Spectral subtraction of the profile's mean spectrum from every frame

pub mod profile;
pub mod spectral_subtraction;

pub use profile::{
    extract_noise_profile, ExplicitRange, LeadingSegment, NoiseProfile, ProfileSelector, QuietestWindow,
};
pub use spectral_subtraction::{denoise, SpectralDenoiser};

use crate::config::processing_config::{DenoiseConfig, NoiseProfileConfig};
use crate::error::Result;
use crate::signal::SignalBuffer;

/// Profile selection followed by spectral subtraction
pub struct NoiseReducer {
    profile: NoiseProfileConfig,
    denoiser: SpectralDenoiser,
}

impl NoiseReducer {
    /// Fails when `denoise` describes an invalid transform
    pub fn new(profile: NoiseProfileConfig, denoise: DenoiseConfig) -> Result<Self> {
        Ok(Self {
            profile,
            denoiser: SpectralDenoiser::new(denoise)?,
        })
    }

    /// Select the noise reference from `signal` itself and subtract it
    ///
    /// Returns the cleaned signal together with the profile that was used.
    pub fn reduce_noise(&self, signal: &SignalBuffer) -> Result<(SignalBuffer, NoiseProfile)> {
        let profile = self.profile.strategy.select(signal)?;
        let cleaned = self.denoiser.denoise(signal, &profile)?;
        Ok((cleaned, profile))
    }
}
