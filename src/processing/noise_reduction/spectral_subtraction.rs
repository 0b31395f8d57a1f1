// src/processing/noise_reduction/spectral_subtraction.rs
//! Spectral subtraction for frequency-domain noise reduction

use super::profile::NoiseProfile;
use crate::config::constants::denoise;
use crate::config::processing_config::DenoiseConfig;
use crate::error::{ProcessingStage, RestoreError, Result};
use crate::processing::stft::Stft;
use crate::signal::SignalBuffer;
use rustfft::num_complex::Complex;
use tracing::{debug, trace};

/// Spectral subtraction noise reduction
///
/// Every analysis frame keeps its phase while each bin's magnitude is lowered
/// by `strength` times the noise profile's mean magnitude in that bin, never
/// below `spectral_floor` times the original magnitude.
pub struct SpectralDenoiser {
    config: DenoiseConfig,
    stft: Stft,
}

impl SpectralDenoiser {
    /// Validate `config` and plan the transforms it describes
    pub fn new(config: DenoiseConfig) -> Result<Self> {
        validate(&config)?;
        let stft = Stft::new(config.frame_size, config.hop_size, config.window);
        Ok(Self { config, stft })
    }

    /// Settings the denoiser was built with
    pub fn config(&self) -> &DenoiseConfig {
        &self.config
    }

    /// Mean magnitude per non-negative frequency bin across the profile's frames
    ///
    /// Only frames lying wholly inside the profile are averaged; zero padded
    /// edge frames are skipped. A profile shorter than one frame has no such
    /// frames and falls back to all of them.
    pub fn noise_spectrum(&self, profile: &NoiseProfile) -> Vec<f32> {
        let len = profile.len();
        let has_interior = (0..self.stft.frame_count(len)).any(|f| self.stft.is_interior(f, len));

        let mut spectrum = vec![0.0f32; self.stft.bin_count()];
        let mut count = 0usize;
        self.stft.for_each_spectrum(profile.samples(), |f, frame| {
            if has_interior && !self.stft.is_interior(f, len) {
                return;
            }
            for (acc, bin) in spectrum.iter_mut().zip(frame.iter()) {
                *acc += bin.norm();
            }
            count += 1;
        });

        if count > 0 {
            let count = count as f32;
            spectrum.iter_mut().for_each(|m| *m /= count);
        }
        trace!(frames = count, interior = has_interior, "noise spectrum estimated");
        spectrum
    }

    /// Remove the profile's stationary noise from `signal`
    ///
    /// Returns the input unchanged when there is nothing to subtract: an empty
    /// signal or profile, a silent profile, or zero strength.
    pub fn denoise(&self, signal: &SignalBuffer, profile: &NoiseProfile) -> Result<SignalBuffer> {
        if signal.is_empty() || profile.is_empty() {
            debug!(
                signal_len = signal.len(),
                profile_len = profile.len(),
                "empty input or noise profile, skipping spectral subtraction"
            );
            return Ok(signal.clone());
        }
        if profile.segment().sample_rate() != signal.sample_rate() {
            return Err(RestoreError::invalid_parameter(
                ProcessingStage::SpectralDenoise,
                "noise_profile",
                format!(
                    "profile sampled at {} Hz, signal at {} Hz",
                    profile.segment().sample_rate(),
                    signal.sample_rate()
                ),
            ));
        }

        let strength = self.config.attenuation_strength;
        let noise = self.noise_spectrum(profile);
        if strength == 0.0 || noise.iter().all(|&m| m == 0.0) {
            debug!(strength, "nothing to subtract, returning input");
            return Ok(signal.clone());
        }

        let n = self.stft.frame_size();
        let floor = self.config.spectral_floor;
        let mut frames = 0usize;
        let mut cleaned = self.stft.process(signal.samples(), |frame| {
            for (k, &noise_mag) in noise.iter().enumerate() {
                let gain = bin_gain(frame[k], noise_mag, strength, floor);
                frame[k] *= gain;
                // mirror onto the negative frequency so the frame stays Hermitian
                let mirror = (n - k) % n;
                if mirror != k {
                    frame[mirror] *= gain;
                }
            }
            frames += 1;
        });
        trace!(frames, bins = noise.len(), "frames attenuated");

        let peak = signal.peak();
        cleaned.iter_mut().for_each(|x| *x = x.clamp(-peak, peak));

        debug!(
            samples = cleaned.len(),
            strength,
            frame_size = n,
            hop_size = self.stft.hop_size(),
            "spectral subtraction complete"
        );
        Ok(signal.with_samples(cleaned))
    }
}

/// `SpectralDenoiser::denoise` with default transform settings and the given strength
pub fn denoise(signal: &SignalBuffer, profile: &NoiseProfile, attenuation_strength: f32) -> Result<SignalBuffer> {
    SpectralDenoiser::new(DenoiseConfig::with_strength(attenuation_strength))?.denoise(signal, profile)
}

fn bin_gain(bin: Complex<f32>, noise_mag: f32, strength: f32, floor: f32) -> f32 {
    let mag = bin.norm();
    if mag <= 0.0 {
        return 0.0;
    }
    let reduced = (mag - strength * noise_mag).max(floor * mag);
    reduced / mag
}

fn validate(config: &DenoiseConfig) -> Result<()> {
    let invalid = |parameter: &str, reason: String| {
        Err(RestoreError::invalid_parameter(ProcessingStage::SpectralDenoise, parameter, reason))
    };
    let s = config.attenuation_strength;
    if !(denoise::MIN_ATTENUATION_STRENGTH..=denoise::MAX_ATTENUATION_STRENGTH).contains(&s) {
        return invalid("attenuation_strength", format!("must be within [0, 1], got {}", s));
    }
    if config.frame_size < denoise::MIN_FRAME_SIZE || config.frame_size > denoise::MAX_FRAME_SIZE {
        return invalid("frame_size", format!(
            "must be between {} and {}, got {}",
            denoise::MIN_FRAME_SIZE, denoise::MAX_FRAME_SIZE, config.frame_size
        ));
    }
    if config.hop_size == 0 || config.hop_size > config.frame_size / 2 {
        return invalid("hop_size", format!(
            "must be between 1 and {}, got {}", config.frame_size / 2, config.hop_size
        ));
    }
    if !(0.0..1.0).contains(&config.spectral_floor) {
        return invalid("spectral_floor", format!("must be within [0, 1), got {}", config.spectral_floor));
    }
    Ok(())
}
