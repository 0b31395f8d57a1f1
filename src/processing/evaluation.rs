// src/processing/evaluation.rs
//! Signal-to-noise evaluation of a restoration

use crate::config::constants::snr::NOISE_POWER_EPSILON;
use crate::error::{ProcessingStage, RestoreError, Result};
use crate::signal::SignalBuffer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `10·log10(P_clean / (P_noise + ε))` in decibels
///
/// Both buffers must have the same length. The result is always finite: the
/// noise power carries an ε floor and a silent `clean` is floored at the
/// smallest positive f64, giving a large negative value instead of -inf.
pub fn compute_snr(clean: &SignalBuffer, noise_estimate: &SignalBuffer) -> Result<f64> {
    if clean.len() != noise_estimate.len() {
        return Err(RestoreError::LengthMismatch {
            stage: ProcessingStage::SnrEvaluation,
            expected: clean.len(),
            actual: noise_estimate.len(),
        });
    }
    let signal_power = clean.mean_power().max(f64::MIN_POSITIVE);
    let noise_power = noise_estimate.mean_power() + NOISE_POWER_EPSILON;
    Ok(10.0 * (signal_power / noise_power).log10())
}

/// Before/after SNR of one restoration, both against the same noise estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnrReport {
    /// SNR of the input in dB
    pub snr_before_db: f64,
    /// SNR of the cleaned output in dB
    pub snr_after_db: f64,
}

impl SnrReport {
    /// Evaluate with the residual `original - cleaned` as the noise estimate
    pub fn evaluate(original: &SignalBuffer, cleaned: &SignalBuffer) -> Result<Self> {
        let noise_estimate = original.difference(cleaned)?;
        Ok(Self {
            snr_before_db: compute_snr(original, &noise_estimate)?,
            snr_after_db: compute_snr(cleaned, &noise_estimate)?,
        })
    }

    /// After minus before, in dB
    pub fn improvement_db(&self) -> f64 {
        self.snr_after_db - self.snr_before_db
    }

    /// True when cleaning raised the SNR
    pub fn is_improved(&self) -> bool {
        self.snr_after_db > self.snr_before_db
    }
}

impl fmt::Display for SnrReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SNR before cleaning: {:.2} dB, after cleaning: {:.2} dB",
            self.snr_before_db, self.snr_after_db
        )
    }
}
