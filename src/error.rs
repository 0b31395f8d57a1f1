// src/error.rs
//! Unified error handling for the restoration core
//!
//! Every stage reports failures through [`RestoreError`]. Errors are raised at
//! the stage that detects them and propagated with `?`; nothing is retried,
//! since the pipeline is deterministic and a retry on the same input changes
//! nothing.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unified error type for the restoration pipeline
#[derive(Debug, Error)]
pub enum RestoreError {
    /// A configuration value violates one of its constraints
    #[error("[PARAM] Invalid {parameter} in {stage} stage: {reason}")]
    InvalidParameter {
        /// Stage that validated the parameter
        stage: ProcessingStage,
        /// Parameter name as it appears in the configuration
        parameter: String,
        /// Human readable constraint that was violated
        reason: String,
    },

    /// A stage that cannot work on an empty buffer received one
    #[error("[DATA] {stage} stage received an empty signal")]
    EmptyInput {
        /// Stage that rejected the input
        stage: ProcessingStage,
    },

    /// Two buffers that must be aligned sample-for-sample differ in length
    #[error("[DATA] Length mismatch in {stage} stage: expected {expected} samples, got {actual}")]
    LengthMismatch {
        /// Stage that compared the buffers
        stage: ProcessingStage,
        /// Length of the reference buffer
        expected: usize,
        /// Length of the offending buffer
        actual: usize,
    },

    /// Container or codec could not be read
    #[error("[DECODE] Failed to decode {format} input: {reason}")]
    Decode {
        /// Container name
        format: String,
        /// Underlying cause
        reason: String,
    },

    /// Cleaned buffer could not be written to the requested container
    #[error("[ENCODE] Failed to encode {format} output: {reason}")]
    Encode {
        /// Container name
        format: String,
        /// Underlying cause
        reason: String,
    },

    /// Configuration could not be loaded or parsed
    #[error("[CONFIG] {0}")]
    Config(String),

    /// Report or plot data could not be serialized
    #[error("[SERIALIZE] {0}")]
    Serialization(#[from] serde_json::Error),

    /// File system failure
    #[error("[IO] {0}")]
    Io(#[from] std::io::Error),
}

/// Pipeline stages used to tag errors and log records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingStage {
    /// Hum rejection
    NotchFilter,
    /// Noise reference selection
    NoiseProfile,
    /// Spectral subtraction
    SpectralDenoise,
    /// Before/after SNR measurement
    SnrEvaluation,
    /// Reading the upload
    Decode,
    /// Writing the cleaned file
    Encode,
    /// Plot data generation
    Visualization,
    /// Loading or validating settings
    Configuration,
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessingStage::NotchFilter => "notch filter",
            ProcessingStage::NoiseProfile => "noise profile",
            ProcessingStage::SpectralDenoise => "spectral denoise",
            ProcessingStage::SnrEvaluation => "SNR evaluation",
            ProcessingStage::Decode => "decode",
            ProcessingStage::Encode => "encode",
            ProcessingStage::Visualization => "visualization",
            ProcessingStage::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, RestoreError>;

impl RestoreError {
    /// Build an [`RestoreError::InvalidParameter`]
    pub fn invalid_parameter(
        stage: ProcessingStage,
        parameter: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RestoreError::InvalidParameter {
            stage,
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Build an [`RestoreError::Decode`] from any displayable cause
    pub fn decode(format: impl fmt::Display, reason: impl fmt::Display) -> Self {
        RestoreError::Decode {
            format: format.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Build an [`RestoreError::Encode`] from any displayable cause
    pub fn encode(format: impl fmt::Display, reason: impl fmt::Display) -> Self {
        RestoreError::Encode {
            format: format.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Stage the error originated from, when it is tied to one
    pub fn stage(&self) -> Option<ProcessingStage> {
        match self {
            RestoreError::InvalidParameter { stage, .. }
            | RestoreError::EmptyInput { stage }
            | RestoreError::LengthMismatch { stage, .. } => Some(*stage),
            RestoreError::Decode { .. } => Some(ProcessingStage::Decode),
            RestoreError::Encode { .. } => Some(ProcessingStage::Encode),
            RestoreError::Config(_) => Some(ProcessingStage::Configuration),
            RestoreError::Serialization(_) | RestoreError::Io(_) => None,
        }
    }

    /// True for errors caused by caller supplied parameters
    pub fn is_parameter_error(&self) -> bool {
        matches!(self, RestoreError::InvalidParameter { .. })
    }
}

impl From<config::ConfigError> for RestoreError {
    fn from(err: config::ConfigError) -> Self {
        RestoreError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for RestoreError {
    fn from(err: toml::ser::Error) -> Self {
        RestoreError::Config(err.to_string())
    }
}
