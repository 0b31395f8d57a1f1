// src/codec/mod.rs
//! Container boundary: decoding uploads into mono buffers and encoding results
//!
//! The restoration core only ever sees a [`SignalBuffer`](crate::signal::SignalBuffer).
//! The input container is resolved once, up front, into an [`InputFormat`];
//! nothing downstream sniffs formats again.

pub mod decode;
pub mod encode;

pub use decode::{decode, decode_file};
pub use encode::{encode, encode_wav, quantize_peak_normalized, write_file};

use crate::error::{RestoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Supported upload containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// RIFF WAVE, any PCM or float layout hound reads
    Wav,
    /// MPEG-1/2 Layer III
    Mp3,
}

impl InputFormat {
    /// Resolve from a file extension, case-insensitively
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "wav" | "wave" => Some(InputFormat::Wav),
            "mp3" => Some(InputFormat::Mp3),
            _ => None,
        }
    }

    /// Resolve from a MIME type as reported by an upload form
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => Some(InputFormat::Wav),
            "audio/mpeg" | "audio/mp3" | "audio/mpeg3" => Some(InputFormat::Mp3),
            _ => None,
        }
    }

    /// Resolve from the extension of `path`
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| {
                RestoreError::decode(
                    path.display(),
                    "unsupported file extension, expected .wav or .mp3",
                )
            })
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Wav => f.write_str("wav"),
            InputFormat::Mp3 => f.write_str("mp3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_resolution() {
        assert_eq!(InputFormat::from_extension("WAV"), Some(InputFormat::Wav));
        assert_eq!(InputFormat::from_extension("mp3"), Some(InputFormat::Mp3));
        assert_eq!(InputFormat::from_extension("flac"), None);
        assert_eq!(InputFormat::from_mime("audio/mpeg"), Some(InputFormat::Mp3));
        assert_eq!(InputFormat::from_mime("audio/x-wav"), Some(InputFormat::Wav));
        assert_eq!(InputFormat::from_mime("video/mp4"), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(InputFormat::from_path(Path::new("old/tape.Mp3")).unwrap(), InputFormat::Mp3);
        assert!(InputFormat::from_path(Path::new("notes.txt")).is_err());
        assert!(InputFormat::from_path(Path::new("no_extension")).is_err());
    }
}
