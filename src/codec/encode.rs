// src/codec/encode.rs
//! Encoding cleaned buffers for download

use crate::config::processing_config::{ExportConfig, ExportFormat};
use crate::error::{RestoreError, Result};
use crate::signal::SignalBuffer;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Scale by the buffer's own peak and quantize to signed `bits`-bit integers
///
/// The loudest sample lands on full scale, so playback loudness follows the
/// peak rather than the input level. A silent buffer quantizes to zeros.
pub fn quantize_peak_normalized(samples: &[f32], bits: u16) -> Vec<i32> {
    let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
    if peak == 0.0 || !peak.is_finite() {
        return vec![0; samples.len()];
    }
    let full_scale = ((1i64 << (bits.clamp(2, 32) - 1)) - 1) as f64;
    samples
        .iter()
        .map(|&s| (s as f64 / peak as f64 * full_scale) as i32)
        .collect()
}

/// Encode `signal` into the container described by `config`
pub fn encode(signal: &SignalBuffer, config: &ExportConfig) -> Result<Vec<u8>> {
    let bytes = match config.format {
        ExportFormat::Wav => encode_wav(signal, config.bit_depth)?,
        ExportFormat::Mp3 => encode_mp3(signal, config.bitrate_kbps)?,
    };
    debug!(format = %config.format, bytes = bytes.len(), "output encoded");
    Ok(bytes)
}

/// Encode and write to `path`
pub fn write_file<P: AsRef<Path>>(signal: &SignalBuffer, config: &ExportConfig, path: P) -> Result<()> {
    let bytes = encode(signal, config)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Mono PCM WAV at the requested bit depth
pub fn encode_wav(signal: &SignalBuffer, bit_depth: u16) -> Result<Vec<u8>> {
    if bit_depth != 16 && bit_depth != 24 {
        return Err(RestoreError::encode(
            ExportFormat::Wav,
            format!("unsupported bit depth {}", bit_depth),
        ));
    }
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: signal.sample_rate(),
        bits_per_sample: bit_depth,
        sample_format: hound::SampleFormat::Int,
    };

    let mut bytes = Vec::new();
    let mut writer =
        hound::WavWriter::new(Cursor::new(&mut bytes), spec).map_err(|e| RestoreError::encode(ExportFormat::Wav, e))?;
    for sample in quantize_peak_normalized(signal.samples(), bit_depth) {
        let written = if bit_depth == 16 {
            writer.write_sample(sample as i16)
        } else {
            writer.write_sample(sample)
        };
        written.map_err(|e| RestoreError::encode(ExportFormat::Wav, e))?;
    }
    writer.finalize().map_err(|e| RestoreError::encode(ExportFormat::Wav, e))?;
    Ok(bytes)
}

#[cfg(feature = "mp3")]
fn encode_mp3(signal: &SignalBuffer, bitrate_kbps: u32) -> Result<Vec<u8>> {
    use mp3lame_encoder::{Builder, FlushNoGap, InterleavedPcm, Quality};

    let fail = |what: &str, e: &dyn std::fmt::Debug| RestoreError::encode(ExportFormat::Mp3, format!("{}: {:?}", what, e));

    // LAME's interleaved entry point always expects two channels
    let stereo: Vec<i16> = quantize_peak_normalized(signal.samples(), 16)
        .into_iter()
        .flat_map(|s| [s as i16, s as i16])
        .collect();

    let mut builder = Builder::new().ok_or_else(|| RestoreError::encode(ExportFormat::Mp3, "failed to create LAME encoder"))?;
    builder.set_num_channels(2).map_err(|e| fail("channels", &e))?;
    builder.set_sample_rate(signal.sample_rate()).map_err(|e| fail("sample rate", &e))?;
    builder.set_brate(map_bitrate(bitrate_kbps)).map_err(|e| fail("bitrate", &e))?;
    builder.set_quality(Quality::Best).map_err(|e| fail("quality", &e))?;
    let mut encoder = builder.build().map_err(|e| fail("build", &e))?;

    let mut out: Vec<u8> = Vec::with_capacity(stereo.len() * 5 / 4 + 7200);
    let encoded = encoder
        .encode(InterleavedPcm(&stereo), out.spare_capacity_mut())
        .map_err(|e| fail("encode", &e))?;
    // SAFETY: the encoder initialised exactly `encoded` bytes of spare capacity
    unsafe { out.set_len(encoded) };

    out.reserve(7200);
    let flushed = encoder
        .flush::<FlushNoGap>(out.spare_capacity_mut())
        .map_err(|e| fail("flush", &e))?;
    // SAFETY: as above, `flushed` bytes past the current length were written
    unsafe { out.set_len(out.len() + flushed) };

    Ok(out)
}

#[cfg(not(feature = "mp3"))]
fn encode_mp3(_signal: &SignalBuffer, _bitrate_kbps: u32) -> Result<Vec<u8>> {
    Err(RestoreError::encode(
        ExportFormat::Mp3,
        "MP3 export requires building with the `mp3` feature",
    ))
}

/// Nearest LAME constant bitrate at or above `kbps`
#[cfg(feature = "mp3")]
fn map_bitrate(kbps: u32) -> mp3lame_encoder::Bitrate {
    use mp3lame_encoder::Bitrate;
    match kbps {
        0..=32 => Bitrate::Kbps32,
        33..=40 => Bitrate::Kbps40,
        41..=48 => Bitrate::Kbps48,
        49..=64 => Bitrate::Kbps64,
        65..=80 => Bitrate::Kbps80,
        81..=96 => Bitrate::Kbps96,
        97..=112 => Bitrate::Kbps112,
        113..=128 => Bitrate::Kbps128,
        129..=160 => Bitrate::Kbps160,
        161..=192 => Bitrate::Kbps192,
        193..=224 => Bitrate::Kbps224,
        225..=256 => Bitrate::Kbps256,
        _ => Bitrate::Kbps320,
    }
}
