// src/codec/decode.rs
//! Decoding WAV and MP3 uploads into mono sample buffers

use super::InputFormat;
use crate::config::constants::input::MAX_INPUT_BYTES;
use crate::error::{RestoreError, Result};
use crate::signal::SignalBuffer;
use std::io::Cursor;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Decode an in-memory upload, averaging all channels down to mono
pub fn decode(bytes: &[u8], format: InputFormat) -> Result<SignalBuffer> {
    if bytes.len() as u64 > MAX_INPUT_BYTES {
        warn!(
            size_mb = bytes.len() as f64 / (1024.0 * 1024.0),
            limit_mb = MAX_INPUT_BYTES / (1024 * 1024),
            "input exceeds the recommended size and may be slow to process"
        );
    }
    let signal = match format {
        InputFormat::Wav => decode_wav(bytes)?,
        InputFormat::Mp3 => decode_compressed(bytes, format)?,
    };
    debug!(
        %format,
        samples = signal.len(),
        sample_rate = signal.sample_rate(),
        "input decoded"
    );
    Ok(signal)
}

/// Read and decode a file, picking the container from its extension
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<SignalBuffer> {
    let path = path.as_ref();
    let format = InputFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    decode(&bytes, format)
}

fn decode_wav(bytes: &[u8]) -> Result<SignalBuffer> {
    let reader = hound::WavReader::new(Cursor::new(bytes)).map_err(|e| RestoreError::decode("wav", e))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| RestoreError::decode("wav", e))?,
        hound::SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| RestoreError::decode("wav", e))?
        }
    };

    SignalBuffer::new(downmix(&interleaved, channels), spec.sample_rate)
}

fn decode_compressed(bytes: &[u8], format: InputFormat) -> Result<SignalBuffer> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());
    let mut hint = Hint::new();
    hint.with_extension(&format.to_string());

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| RestoreError::decode(format, e))?;
    let mut reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| RestoreError::decode(format, "no audio track"))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| RestoreError::decode(format, "unknown sample rate"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| RestoreError::decode(format, e))?;

    let mut mono = Vec::new();
    let mut skipped_packets = 0usize;
    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(e) => return Err(RestoreError::decode(format, e)),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // a corrupt frame is dropped, the rest of the stream is still usable
            Err(symphonia::core::errors::Error::DecodeError(_)) => {
                skipped_packets += 1;
                continue;
            }
            Err(e) => return Err(RestoreError::decode(format, e)),
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count().max(1);
        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        mono.extend(downmix(buffer.samples(), channels));
    }

    if skipped_packets > 0 {
        warn!(skipped_packets, "dropped undecodable packets");
    }
    SignalBuffer::new(mono, sample_rate)
}

/// Average interleaved frames into one channel
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(channels: u16, samples: &[i16]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut bytes = Vec::new();
        {
            let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        bytes
    }

    #[test]
    fn test_downmix_averages_frames() {
        assert_eq!(downmix(&[1.0, 0.0, 0.5, 0.5], 2), vec![0.5, 0.5]);
        assert_eq!(downmix(&[0.25, -0.25], 1), vec![0.25, -0.25]);
    }

    #[test]
    fn test_decode_stereo_wav_to_mono() {
        let bytes = wav_bytes(2, &[16384, 0, -16384, -16384]);
        let signal = decode(&bytes, InputFormat::Wav).unwrap();
        assert_eq!(signal.sample_rate(), 8000);
        assert_eq!(signal.len(), 2);
        assert!((signal.samples()[0] - 0.25).abs() < 1e-6);
        assert!((signal.samples()[1] + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let garbage = vec![0x42u8; 256];
        assert!(matches!(
            decode(&garbage, InputFormat::Wav),
            Err(RestoreError::Decode { .. })
        ));
        assert!(matches!(
            decode(&garbage, InputFormat::Mp3),
            Err(RestoreError::Decode { .. })
        ));
    }
}
