//! WAV codec for Wavedit
//!
//! Encoding always produces a 16-bit linear-PCM container. Decoding is a
//! pluggable capability (`Decoder`); `WavDecoder` is the built-in one and
//! accepts 8/16/24/32-bit integer and 32-bit float WAV data.

use std::io::Cursor;
use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::engine::buffer::SampleBuffer;
use crate::error::{EditorError, Result};

/// Bits per sample written by `encode`
pub const ENCODE_BITS_PER_SAMPLE: u16 = 16;

/// Capability that turns encoded audio bytes into a `SampleBuffer`
///
/// Implementations must yield at least one channel, equal-length channels
/// and a positive sample rate, or fail with `DecodeError`.
pub trait Decoder {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer>;
}

/// Decoder for RIFF/WAVE data backed by `hound`
#[derive(Debug, Clone, Copy, Default)]
pub struct WavDecoder;

impl Decoder for WavDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<SampleBuffer> {
        decode(bytes)
    }
}

/// Convert one float sample to a 16-bit PCM value
///
/// The sample is clamped to [-1, 1], scaled by 32767 when non-negative and by
/// 32768 when negative, then truncated toward zero.
#[inline]
pub fn sample_to_i16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    let scaled = if s < 0.0 { s * 32768.0 } else { s * 32767.0 };
    scaled as i16
}

/// Encode a buffer as a 16-bit PCM WAV container
///
/// Samples are written interleaved and little-endian. A NaN sample encodes
/// as zero.
pub fn encode(buffer: &SampleBuffer) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: buffer.channel_count() as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: ENCODE_BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(
        44 + buffer.frame_count() * buffer.channel_count() * 2,
    ));
    {
        let mut writer = WavWriter::new(&mut cursor, spec).map_err(hound_to_io)?;
        for frame in 0..buffer.frame_count() {
            for channel in buffer.channels() {
                writer
                    .write_sample(sample_to_i16(channel[frame]))
                    .map_err(hound_to_io)?;
            }
        }
        writer.finalize().map_err(hound_to_io)?;
    }

    Ok(cursor.into_inner())
}

/// Decode WAV bytes into a `SampleBuffer`
///
/// Integer samples are normalised by `2^(bits-1)`.
///
/// # Errors
/// `DecodeError` if the bytes are not a readable WAV container, the sample
/// layout is unsupported, or the data is truncated mid-frame.
pub fn decode(bytes: &[u8]) -> Result<SampleBuffer> {
    let reader = WavReader::new(Cursor::new(bytes))
        .map_err(|e| EditorError::decode(format!("not a readable WAV container: {}", e), e))?;

    let spec = reader.spec();
    let channel_count = spec.channels as usize;
    if channel_count == 0 {
        return Err(EditorError::DecodeError {
            reason: "WAV header declares zero channels".to_string(),
            source: None,
        });
    }

    let interleaved = read_samples_as_f32(reader, spec)?;
    if interleaved.len() % channel_count != 0 {
        return Err(EditorError::DecodeError {
            reason: format!(
                "sample data ends mid-frame ({} samples for {} channels)",
                interleaved.len(),
                channel_count
            ),
            source: None,
        });
    }

    SampleBuffer::from_interleaved(&interleaved, channel_count, spec.sample_rate).map_err(|e| {
        EditorError::DecodeError {
            reason: e.to_string(),
            source: None,
        }
    })
}

/// Read and decode a WAV file
pub fn read_wav_file(path: &Path) -> Result<SampleBuffer> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

/// Encode a buffer and write it to a file
pub fn write_wav_file(path: &Path, buffer: &SampleBuffer) -> Result<()> {
    let bytes = encode(buffer)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn read_samples_as_f32<R: std::io::Read>(reader: WavReader<R>, spec: WavSpec) -> Result<Vec<f32>> {
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| EditorError::decode(format!("failed reading float samples: {}", e), e)),
        (SampleFormat::Int, bits @ (8 | 16 | 24 | 32)) => {
            let scale = (1_i64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| {
                    EditorError::decode(format!("failed reading {}-bit samples: {}", bits, e), e)
                })
        }
        (format, bits) => Err(EditorError::DecodeError {
            reason: format!("unsupported sample layout: {:?} {}-bit", format, bits),
            source: None,
        }),
    }
}

fn hound_to_io(e: hound::Error) -> EditorError {
    match e {
        hound::Error::IoError(io) => EditorError::Io(io),
        other => EditorError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            other.to_string(),
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================
