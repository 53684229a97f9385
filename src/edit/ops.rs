//! Buffer edit operations
//!
//! Every operation reads its inputs and allocates a new `SampleBuffer`;
//! nothing here mutates an existing buffer.
//!
//! Channel mapping differs by operation family:
//! - clipboard operations (`replace_selection`, `insert_at_position`) read
//!   clip channel `c % clip.channel_count()`, so mono content is broadcast
//!   into every channel of a multi-channel source;
//! - `concatenate_for_merge` reads segment channel
//!   `min(c, segment.channel_count() - 1)`, repeating the last channel.

use std::borrow::Cow;
use std::ops::Range;

use log::debug;

use crate::engine::buffer::SampleBuffer;
use crate::error::{EditorError, Result};

// ============================================================================
// Validation
// ============================================================================

fn require_clip(clip: Option<&SampleBuffer>) -> Result<&SampleBuffer> {
    match clip {
        None => Err(EditorError::InvalidClipboard {
            reason: "clipboard is empty".to_string(),
        }),
        Some(c) if c.channel_count() == 0 => Err(EditorError::InvalidClipboard {
            reason: "clipboard buffer must have at least one channel".to_string(),
        }),
        Some(c) => Ok(c),
    }
}

fn check_range(source: &SampleBuffer, start: i64, end: i64) -> Result<Range<usize>> {
    let len = source.frame_count();
    if start < 0 || end > len as i64 || start >= end {
        return Err(EditorError::InvalidRange { start, end, len });
    }
    Ok(start as usize..end as usize)
}

fn check_position(source: &SampleBuffer, position: i64) -> Result<usize> {
    let len = source.frame_count();
    if position < 0 || position > len as i64 {
        return Err(EditorError::InvalidPosition { position, len });
    }
    Ok(position as usize)
}

fn rebuild(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<SampleBuffer> {
    SampleBuffer::new(channels, sample_rate)
}

// ============================================================================
// Clipboard operations
// ============================================================================

/// Replace frames `[start, end)` of `source` with the whole of `clip`
///
/// Result length is `source.frame_count() - (end - start) + clip.frame_count()`
/// with the source's channel count and sample rate.
///
/// # Errors
/// * `InvalidClipboard` - `clip` is missing or has no channels
/// * `InvalidRange` - `start < 0`, `end > source.frame_count()` or `start >= end`
pub fn replace_selection(
    source: &SampleBuffer,
    clip: Option<&SampleBuffer>,
    start: i64,
    end: i64,
) -> Result<SampleBuffer> {
    let clip = require_clip(clip)?;
    let range = check_range(source, start, end)?;
    let new_len = source.frame_count() - range.len() + clip.frame_count();

    let channels = source
        .channels()
        .iter()
        .enumerate()
        .map(|(c, data)| {
            let clip_data = clip.channel(c % clip.channel_count());
            let mut out = Vec::with_capacity(new_len);
            out.extend_from_slice(&data[..range.start]);
            out.extend_from_slice(clip_data);
            out.extend_from_slice(&data[range.end..]);
            out
        })
        .collect();

    debug!(
        "[EDIT] Replaced frames {}..{} with {} clip frame(s)",
        range.start,
        range.end,
        clip.frame_count()
    );
    rebuild(channels, source.sample_rate())
}

/// Insert the whole of `clip` before frame `position` of `source`
///
/// `position == 0` prepends, `position == source.frame_count()` appends.
///
/// # Errors
/// * `InvalidClipboard` - `clip` is missing or has no channels
/// * `InvalidPosition` - `position < 0` or `position > source.frame_count()`
pub fn insert_at_position(
    source: &SampleBuffer,
    clip: Option<&SampleBuffer>,
    position: i64,
) -> Result<SampleBuffer> {
    let clip = require_clip(clip)?;
    let position = check_position(source, position)?;
    let new_len = source.frame_count() + clip.frame_count();

    let channels = source
        .channels()
        .iter()
        .enumerate()
        .map(|(c, data)| {
            let clip_data = clip.channel(c % clip.channel_count());
            let mut out = Vec::with_capacity(new_len);
            out.extend_from_slice(&data[..position]);
            out.extend_from_slice(clip_data);
            out.extend_from_slice(&data[position..]);
            out
        })
        .collect();

    debug!(
        "[EDIT] Inserted {} frame(s) at {}",
        clip.frame_count(),
        position
    );
    rebuild(channels, source.sample_rate())
}

// ============================================================================
// Range operations
// ============================================================================

/// Copy frames `[start, end)` of every channel into a new buffer
pub fn extract_range(source: &SampleBuffer, start: i64, end: i64) -> Result<SampleBuffer> {
    let range = check_range(source, start, end)?;
    let channels = source
        .channels()
        .iter()
        .map(|data| data[range.clone()].to_vec())
        .collect();
    rebuild(channels, source.sample_rate())
}

/// Remove frames `[start, end)` from every channel
pub fn delete_range(source: &SampleBuffer, start: i64, end: i64) -> Result<SampleBuffer> {
    let range = check_range(source, start, end)?;
    let channels = source
        .channels()
        .iter()
        .map(|data| {
            let mut out = Vec::with_capacity(data.len() - range.len());
            out.extend_from_slice(&data[..range.start]);
            out.extend_from_slice(&data[range.end..]);
            out
        })
        .collect();
    rebuild(channels, source.sample_rate())
}

// ============================================================================
// Gain and silence
// ============================================================================

/// Multiply the samples inside `range` by `multiplier`, clamping to [-1, 1]
///
/// Samples outside the range are copied unchanged. `None` scales the whole
/// buffer. A range reaching past the end is cut at the end. A product that
/// is NaN becomes 0.
pub fn scale_gain(
    source: &SampleBuffer,
    multiplier: f32,
    range: Option<Range<usize>>,
) -> SampleBuffer {
    let len = source.frame_count();
    let range = range.unwrap_or(0..len);
    let start = range.start.min(len);
    let end = range.end.min(len).max(start);

    let channels: Vec<Vec<f32>> = source
        .channels()
        .iter()
        .map(|data| {
            let mut out = data.clone();
            for sample in &mut out[start..end] {
                let scaled = *sample * multiplier;
                *sample = if scaled.is_nan() {
                    0.0
                } else {
                    scaled.clamp(-1.0, 1.0)
                };
            }
            out
        })
        .collect();

    // Same shape as `source`, which is already valid.
    SampleBuffer::new(channels, source.sample_rate()).unwrap_or_else(|_| source.clone())
}

/// Insert `duration_secs` of silence before frame `position`
///
/// The silence has `round(sample_rate * duration_secs)` frames and the
/// source's channel count and sample rate.
///
/// # Errors
/// * `InvalidBuffer` - `duration_secs` is negative or not finite
/// * `InvalidPosition` - as for `insert_at_position`
pub fn insert_silence(
    source: &SampleBuffer,
    duration_secs: f64,
    position: i64,
) -> Result<SampleBuffer> {
    if !duration_secs.is_finite() || duration_secs < 0.0 {
        return Err(EditorError::InvalidBuffer {
            reason: format!("silence length must be a non-negative number, got {}", duration_secs),
        });
    }
    let frames = (source.sample_rate() as f64 * duration_secs).round() as usize;
    let silence = SampleBuffer::silence(source.channel_count(), frames, source.sample_rate())?;
    insert_at_position(source, Some(&silence), position)
}

// ============================================================================
// Resampling
// ============================================================================

/// Linearly interpolate `source` to `target_rate`
///
/// The result has `round(frames * target_rate / source_rate)` frames, so the
/// duration is preserved to within one frame. A buffer already at
/// `target_rate` is returned as a copy.
pub fn resample_linear(source: &SampleBuffer, target_rate: u32) -> Result<SampleBuffer> {
    let source_rate = source.sample_rate();
    if source_rate == target_rate {
        return Ok(source.clone());
    }

    let frames = source.frame_count();
    let ratio = source_rate as f64 / target_rate as f64;
    let out_frames = (frames as f64 / ratio).round() as usize;

    let channels = (0..source.channel_count())
        .map(|c| {
            let input = source.channel(c);
            (0..out_frames)
                .map(|i| {
                    let pos = i as f64 * ratio;
                    let i0 = (pos.floor() as usize).min(frames.saturating_sub(1));
                    let i1 = (i0 + 1).min(frames.saturating_sub(1));
                    let frac = (pos - i0 as f64).clamp(0.0, 1.0) as f32;
                    input[i0] + (input[i1] - input[i0]) * frac
                })
                .collect()
        })
        .collect();

    debug!(
        "[EDIT] Resampled {} frame(s) {} Hz -> {} frame(s) {} Hz",
        frames, source_rate, out_frames, target_rate
    );
    rebuild(channels, target_rate)
}

// ============================================================================
// Merge
// ============================================================================

/// Concatenate segments end to end, skipping missing ones
///
/// Channel count and sample rate come from the first present segment; with
/// no segment present the result is an empty mono buffer at
/// `fallback_sample_rate`. Later segments at another rate are resampled to
/// it. Output channel `c` of each segment is read from its channel
/// `min(c, segment.channel_count() - 1)`.
pub fn concatenate_for_merge<'a, I>(buffers: I, fallback_sample_rate: u32) -> Result<SampleBuffer>
where
    I: IntoIterator<Item = Option<&'a SampleBuffer>>,
{
    let present: Vec<&SampleBuffer> = buffers.into_iter().flatten().collect();
    let Some(first) = present.first() else {
        return SampleBuffer::silence(1, 0, fallback_sample_rate);
    };

    let channel_count = first.channel_count();
    let sample_rate = first.sample_rate();
    let present: Vec<Cow<'_, SampleBuffer>> = present
        .into_iter()
        .map(|segment| {
            if segment.sample_rate() == sample_rate {
                Ok(Cow::Borrowed(segment))
            } else {
                resample_linear(segment, sample_rate).map(Cow::Owned)
            }
        })
        .collect::<Result<_>>()?;
    let total: usize = present.iter().map(|b| b.frame_count()).sum();

    let mut channels = vec![Vec::with_capacity(total); channel_count];
    for segment in &present {
        let last = segment.channel_count() - 1;
        for (c, out) in channels.iter_mut().enumerate() {
            out.extend_from_slice(segment.channel(c.min(last)));
        }
    }

    debug!(
        "[EDIT] Concatenated {} segment(s) into {} frame(s)",
        present.len(),
        total
    );
    rebuild(channels, sample_rate)
}

// ============================================================================
// Tests
// ============================================================================
