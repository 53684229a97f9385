//! Multi-segment merge
//!
//! Decodes a list of encoded segments and concatenates them in order at the
//! sample rate of the first decoded segment. A segment that fails to decode
//! is recorded and skipped; it never aborts the merge.

use log::{info, warn};

use crate::edit::ops::concatenate_for_merge;
use crate::engine::buffer::SampleBuffer;
use crate::engine::wav::Decoder;
use crate::error::{EditorError, Result};

/// A segment that could not be decoded
#[derive(Debug)]
pub struct SegmentFailure {
    /// Position of the segment in the input list
    pub index: usize,
    pub error: EditorError,
}

/// Outcome of a merge
#[derive(Debug)]
pub struct MergeReport {
    pub buffer: SampleBuffer,
    /// Number of segments that contributed audio
    pub merged: usize,
    pub failures: Vec<SegmentFailure>,
}

impl MergeReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Decode every segment and concatenate the ones that decoded
///
/// Fails only if concatenation itself fails; with every segment failing the
/// result is an empty mono buffer at `fallback_sample_rate`.
pub fn merge_segments<D, B>(
    decoder: &D,
    segments: &[B],
    fallback_sample_rate: u32,
) -> Result<MergeReport>
where
    D: Decoder + ?Sized,
    B: AsRef<[u8]>,
{
    let mut decoded = Vec::with_capacity(segments.len());
    let mut failures = Vec::new();

    for (index, bytes) in segments.iter().enumerate() {
        match decoder.decode(bytes.as_ref()) {
            Ok(buffer) => {
                let target_rate = decoded.iter().flatten().next().map(SampleBuffer::sample_rate);
                if let Some(rate) = target_rate.filter(|rate| *rate != buffer.sample_rate()) {
                    info!(
                        "[MERGE] Segment {} resampled {} Hz -> {} Hz",
                        index,
                        buffer.sample_rate(),
                        rate
                    );
                }
                decoded.push(Some(buffer));
            }
            Err(error) => {
                warn!("[MERGE] Segment {} skipped: {}", index, error);
                failures.push(SegmentFailure { index, error });
                decoded.push(None);
            }
        }
    }

    let buffer = concatenate_for_merge(decoded.iter().map(Option::as_ref), fallback_sample_rate)?;
    let merged = segments.len() - failures.len();
    info!(
        "[MERGE] Merged {} of {} segment(s) into {:.2}s",
        merged,
        segments.len(),
        buffer.duration_secs()
    );

    Ok(MergeReport {
        buffer,
        merged,
        failures,
    })
}
