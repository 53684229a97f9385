//! Sample Buffer
//!
//! Provides the immutable multi-channel PCM container every edit consumes
//! and produces. Samples are stored non-interleaved as 32-bit floats.

use crate::error::{EditorError, Result};

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear amplitude to decibels
///
/// Returns -f32::INFINITY for zero input.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Calculate the RMS (Root Mean Square) level of a buffer in dB
///
/// Returns -f32::INFINITY for empty or silent buffers.
pub fn calculate_rms(buffer: &SampleBuffer) -> f32 {
    let total_samples = buffer.channel_count() * buffer.frame_count();
    if total_samples == 0 {
        return f32::NEG_INFINITY;
    }

    let sum_squares: f64 = buffer
        .channels
        .iter()
        .flat_map(|channel| channel.iter())
        .map(|&s| (s as f64) * (s as f64))
        .sum();

    let rms = (sum_squares / total_samples as f64).sqrt() as f32;
    linear_to_db(rms)
}

/// Calculate the peak level of a buffer in dB
///
/// Returns -f32::INFINITY for empty buffers.
pub fn calculate_peak(buffer: &SampleBuffer) -> f32 {
    let peak = buffer
        .channels
        .iter()
        .flat_map(|channel| channel.iter())
        .map(|&s| s.abs())
        .fold(0.0_f32, f32::max);

    linear_to_db(peak)
}

// ============================================================================
// Sample Buffer
// ============================================================================

/// Decoded audio: `channel_count` arrays of `frame_count` samples each
///
/// A `SampleBuffer` is never mutated once built. Edit operations read one or
/// more buffers and allocate a new one, so a snapshot held by the history or
/// the clipboard stays valid for as long as it is referenced.
///
/// # Example
/// ```
/// use wavedit::engine::SampleBuffer;
///
/// let buffer = SampleBuffer::silence(2, 44100, 44100).unwrap();
/// assert_eq!(buffer.channel_count(), 2);
/// assert_eq!(buffer.frame_count(), 44100);
/// assert!((buffer.duration_secs() - 1.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Sample data: outer Vec is channels, inner Vec is frames
    channels: Vec<Vec<f32>>,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl SampleBuffer {
    /// Build a buffer from per-channel sample vectors
    ///
    /// # Errors
    /// `InvalidBuffer` if there are no channels, the channels differ in length,
    /// or the sample rate is zero.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if channels.is_empty() {
            return Err(EditorError::InvalidBuffer {
                reason: "buffer must have at least one channel".to_string(),
            });
        }
        if sample_rate == 0 {
            return Err(EditorError::InvalidBuffer {
                reason: "sample rate must be positive".to_string(),
            });
        }
        let frames = channels[0].len();
        if let Some(bad) = channels.iter().position(|ch| ch.len() != frames) {
            return Err(EditorError::InvalidBuffer {
                reason: format!(
                    "channel {} has {} frames, expected {}",
                    bad,
                    channels[bad].len(),
                    frames
                ),
            });
        }

        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Build a single-channel buffer
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(vec![samples], sample_rate)
    }

    /// Build a zero-filled buffer
    pub fn silence(channel_count: usize, frame_count: usize, sample_rate: u32) -> Result<Self> {
        Self::new(vec![vec![0.0_f32; frame_count]; channel_count], sample_rate)
    }

    /// Build a buffer from interleaved sample data (L, R, L, R, ... for stereo)
    pub fn from_interleaved(
        interleaved: &[f32],
        channel_count: usize,
        sample_rate: u32,
    ) -> Result<Self> {
        if channel_count == 0 {
            return Err(EditorError::InvalidBuffer {
                reason: "buffer must have at least one channel".to_string(),
            });
        }
        if interleaved.len() % channel_count != 0 {
            return Err(EditorError::InvalidBuffer {
                reason: format!(
                    "interleaved data length {} is not divisible by channel count {}",
                    interleaved.len(),
                    channel_count
                ),
            });
        }

        let frames = interleaved.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in interleaved.chunks_exact(channel_count) {
            for (ch, &sample) in frame.iter().enumerate() {
                channels[ch].push(sample);
            }
        }

        Self::new(channels, sample_rate)
    }

    /// Convert the buffer to interleaved order
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut interleaved = Vec::with_capacity(self.channel_count() * self.frame_count());
        for frame in 0..self.frame_count() {
            for channel in &self.channels {
                interleaved.push(channel[frame]);
            }
        }
        interleaved
    }

    /// Number of channels (always at least one)
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames per channel
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.channels.first().map(|ch| ch.len()).unwrap_or(0)
    }

    /// Check if the buffer holds no frames
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Duration in seconds
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Samples of one channel
    ///
    /// # Panics
    /// Panics if the channel index is out of bounds
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// All channels
    #[inline]
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Consume the buffer, returning its channel data
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Get a sample at the specified channel and frame
    #[inline]
    pub fn get_sample(&self, channel: usize, frame: usize) -> Option<f32> {
        self.channels
            .get(channel)
            .and_then(|ch| ch.get(frame).copied())
    }

    /// Frame index for a time in seconds, truncated toward negative infinity
    ///
    /// Not clamped: callers validate the result against `frame_count()`.
    #[inline]
    pub fn seconds_to_frame(&self, seconds: f64) -> i64 {
        (seconds * self.sample_rate as f64).floor() as i64
    }

    /// Time in seconds of a frame index
    #[inline]
    pub fn frame_to_seconds(&self, frame: usize) -> f64 {
        frame as f64 / self.sample_rate as f64
    }

    /// Check if all samples are finite (not NaN or Infinity)
    pub fn is_finite(&self) -> bool {
        self.channels
            .iter()
            .flat_map(|ch| ch.iter())
            .all(|s| s.is_finite())
    }

    /// Check whether two buffers share channel count and sample rate
    pub fn same_shape(&self, other: &SampleBuffer) -> bool {
        self.channel_count() == other.channel_count() && self.sample_rate == other.sample_rate
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ------------------------------------------------------------------------
    // Unit conversion tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_db_to_linear() {
        assert_relative_eq!(db_to_linear(0.0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(db_to_linear(-20.0), 0.1, epsilon = 1e-6);
        assert!(db_to_linear(-120.0) < 1e-5);
    }

    #[test]
    fn test_linear_to_db() {
        assert_relative_eq!(linear_to_db(1.0), 0.0, epsilon = 1e-6);
        assert_relative_eq!(linear_to_db(0.1), -20.0, epsilon = 1e-4);
        assert!(linear_to_db(0.0).is_infinite() && linear_to_db(0.0).is_sign_negative());
    }

    // ------------------------------------------------------------------------
    // Level tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_calculate_rms_silence() {
        let buffer = SampleBuffer::silence(1, 1000, 44100).unwrap();
        let rms = calculate_rms(&buffer);
        assert!(rms.is_infinite() && rms.is_sign_negative());
    }

    #[test]
    fn test_calculate_rms_unity() {
        let buffer = SampleBuffer::mono(vec![1.0; 1000], 44100).unwrap();
        assert!(calculate_rms(&buffer).abs() < 0.01);
    }

    #[test]
    fn test_calculate_peak_negative() {
        let mut samples = vec![0.0; 1000];
        samples[500] = -0.5;
        let buffer = SampleBuffer::mono(samples, 44100).unwrap();
        // -0.5 linear = -6.02 dB
        assert!((calculate_peak(&buffer) - (-6.02)).abs() < 0.1);
    }

    // ------------------------------------------------------------------------
    // Construction tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_new_rejects_zero_channels() {
        let result = SampleBuffer::new(vec![], 44100);
        assert!(matches!(result, Err(EditorError::InvalidBuffer { .. })));
    }

    #[test]
    fn test_new_rejects_ragged_channels() {
        let result = SampleBuffer::new(vec![vec![0.0; 4], vec![0.0; 3]], 44100);
        assert!(matches!(result, Err(EditorError::InvalidBuffer { .. })));
    }

    #[test]
    fn test_new_rejects_zero_sample_rate() {
        let result = SampleBuffer::mono(vec![0.0; 4], 0);
        assert!(matches!(result, Err(EditorError::InvalidBuffer { .. })));
    }

    #[test]
    fn test_zero_frames_allowed() {
        let buffer = SampleBuffer::silence(2, 0, 8000).unwrap();
        assert_eq!(buffer.channel_count(), 2);
        assert!(buffer.is_empty());
        assert_eq!(buffer.duration_secs(), 0.0);
    }

    #[test]
    fn test_from_interleaved_stereo() {
        let buffer =
            SampleBuffer::from_interleaved(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6], 2, 44100).unwrap();

        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.frame_count(), 3);
        assert_eq!(buffer.channel(0), &[0.1, 0.3, 0.5]);
        assert_eq!(buffer.channel(1), &[0.2, 0.4, 0.6]);
        assert_eq!(buffer.to_interleaved(), vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
    }

    #[test]
    fn test_from_interleaved_invalid() {
        let result = SampleBuffer::from_interleaved(&[0.1, 0.2, 0.3], 2, 44100);
        assert!(result.is_err());
    }

    // ------------------------------------------------------------------------
    // Time conversion tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_seconds_to_frame_floors() {
        let buffer = SampleBuffer::silence(1, 100, 10).unwrap();
        assert_eq!(buffer.seconds_to_frame(0.25), 2);
        assert_eq!(buffer.seconds_to_frame(0.29), 2);
        assert_eq!(buffer.seconds_to_frame(-0.05), -1);
        assert_relative_eq!(buffer.frame_to_seconds(25), 2.5);
    }

    #[test]
    fn test_get_sample_bounds() {
        let buffer = SampleBuffer::mono(vec![0.5; 4], 44100).unwrap();
        assert_eq!(buffer.get_sample(0, 3), Some(0.5));
        assert_eq!(buffer.get_sample(0, 4), None);
        assert_eq!(buffer.get_sample(1, 0), None);
    }

    #[test]
    fn test_is_finite() {
        assert!(SampleBuffer::mono(vec![0.5; 8], 44100).unwrap().is_finite());
        assert!(!SampleBuffer::mono(vec![f32::NAN; 8], 44100)
            .unwrap()
            .is_finite());
    }
}
