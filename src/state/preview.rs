//! Gain preview
//!
//! Interactive gain drags render a preview buffer derived from a baseline
//! captured at drag start. The preview lives in its own slot and never
//! reaches `History`; only `finish` yields a buffer to commit.

use std::ops::Range;
use std::sync::Arc;

use log::debug;

use crate::edit::ops::scale_gain;
use crate::engine::buffer::SampleBuffer;

/// Neutral multiplier shown when no drag is in progress
pub const NEUTRAL_GAIN: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct GainPreview {
    baseline: Option<Arc<SampleBuffer>>,
    multiplier: f32,
}

impl Default for GainPreview {
    fn default() -> Self {
        Self {
            baseline: None,
            multiplier: NEUTRAL_GAIN,
        }
    }
}

impl GainPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the committed buffer as the drag baseline
    ///
    /// A drag already in progress keeps its original baseline.
    pub fn begin(&mut self, committed: &Arc<SampleBuffer>) {
        if self.baseline.is_none() {
            self.baseline = Some(Arc::clone(committed));
            debug!("[PREVIEW] Gain drag started");
        }
    }

    pub fn is_active(&self) -> bool {
        self.baseline.is_some()
    }

    /// The multiplier currently displayed
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn baseline(&self) -> Option<&Arc<SampleBuffer>> {
        self.baseline.as_ref()
    }

    /// Render the baseline at `multiplier`; `None` when no drag is active
    pub fn update(&mut self, multiplier: f32, range: Option<Range<usize>>) -> Option<SampleBuffer> {
        let baseline = self.baseline.as_ref()?;
        self.multiplier = multiplier;
        Some(scale_gain(baseline, multiplier, range))
    }

    /// End the drag and return the buffer to commit
    ///
    /// The displayed multiplier keeps the final value until
    /// [`reset_display`](Self::reset_display) is called after the commit.
    pub fn finish(&mut self, multiplier: f32, range: Option<Range<usize>>) -> Option<SampleBuffer> {
        let baseline = self.baseline.take()?;
        self.multiplier = multiplier;
        debug!("[PREVIEW] Gain drag finished at x{:.2}", multiplier);
        Some(scale_gain(&baseline, multiplier, range))
    }

    /// Drop the drag without producing a commit; returns whether one was active
    pub fn abandon(&mut self) -> bool {
        self.multiplier = NEUTRAL_GAIN;
        let was_active = self.baseline.take().is_some();
        if was_active {
            debug!("[PREVIEW] Gain drag abandoned");
        }
        was_active
    }

    /// Show the neutral multiplier again; touches nothing else
    pub fn reset_display(&mut self) {
        self.multiplier = NEUTRAL_GAIN;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn committed() -> Arc<SampleBuffer> {
        Arc::new(SampleBuffer::mono(vec![0.2, 0.4, -0.2, 0.1], 8000).unwrap())
    }

    #[test]
    fn test_update_always_scales_baseline() {
        let mut preview = GainPreview::new();
        preview.begin(&committed());

        preview.update(2.0, None);
        let second = preview.update(1.5, None).unwrap();

        // 1.5x the baseline, not 1.5x the previous preview
        assert_relative_eq!(second.channel(0)[1], 0.6, epsilon = 1e-6);
        assert_relative_eq!(preview.multiplier(), 1.5);
    }

    #[test]
    fn test_begin_keeps_first_baseline() {
        let first = committed();
        let mut preview = GainPreview::new();
        preview.begin(&first);
        preview.begin(&Arc::new(SampleBuffer::silence(1, 4, 8000).unwrap()));

        assert!(Arc::ptr_eq(preview.baseline().unwrap(), &first));
    }

    #[test]
    fn test_finish_then_reset_display() {
        let mut preview = GainPreview::new();
        preview.begin(&committed());

        let result = preview.finish(0.5, Some(0..2)).unwrap();
        assert_relative_eq!(result.channel(0)[0], 0.1, epsilon = 1e-6);
        assert_relative_eq!(result.channel(0)[2], -0.2, epsilon = 1e-6);
        assert!(!preview.is_active());
        assert_relative_eq!(preview.multiplier(), 0.5);

        preview.reset_display();
        assert_relative_eq!(preview.multiplier(), NEUTRAL_GAIN);
    }

    #[test]
    fn test_inactive_preview_yields_nothing() {
        let mut preview = GainPreview::new();
        assert!(preview.update(2.0, None).is_none());
        assert!(preview.finish(2.0, None).is_none());
        assert!(!preview.abandon());
    }

    #[test]
    fn test_abandon_discards_baseline() {
        let mut preview = GainPreview::new();
        preview.begin(&committed());
        preview.update(2.0, None);

        assert!(preview.abandon());
        assert!(!preview.is_active());
        assert_relative_eq!(preview.multiplier(), NEUTRAL_GAIN);
    }
}
