//! Single-slot audio clipboard

use std::sync::Arc;

use log::debug;

use crate::engine::buffer::SampleBuffer;

/// Holds at most one copied buffer
///
/// Copy and cut overwrite the slot; paste reads it without consuming it.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    content: Option<Arc<SampleBuffer>>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clipboard content
    pub fn set(&mut self, buffer: SampleBuffer) {
        debug!(
            "[CLIPBOARD] Holding {} frame(s) x {} channel(s)",
            buffer.frame_count(),
            buffer.channel_count()
        );
        self.content = Some(Arc::new(buffer));
    }

    pub fn get(&self) -> Option<&SampleBuffer> {
        self.content.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }

    pub fn clear(&mut self) {
        self.content = None;
    }
}
