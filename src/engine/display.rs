//! Displayable audio sources
//!
//! The playback engine and waveform renderer consume an encoded WAV source
//! rather than a `SampleBuffer`. Each source is a transient resource: it is
//! handed to the engine when published and released once it is superseded.
//! A `SourceHandle` is deliberately not `Clone`, so it can be released at
//! most once.

use std::sync::Arc;

use log::debug;
use uuid::Uuid;

use crate::engine::buffer::SampleBuffer;
use crate::engine::transport::PlaybackEngine;
use crate::engine::wav;
use crate::error::Result;

/// An encoded WAV blob the engine can load
#[derive(Debug)]
pub struct SourceHandle {
    id: Uuid,
    wav: Arc<[u8]>,
}

impl SourceHandle {
    /// Wrap encoded WAV bytes in a new source with a fresh id
    pub fn new(wav: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            wav: wav.into(),
        }
    }

    /// Encode a buffer and wrap it
    pub fn encode(buffer: &SampleBuffer) -> Result<Self> {
        Ok(Self::new(wav::encode(buffer)?))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The WAV container bytes
    pub fn bytes(&self) -> &[u8] {
        &self.wav
    }

    /// Shared handle to the bytes, for engines that keep them past `load`
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.wav)
    }
}

/// Owner of the source currently shown by the engine
///
/// Only the editor that owns the slot publishes to it. Publishing loads the
/// new source first and then releases the previous one, so the engine never
/// sees a gap.
#[derive(Debug, Default)]
pub struct DisplaySlot {
    current: Option<SourceHandle>,
}

impl DisplaySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode `buffer`, load it into the engine and release the superseded source
    ///
    /// Returns the id of the new source. If encoding fails the engine keeps
    /// showing the previous source.
    pub fn publish<E: PlaybackEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        buffer: &SampleBuffer,
    ) -> Result<Uuid> {
        let source = SourceHandle::encode(buffer)?;
        let id = source.id();
        engine.load(&source);
        if let Some(old) = self.current.replace(source) {
            debug!("[DISPLAY] Releasing superseded source {}", old.id());
            engine.release(old);
        }
        Ok(id)
    }

    /// Release the current source, leaving the slot empty
    pub fn release<E: PlaybackEngine + ?Sized>(&mut self, engine: &mut E) {
        if let Some(old) = self.current.take() {
            debug!("[DISPLAY] Releasing source {}", old.id());
            engine.release(old);
        }
    }

    pub fn current(&self) -> Option<&SourceHandle> {
        self.current.as_ref()
    }

    pub fn current_id(&self) -> Option<Uuid> {
        self.current.as_ref().map(SourceHandle::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingEngine {
        loaded: Vec<Uuid>,
        released: Vec<Uuid>,
    }

    impl PlaybackEngine for CountingEngine {
        fn load(&mut self, source: &SourceHandle) {
            self.loaded.push(source.id());
        }
        fn release(&mut self, source: SourceHandle) {
            self.released.push(source.id());
        }
        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn set_time(&mut self, _seconds: f64) {}
        fn play_region(&mut self, _start: f64, _end: f64) {}
    }

    #[test]
    fn test_publish_releases_previous_once() {
        let mut engine = CountingEngine::default();
        let mut slot = DisplaySlot::new();
        let buffer = SampleBuffer::silence(1, 16, 8000).unwrap();

        let first = slot.publish(&mut engine, &buffer).unwrap();
        assert!(engine.released.is_empty());

        let second = slot.publish(&mut engine, &buffer).unwrap();
        assert_ne!(first, second);
        assert_eq!(engine.loaded, vec![first, second]);
        assert_eq!(engine.released, vec![first]);
        assert_eq!(slot.current_id(), Some(second));

        slot.release(&mut engine);
        slot.release(&mut engine);
        assert_eq!(engine.released, vec![first, second]);
        assert!(slot.current().is_none());
    }

    #[test]
    fn test_source_bytes_are_wav() {
        let buffer = SampleBuffer::silence(2, 4, 8000).unwrap();
        let source = SourceHandle::encode(&buffer).unwrap();
        assert_eq!(&source.bytes()[0..4], b"RIFF");
        assert_eq!(source.shared_bytes().len(), source.bytes().len());
    }
}
