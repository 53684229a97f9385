//! Wavedit - In-memory waveform editing engine
//!
//! Wavedit keeps a multi-channel sample buffer under a sequence of
//! destructive edits (cut, copy, paste, insert silence, gain) with a linear
//! undo/redo history, and drives an external playback engine through a
//! selection/loop state machine.
//!
//! # Architecture
//!
//! - `engine`: sample buffers, WAV codec, playback/loop controller and the
//!   displayable source handed to the playback engine
//! - `edit`: pure buffer operations and multi-segment merge
//! - `state`: history, clipboard, selection model and gain preview
//! - `editor`: `WaveformEditor`, which owns all of the above and handles
//!   gestures, engine events and keyboard shortcuts

pub mod config;
pub mod edit;
pub mod editor;
pub mod engine;
pub mod error;
pub mod state;

pub use config::EditorConfig;
pub use editor::WaveformEditor;
pub use engine::{PlaybackEngine, PlaybackEvent, SampleBuffer};
pub use error::{EditorError, Result};
