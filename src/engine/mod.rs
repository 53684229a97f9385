//! Audio Engine Module
//!
//! Core audio plumbing:
//! - Sample buffer container
//! - WAV encode/decode
//! - Playback/loop state machine and the engine interface
//! - Displayable source lifecycle

pub mod buffer;
pub mod display;
pub mod transport;
pub mod wav;

pub use buffer::SampleBuffer;
pub use display::{DisplaySlot, SourceHandle};
pub use transport::{
    LoopController, PlaybackEngine, PlaybackEvent, SeekDisposition, TransportState,
};
pub use wav::{Decoder, WavDecoder};
