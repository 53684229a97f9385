//! State Management Module
//!
//! Editor state that survives between gestures: undo/redo history, the
//! clipboard, the selection/cursor model and the gain preview slot.

pub mod clipboard;
pub mod history;
pub mod preview;
pub mod selection;

pub use clipboard::Clipboard;
pub use history::{EditKind, History, HistoryEntry, HistorySummary};
pub use preview::GainPreview;
pub use selection::{Click, Mark, PointerDown, PointerUp, Selection, SelectionModel, SelectionState};
