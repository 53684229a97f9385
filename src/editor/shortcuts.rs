//! Keyboard shortcut surface
//!
//! | Key | Action |
//! |---|---|
//! | Space | play/stop |
//! | Ctrl+C | copy |
//! | Ctrl+X, Delete | cut |
//! | Ctrl+V | paste |
//! | Ctrl+S | save |
//! | Ctrl+Z | undo |
//! | Ctrl+Y | redo |

use serde::{Deserialize, Serialize};

/// Physical key, independent of keyboard layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCode {
    Space,
    Delete,
    /// A letter key, by its unshifted ASCII letter
    Letter(char),
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub code: KeyCode,
    pub ctrl: bool,
}

impl KeyPress {
    pub fn plain(code: KeyCode) -> Self {
        Self { code, ctrl: false }
    }

    pub fn ctrl(letter: char) -> Self {
        Self {
            code: KeyCode::Letter(letter),
            ctrl: true,
        }
    }
}

/// Editor action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shortcut {
    PlayStop,
    Copy,
    Cut,
    Paste,
    Save,
    Undo,
    Redo,
}

impl Shortcut {
    /// Resolve a key press; `None` for keys the editor leaves alone
    ///
    /// Space and Delete act with or without Ctrl.
    pub fn from_key(key: KeyPress) -> Option<Self> {
        match key.code {
            KeyCode::Space => Some(Shortcut::PlayStop),
            KeyCode::Delete => Some(Shortcut::Cut),
            KeyCode::Letter(c) if key.ctrl => match c.to_ascii_lowercase() {
                'c' => Some(Shortcut::Copy),
                'x' => Some(Shortcut::Cut),
                'v' => Some(Shortcut::Paste),
                's' => Some(Shortcut::Save),
                'z' => Some(Shortcut::Undo),
                'y' => Some(Shortcut::Redo),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Format seconds as `m:ss.cc`
///
/// ```
/// use wavedit::editor::format_time;
/// assert_eq!(format_time(75.5), "1:15.50");
/// ```
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let centis = ((seconds % 1.0) * 100.0).floor() as u64;
    format!("{}:{:02}.{:02}", mins, secs, centis)
}
