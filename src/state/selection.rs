//! Selection and cursor model
//!
//! At most one of {selection, cursor} is active; `Mark` makes the "both set"
//! state unrepresentable. `SelectionModel` drives the pointer-gesture state
//! machine: the previous mark is discarded as soon as a new drag starts, not
//! when it ends.

use log::debug;
use serde::{Deserialize, Serialize};

// ============================================================================
// Selection
// ============================================================================

/// A time range in seconds with `0 <= start < end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    start: f64,
    end: f64,
}

impl Selection {
    /// Build a selection from two endpoints in either order
    ///
    /// Returns `None` for non-finite endpoints, negative times, or a
    /// zero-width range.
    pub fn new(a: f64, b: f64) -> Option<Self> {
        if !a.is_finite() || !b.is_finite() {
            return None;
        }
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        if start < 0.0 || start >= end {
            return None;
        }
        Some(Self { start, end })
    }

    /// Build a selection with both endpoints clamped into `[0, duration]`
    pub fn clamped(a: f64, b: f64, duration: f64) -> Option<Self> {
        let clamp = |t: f64| t.max(0.0).min(duration.max(0.0));
        if !a.is_finite() || !b.is_finite() {
            return None;
        }
        Self::new(clamp(a), clamp(b))
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Check whether a time lies inside the range, endpoints included
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }

    /// Frame bounds at a sample rate, both truncated toward negative infinity
    pub fn frame_bounds(&self, sample_rate: u32) -> (i64, i64) {
        let sr = sample_rate as f64;
        (
            (self.start * sr).floor() as i64,
            (self.end * sr).floor() as i64,
        )
    }
}

// ============================================================================
// Mark
// ============================================================================

/// The active selection, the active cursor, or neither
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Mark {
    #[default]
    None,
    Range(Selection),
    Cursor(f64),
}

impl Mark {
    pub fn selection(&self) -> Option<Selection> {
        match self {
            Mark::Range(sel) => Some(*sel),
            _ => None,
        }
    }

    pub fn cursor(&self) -> Option<f64> {
        match self {
            Mark::Cursor(t) => Some(*t),
            _ => None,
        }
    }
}

/// Observable gesture state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Selecting,
    Selected,
    CursorPlaced,
}

/// Outcome of a pointer press on the waveform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerDown {
    /// The press landed inside the current selection; nothing changed
    InsideSelection,
    /// A new drag started and the previous mark was cleared
    DragStarted { discarded: Option<Selection> },
}

/// Outcome of releasing the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerUp {
    /// No drag was in progress
    Ignored,
    /// The drag produced a selection
    Selected(Selection),
    /// The drag had zero width and became a cursor placement
    CursorPlaced {
        time: f64,
        discarded: Option<Selection>,
    },
}

/// Outcome of a click reported by the playback engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Click {
    NoSelection,
    Inside,
    Outside { discarded: Selection },
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    anchor: f64,
    discarded: Option<Selection>,
}

// ============================================================================
// Selection Model
// ============================================================================

/// Selection/cursor state plus the in-progress drag, if any
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    mark: Mark,
    drag: Option<Drag>,
    /// Set while a press that landed inside the selection is held
    inside_press: bool,
    duration: f64,
}

impl SelectionModel {
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
            ..Self::default()
        }
    }

    pub fn state(&self) -> SelectionState {
        if self.drag.is_some() {
            return SelectionState::Selecting;
        }
        match self.mark {
            Mark::None => SelectionState::Idle,
            Mark::Range(_) => SelectionState::Selected,
            Mark::Cursor(_) => SelectionState::CursorPlaced,
        }
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// The current selection, including the live range of a drag in progress
    pub fn selection(&self) -> Option<Selection> {
        self.mark.selection()
    }

    pub fn cursor(&self) -> Option<f64> {
        self.mark.cursor()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Update the audio duration, shrinking or dropping a mark that no longer fits
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration.max(0.0);
        self.mark = match self.mark {
            Mark::Range(sel) => Selection::clamped(sel.start, sel.end, self.duration)
                .map(Mark::Range)
                .unwrap_or(Mark::None),
            Mark::Cursor(t) => Mark::Cursor(t.min(self.duration)),
            Mark::None => Mark::None,
        };
    }

    // ------------------------------------------------------------------------
    // Pointer gestures
    // ------------------------------------------------------------------------

    /// Pointer pressed on the waveform
    pub fn pointer_down(&mut self, time: f64) -> PointerDown {
        let time = self.clamp_time(time);
        if let Mark::Range(sel) = self.mark {
            if self.drag.is_none() && sel.contains(time) {
                self.inside_press = true;
                return PointerDown::InsideSelection;
            }
        }

        let discarded = self.mark.selection();
        self.mark = Mark::None;
        self.inside_press = false;
        self.drag = Some(Drag {
            anchor: time,
            discarded,
        });
        debug!("[SELECTION] Drag started at {:.3}s", time);
        PointerDown::DragStarted { discarded }
    }

    /// Pointer moved while pressed; returns the live range of the drag
    pub fn pointer_move(&mut self, time: f64) -> Option<Selection> {
        let drag = self.drag?;
        let live = Selection::clamped(drag.anchor, time, self.duration);
        self.mark = live.map(Mark::Range).unwrap_or(Mark::None);
        live
    }

    /// Pointer released
    pub fn pointer_up(&mut self, time: f64) -> PointerUp {
        if self.inside_press {
            self.inside_press = false;
            return PointerUp::Ignored;
        }
        let Some(drag) = self.drag.take() else {
            return PointerUp::Ignored;
        };

        let time = self.clamp_time(time);
        match Selection::clamped(drag.anchor, time, self.duration) {
            Some(sel) => {
                self.mark = Mark::Range(sel);
                debug!(
                    "[SELECTION] Selected {:.3}s..{:.3}s",
                    sel.start(),
                    sel.end()
                );
                PointerUp::Selected(sel)
            }
            None => {
                self.mark = Mark::Cursor(time);
                debug!("[SELECTION] Zero-width drag, cursor at {:.3}s", time);
                PointerUp::CursorPlaced {
                    time,
                    discarded: drag.discarded,
                }
            }
        }
    }

    /// Abort a drag in progress; the previously discarded mark stays discarded
    pub fn cancel_drag(&mut self) {
        if self.drag.take().is_some() {
            self.mark = Mark::None;
        }
        self.inside_press = false;
    }

    /// A click outside of any drag, as reported by the playback engine
    pub fn click(&mut self, time: f64) -> Click {
        let Mark::Range(sel) = self.mark else {
            return Click::NoSelection;
        };
        if sel.contains(time) {
            return Click::Inside;
        }
        self.mark = Mark::Cursor(self.clamp_time(time));
        Click::Outside { discarded: sel }
    }

    // ------------------------------------------------------------------------
    // Programmatic changes
    // ------------------------------------------------------------------------

    /// Replace the mark with a selection (clamped to the duration)
    pub fn select(&mut self, start: f64, end: f64) -> Option<Selection> {
        self.drag = None;
        self.inside_press = false;
        let sel = Selection::clamped(start, end, self.duration);
        self.mark = sel.map(Mark::Range).unwrap_or(Mark::None);
        sel
    }

    /// Replace the mark with a cursor
    pub fn place_cursor(&mut self, time: f64) {
        self.mark = Mark::Cursor(self.clamp_time(time));
    }

    /// Drop the selection; the cursor goes too when `discard_cursor` is set
    pub fn clear_selection(&mut self, discard_cursor: bool) {
        self.drag = None;
        self.inside_press = false;
        match self.mark {
            Mark::Range(_) => self.mark = Mark::None,
            Mark::Cursor(_) if discard_cursor => self.mark = Mark::None,
            _ => {}
        }
    }

    fn clamp_time(&self, time: f64) -> f64 {
        if time.is_finite() {
            time.max(0.0).min(self.duration)
        } else {
            0.0
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
