//! Undo/Redo History
//!
//! A linear log of buffer snapshots with a cursor. Committing truncates any
//! redo branch before appending. The snapshot at index 0 (the freshly
//! decoded original) is never discarded.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::buffer::SampleBuffer;

/// Kind of edit that produced a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    /// The decoded original
    Open,
    Cut,
    Paste,
    InsertSilence,
    Gain,
}

impl std::fmt::Display for EditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditKind::Open => write!(f, "Open"),
            EditKind::Cut => write!(f, "Cut"),
            EditKind::Paste => write!(f, "Paste"),
            EditKind::InsertSilence => write!(f, "Insert Silence"),
            EditKind::Gain => write!(f, "Gain"),
        }
    }
}

/// One snapshot in the history
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub kind: EditKind,
    pub timestamp: DateTime<Utc>,
    pub buffer: Arc<SampleBuffer>,
}

impl HistoryEntry {
    fn new(kind: EditKind, buffer: Arc<SampleBuffer>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            timestamp: Utc::now(),
            buffer,
        }
    }
}

/// Serializable description of a snapshot, for history views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub id: Uuid,
    pub kind: EditKind,
    pub timestamp: DateTime<Utc>,
    pub frames: usize,
    pub current: bool,
}

/// Linear undo/redo log
///
/// Invariant: `index < entries.len()` and `entries` is never empty.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
    max_entries: Option<usize>,
}

impl History {
    /// Start a history holding only the original buffer
    pub fn new(original: Arc<SampleBuffer>) -> Self {
        Self {
            entries: vec![HistoryEntry::new(EditKind::Open, original)],
            index: 0,
            max_entries: None,
        }
    }

    /// Start a history that keeps at most `max_entries` snapshots
    ///
    /// The limit is raised to 2 if lower, so the original and the current
    /// snapshot always fit.
    pub fn with_limit(original: Arc<SampleBuffer>, max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries.max(2)),
            ..Self::new(original)
        }
    }

    /// Record a new snapshot, discarding any redo branch
    pub fn commit(&mut self, buffer: Arc<SampleBuffer>, kind: EditKind) -> Arc<SampleBuffer> {
        let dropped = self.entries.len() - (self.index + 1);
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry::new(kind, Arc::clone(&buffer)));
        self.index = self.entries.len() - 1;
        self.trim();
        info!(
            "[HISTORY] Committed {} ({} frames), discarded {} redo snapshot(s)",
            kind,
            buffer.frame_count(),
            dropped
        );
        buffer
    }

    /// Step back one snapshot; `None` at the original
    pub fn undo(&mut self) -> Option<Arc<SampleBuffer>> {
        if self.index == 0 {
            debug!("[HISTORY] Nothing to undo");
            return None;
        }
        self.index -= 1;
        Some(Arc::clone(&self.entries[self.index].buffer))
    }

    /// Step forward one snapshot; `None` at the newest
    pub fn redo(&mut self) -> Option<Arc<SampleBuffer>> {
        if self.index + 1 >= self.entries.len() {
            debug!("[HISTORY] Nothing to redo");
            return None;
        }
        self.index += 1;
        Some(Arc::clone(&self.entries[self.index].buffer))
    }

    /// The active snapshot
    pub fn current(&self) -> &Arc<SampleBuffer> {
        &self.entries[self.index].buffer
    }

    pub fn current_entry(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    /// The decoded original (index 0)
    pub fn original(&self) -> &Arc<SampleBuffer> {
        &self.entries[0].buffer
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the original is never discarded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Edit kinds in order, oldest first
    pub fn labels(&self) -> Vec<EditKind> {
        self.entries.iter().map(|e| e.kind).collect()
    }

    pub fn summary(&self) -> Vec<HistorySummary> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| HistorySummary {
                id: e.id,
                kind: e.kind,
                timestamp: e.timestamp,
                frames: e.buffer.frame_count(),
                current: i == self.index,
            })
            .collect()
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    /// Drop the oldest non-original snapshots beyond the limit
    fn trim(&mut self) {
        let Some(max) = self.max_entries else {
            return;
        };
        while self.entries.len() > max && self.index > 1 {
            let removed = self.entries.remove(1);
            self.index -= 1;
            debug!("[HISTORY] Trimmed snapshot {} ({})", removed.id, removed.kind);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(value: f32) -> Arc<SampleBuffer> {
        Arc::new(SampleBuffer::mono(vec![value; 4], 8000).unwrap())
    }

    #[test]
    fn test_new_history_has_original() {
        let original = buffer(0.0);
        let history = History::new(Arc::clone(&original));

        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
        assert!(Arc::ptr_eq(history.current(), &original));
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.labels(), vec![EditKind::Open]);
    }

    #[test]
    fn test_commit_advances_index() {
        let mut history = History::new(buffer(0.0));
        history.commit(buffer(0.1), EditKind::Cut);
        history.commit(buffer(0.2), EditKind::Paste);

        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert_eq!(history.current().channel(0)[0], 0.2);
    }

    #[test]
    fn test_undo_stops_at_original() {
        let original = buffer(0.0);
        let mut history = History::new(Arc::clone(&original));
        history.commit(buffer(0.1), EditKind::Gain);

        let undone = history.undo().unwrap();
        assert!(Arc::ptr_eq(&undone, &original));
        assert!(history.undo().is_none());
        assert_eq!(history.index(), 0);
    }

    #[test]
    fn test_undo_redo_returns_same_snapshot() {
        let mut history = History::new(buffer(0.0));
        let edited = history.commit(buffer(0.5), EditKind::Gain);

        history.undo();
        let redone = history.redo().unwrap();
        assert!(Arc::ptr_eq(&redone, &edited));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_commit_discards_redo_branch() {
        let mut history = History::new(buffer(0.0));
        history.commit(buffer(0.1), EditKind::Cut);
        history.commit(buffer(0.2), EditKind::Cut);
        history.undo();
        history.undo();
        assert!(history.can_redo());

        history.commit(buffer(0.9), EditKind::Paste);
        assert!(!history.can_redo());
        assert_eq!(history.len(), 2);
        assert_eq!(
            history.labels(),
            vec![EditKind::Open, EditKind::Paste]
        );
    }

    #[test]
    fn test_limit_never_drops_original() {
        let original = buffer(0.0);
        let mut history = History::with_limit(Arc::clone(&original), 3);
        for i in 1..=5 {
            history.commit(buffer(i as f32 / 10.0), EditKind::Gain);
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), 2);
        assert!(Arc::ptr_eq(history.original(), &original));
        assert_eq!(history.current().channel(0)[0], 0.5);

        history.undo();
        history.undo();
        assert!(Arc::ptr_eq(history.current(), &original));
    }

    #[test]
    fn test_limit_floor_is_two() {
        let history = History::with_limit(buffer(0.0), 0);
        assert_eq!(history.max_entries(), Some(2));
    }

    #[test]
    fn test_summary_marks_current() {
        let mut history = History::new(buffer(0.0));
        history.commit(buffer(0.1), EditKind::InsertSilence);
        history.undo();

        let summary = history.summary();
        assert_eq!(summary.len(), 2);
        assert!(summary[0].current);
        assert!(!summary[1].current);
        assert_eq!(summary[1].kind, EditKind::InsertSilence);
        assert_eq!(EditKind::InsertSilence.to_string(), "Insert Silence");
    }
}
