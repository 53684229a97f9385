//! Playback and loop controller
//!
//! Tracks play/pause, the loop flag and the playhead, and decides where
//! playback restarts when the engine reports that it finished or left the
//! selected region.
//!
//! The playback engine runs on its own clock and reports a `seeking` event
//! for every reposition, including the ones this controller issues itself.
//! Every programmatic reposition sets a single-shot `suppress_next_seek`
//! flag immediately before calling the engine; the first seek event
//! afterwards consumes it and is not treated as a user seek.

use std::fmt;

use log::debug;

use crate::engine::display::SourceHandle;
use crate::state::selection::Selection;

// ============================================================================
// Engine Interface
// ============================================================================

/// The playback/rendering engine the editor drives
///
/// Events flow back from the engine as [`PlaybackEvent`] values.
pub trait PlaybackEngine {
    /// Load a new displayable source, replacing what is shown
    fn load(&mut self, source: &SourceHandle);

    /// Release a superseded source; each source is released exactly once
    fn release(&mut self, source: SourceHandle);

    fn play(&mut self);

    fn pause(&mut self);

    /// Move the playhead without changing play state
    fn set_time(&mut self, seconds: f64);

    /// Start playback clamped to `[start, end)`; leaving it raises
    /// [`PlaybackEvent::RegionExited`]
    fn play_region(&mut self, start: f64, end: f64);

    fn set_volume(&mut self, _volume: f32) {}

    /// Zoom level in pixels per second
    fn zoom(&mut self, _pixels_per_second: f64) {}
}

/// Events emitted by the playback engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    /// Source decoded and ready, with its duration in seconds
    Ready { duration: f64 },
    Play,
    Pause,
    /// Playback reached the end of the buffer
    Finished,
    /// Playback crossed the end of the active region
    RegionExited,
    /// The playhead was repositioned (by the user or programmatically)
    Seeking(f64),
    TimeUpdate(f64),
    /// The user clicked the waveform at this time
    Interaction(f64),
}

// ============================================================================
// Transport State
// ============================================================================

/// Transport states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Paused,
    Playing,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportState::Paused => write!(f, "Paused"),
            TransportState::Playing => write!(f, "Playing"),
        }
    }
}

/// How a `seeking` event should be treated
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekDisposition {
    /// Echo of a programmatic reposition; the flag has been consumed
    Suppressed,
    /// A seek while looping a selection; the selection must survive it
    LoopGuarded,
    /// A genuine user seek to this time
    UserSeek(f64),
}

// ============================================================================
// Loop Controller
// ============================================================================

/// Play/loop state machine
///
/// The controller owns no buffer or selection; callers pass the current
/// selection into each handler so decisions always see the latest value.
#[derive(Debug, Clone)]
pub struct LoopController {
    state: TransportState,
    looping: bool,
    playhead: f64,
    suppress_next_seek: bool,
}

impl Default for LoopController {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LoopController {
    pub fn new(looping: bool) -> Self {
        Self {
            state: TransportState::Paused,
            looping,
            playhead: 0.0,
            suppress_next_seek: false,
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    pub fn play<E: PlaybackEngine + ?Sized>(&mut self, engine: &mut E) {
        engine.play();
        self.state = TransportState::Playing;
        debug!("[TRANSPORT] Play from {:.3}s", self.playhead);
    }

    pub fn pause<E: PlaybackEngine + ?Sized>(&mut self, engine: &mut E) {
        engine.pause();
        self.state = TransportState::Paused;
        debug!("[TRANSPORT] Paused at {:.3}s", self.playhead);
    }

    /// Space bar: pause if playing, otherwise start playing
    ///
    /// When looping with a selection, playback starts at the selection.
    pub fn toggle_play<E: PlaybackEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        selection: Option<Selection>,
    ) {
        if self.is_playing() {
            self.pause(engine);
            return;
        }
        match selection {
            Some(sel) if self.looping => self.restart_region(engine, sel),
            _ => self.play(engine),
        }
    }

    /// Flip the loop flag and return the new value
    ///
    /// Turning looping on while a selection is playing restarts it from the
    /// selection start. It never starts playback on its own.
    pub fn toggle_loop<E: PlaybackEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        selection: Option<Selection>,
    ) -> bool {
        self.looping = !self.looping;
        debug!("[TRANSPORT] Looping {}", if self.looping { "on" } else { "off" });
        if self.looping && self.is_playing() {
            if let Some(sel) = selection {
                self.restart_region(engine, sel);
            }
        }
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Programmatically move the playhead
    pub fn reposition<E: PlaybackEngine + ?Sized>(&mut self, engine: &mut E, seconds: f64) {
        self.suppress_next_seek = true;
        self.playhead = seconds;
        engine.set_time(seconds);
        debug!("[TRANSPORT] Reposition to {:.3}s (seek suppressed)", seconds);
    }

    /// Play the selection from its start
    pub fn restart_region<E: PlaybackEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        selection: Selection,
    ) {
        self.suppress_next_seek = true;
        self.playhead = selection.start();
        engine.play_region(selection.start(), selection.end());
        self.state = TransportState::Playing;
        debug!(
            "[TRANSPORT] Looping region {:.3}s..{:.3}s",
            selection.start(),
            selection.end()
        );
    }

    /// Stop looping, move the playhead to `seconds` and pause
    pub fn cancel_loop_at<E: PlaybackEngine + ?Sized>(&mut self, engine: &mut E, seconds: f64) {
        self.looping = false;
        self.reposition(engine, seconds);
        self.pause(engine);
        debug!("[TRANSPORT] Loop cancelled at {:.3}s", seconds);
    }

    // ========================================================================
    // Engine Events
    // ========================================================================

    /// Playback reached the end of the buffer
    pub fn on_finished<E: PlaybackEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        selection: Option<Selection>,
    ) {
        if !self.looping {
            self.state = TransportState::Paused;
            debug!("[TRANSPORT] Finished");
            return;
        }
        match selection {
            Some(sel) => self.restart_region(engine, sel),
            None => {
                self.reposition(engine, 0.0);
                self.play(engine);
            }
        }
    }

    /// Playback left the selected region
    pub fn on_region_exited<E: PlaybackEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        selection: Option<Selection>,
    ) {
        if !self.looping {
            return;
        }
        if let Some(sel) = selection {
            self.restart_region(engine, sel);
        }
    }

    /// Classify a `seeking` event, consuming the suppression flag if set
    pub fn on_seeking(&mut self, seconds: f64, selection: Option<Selection>) -> SeekDisposition {
        self.playhead = seconds;
        if self.suppress_next_seek {
            self.suppress_next_seek = false;
            debug!("[TRANSPORT] Ignored programmatic seek to {:.3}s", seconds);
            return SeekDisposition::Suppressed;
        }
        if self.looping && selection.is_some() {
            return SeekDisposition::LoopGuarded;
        }
        SeekDisposition::UserSeek(seconds)
    }

    /// A new selection was drawn; jump to it only when already looping playback
    pub fn on_selection_created<E: PlaybackEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        selection: Selection,
    ) {
        if self.looping && self.is_playing() {
            self.restart_region(engine, selection);
        }
    }

    pub fn on_play(&mut self) {
        self.state = TransportState::Playing;
    }

    pub fn on_pause(&mut self) {
        self.state = TransportState::Paused;
    }

    pub fn on_time_update(&mut self, seconds: f64) {
        self.playhead = seconds;
    }

    /// A newly loaded source starts paused at 0
    pub fn on_ready(&mut self) {
        self.state = TransportState::Paused;
        self.playhead = 0.0;
    }

    // ========================================================================
    // State Queries
    // ========================================================================

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn is_seek_suppressed(&self) -> bool {
        self.suppress_next_seek
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Play,
        Pause,
        SetTime(f64),
        PlayRegion(f64, f64),
    }

    #[derive(Default)]
    struct RecordingEngine {
        calls: Vec<Call>,
    }

    impl PlaybackEngine for RecordingEngine {
        fn load(&mut self, _source: &SourceHandle) {}
        fn release(&mut self, _source: SourceHandle) {}
        fn play(&mut self) {
            self.calls.push(Call::Play);
        }
        fn pause(&mut self) {
            self.calls.push(Call::Pause);
        }
        fn set_time(&mut self, seconds: f64) {
            self.calls.push(Call::SetTime(seconds));
        }
        fn play_region(&mut self, start: f64, end: f64) {
            self.calls.push(Call::PlayRegion(start, end));
        }
    }

    fn sel(a: f64, b: f64) -> Option<Selection> {
        Selection::new(a, b)
    }

    // ------------------------------------------------------------------------
    // Finished / region exit
    // ------------------------------------------------------------------------

    #[test]
    fn test_finished_without_loop_stops() {
        let mut engine = RecordingEngine::default();
        let mut transport = LoopController::new(false);
        transport.play(&mut engine);

        transport.on_finished(&mut engine, sel(1.0, 2.0));
        assert!(!transport.is_playing());
        assert_eq!(engine.calls, vec![Call::Play]);
    }

    #[test]
    fn test_finished_looping_with_selection_restarts_at_selection() {
        let mut engine = RecordingEngine::default();
        let mut transport = LoopController::new(true);
        transport.on_play();

        transport.on_finished(&mut engine, sel(1.5, 2.5));
        assert!(transport.is_playing());
        assert_eq!(transport.playhead(), 1.5);
        assert_eq!(engine.calls, vec![Call::PlayRegion(1.5, 2.5)]);
    }

    #[test]
    fn test_finished_looping_without_selection_restarts_at_zero() {
        let mut engine = RecordingEngine::default();
        let mut transport = LoopController::new(true);
        transport.on_play();

        transport.on_finished(&mut engine, None);
        assert_eq!(engine.calls, vec![Call::SetTime(0.0), Call::Play]);
        assert!(transport.is_seek_suppressed());
    }

    #[test]
    fn test_region_exit_restart_is_not_a_user_seek() {
        let mut engine = RecordingEngine::default();
        let mut transport = LoopController::new(true);
        let selection = sel(1.0, 2.0);
        transport.on_play();

        transport.on_region_exited(&mut engine, selection);
        assert_eq!(engine.calls, vec![Call::PlayRegion(1.0, 2.0)]);

        // the engine echoes the reposition
        let disposition = transport.on_seeking(1.0, selection);
        assert_eq!(disposition, SeekDisposition::Suppressed);
        assert!(!transport.is_seek_suppressed());
    }

    #[test]
    fn test_region_exit_ignored_when_not_looping() {
        let mut engine = RecordingEngine::default();
        let mut transport = LoopController::new(false);
        transport.on_region_exited(&mut engine, sel(1.0, 2.0));
        assert!(engine.calls.is_empty());
    }

    // ------------------------------------------------------------------------
    // Seeking
    // ------------------------------------------------------------------------

    #[test]
    fn test_suppression_is_single_shot() {
        let mut engine = RecordingEngine::default();
        let mut transport = LoopController::new(false);
        transport.reposition(&mut engine, 3.0);

        assert_eq!(transport.on_seeking(3.0, None), SeekDisposition::Suppressed);
        assert_eq!(
            transport.on_seeking(4.0, None),
            SeekDisposition::UserSeek(4.0)
        );
        assert_eq!(transport.playhead(), 4.0);
    }

    #[test]
    fn test_seek_while_looping_selection_is_guarded() {
        let mut transport = LoopController::new(true);
        assert_eq!(
            transport.on_seeking(0.2, sel(1.0, 2.0)),
            SeekDisposition::LoopGuarded
        );
        assert_eq!(
            transport.on_seeking(0.2, None),
            SeekDisposition::UserSeek(0.2)
        );
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    #[test]
    fn test_toggle_play_looping_selection_plays_region() {
        let mut engine = RecordingEngine::default();
        let mut transport = LoopController::new(true);

        transport.toggle_play(&mut engine, sel(0.5, 1.0));
        assert!(transport.is_playing());
        transport.toggle_play(&mut engine, sel(0.5, 1.0));
        assert!(!transport.is_playing());

        assert_eq!(engine.calls, vec![Call::PlayRegion(0.5, 1.0), Call::Pause]);
    }

    #[test]
    fn test_toggle_play_without_loop_plays_from_playhead() {
        let mut engine = RecordingEngine::default();
        let mut transport = LoopController::new(false);
        transport.toggle_play(&mut engine, sel(0.5, 1.0));
        assert_eq!(engine.calls, vec![Call::Play]);
    }

    #[test]
    fn test_toggle_loop_on_while_playing_restarts_selection() {
        let mut engine = RecordingEngine::default();
        let mut transport = LoopController::new(false);
        transport.on_play();

        assert!(transport.toggle_loop(&mut engine, sel(2.0, 3.0)));
        assert_eq!(engine.calls, vec![Call::PlayRegion(2.0, 3.0)]);
    }

    #[test]
    fn test_toggle_loop_on_while_paused_does_not_play() {
        let mut engine = RecordingEngine::default();
        let mut transport = LoopController::new(false);

        assert!(transport.toggle_loop(&mut engine, sel(2.0, 3.0)));
        assert!(!transport.toggle_loop(&mut engine, sel(2.0, 3.0)));
        assert!(engine.calls.is_empty());
        assert!(!transport.is_playing());
    }

    #[test]
    fn test_new_selection_jumps_only_when_looping_playback() {
        let mut engine = RecordingEngine::default();
        let mut transport = LoopController::new(true);
        let selection = Selection::new(1.0, 2.0).unwrap();

        transport.on_selection_created(&mut engine, selection);
        assert!(engine.calls.is_empty());
        assert!(!transport.is_playing());

        transport.on_play();
        transport.on_selection_created(&mut engine, selection);
        assert_eq!(engine.calls, vec![Call::PlayRegion(1.0, 2.0)]);
    }

    #[test]
    fn test_cancel_loop_pauses_and_suppresses() {
        let mut engine = RecordingEngine::default();
        let mut transport = LoopController::new(true);
        transport.on_play();

        transport.cancel_loop_at(&mut engine, 4.2);
        assert!(!transport.is_looping());
        assert!(!transport.is_playing());
        assert_eq!(engine.calls, vec![Call::SetTime(4.2), Call::Pause]);
        assert_eq!(transport.on_seeking(4.2, None), SeekDisposition::Suppressed);
    }

    #[test]
    fn test_engine_events_track_state() {
        let mut transport = LoopController::default();
        assert!(transport.is_looping());

        transport.on_play();
        transport.on_time_update(1.25);
        assert_eq!(transport.state(), TransportState::Playing);
        assert_eq!(transport.playhead(), 1.25);

        transport.on_pause();
        assert_eq!(transport.state().to_string(), "Paused");

        transport.on_play();
        transport.on_ready();
        assert!(!transport.is_playing());
        assert_eq!(transport.playhead(), 0.0);
    }
}
