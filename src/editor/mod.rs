//! Waveform editor
//!
//! `WaveformEditor` owns every piece of editing state in one place: the
//! history, clipboard, selection model, loop controller, gain preview and
//! the displayable source shown by the playback engine. Engine events and
//! user gestures are handled by methods on it, so each handler always sees
//! the latest state.
//!
//! Failed edits return an error and leave history, selection and clipboard
//! untouched.

pub mod shortcuts;

use std::ops::Range;
use std::sync::Arc;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::{EditorConfig, MAX_SILENCE_SECS, MIN_SILENCE_SECS};
use crate::edit::ops;
use crate::engine::buffer::SampleBuffer;
use crate::engine::display::DisplaySlot;
use crate::engine::transport::{LoopController, PlaybackEngine, PlaybackEvent, SeekDisposition};
use crate::engine::wav::{self, Decoder};
use crate::error::{EditorError, Result};
use crate::state::{
    Click, Clipboard, EditKind, GainPreview, History, Mark, PointerDown, PointerUp, Selection,
    SelectionModel, SelectionState,
};

pub use shortcuts::{format_time, KeyCode, KeyPress, Shortcut};

/// Callback receiving the saved WAV bytes
pub type SaveCallback = Box<dyn FnMut(&[u8])>;

pub struct WaveformEditor<E: PlaybackEngine> {
    config: EditorConfig,
    engine: E,
    history: Option<History>,
    clipboard: Clipboard,
    selection: SelectionModel,
    transport: LoopController,
    preview: GainPreview,
    display: DisplaySlot,
    zoom: f64,
    volume: f32,
    silence_length: f64,
    on_save: Option<SaveCallback>,
}

impl<E: PlaybackEngine> WaveformEditor<E> {
    pub fn new(mut engine: E, config: EditorConfig) -> Self {
        let zoom = config.zoom.clamp(config.zoom.initial);
        let volume = config.volume.clamp(0.0, 1.0);
        engine.zoom(zoom);
        engine.set_volume(volume);

        Self {
            transport: LoopController::new(config.initial_looping),
            silence_length: config.silence_length_secs,
            config,
            engine,
            history: None,
            clipboard: Clipboard::new(),
            selection: SelectionModel::default(),
            preview: GainPreview::new(),
            display: DisplaySlot::new(),
            zoom,
            volume,
            on_save: None,
        }
    }

    /// Register the callback invoked by [`save`](Self::save)
    pub fn set_on_save<F>(&mut self, callback: F)
    where
        F: FnMut(&[u8]) + 'static,
    {
        self.on_save = Some(Box::new(callback));
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Decode `bytes` and start a fresh editing session on the result
    pub fn open(&mut self, bytes: &[u8], decoder: &dyn Decoder) -> Result<()> {
        let buffer = decoder.decode(bytes)?;
        self.open_buffer(buffer)
    }

    /// Start a fresh editing session on an already decoded buffer
    ///
    /// The clipboard survives; history, selection and any preview do not.
    pub fn open_buffer(&mut self, buffer: SampleBuffer) -> Result<()> {
        self.display.publish(&mut self.engine, &buffer)?;

        let duration = buffer.duration_secs();
        let original = Arc::new(buffer);
        self.history = Some(match self.config.max_history {
            Some(max) => History::with_limit(original, max),
            None => History::new(original),
        });
        self.selection = SelectionModel::new(duration);
        self.preview.abandon();
        self.transport.on_ready();

        info!("[EDITOR] Opened {:.2}s of audio", duration);
        Ok(())
    }

    /// Release the displayed source and stop playback
    pub fn close(&mut self) {
        if self.transport.is_playing() {
            self.transport.pause(&mut self.engine);
        }
        self.preview.abandon();
        self.display.release(&mut self.engine);
        debug!("[EDITOR] Closed");
    }

    // ========================================================================
    // Engine Events
    // ========================================================================

    pub fn handle_event(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::Ready { duration } => {
                debug!("[EDITOR] Engine ready ({:.3}s)", duration);
                self.transport.on_ready();
            }
            PlaybackEvent::Play => self.transport.on_play(),
            PlaybackEvent::Pause => self.transport.on_pause(),
            PlaybackEvent::TimeUpdate(t) => self.transport.on_time_update(t),
            PlaybackEvent::Finished => {
                let selection = self.selection.selection();
                self.transport.on_finished(&mut self.engine, selection);
            }
            PlaybackEvent::RegionExited => {
                let selection = self.selection.selection();
                self.transport.on_region_exited(&mut self.engine, selection);
            }
            PlaybackEvent::Seeking(t) => self.on_seeking(t),
            PlaybackEvent::Interaction(t) => self.on_interaction(t),
        }
    }

    fn on_seeking(&mut self, time: f64) {
        let selection = self.selection.selection();
        match self.transport.on_seeking(time, selection) {
            SeekDisposition::Suppressed | SeekDisposition::LoopGuarded => {}
            SeekDisposition::UserSeek(t) => {
                if self.selection.is_dragging() {
                    return;
                }
                if let Click::NoSelection = self.selection.click(t) {
                    self.selection.place_cursor(t);
                }
            }
        }
    }

    fn on_interaction(&mut self, time: f64) {
        if self.selection.is_dragging() {
            return;
        }
        if let Click::Outside { .. } = self.selection.click(time) {
            if self.transport.is_looping() {
                self.transport.cancel_loop_at(&mut self.engine, time);
            }
        }
    }

    // ========================================================================
    // Pointer Gestures
    // ========================================================================

    pub fn pointer_down(&mut self, time: f64) -> PointerDown {
        self.selection.pointer_down(time)
    }

    pub fn pointer_move(&mut self, time: f64) -> Option<Selection> {
        self.selection.pointer_move(time)
    }

    pub fn pointer_up(&mut self, time: f64) -> PointerUp {
        let outcome = self.selection.pointer_up(time);
        match outcome {
            PointerUp::Selected(sel) => {
                self.transport.on_selection_created(&mut self.engine, sel);
            }
            PointerUp::CursorPlaced {
                time,
                discarded: Some(_),
            } if self.transport.is_looping() => {
                self.transport.cancel_loop_at(&mut self.engine, time);
            }
            _ => {}
        }
        outcome
    }

    pub fn cancel_drag(&mut self) {
        self.selection.cancel_drag();
    }

    /// Select a range programmatically, as if drawn by the user
    pub fn select(&mut self, start: f64, end: f64) -> Option<Selection> {
        let sel = self.selection.select(start, end)?;
        self.transport.on_selection_created(&mut self.engine, sel);
        Some(sel)
    }

    pub fn place_cursor(&mut self, time: f64) {
        self.selection.place_cursor(time);
    }

    pub fn clear_selection(&mut self, discard_cursor: bool) {
        self.selection.clear_selection(discard_cursor);
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Space bar: start or stop playback
    pub fn play_stop(&mut self) {
        if self.history.is_none() {
            return;
        }
        let selection = self.selection.selection();
        self.transport.toggle_play(&mut self.engine, selection);
    }

    /// Flip looping and return the new value
    pub fn toggle_loop(&mut self) -> bool {
        let selection = self.selection.selection();
        self.transport.toggle_loop(&mut self.engine, selection)
    }

    /// Zoom by one wheel notch; negative deltas zoom in
    pub fn zoom_wheel(&mut self, delta_y: f64) -> f64 {
        let step = self.config.zoom.wheel_step;
        if delta_y < 0.0 {
            self.set_zoom(self.zoom + step)
        } else if delta_y > 0.0 {
            self.set_zoom(self.zoom - step)
        } else {
            self.zoom
        }
    }

    pub fn set_zoom(&mut self, pixels_per_second: f64) -> f64 {
        if !pixels_per_second.is_finite() {
            return self.zoom;
        }
        self.zoom = self.config.zoom.clamp(pixels_per_second);
        self.engine.zoom(self.zoom);
        self.zoom
    }

    pub fn set_volume(&mut self, volume: f32) -> f32 {
        if volume.is_nan() {
            return self.volume;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.engine.set_volume(self.volume);
        self.volume
    }

    // ========================================================================
    // Clipboard Edits
    // ========================================================================

    /// Copy the selected frames to the clipboard
    ///
    /// Returns `false` when there is nothing to copy.
    pub fn copy(&mut self) -> Result<bool> {
        let current = self.require_current()?;
        let Some(sel) = self.selection.selection() else {
            return Ok(false);
        };
        let Some((start, end)) = frame_span(&current, sel) else {
            return Ok(false);
        };
        let clip = ops::extract_range(&current, start, end).map_err(|e| rejected("copy", e))?;
        self.clipboard.set(clip);
        Ok(true)
    }

    /// Copy the selection, then remove it
    pub fn cut(&mut self) -> Result<bool> {
        let current = self.require_current()?;
        let Some(sel) = self.selection.selection() else {
            return Ok(false);
        };
        let Some((start, end)) = frame_span(&current, sel) else {
            return Ok(false);
        };
        let clip = ops::extract_range(&current, start, end).map_err(|e| rejected("cut", e))?;
        let result = ops::delete_range(&current, start, end).map_err(|e| rejected("cut", e))?;

        self.commit(result, EditKind::Cut)?;
        self.clipboard.set(clip);
        self.selection.clear_selection(true);
        Ok(true)
    }

    /// Paste over the selection, else at the cursor, else at the playhead
    ///
    /// The pasted span becomes the new selection.
    pub fn paste(&mut self) -> Result<bool> {
        let current = self.require_current()?;
        let sr = current.sample_rate();
        let resampled = match self.clipboard.get() {
            Some(clip) if clip.sample_rate() != sr => {
                Some(ops::resample_linear(clip, sr).map_err(|e| rejected("paste", e))?)
            }
            _ => None,
        };
        let clip = resampled.as_ref().or_else(|| self.clipboard.get());
        let clip_frames = clip.map(SampleBuffer::frame_count).unwrap_or(0);

        let (result, paste_start) = match self.selection.mark() {
            Mark::Range(sel) => {
                let (start, end) = sel.frame_bounds(sr);
                let end = end.min(current.frame_count() as i64);
                let result = ops::replace_selection(&current, clip, start, end);
                (result, sel.start())
            }
            Mark::Cursor(t) => {
                let position = clamp_frame(&current, t);
                (ops::insert_at_position(&current, clip, position), t)
            }
            Mark::None => {
                let t = self.transport.playhead();
                let position = clamp_frame(&current, t);
                (ops::insert_at_position(&current, clip, position), t)
            }
        };
        let result = result.map_err(|e| rejected("paste", e))?;

        self.commit(result, EditKind::Paste)?;
        self.selection.clear_selection(true);
        let pasted_secs = clip_frames as f64 / sr as f64;
        self.selection.select(paste_start, paste_start + pasted_secs);
        Ok(true)
    }

    // ========================================================================
    // Silence
    // ========================================================================

    /// Set the length used by [`insert_silence`](Self::insert_silence)
    ///
    /// Non-finite values are ignored; others are clamped to the allowed range.
    pub fn set_silence_length(&mut self, seconds: f64) -> f64 {
        if seconds.is_finite() {
            self.silence_length = seconds.clamp(MIN_SILENCE_SECS, MAX_SILENCE_SECS);
        }
        self.silence_length
    }

    /// Insert silence at the cursor, else at the playhead
    ///
    /// The cursor moves to the end of the inserted silence.
    pub fn insert_silence(&mut self) -> Result<bool> {
        let current = self.require_current()?;
        if !self.silence_length.is_finite() || self.silence_length <= 0.0 {
            return Ok(false);
        }
        let at = self
            .selection
            .cursor()
            .unwrap_or_else(|| self.transport.playhead());
        let position = clamp_frame(&current, at);
        let result = ops::insert_silence(&current, self.silence_length, position)
            .map_err(|e| rejected("insert silence", e))?;
        let inserted = (result.frame_count() - current.frame_count()) as f64
            / current.sample_rate() as f64;
        let insert_time = current.frame_to_seconds(position as usize);

        self.commit(result, EditKind::InsertSilence)?;
        self.selection.clear_selection(true);
        self.selection.place_cursor(insert_time + inserted);
        Ok(true)
    }

    // ========================================================================
    // Gain
    // ========================================================================

    /// Start an interactive gain drag on the committed buffer
    pub fn begin_gain_drag(&mut self) -> Result<()> {
        let current = self.require_current()?;
        self.preview.begin(&current);
        Ok(())
    }

    /// Show the committed buffer scaled by `multiplier`, without committing
    pub fn update_gain_drag(&mut self, multiplier: f32) -> Result<()> {
        let multiplier = self.config.loudness.clamp(multiplier);
        let Some(baseline) = self.preview.baseline().cloned() else {
            return Ok(());
        };
        let range = self.gain_range(&baseline);
        if let Some(preview) = self.preview.update(multiplier, range) {
            self.display.publish(&mut self.engine, &preview)?;
        }
        Ok(())
    }

    /// Commit the drag at `multiplier` and reset the displayed multiplier
    pub fn end_gain_drag(&mut self, multiplier: f32) -> Result<bool> {
        let multiplier = self.config.loudness.clamp(multiplier);
        let Some(baseline) = self.preview.baseline().cloned() else {
            return Ok(false);
        };
        let range = self.gain_range(&baseline);
        let Some(result) = self.preview.finish(multiplier, range) else {
            return Ok(false);
        };
        self.commit(result, EditKind::Gain)?;
        self.preview.reset_display();
        Ok(true)
    }

    /// Drop a drag in progress and show the committed buffer again
    pub fn abandon_gain_drag(&mut self) -> Result<()> {
        if self.preview.abandon() {
            self.republish()?;
        }
        Ok(())
    }

    /// Scale the selection (or the whole buffer) and commit in one step
    pub fn adjust_volume(&mut self, multiplier: f32) -> Result<()> {
        let current = self.require_current()?;
        let multiplier = self.config.loudness.clamp(multiplier);
        let range = self.gain_range(&current);
        let result = ops::scale_gain(&current, multiplier, range);
        self.commit(result, EditKind::Gain)
    }

    /// The multiplier to display on the loudness control
    pub fn gain_multiplier(&self) -> f32 {
        self.preview.multiplier()
    }

    fn gain_range(&self, buffer: &SampleBuffer) -> Option<Range<usize>> {
        let sel = self.selection.selection()?;
        let (start, end) = sel.frame_bounds(buffer.sample_rate());
        let len = buffer.frame_count() as i64;
        Some(start.clamp(0, len) as usize..end.clamp(0, len) as usize)
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Step back one edit; `false` at the original
    pub fn undo(&mut self) -> Result<bool> {
        let abandoned = self.preview.abandon();
        let Some(history) = self.history.as_mut() else {
            return Ok(false);
        };
        match history.undo() {
            Some(buffer) => {
                self.show(&buffer)?;
                Ok(true)
            }
            None => {
                if abandoned {
                    self.republish()?;
                }
                Ok(false)
            }
        }
    }

    /// Step forward one edit; `false` at the newest
    pub fn redo(&mut self) -> Result<bool> {
        let abandoned = self.preview.abandon();
        let Some(history) = self.history.as_mut() else {
            return Ok(false);
        };
        match history.redo() {
            Some(buffer) => {
                self.show(&buffer)?;
                Ok(true)
            }
            None => {
                if abandoned {
                    self.republish()?;
                }
                Ok(false)
            }
        }
    }

    fn commit(&mut self, buffer: SampleBuffer, kind: EditKind) -> Result<()> {
        let history = self.history.as_mut().ok_or(EditorError::NoAudioLoaded)?;
        self.display.publish(&mut self.engine, &buffer)?;
        let committed = history.commit(Arc::new(buffer), kind);
        self.selection.set_duration(committed.duration_secs());
        Ok(())
    }

    fn show(&mut self, buffer: &SampleBuffer) -> Result<()> {
        self.display.publish(&mut self.engine, buffer)?;
        self.selection.set_duration(buffer.duration_secs());
        Ok(())
    }

    fn republish(&mut self) -> Result<()> {
        let current = self.require_current()?;
        self.show(&current)
    }

    // ========================================================================
    // Save / Shortcuts
    // ========================================================================

    /// Encode the committed buffer and hand it to the save callback
    pub fn save(&mut self) -> Result<Vec<u8>> {
        let current = self.require_current()?;
        let bytes = wav::encode(&current)?;
        if let Some(callback) = self.on_save.as_mut() {
            callback(&bytes);
        }
        info!(
            "[EDITOR] Saved {:.2}s ({} bytes)",
            current.duration_secs(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Dispatch a key press; returns the action it triggered, if any
    pub fn handle_key(&mut self, key: KeyPress) -> Result<Option<Shortcut>> {
        let Some(shortcut) = Shortcut::from_key(key) else {
            return Ok(None);
        };
        match shortcut {
            Shortcut::PlayStop => self.play_stop(),
            Shortcut::Copy => {
                self.copy()?;
            }
            Shortcut::Cut => {
                self.cut()?;
            }
            Shortcut::Paste => {
                self.paste()?;
            }
            Shortcut::Save => {
                self.save()?;
            }
            Shortcut::Undo => {
                self.undo()?;
            }
            Shortcut::Redo => {
                self.redo()?;
            }
        }
        Ok(Some(shortcut))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The committed buffer, if audio is loaded
    pub fn current(&self) -> Option<&Arc<SampleBuffer>> {
        self.history.as_ref().map(History::current)
    }

    fn require_current(&self) -> Result<Arc<SampleBuffer>> {
        self.current().cloned().ok_or(EditorError::NoAudioLoaded)
    }

    pub fn history(&self) -> Option<&History> {
        self.history.as_ref()
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection.selection()
    }

    pub fn cursor(&self) -> Option<f64> {
        self.selection.cursor()
    }

    pub fn mark(&self) -> Mark {
        self.selection.mark()
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn transport(&self) -> &LoopController {
        &self.transport
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn is_looping(&self) -> bool {
        self.transport.is_looping()
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_active()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn silence_length(&self) -> f64 {
        self.silence_length
    }

    pub fn displayed_source(&self) -> Option<Uuid> {
        self.display.current_id()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}

fn clamp_frame(buffer: &SampleBuffer, seconds: f64) -> i64 {
    buffer
        .seconds_to_frame(seconds)
        .clamp(0, buffer.frame_count() as i64)
}

/// Frame bounds of a selection, cut at the buffer end; `None` when empty
fn frame_span(buffer: &SampleBuffer, sel: Selection) -> Option<(i64, i64)> {
    let (start, end) = sel.frame_bounds(buffer.sample_rate());
    let len = buffer.frame_count() as i64;
    let (start, end) = (start.clamp(0, len), end.clamp(0, len));
    (start < end).then_some((start, end))
}

fn rejected(action: &str, error: EditorError) -> EditorError {
    warn!("[EDITOR] {} rejected: {}", action, error);
    error
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::display::SourceHandle;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct NullEngine {
        loaded: usize,
        released: usize,
        zoom: f64,
    }

    impl PlaybackEngine for NullEngine {
        fn load(&mut self, _source: &SourceHandle) {
            self.loaded += 1;
        }
        fn release(&mut self, _source: SourceHandle) {
            self.released += 1;
        }
        fn play(&mut self) {}
        fn pause(&mut self) {}
        fn set_time(&mut self, _seconds: f64) {}
        fn play_region(&mut self, _start: f64, _end: f64) {}
        fn zoom(&mut self, pixels_per_second: f64) {
            self.zoom = pixels_per_second;
        }
    }

    /// 10 frames at 10 Hz: frame i holds i / 10
    fn editor() -> WaveformEditor<NullEngine> {
        let mut editor = WaveformEditor::new(NullEngine::default(), EditorConfig::default());
        let ramp = SampleBuffer::mono((0..10).map(|i| i as f32 / 10.0).collect(), 10).unwrap();
        editor.open_buffer(ramp).unwrap();
        editor
    }

    #[test]
    fn test_actions_before_open() {
        let mut editor = WaveformEditor::new(NullEngine::default(), EditorConfig::default());
        assert!(matches!(editor.copy(), Err(EditorError::NoAudioLoaded)));
        assert!(matches!(editor.save(), Err(EditorError::NoAudioLoaded)));
        assert!(!editor.undo().unwrap());
        editor.play_stop();
        assert!(!editor.is_playing());
    }

    #[test]
    fn test_copy_without_selection_is_noop() {
        let mut editor = editor();
        assert!(!editor.copy().unwrap());
        assert!(editor.clipboard().is_empty());
    }

    #[test]
    fn test_cut_clears_marks_and_fills_clipboard() {
        let mut editor = editor();
        editor.select(0.2, 0.5);

        assert!(editor.cut().unwrap());
        assert_eq!(editor.current().unwrap().frame_count(), 7);
        assert_eq!(editor.clipboard().get().unwrap().frame_count(), 3);
        assert_eq!(editor.mark(), Mark::None);
        assert_eq!(
            editor.history().unwrap().labels(),
            vec![EditKind::Open, EditKind::Cut]
        );
    }

    #[test]
    fn test_paste_at_cursor_highlights_pasted_span() {
        let mut editor = editor();
        editor.select(0.0, 0.2);
        editor.copy().unwrap();
        editor.place_cursor(0.5);

        assert!(editor.paste().unwrap());
        assert_eq!(editor.current().unwrap().frame_count(), 12);
        let sel = editor.selection().unwrap();
        assert_relative_eq!(sel.start(), 0.5);
        assert_relative_eq!(sel.end(), 0.7, epsilon = 1e-9);
    }

    #[test]
    fn test_paste_empty_clipboard_does_not_commit() {
        let mut editor = editor();
        editor.place_cursor(0.3);

        assert!(matches!(
            editor.paste(),
            Err(EditorError::InvalidClipboard { .. })
        ));
        assert_eq!(editor.history().unwrap().len(), 1);
        assert_eq!(editor.cursor(), Some(0.3));
    }

    #[test]
    fn test_insert_silence_moves_cursor() {
        let mut editor = editor();
        editor.set_silence_length(0.3);
        editor.place_cursor(0.4);

        assert!(editor.insert_silence().unwrap());
        assert!(editor.insert_silence().unwrap());

        let current = editor.current().unwrap();
        assert_eq!(current.frame_count(), 16);
        assert_eq!(&current.channel(0)[4..10], &[0.0; 6]);
        assert_relative_eq!(editor.cursor().unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_silence_length_bounds() {
        let mut editor = editor();
        assert_eq!(editor.set_silence_length(100.0), 30.0);
        assert_eq!(editor.set_silence_length(f64::NAN), 30.0);
        assert_eq!(editor.set_silence_length(0.0), 0.1);
    }

    #[test]
    fn test_zoom_wheel_clamps() {
        let mut editor = editor();
        assert_eq!(editor.zoom(), 50.0);
        assert_eq!(editor.zoom_wheel(-1.0), 60.0);
        assert_eq!(editor.zoom_wheel(1.0), 50.0);
        assert_eq!(editor.set_zoom(9000.0), 500.0);
        assert_eq!(editor.engine().zoom, 500.0);
    }

    #[test]
    fn test_undo_redo_republish() {
        let mut editor = editor();
        editor.adjust_volume(0.5).unwrap();
        let loads = editor.engine().loaded;

        assert!(editor.undo().unwrap());
        assert!(!editor.undo().unwrap());
        assert!(editor.redo().unwrap());
        assert_eq!(editor.engine().loaded, loads + 2);
        assert_eq!(editor.engine().released, editor.engine().loaded - 1);
    }

    #[test]
    fn test_close_releases_last_source() {
        let mut editor = editor();
        editor.close();
        assert_eq!(editor.engine().released, editor.engine().loaded);
        assert!(editor.displayed_source().is_none());
    }
}
