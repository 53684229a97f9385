//! Error handling for Wavedit
//!
//! Edit operations fail synchronously and never touch the history; the UI shell
//! catches the error and shows `friendly_message()` to the user.

use thiserror::Error;

/// Result type alias for Wavedit operations
pub type Result<T> = std::result::Result<T, EditorError>;

/// Main error type for Wavedit operations
#[derive(Error, Debug)]
pub enum EditorError {
    // Edit Errors
    #[error("Invalid clipboard buffer: {reason}")]
    InvalidClipboard { reason: String },

    #[error("Invalid selection range: {start}..{end} (buffer has {len} frames)")]
    InvalidRange { start: i64, end: i64, len: usize },

    #[error("Invalid insert position: {position} (buffer has {len} frames)")]
    InvalidPosition { position: i64, len: usize },

    // Buffer Errors
    #[error("Invalid sample buffer: {reason}")]
    InvalidBuffer { reason: String },

    #[error("No audio loaded")]
    NoAudioLoaded,

    // Decode Errors
    #[error("Failed to decode audio: {reason}")]
    DecodeError {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EditorError {
    /// Build a `DecodeError` wrapping an underlying decoder failure
    pub fn decode<E>(reason: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        EditorError::DecodeError {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            EditorError::InvalidClipboard { .. } => "INVALID_CLIPBOARD",
            EditorError::InvalidRange { .. } => "INVALID_RANGE",
            EditorError::InvalidPosition { .. } => "INVALID_POSITION",
            EditorError::InvalidBuffer { .. } => "INVALID_BUFFER",
            EditorError::NoAudioLoaded => "NO_AUDIO_LOADED",
            EditorError::DecodeError { .. } => "DECODE_ERROR",
            EditorError::InvalidConfig { .. } => "INVALID_CONFIG",
            EditorError::Io(_) => "IO_ERROR",
            EditorError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors leave the editor state untouched, so the user can
    /// simply retry with different input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EditorError::InvalidClipboard { .. }
                | EditorError::InvalidRange { .. }
                | EditorError::InvalidPosition { .. }
                | EditorError::DecodeError { .. }
                | EditorError::NoAudioLoaded
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            EditorError::InvalidClipboard { .. } => vec![
                "Copy or cut a selection before pasting",
                "Make sure the copied selection is not empty",
            ],
            EditorError::InvalidRange { .. } => vec![
                "Drag a selection inside the waveform",
                "Clear the selection and try again",
            ],
            EditorError::InvalidPosition { .. } => vec![
                "Click inside the waveform to place the cursor",
                "Clear the cursor to insert at the playhead",
            ],
            EditorError::DecodeError { .. } => vec![
                "Try converting the file to 16-bit PCM WAV first",
                "Check if the file plays in another application",
            ],
            EditorError::InvalidConfig { .. } => vec![
                "Check the configuration file against the documented defaults",
                "Delete the configuration file to fall back to defaults",
            ],
            _ => vec![],
        }
    }

    /// Get a user-friendly message for this error
    pub fn friendly_message(&self) -> String {
        match self {
            EditorError::InvalidClipboard { .. } => {
                "There is nothing on the clipboard to paste yet.".to_string()
            }
            EditorError::InvalidRange { .. } => {
                "The selection falls outside the audio. Try selecting again.".to_string()
            }
            EditorError::InvalidPosition { .. } => {
                "The insert point falls outside the audio. Click inside the waveform.".to_string()
            }
            EditorError::DecodeError { reason, .. } => {
                format!("This audio could not be opened: {}", reason)
            }
            _ => self.to_string(),
        }
    }
}
