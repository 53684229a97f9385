//! Editor configuration
//!
//! Loaded from an optional JSON file; every field has a default, so an
//! empty object is a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Shortest silence the editor inserts, in seconds
pub const MIN_SILENCE_SECS: f64 = 0.1;

/// Longest silence the editor inserts, in seconds
pub const MAX_SILENCE_SECS: f64 = 30.0;

// ============================================================================
// Sections
// ============================================================================

/// Waveform zoom in pixels per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub initial: f64,
    pub min: f64,
    pub max: f64,
    /// Change per mouse-wheel notch
    pub wheel_step: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            initial: 50.0,
            min: 10.0,
            max: 500.0,
            wheel_step: 10.0,
        }
    }
}

impl ZoomConfig {
    pub fn clamp(&self, pixels_per_second: f64) -> f64 {
        pixels_per_second.clamp(self.min, self.max)
    }
}

/// Domain of the loudness slider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoudnessConfig {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Default for LoudnessConfig {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 3.0,
            step: 0.01,
        }
    }
}

impl LoudnessConfig {
    /// Clamp a multiplier into the slider domain; NaN maps to neutral gain
    pub fn clamp(&self, multiplier: f32) -> f32 {
        if multiplier.is_nan() {
            return 1.0_f32.clamp(self.min, self.max);
        }
        multiplier.clamp(self.min, self.max)
    }
}

// ============================================================================
// Editor Config
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Whether a freshly opened editor loops playback
    pub initial_looping: bool,
    pub zoom: ZoomConfig,
    pub loudness: LoudnessConfig,
    /// Default length of inserted silence, in seconds
    pub silence_length_secs: f64,
    /// Playback volume, 0 to 1
    pub volume: f32,
    /// Maximum number of history snapshots; unlimited when absent
    pub max_history: Option<usize>,
    /// Sample rate of a merge where no segment decoded
    pub merge_fallback_sample_rate: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_looping: true,
            zoom: ZoomConfig::default(),
            loudness: LoudnessConfig::default(),
            silence_length_secs: 0.5,
            volume: 1.0,
            max_history: None,
            merge_fallback_sample_rate: 44100,
        }
    }
}

impl EditorConfig {
    /// Read and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        log::debug!("[CONFIG] Loaded {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let zoom = &self.zoom;
        if !(zoom.min > 0.0 && zoom.min <= zoom.max) {
            return Err(invalid(format!(
                "zoom.min must be positive and not above zoom.max (got {} and {})",
                zoom.min, zoom.max
            )));
        }
        if !(zoom.min..=zoom.max).contains(&zoom.initial) {
            return Err(invalid(format!(
                "zoom.initial must lie in {} to {} (got {})",
                zoom.min, zoom.max, zoom.initial
            )));
        }
        if !(zoom.wheel_step > 0.0) {
            return Err(invalid(format!(
                "zoom.wheel_step must be positive (got {})",
                zoom.wheel_step
            )));
        }

        let loudness = &self.loudness;
        if !(loudness.min > 0.0 && loudness.min <= loudness.max && loudness.step > 0.0) {
            return Err(invalid(format!(
                "loudness range {} to {} step {} is not usable",
                loudness.min, loudness.max, loudness.step
            )));
        }

        if !(MIN_SILENCE_SECS..=MAX_SILENCE_SECS).contains(&self.silence_length_secs) {
            return Err(invalid(format!(
                "silence_length_secs must lie in {} to {} (got {})",
                MIN_SILENCE_SECS, MAX_SILENCE_SECS, self.silence_length_secs
            )));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(invalid(format!(
                "volume must lie in 0 to 1 (got {})",
                self.volume
            )));
        }
        if self.merge_fallback_sample_rate == 0 {
            return Err(invalid("merge_fallback_sample_rate must be positive".to_string()));
        }
        Ok(())
    }
}

fn invalid(reason: String) -> EditorError {
    EditorError::InvalidConfig { reason }
}
