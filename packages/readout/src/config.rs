//! Tunables for the selection pipeline, loadable from a JSON file.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReadoutError, Result};
use crate::speech::SpeechParams;

/// Slack in display pixels added around each word before overlap testing.
pub const DEFAULT_TOLERANCE: f32 = 4.0;

pub const WORD_OUTLINE: StrokeStyle = StrokeStyle {
    color: [255, 0, 0, 255],
    width: 2.0,
};

pub const SELECTION_OUTLINE: StrokeStyle = StrokeStyle {
    color: [0, 0, 255, 255],
    width: 2.0,
};

/// Outline color (RGBA) and line width in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: [u8; 4],
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub tolerance: f32,
    pub word_outline: StrokeStyle,
    pub selection_outline: StrokeStyle,
    pub speech: SpeechParams,
    pub language: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            word_outline: WORD_OUTLINE,
            selection_outline: SELECTION_OUTLINE,
            speech: SpeechParams::default(),
            language: "eng".to_string(),
        }
    }
}

impl ReaderConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_error = |message: String| ReadoutError::Config {
            path: path.to_path_buf(),
            message,
        };
        let raw = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| config_error(e.to_string()))?;
        Ok(config.sanitized())
    }

    /// Clamps values that would make the pipeline misbehave.
    pub fn sanitized(mut self) -> Self {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            self.tolerance = DEFAULT_TOLERANCE;
        }
        self.speech = self.speech.clamped();
        self
    }
}
