use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::region::{join_words, Word};

#[derive(Debug, Clone)]
pub enum RecognizeInput {
    FilePath(PathBuf),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct RecognizeOptions {
    /// Recognizer language code, e.g. `eng`.
    pub language: String,
}

impl Default for RecognizeOptions {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Recognition {
    pub text: String,
    pub words: Vec<Word>,
}

impl Recognition {
    pub fn from_words(words: Vec<Word>) -> Self {
        let text = join_words(&words);
        Self { text, words }
    }
}

#[derive(Debug, Error)]
pub enum RecognizeError {
    /// The engine is not installed or not loaded yet.
    #[error("recognition engine unavailable")]
    Unavailable,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("engine error: {0}")]
    EngineError(String),
}

/// Word-level recognizer. Coordinates in the result are native image pixels.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(
        &self,
        input: &RecognizeInput,
        options: &RecognizeOptions,
    ) -> Result<Recognition, RecognizeError>;
}
