use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use crate::engine::{Recognition, RecognizeError, RecognizeInput, RecognizeOptions, Recognizer};
use crate::region::Word;

/// Accepted sidecar shapes: `{"words": [..]}`, `{"data": {"words": [..]}}`, or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum Sidecar {
    Words { words: Vec<Word> },
    Data { data: SidecarData },
    Bare(Vec<Word>),
}

#[derive(Deserialize)]
struct SidecarData {
    words: Vec<Word>,
}

impl Sidecar {
    fn into_words(self) -> Vec<Word> {
        match self {
            Sidecar::Words { words } | Sidecar::Bare(words) => words,
            Sidecar::Data { data } => data.words,
        }
    }
}

pub fn parse_words_json(raw: &str) -> Result<Vec<Word>, RecognizeError> {
    serde_json::from_str::<Sidecar>(raw)
        .map(Sidecar::into_words)
        .map_err(|e| RecognizeError::InvalidInput(format!("bad word list: {e}")))
}

enum Source {
    File(PathBuf),
    Inline(Vec<Word>),
}

/// Serves a word list recognized ahead of time instead of running an engine.
/// The image input is ignored.
pub struct JsonRecognizer {
    source: Source,
}

impl JsonRecognizer {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
        }
    }

    pub fn from_words(words: Vec<Word>) -> Self {
        Self {
            source: Source::Inline(words),
        }
    }
}

#[async_trait]
impl Recognizer for JsonRecognizer {
    async fn recognize(
        &self,
        _input: &RecognizeInput,
        _options: &RecognizeOptions,
    ) -> Result<Recognition, RecognizeError> {
        let words = match &self.source {
            Source::Inline(words) => words.clone(),
            Source::File(path) => {
                let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
                    RecognizeError::InvalidInput(format!("{}: {e}", path.display()))
                })?;
                parse_words_json(&raw)?
            }
        };
        Ok(Recognition::from_words(words))
    }
}
