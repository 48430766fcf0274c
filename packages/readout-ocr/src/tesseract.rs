use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use async_trait::async_trait;

use crate::engine::{Recognition, RecognizeError, RecognizeInput, RecognizeOptions, Recognizer};
use crate::region::{PixelBox, Word};

const TSV_WORD_LEVEL: i32 = 5;

/// Runs the `tesseract` command line tool and keeps its word-level TSV rows.
pub struct TesseractRecognizer {
    program: PathBuf,
    psm: u32,
}

impl TesseractRecognizer {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("tesseract"),
            psm: 3,
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Page segmentation mode passed as `--psm`.
    pub fn with_psm(mut self, psm: u32) -> Self {
        self.psm = psm;
        self
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Recognizer for TesseractRecognizer {
    async fn recognize(
        &self,
        input: &RecognizeInput,
        options: &RecognizeOptions,
    ) -> Result<Recognition, RecognizeError> {
        let input = input.clone();
        let program = self.program.clone();
        let language = options.language.clone();
        let psm = self.psm;
        let tsv = tokio::task::spawn_blocking(move || run_tsv(&program, &input, &language, psm))
            .await
            .map_err(|e| RecognizeError::EngineError(e.to_string()))??;
        Ok(Recognition::from_words(parse_tsv_words(&tsv)))
    }
}

fn run_tsv(
    program: &Path,
    input: &RecognizeInput,
    language: &str,
    psm: u32,
) -> Result<String, RecognizeError> {
    match input {
        RecognizeInput::FilePath(path) => {
            if !path.is_file() {
                return Err(RecognizeError::InvalidInput(format!(
                    "{} is not a file",
                    path.display()
                )));
            }
            run_on_path(program, path, language, psm)
        }
        RecognizeInput::Bytes(data) => {
            if data.is_empty() {
                return Err(RecognizeError::InvalidInput("empty image data".into()));
            }
            let mut tmp = tempfile::NamedTempFile::new()
                .map_err(|e| RecognizeError::EngineError(e.to_string()))?;
            tmp.write_all(data)
                .map_err(|e| RecognizeError::EngineError(e.to_string()))?;
            run_on_path(program, tmp.path(), language, psm)
        }
    }
}

fn run_on_path(
    program: &Path,
    path: &Path,
    language: &str,
    psm: u32,
) -> Result<String, RecognizeError> {
    let output = Command::new(program)
        .arg(path)
        .arg("stdout")
        .arg("-l")
        .arg(language)
        .arg("--psm")
        .arg(psm.to_string())
        .arg("tsv")
        .output()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => RecognizeError::Unavailable,
            _ => RecognizeError::EngineError(format!("failed to run tesseract: {e}")),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RecognizeError::EngineError(format!(
            "tesseract failed: {}",
            stderr.trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Extracts word rows from tesseract TSV output, in reading order.
pub fn parse_tsv_words(tsv: &str) -> Vec<Word> {
    let mut words = Vec::new();
    for row in tsv.lines().skip(1) {
        let cols = row.split('\t').collect::<Vec<_>>();
        if cols.len() < 12 {
            continue;
        }
        let level: i32 = cols[0].parse().unwrap_or(0);
        if level != TSV_WORD_LEVEL {
            continue;
        }
        let conf: f32 = cols[10].parse().unwrap_or(-1.0);
        let text = cols[11].trim();
        if text.is_empty() || conf < 0.0 {
            continue;
        }
        let (Ok(left), Ok(top), Ok(width), Ok(height)) = (
            cols[6].parse::<f32>(),
            cols[7].parse::<f32>(),
            cols[8].parse::<f32>(),
            cols[9].parse::<f32>(),
        ) else {
            continue;
        };
        words.push(
            Word::new(text, PixelBox::from_xywh(left, top, width, height)).with_confidence(conf),
        );
    }
    words
}
