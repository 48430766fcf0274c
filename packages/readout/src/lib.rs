//! # readout
//!
//! Drag-select a region over a photographed or scanned page and hear the recognized words
//! under it read aloud.
//!
//! ## Pipeline
//!
//! - **Surface**: canvas sizing and the display/native scale factor
//! - **Word index**: the latest recognition result, replaced wholesale
//! - **Hit test**: selection rectangle vs. scaled word boxes, with tolerance
//! - **Overlay**: base image, word outlines and the live selection outline
//! - **Gesture**: pointer/touch drag state machine producing the selection
//! - **Speech**: at-most-one-utterance playback with live rate/volume edits
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use readout::prelude::*;
//!
//! let mut session = ReaderSession::new(ReaderConfig::default(), LogSpeech::new(), DrawRecorder::new());
//! session.install_recognizer(Arc::new(TesseractRecognizer::new()));
//! session.load_image(RecognizeInput::FilePath("page.png".into()), 800);
//! session.run_recognition().await;
//!
//! session.pointer_start(&Point::new(10.0, 10.0).into());
//! session.pointer_move(&Point::new(300.0, 60.0).into());
//! let selected = session.pointer_end();
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod logging;
pub mod render;
pub mod session;
pub mod speech;
pub mod surface;
pub mod word_index;

pub use config::{ReaderConfig, StrokeStyle, DEFAULT_TOLERANCE, SELECTION_OUTLINE, WORD_OUTLINE};
pub use error::ReadoutError;
pub use geometry::{DisplayRect, Point, SelectionRect};
pub use gesture::{GestureController, GestureState, InputPoint, Propagation};
pub use hit_test::hit_test;
pub use render::{render, DrawCommand, DrawRecorder, DrawSurface, PixmapSurface};
pub use session::{LoadGeneration, ReaderSession, RecognitionJob, RecognizerState};
pub use speech::{
    CommandSpeech, LogSpeech, NullSpeech, PlaybackController, PlaybackState, SpeechEngine,
    SpeechEvent, SpeechParams, Utterance, UtteranceId,
};
pub use surface::{CanvasSize, SurfaceState};
pub use word_index::WordIndex;

pub use readout_ocr::{
    join_words, JsonRecognizer, PixelBox, Recognition, RecognizeError, RecognizeInput,
    RecognizeOptions, Recognizer, TesseractRecognizer, Word,
};

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```ignore
/// use readout::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        hit_test, join_words, render, CommandSpeech, DisplayRect, DrawRecorder, DrawSurface,
        InputPoint, JsonRecognizer, LogSpeech, NullSpeech, PixelBox, PixmapSurface,
        PlaybackState, Point, Propagation, ReaderConfig, ReaderSession, RecognizeInput,
        Recognizer, SelectionRect, SpeechEngine, SpeechParams, TesseractRecognizer, Word,
    };
}
