//! One interactive reading surface: image, words, drag selection and playback.
//!
//! All handlers run to completion on the caller's thread and redraw the overlay after every
//! visible change. Recognition is the only asynchronous step and is split into
//! [`ReaderSession::take_recognition_job`] / [`ReaderSession::complete_recognition`] so the
//! host can run it wherever it likes and feed the result back on its own event queue.
use std::sync::Arc;

use image::DynamicImage;
use readout_ocr::{Recognition, RecognizeError, RecognizeInput, RecognizeOptions, Recognizer, Word};
use tracing::{debug, info, warn};

use crate::config::ReaderConfig;
use crate::gesture::{GestureController, InputPoint, Propagation};
use crate::render::{render, DrawSurface};
use crate::speech::{PlaybackController, PlaybackState, SpeechEngine, SpeechParams, UtteranceId};
use crate::surface::SurfaceState;

/// Readiness of the injected recognition engine.
#[derive(Clone, Default)]
pub enum RecognizerState {
    #[default]
    NotLoaded,
    Loading,
    Ready(Arc<dyn Recognizer>),
}

impl RecognizerState {
    pub fn is_ready(&self) -> bool {
        matches!(self, RecognizerState::Ready(_))
    }
}

impl std::fmt::Debug for RecognizerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecognizerState::NotLoaded => f.write_str("NotLoaded"),
            RecognizerState::Loading => f.write_str("Loading"),
            RecognizerState::Ready(_) => f.write_str("Ready"),
        }
    }
}

/// Identifies one image load; results for older loads are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadGeneration(pub u64);

fn decode(input: &RecognizeInput) -> crate::error::Result<DynamicImage> {
    let image = match input {
        RecognizeInput::FilePath(path) => image::open(path)?,
        RecognizeInput::Bytes(bytes) => image::load_from_memory(bytes)?,
    };
    Ok(image)
}

/// A recognition to run for the current image.
pub struct RecognitionJob {
    pub generation: LoadGeneration,
    pub recognizer: Arc<dyn Recognizer>,
    pub input: RecognizeInput,
    pub options: RecognizeOptions,
}

impl RecognitionJob {
    pub async fn run(&self) -> Result<Recognition, RecognizeError> {
        self.recognizer.recognize(&self.input, &self.options).await
    }
}

pub struct ReaderSession<E, D> {
    config: ReaderConfig,
    surface: SurfaceState,
    gesture: GestureController,
    playback: PlaybackController<E>,
    recognizer: RecognizerState,
    canvas: D,
    generation: LoadGeneration,
    pending_recognition: Option<RecognizeInput>,
}

impl<E: SpeechEngine, D: DrawSurface> ReaderSession<E, D> {
    pub fn new(config: ReaderConfig, engine: E, canvas: D) -> Self {
        let config = config.sanitized();
        let playback = PlaybackController::new(engine, config.speech);
        Self {
            config,
            surface: SurfaceState::new(),
            gesture: GestureController::new(),
            playback,
            recognizer: RecognizerState::NotLoaded,
            canvas,
            generation: LoadGeneration(0),
            pending_recognition: None,
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn surface(&self) -> &SurfaceState {
        &self.surface
    }

    pub fn canvas(&self) -> &D {
        &self.canvas
    }

    pub fn playback(&self) -> &PlaybackController<E> {
        &self.playback
    }

    pub fn playback_state(&self) -> &PlaybackState {
        self.playback.state()
    }

    pub fn engine(&self) -> &E {
        self.playback.engine()
    }

    pub fn recognizer_state(&self) -> &RecognizerState {
        &self.recognizer
    }

    pub fn generation(&self) -> LoadGeneration {
        self.generation
    }

    /// The recognizer is being fetched; recognition waits for `install_recognizer`.
    pub fn mark_recognizer_loading(&mut self) {
        if !self.recognizer.is_ready() {
            self.recognizer = RecognizerState::Loading;
        }
    }

    pub fn install_recognizer(&mut self, recognizer: Arc<dyn Recognizer>) {
        self.recognizer = RecognizerState::Ready(recognizer);
    }

    /// Decodes `input` and makes it the current image, displayed `displayed_width` pixels wide.
    ///
    /// Returns `false` when the image could not be decoded; the surface is then inert until
    /// the next successful load.
    pub fn load_image(&mut self, input: RecognizeInput, displayed_width: u32) -> bool {
        match decode(&input) {
            Ok(image) => self.load_decoded(&image, input, displayed_width),
            Err(e) => {
                warn!(error = %e, "image decode failed");
                self.begin_load();
                self.surface.on_image_error();
                self.redraw();
                false
            }
        }
    }

    /// Like [`load_image`](Self::load_image) for an already decoded image. `source` is what
    /// the recognizer will be given.
    pub fn load_decoded(
        &mut self,
        image: &DynamicImage,
        source: RecognizeInput,
        displayed_width: u32,
    ) -> bool {
        self.begin_load();
        let loaded = self.surface.on_image_load(image, displayed_width);
        if loaded {
            self.pending_recognition = Some(source);
        }
        self.redraw();
        loaded
    }

    fn begin_load(&mut self) {
        self.generation = LoadGeneration(self.generation.0 + 1);
        self.pending_recognition = None;
        self.gesture = GestureController::new();
        self.surface.words.replace(Vec::new());
        self.surface.selection = Default::default();
    }

    /// Hands out the recognition for the current image, once. Stays queued while the
    /// recognizer is not ready.
    pub fn take_recognition_job(&mut self) -> Option<RecognitionJob> {
        let RecognizerState::Ready(recognizer) = &self.recognizer else {
            if self.pending_recognition.is_some() {
                debug!(state = ?self.recognizer, "recognizer not ready, recognition deferred");
            }
            return None;
        };
        let input = self.pending_recognition.take()?;
        Some(RecognitionJob {
            generation: self.generation,
            recognizer: Arc::clone(recognizer),
            input,
            options: RecognizeOptions {
                language: self.config.language.clone(),
            },
        })
    }

    /// Feeds a finished recognition back. Returns `true` when the word index was replaced.
    pub fn complete_recognition(
        &mut self,
        generation: LoadGeneration,
        result: Result<Recognition, RecognizeError>,
    ) -> bool {
        if generation != self.generation {
            debug!(
                stale = generation.0,
                current = self.generation.0,
                "dropping recognition for a previous image"
            );
            return false;
        }
        match result {
            Ok(recognition) => {
                let kept = self.surface.words.replace(recognition.words);
                info!(words = kept, "recognition complete");
                self.redraw();
                true
            }
            Err(RecognizeError::Unavailable) => {
                debug!("recognizer unavailable");
                false
            }
            Err(e) => {
                warn!(error = %e, "recognition failed");
                false
            }
        }
    }

    /// Runs the pending recognition inline, if one can run.
    pub async fn run_recognition(&mut self) -> bool {
        let Some(job) = self.take_recognition_job() else {
            return false;
        };
        let result = job.run().await;
        self.complete_recognition(job.generation, result)
    }

    /// Injects words directly, as a finished recognition of the current image would.
    pub fn replace_words(&mut self, words: Vec<Word>) -> usize {
        let kept = self.surface.words.replace(words);
        self.redraw();
        kept
    }

    pub fn pointer_start(&mut self, input: &InputPoint) -> Propagation {
        let Some(point) = input.to_point() else {
            return Propagation::Continue;
        };
        let propagation = self.gesture.start(point, &mut self.surface);
        self.redraw();
        propagation
    }

    pub fn pointer_move(&mut self, input: &InputPoint) {
        let Some(point) = input.to_point() else {
            return;
        };
        if self.gesture.drag_to(point, &mut self.surface) {
            self.redraw();
        }
    }

    /// Finishes the drag and speaks whatever it selected. Returns the selected words.
    pub fn pointer_end(&mut self) -> Option<Vec<Word>> {
        let selected = self.gesture.end(&mut self.surface, self.config.tolerance)?;
        self.redraw();
        self.playback.play(selected.clone(), self.playback.params());
        Some(selected)
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.playback.set_rate(rate);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.playback.set_volume(volume);
    }

    pub fn set_speech_params(&mut self, params: SpeechParams) {
        self.playback.set_params(params);
    }

    pub fn toggle(&mut self) {
        self.playback.toggle();
    }

    pub fn stop(&mut self) {
        self.playback.stop();
    }

    pub fn speech_finished(&mut self, id: UtteranceId) -> bool {
        self.playback.on_finished(id)
    }

    /// Drains speech-engine completion signals.
    pub fn pump(&mut self) {
        self.playback.pump();
    }

    /// Redraws the overlay for the current state.
    pub fn redraw(&mut self) {
        render(
            &self.surface,
            &self.config.word_outline,
            &self.config.selection_outline,
            &mut self.canvas,
        );
    }
}
