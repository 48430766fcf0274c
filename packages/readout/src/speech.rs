//! Playback of selected words through a single shared speech engine.
//!
//! At most one utterance is ever in flight: every new submission cancels the previous one
//! first, and parameter edits restart playback instead of touching a live utterance.
use std::collections::VecDeque;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use readout_ocr::{join_words, Word};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const MIN_RATE: f32 = 0.1;
pub const MAX_RATE: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechParams {
    /// Speaking rate multiplier, 1.0 is the engine's normal speed.
    pub rate: f32,
    /// 0.0 (silent) to 1.0 (full).
    pub volume: f32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            rate: 1.0,
            volume: 1.0,
        }
    }
}

impl SpeechParams {
    pub fn new(rate: f32, volume: f32) -> Self {
        Self { rate, volume }.clamped()
    }

    pub fn clamped(self) -> Self {
        let defaults = Self::default();
        let rate = if self.rate.is_finite() {
            self.rate.clamp(MIN_RATE, MAX_RATE)
        } else {
            defaults.rate
        };
        let volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            defaults.volume
        };
        Self { rate, volume }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub params: SpeechParams,
}

/// The external synthesizer.
pub trait SpeechEngine {
    /// An unavailable engine accepts every call as a no-op.
    fn is_available(&self) -> bool {
        true
    }

    fn speak(&mut self, utterance: &Utterance);

    fn cancel(&mut self);

    /// Next utterance whose playback has ended, if any.
    fn poll_finished(&mut self) -> Option<UtteranceId> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PlaybackState {
    #[default]
    Idle,
    Speaking {
        utterance: UtteranceId,
        params: SpeechParams,
        words: Vec<Word>,
    },
}

pub struct PlaybackController<E> {
    engine: E,
    state: PlaybackState,
    params: SpeechParams,
    selection: Vec<Word>,
    next_id: u64,
}

impl<E: SpeechEngine> PlaybackController<E> {
    pub fn new(engine: E, params: SpeechParams) -> Self {
        Self {
            engine,
            state: PlaybackState::Idle,
            params: params.clamped(),
            selection: Vec::new(),
            next_id: 1,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn is_speaking(&self) -> bool {
        matches!(self.state, PlaybackState::Speaking { .. })
    }

    pub fn params(&self) -> SpeechParams {
        self.params
    }

    /// Words of the last selection handed to `play`.
    pub fn selection(&self) -> &[Word] {
        &self.selection
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Speaks `words` joined by single spaces, cancelling any in-flight utterance first.
    /// An empty list submits nothing and leaves the controller idle.
    pub fn play(&mut self, words: Vec<Word>, params: SpeechParams) {
        self.selection = words;
        self.params = params.clamped();

        if self.selection.is_empty() {
            self.stop();
            return;
        }
        if !self.engine.is_available() {
            debug!("speech engine unavailable, ignoring play");
            self.state = PlaybackState::Idle;
            return;
        }
        if self.is_speaking() {
            self.engine.cancel();
        }

        let utterance = Utterance {
            id: UtteranceId(self.next_id),
            text: join_words(&self.selection),
            params: self.params,
        };
        self.next_id += 1;
        info!(
            id = utterance.id.0,
            words = self.selection.len(),
            rate = utterance.params.rate,
            volume = utterance.params.volume,
            "speaking selection"
        );
        self.engine.speak(&utterance);
        self.state = PlaybackState::Speaking {
            utterance: utterance.id,
            params: utterance.params,
            words: self.selection.clone(),
        };
    }

    /// Cancels the in-flight utterance, if any, and goes idle.
    pub fn stop(&mut self) {
        if let PlaybackState::Speaking { utterance, .. } = &self.state {
            debug!(id = utterance.0, "cancelling utterance");
            self.engine.cancel();
        }
        self.state = PlaybackState::Idle;
    }

    pub fn toggle(&mut self) {
        if self.is_speaking() {
            self.stop();
        } else {
            self.play(self.selection.clone(), self.params);
        }
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.set_params(SpeechParams {
            rate,
            ..self.params
        });
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.set_params(SpeechParams {
            volume,
            ..self.params
        });
    }

    /// Stores new parameters; with a non-empty selection playback restarts with them.
    pub fn set_params(&mut self, params: SpeechParams) {
        self.params = params.clamped();
        if self.selection.is_empty() {
            return;
        }
        self.stop();
        self.play(self.selection.clone(), self.params);
    }

    /// Completion signal from the engine. Stale ids from cancelled utterances are ignored.
    pub fn on_finished(&mut self, id: UtteranceId) -> bool {
        match &self.state {
            PlaybackState::Speaking { utterance, .. } if *utterance == id => {
                debug!(id = id.0, "utterance finished");
                self.state = PlaybackState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Drains completion signals the engine has buffered.
    pub fn pump(&mut self) {
        while let Some(id) = self.engine.poll_finished() {
            self.on_finished(id);
        }
    }
}

/// Stand-in for a platform without speech support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSpeech;

impl SpeechEngine for NullSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&mut self, _utterance: &Utterance) {}

    fn cancel(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    Speak(Utterance),
    Cancel,
}

/// Writes utterances to the log instead of the speakers. Each utterance finishes on the
/// next poll unless it was cancelled.
#[derive(Debug, Default)]
pub struct LogSpeech {
    events: Vec<SpeechEvent>,
    pending: VecDeque<UtteranceId>,
}

impl LogSpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SpeechEvent] {
        &self.events
    }

    pub fn spoken(&self) -> Vec<&Utterance> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SpeechEvent::Speak(utterance) => Some(utterance),
                SpeechEvent::Cancel => None,
            })
            .collect()
    }

    pub fn cancel_count(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, SpeechEvent::Cancel))
            .count()
    }
}

impl SpeechEngine for LogSpeech {
    fn speak(&mut self, utterance: &Utterance) {
        info!(text = %utterance.text, "utterance");
        self.events.push(SpeechEvent::Speak(utterance.clone()));
        self.pending.push_back(utterance.id);
    }

    fn cancel(&mut self) {
        self.events.push(SpeechEvent::Cancel);
        self.pending.clear();
    }

    fn poll_finished(&mut self) -> Option<UtteranceId> {
        self.pending.pop_front()
    }
}

/// Words per minute at rate 1.0 for espeak-compatible commands.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Speaks through an external command such as `espeak`, one child process per utterance.
pub struct CommandSpeech {
    program: PathBuf,
    /// Passed before the rate, volume and text arguments (a voice selection, for example).
    leading_args: Vec<String>,
    available: bool,
    current: Option<(UtteranceId, Child)>,
    failed: VecDeque<UtteranceId>,
}

impl CommandSpeech {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            available: true,
            current: None,
            failed: VecDeque::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Process id of the running speech command, if one is alive.
    pub fn child_id(&self) -> Option<u32> {
        self.current.as_ref().map(|(_, child)| child.id())
    }

    fn command_for(&self, utterance: &Utterance) -> Command {
        let words_per_minute = (BASE_WORDS_PER_MINUTE * utterance.params.rate).round() as u32;
        let amplitude = (utterance.params.volume * 100.0).round() as u32;
        let mut command = Command::new(&self.program);
        command
            .args(&self.leading_args)
            .arg("-s")
            .arg(words_per_minute.to_string())
            .arg("-a")
            .arg(amplitude.to_string())
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

impl Default for CommandSpeech {
    fn default() -> Self {
        Self::new("espeak")
    }
}

impl SpeechEngine for CommandSpeech {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(&mut self, utterance: &Utterance) {
        self.cancel();
        match self.command_for(utterance).spawn() {
            Ok(child) => self.current = Some((utterance.id, child)),
            Err(e) => {
                if e.kind() == ErrorKind::NotFound {
                    self.available = false;
                }
                warn!(program = %self.program.display(), error = %e, "cannot start speech command");
                self.failed.push_back(utterance.id);
            }
        }
    }

    fn cancel(&mut self) {
        if let Some((id, mut child)) = self.current.take() {
            let _ = child.kill();
            let _ = child.wait();
            debug!(id = id.0, "speech command killed");
        }
    }

    fn poll_finished(&mut self) -> Option<UtteranceId> {
        if let Some(id) = self.failed.pop_front() {
            return Some(id);
        }
        let (id, child) = self.current.as_mut()?;
        match child.try_wait() {
            Ok(Some(_)) | Err(_) => {
                let id = *id;
                self.current = None;
                Some(id)
            }
            Ok(None) => None,
        }
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.cancel();
    }
}
