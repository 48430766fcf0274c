//! End-to-end flows through `ReaderSession`

use std::sync::Arc;

use image::{DynamicImage, RgbaImage};
use readout::{
    DrawRecorder, InputPoint, JsonRecognizer, LogSpeech, PixelBox, PlaybackState, Point,
    ReaderConfig, ReaderSession, RecognizeInput, SpeechEvent, SpeechParams, Word,
};

fn page() -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::new(100, 50))
}

fn pointer(x: f32, y: f32) -> InputPoint {
    InputPoint::Pointer { x, y }
}

fn words() -> Vec<Word> {
    vec![
        Word::new("read", PixelBox::new(10.0, 10.0, 30.0, 20.0)),
        Word::new("this", PixelBox::new(35.0, 10.0, 50.0, 20.0)),
        Word::new("not", PixelBox::new(10.0, 35.0, 30.0, 45.0)),
    ]
}

async fn loaded_session() -> ReaderSession<LogSpeech, DrawRecorder> {
    let mut session =
        ReaderSession::new(ReaderConfig::default(), LogSpeech::new(), DrawRecorder::new());
    session.install_recognizer(Arc::new(JsonRecognizer::from_words(words())));
    assert!(session.load_decoded(&page(), RecognizeInput::Bytes(Vec::new()), 200));
    assert!(session.run_recognition().await);
    session
}

#[tokio::test]
async fn test_recognition_populates_words() {
    let mut session = loaded_session().await;
    assert_eq!(session.surface().words.len(), 3);
    assert_eq!(session.surface().scale(), Some(2.0));
    assert!(!session.run_recognition().await, "recognition runs once per load");
}

#[tokio::test]
async fn test_touch_drag_selects_first_line() {
    let mut session = loaded_session().await;
    session.pointer_start(&InputPoint::Touch(vec![
        Point::new(110.0, 45.0),
        Point::new(0.0, 0.0),
    ]));
    session.pointer_move(&InputPoint::Touch(vec![Point::new(15.0, 15.0)]));
    let selected = session.pointer_end().unwrap();

    let texts: Vec<_> = selected.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(texts, vec!["read", "this"]);
    assert_eq!(session.engine().spoken()[0].text, "read this");
}

#[tokio::test]
async fn test_rate_change_while_speaking_restarts_once() {
    let mut session = loaded_session().await;
    session.pointer_start(&pointer(15.0, 15.0));
    session.pointer_move(&pointer(110.0, 45.0));
    session.pointer_end();
    assert!(matches!(session.playback_state(), PlaybackState::Speaking { .. }));

    session.set_rate(2.0);

    let events = session.engine().events();
    assert_eq!(session.engine().cancel_count(), 1);
    assert!(matches!(
        events,
        [SpeechEvent::Speak(_), SpeechEvent::Cancel, SpeechEvent::Speak(_)]
    ));
    let restarted = &session.engine().spoken()[1];
    assert_eq!(restarted.text, "read this");
    assert_eq!(restarted.params, SpeechParams::new(2.0, 1.0));
    assert!(matches!(
        session.playback_state(),
        PlaybackState::Speaking { params, .. } if params.rate == 2.0
    ));
}

#[tokio::test]
async fn test_completion_then_toggle_replays() {
    let mut session = loaded_session().await;
    session.pointer_start(&pointer(15.0, 15.0));
    session.pointer_move(&pointer(110.0, 45.0));
    session.pointer_end();

    session.pump();
    assert_eq!(session.playback_state(), &PlaybackState::Idle);

    session.toggle();
    assert!(session.playback().is_speaking());
    session.toggle();
    assert_eq!(session.playback_state(), &PlaybackState::Idle);
    assert_eq!(session.engine().spoken().len(), 2);
}

#[tokio::test]
async fn test_new_image_discards_words_and_selection() {
    let mut session = loaded_session().await;
    session.pointer_start(&pointer(15.0, 15.0));
    session.pointer_move(&pointer(110.0, 45.0));
    session.pointer_end();

    session.load_decoded(&page(), RecognizeInput::Bytes(Vec::new()), 100);
    assert!(session.surface().words.is_empty());
    assert!(session.surface().selection.is_zero_extent());
    assert_eq!(session.surface().scale(), Some(1.0));
}

#[tokio::test]
async fn test_selection_without_recognizer_is_empty() {
    let mut session =
        ReaderSession::new(ReaderConfig::default(), LogSpeech::new(), DrawRecorder::new());
    session.load_decoded(&page(), RecognizeInput::Bytes(Vec::new()), 200);
    assert!(!session.run_recognition().await);

    session.pointer_start(&pointer(0.0, 0.0));
    session.pointer_move(&pointer(200.0, 100.0));
    assert_eq!(session.pointer_end(), Some(Vec::new()));
    assert!(session.engine().events().is_empty());
}
