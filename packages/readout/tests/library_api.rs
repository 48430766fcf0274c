//! Integration tests for the readout library API

#[test]
fn test_prelude_imports() {
    use readout::prelude::*;

    let words = vec![Word::new("prelude", PixelBox::new(0.0, 0.0, 10.0, 10.0))];
    let selection = SelectionRect::new(0.0, 0.0, 5.0, 5.0);
    let hits = hit_test(&selection, &words, 1.0, 4.0);
    assert_eq!(hits.len(), 1);
    assert_eq!(join_words(&words), "prelude");

    let config = ReaderConfig::default();
    assert_eq!(config.tolerance, readout::DEFAULT_TOLERANCE);
}

#[test]
fn test_direct_imports() {
    use readout::{DisplayRect, PixelBox};

    let rect = DisplayRect::from_word_box(&PixelBox::new(10.0, 10.0, 50.0, 30.0), 2.0);
    assert_eq!(rect, DisplayRect::new(20.0, 20.0, 100.0, 60.0));
}

#[test]
fn test_ocr_types_are_reexported() {
    use readout::{JsonRecognizer, RecognizeOptions, TesseractRecognizer};

    assert_eq!(RecognizeOptions::default().language, "eng");
    let _json = JsonRecognizer::from_words(Vec::new());
    let _tesseract = TesseractRecognizer::new().with_psm(6);
}

#[test]
fn test_geometry_module() {
    use readout::geometry::{Point, SelectionRect};

    let rect = SelectionRect::at(Point::new(4.0, 2.0));
    assert!(rect.is_zero_extent());
}
