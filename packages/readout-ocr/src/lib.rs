pub mod engine;
pub mod json;
pub mod region;
pub mod tesseract;

pub use engine::{Recognition, RecognizeError, RecognizeInput, RecognizeOptions, Recognizer};
pub use json::{parse_words_json, JsonRecognizer};
pub use region::{join_words, PixelBox, Word};
pub use tesseract::TesseractRecognizer;
