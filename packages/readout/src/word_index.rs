use readout_ocr::Word;
use tracing::{debug, warn};

/// Words of the latest recognition, in recognizer order.
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    words: Vec<Word>,
}

impl WordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the previous set and ingests `words`.
    ///
    /// Inverted corners are reordered, words with non-finite coordinates or blank text are
    /// dropped. Returns how many words were kept.
    pub fn replace(&mut self, words: Vec<Word>) -> usize {
        let received = words.len();
        self.words = words.into_iter().filter_map(ingest).collect();
        let dropped = received - self.words.len();
        if dropped > 0 {
            warn!(dropped, "rejected malformed words from recognizer");
        }
        debug!(words = self.words.len(), "word index replaced");
        self.words.len()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

fn ingest(mut word: Word) -> Option<Word> {
    if word.text.trim().is_empty() {
        return None;
    }
    word.bbox = word.bbox.normalized()?;
    Some(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use readout_ocr::PixelBox;

    fn word(text: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> Word {
        Word::new(text, PixelBox::new(x0, y0, x1, y1))
    }

    #[test]
    fn test_replace_discards_previous() {
        let mut index = WordIndex::new();
        index.replace(vec![word("one", 0.0, 0.0, 1.0, 1.0)]);
        index.replace(vec![
            word("two", 0.0, 0.0, 1.0, 1.0),
            word("three", 2.0, 0.0, 3.0, 1.0),
        ]);
        let texts: Vec<_> = index.words().iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "three"]);
    }

    #[test]
    fn test_replace_clamps_inverted_boxes() {
        let mut index = WordIndex::new();
        index.replace(vec![word("flip", 50.0, 30.0, 10.0, 10.0)]);
        assert_eq!(index.words()[0].bbox, PixelBox::new(10.0, 10.0, 50.0, 30.0));
    }

    #[test]
    fn test_replace_rejects_malformed() {
        let mut index = WordIndex::new();
        let kept = index.replace(vec![
            word("ok", 0.0, 0.0, 1.0, 1.0),
            word("nan", f32::NAN, 0.0, 1.0, 1.0),
            word("   ", 0.0, 0.0, 1.0, 1.0),
        ]);
        assert_eq!(kept, 1);
        assert_eq!(index.words()[0].text, "ok");
    }

    #[test]
    fn test_replace_with_empty_set() {
        let mut index = WordIndex::new();
        index.replace(vec![word("one", 0.0, 0.0, 1.0, 1.0)]);
        assert_eq!(index.replace(Vec::new()), 0);
        assert!(index.is_empty());
    }
}
