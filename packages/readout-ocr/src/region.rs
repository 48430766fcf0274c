use serde::{Deserialize, Serialize};

/// Axis-aligned word box in native image pixels, corners as reported by the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl PixelBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Builds a box from a `left/top/width/height` quadruple.
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    pub fn is_ordered(&self) -> bool {
        self.x0 <= self.x1 && self.y0 <= self.y1
    }

    /// Returns the box with `x0 <= x1` and `y0 <= y1`, or `None` when a coordinate is not finite.
    pub fn normalized(&self) -> Option<Self> {
        if !self.is_finite() {
            return None;
        }
        Some(Self {
            x0: self.x0.min(self.x1),
            y0: self.y0.min(self.y1),
            x1: self.x0.max(self.x1),
            y1: self.y0.max(self.y1),
        })
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// One recognized word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub bbox: PixelBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Word {
    pub fn new(text: impl Into<String>, bbox: PixelBox) -> Self {
        Self {
            text: text.into(),
            bbox,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Joins word texts with single spaces, in order.
pub fn join_words(words: &[Word]) -> String {
    words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_swaps_inverted_corners() {
        let bbox = PixelBox::new(50.0, 30.0, 10.0, 10.0).normalized().unwrap();
        assert_eq!(bbox, PixelBox::new(10.0, 10.0, 50.0, 30.0));
        assert!(bbox.is_ordered());
    }

    #[test]
    fn test_normalized_rejects_nan() {
        assert!(PixelBox::new(f32::NAN, 0.0, 1.0, 1.0).normalized().is_none());
        assert!(PixelBox::new(0.0, 0.0, f32::INFINITY, 1.0).normalized().is_none());
    }

    #[test]
    fn test_from_xywh() {
        let bbox = PixelBox::from_xywh(4.0, 6.0, 10.0, 2.0);
        assert_eq!(bbox.x1, 14.0);
        assert_eq!(bbox.y1, 8.0);
        assert_eq!(bbox.width(), 10.0);
    }

    #[test]
    fn test_word_json_shape() {
        let raw = r#"{"text":"hello","bbox":{"x0":1,"y0":2,"x1":3,"y1":4}}"#;
        let word: Word = serde_json::from_str(raw).unwrap();
        assert_eq!(word.text, "hello");
        assert_eq!(word.bbox, PixelBox::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(word.confidence, None);
    }

    #[test]
    fn test_join_words() {
        let words = vec![
            Word::new("read", PixelBox::new(0.0, 0.0, 1.0, 1.0)),
            Word::new("aloud", PixelBox::new(2.0, 0.0, 3.0, 1.0)),
        ];
        assert_eq!(join_words(&words), "read aloud");
        assert_eq!(join_words(&[]), "");
    }
}
