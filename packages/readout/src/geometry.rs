//! Display-space geometry shared by the gesture, hit-test and overlay code.
//!
//! Word boxes arrive in native image pixels ([`PixelBox`]); everything on this side of the
//! scale factor is canvas-local display pixels.
use readout_ocr::PixelBox;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Drag rectangle in canvas pixels. While a drag is live `width`/`height` may be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SelectionRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero-size rectangle anchored at `point`.
    pub fn at(point: Point) -> Self {
        Self::new(point.x, point.y, 0.0, 0.0)
    }

    /// Same screen area with `(x, y)` moved to the top-left corner and non-negative extent.
    pub fn normalized(&self) -> Self {
        Self {
            x: self.x.min(self.x + self.width),
            y: self.y.min(self.y + self.height),
            width: self.width.abs(),
            height: self.height.abs(),
        }
    }

    pub fn is_normalized(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }

    pub fn is_zero_extent(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    pub fn to_display_rect(&self) -> DisplayRect {
        let n = self.normalized();
        DisplayRect {
            left: n.x,
            top: n.y,
            right: n.x + n.width,
            bottom: n.y + n.height,
        }
    }
}

/// Edge-form rectangle in display pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl DisplayRect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Maps a native-pixel word box onto the canvas.
    pub fn from_word_box(bbox: &PixelBox, scale: f32) -> Self {
        Self {
            left: bbox.x0 * scale,
            top: bbox.y0 * scale,
            right: bbox.x1 * scale,
            bottom: bbox.y1 * scale,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Axis-aligned intersection with `tolerance` pixels of slack on every side.
    /// Touching edges count as overlap. Symmetric in `self` and `other`.
    pub fn overlaps(&self, other: &DisplayRect, tolerance: f32) -> bool {
        let gap_x = self.left.max(other.left) - self.right.min(other.right);
        let gap_y = self.top.max(other.top) - self.bottom.min(other.bottom);
        gap_x <= tolerance && gap_y <= tolerance
    }
}
