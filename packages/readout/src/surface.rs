//! Canvas sizing and the display/native scale factor.
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use tracing::{info, warn};

use crate::geometry::SelectionRect;
use crate::word_index::WordIndex;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

/// Everything the overlay, hit-test and gesture code read about the current image.
///
/// The scale factor is only written by the image-load handlers; without a successfully
/// decoded image it stays `None` and selection is inert.
#[derive(Debug, Default)]
pub struct SurfaceState {
    scale: Option<f32>,
    canvas: CanvasSize,
    base: Option<RgbaImage>,
    pub words: WordIndex,
    pub selection: SelectionRect,
}

impl SurfaceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes the canvas to `displayed_width` (aspect ratio preserved) and sets
    /// `scale = displayed / native`. Returns `false` and leaves the surface inert for
    /// degenerate sizes.
    pub fn on_image_load(&mut self, image: &DynamicImage, displayed_width: u32) -> bool {
        let native_width = image.width();
        let native_height = image.height();
        if native_width == 0 || native_height == 0 || displayed_width == 0 {
            warn!(native_width, native_height, displayed_width, "degenerate image size");
            self.on_image_error();
            return false;
        }

        let scale = displayed_width as f32 / native_width as f32;
        let displayed_height = ((native_height as f32 * scale).round() as u32).max(1);
        let base = if displayed_width == native_width {
            image.to_rgba8()
        } else {
            image
                .resize_exact(displayed_width, displayed_height, FilterType::Triangle)
                .to_rgba8()
        };

        info!(
            native_width,
            displayed_width, displayed_height, scale, "image loaded"
        );
        self.scale = Some(scale);
        self.canvas = CanvasSize {
            width: displayed_width,
            height: displayed_height,
        };
        self.base = Some(base);
        true
    }

    /// Decoding failed: drop scale, canvas and base image.
    pub fn on_image_error(&mut self) {
        self.scale = None;
        self.canvas = CanvasSize::default();
        self.base = None;
    }

    pub fn scale(&self) -> Option<f32> {
        self.scale
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn base_image(&self) -> Option<&RgbaImage> {
        self.base.as_ref()
    }
}
