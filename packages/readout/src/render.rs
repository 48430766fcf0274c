//! Overlay redraw: base image, word outlines, selection outline.
use std::path::Path;

use image::RgbaImage;
use tiny_skia::{ColorU8, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::config::StrokeStyle;
use crate::error::{ReadoutError, Result};
use crate::geometry::DisplayRect;
use crate::surface::SurfaceState;

/// Drawing primitives the overlay needs from a canvas.
pub trait DrawSurface {
    /// Clears the canvas and resizes it to `width` x `height`.
    fn clear(&mut self, width: u32, height: u32);
    /// Draws `image` at the canvas origin.
    fn draw_base_image(&mut self, image: &RgbaImage);
    fn stroke_rect(&mut self, rect: DisplayRect, style: &StrokeStyle);
}

/// Redraws `state` from scratch onto `target`. Idempotent for an unchanged state.
///
/// Word outlines are stroked in word-index order; the selection outline is skipped while the
/// selection has no extent.
pub fn render<D: DrawSurface + ?Sized>(
    state: &SurfaceState,
    word_style: &StrokeStyle,
    selection_style: &StrokeStyle,
    target: &mut D,
) {
    let canvas = state.canvas();
    target.clear(canvas.width, canvas.height);
    if let Some(base) = state.base_image() {
        target.draw_base_image(base);
    }

    if let Some(scale) = state.scale() {
        for word in state.words.words() {
            target.stroke_rect(DisplayRect::from_word_box(&word.bbox, scale), word_style);
        }
    }

    if !state.selection.is_zero_extent() {
        target.stroke_rect(state.selection.to_display_rect(), selection_style);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { width: u32, height: u32 },
    BaseImage { width: u32, height: u32 },
    StrokeRect { rect: DisplayRect, style: StrokeStyle },
}

/// Surface that only records what was drawn since the last `clear`.
#[derive(Debug, Default)]
pub struct DrawRecorder {
    commands: Vec<DrawCommand>,
    frames: usize,
}

impl DrawRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the latest frame.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn stroked_rects(&self) -> Vec<(DisplayRect, StrokeStyle)> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::StrokeRect { rect, style } => Some((*rect, *style)),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for DrawRecorder {
    fn clear(&mut self, width: u32, height: u32) {
        self.commands.clear();
        self.frames += 1;
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn draw_base_image(&mut self, image: &RgbaImage) {
        self.commands.push(DrawCommand::BaseImage {
            width: image.width(),
            height: image.height(),
        });
    }

    fn stroke_rect(&mut self, rect: DisplayRect, style: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            style: *style,
        });
    }
}

/// Raster canvas backed by a `tiny-skia` pixmap.
#[derive(Default)]
pub struct PixmapSurface {
    pixmap: Option<Pixmap>,
}

impl PixmapSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let pixmap = self
            .pixmap
            .as_ref()
            .ok_or_else(|| ReadoutError::Export("nothing has been drawn".into()))?;
        pixmap
            .save_png(path.as_ref())
            .map_err(|e| ReadoutError::Export(e.to_string()))
    }
}

impl DrawSurface for PixmapSurface {
    fn clear(&mut self, width: u32, height: u32) {
        // tiny-skia refuses zero-sized pixmaps; an empty canvas is simply absent.
        self.pixmap = Pixmap::new(width, height);
    }

    fn draw_base_image(&mut self, image: &RgbaImage) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let width = pixmap.width().min(image.width());
        let height = pixmap.height().min(image.height());
        let stride = pixmap.width() as usize;
        let pixels = pixmap.pixels_mut();
        for y in 0..height {
            for x in 0..width {
                let [r, g, b, a] = image.get_pixel(x, y).0;
                pixels[y as usize * stride + x as usize] =
                    ColorU8::from_rgba(r, g, b, a).premultiply();
            }
        }
    }

    fn stroke_rect(&mut self, rect: DisplayRect, style: &StrokeStyle) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let mut paint = Paint::default();
        let [r, g, b, a] = style.color;
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: style.width,
            ..Default::default()
        };

        let mut pb = PathBuilder::new();
        pb.move_to(rect.left, rect.top);
        pb.line_to(rect.right, rect.top);
        pb.line_to(rect.right, rect.bottom);
        pb.line_to(rect.left, rect.bottom);
        pb.close();
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }
}
