//! Drag-to-select state machine over canvas-local points.
use readout_ocr::Word;
use tracing::debug;

use crate::geometry::{Point, SelectionRect};
use crate::hit_test::hit_test;
use crate::surface::SurfaceState;

/// Raw input from either device, before it enters the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum InputPoint {
    Pointer { x: f32, y: f32 },
    /// Active touch points; only the first is used.
    Touch(Vec<Point>),
}

impl InputPoint {
    /// Collapses pointer and touch input to one point. A touch list with no points yields `None`.
    pub fn to_point(&self) -> Option<Point> {
        match self {
            InputPoint::Pointer { x, y } => Some(Point::new(*x, *y)),
            InputPoint::Touch(touches) => touches.first().copied(),
        }
    }
}

impl From<Point> for InputPoint {
    fn from(point: Point) -> Self {
        InputPoint::Pointer {
            x: point.x,
            y: point.y,
        }
    }
}

/// Whether the hosting surface should still see the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        anchor: Point,
    },
}

#[derive(Debug, Default)]
pub struct GestureController {
    state: GestureState,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Anchors a new drag at `point` and collapses the selection onto it. Always asks the
    /// host to stop propagating the start event.
    pub fn start(&mut self, point: Point, surface: &mut SurfaceState) -> Propagation {
        self.state = GestureState::Dragging { anchor: point };
        surface.selection = SelectionRect::at(point);
        debug!(x = point.x, y = point.y, "drag started");
        Propagation::Stop
    }

    /// Stretches the live selection to `point`. Returns `false` when not dragging.
    pub fn drag_to(&mut self, point: Point, surface: &mut SurfaceState) -> bool {
        let GestureState::Dragging { anchor } = self.state else {
            return false;
        };
        surface.selection = SelectionRect::new(
            anchor.x,
            anchor.y,
            point.x - anchor.x,
            point.y - anchor.y,
        );
        true
    }

    /// Ends the drag, normalizes the selection and returns the words under it.
    ///
    /// Returns `None` when no drag was active. Without a scale (no decoded image) the
    /// selection is kept but nothing is hit.
    pub fn end(&mut self, surface: &mut SurfaceState, tolerance: f32) -> Option<Vec<Word>> {
        if !self.is_dragging() {
            return None;
        }
        self.state = GestureState::Idle;
        surface.selection = surface.selection.normalized();

        let selected: Vec<Word> = match surface.scale() {
            Some(scale) => hit_test(&surface.selection, surface.words.words(), scale, tolerance)
                .into_iter()
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        debug!(
            selected = selected.len(),
            x = surface.selection.x,
            y = surface.selection.y,
            width = surface.selection.width,
            height = surface.selection.height,
            "drag ended"
        );
        Some(selected)
    }
}
