//! Pointer drag lifecycle over the preview.

use glimpse_types::{Point, ViewportRect};

use crate::geometry::intersect;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        anchor: Point,
        current: Point,
    },
}

/// Tracks one drag at a time: `Idle -> Dragging -> Idle`.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    state: DragState,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start a drag. Ignored without a loaded image or when already dragging.
    pub fn pointer_down(&mut self, point: Point, image_loaded: bool) -> bool {
        if !image_loaded || self.is_dragging() {
            return false;
        }

        self.state = DragState::Dragging {
            anchor: point,
            current: point,
        };
        true
    }

    /// Follow the pointer; returns the live rectangle while dragging
    pub fn pointer_move(&mut self, point: Point) -> Option<ViewportRect> {
        if let DragState::Dragging { current, .. } = &mut self.state {
            *current = point;
        }
        self.current_rect()
    }

    /// Finish the drag at `point` and hand back the normalized rectangle.
    /// The tracker is idle afterwards whatever the caller does with it.
    pub fn pointer_up(&mut self, point: Point) -> Option<ViewportRect> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { anchor, .. } => Some(ViewportRect::from_points(anchor, point)),
            DragState::Idle => None,
        }
    }

    /// Leaving the interactive area commits the drag like a release
    pub fn pointer_leave(&mut self, point: Point) -> Option<ViewportRect> {
        self.pointer_up(point)
    }

    /// Drop the drag without producing a rectangle
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }

    pub fn current_rect(&self) -> Option<ViewportRect> {
        match self.state {
            DragState::Dragging { anchor, current } => {
                Some(ViewportRect::from_points(anchor, current))
            }
            DragState::Idle => None,
        }
    }

    /// Live rectangle clipped to the overlay container, for drawing only
    pub fn overlay(&self, container: &ViewportRect) -> Option<ViewportRect> {
        self.current_rect()
            .and_then(|rect| intersect(&rect, container))
    }
}
