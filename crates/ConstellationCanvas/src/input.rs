//! # Input Protocol
//!
//! Discrete pointer events the host forwards to the engine, in arrival order.
//! Positions are in Screen Space (pixels relative to the drawing surface).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which button a pointer event refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    /// Left mouse button, primary touch contact.
    #[default]
    Primary,
    /// Right mouse button. Always pans.
    Secondary,
    /// Middle mouse button. Always pans.
    Middle,
}

impl PointerButton {
    /// Buttons that pan regardless of what is under the pointer.
    pub fn always_pans(self) -> bool {
        !matches!(self, PointerButton::Primary)
    }
}

/// The kind of pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    /// The pointer left the surface.
    Leave,
    /// Wheel scroll. Positive `delta_y` scrolls down and zooms out.
    Wheel { delta_y: f32 },
}

/// A single pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Pointer position in Screen Space.
    pub position: Vec2,
    /// Button for `Down`/`Up`. Ignored for other kinds.
    pub button: PointerButton,
    /// Host timestamp in milliseconds.
    pub time_ms: u64,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            button: PointerButton::Primary,
            time_ms: 0,
        }
    }

    pub fn down(position: Vec2) -> Self {
        Self::new(PointerKind::Down, position)
    }

    pub fn moved(position: Vec2) -> Self {
        Self::new(PointerKind::Move, position)
    }

    pub fn up(position: Vec2) -> Self {
        Self::new(PointerKind::Up, position)
    }

    pub fn leave(position: Vec2) -> Self {
        Self::new(PointerKind::Leave, position)
    }

    pub fn wheel(position: Vec2, delta_y: f32) -> Self {
        Self::new(PointerKind::Wheel { delta_y }, position)
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn at_time(mut self, time_ms: u64) -> Self {
        self.time_ms = time_ms;
        self
    }
}

/// Cursor affordance the host should display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorIcon {
    /// Hovering a node.
    Pointer,
    /// Idle over empty space.
    #[default]
    Grab,
    /// Panning.
    Grabbing,
}
