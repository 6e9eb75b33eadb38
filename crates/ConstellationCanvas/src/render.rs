//! # Rendering System
//!
//! The engine never rasterizes. It emits `DrawCommand`s into a [`Surface`];
//! the host (a 2D canvas, macroquad, an SVG writer) interprets them.
//!
//! Commands between `PushTransform` and `PopTransform` are in **Scene Space**
//! and must be mapped through the pushed camera transform.

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::view::CameraTransform;

/// How a shape or stroke is colored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    Solid(Vec4),
    /// Linear interpolation from `from` at `start` to `to` at `end`.
    LinearGradient {
        start: Vec2,
        end: Vec2,
        from: Vec4,
        to: Vec4,
    },
    /// Radial falloff from `inner` at the center to `outer` at `radius`.
    RadialGradient {
        center: Vec2,
        radius: f32,
        inner: Vec4,
        outer: Vec4,
    },
}

impl Paint {
    /// A single representative color, for hosts without gradient support.
    pub fn average(&self) -> Vec4 {
        match self {
            Paint::Solid(color) => *color,
            Paint::LinearGradient { from, to, .. } => (*from + *to) * 0.5,
            Paint::RadialGradient { inner, outer, .. } => (*inner + *outer) * 0.5,
        }
    }
}

/// A single drawing primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Fill the whole surface, ignoring any transform.
    Clear { color: Vec4 },
    /// Apply the camera transform to every following command until `PopTransform`.
    PushTransform(CameraTransform),
    PopTransform,
    /// A filled circle.
    Circle {
        center: Vec2,
        radius: f32,
        paint: Paint,
    },
    /// A circular stroke from `start_angle` sweeping `sweep` radians clockwise.
    Arc {
        center: Vec2,
        radius: f32,
        start_angle: f32,
        sweep: f32,
        width: f32,
        color: Vec4,
    },
    /// A straight line segment, optionally dashed (`[dash, gap]`).
    Line {
        start: Vec2,
        end: Vec2,
        width: f32,
        paint: Paint,
        dash: Option<[f32; 2]>,
    },
    /// Text horizontally centered on `pos`.
    Text {
        pos: Vec2,
        text: String,
        color: Vec4,
        /// Font size in scene units.
        size: f32,
    },
}

/// Anything that accepts draw commands.
pub trait Surface {
    fn draw(&mut self, command: DrawCommand);
}

/// A list of draw commands representing the current frame.
pub type RenderList = Vec<DrawCommand>;

impl Surface for RenderList {
    fn draw(&mut self, command: DrawCommand) {
        self.push(command);
    }
}
