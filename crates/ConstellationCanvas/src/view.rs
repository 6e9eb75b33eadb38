//! # Viewport System
//!
//! Transforms between Scene Space (where concept positions live) and Screen
//! Space (pointer pixels). The camera zooms around the viewport center, so the
//! composed transform is `translate(center + pan) · scale(zoom) · translate(-center)`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Represents the current camera state: where we are looking (Pan) and how close (Zoom).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Screen-space offset of the scene. A positive value moves the scene right/down.
    pub pan: Vec2,
    /// The scale factor.
    /// - 1.0 = 100% scale.
    /// - Greater than 1.0 = Zoomed In.
    /// - Less than 1.0 = Zoomed Out.
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

/// The camera collapsed into a single affine map: `screen = scene * scale + translation`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraTransform {
    pub translation: Vec2,
    pub scale: f32,
}

impl CameraTransform {
    pub fn apply(&self, p: Vec2) -> Vec2 {
        p * self.scale + self.translation
    }

    pub fn invert(&self, p: Vec2) -> Vec2 {
        (p - self.translation) / self.scale
    }
}

/// The View struct combines the Camera with the actual Viewport size (surface size).
/// It serves as the single source of truth for coordinate conversions.
#[derive(Clone, Debug)]
pub struct View {
    /// The camera state.
    pub camera: Camera,
    /// The size of the drawing surface in device pixels.
    pub viewport_size: Vec2,
}

impl View {
    /// Creates a new View system.
    pub fn new(camera: Camera, viewport_size: Vec2) -> Self {
        Self {
            camera,
            viewport_size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.viewport_size * 0.5
    }

    /// The composed per-frame transform handed to the surface.
    pub fn transform(&self) -> CameraTransform {
        let center = self.center();
        CameraTransform {
            translation: center + self.camera.pan - center * self.camera.zoom,
            scale: self.camera.zoom,
        }
    }

    /// Converts a point from **Scene Space** to **Screen Space**.
    ///
    /// Formula: `Screen = Center + Pan + (Scene - Center) * Zoom`
    pub fn scene_to_screen(&self, scene_pos: Vec2) -> Vec2 {
        let center = self.center();
        center + self.camera.pan + (scene_pos - center) * self.camera.zoom
    }

    /// Converts a point from **Screen Space** to **Scene Space**.
    ///
    /// Formula: `Scene = (Screen - Center - Pan) / Zoom + Center`
    pub fn screen_to_scene(&self, screen_pos: Vec2) -> Vec2 {
        let center = self.center();
        (screen_pos - center - self.camera.pan) / self.camera.zoom + center
    }

    /// Multiplies the zoom by `factor`, clamped to `[min, max]`, keeping the
    /// viewport center fixed. Returns whether the zoom actually changed.
    pub fn zoom_by(&mut self, factor: f32, min: f32, max: f32) -> bool {
        let old_zoom = self.camera.zoom;
        let new_zoom = (old_zoom * factor).clamp(min, max);
        if (new_zoom - old_zoom).abs() > f32::EPSILON {
            self.camera.zoom = new_zoom;
            true
        } else {
            false
        }
    }

    /// Moves the scene by a screen-space delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.camera.pan += delta;
    }

    pub fn reset(&mut self) {
        self.camera = Camera::default();
    }
}
