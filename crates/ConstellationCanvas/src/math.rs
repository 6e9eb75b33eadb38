use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn expand(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) * 0.5
}

/// Linear blend of two RGBA colors.
pub fn mix(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    a.lerp(b, t.clamp(0.0, 1.0))
}

/// Same color, different alpha.
pub fn with_alpha(color: Vec4, alpha: f32) -> Vec4 {
    Vec4::new(color.x, color.y, color.z, alpha.clamp(0.0, 1.0))
}

/// Scales the RGB channels, leaving alpha untouched. Channels saturate at 1.0.
pub fn brighten(color: Vec4, factor: f32) -> Vec4 {
    Vec4::new(
        (color.x * factor).min(1.0),
        (color.y * factor).min(1.0),
        (color.z * factor).min(1.0),
        color.w,
    )
}

/// Splits a segment into dash sub-segments of `dash` length separated by `gap`.
pub fn dash_segments(start: Vec2, end: Vec2, dash: f32, gap: f32) -> Vec<(Vec2, Vec2)> {
    let length = start.distance(end);
    let period = dash + gap;
    if length <= f32::EPSILON || period <= 0.0 {
        return Vec::new();
    }
    let dir = (end - start) / length;
    let mut segments = Vec::new();
    let mut t = 0.0;
    while t < length {
        let t_end = (t + dash).min(length);
        segments.push((start + dir * t, start + dir * t_end));
        t += period;
    }
    segments
}
