//! # Configuration
//!
//! This module defines the configuration struct for the Constellation engine.

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::error::CanvasError;
use crate::model::Domain;

/// Configuration parameters for the Constellation.
///
/// These settings allow the host application to tune the feel of the canvas interactions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Lowest allowed zoom factor. Default: 0.5.
    pub zoom_min: f32,
    /// Highest allowed zoom factor. Default: 2.0.
    pub zoom_max: f32,
    /// Zoom change per unit of wheel delta. Default: 0.001.
    pub zoom_speed: f32,
    /// Screen-space distance in pixels separating a click from a drag. Default: 5.0.
    pub drag_threshold: f32,
    /// Extra scene-space slack added around every node for hit-testing. Default: 5.0.
    pub hit_padding: f32,
    /// Radius of a node at 0 mastery. Default: 8.0.
    pub min_node_radius: f32,
    /// Radius of a node at 100 mastery. Default: 20.0.
    pub max_node_radius: f32,
    /// Mastery granted to both endpoints of a newly formed connection. Default: 5.
    pub connection_mastery_bonus: i32,
    /// Particles spawned when a node is newly discovered. Default: 15.
    pub discovery_burst: usize,
    /// Particles spawned at the midpoint of a new connection. Default: 20.
    pub connection_burst: usize,
    /// Draw the name of every discovered node, not only the active ones.
    pub show_all_labels: bool,
    /// Seed for the background starfield so it stays put for a session.
    pub background_seed: u64,
    /// Number of stars in the background.
    pub star_count: usize,
    /// Particle tuning.
    #[serde(default)]
    pub particles: ParticleConfig,
    /// Visual styling configuration.
    #[serde(default)]
    pub style: CanvasStyle,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            zoom_min: 0.5,
            zoom_max: 2.0,
            zoom_speed: 0.001,
            drag_threshold: 5.0,
            hit_padding: 5.0,
            min_node_radius: 8.0,
            max_node_radius: 20.0,
            connection_mastery_bonus: 5,
            discovery_burst: 15,
            connection_burst: 20,
            show_all_labels: false,
            background_seed: 0x5747_a3c1,
            star_count: 160,
            particles: ParticleConfig::default(),
            style: CanvasStyle::default(),
        }
    }
}

impl CanvasConfig {
    /// Checks the values the engine relies on for its arithmetic.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if !(self.zoom_min > 0.0 && self.zoom_min <= self.zoom_max && self.zoom_max.is_finite()) {
            return Err(CanvasError::InvalidZoomRange {
                min: self.zoom_min,
                max: self.zoom_max,
            });
        }
        if !(self.drag_threshold >= 0.0 && self.drag_threshold.is_finite()) {
            return Err(CanvasError::InvalidConfig(format!(
                "drag_threshold must be finite and >= 0, got {}",
                self.drag_threshold
            )));
        }
        if !(self.min_node_radius > 0.0 && self.min_node_radius <= self.max_node_radius) {
            return Err(CanvasError::InvalidConfig(format!(
                "node radius range [{}, {}] is empty",
                self.min_node_radius, self.max_node_radius
            )));
        }
        if self.hit_padding < 0.0 {
            return Err(CanvasError::InvalidConfig(
                "hit_padding must be >= 0".to_string(),
            ));
        }
        self.particles.validate()
    }
}

/// Tuning for the feedback particles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParticleConfig {
    /// Fraction of the remaining distance covered per tick. Default: 0.05.
    pub approach_fraction: f32,
    /// Distance under which a particle counts as arrived. Default: 0.5.
    pub arrive_epsilon: f32,
    /// Life lost per tick once arrived. Default: 3.
    pub rest_decay: i32,
    /// Shortest lifetime in ticks.
    pub life_min: i32,
    /// Longest lifetime in ticks. Also the upper bound on how long any particle lives.
    pub life_max: i32,
    /// Spawn ring inner radius around the target.
    pub burst_min_distance: f32,
    /// Spawn ring outer radius around the target.
    pub burst_max_distance: f32,
    pub size_min: f32,
    pub size_max: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            approach_fraction: 0.05,
            arrive_epsilon: 0.5,
            rest_decay: 3,
            life_min: 40,
            life_max: 70,
            burst_min_distance: 30.0,
            burst_max_distance: 80.0,
            size_min: 1.5,
            size_max: 3.5,
        }
    }
}

impl ParticleConfig {
    fn validate(&self) -> Result<(), CanvasError> {
        if !(self.approach_fraction > 0.0 && self.approach_fraction <= 1.0) {
            return Err(CanvasError::InvalidConfig(format!(
                "approach_fraction must be in (0, 1], got {}",
                self.approach_fraction
            )));
        }
        if self.rest_decay < 1 || self.life_min < 1 || self.life_min > self.life_max {
            return Err(CanvasError::InvalidConfig(
                "particle lifetimes must be positive and life_min <= life_max".to_string(),
            ));
        }
        if self.burst_min_distance > self.burst_max_distance || self.size_min > self.size_max {
            return Err(CanvasError::InvalidConfig(
                "particle spawn ranges are inverted".to_string(),
            ));
        }
        Ok(())
    }
}

/// Visual styling configuration for the Constellation.
///
/// It uses `glam::Vec4` for RGBA colors.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CanvasStyle {
    /// Deep-space clear color.
    pub background_color: Vec4,
    /// Color of the background stars.
    pub star_color: Vec4,
    /// Tint of the nebula clouds behind the graph.
    pub nebula_color: Vec4,
    /// Neutral color used for emphasised edges and the mastery ring.
    pub highlight_color: Vec4,
    /// Color of the dashed line previewing a pending connection.
    pub preview_color: Vec4,
    /// Color of node labels.
    pub label_color: Vec4,
    /// Font size of node labels in scene units.
    pub label_size: f32,
    /// One color per knowledge domain.
    #[serde(default)]
    pub domains: DomainPalette,
}

impl Default for CanvasStyle {
    fn default() -> Self {
        Self {
            background_color: Vec4::new(0.02, 0.02, 0.06, 1.0),
            star_color: Vec4::new(0.85, 0.88, 1.0, 0.8),
            nebula_color: Vec4::new(0.35, 0.2, 0.55, 0.12),
            highlight_color: Vec4::new(1.0, 1.0, 1.0, 0.9),
            preview_color: Vec4::new(1.0, 1.0, 1.0, 0.6),
            label_color: Vec4::new(0.92, 0.92, 0.96, 1.0),
            label_size: 12.0,
            domains: DomainPalette::default(),
        }
    }
}

/// Fill colors keyed by knowledge domain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DomainPalette {
    pub science: Vec4,
    pub mathematics: Vec4,
    pub history: Vec4,
    pub language: Vec4,
    pub arts: Vec4,
    pub technology: Vec4,
}

impl Default for DomainPalette {
    fn default() -> Self {
        Self {
            science: Vec4::new(0.30, 0.80, 0.55, 1.0),
            mathematics: Vec4::new(0.35, 0.55, 1.0, 1.0),
            history: Vec4::new(0.95, 0.70, 0.30, 1.0),
            language: Vec4::new(0.90, 0.40, 0.55, 1.0),
            arts: Vec4::new(0.75, 0.45, 0.95, 1.0),
            technology: Vec4::new(0.30, 0.85, 0.95, 1.0),
        }
    }
}

impl DomainPalette {
    pub fn color(&self, domain: Domain) -> Vec4 {
        match domain {
            Domain::Science => self.science,
            Domain::Mathematics => self.mathematics,
            Domain::History => self.history,
            Domain::Language => self.language,
            Domain::Arts => self.arts,
            Domain::Technology => self.technology,
        }
    }
}
