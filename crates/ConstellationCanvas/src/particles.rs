//! # Particle Feedback
//!
//! Short-lived points that converge on a target and fade out. The system only
//! receives spawn requests; it does not know what triggered them.

use glam::{Vec2, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use crate::config::ParticleConfig;

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub target: Vec2,
    pub color: Vec4,
    pub size: f32,
    pub life: i32,
    pub max_life: i32,
}

impl Particle {
    /// Drawing opacity, `life / max_life`.
    pub fn opacity(&self) -> f32 {
        if self.max_life <= 0 {
            return 0.0;
        }
        (self.life as f32 / self.max_life as f32).clamp(0.0, 1.0)
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}

pub struct ParticleSystem {
    config: ParticleConfig,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleSystem {
    pub fn new(config: ParticleConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic spawn positions for a given seed.
    pub fn with_seed(config: ParticleConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: ParticleConfig, rng: StdRng) -> Self {
        Self {
            config,
            particles: Vec::new(),
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Spawns `count` particles on a ring around `target`, all converging on it.
    pub fn spawn_burst(&mut self, target: Vec2, count: usize, color: Vec4) {
        let cfg = &self.config;
        self.particles.reserve(count);
        for _ in 0..count {
            let angle = self.rng.gen_range(0.0..TAU);
            let distance = self
                .rng
                .gen_range(cfg.burst_min_distance..=cfg.burst_max_distance);
            let life = self.rng.gen_range(cfg.life_min..=cfg.life_max);
            let size = self.rng.gen_range(cfg.size_min..=cfg.size_max);
            self.particles.push(Particle {
                position: target + Vec2::from_angle(angle) * distance,
                target,
                color,
                size,
                life,
                max_life: life,
            });
        }
        tracing::trace!(count, total = self.particles.len(), "Spawned particle burst");
    }

    /// Advances every particle one tick and retires the dead ones.
    ///
    /// Returns whether any particle moved.
    pub fn tick(&mut self) -> bool {
        let cfg = &self.config;
        let mut moved = false;
        for particle in &mut self.particles {
            let remaining = particle.target - particle.position;
            if remaining.length() > cfg.arrive_epsilon {
                particle.position += remaining * cfg.approach_fraction;
                particle.life -= 1;
                moved = true;
            } else {
                particle.life -= cfg.rest_decay;
            }
        }
        self.particles.retain(Particle::is_alive);
        moved
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}
