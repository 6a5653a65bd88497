//! Spawn context for particle initialization.
//!
//! Wraps the engine's RNG with the handful of sampling helpers a backdrop
//! particle needs, so the engine itself never touches raw ranges.

use crate::particle::Particle;
use crate::visuals::Palette;
use glam::{Vec2, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

/// Ranges particles are sampled from at creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRanges {
    /// Largest speed per axis; velocity components fall in `[-max_speed, max_speed)`.
    pub max_speed: f32,
    /// Smallest inner radius.
    pub size_min: f32,
    /// Largest inner radius (exclusive).
    pub size_max: f32,
}

impl Default for SpawnRanges {
    fn default() -> Self {
        Self {
            max_speed: 0.5,
            size_min: 1.0,
            size_max: 4.0,
        }
    }
}

/// Context handed out for each particle being created.
pub struct SpawnContext<'a, R: Rng + ?Sized> {
    /// Index of the particle being spawned (0 to count-1).
    pub index: usize,
    /// Total number of particles being spawned.
    pub count: usize,
    /// Surface size particles are scattered over.
    pub bounds: Vec2,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> SpawnContext<'a, R> {
    pub(crate) fn new(index: usize, count: usize, bounds: Vec2, rng: &'a mut R) -> Self {
        Self {
            index,
            count,
            bounds,
            rng,
        }
    }

    /// Normalized progress through the spawn (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        self.index as f32 / self.count as f32
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Uniform point in `[0, bounds.x) × [0, bounds.y)`.
    pub fn random_in_bounds(&mut self) -> Vec2 {
        Vec2::new(self.random() * self.bounds.x, self.random() * self.bounds.y)
    }

    /// Velocity with each component uniform in `[-max_speed, max_speed)`.
    pub fn random_velocity(&mut self, max_speed: f32) -> Vec2 {
        Vec2::new(
            self.random_range(-max_speed, max_speed),
            self.random_range(-max_speed, max_speed),
        )
    }

    /// Pulse phase uniform in `[0, 2π)`.
    pub fn random_phase(&mut self) -> f32 {
        self.random() * TAU
    }

    /// Color drawn uniformly from `palette`.
    pub fn random_color(&mut self, palette: &Palette) -> Vec3 {
        palette.sample(&mut *self.rng)
    }

    /// Create one backdrop particle.
    pub fn particle(&mut self, ranges: &SpawnRanges, palette: &Palette) -> Particle {
        let position = self.random_in_bounds();
        let size = self.random_range(ranges.size_min, ranges.size_max);
        let velocity = self.random_velocity(ranges.max_speed);
        let color = self.random_color(palette);
        let phase = self.random_phase();
        Particle::new(position, velocity, size, color, phase)
    }
}
