//! The particle record and its per-frame update.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Phase advance per frame tick.
pub const PHASE_STEP: f32 = 0.02;
/// Opacity at phase zero (centre of the pulse).
pub const OPACITY_BASE: f32 = 0.2;
/// Amplitude of the opacity pulse.
pub const OPACITY_AMPLITUDE: f32 = 0.3;
/// Lowest opacity the pulse can produce.
pub const OPACITY_MIN: f32 = -0.1;
/// Highest opacity the pulse can produce.
pub const OPACITY_MAX: f32 = 0.5;

/// Opacity for a given pulse phase.
///
/// Ranges over `[OPACITY_MIN, OPACITY_MAX]`, which dips below zero; callers
/// clamp with [`Particle::draw_alpha`] before drawing.
#[inline]
pub fn pulse_opacity(phase: f32) -> f32 {
    OPACITY_BASE + phase.sin() * OPACITY_AMPLITUDE
}

/// One animated dot of the backdrop.
///
/// Plain old data so a pool can be copied wholesale into a snapshot or a GPU
/// buffer with `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Particle {
    /// Current position in surface units.
    pub position: Vec2,
    /// Displacement per frame. Fixed at spawn.
    pub velocity: Vec2,
    /// Tint. Fixed at spawn.
    pub color: Vec3,
    /// Inner disc radius. Fixed at spawn.
    pub size: f32,
    /// Pulse phase accumulator, radians.
    pub phase: f32,
    /// Current pulse opacity, derived from `phase`.
    pub opacity: f32,
}

impl Particle {
    /// Create a particle, deriving its opacity from `phase`.
    pub fn new(position: Vec2, velocity: Vec2, size: f32, color: Vec3, phase: f32) -> Self {
        Self {
            position,
            velocity,
            color,
            size,
            phase,
            opacity: pulse_opacity(phase),
        }
    }

    /// Advance by one fixed step: integrate, pulse, then wrap into `bounds`.
    #[inline]
    pub fn step(&mut self, bounds: Vec2) {
        self.position += self.velocity;
        self.phase += PHASE_STEP;
        self.opacity = pulse_opacity(self.phase);
        self.wrap(bounds);
    }

    /// Toroidal wrap: leaving past one edge re-enters at the opposite edge.
    ///
    /// An axis with a zero (or negative) bound is left untouched.
    #[inline]
    pub fn wrap(&mut self, bounds: Vec2) {
        self.position.x = wrap_axis(self.position.x, bounds.x);
        self.position.y = wrap_axis(self.position.y, bounds.y);
    }

    /// Opacity clamped for drawing.
    #[inline]
    pub fn draw_alpha(&self) -> f32 {
        self.opacity.clamp(0.0, 1.0)
    }
}

#[inline]
fn wrap_axis(value: f32, bound: f32) -> f32 {
    if bound <= 0.0 {
        return value;
    }
    if value > bound {
        0.0
    } else if value < 0.0 {
        bound
    } else {
        value
    }
}
