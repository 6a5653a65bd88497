//! Damped springs for the orb entrance and the cursor follower.
//!
//! Hooke's law with linear damping, integrated with semi-implicit Euler in
//! fixed sub-steps so large frame deltas stay stable:
//!
//! ```text
//! a = (stiffness * (target - value) - damping * velocity) / mass
//! velocity += a * dt
//! value += velocity * dt
//! ```

use std::ops::{Add, Mul, Sub};

use glam::Vec2;

/// Largest integration step, in seconds.
const MAX_SUBSTEP: f32 = 1.0 / 240.0;

/// Below this distance and speed a spring counts as settled.
const REST_EPSILON: f32 = 0.01;

/// Spring constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    /// Pull towards the target.
    pub stiffness: f32,
    /// Resistance to velocity.
    pub damping: f32,
    /// Inertia. Must be positive.
    pub mass: f32,
}

impl SpringConfig {
    /// Orb entrance: slightly under-damped, settles in well under a second.
    pub const ORB_ENTRANCE: Self = Self {
        stiffness: 100.0,
        damping: 20.0,
        mass: 1.0,
    };

    /// Cursor follower: stiff and light so it trails the pointer closely.
    pub const CURSOR: Self = Self {
        stiffness: 500.0,
        damping: 28.0,
        mass: 0.5,
    };
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::ORB_ENTRANCE
    }
}

/// A value a spring can animate.
pub trait SpringValue: Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self> {
    /// Magnitude, used for the rest test.
    fn magnitude(self) -> f32;
}

impl SpringValue for f32 {
    fn magnitude(self) -> f32 {
        self.abs()
    }
}

impl SpringValue for Vec2 {
    fn magnitude(self) -> f32 {
        self.length()
    }
}

/// A damped spring pulling `value` towards `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring<T: SpringValue> {
    value: T,
    velocity: T,
    target: T,
    delay: f32,
    config: SpringConfig,
}

/// Spring over 2-D positions.
pub type Spring2 = Spring<Vec2>;

impl<T: SpringValue> Spring<T> {
    /// Spring at rest at `value`.
    pub fn new(value: T, config: SpringConfig) -> Self {
        Self {
            value,
            velocity: value * 0.0,
            target: value,
            delay: 0.0,
            config,
        }
    }

    /// Hold still for `seconds` before starting to move.
    pub fn with_delay(mut self, seconds: f32) -> Self {
        self.delay = seconds.max(0.0);
        self
    }

    /// Current value.
    pub fn value(&self) -> T {
        self.value
    }

    /// Current velocity.
    pub fn velocity(&self) -> T {
        self.velocity
    }

    /// Value the spring is pulling towards.
    pub fn target(&self) -> T {
        self.target
    }

    /// Retarget, keeping the current velocity.
    pub fn set_target(&mut self, target: T) {
        self.target = target;
    }

    /// Jump to `value` and stop.
    pub fn snap_to(&mut self, value: T) {
        self.value = value;
        self.target = value;
        self.velocity = value * 0.0;
        self.delay = 0.0;
    }

    /// Whether the spring is still waiting on its delay.
    pub fn is_delayed(&self) -> bool {
        self.delay > 0.0
    }

    /// Whether the spring has come to rest at its target.
    pub fn is_settled(&self) -> bool {
        !self.is_delayed()
            && (self.target - self.value).magnitude() < REST_EPSILON
            && self.velocity.magnitude() < REST_EPSILON
    }

    /// Advance by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        let mut remaining = dt;
        if self.delay > 0.0 {
            let waited = self.delay.min(remaining);
            self.delay -= waited;
            remaining -= waited;
        }

        let mass = self.config.mass.max(f32::EPSILON);
        while remaining > 0.0 {
            let h = remaining.min(MAX_SUBSTEP);
            let force = (self.target - self.value) * self.config.stiffness - self.velocity * self.config.damping;
            self.velocity = self.velocity + force * (h / mass);
            self.value = self.value + self.velocity * h;
            remaining -= h;
        }
    }
}
