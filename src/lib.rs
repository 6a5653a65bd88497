//! # driftfield
//!
//! Animated particle backdrops and scatter layouts for portfolio pages.
//!
//! Two independent pieces sit behind a page as passive visual layers:
//!
//! - a **particle engine** that drifts a fixed pool of pulsing dots across the
//!   viewport, wrapping at the edges and joining close neighbours with faint
//!   gradient lines, and
//! - a **layout solver** that scatters labeled skill orbs over a container so
//!   they keep a minimum distance from one another.
//!
//! Both draw through the [`RenderSurface`] trait, which is implemented by a
//! recording [`DrawList`], a CPU [`Canvas`] that can write PNG frames, and (via
//! the draw list) a wgpu renderer behind a winit window.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! fn main() -> Result<(), RunError> {
//!     Backdrop::new()
//!         .with_particle_count(150)
//!         .with_connection_distance(150.0)
//!         .with_skills(vec![
//!             Skill::new("Rust", 90, "language", Vec3::new(0.87, 0.65, 0.52)),
//!             Skill::new("WGSL", 60, "language", Vec3::new(0.3, 0.5, 0.9)),
//!         ])
//!         .run()
//! }
//! ```
//!
//! ## Driving the engine yourself
//!
//! The engine advances one fixed step per [`ParticleEngine::tick`], so a host
//! only has to call [`ParticleEngine::frame`] once per display refresh:
//!
//! ```ignore
//! let mut engine = ParticleEngine::initialize(800.0, 600.0, 120, Palette::default());
//! let mut canvas = Canvas::new(800, 600, VisualConfig::default().background);
//! for _ in 0..60 {
//!     engine.frame(&mut canvas);
//! }
//! canvas.save_png("frame.png")?;
//! engine.teardown();
//! ```
//!
//! ## Scaling
//!
//! Connections are found with an O(n²) pass over unique pairs, which is what a
//! backdrop of a hundred or so particles needs. Past
//! [`connections::PAIRWISE_CEILING`] particles switch to
//! [`ConnectionStrategy::Binned`]; the engine logs a warning when the ceiling
//! is crossed with the pairwise pass.

pub mod animation;
pub mod canvas;
pub mod config;
pub mod connections;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod layout;
pub mod particle;
mod simulation;
pub mod spatial;
pub mod spawn;
pub mod surface;
pub mod time;
pub mod visuals;
mod window;

pub use bytemuck;
pub use canvas::Canvas;
pub use config::{BackdropConfig, EngineConfig, WindowConfig};
pub use connections::{connection_opacity, ConnectionStrategy};
pub use engine::{FrameRenderer, ParticleEngine, ParticleSnapshot};
pub use error::{ConfigError, GpuError, RunError};
pub use glam::{Vec2, Vec3, Vec4};
pub use layout::{place, place_with_rng, OrbField, PlacedOrb, PlacementConfig, Skill};
pub use particle::Particle;
pub use simulation::Backdrop;
pub use surface::{DrawCommand, DrawList, RenderSurface};
pub use visuals::{GradientStop, Palette, VisualConfig};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use driftfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animation::{Spring, Spring2, SpringConfig};
    pub use crate::canvas::Canvas;
    pub use crate::config::{BackdropConfig, EngineConfig};
    pub use crate::connections::ConnectionStrategy;
    pub use crate::cursor::{Cursor, CursorVariant};
    pub use crate::engine::ParticleEngine;
    pub use crate::error::RunError;
    pub use crate::layout::{OrbField, PlacementConfig, Skill};
    pub use crate::simulation::Backdrop;
    pub use crate::surface::{DrawList, RenderSurface};
    pub use crate::time::FrameClock;
    pub use crate::visuals::{Palette, VisualConfig};
    pub use crate::{Vec2, Vec3, Vec4};
}
