//! Backdrop builder and runners.

use std::path::Path;

use winit::event_loop::{ControlFlow, EventLoop};

use crate::canvas::Canvas;
use crate::config::BackdropConfig;
use crate::connections::ConnectionStrategy;
use crate::engine::ParticleEngine;
use crate::error::{ConfigError, RunError};
use crate::layout::{OrbField, PlacementConfig, Skill};
use crate::visuals::Palette;
use crate::window::App;

/// A particle backdrop with an optional orb field on top.
///
/// Use method chaining to configure, then call [`run`](Self::run) to open a
/// window or [`render_frames`](Self::render_frames) to render off-screen.
///
/// ```ignore
/// Backdrop::new()
///     .with_particle_count(200)
///     .with_connection_distance(120.0)
///     .run()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Backdrop {
    config: BackdropConfig,
}

impl Backdrop {
    /// Backdrop with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Backdrop from a full configuration.
    pub fn from_config(config: BackdropConfig) -> Self {
        Self { config }
    }

    /// Backdrop from a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        BackdropConfig::load(path).map(Self::from_config)
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.config.engine.particle_count = count;
        self
    }

    /// Set the particle palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.config.engine.palette = palette;
        self
    }

    /// Set the distance below which particles are joined.
    pub fn with_connection_distance(mut self, distance: f32) -> Self {
        self.config.engine.connection_distance = distance;
        self
    }

    /// Choose how connection pairs are found.
    pub fn with_strategy(mut self, strategy: ConnectionStrategy) -> Self {
        self.config.engine.strategy = strategy;
        self
    }

    /// Seed the particle RNG for reproducible output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.engine.seed = Some(seed);
        self
    }

    /// Scatter these skills as orbs over the backdrop.
    pub fn with_skills(mut self, skills: Vec<Skill>) -> Self {
        self.config.skills = skills;
        self
    }

    /// Set orb placement parameters.
    pub fn with_placement(mut self, placement: PlacementConfig) -> Self {
        self.config.placement = placement;
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.window.width = width;
        self.config.window.height = height;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    /// Open a window and animate until it is closed.
    pub fn run(self) -> Result<(), RunError> {
        log::info!(
            "starting backdrop: {} particles, {} orbs",
            self.config.engine.particle_count,
            self.config.skills.len()
        );

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.config);
        event_loop.run_app(&mut app)?;

        match app.take_error() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Render `frames` frames onto a `width`×`height` canvas without a window.
    ///
    /// The canvas keeps its contents between frames, so trails accumulate as
    /// they do on screen. Orbs are drawn at their resting state.
    pub fn render_frames(&self, frames: u32, width: u32, height: u32) -> Canvas {
        let engine_config = &self.config.engine;
        let mut canvas = Canvas::new(width, height, engine_config.visuals.background);
        let mut engine = ParticleEngine::with_config(width as f32, height as f32, engine_config);

        for _ in 0..frames {
            engine.frame(&mut canvas);
        }

        let mut orbs = OrbField::new(self.config.skills.clone(), self.config.placement);
        if orbs.mount(width as f32, height as f32) {
            orbs.finish_entrance();
            orbs.render(&mut canvas);
        }

        log::debug!("rendered {} frames headless", engine.frame_count());
        engine.teardown();
        canvas
    }

    /// [`render_frames`](Self::render_frames) and write the result as PNG.
    pub fn export_png(&self, frames: u32, width: u32, height: u32, path: impl AsRef<Path>) -> Result<(), RunError> {
        self.render_frames(frames, width, height).save_png(path)?;
        Ok(())
    }
}
