//! The particle engine: a fixed pool of pulsing dots that drift, wrap around
//! the viewport and are joined by fading lines when close.
//!
//! The engine is a fixed-step simulation. Every call to [`ParticleEngine::tick`]
//! advances exactly one frame regardless of wall-clock time, so it can be
//! driven at any refresh rate without diverging. A host calls
//! [`ParticleEngine::frame`] (tick + render) once per display refresh until it
//! unmounts the engine with [`ParticleEngine::teardown`].
//!
//! ```ignore
//! let mut engine = ParticleEngine::initialize(1280.0, 720.0, 120, Palette::default());
//! let mut list = DrawList::new(1280.0, 720.0);
//! engine.frame(&mut list);
//! ```

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::EngineConfig;
use crate::connections::{find_connections, Connection, ConnectionStrategy, PAIRWISE_CEILING};
use crate::particle::Particle;
use crate::spawn::SpawnContext;
use crate::surface::RenderSurface;
use crate::visuals::{connection_gradient, Palette, VisualConfig};

/// Whether the engine is still registered for frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Running,
    TornDown,
}

/// Clamp a viewport extent to a finite, non-negative value.
fn sanitize_extent(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// Owns the particle pool and advances it one frame at a time.
#[derive(Debug)]
pub struct ParticleEngine {
    particles: Vec<Particle>,
    bounds: Vec2,
    renderer: FrameRenderer,
    frame: u64,
    state: LoopState,
}

impl ParticleEngine {
    /// Mount an engine with `count` particles tinted from `palette`, using
    /// default values for everything else.
    pub fn initialize(width: f32, height: f32, count: usize, palette: Palette) -> Self {
        let config = EngineConfig {
            particle_count: count,
            palette,
            ..EngineConfig::default()
        };
        Self::with_config(width, height, &config)
    }

    /// Mount an engine from a full configuration.
    ///
    /// Never fails: non-finite or negative dimensions become zero, an empty
    /// palette falls back to the default one.
    pub fn with_config(width: f32, height: f32, config: &EngineConfig) -> Self {
        let bounds = Vec2::new(sanitize_extent(width), sanitize_extent(height));
        let count = config.particle_count;

        if count > PAIRWISE_CEILING && config.strategy == ConnectionStrategy::Pairwise {
            log::warn!(
                "{} particles with pairwise connections exceeds the O(n^2) ceiling of {}; \
                 use the binned strategy",
                count,
                PAIRWISE_CEILING
            );
        }

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let palette = Palette::new(config.palette.colors().to_vec());
        let ranges = config.spawn_ranges();

        let particles: Vec<Particle> = (0..count)
            .map(|i| SpawnContext::new(i, count, bounds, &mut rng).particle(&ranges, &palette))
            .collect();

        log::debug!(
            "particle engine mounted: {} particles in {}x{}, connection distance {}",
            particles.len(),
            bounds.x,
            bounds.y,
            config.connection_distance
        );

        Self {
            particles,
            bounds,
            renderer: FrameRenderer::new(
                config.connection_distance,
                config.strategy,
                config.visuals.clone(),
            ),
            frame: 0,
            state: LoopState::Running,
        }
    }

    /// Advance every particle by one fixed step.
    ///
    /// Positions integrate their constant velocity, phases advance by
    /// [`crate::particle::PHASE_STEP`], and anything that left the viewport
    /// re-enters at the opposite edge. No-op after teardown.
    pub fn tick(&mut self) {
        if self.state != LoopState::Running {
            return;
        }
        let bounds = self.bounds;
        for p in &mut self.particles {
            p.step(bounds);
        }
        self.frame += 1;
    }

    /// Draw the current pool: wash, glowing discs, then connection lines.
    ///
    /// No-op after teardown or on a surface with no drawable area.
    pub fn render(&mut self, surface: &mut dyn RenderSurface) {
        if self.state != LoopState::Running {
            return;
        }
        self.renderer.render(&self.particles, surface);
    }

    /// One display refresh worth of work: [`tick`](Self::tick) then
    /// [`render`](Self::render).
    pub fn frame(&mut self, surface: &mut dyn RenderSurface) {
        self.tick();
        self.render(surface);
    }

    /// Update the wrap bounds. Existing particles are not moved; any now
    /// outside wrap on their next tick.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.bounds = Vec2::new(sanitize_extent(width), sanitize_extent(height));
        log::debug!("particle engine resized to {}x{}", self.bounds.x, self.bounds.y);
    }

    /// Stop the loop and release the pool. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.state == LoopState::TornDown {
            return;
        }
        self.state = LoopState::TornDown;
        self.particles = Vec::new();
        log::debug!("particle engine torn down after {} frames", self.frame);
    }

    /// Whether the host should keep scheduling frames.
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Current particle pool.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Current wrap bounds.
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Ticks performed since mount.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Renderer settings and scratch buffers.
    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    /// Owned copy of the pool for rendering off the simulation thread.
    pub fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            particles: self.particles.clone(),
            bounds: self.bounds,
            frame: self.frame,
        }
    }
}

/// Immutable copy of a particle pool at one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSnapshot {
    particles: Vec<Particle>,
    bounds: Vec2,
    frame: u64,
}

impl ParticleSnapshot {
    /// Particles as of the snapshot.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Wrap bounds as of the snapshot.
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Frame number the snapshot was taken at.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Raw bytes of the pool, laid out as `[Particle]`.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }

    /// Draw the snapshot with `renderer`.
    pub fn render(&self, renderer: &mut FrameRenderer, surface: &mut dyn RenderSurface) {
        renderer.render(&self.particles, surface);
    }
}

/// Turns a particle pool into draw calls.
///
/// Holds the connection settings and reuses its scratch buffers between
/// frames, so steady-state rendering does not allocate.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    connection_distance: f32,
    strategy: ConnectionStrategy,
    visuals: VisualConfig,
    positions: Vec<Vec2>,
    connections: Vec<Connection>,
}

impl FrameRenderer {
    /// Renderer joining particles closer than `connection_distance`.
    pub fn new(connection_distance: f32, strategy: ConnectionStrategy, visuals: VisualConfig) -> Self {
        Self {
            connection_distance,
            strategy,
            visuals,
            positions: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Distance below which particles are joined.
    pub fn connection_distance(&self) -> f32 {
        self.connection_distance
    }

    /// Pair-finding strategy.
    pub fn strategy(&self) -> ConnectionStrategy {
        self.strategy
    }

    /// Visual settings.
    pub fn visuals(&self) -> &VisualConfig {
        &self.visuals
    }

    /// Connections found by the most recent render.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Draw `particles` onto `surface`.
    pub fn render(&mut self, particles: &[Particle], surface: &mut dyn RenderSurface) {
        if surface.is_degenerate() {
            return;
        }
        let visuals = &self.visuals;

        surface.fill_rect(visuals.wash_color, visuals.wash_alpha);

        for p in particles {
            let alpha = p.draw_alpha();
            if alpha <= 0.0 {
                continue;
            }
            // Outer glow, then the sharp core.
            surface.draw_circle(
                p.position,
                p.size * visuals.glow_scale,
                p.color,
                alpha,
                visuals.glow_blur,
            );
            surface.draw_circle(p.position, p.size, p.color, alpha, 0.0);
        }

        self.positions.clear();
        self.positions.extend(particles.iter().map(|p| p.position));
        find_connections(
            &self.positions,
            self.connection_distance,
            self.strategy,
            &mut self.connections,
        );

        let scale = visuals.line_max_alpha / crate::connections::MAX_CONNECTION_OPACITY;
        for c in &self.connections {
            let stops = connection_gradient(c.opacity * scale);
            surface.draw_line(self.positions[c.a], self.positions[c.b], &stops, visuals.line_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, DrawList};
    use glam::Vec3;

    fn seeded(count: usize, width: f32, height: f32) -> ParticleEngine {
        let config = EngineConfig {
            particle_count: count,
            seed: Some(42),
            ..EngineConfig::default()
        };
        ParticleEngine::with_config(width, height, &config)
    }

    #[test]
    fn test_initialize_allocates_count() {
        for count in [0, 1, 120, 500] {
            let engine = seeded(count, 800.0, 600.0);
            assert_eq!(engine.len(), count);
            assert!(engine.is_running());
        }
    }

    #[test]
    fn test_pairwise_past_ceiling_still_allocates() {
        let count = PAIRWISE_CEILING + 1;
        let mut engine = seeded(count, 1280.0, 720.0);
        assert_eq!(engine.len(), count);
        let mut list = DrawList::new(1280.0, 720.0);
        engine.frame(&mut list);
        assert_eq!(engine.len(), count);
        assert_eq!(list.circles().count(), count * 2);
    }

    #[test]
    fn test_binned_tiny_distance_renders_frame() {
        let config = EngineConfig {
            particle_count: 120,
            seed: Some(3),
            connection_distance: 0.01,
            strategy: ConnectionStrategy::Binned,
            ..EngineConfig::default()
        };
        let mut engine = ParticleEngine::with_config(1280.0, 720.0, &config);
        let mut list = DrawList::new(1280.0, 720.0);
        engine.frame(&mut list);
        assert_eq!(engine.len(), 120);
    }

    #[test]
    fn test_degenerate_dimensions_clamp_to_zero() {
        let engine = seeded(10, -5.0, f32::NAN);
        assert_eq!(engine.bounds(), Vec2::ZERO);
        assert_eq!(engine.len(), 10);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = seeded(50, 640.0, 480.0);
        let b = seeded(50, 640.0, 480.0);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_tick_counts_frames() {
        let mut engine = seeded(5, 100.0, 100.0);
        engine.tick();
        engine.tick();
        assert_eq!(engine.frame_count(), 2);
    }

    #[test]
    fn test_render_order_wash_discs_lines() {
        let mut engine = seeded(0, 400.0, 400.0);
        engine.particles = vec![
            Particle::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 2.0, Vec3::X, 0.0),
            Particle::new(Vec2::new(160.0, 100.0), Vec2::ZERO, 3.0, Vec3::Y, 0.0),
        ];
        let mut list = DrawList::new(400.0, 400.0);
        engine.render(&mut list);

        let commands = list.commands();
        assert_eq!(commands.len(), 1 + 4 + 1);
        assert!(matches!(commands[0], DrawCommand::FillRect { .. }));
        match &commands[1] {
            DrawCommand::Circle { radius, blur, alpha, .. } => {
                assert_eq!(*radius, 4.0);
                assert_eq!(*blur, 2.0);
                assert!((alpha - 0.2).abs() < 1e-6);
            }
            other => panic!("expected glow circle, got {other:?}"),
        }
        match &commands[2] {
            DrawCommand::Circle { radius, blur, .. } => {
                assert_eq!(*radius, 2.0);
                assert_eq!(*blur, 0.0);
            }
            other => panic!("expected core circle, got {other:?}"),
        }
        match &commands[5] {
            DrawCommand::Line { stops, width, .. } => {
                assert_eq!(stops.len(), 3);
                assert_eq!(*width, 1.0);
                let expected = (1.0 - 60.0 / 150.0) * 0.15;
                assert!((stops[0].alpha - expected).abs() < 1e-6);
            }
            other => panic!("expected line, got {other:?}"),
        }
    }

    #[test]
    fn test_invisible_particles_are_skipped() {
        let mut engine = seeded(0, 400.0, 400.0);
        engine.particles = vec![Particle::new(
            Vec2::new(10.0, 10.0),
            Vec2::ZERO,
            2.0,
            Vec3::ONE,
            1.5 * std::f32::consts::PI,
        )];
        let mut list = DrawList::new(400.0, 400.0);
        engine.render(&mut list);
        assert_eq!(list.circles().count(), 0);
    }

    #[test]
    fn test_render_on_zero_surface_is_noop() {
        let mut engine = seeded(20, 400.0, 400.0);
        let mut list = DrawList::new(0.0, 0.0);
        engine.render(&mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn test_resize_keeps_positions() {
        let mut engine = seeded(30, 800.0, 600.0);
        let before: Vec<Vec2> = engine.particles().iter().map(|p| p.position).collect();
        engine.resize(100.0, 100.0);
        let after: Vec<Vec2> = engine.particles().iter().map(|p| p.position).collect();
        assert_eq!(before, after);
        assert_eq!(engine.bounds(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut engine = seeded(30, 800.0, 600.0);
        engine.teardown();
        engine.teardown();
        assert!(!engine.is_running());
        assert!(engine.is_empty());

        let frames = engine.frame_count();
        let mut list = DrawList::new(800.0, 600.0);
        engine.frame(&mut list);
        assert_eq!(engine.frame_count(), frames);
        assert!(list.is_empty());
    }

    #[test]
    fn test_snapshot_renders_like_engine() {
        let mut engine = seeded(40, 500.0, 500.0);
        engine.tick();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.frame(), 1);
        assert_eq!(snapshot.as_bytes().len(), 40 * std::mem::size_of::<Particle>());

        let mut from_engine = DrawList::new(500.0, 500.0);
        engine.render(&mut from_engine);

        let mut renderer = engine.renderer().clone();
        let mut from_snapshot = DrawList::new(500.0, 500.0);
        let handle = std::thread::spawn(move || {
            snapshot.render(&mut renderer, &mut from_snapshot);
            from_snapshot
        });
        let from_snapshot = handle.join().unwrap();
        assert_eq!(from_engine.commands(), from_snapshot.commands());
    }
}
