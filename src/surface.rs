//! The abstract 2-D drawing surface the engine and orb field render to.
//!
//! Three primitives cover everything the backdrop draws: a full-surface wash,
//! soft-edged discs and gradient lines. [`DrawList`] records them in order so
//! a frame can be inspected, replayed onto another surface, or uploaded to the
//! GPU in one go.

use glam::{Vec2, Vec3};

use crate::visuals::GradientStop;

/// A 2-D drawing surface.
///
/// Coordinates are in surface units with the origin at the top-left corner
/// and y pointing down.
pub trait RenderSurface {
    /// Drawable size. A zero component means there is nothing to draw on.
    fn size(&self) -> Vec2;

    /// Lay `color` at `alpha` over the entire surface.
    fn fill_rect(&mut self, color: Vec3, alpha: f32);

    /// Filled disc. `blur` softens the edge over that many units on each side.
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Vec3, alpha: f32, blur: f32);

    /// Straight line whose color varies along its length per `stops`.
    fn draw_line(&mut self, from: Vec2, to: Vec2, stops: &[GradientStop], width: f32);

    /// True when the surface has no drawable area.
    fn is_degenerate(&self) -> bool {
        let size = self.size();
        !(size.x > 0.0 && size.y > 0.0)
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// [`RenderSurface::fill_rect`].
    FillRect {
        /// Wash color.
        color: Vec3,
        /// Wash opacity.
        alpha: f32,
    },
    /// [`RenderSurface::draw_circle`].
    Circle {
        /// Disc centre.
        center: Vec2,
        /// Disc radius.
        radius: f32,
        /// Fill color.
        color: Vec3,
        /// Fill opacity.
        alpha: f32,
        /// Edge softness.
        blur: f32,
    },
    /// [`RenderSurface::draw_line`].
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Gradient stops along the line.
        stops: Vec<GradientStop>,
        /// Stroke width.
        width: f32,
    },
}

/// A surface that records commands instead of drawing them.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Empty list for a surface of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            commands: Vec::new(),
        }
    }

    /// Change the reported size. Recorded commands are kept.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
    }

    /// Drop all recorded commands, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Recorded commands in draw order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Recorded circles only.
    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    /// Recorded lines only.
    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    /// Replay every recorded command onto another surface.
    pub fn replay(&self, target: &mut dyn RenderSurface) {
        for command in &self.commands {
            match command {
                DrawCommand::FillRect { color, alpha } => target.fill_rect(*color, *alpha),
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                    alpha,
                    blur,
                } => target.draw_circle(*center, *radius, *color, *alpha, *blur),
                DrawCommand::Line {
                    from,
                    to,
                    stops,
                    width,
                } => target.draw_line(*from, *to, stops, *width),
            }
        }
    }
}

impl RenderSurface for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn fill_rect(&mut self, color: Vec3, alpha: f32) {
        self.commands.push(DrawCommand::FillRect { color, alpha });
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Vec3, alpha: f32, blur: f32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            alpha,
            blur,
        });
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, stops: &[GradientStop], width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            stops: stops.to_vec(),
            width,
        });
    }
}
