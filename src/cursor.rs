//! Soft disc that trails the pointer.

use glam::{Vec2, Vec3};

use crate::animation::{Spring, Spring2, SpringConfig};
use crate::surface::RenderSurface;
use crate::visuals::rgb8;

/// Cursor look, chosen by what the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorVariant {
    /// Plain page.
    #[default]
    Default,
    /// Over something clickable, such as an orb.
    Button,
    /// Over text.
    Text,
}

impl CursorVariant {
    /// Disc diameter.
    pub fn diameter(self) -> f32 {
        match self {
            Self::Default => 32.0,
            Self::Button => 48.0,
            Self::Text => 128.0,
        }
    }

    /// Fill opacity.
    pub fn alpha(self) -> f32 {
        match self {
            Self::Default => 0.2,
            Self::Button => 0.3,
            Self::Text => 0.1,
        }
    }
}

/// Fill color of the cursor disc, `rgb(0,122,255)`.
pub fn cursor_color() -> Vec3 {
    rgb8(0, 122, 255)
}

/// Spring-driven pointer follower.
#[derive(Debug, Clone)]
pub struct Cursor {
    center: Spring2,
    diameter: Spring<f32>,
    alpha: Spring<f32>,
    variant: CursorVariant,
    visible: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Cursor {
    /// Hidden cursor at the origin.
    pub fn new() -> Self {
        let variant = CursorVariant::Default;
        Self {
            center: Spring2::new(Vec2::ZERO, SpringConfig::CURSOR),
            diameter: Spring::new(variant.diameter(), SpringConfig::CURSOR),
            alpha: Spring::new(variant.alpha(), SpringConfig::CURSOR),
            variant,
            visible: false,
        }
    }

    /// Follow the pointer to `position`. The first call jumps there.
    pub fn move_to(&mut self, position: Vec2) {
        if self.visible {
            self.center.set_target(position);
        } else {
            self.center.snap_to(position);
            self.visible = true;
        }
    }

    /// Pointer left the window.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Whether the cursor is drawn.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Switch look; size and opacity spring to the new values.
    pub fn set_variant(&mut self, variant: CursorVariant) {
        self.variant = variant;
        self.diameter.set_target(variant.diameter());
        self.alpha.set_target(variant.alpha());
    }

    /// Current look.
    pub fn variant(&self) -> CursorVariant {
        self.variant
    }

    /// Animated centre.
    pub fn position(&self) -> Vec2 {
        self.center.value()
    }

    /// Animated diameter.
    pub fn diameter(&self) -> f32 {
        self.diameter.value()
    }

    /// Advance the springs by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.center.update(dt);
        self.diameter.update(dt);
        self.alpha.update(dt);
    }

    /// Draw the disc if visible.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        if !self.visible || surface.is_degenerate() {
            return;
        }
        let radius = 0.5 * self.diameter.value().max(0.0);
        let alpha = self.alpha.value().clamp(0.0, 1.0);
        surface.draw_circle(self.center.value(), radius, cursor_color(), alpha, 0.5);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, DrawList};

    #[test]
    fn test_variant_sizes() {
        assert_eq!(CursorVariant::Default.diameter(), 32.0);
        assert_eq!(CursorVariant::Button.diameter(), 48.0);
        assert_eq!(CursorVariant::Text.diameter(), 128.0);
        assert_eq!(CursorVariant::Text.alpha(), 0.1);
    }

    #[test]
    fn test_hidden_until_moved() {
        let mut cursor = Cursor::new();
        let mut list = DrawList::new(100.0, 100.0);
        cursor.render(&mut list);
        assert!(list.is_empty());

        cursor.move_to(Vec2::new(40.0, 60.0));
        assert_eq!(cursor.position(), Vec2::new(40.0, 60.0));
        cursor.render(&mut list);
        match &list.commands()[0] {
            DrawCommand::Circle { center, radius, alpha, .. } => {
                assert_eq!(*center, Vec2::new(40.0, 60.0));
                assert_eq!(*radius, 16.0);
                assert!((alpha - 0.2).abs() < 1e-6);
            }
            other => panic!("expected cursor disc, got {other:?}"),
        }
    }

    #[test]
    fn test_follows_and_grows() {
        let mut cursor = Cursor::new();
        cursor.move_to(Vec2::ZERO);
        cursor.move_to(Vec2::new(100.0, 0.0));
        cursor.set_variant(CursorVariant::Button);
        for _ in 0..60 {
            cursor.update(1.0 / 60.0);
        }
        assert!(cursor.position().distance(Vec2::new(100.0, 0.0)) < 0.5);
        assert!((cursor.diameter() - 48.0).abs() < 0.1);
    }
}
