//! Scatter layout for skill orbs.
//!
//! [`place`] drops each item at a random point of a padded rectangle, retrying
//! until it is at least `min_distance` from everything placed so far. Items
//! that run out of attempts keep their last candidate, so every item always
//! gets a position even when the rectangle is too crowded to honour the
//! spacing. Earlier items pick first and therefore place more reliably.
//!
//! [`OrbField`] wraps the solver with mount-once semantics, a spring entrance
//! from the container centre and a hover highlight.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::animation::{Spring, Spring2, SpringConfig};
use crate::surface::RenderSurface;
use crate::visuals::{hex_color, rgb8};

/// A labeled item to scatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// Display label.
    pub name: String,
    /// Proficiency, 0 to 100. Larger values draw larger orbs.
    pub level: u8,
    /// Free-form grouping label.
    #[serde(default)]
    pub category: String,
    /// Orb fill.
    #[serde(with = "hex_color")]
    pub color: Vec3,
}

impl Skill {
    /// Create a skill.
    pub fn new(name: impl Into<String>, level: u8, category: impl Into<String>, color: Vec3) -> Self {
        Self {
            name: name.into(),
            level,
            category: category.into(),
            color,
        }
    }

    fn level_fraction(&self) -> f32 {
        f32::from(self.level.min(100)) / 100.0
    }

    /// Orb diameter: `65 + 0.3 * level`.
    pub fn diameter(&self) -> f32 {
        65.0 + 30.0 * self.level_fraction()
    }

    /// Resting scale: `0.6 + 0.3 * level / 100`.
    pub fn scale(&self) -> f32 {
        0.6 + 0.3 * self.level_fraction()
    }
}

/// Solver parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Smallest distance between any two placed centres.
    pub min_distance: f32,
    /// Margin kept clear on every side of the rectangle.
    pub padding: f32,
    /// Candidates tried per item before settling for the last one.
    pub max_attempts: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            min_distance: 80.0,
            padding: 40.0,
            max_attempts: 100,
        }
    }
}

/// Place one point per item inside `width`×`height`, using the thread RNG.
///
/// Returns positions in input order, or nothing for a degenerate rectangle.
pub fn place<T>(
    items: &[T],
    width: f32,
    height: f32,
    min_distance: f32,
    padding: f32,
    max_attempts: u32,
) -> Vec<Vec2> {
    place_with_rng(
        &mut rand::thread_rng(),
        items.len(),
        width,
        height,
        min_distance,
        padding,
        max_attempts,
    )
}

/// [`place`] with a caller-supplied RNG and an item count.
///
/// `max_attempts` of zero still samples once.
pub fn place_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    width: f32,
    height: f32,
    min_distance: f32,
    padding: f32,
    max_attempts: u32,
) -> Vec<Vec2> {
    if !(width > 0.0 && height > 0.0) || count == 0 {
        return Vec::new();
    }

    let span = Vec2::new(width - 2.0 * padding, height - 2.0 * padding);
    let attempts = max_attempts.max(1);
    let mut placed: Vec<Vec2> = Vec::with_capacity(count);

    for _ in 0..count {
        let mut candidate = Vec2::ZERO;
        for _ in 0..attempts {
            candidate = Vec2::splat(padding) + Vec2::new(rng.gen::<f32>(), rng.gen::<f32>()) * span;
            if placed.iter().all(|p| p.distance(candidate) >= min_distance) {
                break;
            }
        }
        placed.push(candidate);
    }

    placed
}

/// Fraction of unique pairs in `points` at least `min_distance` apart.
///
/// 1.0 for fewer than two points.
pub fn spacing_ratio(points: &[Vec2], min_distance: f32) -> f32 {
    let mut total = 0usize;
    let mut ok = 0usize;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            total += 1;
            if a.distance(*b) >= min_distance {
                ok += 1;
            }
        }
    }
    if total == 0 {
        1.0
    } else {
        ok as f32 / total as f32
    }
}

/// Opacity of orbs that are not hovered.
pub const IDLE_OPACITY: f32 = 0.85;
/// Stagger between successive orb entrances, in seconds.
pub const ENTRANCE_STAGGER: f32 = 0.05;

/// Gray the hover gradient fades towards (`#d1d5db`).
const HOVER_TINT: Vec3 = Vec3::new(209.0 / 255.0, 213.0 / 255.0, 219.0 / 255.0);

/// One placed orb as it should be drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedOrb {
    /// Index into the skill list.
    pub index: usize,
    /// Resting centre.
    pub position: Vec2,
    /// Animated centre.
    pub center: Vec2,
    /// Unscaled diameter.
    pub diameter: f32,
    /// Resting scale.
    pub scale: f32,
    /// Animated scale.
    pub current_scale: f32,
    /// Animated opacity, before the hover rule.
    pub opacity: f32,
}

impl PlacedOrb {
    /// On-screen radius this frame.
    pub fn radius(&self) -> f32 {
        0.5 * self.diameter * self.current_scale
    }

    /// Whether `point` lies on the orb.
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance(point) <= self.radius()
    }
}

#[derive(Debug, Clone)]
struct OrbMotion {
    center: Spring2,
    scale: Spring<f32>,
    opacity: Spring<f32>,
}

/// Skill orbs scattered once over a container.
#[derive(Debug, Clone)]
pub struct OrbField {
    skills: Vec<Skill>,
    config: PlacementConfig,
    container: Vec2,
    orbs: Vec<PlacedOrb>,
    motion: Vec<OrbMotion>,
    hovered: Option<usize>,
    mounted: bool,
}

impl OrbField {
    /// Unmounted field over `skills`.
    pub fn new(skills: Vec<Skill>, config: PlacementConfig) -> Self {
        Self {
            skills,
            config,
            container: Vec2::ZERO,
            orbs: Vec::new(),
            motion: Vec::new(),
            hovered: None,
            mounted: false,
        }
    }

    /// Compute positions the first time the container has a non-zero size.
    ///
    /// Returns true when this call placed the orbs. Later calls, including
    /// after a resize, leave them where they are.
    pub fn mount(&mut self, width: f32, height: f32) -> bool {
        self.mount_with_rng(&mut rand::thread_rng(), width, height)
    }

    /// [`mount`](Self::mount) with a caller-supplied RNG.
    pub fn mount_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R, width: f32, height: f32) -> bool {
        if self.mounted || !(width > 0.0 && height > 0.0) {
            return false;
        }
        let PlacementConfig {
            min_distance,
            padding,
            max_attempts,
        } = self.config;
        let positions = place_with_rng(
            rng,
            self.skills.len(),
            width,
            height,
            min_distance,
            padding,
            max_attempts,
        );

        let origin = Vec2::new(width, height) * 0.5;
        self.container = Vec2::new(width, height);
        self.orbs.clear();
        self.motion.clear();
        for (index, (skill, position)) in self.skills.iter().zip(positions).enumerate() {
            let delay = index as f32 * ENTRANCE_STAGGER;
            let spring = SpringConfig::ORB_ENTRANCE;

            let mut center = Spring2::new(origin, spring).with_delay(delay);
            center.set_target(position);
            let mut scale = Spring::new(0.0, spring).with_delay(delay);
            scale.set_target(skill.scale());
            let mut opacity = Spring::new(0.0, spring).with_delay(delay);
            opacity.set_target(1.0);

            self.orbs.push(PlacedOrb {
                index,
                position,
                center: origin,
                diameter: skill.diameter(),
                scale: skill.scale(),
                current_scale: 0.0,
                opacity: 0.0,
            });
            self.motion.push(OrbMotion { center, scale, opacity });
        }
        self.mounted = true;

        log::debug!(
            "orb field mounted: {} orbs in {}x{}, {:.0}% of pairs spaced",
            self.orbs.len(),
            width,
            height,
            100.0 * spacing_ratio(&self.resting_positions(), min_distance)
        );
        true
    }

    /// Whether positions have been computed.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Size the field was mounted with.
    pub fn container(&self) -> Vec2 {
        self.container
    }

    /// The skills, in input order.
    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    /// Placed orbs, in input order. Empty until mounted.
    pub fn orbs(&self) -> &[PlacedOrb] {
        &self.orbs
    }

    /// Resting centres, in input order.
    pub fn resting_positions(&self) -> Vec<Vec2> {
        self.orbs.iter().map(|o| o.position).collect()
    }

    /// Skill under the pointer, if any.
    pub fn hovered(&self) -> Option<&Skill> {
        self.hovered.map(|i| &self.skills[i])
    }

    /// Update the hover from a pointer position; `None` clears it.
    ///
    /// The hovered orb keeps the highlight while the pointer stays on it,
    /// otherwise the topmost orb under the pointer wins.
    pub fn hover_at(&mut self, point: Option<Vec2>) -> Option<usize> {
        self.hovered = point.and_then(|p| {
            if let Some(i) = self.hovered.filter(|&i| self.orbs[i].contains(p)) {
                return Some(i);
            }
            self.orbs.iter().rev().find(|o| o.contains(p)).map(|o| o.index)
        });
        self.hovered
    }

    /// Whether every entrance animation has finished.
    pub fn is_settled(&self) -> bool {
        self.motion
            .iter()
            .all(|m| m.center.is_settled() && m.scale.is_settled() && m.opacity.is_settled())
    }

    /// Advance the entrance animations by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        for (orb, motion) in self.orbs.iter_mut().zip(&mut self.motion) {
            motion.center.update(dt);
            motion.scale.update(dt);
            motion.opacity.update(dt);
            orb.center = motion.center.value();
            orb.current_scale = motion.scale.value().max(0.0);
            orb.opacity = motion.opacity.value().clamp(0.0, 1.0);
        }
    }

    /// Jump every entrance to its end state.
    pub fn finish_entrance(&mut self) {
        for (orb, motion) in self.orbs.iter_mut().zip(&mut self.motion) {
            motion.center.snap_to(orb.position);
            motion.scale.snap_to(orb.scale);
            motion.opacity.snap_to(1.0);
            orb.center = orb.position;
            orb.current_scale = orb.scale;
            orb.opacity = 1.0;
        }
    }

    /// Draw the orbs, the hovered one last.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        if surface.is_degenerate() {
            return;
        }
        for orb in &self.orbs {
            if Some(orb.index) != self.hovered {
                self.draw_orb(orb, false, surface);
            }
        }
        if let Some(i) = self.hovered {
            self.draw_orb(&self.orbs[i], true, surface);
        }
    }

    fn draw_orb(&self, orb: &PlacedOrb, hovered: bool, surface: &mut dyn RenderSurface) {
        let radius = orb.radius();
        if radius <= 0.0 || orb.opacity <= 0.0 {
            return;
        }
        let color = self.skills[orb.index].color;

        if hovered {
            // Drop shadow, body, then the bottom-right sheen of the gradient.
            surface.draw_circle(orb.center + Vec2::new(0.0, 4.0), radius, rgb8(156, 163, 175), 0.2 * orb.opacity, 8.0);
            surface.draw_circle(orb.center, radius, color, orb.opacity, 0.5);
            surface.draw_circle(
                orb.center + Vec2::splat(radius * 0.25),
                radius * 0.75,
                HOVER_TINT,
                0.5 * orb.opacity,
                radius * 0.5,
            );
        } else {
            surface.draw_circle(orb.center, radius, color, IDLE_OPACITY * orb.opacity, 0.5);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, DrawList};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn skills(n: usize) -> Vec<Skill> {
        (0..n)
            .map(|i| Skill::new(format!("skill-{i}"), (i * 10 % 101) as u8, "test", Vec3::X))
            .collect()
    }

    #[test]
    fn test_place_degenerate_rectangle() {
        let items = skills(4);
        assert!(place(&items, 0.0, 500.0, 80.0, 40.0, 100).is_empty());
        assert!(place(&items, 500.0, -1.0, 80.0, 40.0, 100).is_empty());
        assert!(place::<Skill>(&[], 500.0, 500.0, 80.0, 40.0, 100).is_empty());
    }

    #[test]
    fn test_place_stays_in_padded_rect() {
        let mut rng = SmallRng::seed_from_u64(11);
        let points = place_with_rng(&mut rng, 20, 600.0, 400.0, 50.0, 40.0, 100);
        assert_eq!(points.len(), 20);
        for p in points {
            assert!(p.x >= 40.0 && p.x < 560.0);
            assert!(p.y >= 40.0 && p.y < 360.0);
        }
    }

    #[test]
    fn test_crowded_placement_still_places_everything() {
        let mut rng = SmallRng::seed_from_u64(5);
        let points = place_with_rng(&mut rng, 50, 200.0, 200.0, 150.0, 10.0, 10);
        assert_eq!(points.len(), 50);
        assert!(spacing_ratio(&points, 150.0) < 1.0);
    }

    #[test]
    fn test_zero_attempts_samples_once() {
        let mut rng = SmallRng::seed_from_u64(2);
        let points = place_with_rng(&mut rng, 3, 300.0, 300.0, 10.0, 0.0, 0);
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_first_pair_honours_spacing_when_possible() {
        let mut rng = SmallRng::seed_from_u64(8);
        for _ in 0..50 {
            let points = place_with_rng(&mut rng, 2, 600.0, 500.0, 90.0, 50.0, 100);
            assert!(points[0].distance(points[1]) >= 90.0);
        }
    }

    #[test]
    fn test_skill_geometry() {
        let s = Skill::new("Rust", 100, "lang", Vec3::ONE);
        assert!((s.diameter() - 95.0).abs() < 1e-5);
        assert!((s.scale() - 0.9).abs() < 1e-6);
        let s = Skill::new("New", 0, "lang", Vec3::ONE);
        assert_eq!(s.diameter(), 65.0);
        assert!((s.scale() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_mount_once() {
        let mut field = OrbField::new(skills(6), PlacementConfig::default());
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(!field.mount_with_rng(&mut rng, 0.0, 0.0));
        assert!(field.orbs().is_empty());

        assert!(field.mount_with_rng(&mut rng, 800.0, 600.0));
        let first = field.resting_positions();
        assert_eq!(first.len(), 6);

        assert!(!field.mount_with_rng(&mut rng, 1024.0, 768.0));
        assert_eq!(field.resting_positions(), first);
        assert_eq!(field.container(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_entrance_starts_at_centre_and_settles() {
        let mut field = OrbField::new(skills(3), PlacementConfig::default());
        field.mount_with_rng(&mut SmallRng::seed_from_u64(4), 600.0, 400.0);
        for orb in field.orbs() {
            assert_eq!(orb.center, Vec2::new(300.0, 200.0));
            assert_eq!(orb.current_scale, 0.0);
        }

        field.update(0.02);
        // Third orb is still waiting on its 0.1 s delay.
        assert_eq!(field.orbs()[2].center, Vec2::new(300.0, 200.0));

        for _ in 0..180 {
            field.update(1.0 / 60.0);
        }
        assert!(field.is_settled());
        for orb in field.orbs() {
            assert!(orb.center.distance(orb.position) < 0.05);
            assert!((orb.current_scale - orb.scale).abs() < 0.01);
        }
    }

    #[test]
    fn test_hover_and_render() {
        let mut field = OrbField::new(skills(4), PlacementConfig::default());
        field.mount_with_rng(&mut SmallRng::seed_from_u64(9), 800.0, 600.0);
        field.finish_entrance();

        let target = field.orbs()[1];
        assert_eq!(field.hover_at(Some(target.center)), Some(1));
        assert_eq!(field.hovered().map(|s| s.name.as_str()), Some("skill-1"));

        let mut list = DrawList::new(800.0, 600.0);
        field.render(&mut list);
        // Three idle discs, then shadow, body and sheen for the hovered one.
        assert_eq!(list.len(), 3 + 3);
        match &list.commands()[4] {
            DrawCommand::Circle { center, alpha, .. } => {
                assert_eq!(*center, target.center);
                assert_eq!(*alpha, 1.0);
            }
            other => panic!("expected hovered body, got {other:?}"),
        }
        match &list.commands()[0] {
            DrawCommand::Circle { alpha, .. } => assert!((alpha - IDLE_OPACITY).abs() < 1e-6),
            other => panic!("expected idle orb, got {other:?}"),
        }

        assert_eq!(field.hover_at(None), None);
    }
}
