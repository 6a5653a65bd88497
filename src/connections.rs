//! Proximity connections between nearby particles.
//!
//! Every unique pair closer than the threshold is joined by a line whose
//! opacity falls off linearly with distance, reaching zero at the threshold.
//!
//! The default [`ConnectionStrategy::Pairwise`] pass is O(n²). That is fine at
//! backdrop densities (around a hundred particles) but it is the scalability
//! ceiling of the engine: past [`PAIRWISE_CEILING`] particles use
//! [`ConnectionStrategy::Binned`], which buckets particles into a grid with
//! cells the size of the threshold and only compares neighbouring cells.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::spatial::{SpatialConfig, SpatialGrid};

/// Default distance below which two particles are connected.
pub const DEFAULT_CONNECTION_DISTANCE: f32 = 150.0;

/// Peak line opacity, reached by two coincident particles.
pub const MAX_CONNECTION_OPACITY: f32 = 0.15;

/// Particle count above which the pairwise pass should not be used.
pub const PAIRWISE_CEILING: usize = 1000;

/// Opacity of a connection between two particles `distance` apart.
///
/// `MAX_CONNECTION_OPACITY` at distance 0, falling linearly to 0 at
/// `threshold`; 0 at or beyond it, and for a non-positive threshold.
#[inline]
pub fn connection_opacity(distance: f32, threshold: f32) -> f32 {
    if threshold <= 0.0 || distance.is_nan() || distance >= threshold {
        return 0.0;
    }
    (1.0 - distance.max(0.0) / threshold) * MAX_CONNECTION_OPACITY
}

/// How the connection pass finds candidate pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStrategy {
    /// Compare every unique pair. O(n²).
    #[default]
    Pairwise,
    /// Bucket into a uniform grid and compare neighbouring cells only.
    Binned,
}

/// A line to draw between particles `a < b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Lower particle index.
    pub a: usize,
    /// Higher particle index.
    pub b: usize,
    /// Distance between the two particles.
    pub distance: f32,
    /// Line opacity from [`connection_opacity`].
    pub opacity: f32,
}

/// Find all connections among `positions`, appending them to `out`.
///
/// `out` is cleared first so a single buffer can be reused every frame.
/// Pairwise output is ordered by `(a, b)`; binned output covers the same
/// pairs in grid order.
pub fn find_connections(
    positions: &[Vec2],
    threshold: f32,
    strategy: ConnectionStrategy,
    out: &mut Vec<Connection>,
) {
    out.clear();
    if threshold <= 0.0 || positions.len() < 2 {
        return;
    }
    match strategy {
        ConnectionStrategy::Pairwise => pairwise(positions, threshold, out),
        ConnectionStrategy::Binned => binned(positions, threshold, out),
    }
}

#[inline]
fn consider(positions: &[Vec2], a: usize, b: usize, threshold: f32, out: &mut Vec<Connection>) {
    let distance = positions[a].distance(positions[b]);
    if distance < threshold {
        out.push(Connection {
            a,
            b,
            distance,
            opacity: connection_opacity(distance, threshold),
        });
    }
}

fn pairwise(positions: &[Vec2], threshold: f32, out: &mut Vec<Connection>) {
    for a in 0..positions.len() {
        for b in (a + 1)..positions.len() {
            consider(positions, a, b, threshold, out);
        }
    }
}

fn binned(positions: &[Vec2], threshold: f32, out: &mut Vec<Connection>) {
    let grid = SpatialGrid::build(positions, SpatialConfig::for_radius(threshold));
    for (a, p) in positions.iter().enumerate() {
        grid.for_each_candidate(*p, |b| {
            if b > a {
                consider(positions, a, b, threshold, out);
            }
        });
    }
}
