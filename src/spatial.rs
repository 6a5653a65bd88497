//! Uniform-grid spatial binning for neighbour queries.
//!
//! Points are bucketed into square cells at least as large as the query
//! radius, so every neighbour of a point lies in its own cell or one of the
//! eight cells around it. Buckets are stored as a counting-sorted index list
//! (`cell_start`/`cell_end` into `sorted`), the CPU analogue of a sorted
//! spatial hash.

use glam::Vec2;

/// Upper bound on cells along either axis, whatever the requested cell size.
pub const MAX_CELLS_PER_AXIS: usize = 1024;

/// Configuration for the binning grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialConfig {
    /// Side length of each cell in surface units.
    pub cell_size: f32,
}

impl SpatialConfig {
    /// Grid whose cells are exactly `radius` wide.
    pub fn for_radius(radius: f32) -> Self {
        Self { cell_size: radius }
    }
}

/// Points bucketed by cell.
#[derive(Debug, Clone, Default)]
pub struct SpatialGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    origin: Vec2,
    cell_start: Vec<usize>,
    cell_end: Vec<usize>,
    sorted: Vec<usize>,
}

impl SpatialGrid {
    /// Bucket `points` into a grid covering their bounding box.
    ///
    /// A non-positive or non-finite cell size puts everything in one cell.
    /// Cells grow past the requested size when the grid would otherwise need
    /// more than about `2 * sqrt(len)` cells per axis (capped at
    /// [`MAX_CELLS_PER_AXIS`]); larger cells still hold every neighbour.
    pub fn build(points: &[Vec2], config: SpatialConfig) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let (min, max) = points.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        let extent = max - min;

        let span = extent.max_element();
        let axis_cap = ((points.len() as f32).sqrt() * 2.0).ceil() as usize;
        let axis_cap = axis_cap.clamp(1, MAX_CELLS_PER_AXIS);
        let cell_size = if config.cell_size.is_finite() && config.cell_size > 0.0 {
            config.cell_size.max(span / axis_cap as f32)
        } else {
            span + 1.0
        };
        let (cols, rows, cells) = Self::grid_shape(extent, cell_size).unwrap_or((1, 1, 1));
        let cell_size = if cells == 1 { cell_size.max(span + 1.0) } else { cell_size };

        let mut grid = Self {
            cell_size,
            cols,
            rows,
            origin: min,
            cell_start: vec![0; cells],
            cell_end: vec![0; cells],
            sorted: vec![0; points.len()],
        };

        // Counting sort by cell index.
        let cell_of: Vec<usize> = points.iter().map(|p| grid.cell_index(*p)).collect();
        let mut counts = vec![0usize; cells];
        for &c in &cell_of {
            counts[c] += 1;
        }
        let mut running = 0;
        for (c, count) in counts.iter().enumerate() {
            grid.cell_start[c] = running;
            running += count;
            grid.cell_end[c] = grid.cell_start[c];
        }
        for (i, &c) in cell_of.iter().enumerate() {
            grid.sorted[grid.cell_end[c]] = i;
            grid.cell_end[c] += 1;
        }

        grid
    }

    fn grid_shape(extent: Vec2, cell_size: f32) -> Option<(usize, usize, usize)> {
        let cols = (extent.x / cell_size).floor() as usize + 1;
        let rows = (extent.y / cell_size).floor() as usize + 1;
        if cols > MAX_CELLS_PER_AXIS + 1 || rows > MAX_CELLS_PER_AXIS + 1 {
            return None;
        }
        Some((cols, rows, cols.checked_mul(rows)?))
    }

    /// Number of cells along x and y.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Cell side length actually used.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn cell_coords(&self, p: Vec2) -> (usize, usize) {
        let rel = (p - self.origin) / self.cell_size;
        let cx = (rel.x.max(0.0) as usize).min(self.cols.saturating_sub(1));
        let cy = (rel.y.max(0.0) as usize).min(self.rows.saturating_sub(1));
        (cx, cy)
    }

    fn cell_index(&self, p: Vec2) -> usize {
        let (cx, cy) = self.cell_coords(p);
        cy * self.cols + cx
    }

    /// Indices of the points in cell `(cx, cy)`.
    pub fn cell(&self, cx: usize, cy: usize) -> &[usize] {
        if cx >= self.cols || cy >= self.rows {
            return &[];
        }
        let c = cy * self.cols + cx;
        &self.sorted[self.cell_start[c]..self.cell_end[c]]
    }

    /// Call `f` with every candidate neighbour index of `p`: all points in
    /// the 3×3 block of cells around the cell containing `p`.
    pub fn for_each_candidate(&self, p: Vec2, mut f: impl FnMut(usize)) {
        if self.sorted.is_empty() {
            return;
        }
        let (cx, cy) = self.cell_coords(p);
        for ny in cy.saturating_sub(1)..=(cy + 1).min(self.rows - 1) {
            for nx in cx.saturating_sub(1)..=(cx + 1).min(self.cols - 1) {
                for &i in self.cell(nx, ny) {
                    f(i);
                }
            }
        }
    }
}
