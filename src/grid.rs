//! Grid partitioning and the randomized reveal order.

use rand::Rng;
use serde::Deserialize;

/// Upper bound on cells in any grid. Keeps the reveal order and the cell
/// mask to a few megabytes and every index inside `u32`.
pub const MAX_CELLS: u32 = 1 << 20;

/// Smallest accepted cell edge in CSS pixels.
pub const MIN_CELL_PX: f64 = 1.0;

/// How a surface is split into cells.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GridSpec {
    /// Square cells of this many CSS pixels; the cell count follows the surface size.
    CellSize(f64),
    /// A fixed `cols × rows` partition regardless of surface size.
    Fixed { cols: u32, rows: u32 },
}

impl GridSpec {
    /// Resolve against a surface of `width × height` CSS pixels.
    pub fn resolve(&self, width: f64, height: f64) -> Grid {
        if !(width > 0.0 && height > 0.0) {
            return Grid::EMPTY;
        }
        match *self {
            GridSpec::CellSize(cell) => Grid::compute(width, height, cell),
            GridSpec::Fixed { cols, rows } => Grid::new(cols, rows),
        }
    }
}

/// A `cols × rows` partition. Either both dimensions are at least one or the
/// grid is empty. Never more than [`MAX_CELLS`] cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Grid {
    cols: u32,
    rows: u32,
}

impl Grid {
    pub const EMPTY: Grid = Grid { cols: 0, rows: 0 };

    /// A grid of `cols × rows`, coarsened proportionally if it would exceed
    /// [`MAX_CELLS`].
    pub fn new(cols: u32, rows: u32) -> Self {
        if cols == 0 || rows == 0 {
            return Self::EMPTY;
        }
        Self::bounded(cols as f64, rows as f64)
    }

    fn bounded(cols: f64, rows: f64) -> Self {
        let max = MAX_CELLS as f64;
        let (mut cols, mut rows) = (cols.max(1.0), rows.max(1.0));
        if cols * rows > max {
            let shrink = (cols * rows / max).sqrt();
            cols = (cols / shrink).floor().max(1.0);
            rows = (rows / shrink).floor().max(1.0);
        }
        cols = cols.min(max);
        rows = rows.min((max / cols).floor()).max(1.0);
        Self {
            cols: cols as u32,
            rows: rows as u32,
        }
    }

    /// Grid covering `width × height` pixels with cells of roughly `cell_px`.
    ///
    /// Partial trailing cells are rounded up so the whole surface is covered.
    /// A zero-area surface (or a degenerate cell size) yields [`Grid::EMPTY`].
    /// Surfaces too large for [`MAX_CELLS`] get proportionally larger cells.
    pub fn compute(width: f64, height: f64, cell_px: f64) -> Self {
        let finite = width.is_finite() && height.is_finite() && cell_px.is_finite();
        if !(finite && width > 0.0 && height > 0.0 && cell_px > 0.0) {
            return Self::EMPTY;
        }
        Self::bounded((width / cell_px).ceil(), (height / cell_px).ceil())
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn total_cells(&self) -> usize {
        (self.cols as usize)
            .checked_mul(self.rows as usize)
            .unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.total_cells() == 0
    }

    /// `(col, row)` of a cell index in row-major order.
    pub fn position(&self, index: usize) -> (u32, u32) {
        let cols = self.cols.max(1) as usize;
        ((index % cols) as u32, (index / cols) as u32)
    }
}

/// Uniformly random permutation of `0..total` (Fisher–Yates).
///
/// `None` when `total` does not fit the `u32` index space.
pub fn shuffled_indices<R: Rng + ?Sized>(total: usize, rng: &mut R) -> Option<Vec<u32>> {
    let end = u32::try_from(total).ok()?;
    let mut order: Vec<u32> = (0..end).collect();
    for i in (1..order.len()).rev() {
        let j = rng.random_range(0..=i);
        order.swap(i, j);
    }
    Some(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_rounds_partial_cells_up() {
        let grid = Grid::compute(100.0, 45.0, 20.0);
        assert_eq!((grid.cols(), grid.rows()), (5, 3));
        assert_eq!(grid.total_cells(), 15);
    }

    #[test]
    fn zero_area_is_empty() {
        assert!(Grid::compute(0.0, 300.0, 10.0).is_empty());
        assert!(GridSpec::Fixed { cols: 8, rows: 8 }.resolve(120.0, 0.0).is_empty());
        assert!(Grid::new(0, 4).is_empty());
    }

    #[test]
    fn oversized_grids_are_coarsened() {
        let huge = Grid::new(70_000, 70_000);
        assert!(huge.total_cells() <= MAX_CELLS as usize);
        assert_eq!(huge.cols(), huge.rows());

        let strip = Grid::new(u32::MAX, 3);
        assert!(strip.total_cells() <= MAX_CELLS as usize);
        assert!(strip.rows() >= 1);

        let dense = Grid::compute(100_000.0, 100_000.0, 0.01);
        assert!(dense.total_cells() <= MAX_CELLS as usize);
        assert!(!dense.is_empty());
        assert!(Grid::compute(f64::INFINITY, 10.0, 1.0).is_empty());
    }

    #[test]
    fn position_is_row_major() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.position(0), (0, 0));
        assert_eq!(grid.position(5), (1, 1));
        assert_eq!(grid.position(11), (3, 2));
    }
}
