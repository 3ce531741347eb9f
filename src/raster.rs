//! Cell visibility and drawing onto a DPR-scaled surface.

use crate::grid::Grid;

/// CSS-pixel size of a drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_zero_area(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Backing-buffer dimensions and the context scale that keeps drawing
/// coordinates in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Backing {
    pub width: u32,
    pub height: u32,
    pub scale: f64,
}

impl Backing {
    /// Size the backing buffer for `extent` at `dpr`, capped at `max_dpr`.
    pub fn compute(extent: Extent, dpr: f64, max_dpr: f64) -> Self {
        let cap = if max_dpr >= 1.0 { max_dpr } else { 1.0 };
        let scale = if dpr.is_finite() && dpr > 0.0 {
            dpr.min(cap)
        } else {
            1.0
        };
        let px = |css: f64| {
            if css > 0.0 {
                (css * scale).round() as u32
            } else {
                0
            }
        };
        Self {
            width: px(extent.width),
            height: px(extent.height),
            scale,
        }
    }
}

/// A cell rectangle in CSS pixels. Edges may be fractional.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Anything the rasterizer can paint cells onto.
pub trait Surface {
    /// Current CSS size of the surface.
    fn extent(&self) -> Extent;
    /// Resize the backing buffer and pre-scale the context.
    fn apply_backing(&mut self, backing: &Backing);
    fn clear(&mut self, extent: Extent);
    fn set_fill(&mut self, color: &str);
    fn fill_rect(&mut self, rect: CellRect);
}

/// One byte per cell; fixed length for the lifetime of a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellMask {
    cells: Box<[u8]>,
    count: usize,
}

impl CellMask {
    pub fn new(len: usize, filled: bool) -> Self {
        Self {
            cells: vec![filled as u8; len].into_boxed_slice(),
            count: if filled { len } else { 0 },
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of set cells.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn get(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(|&c| c != 0)
    }

    pub fn set(&mut self, index: usize, on: bool) {
        let Some(cell) = self.cells.get_mut(index) else {
            return;
        };
        let was = *cell != 0;
        if was != on {
            *cell = on as u8;
            if on {
                self.count += 1;
            } else {
                self.count -= 1;
            }
        }
    }

    pub fn fill(&mut self, on: bool) {
        self.cells.fill(on as u8);
        self.count = if on { self.cells.len() } else { 0 };
    }

    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c != 0)
            .map(|(i, _)| i)
    }
}

/// Paints the set cells of a [`CellMask`] in a single colour.
#[derive(Clone, Debug)]
pub struct Rasterizer {
    color: String,
    max_dpr: f64,
}

impl Rasterizer {
    pub fn new(color: impl Into<String>, max_dpr: f64) -> Self {
        Self {
            color: color.into(),
            max_dpr,
        }
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Fit the surface's backing buffer to its CSS extent at `dpr`.
    pub fn fit(&self, surface: &mut dyn Surface, dpr: f64) -> Backing {
        let backing = Backing::compute(surface.extent(), dpr, self.max_dpr);
        surface.apply_backing(&backing);
        backing
    }

    /// Clear the surface, then fill every set cell of `mask`.
    pub fn draw(&self, surface: &mut dyn Surface, grid: &Grid, mask: &CellMask) {
        let extent = surface.extent();
        surface.clear(extent);
        if grid.is_empty() || mask.count() == 0 {
            return;
        }
        let cell_w = extent.width / grid.cols() as f64;
        let cell_h = extent.height / grid.rows() as f64;
        surface.set_fill(&self.color);
        for index in mask.iter_set() {
            surface.fill_rect(cell_rect(grid, index, cell_w, cell_h));
        }
    }
}

pub fn cell_rect(grid: &Grid, index: usize, cell_w: f64, cell_h: f64) -> CellRect {
    let (col, row) = grid.position(index);
    CellRect {
        x: col as f64 * cell_w,
        y: row as f64 * cell_h,
        width: cell_w,
        height: cell_h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_counts_track_transitions() {
        let mut mask = CellMask::new(6, false);
        mask.set(2, true);
        mask.set(2, true);
        mask.set(5, true);
        assert_eq!(mask.count(), 2);
        mask.set(2, false);
        assert_eq!(mask.iter_set().collect::<Vec<_>>(), vec![5]);
        mask.fill(true);
        assert_eq!(mask.count(), 6);
    }

    #[test]
    fn out_of_range_set_is_ignored() {
        let mut mask = CellMask::new(2, false);
        mask.set(9, true);
        assert_eq!(mask.count(), 0);
        assert!(!mask.get(9));
    }

    #[test]
    fn fractional_cells_tile_the_surface() {
        let grid = Grid::new(3, 1);
        let w = 100.0 / 3.0;
        let last = cell_rect(&grid, 2, w, 10.0);
        assert!((last.x + last.width - 100.0).abs() < 1e-9);
    }
}
