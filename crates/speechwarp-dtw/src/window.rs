//! Search windows restricting which grid cells DTW may visit.

use serde::Serialize;

use crate::path::GridCell;

/// Set of grid cells a windowed DTW pass is allowed to visit.
///
/// Cells are kept sorted row-major and free of duplicates. Every cell outside
/// the window is treated as having infinite cost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Window {
    cells: Vec<GridCell>,
}

impl Window {
    /// Build a window from arbitrary cells, sorting and deduplicating them.
    #[must_use]
    pub fn from_cells(cells: impl IntoIterator<Item = GridCell>) -> Self {
        let mut cells: Vec<GridCell> = cells.into_iter().collect();
        cells.sort_unstable();
        cells.dedup();
        Self { cells }
    }

    /// Window covering every cell of a `rows x cols` grid.
    #[must_use]
    pub fn full(rows: usize, cols: usize) -> Self {
        let cells = (0..rows)
            .flat_map(|i| (0..cols).map(move |j| GridCell::new(i, j)))
            .collect();
        Self { cells }
    }

    /// Sakoe-Chiba band: cell `(i, j)` is allowed only if `|i - j| <= radius`.
    ///
    /// Row `i` covers the intersection of `[i - radius, i + radius]` with `[0, cols)`.
    #[must_use]
    pub fn sakoe_chiba(rows: usize, cols: usize, radius: usize) -> Self {
        let cells = (0..rows)
            .flat_map(|i| {
                let start = i.saturating_sub(radius);
                let end = i.saturating_add(radius).saturating_add(1).min(cols);
                (start..end).map(move |j| GridCell::new(i, j))
            })
            .collect();
        Self { cells }
    }

    /// Return the cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Return the number of allowed cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Return true if no cell is allowed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Return true if `cell` is allowed.
    #[must_use]
    pub fn contains(&self, cell: GridCell) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }

    /// Return the allowed cells of row `i`, in column order.
    #[must_use]
    pub fn row(&self, i: usize) -> &[GridCell] {
        let start = self.cells.partition_point(|c| c.i < i);
        let end = self.cells.partition_point(|c| c.i <= i);
        &self.cells[start..end]
    }
}

impl FromIterator<GridCell> for Window {
    fn from_iter<T: IntoIterator<Item = GridCell>>(iter: T) -> Self {
        Self::from_cells(iter)
    }
}
