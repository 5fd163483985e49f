//! Grid cells and warping paths for DTW alignment.

use serde::{Deserialize, Serialize};

/// One cell of the alignment grid: step `i` of the first series matched to
/// step `j` of the second series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    /// Index in the first series.
    pub i: usize,
    /// Index in the second series.
    pub j: usize,
}

impl GridCell {
    /// Create a cell at `(i, j)`.
    #[must_use]
    pub const fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }
}

impl From<(usize, usize)> for GridCell {
    fn from((i, j): (usize, usize)) -> Self {
        Self { i, j }
    }
}

/// An ordered sequence of cells from `(0, 0)` to `(n-1, m-1)`, non-decreasing
/// in both indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentPath(Vec<GridCell>);

impl AlignmentPath {
    /// Create a path from an ordered vector of cells.
    ///
    /// The cells are taken as given; use [`AlignmentPath::is_monotone`] to check
    /// a path that did not come out of the DTW engine.
    #[must_use]
    pub fn new(cells: Vec<GridCell>) -> Self {
        Self(cells)
    }

    /// Return the cells as a slice.
    #[must_use]
    pub fn cells(&self) -> &[GridCell] {
        &self.0
    }

    /// Return the number of cells in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the first cell, if any.
    #[must_use]
    pub fn first(&self) -> Option<GridCell> {
        self.0.first().copied()
    }

    /// Return the last cell, if any.
    #[must_use]
    pub fn last(&self) -> Option<GridCell> {
        self.0.last().copied()
    }

    /// Return true if every step advances by 0 or 1 in each index and by at
    /// least 1 in one of them.
    #[must_use]
    pub fn is_monotone(&self) -> bool {
        self.0.windows(2).all(|pair| {
            let (prev, next) = (pair[0], pair[1]);
            next.i >= prev.i
                && next.j >= prev.j
                && next.i - prev.i <= 1
                && next.j - prev.j <= 1
                && next != prev
        })
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<GridCell> {
        self.0
    }
}

impl<'a> IntoIterator for &'a AlignmentPath {
    type Item = &'a GridCell;
    type IntoIter = std::slice::Iter<'a, GridCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<GridCell> for AlignmentPath {
    fn from_iter<T: IntoIterator<Item = GridCell>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
