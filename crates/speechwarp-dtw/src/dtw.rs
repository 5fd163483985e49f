//! DTW alignment over the full grid or a sparse window.

use std::ops::Range;

use tracing::{debug, instrument};

use crate::cost::{AlignmentCost, AlignmentResult};
use crate::error::DtwError;
use crate::metric::{FrameDistance, Metric};
use crate::path::{AlignmentPath, GridCell};
use crate::series::FeatureSeriesView;
use crate::window::Window;

/// Immutable DTW configuration. Thread-safe when the metric is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dtw<M = Metric> {
    metric: M,
}

impl<M: FrameDistance> Dtw<M> {
    /// Create a DTW calculator using `metric` as the local distance.
    #[must_use]
    pub fn new(metric: M) -> Self {
        Self { metric }
    }

    /// Return the local distance in use.
    #[must_use]
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Align two series over the full `n x m` grid.
    ///
    /// Runs in O(n * m) time and space.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | `a` and `b` have different frame dimensionality |
    pub fn align_full(
        &self,
        a: FeatureSeriesView<'_>,
        b: FeatureSeriesView<'_>,
    ) -> Result<AlignmentResult, DtwError> {
        self.align(a, b, None)
    }

    /// Align two series visiting only the cells of `window`.
    ///
    /// Runs in O(|window| * log w) time and O(|window|) space, where `w` is the
    /// widest window row.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | `a` and `b` have different frame dimensionality |
    /// | [`DtwError::WindowOutOfBounds`] | A window cell lies outside the grid |
    /// | [`DtwError::Unreachable`] | The window does not connect `(0, 0)` to `(n-1, m-1)` |
    pub fn align_windowed(
        &self,
        a: FeatureSeriesView<'_>,
        b: FeatureSeriesView<'_>,
        window: &Window,
    ) -> Result<AlignmentResult, DtwError> {
        self.align(a, b, Some(window))
    }

    /// Align two series, optionally restricted to `window`.
    ///
    /// Both [`align_full`][Self::align_full] and
    /// [`align_windowed`][Self::align_windowed] run through this one recurrence,
    /// so tie-breaking and traceback are identical in both modes. Ties prefer
    /// the diagonal predecessor, then the one above, then the one to the left.
    ///
    /// # Errors
    ///
    /// See [`align_windowed`][Self::align_windowed].
    #[instrument(skip_all, fields(rows = a.len(), cols = b.len(), windowed = window.is_some()))]
    pub fn align(
        &self,
        a: FeatureSeriesView<'_>,
        b: FeatureSeriesView<'_>,
        window: Option<&Window>,
    ) -> Result<AlignmentResult, DtwError> {
        if a.dim() != b.dim() {
            return Err(DtwError::DimensionMismatch {
                step: 0,
                expected: a.dim(),
                got: b.dim(),
            });
        }

        let n = a.len();
        let m = b.len();
        let layout = match window {
            None => Layout::Full { rows: n, cols: m },
            Some(window) => Layout::sparse(window, n, m)?,
        };
        debug!(cells = layout.len(), "filling cost grid");

        let mut cost = vec![f64::INFINITY; layout.len()];
        let mut dirs = vec![Step::Diagonal; layout.len()];

        for i in 0..n {
            let frame_a = a.frame(i);
            for idx in layout.row_span(i) {
                let j = layout.column(i, idx);
                let c = self.metric.distance(frame_a, b.frame(j));

                if i == 0 && j == 0 {
                    cost[idx] = c;
                    continue;
                }

                let lookup = |row: usize, col: usize| {
                    layout.index(row, col).map_or(f64::INFINITY, |p| cost[p])
                };

                // Diagonal: C[i-1][j-1]
                let diag = if i > 0 && j > 0 { lookup(i - 1, j - 1) } else { f64::INFINITY };
                // Above: C[i-1][j]
                let above = if i > 0 { lookup(i - 1, j) } else { f64::INFINITY };
                // Left: C[i][j-1]
                let left = if j > 0 { lookup(i, j - 1) } else { f64::INFINITY };

                let (min_val, dir) = if diag <= above && diag <= left {
                    (diag, Step::Diagonal)
                } else if above <= left {
                    (above, Step::Above)
                } else {
                    (left, Step::Left)
                };

                cost[idx] = c + min_val;
                dirs[idx] = dir;
            }
        }

        let unreachable = DtwError::Unreachable { rows: n, cols: m };
        let end = layout.index(n - 1, m - 1).ok_or_else(|| unreachable.clone())?;
        let total = cost[end];
        if !total.is_finite() {
            return Err(unreachable);
        }

        // Traceback from (n-1, m-1) to (0, 0). Every finite cell points at a
        // finite predecessor, so the walk stays inside the layout.
        let mut cells = Vec::with_capacity(n + m);
        let (mut i, mut j) = (n - 1, m - 1);
        loop {
            cells.push(GridCell::new(i, j));
            if i == 0 && j == 0 {
                break;
            }
            let idx = layout.index(i, j).ok_or_else(|| unreachable.clone())?;
            match dirs[idx] {
                Step::Diagonal => {
                    i -= 1;
                    j -= 1;
                }
                Step::Above => i -= 1,
                Step::Left => j -= 1,
            }
        }
        cells.reverse();

        debug!(path_len = cells.len(), cost = total, "alignment complete");
        Ok(AlignmentResult {
            path: AlignmentPath::new(cells),
            cost: AlignmentCost::new(total),
        })
    }
}

/// Predecessor chosen for a cell during the forward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Diagonal,
    Above,
    Left,
}

/// Flat storage layout of the visited cells.
///
/// `Full` stores row `i` at `i * cols..(i + 1) * cols`. `Sparse` stores the
/// sorted window columns of row `i` at `row_starts[i]..row_starts[i + 1]`.
enum Layout {
    Full { rows: usize, cols: usize },
    Sparse { row_starts: Vec<usize>, columns: Vec<usize> },
}

impl Layout {
    fn sparse(window: &Window, rows: usize, cols: usize) -> Result<Self, DtwError> {
        let mut row_starts = vec![0usize; rows + 1];
        let mut columns = Vec::with_capacity(window.len());

        for cell in window.cells() {
            if cell.i >= rows || cell.j >= cols {
                return Err(DtwError::WindowOutOfBounds {
                    i: cell.i,
                    j: cell.j,
                    rows,
                    cols,
                });
            }
            row_starts[cell.i + 1] += 1;
            columns.push(cell.j);
        }
        for i in 0..rows {
            row_starts[i + 1] += row_starts[i];
        }

        Ok(Self::Sparse { row_starts, columns })
    }

    fn len(&self) -> usize {
        match self {
            Self::Full { rows, cols } => rows * cols,
            Self::Sparse { columns, .. } => columns.len(),
        }
    }

    fn row_span(&self, i: usize) -> Range<usize> {
        match self {
            Self::Full { cols, .. } => i * cols..(i + 1) * cols,
            Self::Sparse { row_starts, .. } => row_starts[i]..row_starts[i + 1],
        }
    }

    fn column(&self, i: usize, idx: usize) -> usize {
        match self {
            Self::Full { cols, .. } => idx - i * cols,
            Self::Sparse { columns, .. } => columns[idx],
        }
    }

    fn index(&self, i: usize, j: usize) -> Option<usize> {
        match self {
            Self::Full { cols, .. } => (j < *cols).then_some(i * cols + j),
            Self::Sparse { row_starts, columns } => {
                let span = row_starts[i]..row_starts[i + 1];
                columns[span.clone()]
                    .binary_search(&j)
                    .ok()
                    .map(|offset| span.start + offset)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::FnDistance;
    use crate::series::FeatureSeries;

    fn dtw() -> Dtw {
        Dtw::default()
    }

    fn scalars(values: &[f64]) -> FeatureSeries {
        FeatureSeries::from_scalars(values.to_vec()).unwrap()
    }

    fn cells(result: &AlignmentResult) -> Vec<(usize, usize)> {
        result.path.cells().iter().map(|c| (c.i, c.j)).collect()
    }

    #[test]
    fn identical_series_cost_zero_on_diagonal() {
        let ts = FeatureSeries::new(vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.5, 0.5]]).unwrap();
        let result = dtw().align_full(ts.as_view(), ts.as_view()).unwrap();
        assert_eq!(result.cost.value(), 0.0);
        assert_eq!(cells(&result), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn repeated_frames_align_at_zero_cost() {
        // Every local distance is zero; ties fall to the diagonal, then above.
        let a = FeatureSeries::new(vec![vec![1.0, 0.0]; 3]).unwrap();
        let b = FeatureSeries::new(vec![vec![1.0, 0.0]; 2]).unwrap();
        let result = dtw().align_full(a.as_view(), b.as_view()).unwrap();
        assert_eq!(result.cost.value(), 0.0);
        assert_eq!(cells(&result), vec![(0, 0), (1, 0), (2, 1)]);
    }

    #[test]
    fn hand_computed_2x2() {
        // a=[0,1], b=[1,0]
        // C[0][0] = 1, C[0][1] = 0 + 1 = 1, C[1][0] = 0 + 1 = 1
        // C[1][1] = 1 + min(1, 1, 1) = 2, reached diagonally
        let a = scalars(&[0.0, 1.0]);
        let b = scalars(&[1.0, 0.0]);
        let result = dtw().align_full(a.as_view(), b.as_view()).unwrap();
        assert!((result.cost.value() - 2.0).abs() < 1e-12);
        assert_eq!(cells(&result), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn single_frame_series() {
        let a = scalars(&[5.0]);
        let b = scalars(&[3.0]);
        let result = Dtw::new(Metric::Euclidean).align_full(a.as_view(), b.as_view()).unwrap();
        assert!((result.cost.value() - 2.0).abs() < 1e-12);
        assert_eq!(cells(&result), vec![(0, 0)]);
    }

    #[test]
    fn full_window_matches_full_grid() {
        let a = scalars(&[1.0, 3.0, 5.0, 2.0, 0.0]);
        let b = scalars(&[2.0, 4.0, 1.0, 0.5]);
        let engine = dtw();
        let full = engine.align_full(a.as_view(), b.as_view()).unwrap();
        let windowed = engine
            .align_windowed(a.as_view(), b.as_view(), &Window::full(5, 4))
            .unwrap();
        assert_eq!(full, windowed);
    }

    #[test]
    fn band_radius_zero_forces_diagonal() {
        // a=[0,0,0], b=[1,1,1]: each diagonal cell costs 1
        let a = scalars(&[0.0, 0.0, 0.0]);
        let b = scalars(&[1.0, 1.0, 1.0]);
        let window = Window::sakoe_chiba(3, 3, 0);
        let result = dtw().align_windowed(a.as_view(), b.as_view(), &window).unwrap();
        assert!((result.cost.value() - 3.0).abs() < 1e-12);
        assert_eq!(cells(&result), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn band_cost_geq_full_cost() {
        let a = scalars(&[0.0, 1.0, 0.0, 1.0, 0.0]);
        let b = scalars(&[1.0, 0.0, 1.0, 0.0, 1.0]);
        let engine = dtw();
        let full = engine.align_full(a.as_view(), b.as_view()).unwrap();
        let banded = engine
            .align_windowed(a.as_view(), b.as_view(), &Window::sakoe_chiba(5, 5, 1))
            .unwrap();
        assert!(banded.cost.value() >= full.cost.value() - 1e-12);
    }

    #[test]
    fn window_hole_is_avoided() {
        let ts = scalars(&[0.0, 1.0, 2.0]);
        let window: Window = Window::full(3, 3)
            .cells()
            .iter()
            .copied()
            .filter(|&c| c != GridCell::new(1, 1))
            .collect();
        let result = dtw().align_windowed(ts.as_view(), ts.as_view(), &window).unwrap();
        assert!(result.cost.value() > 0.0);
        assert!(result.path.is_monotone());
        assert!(!result.path.cells().contains(&GridCell::new(1, 1)));
    }

    #[test]
    fn window_without_start_is_unreachable() {
        let ts = scalars(&[0.0, 1.0]);
        let window = Window::from_cells([GridCell::new(0, 1), GridCell::new(1, 1)]);
        let result = dtw().align_windowed(ts.as_view(), ts.as_view(), &window);
        assert!(matches!(result, Err(DtwError::Unreachable { rows: 2, cols: 2 })));
    }

    #[test]
    fn window_without_end_is_unreachable() {
        let ts = scalars(&[0.0, 1.0]);
        let window = Window::from_cells([GridCell::new(0, 0), GridCell::new(1, 0)]);
        let result = dtw().align_windowed(ts.as_view(), ts.as_view(), &window);
        assert!(matches!(result, Err(DtwError::Unreachable { .. })));
    }

    #[test]
    fn disconnected_window_is_unreachable() {
        let ts = scalars(&[0.0, 1.0, 2.0]);
        let window = Window::from_cells([GridCell::new(0, 0), GridCell::new(2, 2)]);
        let result = dtw().align_windowed(ts.as_view(), ts.as_view(), &window);
        assert!(matches!(result, Err(DtwError::Unreachable { .. })));
    }

    #[test]
    fn empty_window_is_unreachable() {
        let ts = scalars(&[0.0]);
        let result = dtw().align_windowed(ts.as_view(), ts.as_view(), &Window::default());
        assert!(matches!(result, Err(DtwError::Unreachable { rows: 1, cols: 1 })));
    }

    #[test]
    fn out_of_bounds_window_is_rejected() {
        let ts = scalars(&[0.0, 1.0]);
        let window = Window::from_cells([GridCell::new(0, 0), GridCell::new(1, 1), GridCell::new(2, 1)]);
        let result = dtw().align_windowed(ts.as_view(), ts.as_view(), &window);
        assert!(matches!(
            result,
            Err(DtwError::WindowOutOfBounds { i: 2, j: 1, rows: 2, cols: 2 })
        ));
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let a = FeatureSeries::new(vec![vec![1.0, 2.0]]).unwrap();
        let b = scalars(&[1.0]);
        let result = dtw().align_full(a.as_view(), b.as_view());
        assert!(matches!(
            result,
            Err(DtwError::DimensionMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn path_steps_by_at_most_one() {
        let a = scalars(&[1.0, 5.0, 2.0, 8.0, 3.0]);
        let b = scalars(&[2.0, 4.0, 7.0]);
        let result = dtw().align_full(a.as_view(), b.as_view()).unwrap();
        assert!(result.path.is_monotone());
        assert_eq!(result.path.first(), Some(GridCell::new(0, 0)));
        assert_eq!(result.path.last(), Some(GridCell::new(4, 2)));
    }

    #[test]
    fn cost_equals_sum_along_path() {
        let a = scalars(&[1.0, 3.0, 4.0, 9.0]);
        let b = scalars(&[1.0, 2.0, 8.0]);
        let engine = dtw();
        let result = engine.align_full(a.as_view(), b.as_view()).unwrap();
        let summed: f64 = result
            .path
            .cells()
            .iter()
            .map(|c| engine.metric().distance(a.frame(c.i), b.frame(c.j)))
            .sum();
        assert!((summed - result.cost.value()).abs() < 1e-12);
    }

    #[test]
    fn custom_metric_is_used() {
        let manhattan = FnDistance(|x: &[f64], y: &[f64]| {
            x.iter().zip(y).map(|(p, q)| (p - q).abs()).sum::<f64>()
        });
        let a = FeatureSeries::new(vec![vec![0.0, 0.0]]).unwrap();
        let b = FeatureSeries::new(vec![vec![1.0, -2.0]]).unwrap();
        let result = Dtw::new(manhattan).align_full(a.as_view(), b.as_view()).unwrap();
        assert!((result.cost.value() - 3.0).abs() < 1e-12);
    }
}
