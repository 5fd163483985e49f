//! Error types for feature series validation and DTW alignment.

/// Errors from feature series validation and DTW alignment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DtwError {
    /// Returned when a series with zero time steps is provided.
    #[error("feature series must be non-empty")]
    EmptySeries,

    /// Returned when the first frame of a series has no components.
    #[error("feature frames must have at least one component")]
    EmptyFrame,

    /// Returned when a frame's dimensionality differs from the rest of the series,
    /// or when two aligned series have different frame dimensionality.
    #[error("frame {step} has {got} components, expected {expected}")]
    DimensionMismatch {
        /// Time step of the offending frame.
        step: usize,
        /// Dimensionality established by the reference frame.
        expected: usize,
        /// Dimensionality actually found.
        got: usize,
    },

    /// Returned when a series contains NaN, infinity, or negative infinity.
    #[error("feature series contains non-finite value at step {step}, component {component}")]
    NonFiniteValue {
        /// Time step of the first non-finite value found.
        step: usize,
        /// Component index within that frame.
        component: usize,
    },

    /// Returned when a window names a cell outside the `rows x cols` grid.
    #[error("window cell ({i}, {j}) lies outside the {rows}x{cols} grid")]
    WindowOutOfBounds {
        /// Row of the offending cell.
        i: usize,
        /// Column of the offending cell.
        j: usize,
        /// Number of rows in the grid.
        rows: usize,
        /// Number of columns in the grid.
        cols: usize,
    },

    /// Returned when no finite-cost path connects `(0, 0)` to `(rows-1, cols-1)`.
    #[error("no finite-cost warping path crosses the {rows}x{cols} grid")]
    Unreachable {
        /// Number of rows in the grid.
        rows: usize,
        /// Number of columns in the grid.
        cols: usize,
    },
}
