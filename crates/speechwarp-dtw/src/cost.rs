//! Accumulated alignment cost newtype and alignment result.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::AlignmentPath;

/// Total accumulated local distance along a warping path.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlignmentCost(f64);

impl AlignmentCost {
    /// Create a cost from a raw accumulated value.
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw cost value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Return true if the cost is finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl fmt::Display for AlignmentCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// Result of a DTW alignment: the optimal path and its accumulated cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Optimal warping path from `(0, 0)` to `(n-1, m-1)`.
    pub path: AlignmentPath,
    /// Sum of local distances along `path`.
    pub cost: AlignmentCost,
}
