//! Local distances between feature frames.

use serde::{Deserialize, Serialize};

/// Pairwise distance between two frames of equal dimensionality.
///
/// Implementations must be pure: the engine calls them once per visited cell
/// and relies on identical results for identical inputs.
pub trait FrameDistance {
    /// Return the non-negative distance between `a` and `b`.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

impl<T: FrameDistance + ?Sized> FrameDistance for &T {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        (**self).distance(a, b)
    }
}

/// Built-in frame metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Sum of squared component differences.
    #[default]
    SquaredEuclidean,
    /// Square root of [`Metric::SquaredEuclidean`].
    Euclidean,
    /// `1 - cos(a, b)`. A zero frame is at distance 0 from another zero frame
    /// and 1 from anything else.
    Cosine,
}

impl FrameDistance for Metric {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Self::SquaredEuclidean => squared_euclidean(a, b),
            Self::Euclidean => squared_euclidean(a, b).sqrt(),
            Self::Cosine => cosine(a, b),
        }
    }
}

/// Adapter turning any `Fn(&[f64], &[f64]) -> f64` into a [`FrameDistance`].
#[derive(Debug, Clone, Copy)]
pub struct FnDistance<F>(pub F);

impl<F> FrameDistance for FnDistance<F>
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        (self.0)(a, b)
    }
}

fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    match (norm_a == 0.0, norm_b == 0.0) {
        (true, true) => 0.0,
        (true, false) | (false, true) => 1.0,
        // Clamp rounding noise so identical frames land exactly on zero.
        (false, false) => (1.0 - dot / (norm_a * norm_b)).max(0.0),
    }
}
