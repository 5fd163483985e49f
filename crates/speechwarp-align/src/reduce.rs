//! Block-averaging reducers.

use speechwarp_dtw::{FeatureSeries, FeatureSeriesView};

use crate::error::AlignError;

/// Average every consecutive block of `factor` samples.
///
/// A trailing block shorter than `factor` is dropped, so the output has
/// `floor(values.len() / factor)` samples.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`AlignError::InvalidReduceFactor`] | `factor` is zero |
pub fn reduce_scalar(values: &[f64], factor: usize) -> Result<Vec<f64>, AlignError> {
    if factor == 0 {
        return Err(AlignError::InvalidReduceFactor);
    }
    Ok(values
        .chunks_exact(factor)
        .map(|block| block.iter().sum::<f64>() / factor as f64)
        .collect())
}

/// Block-reduce a multi-dimensional feature series.
///
/// No reduction policy is defined for feature frames yet, so this always fails.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`AlignError::Unimplemented`] | Always |
pub fn reduce_features(
    _series: FeatureSeriesView<'_>,
    _smoothing_window: usize,
    _downsample: usize,
) -> Result<FeatureSeries, AlignError> {
    Err(AlignError::Unimplemented {
        operation: "feature series reduction",
    })
}
