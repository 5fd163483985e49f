//! Threshold quantization of feature components into CENS buckets.

use speechwarp_dtw::{FeatureSeries, FeatureSeriesView};

/// Lower bounds of buckets 4, 3, 2 and 1. Anything below the last is bucket 0.
const BUCKET_THRESHOLDS: [(f64, f64); 4] = [(0.4, 4.0), (0.2, 3.0), (0.1, 2.0), (0.05, 1.0)];

/// Map one component to its bucket index in `{0, 1, 2, 3, 4}`.
#[must_use]
pub fn quantize_value(value: f64) -> f64 {
    BUCKET_THRESHOLDS
        .iter()
        .find(|&&(threshold, _)| value >= threshold)
        .map_or(0.0, |&(_, bucket)| bucket)
}

/// Quantize every component of one frame.
#[must_use]
pub fn quantize_frame(frame: &[f64]) -> Vec<f64> {
    frame.iter().copied().map(quantize_value).collect()
}

/// Quantize every frame of a series, preserving its shape.
#[must_use = "returns a new quantized series; the input is unchanged"]
pub fn quantize(series: FeatureSeriesView<'_>) -> FeatureSeries {
    let data: Vec<f64> = series.as_flat().iter().copied().map(quantize_value).collect();
    // Buckets are small finite integers and the shape is copied from a valid series.
    FeatureSeries::from_flat(data, series.dim()).expect("quantized series keeps a valid shape")
}
