//! CENS-like summarization: quantize, Hann-smooth, downsample, L2-normalize.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use speechwarp_dtw::{FeatureSeries, FeatureSeriesView};
use tracing::{instrument, trace};

use crate::error::AlignError;
use crate::quantize::quantize;

/// What to do with a summarized frame whose L2 norm is zero.
///
/// All-zero frames show up when the smoothing window only reaches quiet
/// (bucket 0) input, typically at the series boundaries or in silence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroNormPolicy {
    /// Leave the frame as the zero vector.
    #[default]
    KeepZero,
    /// Fail with [`AlignError::DegenerateFrame`].
    Reject,
}

/// Norms at or below this are treated as zero.
const ZERO_NORM: f64 = f64::EPSILON;

/// Build a Hann window of `len` taps: `(1 - cos(2*pi*k / (len - 1))) / 2`.
///
/// A single-tap window is `[1.0]`. A two-tap window is `[0.0, 0.0]`, so it
/// zeroes every frame it smooths.
#[must_use]
pub fn hann_window(len: usize) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    let denom = (len - 1) as f64;
    (0..len)
        .map(|k| (1.0 - (2.0 * PI * k as f64 / denom).cos()) / 2.0)
        .collect()
}

/// Summarize a feature series into a CENS-reduced series.
///
/// Every frame is quantized, smoothed with a Hann window of
/// `smoothing_window` taps centred on `i * downsample`, and L2-normalized.
/// Taps that fall outside the series contribute nothing. The output has
/// `floor(len / downsample)` frames of the input's dimensionality.
///
/// Parameter errors always carry `level: 0`. [`MultiResolution`](crate::MultiResolution)
/// checks each level with its own index before summarizing it.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`AlignError::InvalidSmoothingWindow`] | `smoothing_window` is zero |
/// | [`AlignError::InvalidDownsample`] | `downsample` is less than 2 |
/// | [`AlignError::SeriesTooShort`] | `series` has fewer than `downsample` frames |
/// | [`AlignError::DegenerateFrame`] | A frame has zero norm under [`ZeroNormPolicy::Reject`] |
#[instrument(skip(series), fields(len = series.len(), dim = series.dim()))]
pub fn summarize(
    series: FeatureSeriesView<'_>,
    smoothing_window: usize,
    downsample: usize,
    policy: ZeroNormPolicy,
) -> Result<FeatureSeries, AlignError> {
    if smoothing_window < 1 {
        return Err(AlignError::InvalidSmoothingWindow {
            level: 0,
            window: smoothing_window,
        });
    }
    if downsample < 2 {
        return Err(AlignError::InvalidDownsample {
            level: 0,
            factor: downsample,
        });
    }

    let len = series.len();
    let out_len = len / downsample;
    if out_len == 0 {
        return Err(AlignError::SeriesTooShort { len, downsample });
    }

    let quantized = quantize(series);
    let kernel = hann_window(smoothing_window);
    let half = smoothing_window / 2;
    let dim = series.dim();

    let mut data = vec![0.0_f64; out_len * dim];
    for (i, out) in data.chunks_exact_mut(dim).enumerate() {
        let centre = i * downsample;
        for (j, &weight) in kernel.iter().enumerate() {
            // Source index n = centre + j - half, skipped when outside [0, len).
            let Some(n) = (centre + j).checked_sub(half) else {
                continue;
            };
            if n >= len {
                break;
            }
            for (acc, &q) in out.iter_mut().zip(quantized.frame(n)) {
                *acc += weight * q;
            }
        }

        let norm = out.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > ZERO_NORM {
            for v in out.iter_mut() {
                *v /= norm;
            }
        } else {
            match policy {
                ZeroNormPolicy::KeepZero => {
                    trace!(frame = i, "zero-norm frame kept as silence");
                    out.fill(0.0);
                }
                ZeroNormPolicy::Reject => return Err(AlignError::DegenerateFrame { frame: i }),
            }
        }
    }

    Ok(FeatureSeries::from_flat(data, dim)?)
}
