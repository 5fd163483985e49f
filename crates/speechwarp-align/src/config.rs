//! Resolution levels and the multi-resolution alignment configuration.

use serde::{Deserialize, Serialize};
use speechwarp_dtw::Metric;

use crate::cens::ZeroNormPolicy;
use crate::error::AlignError;

/// One resolution level: CENS smoothing window length and downsample factor
/// relative to the raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionParam {
    /// Number of Hann taps used to smooth quantized frames. Must be at least 1.
    ///
    /// Two taps give the all-zero window `[0.0, 0.0]`, so every summarized
    /// frame at this level is zero.
    pub smoothing_window: usize,
    /// Raw frames per summarized frame. Must be at least 2.
    pub downsample: usize,
}

impl ResolutionParam {
    /// Create a level. Values are checked when the level is used.
    #[must_use]
    pub const fn new(smoothing_window: usize, downsample: usize) -> Self {
        Self {
            smoothing_window,
            downsample,
        }
    }

    /// Check the level's own bounds. `level` is reported back in errors.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`AlignError::InvalidSmoothingWindow`] | `smoothing_window` is zero |
    /// | [`AlignError::InvalidDownsample`] | `downsample` is less than 2 |
    pub fn validate(&self, level: usize) -> Result<(), AlignError> {
        if self.smoothing_window < 1 {
            return Err(AlignError::InvalidSmoothingWindow {
                level,
                window: self.smoothing_window,
            });
        }
        if self.downsample < 2 {
            return Err(AlignError::InvalidDownsample {
                level,
                factor: self.downsample,
            });
        }
        Ok(())
    }
}

/// Ratio between the downsample factors of two adjacent levels.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`AlignError::InexactUpsample`] | `coarser.downsample` is not a positive multiple of `finer.downsample` |
pub(crate) fn upsample_ratio(
    finer: &ResolutionParam,
    coarser: &ResolutionParam,
    level: usize,
) -> Result<usize, AlignError> {
    let ratio = coarser.downsample / finer.downsample;
    if ratio == 0 || coarser.downsample % finer.downsample != 0 {
        return Err(AlignError::InexactUpsample {
            level,
            finer: finer.downsample,
            coarser: coarser.downsample,
        });
    }
    Ok(ratio)
}

/// Configuration for coarse-to-fine DTW alignment.
///
/// Construct via [`MultiResolution::new`], then chain `with_*` methods to
/// override defaults. Levels are ordered finest first; each level's
/// downsample factor is relative to the raw input and must be a multiple of
/// the previous one.
///
/// # Defaults
///
/// | Parameter     | Default                         |
/// |---------------|---------------------------------|
/// | `levels`      | empty (plain full-grid DTW)     |
/// | `metric`      | `Metric::SquaredEuclidean`      |
/// | `zero_norm`   | `ZeroNormPolicy::KeepZero`      |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiResolution<M = Metric> {
    pub(crate) radius: usize,
    pub(crate) levels: Vec<ResolutionParam>,
    pub(crate) metric: M,
    #[serde(default)]
    pub(crate) zero_norm: ZeroNormPolicy,
}

impl MultiResolution<Metric> {
    /// Create a configuration that widens every coarse path by `radius` cells.
    ///
    /// `radius` is checked when aligning; it must be at least 1.
    #[must_use]
    pub fn new(radius: usize) -> Self {
        Self {
            radius,
            levels: Vec::new(),
            metric: Metric::default(),
            zero_norm: ZeroNormPolicy::default(),
        }
    }
}

impl<M> MultiResolution<M> {
    /// Replace all resolution levels, finest first.
    #[must_use]
    pub fn with_levels(mut self, levels: impl IntoIterator<Item = ResolutionParam>) -> Self {
        self.levels = levels.into_iter().collect();
        self
    }

    /// Append a level coarser than every level already configured.
    #[must_use]
    pub fn with_level(mut self, smoothing_window: usize, downsample: usize) -> Self {
        self.levels.push(ResolutionParam::new(smoothing_window, downsample));
        self
    }

    /// Set the frame distance used at every level.
    #[must_use]
    pub fn with_metric<N>(self, metric: N) -> MultiResolution<N> {
        MultiResolution {
            radius: self.radius,
            levels: self.levels,
            metric,
            zero_norm: self.zero_norm,
        }
    }

    /// Set the policy for zero-norm summarized frames.
    #[must_use]
    pub fn with_zero_norm_policy(mut self, policy: ZeroNormPolicy) -> Self {
        self.zero_norm = policy;
        self
    }

    /// Return the projection radius.
    #[must_use]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Return the configured levels, finest first.
    #[must_use]
    pub fn levels(&self) -> &[ResolutionParam] {
        &self.levels
    }

    /// Return the frame distance.
    #[must_use]
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Return the zero-norm policy.
    #[must_use]
    pub fn zero_norm_policy(&self) -> ZeroNormPolicy {
        self.zero_norm
    }

    /// Check the radius and every level, including the ratio between
    /// adjacent levels.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`AlignError::InvalidRadius`] | `radius` is zero |
    /// | [`AlignError::InvalidSmoothingWindow`] | A level's smoothing window is zero |
    /// | [`AlignError::InvalidDownsample`] | A level's downsample factor is less than 2 |
    /// | [`AlignError::InexactUpsample`] | A level's factor is not a multiple of the previous one |
    pub fn validate(&self) -> Result<(), AlignError> {
        if self.radius < 1 {
            return Err(AlignError::InvalidRadius { radius: self.radius });
        }
        for (level, param) in self.levels.iter().enumerate() {
            param.validate(level)?;
        }
        for (level, pair) in self.levels.windows(2).enumerate() {
            upsample_ratio(&pair[0], &pair[1], level + 1)?;
        }
        Ok(())
    }
}
