//! Coarse-to-fine DTW over a stack of CENS resolution levels.

use rayon::prelude::*;
use speechwarp_dtw::{AlignmentResult, Dtw, FeatureSeries, FeatureSeriesView, FrameDistance};
use tracing::{debug, instrument};

use crate::cens::summarize;
use crate::config::{MultiResolution, ResolutionParam, upsample_ratio};
use crate::error::AlignError;
use crate::project::project_window;

impl<M: FrameDistance> MultiResolution<M> {
    /// Align `a` and `b` coarse to fine.
    ///
    /// The coarsest usable level is aligned without constraint. Each finer
    /// level, and finally the raw series, is aligned inside the previous
    /// path grown by `radius` cells and projected onto the finer grid. With
    /// no levels configured this is plain full-grid DTW.
    ///
    /// The returned cost is exact for the returned path but may exceed the
    /// full-grid optimum.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`AlignError::InvalidRadius`] | `radius` is zero |
    /// | [`AlignError::InvalidSmoothingWindow`] | A level's smoothing window is zero |
    /// | [`AlignError::InvalidDownsample`] | A level's downsample factor is less than 2 |
    /// | [`AlignError::InexactUpsample`] | A level's factor is not a multiple of the previous one |
    /// | [`AlignError::SeriesTooShort`] | A series has fewer frames than the finest downsample factor |
    /// | [`AlignError::DegenerateFrame`] | A zero-norm frame appears under [`ZeroNormPolicy::Reject`](crate::ZeroNormPolicy::Reject) |
    /// | [`AlignError::Dtw`] | The series differ in dimensionality |
    #[instrument(skip_all, fields(rows = a.len(), cols = b.len(), levels = self.levels.len(), radius = self.radius))]
    pub fn align(
        &self,
        a: FeatureSeriesView<'_>,
        b: FeatureSeriesView<'_>,
    ) -> Result<AlignmentResult, AlignError> {
        self.validate()?;
        let dtw = Dtw::new(&self.metric);

        let Some(finest) = self.levels.first() else {
            debug!("no resolution levels, aligning full grid");
            return Ok(dtw.align_full(a, b)?);
        };

        let anchor = self.align_at_level(a, b, &self.levels, 0)?;
        let window = project_window(&anchor.path, a.len(), b.len(), self.radius, finest.downsample);
        debug!(
            window = window.len(),
            grid = a.len() * b.len(),
            "aligning raw series inside projected window"
        );
        Ok(dtw.align_windowed(a, b, &window)?)
    }

    /// Solve the alignment on the grid of `levels[0]`, using the remaining
    /// levels to constrain it. `depth` is the index of `levels[0]` in the
    /// full configuration and is only used for error reporting.
    ///
    /// Recursion stops at the first level whose summarized series are shorter
    /// than `radius + 2` frames, or when the next level would leave either
    /// series with no frames at all.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`AlignError::NoResolutionLevels`] | `levels` is empty |
    ///
    /// Plus every error of [`align`](Self::align).
    pub(crate) fn align_at_level(
        &self,
        a: FeatureSeriesView<'_>,
        b: FeatureSeriesView<'_>,
        levels: &[ResolutionParam],
        depth: usize,
    ) -> Result<AlignmentResult, AlignError> {
        let (head, rest) = levels.split_first().ok_or(AlignError::NoResolutionLevels)?;
        head.validate(depth)?;

        let shrunk_a = summarize(a, head.smoothing_window, head.downsample, self.zero_norm)?;
        let shrunk_b = summarize(b, head.smoothing_window, head.downsample, self.zero_norm)?;
        let dtw = Dtw::new(&self.metric);

        let min_usable = self.radius.saturating_add(2);
        let coarser = rest
            .first()
            .filter(|next| a.len() >= next.downsample && b.len() >= next.downsample);
        let coarser = match coarser {
            Some(next) if shrunk_a.len() >= min_usable && shrunk_b.len() >= min_usable => next,
            _ => {
                debug!(
                    level = depth,
                    rows = shrunk_a.len(),
                    cols = shrunk_b.len(),
                    "coarsest level reached, aligning full grid"
                );
                return Ok(dtw.align_full(shrunk_a.as_view(), shrunk_b.as_view())?);
            }
        };

        let upsample = upsample_ratio(head, coarser, depth + 1)?;
        let anchor = self.align_at_level(a, b, rest, depth + 1)?;
        let window = project_window(
            &anchor.path,
            shrunk_a.len(),
            shrunk_b.len(),
            self.radius,
            upsample,
        );
        debug!(
            level = depth,
            rows = shrunk_a.len(),
            cols = shrunk_b.len(),
            window = window.len(),
            "aligning level inside projected window"
        );
        Ok(dtw.align_windowed(shrunk_a.as_view(), shrunk_b.as_view(), &window)?)
    }
}

impl<M: FrameDistance + Sync> MultiResolution<M> {
    /// Align every pair independently, in parallel.
    ///
    /// Results are returned in input order. Each pair's coarse-to-fine chain
    /// runs sequentially on one worker.
    #[must_use]
    #[instrument(skip_all, fields(pairs = pairs.len()))]
    pub fn align_batch(
        &self,
        pairs: &[(FeatureSeries, FeatureSeries)],
    ) -> Vec<Result<AlignmentResult, AlignError>> {
        pairs
            .par_iter()
            .map(|(a, b)| self.align(a.as_view(), b.as_view()))
            .collect()
    }
}
