//! Feature series types with validation guarantees.

use std::ops::Index;

use crate::error::DtwError;

/// Owned, validated series of feature frames.
///
/// Guaranteed non-empty, every frame has the same non-zero dimensionality and
/// every component is finite. Frames are stored row-major in one flat buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSeries {
    data: Vec<f64>,
    dim: usize,
}

impl FeatureSeries {
    /// Create a new series from one vector per time step.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySeries`] | `frames` is empty |
    /// | [`DtwError::EmptyFrame`] | The first frame has no components |
    /// | [`DtwError::DimensionMismatch`] | A frame differs in length from the first |
    /// | [`DtwError::NonFiniteValue`] | Any component is NaN or infinite |
    pub fn new(frames: Vec<Vec<f64>>) -> Result<Self, DtwError> {
        let first = frames.first().ok_or(DtwError::EmptySeries)?;
        let dim = first.len();
        if dim == 0 {
            return Err(DtwError::EmptyFrame);
        }

        let mut data = Vec::with_capacity(frames.len() * dim);
        for (step, frame) in frames.iter().enumerate() {
            if frame.len() != dim {
                return Err(DtwError::DimensionMismatch {
                    step,
                    expected: dim,
                    got: frame.len(),
                });
            }
            data.extend_from_slice(frame);
        }

        validate_finite(&data, dim)?;
        Ok(Self { data, dim })
    }

    /// Create a new series from a row-major flat buffer of `dim`-sized frames.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptyFrame`] | `dim` is zero |
    /// | [`DtwError::EmptySeries`] | `data` is empty |
    /// | [`DtwError::DimensionMismatch`] | `data.len()` is not a multiple of `dim` |
    /// | [`DtwError::NonFiniteValue`] | Any component is NaN or infinite |
    pub fn from_flat(data: Vec<f64>, dim: usize) -> Result<Self, DtwError> {
        validate_flat(&data, dim)?;
        Ok(Self { data, dim })
    }

    /// Create a single-component series from scalar samples.
    ///
    /// # Errors
    ///
    /// Same as [`FeatureSeries::from_flat`] with `dim = 1`.
    pub fn from_scalars(values: Vec<f64>) -> Result<Self, DtwError> {
        Self::from_flat(values, 1)
    }

    /// Borrow this series as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> FeatureSeriesView<'_> {
        FeatureSeriesView::new_unchecked(&self.data, self.dim)
    }

    /// Return the number of time steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Return true if the series has no time steps.
    ///
    /// A validated [`FeatureSeries`] is always non-empty, so this always
    /// returns `false`. Provided to satisfy the `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the number of components per frame.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return the frame at time step `step`.
    ///
    /// # Panics
    ///
    /// Panics if `step >= self.len()`.
    #[must_use]
    pub fn frame(&self, step: usize) -> &[f64] {
        &self.data[step * self.dim..(step + 1) * self.dim]
    }

    /// Iterate over frames in time order.
    pub fn frames(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.dim)
    }

    /// Return the row-major flat buffer.
    #[must_use]
    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }

    /// Consume and return the row-major flat buffer.
    #[must_use]
    pub fn into_flat(self) -> Vec<f64> {
        self.data
    }
}

impl TryFrom<Vec<Vec<f64>>> for FeatureSeries {
    type Error = DtwError;

    fn try_from(frames: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(frames)
    }
}

impl Index<usize> for FeatureSeries {
    type Output = [f64];

    fn index(&self, step: usize) -> &Self::Output {
        self.frame(step)
    }
}

/// Borrowed, validated view into a feature series. Zero-copy reference.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSeriesView<'a> {
    data: &'a [f64],
    dim: usize,
}

impl<'a> FeatureSeriesView<'a> {
    /// Create a new view over a row-major flat slice of `dim`-sized frames.
    ///
    /// # Errors
    ///
    /// Same conditions as [`FeatureSeries::from_flat`].
    pub fn new(data: &'a [f64], dim: usize) -> Result<Self, DtwError> {
        validate_flat(data, dim)?;
        Ok(Self { data, dim })
    }

    /// Create a view without validation. For internal use where data is already validated.
    pub(crate) fn new_unchecked(data: &'a [f64], dim: usize) -> Self {
        Self { data, dim }
    }

    /// Return the number of time steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    /// Return true if the view has no time steps.
    ///
    /// Always `false` for validated views.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return the number of components per frame.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return the frame at time step `step`.
    ///
    /// # Panics
    ///
    /// Panics if `step >= self.len()`.
    #[must_use]
    pub fn frame(&self, step: usize) -> &'a [f64] {
        &self.data[step * self.dim..(step + 1) * self.dim]
    }

    /// Iterate over frames in time order.
    pub fn frames(self) -> impl ExactSizeIterator<Item = &'a [f64]> {
        self.data.chunks_exact(self.dim)
    }

    /// Return the underlying row-major flat slice.
    #[must_use]
    pub fn as_flat(&self) -> &'a [f64] {
        self.data
    }
}

impl Index<usize> for FeatureSeriesView<'_> {
    type Output = [f64];

    fn index(&self, step: usize) -> &Self::Output {
        self.frame(step)
    }
}

fn validate_flat(data: &[f64], dim: usize) -> Result<(), DtwError> {
    if dim == 0 {
        return Err(DtwError::EmptyFrame);
    }
    if data.is_empty() {
        return Err(DtwError::EmptySeries);
    }
    if data.len() % dim != 0 {
        return Err(DtwError::DimensionMismatch {
            step: data.len() / dim,
            expected: dim,
            got: data.len() % dim,
        });
    }
    validate_finite(data, dim)
}

fn validate_finite(data: &[f64], dim: usize) -> Result<(), DtwError> {
    match data.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(DtwError::NonFiniteValue {
            step: index / dim,
            component: index % dim,
        }),
        None => Ok(()),
    }
}
