//! Error types for feature summarization and multi-resolution alignment.

use speechwarp_dtw::DtwError;

/// Errors from CENS summarization, window projection and multi-resolution DTW.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AlignError {
    /// Returned when the projection radius is zero.
    #[error("radius must be at least 1, got {radius}")]
    InvalidRadius {
        /// The invalid radius provided.
        radius: usize,
    },

    /// Returned when a resolution level has a zero-length smoothing window.
    #[error("level {level}: smoothing window must be at least 1, got {window}")]
    InvalidSmoothingWindow {
        /// Index of the level, finest first.
        level: usize,
        /// The invalid smoothing window length.
        window: usize,
    },

    /// Returned when a resolution level downsamples by less than 2.
    #[error("level {level}: downsample factor must be at least 2, got {factor}")]
    InvalidDownsample {
        /// Index of the level, finest first.
        level: usize,
        /// The invalid downsample factor.
        factor: usize,
    },

    /// Returned when a coarser level's downsample factor is not a positive
    /// integer multiple of the finer level's factor.
    #[error("level {level}: downsample {coarser} is not a multiple of the finer level's {finer}")]
    InexactUpsample {
        /// Index of the coarser level.
        level: usize,
        /// Downsample factor of the finer level.
        finer: usize,
        /// Downsample factor of the coarser level.
        coarser: usize,
    },

    /// Returned when downsampling would leave no frames.
    #[error("series of {len} frames is too short to downsample by {downsample}")]
    SeriesTooShort {
        /// Number of frames in the input.
        len: usize,
        /// The requested downsample factor.
        downsample: usize,
    },

    /// Returned when a block reducer is asked to average groups of zero elements.
    #[error("reduce factor must be at least 1")]
    InvalidReduceFactor,

    /// Returned when the recursive level solver is entered with no levels left.
    /// Indicates a driver bug rather than caller misuse.
    #[error("resolution level list must not be empty when descending")]
    NoResolutionLevels,

    /// Returned under [`ZeroNormPolicy::Reject`](crate::ZeroNormPolicy::Reject)
    /// when a summarized frame has zero L2 norm.
    #[error("summarized frame {frame} has zero norm and cannot be normalized")]
    DegenerateFrame {
        /// Index of the offending output frame.
        frame: usize,
    },

    /// Returned by operations whose reduction policy is not defined yet.
    #[error("{operation} is not implemented")]
    Unimplemented {
        /// Name of the operation.
        operation: &'static str,
    },

    /// Wraps an error from the DTW engine or series validation.
    #[error("DTW error: {0}")]
    Dtw(#[from] DtwError),
}
