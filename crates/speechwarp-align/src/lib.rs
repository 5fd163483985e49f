//! Multi-resolution DTW alignment of feature series.
//!
//! Pure math library with zero I/O. Summarizes feature series into CENS-like
//! chroma energy statistics at several resolutions, aligns the coarsest pair
//! with full-grid DTW, and refines the path level by level inside a window
//! projected from the coarser path.

mod cens;
mod config;
mod error;
mod multires;
mod project;
mod quantize;
mod reduce;

pub use cens::{ZeroNormPolicy, hann_window, summarize};
pub use config::{MultiResolution, ResolutionParam};
pub use error::AlignError;
pub use project::project_window;
pub use quantize::{quantize, quantize_frame, quantize_value};
pub use reduce::{reduce_features, reduce_scalar};

pub use speechwarp_dtw::{
    AlignmentCost, AlignmentPath, AlignmentResult, FeatureSeries, FeatureSeriesView, FrameDistance,
    GridCell, Metric, Window,
};
