//! Full-grid and windowed DTW over multi-dimensional feature series.
//!
//! Pure math library with zero I/O. Provides validated feature series, grid
//! cells and warping paths, sparse search windows, frame metrics, and one DTW
//! recurrence that runs either over the whole grid or restricted to a window.

mod cost;
mod dtw;
mod error;
mod metric;
mod path;
mod series;
mod window;

pub use cost::{AlignmentCost, AlignmentResult};
pub use dtw::Dtw;
pub use error::DtwError;
pub use metric::{FnDistance, FrameDistance, Metric};
pub use path::{AlignmentPath, GridCell};
pub use series::{FeatureSeries, FeatureSeriesView};
pub use window::Window;
