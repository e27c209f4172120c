//! Data structures for peak detection.

pub mod peak;
pub mod series;
pub mod stats;
pub mod trace;

pub use peak::{CPeakRecord, PeakRecord, PeakTable};
pub use series::{InputSeries, SeriesError};
pub use stats::{find_max, mean, median, quantile, rolling_mean};
pub use trace::{Baseline, DetectionTrace};
