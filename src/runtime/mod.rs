//! Runtime for driving detection over one or many series.

pub mod batch;
pub mod detector;

pub use batch::{BatchConfig, BatchDetector, BatchOutcome};
pub use detector::{Detection, Detector};
