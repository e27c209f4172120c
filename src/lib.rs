//! accpeaks - local-maximum peak detection for accelerometry time series.
//!
//! This crate finds peaks (or troughs) in a univariate, roughly regularly
//! sampled signal such as one axis of a wearable accelerometer, and reports
//! their times, amplitudes and inter-peak periods. It is meant for batch and
//! exploratory analysis of movement cycles, not for streaming.
//!
//! # Pipeline
//!
//! ```text
//! ┌────────────┐   ┌──────────┐   ┌───────────┐   ┌──────────┐
//! │ Preprocess │──▶│   Scan   │──▶│ Threshold │──▶│ Assemble │──▶ PeakTable
//! │ baseline,  │   │ window   │   │ fraction  │   │ records, │
//! │ mask, sign │   │ maxima   │   │ of max/q  │   │ periods  │
//! └────────────┘   └──────────┘   └───────────┘   └──────────┘
//! ```
//!
//! Each stage implements [`Stage`] and is looked up in a [`StageRegistry`];
//! [`Detector`] drives one series through them, [`BatchDetector`] fans many
//! series out over a rayon pool, and the `ffi` module exposes the same entry
//! point to C callers.
//!
//! # Example
//!
//! ```
//! use accpeaks::{BaselineMode, DetectConfig, Detector, InputSeries};
//!
//! let mut values = vec![0.0; 50];
//! values[20] = 10.0;
//! let series = InputSeries::from_sample_rate("x", 1.0, values).unwrap();
//!
//! let detector = Detector::new(&DetectConfig {
//!     threshold_fraction: 0.5,
//!     baseline: BaselineMode::Fixed(0.0),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let table = detector.detect(&series).unwrap();
//! assert_eq!(table.indices(), vec![21]);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod ffi;
pub mod plot;
pub mod runtime;
pub mod stage;

// Re-export commonly used items
pub use config::{
    BaselineMode, DetectConfig, LocalMaxSpan, PeakDirection, ThresholdReference, ValidatedConfig,
};
pub use data::{Baseline, DetectionTrace, InputSeries, PeakRecord, PeakTable, SeriesError};
pub use error::DetectError;
pub use runtime::{BatchConfig, BatchDetector, BatchOutcome, Detection, Detector};
pub use stage::{Stage, StageId, StageRegistry, StageResult};

// Re-export FFI types for cbindgen
pub use ffi::detect::*;
pub use ffi::types::*;
