//! C-compatible type definitions for FFI.

use crate::config::{BaselineMode, DetectConfig, PeakDirection};
use crate::data::{CPeakRecord, PeakTable, SeriesError};
use crate::error::DetectError;

/// Result status codes for FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccpStatus {
    /// Operation succeeded.
    Ok = 0,
    /// Null pointer was passed.
    NullPointer = 1,
    /// Invalid argument.
    InvalidArgument = 2,
    /// Array length mismatch or malformed series.
    InvalidSeries = 3,
    /// Configuration out of range for this series.
    InvalidConfiguration = 4,
    /// Reference amplitude is not positive.
    NoValidPeaks = 5,
    /// Runtime error.
    RuntimeError = 6,
}

impl From<&DetectError> for AccpStatus {
    fn from(err: &DetectError) -> Self {
        match err {
            DetectError::InvalidConfiguration { .. } => AccpStatus::InvalidConfiguration,
            DetectError::NoValidPeaks { .. } => AccpStatus::NoValidPeaks,
            DetectError::Series(_) => AccpStatus::InvalidSeries,
            DetectError::StageMissing { .. } | DetectError::WorkerPool { .. } => {
                AccpStatus::RuntimeError
            }
        }
    }
}

impl From<&SeriesError> for AccpStatus {
    fn from(_: &SeriesError) -> Self {
        AccpStatus::InvalidSeries
    }
}

/// Baseline selector for [`CDetectConfig`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CBaselineMode {
    Median = 0,
    Mean = 1,
    RollingMean = 2,
    Fixed = 3,
}

/// Detection options for C callers.
#[repr(C)]
#[derive(Debug, Clone)]
pub struct CDetectConfig {
    /// Local maximum window width (even values are widened by one).
    pub local_max_span: usize,
    /// Cutoff fraction in (0, 1].
    pub threshold_fraction: f64,
    pub baseline_mode: CBaselineMode,
    /// Window for `RollingMean`.
    pub baseline_window: usize,
    /// Level for `Fixed`.
    pub baseline_value: f64,
    /// Quantile in (0, 1) for outlier mode; 0 disables it.
    pub outlier_quantile: f64,
    /// Search for minima instead of maxima.
    pub negative_peaks: bool,
}

impl Default for CDetectConfig {
    fn default() -> Self {
        let defaults = DetectConfig::default();
        Self {
            local_max_span: defaults.local_max_span,
            threshold_fraction: defaults.threshold_fraction,
            baseline_mode: CBaselineMode::Median,
            baseline_window: crate::config::DEFAULT_ROLLING_WINDOW,
            baseline_value: 0.0,
            outlier_quantile: 0.0,
            negative_peaks: false,
        }
    }
}

impl From<&CDetectConfig> for DetectConfig {
    fn from(c: &CDetectConfig) -> Self {
        let baseline = match c.baseline_mode {
            CBaselineMode::Median => BaselineMode::Median,
            CBaselineMode::Mean => BaselineMode::Mean,
            CBaselineMode::RollingMean => BaselineMode::RollingMean {
                window: c.baseline_window,
            },
            CBaselineMode::Fixed => BaselineMode::Fixed(c.baseline_value),
        };
        DetectConfig {
            local_max_span: c.local_max_span,
            threshold_fraction: c.threshold_fraction,
            baseline,
            outlier_quantile: if c.outlier_quantile == 0.0 {
                None
            } else {
                Some(c.outlier_quantile)
            },
            direction: if c.negative_peaks {
                PeakDirection::Negative
            } else {
                PeakDirection::Positive
            },
            ..DetectConfig::default()
        }
    }
}

/// C-compatible peak array result.
#[repr(C)]
pub struct CPeakArray {
    pub data: *mut CPeakRecord,
    pub len: usize,
    pub capacity: usize,
}

impl CPeakArray {
    /// Create from a peak table; release with `accp_peaks_free`.
    pub fn from_table(table: &PeakTable) -> Self {
        let mut records: Vec<CPeakRecord> = table.iter().map(CPeakRecord::from).collect();

        let len = records.len();
        let capacity = records.capacity();
        let data = records.as_mut_ptr();
        std::mem::forget(records);

        Self {
            data,
            len,
            capacity,
        }
    }

    pub fn empty() -> Self {
        Self {
            data: std::ptr::null_mut(),
            len: 0,
            capacity: 0,
        }
    }
}
