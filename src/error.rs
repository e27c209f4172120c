//! Error type for peak detection.

use crate::data::SeriesError;
use crate::stage::StageId;

/// Errors returned by a detection run.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectError {
    /// A configuration value is out of range for this series.
    InvalidConfiguration { reason: String },
    /// The reference amplitude is not positive, so no cutoff can be formed.
    NoValidPeaks { reference: f64 },
    /// The input series is malformed.
    Series(SeriesError),
    /// The registry has no stage for the requested id.
    StageMissing { stage: StageId },
    /// The batch worker pool could not be built.
    WorkerPool { reason: String },
}

impl DetectError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        DetectError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for DetectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectError::InvalidConfiguration { reason } => {
                write!(f, "Invalid configuration: {}", reason)
            }
            DetectError::NoValidPeaks { reference } => write!(
                f,
                "No valid peaks: reference amplitude {} is not positive",
                reference
            ),
            DetectError::Series(err) => write!(f, "Invalid series: {}", err),
            DetectError::StageMissing { stage } => {
                write!(f, "No stage registered for '{}'", stage.name())
            }
            DetectError::WorkerPool { reason } => {
                write!(f, "Failed to build worker pool: {}", reason)
            }
        }
    }
}

impl std::error::Error for DetectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DetectError::Series(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SeriesError> for DetectError {
    fn from(err: SeriesError) -> Self {
        DetectError::Series(err)
    }
}
