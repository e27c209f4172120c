//! Input time series.

/// A univariate time series with its marked-event mask.
#[derive(Clone, Debug)]
pub struct InputSeries {
    /// Label used in logs, batch results and plot file names.
    pub id: String,

    /// Sample times in seconds, non-decreasing.
    pub timestamps: Vec<f64>,

    /// Measured values (e.g. one acceleration axis).
    pub values: Vec<f64>,

    /// Per-sample markers; only entries > 0 are eligible for detection.
    pub marked_events: Vec<f64>,
}

impl InputSeries {
    /// Create a series where every sample is eligible.
    pub fn new(
        id: impl Into<String>,
        timestamps: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        let marked_events = vec![1.0; values.len()];
        Self::with_marked_events(id, timestamps, values, marked_events)
    }

    /// Create a series with an explicit marked-event mask.
    pub fn with_marked_events(
        id: impl Into<String>,
        timestamps: Vec<f64>,
        values: Vec<f64>,
        marked_events: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        let len = timestamps.len();
        if values.len() != len || marked_events.len() != len {
            return Err(SeriesError::LengthMismatch {
                timestamps_len: len,
                values_len: values.len(),
                marked_len: marked_events.len(),
            });
        }
        if len == 0 {
            return Err(SeriesError::Empty);
        }
        check_monotonic(&timestamps)?;

        Ok(Self {
            id: id.into(),
            timestamps,
            values,
            marked_events,
        })
    }

    /// Create a series sampled at a fixed rate, starting at t = 0.
    pub fn from_sample_rate(
        id: impl Into<String>,
        sample_rate_hz: f64,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
            return Err(SeriesError::InvalidSampleRate(sample_rate_hz));
        }
        let timestamps = (0..values.len())
            .map(|i| i as f64 / sample_rate_hz)
            .collect();
        Self::new(id, timestamps, values)
    }

    /// Get the number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the series has no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the marker at `index` admits the sample for detection.
    #[inline]
    pub fn is_marked(&self, index: usize) -> bool {
        self.marked_events.get(index).is_some_and(|&m| m > 0.0)
    }
}

fn check_monotonic(timestamps: &[f64]) -> Result<(), SeriesError> {
    if let Some(index) = timestamps.iter().position(|t| !t.is_finite()) {
        return Err(SeriesError::NonMonotonicTime { index });
    }
    match timestamps.windows(2).position(|w| w[1] < w[0]) {
        Some(pos) => Err(SeriesError::NonMonotonicTime { index: pos + 1 }),
        None => Ok(()),
    }
}

/// Errors that can occur when building a series.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// Array lengths don't match.
    LengthMismatch {
        timestamps_len: usize,
        values_len: usize,
        marked_len: usize,
    },
    /// The series has no samples.
    Empty,
    /// Timestamp at `index` is not finite or goes backwards.
    NonMonotonicTime { index: usize },
    /// Sample rate must be finite and positive.
    InvalidSampleRate(f64),
}

impl std::fmt::Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesError::LengthMismatch {
                timestamps_len,
                values_len,
                marked_len,
            } => write!(
                f,
                "Array length mismatch: timestamps={}, values={}, marked_events={}",
                timestamps_len, values_len, marked_len
            ),
            SeriesError::Empty => write!(f, "Series is empty"),
            SeriesError::NonMonotonicTime { index } => {
                write!(f, "Timestamp at index {} is not monotonic", index)
            }
            SeriesError::InvalidSampleRate(rate) => {
                write!(f, "Sample rate {} must be finite and positive", rate)
            }
        }
    }
}

impl std::error::Error for SeriesError {}
