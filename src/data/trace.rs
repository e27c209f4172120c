//! Intermediate state carried between detection stages.

use crate::config::PeakDirection;
use crate::data::PeakRecord;
use ndarray::Array1;

/// Baseline subtracted from the raw values.
#[derive(Clone, Debug, PartialEq)]
pub enum Baseline {
    /// One level for every sample.
    Scalar(f64),
    /// One level per sample (rolling mean).
    PerIndex(Array1<f64>),
}

impl Baseline {
    /// Baseline level at `index`.
    #[inline]
    pub fn at(&self, index: usize) -> f64 {
        match self {
            Baseline::Scalar(v) => *v,
            Baseline::PerIndex(values) => values.get(index).copied().unwrap_or(f64::NAN),
        }
    }

    /// Expand to one value per sample.
    pub fn to_array(&self, len: usize) -> Array1<f64> {
        match self {
            Baseline::Scalar(v) => Array1::from_elem(len, *v),
            Baseline::PerIndex(values) => values.clone(),
        }
    }

    /// The scalar level, if the baseline is uniform.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Baseline::Scalar(v) => Some(*v),
            Baseline::PerIndex(_) => None,
        }
    }
}

/// Everything one detection run produced on its way to the result table.
///
/// Indices stored here are 0-based positions in the input series.
#[derive(Clone, Debug)]
pub struct DetectionTrace {
    /// Series identifier this trace belongs to.
    pub series_id: String,

    /// Peak direction; the adjusted series is already sign-flipped for it.
    pub direction: PeakDirection,

    /// Baseline level, scalar or per sample.
    pub baseline: Baseline,

    /// `(value - baseline) * sign` for every sample.
    pub adjusted: Array1<f64>,

    /// Samples that take part in scanning and thresholding.
    pub eligible: Vec<bool>,

    /// Local maxima found by the scanner.
    pub candidates: Vec<usize>,

    /// Reference amplitude `R`.
    pub reference: Option<f64>,

    /// Cutoff `C` in adjusted units.
    pub cutoff: Option<f64>,

    /// Candidates that cleared the cutoff.
    pub retained: Vec<usize>,

    /// Rows produced by the assembler.
    pub records: Vec<PeakRecord>,
}

impl DetectionTrace {
    pub fn new(series_id: impl Into<String>, direction: PeakDirection) -> Self {
        Self {
            series_id: series_id.into(),
            direction,
            baseline: Baseline::Scalar(0.0),
            adjusted: Array1::zeros(0),
            eligible: Vec::new(),
            candidates: Vec::new(),
            reference: None,
            cutoff: None,
            retained: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Number of eligible samples.
    pub fn eligible_count(&self) -> usize {
        self.eligible.iter().filter(|&&e| e).count()
    }

    /// Adjusted values at eligible positions, in series order.
    pub fn eligible_values(&self) -> Vec<f64> {
        self.adjusted
            .iter()
            .zip(&self.eligible)
            .filter_map(|(&v, &e)| e.then_some(v))
            .collect()
    }

    /// Cutoff line mapped back to the original value scale at `index`.
    pub fn cutoff_level(&self, index: usize) -> Option<f64> {
        self.cutoff
            .map(|c| self.baseline.at(index) + self.direction.sign() * c)
    }
}
