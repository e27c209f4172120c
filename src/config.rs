//! Detection configuration and its validation.

use crate::error::DetectError;
use log::info;
use std::path::PathBuf;

/// Default local maximum span.
pub const DEFAULT_LOCAL_MAX_SPAN: usize = 5;
/// Default fraction of the reference amplitude used as cutoff.
pub const DEFAULT_THRESHOLD_FRACTION: f64 = 0.9;
/// Default rolling-mean baseline window, in samples.
pub const DEFAULT_ROLLING_WINDOW: usize = 100;

/// How the baseline level is computed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BaselineMode {
    /// Median of the eligible samples.
    #[default]
    Median,
    /// Mean of the eligible samples.
    Mean,
    /// Centered moving average over the whole series.
    RollingMean { window: usize },
    /// A fixed level.
    Fixed(f64),
}

impl BaselineMode {
    /// Rolling mean with the default window.
    pub fn rolling_mean() -> Self {
        BaselineMode::RollingMean {
            window: DEFAULT_ROLLING_WINDOW,
        }
    }
}

/// Which extrema to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeakDirection {
    #[default]
    Positive,
    Negative,
}

impl PeakDirection {
    /// Multiplier applied to baseline-adjusted values.
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            PeakDirection::Positive => 1.0,
            PeakDirection::Negative => -1.0,
        }
    }
}

/// Reference amplitude the cutoff fraction is applied to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdReference {
    /// Largest eligible adjusted value.
    Maximum,
    /// Quantile of the eligible adjusted values (outlier mode).
    Quantile(f64),
}

/// Odd-width local maximum window.
///
/// Even requests are widened by one sample; the requested width is kept so
/// the coercion stays visible to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalMaxSpan {
    requested: usize,
    span: usize,
}

impl LocalMaxSpan {
    pub fn new(requested: usize) -> Self {
        let span = if requested % 2 == 0 {
            requested + 1
        } else {
            requested
        };
        Self { requested, span }
    }

    /// Effective (odd) window width.
    #[inline]
    pub fn get(&self) -> usize {
        self.span
    }

    /// Samples on each side of the window centre.
    #[inline]
    pub fn half_width(&self) -> usize {
        self.span / 2
    }

    #[inline]
    pub fn requested(&self) -> usize {
        self.requested
    }

    #[inline]
    pub fn was_coerced(&self) -> bool {
        self.requested != self.span
    }
}

/// User-facing detection options.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectConfig {
    /// Local maximum window width; forced odd.
    pub local_max_span: usize,
    /// Cutoff as a fraction of the reference amplitude, in (0, 1].
    pub threshold_fraction: f64,
    /// Baseline computation.
    pub baseline: BaselineMode,
    /// Quantile in (0, 1) used as reference amplitude; `None` uses the maximum.
    pub outlier_quantile: Option<f64>,
    /// Search for maxima or minima.
    pub direction: PeakDirection,
    /// Render a diagnostic plot after detection.
    pub emit_plot: bool,
    /// Directory receiving plots.
    pub plot_dir: PathBuf,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            local_max_span: DEFAULT_LOCAL_MAX_SPAN,
            threshold_fraction: DEFAULT_THRESHOLD_FRACTION,
            baseline: BaselineMode::default(),
            outlier_quantile: None,
            direction: PeakDirection::default(),
            emit_plot: false,
            plot_dir: PathBuf::from("target/plots"),
        }
    }
}

impl DetectConfig {
    /// Check ranges and normalize the span.
    ///
    /// Checks that depend on the series length happen in the preprocessor.
    pub fn validate(&self) -> Result<ValidatedConfig, DetectError> {
        let fraction = self.threshold_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(DetectError::invalid(format!(
                "threshold fraction {} must be in (0, 1]",
                fraction
            )));
        }

        let reference = match self.outlier_quantile {
            None => ThresholdReference::Maximum,
            Some(q) if q > 0.0 && q < 1.0 => ThresholdReference::Quantile(q),
            Some(q) => {
                return Err(DetectError::invalid(format!(
                    "outlier quantile {} must be in (0, 1)",
                    q
                )))
            }
        };

        match self.baseline {
            BaselineMode::RollingMean { window: 0 } => {
                return Err(DetectError::invalid("rolling mean window must be positive"));
            }
            BaselineMode::Fixed(v) if !v.is_finite() => {
                return Err(DetectError::invalid(format!(
                    "fixed baseline {} must be finite",
                    v
                )));
            }
            _ => {}
        }

        let span = LocalMaxSpan::new(self.local_max_span);
        if span.was_coerced() {
            info!(
                "local maximum span {} is even, using {}",
                span.requested(),
                span.get()
            );
        }

        Ok(ValidatedConfig {
            span,
            threshold_fraction: fraction,
            baseline: self.baseline,
            reference,
            direction: self.direction,
            emit_plot: self.emit_plot,
            plot_dir: self.plot_dir.clone(),
        })
    }
}

/// Configuration after range checks; immutable for the life of a detector.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub span: LocalMaxSpan,
    pub threshold_fraction: f64,
    pub baseline: BaselineMode,
    pub reference: ThresholdReference,
    pub direction: PeakDirection,
    pub emit_plot: bool,
    pub plot_dir: PathBuf,
}
