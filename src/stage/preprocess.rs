//! Preprocess stage: baseline, marked-event mask and sign flip.

use super::traits::{Stage, StageId, StageResult};
use crate::config::{BaselineMode, LocalMaxSpan, ValidatedConfig};
use crate::data::{mean, median, rolling_mean, Baseline, DetectionTrace, InputSeries};
use crate::error::DetectError;
use log::debug;
use ndarray::{Array1, Zip};

/// Stage computing the baseline and the adjusted series.
pub struct PreprocessStage {
    baseline: BaselineMode,
    span: LocalMaxSpan,
}

impl PreprocessStage {
    pub fn new(config: &ValidatedConfig) -> Self {
        Self {
            baseline: config.baseline,
            span: config.span,
        }
    }

    fn compute_baseline(&self, series: &InputSeries) -> Result<Baseline, DetectError> {
        let marked = || -> Vec<f64> {
            series
                .values
                .iter()
                .enumerate()
                .filter(|&(i, v)| series.is_marked(i) && v.is_finite())
                .map(|(_, &v)| v)
                .collect()
        };

        let baseline = match self.baseline {
            BaselineMode::Median => Baseline::Scalar(median(&marked()).ok_or_else(no_marked)?),
            BaselineMode::Mean => Baseline::Scalar(mean(&marked()).ok_or_else(no_marked)?),
            BaselineMode::RollingMean { window } => {
                if window > series.len() {
                    return Err(DetectError::invalid(format!(
                        "rolling mean window {} exceeds series length {}",
                        window,
                        series.len()
                    )));
                }
                // Masked samples stay out of every window.
                let unmasked: Vec<f64> = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| if series.is_marked(i) { v } else { f64::NAN })
                    .collect();
                Baseline::PerIndex(rolling_mean(&unmasked, window))
            }
            BaselineMode::Fixed(v) => Baseline::Scalar(v),
        };
        Ok(baseline)
    }
}

fn no_marked() -> DetectError {
    DetectError::invalid("no marked samples to compute a baseline from")
}

impl Stage for PreprocessStage {
    fn id(&self) -> StageId {
        StageId::Preprocess
    }

    fn process(
        &self,
        series: &InputSeries,
        mut trace: DetectionTrace,
    ) -> Result<StageResult, DetectError> {
        let baseline = self.compute_baseline(series)?;
        let sign = trace.direction.sign();

        let values = Array1::from(series.values.clone());
        let adjusted = (&values - &baseline.to_array(series.len())) * sign;

        let eligible: Vec<bool> = Zip::indexed(&adjusted)
            .map_collect(|i, v| series.is_marked(i) && v.is_finite())
            .to_vec();

        let eligible_count = eligible.iter().filter(|&&e| e).count();
        if eligible_count < self.span.get() {
            return Err(DetectError::invalid(format!(
                "{} eligible samples, fewer than the local maximum span {}",
                eligible_count,
                self.span.get()
            )));
        }

        debug!(
            "[{}] baseline {:?}, {} of {} samples eligible",
            trace.series_id,
            baseline.as_scalar(),
            eligible_count,
            series.len()
        );

        trace.baseline = baseline;
        trace.adjusted = adjusted;
        trace.eligible = eligible;

        Ok(StageResult::then(trace, StageId::Scan))
    }
}
