//! Threshold stage: keep candidates above a fraction of the reference amplitude.

use super::traits::{Stage, StageId, StageResult};
use crate::config::{ThresholdReference, ValidatedConfig};
use crate::data::{find_max, quantile, DetectionTrace, InputSeries};
use crate::error::DetectError;
use log::debug;

/// Stage filtering candidates by amplitude.
pub struct ThresholdStage {
    /// Fraction of the reference amplitude, in (0, 1].
    fraction: f64,
    reference: ThresholdReference,
}

impl ThresholdStage {
    pub fn new(config: &ValidatedConfig) -> Self {
        Self {
            fraction: config.threshold_fraction,
            reference: config.reference,
        }
    }

    /// Reference amplitude over the eligible adjusted values.
    fn reference_amplitude(&self, eligible_values: &[f64]) -> Option<f64> {
        match self.reference {
            ThresholdReference::Maximum => find_max(eligible_values).map(|(v, _)| v),
            ThresholdReference::Quantile(q) => quantile(eligible_values, q),
        }
    }
}

impl Stage for ThresholdStage {
    fn id(&self) -> StageId {
        StageId::Threshold
    }

    fn process(
        &self,
        _series: &InputSeries,
        mut trace: DetectionTrace,
    ) -> Result<StageResult, DetectError> {
        let reference = self
            .reference_amplitude(&trace.eligible_values())
            .unwrap_or(f64::NAN);
        if !(reference > 0.0 && reference.is_finite()) {
            return Err(DetectError::NoValidPeaks { reference });
        }

        let cutoff = self.fraction * reference;
        let retained: Vec<usize> = trace
            .candidates
            .iter()
            .copied()
            .filter(|&i| trace.adjusted[i] > cutoff)
            .collect();

        debug!(
            "[{}] reference {:.4}, cutoff {:.4}, {} of {} candidates retained",
            trace.series_id,
            reference,
            cutoff,
            retained.len(),
            trace.candidates.len()
        );

        trace.reference = Some(reference);
        trace.cutoff = Some(cutoff);
        trace.retained = retained;
        Ok(StageResult::then(trace, StageId::Assemble))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DetectConfig, PeakDirection};
    use ndarray::Array1;

    fn stage(fraction: f64, outlier_quantile: Option<f64>) -> ThresholdStage {
        let config = DetectConfig {
            threshold_fraction: fraction,
            outlier_quantile,
            ..Default::default()
        }
        .validate()
        .unwrap();
        ThresholdStage::new(&config)
    }

    fn trace(adjusted: Vec<f64>, eligible: Vec<bool>, candidates: Vec<usize>) -> DetectionTrace {
        let mut trace = DetectionTrace::new("test", PeakDirection::Positive);
        trace.adjusted = Array1::from(adjusted);
        trace.eligible = eligible;
        trace.candidates = candidates;
        trace
    }

    fn series(n: usize) -> InputSeries {
        InputSeries::new("test", (0..n).map(|i| i as f64).collect(), vec![0.0; n]).unwrap()
    }

    #[test]
    fn test_cutoff_from_maximum() {
        let t = trace(vec![0.0, 10.0, 0.0, 4.0, 0.0, 6.0], vec![true; 6], vec![1, 3, 5]);
        let result = stage(0.5, None).process(&series(6), t).unwrap();

        assert_eq!(result.trace.reference, Some(10.0));
        assert_eq!(result.trace.cutoff, Some(5.0));
        assert_eq!(result.trace.retained, vec![1, 5]);
        assert_eq!(result.next, Some(StageId::Assemble));
    }

    #[test]
    fn test_cutoff_is_strict() {
        let t = trace(vec![0.0, 10.0, 0.0, 5.0, 0.0], vec![true; 5], vec![1, 3]);
        let result = stage(0.5, None).process(&series(5), t).unwrap();
        assert_eq!(result.trace.retained, vec![1]);
    }

    #[test]
    fn test_masked_values_do_not_set_reference() {
        let t = trace(
            vec![0.0, 4.0, 0.0, 100.0, 0.0],
            vec![true, true, true, false, true],
            vec![1],
        );
        let result = stage(0.5, None).process(&series(5), t).unwrap();
        assert_eq!(result.trace.reference, Some(4.0));
        assert_eq!(result.trace.retained, vec![1]);
    }

    #[test]
    fn test_outlier_quantile_reference() {
        let adjusted: Vec<f64> = (1..=5).map(|v| v as f64).collect();
        let t = trace(adjusted, vec![true; 5], vec![4]);
        let result = stage(1.0, Some(0.5)).process(&series(5), t).unwrap();

        assert_eq!(result.trace.reference, Some(3.0));
        assert_eq!(result.trace.retained, vec![4]);
    }

    #[test]
    fn test_non_positive_reference_fails() {
        let t = trace(vec![0.0; 5], vec![true; 5], vec![1, 2, 3]);
        let result = stage(0.5, None).process(&series(5), t);
        assert_eq!(
            result.unwrap_err(),
            DetectError::NoValidPeaks { reference: 0.0 }
        );
    }
}
