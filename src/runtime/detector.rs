//! Single-series detection driver.

use crate::config::{DetectConfig, ValidatedConfig};
use crate::data::{DetectionTrace, InputSeries, PeakTable};
use crate::error::DetectError;
use crate::plot;
use crate::stage::{StageId, StageRegistry};
use log::debug;
use std::sync::Arc;

/// Table plus the intermediate results that produced it.
#[derive(Clone, Debug)]
pub struct Detection {
    pub table: PeakTable,
    pub trace: DetectionTrace,
}

/// Runs a series through the registered stages.
///
/// A detector holds no per-run state, so one instance can serve any number
/// of series, including from several threads.
pub struct Detector {
    config: ValidatedConfig,
    registry: Arc<StageRegistry>,
}

impl Detector {
    /// Validate `config` and build the default stage set.
    pub fn new(config: &DetectConfig) -> Result<Self, DetectError> {
        let config = config.validate()?;
        let registry = Arc::new(StageRegistry::from_config(&config));
        Ok(Self { config, registry })
    }

    /// Use a custom registry, e.g. with a replaced stage.
    pub fn with_registry(config: ValidatedConfig, registry: StageRegistry) -> Self {
        Self {
            config,
            registry: Arc::new(registry),
        }
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Detect peaks and return the table only.
    pub fn detect(&self, series: &InputSeries) -> Result<PeakTable, DetectError> {
        self.detect_with_trace(series).map(|d| d.table)
    }

    /// Detect peaks and keep the trace for inspection or plotting.
    pub fn detect_with_trace(&self, series: &InputSeries) -> Result<Detection, DetectError> {
        let detection = self.run_stages(series)?;

        if self.config.emit_plot {
            plot::render_best_effort(
                series,
                &detection.trace,
                &detection.table,
                &self.config.plot_dir,
            );
        }

        Ok(detection)
    }

    fn run_stages(&self, series: &InputSeries) -> Result<Detection, DetectError> {
        let mut trace = DetectionTrace::new(series.id.clone(), self.config.direction);
        let mut next = Some(StageId::Preprocess);

        while let Some(stage_id) = next {
            let stage = self
                .registry
                .get(stage_id)
                .ok_or(DetectError::StageMissing { stage: stage_id })?;
            debug!("[{}] running stage {}", series.id, stage.name());

            let result = stage.process(series, trace)?;
            trace = result.trace;
            next = result.next;
        }

        let table = PeakTable::new(std::mem::take(&mut trace.records));
        Ok(Detection { table, trace })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BaselineMode, PeakDirection};
    use crate::data::PeakRecord;

    fn spike_config() -> DetectConfig {
        DetectConfig {
            local_max_span: 5,
            threshold_fraction: 0.5,
            baseline: BaselineMode::Fixed(0.0),
            ..Default::default()
        }
    }

    fn one_hz(id: &str, values: Vec<f64>) -> InputSeries {
        InputSeries::from_sample_rate(id, 1.0, values).unwrap()
    }

    fn gait(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64 / 25.0;
                (2.0 * std::f64::consts::PI * 1.8 * t).sin() + 0.3 * (7.1 * t).cos()
            })
            .collect()
    }

    #[test]
    fn test_constant_series_has_no_valid_peaks() {
        let detector = Detector::new(&spike_config()).unwrap();
        let result = detector.detect(&one_hz("flat", vec![0.0; 50]));

        assert_eq!(
            result.unwrap_err(),
            DetectError::NoValidPeaks { reference: 0.0 }
        );

        let detector = Detector::new(&DetectConfig::default()).unwrap();
        assert!(matches!(
            detector.detect(&one_hz("flat", vec![0.0; 50])),
            Err(DetectError::NoValidPeaks { .. })
        ));
    }

    #[test]
    fn test_single_spike() {
        let mut values = vec![0.0; 50];
        values[20] = 10.0;

        let table = Detector::new(&spike_config())
            .unwrap()
            .detect(&one_hz("spike", values))
            .unwrap();

        assert_eq!(
            table.records(),
            &[PeakRecord {
                timestamp: 20.0,
                index: 21,
                peak_amplitude: 10.0,
                peak_period: None,
                marked_event: 1.0,
            }]
        );
    }

    #[test]
    fn test_two_spikes_period() {
        let mut values = vec![0.0; 600];
        values[100] = 10.0;
        values[500] = 10.0;

        let table = Detector::new(&spike_config())
            .unwrap()
            .detect(&one_hz("two", values))
            .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.indices(), vec![101, 501]);
        assert_eq!(table.records()[0].peak_period, None);
        assert_eq!(table.records()[1].peak_period, Some(400.0));
        assert_eq!(table.mean_period(), Some(400.0));
    }

    #[test]
    fn test_negative_direction_mirrors_positive() {
        let mut values = vec![0.0; 50];
        values[20] = 10.0;
        let positive = Detector::new(&spike_config())
            .unwrap()
            .detect(&one_hz("pos", values.clone()))
            .unwrap();

        let negated: Vec<f64> = values.iter().map(|v| -v).collect();
        let negative = Detector::new(&DetectConfig {
            direction: PeakDirection::Negative,
            ..spike_config()
        })
        .unwrap()
        .detect(&one_hz("neg", negated))
        .unwrap();

        assert_eq!(negative.len(), positive.len());
        for (n, p) in negative.iter().zip(positive.iter()) {
            assert_eq!(n.index, p.index);
            assert_eq!(n.timestamp, p.timestamp);
            assert_eq!(n.peak_period, p.peak_period);
            assert_eq!(n.peak_amplitude, -10.0);
        }
    }

    #[test]
    fn test_even_span_matches_next_odd() {
        let series = one_hz("gait", gait(500));
        let even = Detector::new(&DetectConfig {
            local_max_span: 6,
            threshold_fraction: 0.5,
            ..Default::default()
        })
        .unwrap();
        let odd = Detector::new(&DetectConfig {
            local_max_span: 7,
            threshold_fraction: 0.5,
            ..Default::default()
        })
        .unwrap();

        assert!(even.config().span.was_coerced());
        assert_eq!(even.detect(&series).unwrap(), odd.detect(&series).unwrap());
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let series = one_hz("gait", gait(400));
        let detector = Detector::new(&DetectConfig {
            threshold_fraction: 0.3,
            baseline: BaselineMode::RollingMean { window: 50 },
            ..Default::default()
        })
        .unwrap();

        let first = detector.detect(&series).unwrap();
        let second = detector.detect(&series).unwrap();
        assert_eq!(first, second);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.peak_amplitude.to_bits(), b.peak_amplitude.to_bits());
        }
    }

    #[test]
    fn test_count_bounds_and_ordering() {
        let series = one_hz("gait", gait(1000));
        let config = DetectConfig {
            local_max_span: 9,
            threshold_fraction: 0.4,
            baseline: BaselineMode::Mean,
            ..Default::default()
        };
        let detection = Detector::new(&config)
            .unwrap()
            .detect_with_trace(&series)
            .unwrap();

        let n = series.len();
        assert!(!detection.table.is_empty());
        assert!(detection.table.len() <= detection.trace.candidates.len());
        assert!(detection.trace.candidates.len() <= n - (9 - 1));
        assert!(detection
            .table
            .indices()
            .windows(2)
            .all(|w| w[0] < w[1]));
        assert!(detection.table.periods().iter().all(|&p| p >= 0.0));
    }

    #[test]
    fn test_masked_samples_never_reported_or_referenced() {
        let mut values = vec![0.0; 60];
        values[10] = 5.0;
        values[30] = 50.0;
        values[45] = 4.0;
        let mut marked = vec![1.0; 60];
        for m in marked.iter_mut().take(35).skip(25) {
            *m = 0.0;
        }
        let series = InputSeries::with_marked_events(
            "masked",
            (0..60).map(|i| i as f64).collect(),
            values,
            marked,
        )
        .unwrap();

        let detection = Detector::new(&spike_config())
            .unwrap()
            .detect_with_trace(&series)
            .unwrap();

        assert_eq!(detection.trace.reference, Some(5.0));
        assert_eq!(detection.trace.cutoff, Some(2.5));
        assert_eq!(detection.table.indices(), vec![11, 46]);
        assert_eq!(detection.table.records()[1].peak_period, Some(35.0));
    }

    #[test]
    fn test_masked_values_do_not_move_median_baseline() {
        let mut values = vec![1.0; 40];
        values[10] = 6.0;
        let mut marked = vec![1.0; 40];
        for i in 30..40 {
            values[i] = 1000.0;
            marked[i] = 0.0;
        }
        let series = InputSeries::with_marked_events(
            "rest",
            (0..40).map(|i| i as f64).collect(),
            values,
            marked,
        )
        .unwrap();

        let detection = Detector::new(&DetectConfig {
            threshold_fraction: 0.5,
            ..Default::default()
        })
        .unwrap()
        .detect_with_trace(&series)
        .unwrap();

        assert_eq!(detection.trace.baseline.as_scalar(), Some(1.0));
        assert_eq!(detection.table.indices(), vec![11]);
    }

    #[test]
    fn test_masked_values_do_not_move_rolling_baseline() {
        let detect = |fill: f64| {
            let values: Vec<f64> = (0..200)
                .map(|i| {
                    if (90..110).contains(&i) {
                        fill
                    } else {
                        (2.0 * std::f64::consts::PI * i as f64 / 12.5).sin()
                    }
                })
                .collect();
            let marked = (0..200)
                .map(|i| if (90..110).contains(&i) { 0.0 } else { 1.0 })
                .collect();
            let series = InputSeries::with_marked_events(
                "rolling",
                (0..200).map(|i| i as f64).collect(),
                values,
                marked,
            )
            .unwrap();

            Detector::new(&DetectConfig {
                threshold_fraction: 0.5,
                baseline: BaselineMode::RollingMean { window: 50 },
                ..Default::default()
            })
            .unwrap()
            .detect_with_trace(&series)
            .unwrap()
        };

        let low = detect(0.0);
        let high = detect(1000.0);

        assert_eq!(low.trace.baseline, high.trace.baseline);
        assert_eq!(low.trace.reference, high.trace.reference);
        assert_eq!(low.trace.cutoff, high.trace.cutoff);
        assert_eq!(low.table, high.table);
        assert!(!low.table.is_empty());
        assert!(low.table.indices().iter().all(|&i| !(91..=110).contains(&i)));
    }

    #[test]
    fn test_empty_table_is_not_an_error() {
        let mut values = vec![0.0; 30];
        values[1] = 10.0;
        values[15] = 3.0;

        let table = Detector::new(&spike_config())
            .unwrap()
            .detect(&one_hz("edge", values))
            .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_series_shorter_than_span() {
        let result = Detector::new(&spike_config())
            .unwrap()
            .detect(&one_hz("short", vec![0.0, 1.0, 0.0]));
        assert!(matches!(
            result,
            Err(DetectError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_missing_stage() {
        let config = spike_config().validate().unwrap();
        let detector = Detector::with_registry(config, StageRegistry::new());

        let result = detector.detect(&one_hz("x", vec![0.0; 10]));
        assert_eq!(
            result.unwrap_err(),
            DetectError::StageMissing {
                stage: StageId::Preprocess
            }
        );
    }

    #[test]
    fn test_plot_failure_does_not_change_table() {
        let mut values = vec![0.0; 50];
        values[20] = 10.0;
        let series = one_hz("plotted", values);

        let quiet = Detector::new(&spike_config()).unwrap().detect(&series).unwrap();

        let blocker = std::env::temp_dir().join("accpeaks_plot_blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let plotted = Detector::new(&DetectConfig {
            emit_plot: true,
            plot_dir: blocker.join("plots"),
            ..spike_config()
        })
        .unwrap()
        .detect(&series)
        .unwrap();

        assert_eq!(quiet, plotted);
    }
}
