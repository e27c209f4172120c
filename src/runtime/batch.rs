//! Parallel detection over many independent series.

use super::detector::Detector;
use crate::config::DetectConfig;
use crate::data::{InputSeries, PeakTable};
use crate::error::DetectError;
use log::{debug, warn};
use rayon::prelude::*;
use rayon::ThreadPool;

/// Configuration for the batch runner.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of worker threads.
    pub worker_count: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            worker_count: num_cpus::get(),
        }
    }
}

/// Result for one series of a batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub series_id: String,
    pub result: Result<PeakTable, DetectError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs one detector over many series on a dedicated rayon pool.
///
/// Each series is still processed by a single sequential detection run.
pub struct BatchDetector {
    detector: Detector,
    pool: ThreadPool,
}

impl BatchDetector {
    pub fn new(config: &DetectConfig, batch: BatchConfig) -> Result<Self, DetectError> {
        let detector = Detector::new(config)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(batch.worker_count.max(1))
            .build()
            .map_err(|e| DetectError::WorkerPool {
                reason: e.to_string(),
            })?;
        Ok(Self { detector, pool })
    }

    pub fn detector(&self) -> &Detector {
        &self.detector
    }

    /// Detect peaks in every series; outcomes keep the input order.
    pub fn detect_all(&self, series: &[InputSeries]) -> Vec<BatchOutcome> {
        debug!(
            "batch of {} series on {} workers",
            series.len(),
            self.pool.current_num_threads()
        );

        self.pool.install(|| {
            series
                .par_iter()
                .map(|s| {
                    let result = self.detector.detect(s);
                    if let Err(err) = &result {
                        warn!("[{}] detection failed: {}", s.id, err);
                    }
                    BatchOutcome {
                        series_id: s.id.clone(),
                        result,
                    }
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaselineMode;

    fn spike_series(id: &str, at: usize) -> InputSeries {
        let mut values = vec![0.0; 40];
        values[at] = 8.0;
        InputSeries::from_sample_rate(id, 10.0, values).unwrap()
    }

    #[test]
    fn test_batch_keeps_order_and_errors() {
        let config = DetectConfig {
            threshold_fraction: 0.5,
            baseline: BaselineMode::Fixed(0.0),
            ..Default::default()
        };
        let batch = BatchDetector::new(&config, BatchConfig { worker_count: 2 }).unwrap();

        let inputs = vec![
            spike_series("a", 10),
            InputSeries::from_sample_rate("flat", 10.0, vec![0.0; 40]).unwrap(),
            spike_series("c", 30),
        ];
        let outcomes = batch.detect_all(&inputs);

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].series_id, "a");
        assert_eq!(outcomes[0].result.as_ref().unwrap().indices(), vec![11]);
        assert!(!outcomes[1].is_ok());
        assert_eq!(outcomes[2].result.as_ref().unwrap().records()[0].timestamp, 3.0);
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let config = DetectConfig {
            threshold_fraction: 0.5,
            baseline: BaselineMode::Fixed(0.0),
            ..Default::default()
        };
        let batch = BatchDetector::new(&config, BatchConfig::default()).unwrap();
        let inputs: Vec<_> = (5..35).map(|i| spike_series(&format!("s{}", i), i)).collect();

        for (outcome, series) in batch.detect_all(&inputs).iter().zip(&inputs) {
            let single = batch.detector().detect(series).unwrap();
            assert_eq!(outcome.result.as_ref().unwrap(), &single);
        }
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let config = DetectConfig {
            threshold_fraction: 2.0,
            ..Default::default()
        };
        assert!(BatchDetector::new(&config, BatchConfig::default()).is_err());
    }
}
