//! Assemble stage: turn retained indices into peak records.

use super::traits::{Stage, StageId, StageResult};
use crate::data::{DetectionTrace, InputSeries, PeakRecord};
use crate::error::DetectError;
use log::debug;

/// Stage producing the output rows.
#[derive(Debug, Default)]
pub struct AssembleStage;

impl Stage for AssembleStage {
    fn id(&self) -> StageId {
        StageId::Assemble
    }

    fn process(
        &self,
        series: &InputSeries,
        mut trace: DetectionTrace,
    ) -> Result<StageResult, DetectError> {
        trace.records = assemble_records(series, &trace.retained);
        debug!("[{}] {} peaks", trace.series_id, trace.records.len());
        Ok(StageResult::terminal(trace))
    }
}

/// Build records for ascending 0-based `retained` indices.
///
/// Amplitudes come from the raw values, so the sign flip of the adjusted
/// series never leaks into the output.
pub fn assemble_records(series: &InputSeries, retained: &[usize]) -> Vec<PeakRecord> {
    let mut previous: Option<f64> = None;

    retained
        .iter()
        .map(|&i| {
            let timestamp = series.timestamps[i];
            let record = PeakRecord {
                timestamp,
                index: i + 1,
                peak_amplitude: series.values[i],
                peak_period: previous.map(|t| timestamp - t),
                marked_event: series.marked_events[i],
            };
            previous = Some(timestamp);
            record
        })
        .collect()
}
