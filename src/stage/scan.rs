//! Scan stage: local maxima within a centered window.

use super::traits::{Stage, StageId, StageResult};
use crate::config::{LocalMaxSpan, ValidatedConfig};
use crate::data::{DetectionTrace, InputSeries};
use crate::error::DetectError;
use log::debug;
use std::collections::VecDeque;

/// Stage flagging samples that are the maximum of their window.
pub struct ScanStage {
    span: LocalMaxSpan,
}

impl ScanStage {
    pub fn new(config: &ValidatedConfig) -> Self {
        Self { span: config.span }
    }
}

impl Stage for ScanStage {
    fn id(&self) -> StageId {
        StageId::Scan
    }

    fn process(
        &self,
        _series: &InputSeries,
        mut trace: DetectionTrace,
    ) -> Result<StageResult, DetectError> {
        let adjusted = trace.adjusted.as_slice().ok_or_else(|| {
            DetectError::invalid("adjusted series is not contiguous")
        })?;
        let candidates = local_maxima(adjusted, &trace.eligible, self.span);

        debug!(
            "[{}] {} local maxima with span {}",
            trace.series_id,
            candidates.len(),
            self.span.get()
        );

        trace.candidates = candidates;
        Ok(StageResult::then(trace, StageId::Threshold))
    }
}

/// Indices `i` in `[k, n - 1 - k]` that are eligible and not exceeded by any
/// eligible sample in `[i - k, i + k]`.
///
/// Ineligible samples never win a window and never block one. Equal maxima
/// are all reported. Runs in O(n) with a monotonic deque.
pub fn local_maxima(adjusted: &[f64], eligible: &[bool], span: LocalMaxSpan) -> Vec<usize> {
    let n = adjusted.len().min(eligible.len());
    let width = span.get();
    let k = span.half_width();
    if n < width {
        return Vec::new();
    }

    let key = |j: usize| {
        if eligible[j] {
            adjusted[j]
        } else {
            f64::NEG_INFINITY
        }
    };

    // Front holds the index of the current window maximum.
    let mut window: VecDeque<usize> = VecDeque::with_capacity(width);
    let mut out = Vec::new();

    for j in 0..n {
        while let Some(&back) = window.back() {
            if key(back) <= key(j) {
                window.pop_back();
            } else {
                break;
            }
        }
        window.push_back(j);

        if j + 1 < width {
            continue;
        }
        let start = j + 1 - width;
        let centre = start + k;
        while window.front().is_some_and(|&front| front < start) {
            window.pop_front();
        }

        if let Some(&front) = window.front() {
            if eligible[centre] && adjusted[centre] >= key(front) {
                out.push(centre);
            }
        }
    }

    out
}
