//! Stage trait definitions.

use crate::data::{DetectionTrace, InputSeries};
use crate::error::DetectError;

/// Identifier for a stage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub enum StageId {
    /// Baseline, masking and sign flip.
    Preprocess,
    /// Local maximum window scan.
    Scan,
    /// Cutoff against the reference amplitude.
    Threshold,
    /// Build the peak table.
    Assemble,
}

impl StageId {
    /// Get the string name of this stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Preprocess => "preprocess",
            StageId::Scan => "scan",
            StageId::Threshold => "threshold",
            StageId::Assemble => "assemble",
        }
    }
}

/// Result of executing a stage.
#[derive(Debug)]
pub struct StageResult {
    /// Updated trace.
    pub trace: DetectionTrace,
    /// Stage to run next, `None` when the pipeline is finished.
    pub next: Option<StageId>,
}

impl StageResult {
    /// Create a result with no follow-up stage.
    pub fn terminal(trace: DetectionTrace) -> Self {
        Self { trace, next: None }
    }

    /// Create a result handing over to `next`.
    pub fn then(trace: DetectionTrace, next: StageId) -> Self {
        Self {
            trace,
            next: Some(next),
        }
    }
}

/// Trait for detection stages.
pub trait Stage: Send + Sync {
    /// Get the stage identifier.
    fn id(&self) -> StageId;

    /// Advance `trace` for `series` through this stage.
    fn process(
        &self,
        series: &InputSeries,
        trace: DetectionTrace,
    ) -> Result<StageResult, DetectError>;

    /// Get the stage name.
    fn name(&self) -> &'static str {
        self.id().name()
    }
}
