//! Stage system for the detection pipeline.
//!
//! Stages run strictly forward: preprocess, scan, threshold, assemble.

pub mod assemble;
pub mod preprocess;
pub mod registry;
pub mod scan;
pub mod threshold;
pub mod traits;

pub use assemble::AssembleStage;
pub use preprocess::PreprocessStage;
pub use registry::StageRegistry;
pub use scan::{local_maxima, ScanStage};
pub use threshold::ThresholdStage;
pub use traits::{Stage, StageId, StageResult};
