//! Stage registry for the detection pipeline.

use super::traits::{Stage, StageId};
use super::{AssembleStage, PreprocessStage, ScanStage, ThresholdStage};
use crate::config::ValidatedConfig;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of available stages.
pub struct StageRegistry {
    stages: HashMap<StageId, Arc<dyn Stage>>,
}

impl StageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            stages: HashMap::new(),
        }
    }

    /// Create a registry with all four stages built from `config`.
    pub fn from_config(config: &ValidatedConfig) -> Self {
        let mut registry = Self::new();
        registry.register(PreprocessStage::new(config));
        registry.register(ScanStage::new(config));
        registry.register(ThresholdStage::new(config));
        registry.register(AssembleStage);
        registry
    }

    /// Register a stage, replacing any stage with the same id.
    pub fn register<S: Stage + 'static>(&mut self, stage: S) {
        self.stages.insert(stage.id(), Arc::new(stage));
    }

    /// Get a stage by ID.
    pub fn get(&self, id: StageId) -> Option<Arc<dyn Stage>> {
        self.stages.get(&id).cloned()
    }

    /// Check if a stage is registered.
    pub fn contains(&self, id: StageId) -> bool {
        self.stages.contains_key(&id)
    }

    /// Get all registered stage IDs.
    pub fn stage_ids(&self) -> Vec<StageId> {
        self.stages.keys().copied().collect()
    }
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectConfig;

    #[test]
    fn test_registry_from_config() {
        let config = DetectConfig::default().validate().unwrap();
        let registry = StageRegistry::from_config(&config);

        assert!(registry.contains(StageId::Preprocess));
        assert!(registry.contains(StageId::Scan));
        assert!(registry.contains(StageId::Threshold));
        assert!(registry.contains(StageId::Assemble));
        assert_eq!(registry.stage_ids().len(), 4);
    }

    #[test]
    fn test_registry_get() {
        let config = DetectConfig::default().validate().unwrap();
        let registry = StageRegistry::from_config(&config);

        let stage = registry.get(StageId::Scan).unwrap();
        assert_eq!(stage.id(), StageId::Scan);
        assert_eq!(stage.name(), "scan");
        assert!(StageRegistry::new().get(StageId::Scan).is_none());
    }
}
