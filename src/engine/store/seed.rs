use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::errors::StoreError;
use crate::engine::types::{Experiment, Namespace, Run};

/// JSON document used to populate a `MemoryStore` at startup.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub namespaces: Vec<Namespace>,
    #[serde(default)]
    pub experiments: Vec<Experiment>,
    #[serde(default)]
    pub runs: Vec<Run>,
}

impl SeedData {
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read(path)?;
        let seed: SeedData = serde_json::from_slice(&raw)?;
        seed.validate()?;
        Ok(seed)
    }

    fn validate(&self) -> Result<(), StoreError> {
        for run in &self.runs {
            if run.id.is_empty() {
                return Err(StoreError::InvalidSeed(format!(
                    "run at row_num {} has an empty id",
                    run.row_num
                )));
            }
            let mut keys = std::collections::HashSet::new();
            if let Some(dup) = run
                .latest_metrics
                .iter()
                .find(|m| !keys.insert(m.key.as_str()))
            {
                return Err(StoreError::InvalidSeed(format!(
                    "run {} has two latest values for metric {}",
                    run.id, dup.key
                )));
            }
        }
        Ok(())
    }
}
