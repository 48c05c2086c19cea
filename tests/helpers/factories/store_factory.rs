use std::sync::Arc;

use crate::engine::store::{MemoryStore, SeedData};
use crate::engine::types::{Experiment, Namespace, Run};

/// Builds a `MemoryStore` holding the `default` namespace (id 1) with one
/// experiment "Default" (id 1), plus whatever is added.
pub struct StoreFactory {
    seed: SeedData,
}

impl StoreFactory {
    pub fn new() -> Self {
        Self {
            seed: SeedData {
                namespaces: vec![Namespace {
                    id: 1,
                    code: "default".to_string(),
                    description: "Default namespace".to_string(),
                }],
                experiments: vec![Experiment {
                    id: 1,
                    name: "Default".to_string(),
                    namespace_id: 1,
                }],
                runs: Vec::new(),
            },
        }
    }

    pub fn namespace(mut self, id: i64, code: &str) -> Self {
        self.seed.namespaces.push(Namespace {
            id,
            code: code.to_string(),
            description: String::new(),
        });
        self
    }

    pub fn experiment(mut self, id: i64, name: &str, namespace_id: i64) -> Self {
        self.seed.experiments.push(Experiment {
            id,
            name: name.to_string(),
            namespace_id,
        });
        self
    }

    pub fn run(mut self, run: Run) -> Self {
        self.seed.runs.push(run);
        self
    }

    pub fn runs(mut self, runs: impl IntoIterator<Item = Run>) -> Self {
        self.seed.runs.extend(runs);
        self
    }

    pub fn create(self) -> Arc<MemoryStore> {
        Arc::new(MemoryStore::from_seed(self.seed).expect("seed store"))
    }
}
