use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::{AttributeStore, NamespaceStore, RunQuery, RunStore, SeedData};
use crate::engine::errors::StoreError;
use crate::engine::types::{AttributeKind, DEFAULT_NAMESPACE_CODE, Experiment, Namespace, Run};

pub const MEMORY_DIALECT: &str = "memory";

#[derive(Default)]
struct Tables {
    namespaces: HashMap<i64, Namespace>,
    experiments: HashMap<i64, Experiment>,
    /// Runs keyed by `row_num`, so range scans give the pagination order.
    runs: BTreeMap<i64, Run>,
    row_nums: HashMap<String, i64>,
}

/// In-process store holding runs, experiments and namespaces.
///
/// Every read takes the lock once and copies out what it needs; nothing is
/// borrowed across an await.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    pub fn from_seed(seed: SeedData) -> Result<Self, StoreError> {
        let store = Self::new();
        for namespace in seed.namespaces {
            store.insert_namespace(namespace)?;
        }
        store.ensure_default_namespace();
        for experiment in seed.experiments {
            store.insert_experiment(experiment)?;
        }
        for run in seed.runs {
            store.insert_run(run)?;
        }
        Ok(store)
    }

    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let seed = SeedData::load(path)?;
        let store = Self::from_seed(seed)?;
        info!(
            target: "run_export::store",
            path = %path.display(),
            runs = store.tables.read().runs.len(),
            "Loaded seed data"
        );
        Ok(store)
    }

    /// Creates the `default` namespace if it is missing and returns it.
    pub fn ensure_default_namespace(&self) -> Namespace {
        let mut tables = self.tables.write();
        if let Some(ns) = tables
            .namespaces
            .values()
            .find(|ns| ns.code == DEFAULT_NAMESPACE_CODE)
        {
            return ns.clone();
        }
        let id = tables.namespaces.keys().max().map_or(1, |max| max + 1);
        let ns = Namespace {
            id,
            code: DEFAULT_NAMESPACE_CODE.to_string(),
            description: "Default namespace".to_string(),
        };
        tables.namespaces.insert(id, ns.clone());
        ns
    }

    pub fn insert_namespace(&self, namespace: Namespace) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if tables.namespaces.contains_key(&namespace.id)
            || tables.namespaces.values().any(|ns| ns.code == namespace.code)
        {
            return Err(StoreError::Duplicate(format!("namespace {}", namespace.code)));
        }
        tables.namespaces.insert(namespace.id, namespace);
        Ok(())
    }

    pub fn insert_experiment(&self, experiment: Experiment) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if !tables.namespaces.contains_key(&experiment.namespace_id) {
            return Err(StoreError::NotFound(format!(
                "namespace {} of experiment {}",
                experiment.namespace_id, experiment.name
            )));
        }
        if tables.experiments.contains_key(&experiment.id) {
            return Err(StoreError::Duplicate(format!("experiment {}", experiment.id)));
        }
        tables.experiments.insert(experiment.id, experiment);
        Ok(())
    }

    pub fn insert_run(&self, mut run: Run) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if !tables.experiments.contains_key(&run.experiment_id) {
            return Err(StoreError::NotFound(format!(
                "experiment {} of run {}",
                run.experiment_id, run.id
            )));
        }
        if tables.row_nums.contains_key(&run.id) {
            return Err(StoreError::Duplicate(format!("run {}", run.id)));
        }
        if tables.runs.contains_key(&run.row_num) {
            return Err(StoreError::Duplicate(format!("row_num {}", run.row_num)));
        }
        run.experiment = None;
        for metric in &mut run.latest_metrics {
            if metric.run_uuid.is_empty() {
                metric.run_uuid = run.id.clone();
            }
        }
        tables.row_nums.insert(run.id.clone(), run.row_num);
        tables.runs.insert(run.row_num, run);
        Ok(())
    }
}

#[async_trait::async_trait]
impl RunStore for MemoryStore {
    fn dialect(&self) -> &str {
        MEMORY_DIALECT
    }

    async fn count_all(&self) -> Result<u64, StoreError> {
        Ok(self.tables.read().runs.len() as u64)
    }

    async fn find_row_num(&self, namespace_id: i64, run_id: &str) -> Result<i64, StoreError> {
        let tables = self.tables.read();
        tables
            .row_nums
            .get(run_id)
            .and_then(|n| tables.runs.get(n))
            .filter(|run| {
                tables
                    .experiments
                    .get(&run.experiment_id)
                    .is_some_and(|e| e.namespace_id == namespace_id)
            })
            .map(|run| run.row_num)
            .ok_or_else(|| {
                StoreError::NotFound(format!("run {} in namespace {}", run_id, namespace_id))
            })
    }

    async fn find_runs(&self, query: &RunQuery) -> Result<Vec<Run>, StoreError> {
        if query.predicate.dialect() != MEMORY_DIALECT {
            return Err(StoreError::DialectMismatch {
                expected: MEMORY_DIALECT.to_string(),
                found: query.predicate.dialect().to_string(),
            });
        }

        let tables = self.tables.read();
        let range = match query.before_row_num {
            Some(bound) => tables.runs.range(..bound),
            None => tables.runs.range(..),
        };
        let limit = query.limit.unwrap_or(usize::MAX);

        let mut out = Vec::new();
        for (_, run) in range.rev() {
            if out.len() >= limit {
                break;
            }
            let Some(experiment) = tables.experiments.get(&run.experiment_id) else {
                continue;
            };
            if experiment.namespace_id != query.namespace_id {
                continue;
            }

            let mut joined = run.clone();
            joined.experiment = Some(experiment.clone());
            if !query.predicate.matches(&joined) {
                continue;
            }

            if !query.preload.params_and_tags {
                joined.params.clear();
                joined.tags.clear();
            }
            if !query.preload.latest_metrics {
                joined.latest_metrics.clear();
            }
            out.push(joined);
        }

        debug!(
            target: "run_export::store",
            namespace_id = query.namespace_id,
            before = ?query.before_row_num,
            found = out.len(),
            "Fetched runs"
        );
        Ok(out)
    }
}

#[async_trait::async_trait]
impl AttributeStore for MemoryStore {
    async fn distinct_keys(
        &self,
        kind: AttributeKind,
        run_ids: &[String],
    ) -> Result<Vec<String>, StoreError> {
        let wanted: HashSet<&str> = run_ids.iter().map(String::as_str).collect();
        let tables = self.tables.read();

        let mut keys = BTreeSet::new();
        for id in wanted {
            let Some(run) = tables.row_nums.get(id).and_then(|n| tables.runs.get(n)) else {
                continue;
            };
            for key in kind.keys_of(run) {
                if !keys.contains(key) {
                    keys.insert(key.to_string());
                }
            }
        }
        Ok(keys.into_iter().collect())
    }
}

#[async_trait::async_trait]
impl NamespaceStore for MemoryStore {
    async fn get_by_code(&self, code: &str) -> Result<Option<Namespace>, StoreError> {
        Ok(self
            .tables
            .read()
            .namespaces
            .values()
            .find(|ns| ns.code == code)
            .cloned())
    }
}
