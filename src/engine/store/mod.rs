//! Storage collaborators consumed by the export pipeline.
//!
//! The pipeline only needs four reads: a total count, a cursor lookup, the
//! filtered page itself and the distinct attribute keys of that page.

mod memory;
mod seed;

pub use memory::{MEMORY_DIALECT, MemoryStore};
pub use seed::SeedData;

use crate::command::predicate::Predicate;
use crate::engine::errors::StoreError;
use crate::engine::types::{AttributeKind, Namespace, Run};

/// Nested collections to load alongside each run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preload {
    pub params_and_tags: bool,
    pub latest_metrics: bool,
}

/// A bounded, ordered, filtered fetch of runs.
///
/// Results are always ordered by `row_num` descending and restricted to runs
/// whose experiment belongs to `namespace_id`.
#[derive(Debug, Clone)]
pub struct RunQuery {
    pub namespace_id: i64,
    pub predicate: Predicate,
    /// Keep only runs with `row_num` strictly below this bound.
    pub before_row_num: Option<i64>,
    pub limit: Option<usize>,
    pub preload: Preload,
}

#[async_trait::async_trait]
pub trait RunStore: Send + Sync {
    /// Name of the predicate dialect this store evaluates.
    fn dialect(&self) -> &str;

    /// Counts every stored run, ignoring namespaces and filters.
    async fn count_all(&self) -> Result<u64, StoreError>;

    /// Ordering position of a run within `namespace_id`; `StoreError::NotFound`
    /// when it does not exist or belongs to another namespace.
    async fn find_row_num(&self, namespace_id: i64, run_id: &str) -> Result<i64, StoreError>;

    async fn find_runs(&self, query: &RunQuery) -> Result<Vec<Run>, StoreError>;
}

#[async_trait::async_trait]
pub trait AttributeStore: Send + Sync {
    /// Distinct keys of `kind` owned by any of `run_ids`, sorted ascending.
    async fn distinct_keys(
        &self,
        kind: AttributeKind,
        run_ids: &[String],
    ) -> Result<Vec<String>, StoreError>;
}

#[async_trait::async_trait]
pub trait NamespaceStore: Send + Sync {
    async fn get_by_code(&self, code: &str) -> Result<Option<Namespace>, StoreError>;
}
