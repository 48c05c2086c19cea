use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::engine::errors::StoreError;
use crate::engine::store::{AttributeStore, MemoryStore, RunQuery, RunStore};
use crate::engine::types::{AttributeKind, Run};

/// Store operation that `FaultyStore` can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Count,
    RowNum,
    Find,
    Keys(AttributeKind),
}

/// Wraps a `MemoryStore`, failing one operation with an IO error and
/// counting store calls.
pub struct FaultyStore {
    inner: Arc<MemoryStore>,
    fault: Option<Fault>,
    calls: AtomicUsize,
}

impl FaultyStore {
    pub fn new(inner: Arc<MemoryStore>, fault: Option<Fault>) -> Self {
        Self {
            inner,
            fault,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self, op: Fault) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fault == Some(op) {
            return Err(StoreError::Io(std::io::Error::other("connection reset")));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RunStore for FaultyStore {
    fn dialect(&self) -> &str {
        self.inner.dialect()
    }

    async fn count_all(&self) -> Result<u64, StoreError> {
        self.check(Fault::Count)?;
        self.inner.count_all().await
    }

    async fn find_row_num(&self, namespace_id: i64, run_id: &str) -> Result<i64, StoreError> {
        self.check(Fault::RowNum)?;
        self.inner.find_row_num(namespace_id, run_id).await
    }

    async fn find_runs(&self, query: &RunQuery) -> Result<Vec<Run>, StoreError> {
        self.check(Fault::Find)?;
        self.inner.find_runs(query).await
    }
}

#[async_trait::async_trait]
impl AttributeStore for FaultyStore {
    async fn distinct_keys(
        &self,
        kind: AttributeKind,
        run_ids: &[String],
    ) -> Result<Vec<String>, StoreError> {
        self.check(Fault::Keys(kind))?;
        self.inner.distinct_keys(kind, run_ids).await
    }
}
