use tracing::debug;

use crate::engine::errors::ExportError;
use crate::engine::store::AttributeStore;
use crate::engine::types::AttributeKind;

/// Distinct attribute keys of one page, each list sorted byte-wise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySets {
    pub metrics: Vec<String>,
    pub params: Vec<String>,
    pub tags: Vec<String>,
}

impl KeySets {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.params.is_empty() && self.tags.is_empty()
    }
}

/// Attribute blocks requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Include {
    /// Params and tags.
    pub params: bool,
    /// Latest metrics.
    pub traces: bool,
}

impl Default for Include {
    fn default() -> Self {
        Self {
            params: true,
            traces: true,
        }
    }
}

/// Collects the key sets of `run_ids`; an empty page skips the store.
pub async fn discover_keys(
    store: &dyn AttributeStore,
    run_ids: &[String],
    include: Include,
) -> Result<KeySets, ExportError> {
    let mut keys = KeySets::default();
    if run_ids.is_empty() {
        return Ok(keys);
    }

    if include.params {
        keys.params = distinct(store, AttributeKind::Param, run_ids).await?;
        keys.tags = distinct(store, AttributeKind::Tag, run_ids).await?;
    }
    if include.traces {
        keys.metrics = distinct(store, AttributeKind::Metric, run_ids).await?;
    }

    debug!(
        target: "run_export::export",
        params = keys.params.len(),
        tags = keys.tags.len(),
        metrics = keys.metrics.len(),
        "Discovered attribute keys"
    );
    Ok(keys)
}

async fn distinct(
    store: &dyn AttributeStore,
    kind: AttributeKind,
    run_ids: &[String],
) -> Result<Vec<String>, ExportError> {
    let mut keys = store
        .distinct_keys(kind, run_ids)
        .await
        .map_err(|source| ExportError::Keys { kind, source })?;
    // Stores are asked for sorted keys; the schema relies on it.
    keys.sort_unstable();
    keys.dedup();
    Ok(keys)
}
