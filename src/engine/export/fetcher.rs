use tracing::debug;

use crate::command::predicate::Predicate;
use crate::engine::errors::ExportError;
use crate::engine::store::{Preload, RunQuery, RunStore};
use crate::engine::types::Run;

use super::keys::Include;

/// Counts every stored run; only used for progress metadata.
pub async fn count_total(store: &dyn RunStore) -> Result<u64, ExportError> {
    let total = store.count_all().await.map_err(ExportError::Count)?;
    debug!(target: "run_export::export", total, "Total runs");
    Ok(total)
}

/// Fetches one page of runs in `row_num` descending order.
pub async fn fetch_page(
    store: &dyn RunStore,
    namespace_id: i64,
    predicate: Predicate,
    before_row_num: Option<i64>,
    limit: Option<usize>,
    include: Include,
) -> Result<Vec<Run>, ExportError> {
    let query = RunQuery {
        namespace_id,
        predicate,
        before_row_num,
        limit: limit.filter(|l| *l > 0),
        preload: Preload {
            params_and_tags: include.params,
            latest_metrics: include.traces,
        },
    };
    let runs = store.find_runs(&query).await.map_err(ExportError::Fetch)?;
    debug!(target: "run_export::export", found = runs.len(), "Found runs");
    Ok(runs)
}
