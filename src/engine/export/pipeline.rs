use tracing::info;

use super::cursor::resolve_cursor;
use super::fetcher::{count_total, fetch_page};
use super::keys::{Include, KeySets, discover_keys};
use super::schema::{ExportSchema, Progress};
use crate::command::predicate::Predicate;
use crate::engine::errors::ExportError;
use crate::engine::store::{AttributeStore, RunStore};
use crate::engine::types::Run;

/// One export, as asked for by the client.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub namespace_id: i64,
    pub predicate: Predicate,
    pub limit: Option<usize>,
    /// Run id of the last row of the previous page.
    pub offset: Option<String>,
    pub report_progress: bool,
    pub include: Include,
}

/// Everything the stream needs, gathered before the response is committed.
#[derive(Debug, Clone)]
pub struct PreparedExport {
    pub schema: ExportSchema,
    pub keys: KeySets,
    pub runs: Vec<Run>,
    pub total_runs: u64,
}

/// Runs the fallible store work of an export: count, cursor, fetch and key
/// discovery, in that order, and freezes the schema.
pub async fn prepare_export(
    runs: &dyn RunStore,
    attributes: &dyn AttributeStore,
    request: ExportRequest,
) -> Result<PreparedExport, ExportError> {
    let total_runs = count_total(runs).await?;
    let before_row_num =
        resolve_cursor(runs, request.namespace_id, request.offset.as_deref()).await?;

    let page = fetch_page(
        runs,
        request.namespace_id,
        request.predicate,
        before_row_num,
        request.limit,
        request.include,
    )
    .await?;

    let run_ids: Vec<String> = page.iter().map(|r| r.id.clone()).collect();
    let keys = discover_keys(attributes, &run_ids, request.include).await?;

    let progress = request.report_progress.then(|| Progress {
        total_runs,
        page_runs: page.len() as u64,
    });
    let schema = ExportSchema::build(&keys, progress);

    info!(
        target: "run_export::export",
        namespace_id = request.namespace_id,
        rows = page.len(),
        columns = schema.len(),
        "Prepared run export"
    );

    Ok(PreparedExport {
        schema,
        keys,
        runs: page,
        total_runs,
    })
}
