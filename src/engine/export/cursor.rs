use tracing::debug;

use crate::engine::errors::ExportError;
use crate::engine::store::RunStore;

/// Resolves the `offset` run id to the `row_num` the next page must stay below.
///
/// An unknown run id, or one from another namespace, is not an error: the
/// export starts from the first page.
pub async fn resolve_cursor(
    store: &dyn RunStore,
    namespace_id: i64,
    offset: Option<&str>,
) -> Result<Option<i64>, ExportError> {
    let Some(offset) = offset.filter(|o| !o.is_empty()) else {
        return Ok(None);
    };

    match store.find_row_num(namespace_id, offset).await {
        Ok(row_num) => Ok(Some(row_num)),
        Err(err) if err.is_not_found() => {
            debug!(
                target: "run_export::export",
                namespace_id,
                offset,
                "Offset run not found, starting from the first page"
            );
            Ok(None)
        }
        Err(source) => Err(ExportError::Offset {
            offset: offset.to_string(),
            source,
        }),
    }
}
