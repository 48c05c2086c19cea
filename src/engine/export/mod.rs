//! Arrow export of run searches.
//!
//! `prepare_export` does every store read up front and freezes the schema;
//! `RunExportWriter` then turns the prepared page into an IPC stream.

mod batch;
mod cursor;
mod fetcher;
mod keys;
mod pipeline;
mod schema;
mod writer;

pub use batch::{BatchAccumulator, MAX_BATCH_SIZE};
pub use cursor::resolve_cursor;
pub use fetcher::{count_total, fetch_page};
pub use keys::{Include, KeySets, discover_keys};
pub use pipeline::{ExportRequest, PreparedExport, prepare_export};
pub use schema::{
    ColumnKind, ColumnSource, ExportColumn, ExportSchema, FIXED_COLUMN_COUNT, PAGE_RUNS_METADATA,
    Progress, TOTAL_RUNS_METADATA,
};
pub use writer::{ExportSummary, RunExportWriter};

#[cfg(test)]
mod batch_test;
#[cfg(test)]
mod keys_test;
