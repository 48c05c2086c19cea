use std::io;

use arrow_schema::ArrowError;
use thiserror::Error;
use tracing::{debug, error};

use crate::engine::types::AttributeKind;

/// Errors raised by the run, attribute and namespace stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("duplicate record: {0}")]
    Duplicate(String),

    #[error("predicate compiled for dialect '{found}' cannot run on '{expected}'")]
    DialectMismatch { expected: String, found: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Errors of the export pipeline.
///
/// Everything up to key discovery happens before the response is committed;
/// `Encode` and `Io` can only occur once the stream has started.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unable to count total runs: {0}")]
    Count(#[source] StoreError),

    #[error("unable to find search runs offset {offset:?}: {source}")]
    Offset {
        offset: String,
        #[source]
        source: StoreError,
    },

    #[error("error searching runs: {0}")]
    Fetch(#[source] StoreError),

    #[error("error finding {kind} keys: {source}")]
    Keys {
        kind: AttributeKind,
        #[source]
        source: StoreError,
    },

    #[error("column '{column}' expected {expected} but schema declares {found}")]
    Schema {
        column: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("error encoding record batch: {0}")]
    Encode(#[from] ArrowError),

    #[error("error writing stream: {0}")]
    Io(#[from] io::Error),
}

impl ExportError {
    pub fn log_error(&self) {
        match self {
            ExportError::Count(e) | ExportError::Fetch(e) => {
                error!("{}", self);
                debug!("Store error details: {:?}", e);
            }
            ExportError::Offset { source, .. } | ExportError::Keys { source, .. } => {
                error!("{}", self);
                debug!("Store error details: {:?}", source);
            }
            ExportError::Schema { .. } => {
                error!("{}", self);
            }
            ExportError::Encode(e) => {
                error!("Record batch encoding failed: {}", e);
                debug!("Arrow error details: {:?}", e);
            }
            ExportError::Io(e) => {
                error!("Stream write failed: {}", e);
                debug!("IO error kind: {:?}", e.kind());
            }
        }
    }
}
