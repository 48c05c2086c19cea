use std::collections::HashMap;
use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema, TimeUnit};

use super::keys::KeySets;
use crate::engine::types::AttributeKind;

pub const TOTAL_RUNS_METADATA: &str = "total_runs";
pub const PAGE_RUNS_METADATA: &str = "page_runs";

/// Physical type of an export column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Utf8,
    Float64,
    TimestampMs,
    Boolean,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Utf8 => "Utf8",
            ColumnKind::Float64 => "Float64",
            ColumnKind::TimestampMs => "TimestampMs",
            ColumnKind::Boolean => "Boolean",
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            ColumnKind::Utf8 => DataType::Utf8,
            ColumnKind::Float64 => DataType::Float64,
            ColumnKind::TimestampMs => DataType::Timestamp(TimeUnit::Millisecond, None),
            ColumnKind::Boolean => DataType::Boolean,
        }
    }
}

/// Where a column takes its per-row value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    RunId,
    Name,
    ExperimentName,
    CreationTime,
    EndTime,
    Archived,
    Active,
    Attribute(AttributeKind, String),
}

impl ColumnSource {
    /// Kind every value projected from this source has.
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnSource::RunId | ColumnSource::Name | ColumnSource::ExperimentName => {
                ColumnKind::Utf8
            }
            ColumnSource::CreationTime | ColumnSource::EndTime => ColumnKind::TimestampMs,
            ColumnSource::Archived | ColumnSource::Active => ColumnKind::Boolean,
            ColumnSource::Attribute(AttributeKind::Metric, _) => ColumnKind::Float64,
            ColumnSource::Attribute(_, _) => ColumnKind::Utf8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportColumn {
    pub name: String,
    pub kind: ColumnKind,
    pub source: ColumnSource,
}

impl ExportColumn {
    fn fixed(name: &str, source: ColumnSource) -> Self {
        Self {
            name: name.to_string(),
            kind: source.kind(),
            source,
        }
    }

    fn attribute(kind: AttributeKind, key: &str) -> Self {
        let source = ColumnSource::Attribute(kind, key.to_string());
        Self {
            name: format!("{}{}", kind.column_prefix(), key),
            kind: source.kind(),
            source,
        }
    }
}

/// Run counts attached to the schema when the client asked for progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub total_runs: u64,
    pub page_runs: u64,
}

/// Column layout of one export, frozen before the first row is encoded.
///
/// Fixed columns come first, then metrics, params and tags, each block in
/// the order its keys were discovered.
#[derive(Debug, Clone)]
pub struct ExportSchema {
    columns: Vec<ExportColumn>,
    arrow: Arc<Schema>,
}

/// Columns present in every export, before the attribute blocks.
pub const FIXED_COLUMN_COUNT: usize = 7;

impl ExportSchema {
    pub fn build(keys: &KeySets, progress: Option<Progress>) -> Self {
        let mut columns = vec![
            ExportColumn::fixed("run_id", ColumnSource::RunId),
            ExportColumn::fixed("name", ColumnSource::Name),
            ExportColumn::fixed("experiment_name", ColumnSource::ExperimentName),
            ExportColumn::fixed("creation_time", ColumnSource::CreationTime),
            ExportColumn::fixed("end_time", ColumnSource::EndTime),
            ExportColumn::fixed("archived", ColumnSource::Archived),
            ExportColumn::fixed("active", ColumnSource::Active),
        ];
        for (kind, block) in [
            (AttributeKind::Metric, &keys.metrics),
            (AttributeKind::Param, &keys.params),
            (AttributeKind::Tag, &keys.tags),
        ] {
            columns.extend(block.iter().map(|key| ExportColumn::attribute(kind, key)));
        }

        let metadata = progress
            .map(|p| {
                HashMap::from([
                    (TOTAL_RUNS_METADATA.to_string(), p.total_runs.to_string()),
                    (PAGE_RUNS_METADATA.to_string(), p.page_runs.to_string()),
                ])
            })
            .unwrap_or_default();

        Self::from_columns(columns, metadata)
    }

    pub fn from_columns(columns: Vec<ExportColumn>, metadata: HashMap<String, String>) -> Self {
        let fields: Vec<Field> = columns
            .iter()
            .map(|col| Field::new(&col.name, col.kind.data_type(), true))
            .collect();
        let arrow = Arc::new(Schema::new_with_metadata(fields, metadata));
        Self { columns, arrow }
    }

    pub fn columns(&self) -> &[ExportColumn] {
        &self.columns
    }

    pub fn arrow(&self) -> &Arc<Schema> {
        &self.arrow
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[cfg(test)]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}
