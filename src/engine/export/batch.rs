use std::collections::HashMap;
use std::sync::Arc;

use arrow_array::builder::{
    BooleanBuilder, Float64Builder, StringBuilder, TimestampMillisecondBuilder,
};
use arrow_array::{ArrayRef, RecordBatch};
use tracing::trace;

use super::schema::{ColumnKind, ColumnSource, ExportColumn, ExportSchema};
use crate::engine::errors::ExportError;
use crate::engine::types::{AttributeKind, Run};

pub const MAX_BATCH_SIZE: usize = 1000;

/// Text-valued sources.
enum TextField {
    RunId,
    Name,
    ExperimentName,
    Param(String),
    Tag(String),
}

enum TimeField {
    Creation,
    End,
}

enum FlagField {
    Archived,
    Active,
}

/// One output column: its typed Arrow builder bound to where its values come
/// from. Built once per export; rows are appended without re-checking kinds.
enum ColumnBuilder {
    Utf8(StringBuilder, TextField),
    Float64(Float64Builder, String),
    TimestampMs(TimestampMillisecondBuilder, TimeField),
    Boolean(BooleanBuilder, FlagField),
}

impl ColumnBuilder {
    fn bind(column: &ExportColumn, capacity: usize) -> Result<Self, ExportError> {
        let builder = match (column.kind, &column.source) {
            (ColumnKind::Utf8, ColumnSource::RunId) => Self::text(capacity, TextField::RunId),
            (ColumnKind::Utf8, ColumnSource::Name) => Self::text(capacity, TextField::Name),
            (ColumnKind::Utf8, ColumnSource::ExperimentName) => {
                Self::text(capacity, TextField::ExperimentName)
            }
            (ColumnKind::Utf8, ColumnSource::Attribute(AttributeKind::Param, key)) => {
                Self::text(capacity, TextField::Param(key.clone()))
            }
            (ColumnKind::Utf8, ColumnSource::Attribute(AttributeKind::Tag, key)) => {
                Self::text(capacity, TextField::Tag(key.clone()))
            }
            (ColumnKind::Float64, ColumnSource::Attribute(AttributeKind::Metric, key)) => {
                ColumnBuilder::Float64(Float64Builder::with_capacity(capacity), key.clone())
            }
            (ColumnKind::TimestampMs, ColumnSource::CreationTime) => ColumnBuilder::TimestampMs(
                TimestampMillisecondBuilder::with_capacity(capacity),
                TimeField::Creation,
            ),
            (ColumnKind::TimestampMs, ColumnSource::EndTime) => ColumnBuilder::TimestampMs(
                TimestampMillisecondBuilder::with_capacity(capacity),
                TimeField::End,
            ),
            (ColumnKind::Boolean, ColumnSource::Archived) => ColumnBuilder::Boolean(
                BooleanBuilder::with_capacity(capacity),
                FlagField::Archived,
            ),
            (ColumnKind::Boolean, ColumnSource::Active) => ColumnBuilder::Boolean(
                BooleanBuilder::with_capacity(capacity),
                FlagField::Active,
            ),
            (kind, source) => {
                return Err(ExportError::Schema {
                    column: column.name.clone(),
                    expected: source.kind().as_str(),
                    found: kind.as_str(),
                });
            }
        };
        Ok(builder)
    }

    fn text(capacity: usize, field: TextField) -> Self {
        ColumnBuilder::Utf8(StringBuilder::with_capacity(capacity, capacity * 16), field)
    }

    fn append(&mut self, row: &RowView<'_>) {
        match self {
            ColumnBuilder::Utf8(b, field) => b.append_option(row.text(field)),
            ColumnBuilder::Float64(b, key) => {
                b.append_option(row.metrics.get(key.as_str()).copied())
            }
            ColumnBuilder::TimestampMs(b, field) => b.append_option(match field {
                TimeField::Creation => row.run.start_time,
                TimeField::End => row.run.end_time,
            }),
            ColumnBuilder::Boolean(b, field) => b.append_value(match field {
                FlagField::Archived => row.run.is_archived(),
                FlagField::Active => row.run.is_active(),
            }),
        }
    }

    fn finish(&mut self) -> ArrayRef {
        match self {
            ColumnBuilder::Utf8(b, _) => Arc::new(b.finish()),
            ColumnBuilder::Float64(b, _) => Arc::new(b.finish()),
            ColumnBuilder::TimestampMs(b, _) => Arc::new(b.finish()),
            ColumnBuilder::Boolean(b, _) => Arc::new(b.finish()),
        }
    }
}

/// Attribute lookups of one run, built once per row.
struct RowView<'a> {
    run: &'a Run,
    metrics: HashMap<&'a str, f64>,
    params: HashMap<&'a str, &'a str>,
    tags: HashMap<&'a str, &'a str>,
}

impl<'a> RowView<'a> {
    fn new(run: &'a Run) -> Self {
        Self {
            run,
            metrics: run
                .latest_metrics
                .iter()
                .map(|m| (m.key.as_str(), m.export_value()))
                .collect(),
            params: run
                .params
                .iter()
                .map(|p| (p.key.as_str(), p.value.as_str()))
                .collect(),
            tags: run
                .tags
                .iter()
                .map(|t| (t.key.as_str(), t.value.as_str()))
                .collect(),
        }
    }

    fn text(&self, field: &TextField) -> Option<&'a str> {
        match field {
            TextField::RunId => Some(self.run.id.as_str()),
            TextField::Name => Some(self.run.name.as_str()),
            TextField::ExperimentName => Some(self.run.experiment_name()),
            TextField::Param(key) => self.params.get(key.as_str()).copied(),
            TextField::Tag(key) => self.tags.get(key.as_str()).copied(),
        }
    }
}

/// Accumulates projected rows into record batches of a fixed size.
///
/// The builders are created once from the schema and reused across batches;
/// a full batch is handed back from `append`, the remainder from `finish`.
pub struct BatchAccumulator {
    schema: ExportSchema,
    builders: Vec<ColumnBuilder>,
    batch_size: usize,
    rows: usize,
}

impl BatchAccumulator {
    pub fn new(schema: ExportSchema, batch_size: usize) -> Result<Self, ExportError> {
        let batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        let builders = schema
            .columns()
            .iter()
            .map(|column| ColumnBuilder::bind(column, batch_size))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            schema,
            builders,
            batch_size,
            rows: 0,
        })
    }

    #[cfg(test)]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Rows in the batch being filled.
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.rows
    }

    pub fn append(&mut self, run: &Run) -> Result<Option<RecordBatch>, ExportError> {
        let row = RowView::new(run);
        for builder in &mut self.builders {
            builder.append(&row);
        }
        self.rows += 1;

        if self.rows >= self.batch_size {
            return self.flush().map(Some);
        }
        Ok(None)
    }

    /// Emits the trailing partial batch, if any rows are pending.
    pub fn finish(&mut self) -> Result<Option<RecordBatch>, ExportError> {
        if self.rows == 0 {
            return Ok(None);
        }
        self.flush().map(Some)
    }

    fn flush(&mut self) -> Result<RecordBatch, ExportError> {
        let arrays: Vec<ArrayRef> = self.builders.iter_mut().map(ColumnBuilder::finish).collect();
        let rows = std::mem::take(&mut self.rows);
        let batch = RecordBatch::try_new(Arc::clone(self.schema.arrow()), arrays)?;
        trace!(target: "run_export::export", rows, "Flushed record batch");
        Ok(batch)
    }
}
