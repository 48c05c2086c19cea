use std::sync::Arc;

use arrow_array::RecordBatch;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::debug;

use super::batch::BatchAccumulator;
use super::pipeline::PreparedExport;
use crate::engine::errors::ExportError;
use crate::shared::response::ArrowStreamEncoder;

/// What reached the client once a stream completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub rows: usize,
    pub batches: usize,
}

/// Streams a prepared export as Arrow IPC: schema message, every batch in
/// fetch order, then the end-of-stream marker.
///
/// On any failure the marker is not written; batches already flushed stay
/// with the client.
pub struct RunExportWriter<'a, W: AsyncWrite + Unpin> {
    writer: BufWriter<&'a mut W>,
    batch_size: usize,
    encode_buf: Vec<u8>,
    summary: ExportSummary,
}

impl<'a, W: AsyncWrite + Unpin> RunExportWriter<'a, W> {
    pub fn new(writer: &'a mut W, batch_size: usize) -> Self {
        Self {
            writer: BufWriter::with_capacity(65536, writer),
            batch_size,
            encode_buf: Vec::with_capacity(65536),
            summary: ExportSummary::default(),
        }
    }

    pub async fn write(mut self, export: &PreparedExport) -> Result<ExportSummary, ExportError> {
        let mut accumulator = BatchAccumulator::new(export.schema.clone(), self.batch_size)?;
        let mut encoder = ArrowStreamEncoder::new(Arc::clone(export.schema.arrow()));

        encoder.write_schema(&mut self.encode_buf)?;
        self.writer.write_all(&self.encode_buf).await?;
        self.encode_buf.clear();

        for run in &export.runs {
            if let Some(batch) = accumulator.append(run)? {
                self.write_batch(&mut encoder, &batch).await?;
            }
        }
        if let Some(batch) = accumulator.finish()? {
            self.write_batch(&mut encoder, &batch).await?;
        }

        encoder.write_end(&mut self.encode_buf)?;
        self.writer.write_all(&self.encode_buf).await?;
        self.encode_buf.clear();
        self.writer.flush().await?;

        Ok(self.summary)
    }

    async fn write_batch(
        &mut self,
        encoder: &mut ArrowStreamEncoder,
        batch: &RecordBatch,
    ) -> Result<(), ExportError> {
        encoder.write_batch(batch, &mut self.encode_buf)?;
        self.writer.write_all(&self.encode_buf).await?;
        self.encode_buf.clear();
        // Hand every full batch to the transport as soon as it is encoded.
        self.writer.flush().await?;

        self.summary.rows += batch.num_rows();
        self.summary.batches += 1;
        debug!(
            target: "run_export::export",
            rows = batch.num_rows(),
            total = self.summary.rows,
            "Wrote record batch"
        );
        Ok(())
    }
}
