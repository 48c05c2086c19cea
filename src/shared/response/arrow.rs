use std::sync::Arc;

use arrow_array::RecordBatch;
use arrow_ipc::writer::{DictionaryTracker, IpcDataGenerator, IpcWriteOptions};
use arrow_schema::{ArrowError, Schema};

type ArrowResult<T> = Result<T, ArrowError>;

pub const ARROW_STREAM_CONTENT_TYPE: &str = "application/vnd.apache.arrow.stream";

const CONTINUATION_MARKER: u32 = 0xFFFF_FFFF;

/// Encodes the messages of an Arrow IPC stream one at a time.
///
/// Each call clears `out` and fills it with exactly one framed message, so the
/// caller decides when bytes reach the transport.
pub struct ArrowStreamEncoder {
    schema: Arc<Schema>,
    data_gen: IpcDataGenerator,
    dictionary_tracker: DictionaryTracker,
    write_options: IpcWriteOptions,
}

impl ArrowStreamEncoder {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            data_gen: IpcDataGenerator::default(),
            dictionary_tracker: DictionaryTracker::new(true),
            write_options: IpcWriteOptions::default(),
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn write_schema(&mut self, out: &mut Vec<u8>) -> ArrowResult<()> {
        out.clear();
        let encoded = self.data_gen.schema_to_bytes_with_dictionary_tracker(
            &self.schema,
            &mut self.dictionary_tracker,
            &self.write_options,
        );

        arrow_ipc::writer::write_message(&mut *out, encoded, &self.write_options)?;
        Ok(())
    }

    pub fn write_batch(&mut self, batch: &RecordBatch, out: &mut Vec<u8>) -> ArrowResult<()> {
        if batch.schema().fields() != self.schema.fields() {
            return Err(ArrowError::SchemaError(
                "record batch does not match the stream schema".to_string(),
            ));
        }

        let (dict_batches, record_data) =
            self.data_gen
                .encoded_batch(batch, &mut self.dictionary_tracker, &self.write_options)?;

        out.clear();
        for encoded in dict_batches {
            arrow_ipc::writer::write_message(&mut *out, encoded, &self.write_options)?;
        }
        arrow_ipc::writer::write_message(&mut *out, record_data, &self.write_options)?;
        Ok(())
    }

    /// End-of-stream marker: continuation token followed by a zero length.
    pub fn write_end(&mut self, out: &mut Vec<u8>) -> ArrowResult<()> {
        out.clear();
        out.extend_from_slice(&CONTINUATION_MARKER.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        Ok(())
    }
}
