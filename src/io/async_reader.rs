//! Asynchronous CSV reader with batch interface
//!
//! Reads ledger records in batches for the async strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of LedgerRecords
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::LedgerRecord;
use csv_async::{AsyncReaderBuilder, StringRecord};
use futures::io::AsyncRead;

/// Asynchronous CSV reader
///
/// Rows that fail to parse or convert are logged with their line number and
/// skipped, the same way the sync strategy skips them.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncReader<R>,
    headers: Option<StringRecord>,
    /// Physical line the last row read starts on (the header is line 1)
    line: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader over CSV data with a header row
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_reader(reader);

        Self {
            csv_reader,
            headers: None,
            line: 1,
        }
    }

    /// Read up to `batch_size` ledger records
    ///
    /// Returns an empty vector once the input is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<LedgerRecord> {
        let mut batch = Vec::with_capacity(batch_size);

        if self.headers.is_none() {
            match self.csv_reader.headers().await {
                Ok(headers) => self.headers = Some(headers.clone()),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read CSV header");
                    return batch;
                }
            }
        }

        let mut row = StringRecord::new();
        while batch.len() < batch_size {
            match self.csv_reader.read_record(&mut row).await {
                Ok(false) => break,
                Ok(true) => {
                    self.line = row.position().map_or(self.line + 1, |position| position.line());

                    let converted = row
                        .deserialize::<CsvRecord>(self.headers.as_ref())
                        .map_err(|e| format!("CSV parse error: {}", e))
                        .and_then(convert_csv_record);
                    match converted {
                        Ok(record) => batch.push(record),
                        Err(e) => tracing::warn!(line = self.line, error = %e, "Skipping record"),
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Skipping unreadable record"),
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordType;
    use futures::io::Cursor;

    const HEADER: &str = "type,group,id,name,display,amount,paid_by,split,category,date\n";

    fn reader(rows: &str) -> AsyncReader<Cursor<Vec<u8>>> {
        AsyncReader::new(Cursor::new(format!("{HEADER}{rows}").into_bytes()))
    }

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let mut async_reader = reader(
            "member,trip,alice,Alice\n\
             member,trip,bob,Bob\n\
             expense,trip,e1,Dinner,,30,alice,alice;bob\n",
        );

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].record_type(), RecordType::Member);
        assert_eq!(batch[1].record_type(), RecordType::Member);

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].record_type(), RecordType::Expense);

        assert!(async_reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let mut async_reader = reader("");
        assert!(async_reader.read_batch(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_skips_invalid_record() {
        let mut async_reader = reader(
            "refund,trip,r1\n\
             expense,trip,e1,Dinner,,abc,alice,alice\n\
             leave,trip,alice\n",
        );

        let batch = async_reader.read_batch(10).await;

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].record_type(), RecordType::Leave);
        assert_eq!(async_reader.line, 4);
    }

    #[tokio::test]
    async fn test_async_reader_tracks_lines_inside_quoted_fields() {
        let mut async_reader = reader(
            "member,trip,alice,\"Alice\nSmith\"\n\
             member,trip,bob,Bob\n",
        );

        let batch = async_reader.read_batch(10).await;

        assert_eq!(batch.len(), 2);
        assert_eq!(async_reader.line, 4);
    }

    #[tokio::test]
    async fn test_async_reader_whitespace_and_case() {
        let mut async_reader = reader("  MEMBER ,  trip  ,  alice , Alice \n");

        let batch = async_reader.read_batch(10).await;

        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].group(), "trip");
    }
}
