//! Synchronous CSV reader with iterator interface
//!
//! Streams ledger records from a CSV file one row at a time, delegating
//! parsing and conversion to the csv_format module.
//!
//! ```no_run
//! use splitpay_engine::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("ledger.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Applying record: {:?}", record),
//!         Err(e) => eprintln!("Skipping: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Opening the file fails fast in `new()`
//! - A bad row is yielded as an `Err` carrying the line it starts on;
//!   iteration continues with the next row

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::LedgerRecord;
use csv::{Position, ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Streaming reader over ledger records in a CSV file
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
}

impl SyncReader {
    /// Open a ledger CSV file
    ///
    /// Fields are trimmed and rows may omit trailing optional columns.
    ///
    /// # Errors
    ///
    /// Returns an error message if the file cannot be opened or its header
    /// row cannot be read.
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);
        let headers = reader
            .headers()
            .map_err(|e| format!("Failed to read CSV header: {}", e))?
            .clone();

        Ok(Self { reader, headers })
    }
}

impl Iterator for SyncReader {
    type Item = Result<LedgerRecord, String>;

    /// Errors are prefixed with the physical line the row starts on.
    fn next(&mut self) -> Option<Self::Item> {
        let mut row = StringRecord::new();
        match self.reader.read_record(&mut row) {
            Ok(false) => None,
            Ok(true) => {
                let line = row.position().map_or(0, Position::line);
                Some(
                    row.deserialize::<CsvRecord>(Some(&self.headers))
                        .map_err(|e| format!("CSV parse error: {}", e))
                        .and_then(convert_csv_record)
                        .map_err(|e| format!("Line {}: {}", line, e)),
                )
            }
            Err(e) => Some(Err(match e.position() {
                Some(position) => format!("Line {}: CSV parse error: {}", position.line(), e),
                None => format!("CSV parse error: {}", e),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordType;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "type,group,id,name,display,amount,paid_by,split,category,date\n";

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(rows: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(HEADER.as_bytes())
            .and_then(|_| file.write_all(rows.as_bytes()))
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn read_all(rows: &str) -> Vec<Result<LedgerRecord, String>> {
        let file = create_temp_csv(rows);
        SyncReader::new(file.path()).unwrap().collect()
    }

    #[test]
    fn test_sync_reader_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.csv"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_reader_reads_all_record_types() {
        let records = read_all(
            "member,trip,alice,Alice,alice.eth,,,,,\n\
             expense,trip,e1,Dinner,,90.00,alice,alice;bob,food,2024-03-01\n\
             delete,trip,e1,,,,,,,\n\
             leave,trip,alice,,,,,,,\n",
        );

        let types: Vec<RecordType> = records
            .into_iter()
            .map(|r| r.unwrap().record_type())
            .collect();
        assert_eq!(
            types,
            vec![
                RecordType::Member,
                RecordType::Expense,
                RecordType::Delete,
                RecordType::Leave,
            ]
        );
    }

    #[test]
    fn test_sync_reader_accepts_short_rows() {
        let records = read_all("delete,trip,e1\nmember,trip,bob,Bob\n");

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(Result::is_ok));
    }

    #[test]
    fn test_sync_reader_handles_whitespace() {
        let records = read_all("  expense , trip , e1 , Taxi ,, 12.50 , bob , bob ; alice ,,\n");

        match records[0].as_ref().unwrap() {
            LedgerRecord::AddExpense { group, expense } => {
                assert_eq!(group, "trip");
                assert_eq!(expense.amount, dec!(12.50));
                assert_eq!(expense.split_between, vec!["bob", "alice"]);
            }
            other => panic!("Expected AddExpense, got {:?}", other),
        }
    }

    #[test]
    fn test_sync_reader_includes_line_numbers_in_errors() {
        let records = read_all(
            "member,trip,alice,Alice\n\
             expense,trip,e1,Dinner,,lots,alice,alice\n\
             member,trip,bob,Bob\n",
        );

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(records[2].is_ok());

        // Line 3 because of the header
        let error = records[1].as_ref().unwrap_err();
        assert!(error.contains("Line 3"), "error: {}", error);
        assert!(error.contains("Invalid amount"), "error: {}", error);
    }

    #[test]
    fn test_sync_reader_counts_lines_inside_quoted_fields() {
        let records = read_all(
            "member,trip,alice,\"Alice\nSmith\"\n\
             expense,trip,e1,Dinner,,lots,alice,alice\n",
        );

        match records[0].as_ref().unwrap() {
            LedgerRecord::Join { member, .. } => assert_eq!(member.name, "Alice\nSmith"),
            other => panic!("Expected Join, got {:?}", other),
        }

        // The member row spans lines 2 and 3
        let error = records[1].as_ref().unwrap_err();
        assert!(error.contains("Line 4"), "error: {}", error);
    }

    #[test]
    fn test_sync_reader_continues_after_error() {
        let records = read_all("refund,trip,r1\nmember,trip,bob,Bob\n");

        assert_eq!(records.len(), 2);
        assert!(records[0].is_err());
        assert!(records[1].is_ok());
    }

    #[test]
    fn test_sync_reader_empty_file_after_header() {
        assert!(read_all("").is_empty());
    }
}
