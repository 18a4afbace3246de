//! Synchronous processing strategy
//!
//! Single-threaded pipeline: records stream from a `SyncReader` into a
//! `GroupLedger`, then every group is settled in id order and the requested
//! report is written.
//!
//! Memory usage is bounded by the group documents, not by the input size.

use crate::cli::ReportKind;
use crate::core::GroupLedger;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{write_reports, ProcessingStrategy};
use std::io::Write;
use std::path::Path;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use splitpay_engine::cli::ReportKind;
/// use splitpay_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy;
/// let mut output = io::stdout();
///
/// strategy
///     .process(Path::new("ledger.csv"), ReportKind::Settlements, &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        input_path: &Path,
        report: ReportKind,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let mut ledger = GroupLedger::new();
        let reader = SyncReader::new(input_path)?;

        for result in reader {
            match result {
                Ok(record) => {
                    let group = record.group().clone();
                    let record_type = record.record_type();
                    if let Err(e) = ledger.process(record) {
                        tracing::warn!(
                            group = %group,
                            record = ?record_type,
                            error = %e,
                            "Rejected ledger record"
                        );
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Skipping record"),
            }
        }

        write_reports(&ledger.reports(), report, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn run(content: &str, report: ReportKind) -> String {
        let file = create_temp_csv(content);
        let mut output = Vec::new();
        SyncProcessingStrategy
            .process(file.path(), report, &mut output)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    const TRIP: &str = "type,group,id,name,display,amount,paid_by,split,category,date\n\
                        member,trip,a,Alice,alice.eth\n\
                        member,trip,b,Bob\n\
                        expense,trip,e1,Dinner,,30,a,a;b,food\n";

    #[test]
    fn test_sync_strategy_settlements() {
        assert_eq!(
            run(TRIP, ReportKind::Settlements),
            "group,from,to,amount\ntrip,Bob,alice.eth,15.00\n"
        );
    }

    #[test]
    fn test_sync_strategy_balances() {
        assert_eq!(
            run(TRIP, ReportKind::Balances),
            "group,member,balance\ntrip,a,15.00\ntrip,b,-15.00\n"
        );
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let mut output = Vec::new();

        let result =
            SyncProcessingStrategy.process(Path::new("nonexistent.csv"), ReportKind::Summary, &mut output);

        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_strategy_continues_on_rejected_records() {
        let content = format!(
            "{TRIP}\
             expense,trip,e2,Taxi,,abc,a,a;b\n\
             expense,trip,e3,Taxi,,10,z,a;b\n\
             expense,trip,e4,Taxi,,10,b,a;b\n"
        );

        assert_eq!(
            run(&content, ReportKind::Settlements),
            "group,from,to,amount\ntrip,Bob,alice.eth,10.00\n"
        );
    }

    #[test]
    fn test_sync_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncProcessingStrategy>();
    }
}
