//! Asynchronous batch processing strategy
//!
//! Multi-threaded pipeline built on tokio and DashMap.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (group partitioning + concurrent settlement)
//!     └── AsyncGroupLedger (thread-safe record processing)
//!         └── AsyncGroupStore (DashMap of group documents)
//! ```
//!
//! Batches are applied one after another so a group's records keep their
//! file order across batch boundaries. Within a batch, groups are applied in
//! parallel. After the last batch, all groups are settled concurrently and
//! the reports are written in group id order, matching the sync strategy
//! byte for byte.

use crate::cli::ReportKind;
use crate::core::r#async::{AsyncGroupLedger, AsyncGroupStore, BatchProcessor};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{write_reports, ProcessingStrategy};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of ledger records per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a BatchConfig, replacing zero values with defaults
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                default = default.batch_size,
                "Invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "Invalid concurrency limit, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(
        &self,
        input_path: &Path,
        report: ReportKind,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        let reports = runtime.block_on(async {
            let store = Arc::new(AsyncGroupStore::new());
            let ledger = Arc::new(AsyncGroupLedger::new(store));
            let processor = BatchProcessor::new(ledger);

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // csv-async expects futures' AsyncRead
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                // Finish this batch before reading the next one
                for outcome in processor.process_batch(batch).await {
                    if let Err(e) = outcome.result {
                        tracing::warn!(
                            group = %outcome.record.group(),
                            record = ?outcome.record.record_type(),
                            error = %e,
                            "Rejected ledger record"
                        );
                    }
                }
            }

            Ok::<_, String>(processor.settle_all().await)
        })?;

        write_reports(&reports, report, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::SyncProcessingStrategy;
    use rstest::rstest;
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

    fn run(strategy: &dyn ProcessingStrategy, content: &str, report: ReportKind) -> String {
        let file = create_temp_csv(content);
        let mut output = Vec::new();
        strategy.process(file.path(), report, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    const TWO_GROUPS: &str = "type,group,id,name,display,amount,paid_by,split,category,date\n\
                              member,trip,a,Alice\n\
                              member,home,x,Xavier\n\
                              member,trip,b,Bob\n\
                              member,home,y,Yara\n\
                              expense,trip,e1,Dinner,,30,a,a;b\n\
                              expense,home,e1,Rent,,1000,y,x;y\n\
                              expense,trip,e2,Taxi,,10,b,a;b\n";

    #[test]
    fn test_batch_config_zero_values_fall_back() {
        let config = BatchConfig::new(0, 0);
        assert_eq!(config, BatchConfig::default());
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), ReportKind::Settlements, &mut output);

        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_async_strategy_maintains_ordering_across_batches() {
        // Batch size 2 splits each group's records across several batches;
        // expenses only apply if the joins were applied first
        let strategy = AsyncProcessingStrategy::new(BatchConfig::new(2, 2));

        let output = run(&strategy, TWO_GROUPS, ReportKind::Settlements);

        assert_eq!(
            output,
            "group,from,to,amount\nhome,Xavier,Yara,500.00\ntrip,Bob,Alice,10.00\n"
        );
    }

    #[rstest]
    #[case::settlements(ReportKind::Settlements)]
    #[case::balances(ReportKind::Balances)]
    #[case::summary(ReportKind::Summary)]
    fn test_async_output_matches_sync(#[case] report: ReportKind) {
        let strategy = AsyncProcessingStrategy::new(BatchConfig::new(3, 4));

        assert_eq!(
            run(&strategy, TWO_GROUPS, report),
            run(&SyncProcessingStrategy, TWO_GROUPS, report)
        );
    }
}
