//! Processing strategy module
//!
//! This module defines the Strategy pattern for complete settlement pipelines,
//! covering CSV parsing, ledger processing and report output. Different
//! implementations (synchronous, asynchronous batch) can be selected at
//! runtime and must produce identical output for the same input.

use crate::cli::{ReportKind, StrategyType};
use crate::core::report::GroupReport;
use crate::io::csv_format::{write_balances_csv, write_settlements_csv, write_summary_csv};
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete settlement pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Read ledger records from `input_path`, apply them, and write the
    /// requested report for every group to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - The output cannot be written
    ///
    /// Rejected records and groups that fail to settle are logged and
    /// skipped; they do not cause this method to fail.
    fn process(
        &self,
        input_path: &Path,
        report: ReportKind,
        output: &mut dyn Write,
    ) -> Result<(), String>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is only used by the async strategy; defaults apply when absent.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

/// Write the requested report kind for the given group reports
pub fn write_reports(
    reports: &[GroupReport],
    kind: ReportKind,
    output: &mut dyn Write,
) -> Result<(), String> {
    match kind {
        ReportKind::Settlements => write_settlements_csv(reports, output),
        ReportKind::Balances => write_balances_csv(reports, output),
        ReportKind::Summary => write_summary_csv(reports, output),
    }
}
