//! Batch processing with group-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which applies batches of
//! ledger records concurrently while keeping each group's records in order,
//! and computes settlement reports for all groups concurrently.
//!
//! # Design
//!
//! Groups are independent documents, so a batch is partitioned by group id.
//! Each group's sub-batch is applied sequentially in its own tokio task.
//! Once all batches are applied, `settle_all` spawns one settlement task per
//! group and joins them.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── Arc<AsyncGroupLedger>  (shared ledger over the DashMap store)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;

use super::AsyncGroupLedger;
use crate::core::report::GroupReport;
use crate::types::{GroupId, LedgerRecord, SettlementError};

/// Result of applying a single ledger record
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The record that was applied
    pub record: LedgerRecord,

    /// The result of applying it
    pub result: Result<(), SettlementError>,
}

/// Batch processor with group-based partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    ledger: Arc<AsyncGroupLedger>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor over a shared ledger
    pub fn new(ledger: Arc<AsyncGroupLedger>) -> Self {
        Self { ledger }
    }

    /// Partition a batch of records by group id
    ///
    /// Each record lands in exactly one sub-batch, and each sub-batch keeps
    /// the records' original order.
    pub fn partition_by_group(
        &self,
        batch: Vec<LedgerRecord>,
    ) -> HashMap<GroupId, Vec<LedgerRecord>> {
        let mut group_batches: HashMap<GroupId, Vec<LedgerRecord>> = HashMap::new();

        for record in batch {
            group_batches
                .entry(record.group().clone())
                .or_default()
                .push(record);
        }

        group_batches
    }

    /// Apply all records for a single group, in order
    ///
    /// Failed records are captured in the results and don't stop processing.
    pub async fn process_group_records(
        &self,
        records: Vec<LedgerRecord>,
    ) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(records.len());

        for record in records {
            let result = self.ledger.process_record(record.clone());
            results.push(ProcessingResult { record, result });
        }

        results
    }

    /// Apply a batch of records with group-based partitioning
    ///
    /// Groups are processed concurrently; records within a group sequentially.
    /// Results from different groups may be interleaved in any order.
    pub async fn process_batch(&self, batch: Vec<LedgerRecord>) -> Vec<ProcessingResult> {
        let group_batches = self.partition_by_group(batch);

        let mut tasks = Vec::with_capacity(group_batches.len());
        for (_group_id, records) in group_batches {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_group_records(records).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(group_results) => results.extend(group_results),
                Err(e) => {
                    tracing::error!(error = ?e, "Group task panicked");
                }
            }
        }

        results
    }

    /// Compute settlement reports for every group concurrently
    ///
    /// Reports are returned sorted by group id. A group whose settlement
    /// fails is logged and left out.
    pub async fn settle_all(&self) -> Vec<GroupReport> {
        let group_ids: Vec<GroupId> = self
            .ledger
            .store()
            .groups()
            .into_iter()
            .map(|group| group.id)
            .collect();

        let tasks = group_ids.into_iter().map(|group_id| {
            let ledger = Arc::clone(&self.ledger);
            tokio::spawn(async move {
                let report = ledger.report(&group_id);
                (group_id, report)
            })
        });

        let mut reports = Vec::new();
        for joined in join_all(tasks).await {
            match joined {
                Ok((_, Ok(report))) => reports.push(report),
                Ok((group_id, Err(e))) => {
                    tracing::error!(group = %group_id, error = %e, "Failed to settle group");
                }
                Err(e) => {
                    tracing::error!(error = ?e, "Settlement task panicked");
                }
            }
        }

        reports.sort_by(|a, b| a.group.cmp(&b.group));
        reports
    }
}
