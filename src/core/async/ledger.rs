//! Ledger record processing for async batch processing
//!
//! This module provides the `AsyncGroupLedger`, the thread-safe counterpart of
//! `GroupLedger`. It applies the same group rules against an
//! `AsyncGroupStore`, taking `&self` so one ledger can be shared across tasks.
//!
//! # Architecture
//!
//! ```text
//! AsyncGroupLedger
//!     └── Arc<AsyncGroupStore>  (thread-safe group documents)
//! ```

use std::sync::Arc;

use super::AsyncGroupStore;
use crate::core::ledger::apply_record;
use crate::core::report::{settle_group, GroupReport};
use crate::types::{LedgerRecord, SettlementError};

/// Thread-safe ledger over a shared group store
#[derive(Debug, Clone)]
pub struct AsyncGroupLedger {
    store: Arc<AsyncGroupStore>,
}

impl AsyncGroupLedger {
    /// Create a ledger over the given store
    pub fn new(store: Arc<AsyncGroupStore>) -> Self {
        Self { store }
    }

    /// The underlying group store
    pub fn store(&self) -> &AsyncGroupStore {
        &self.store
    }

    /// Apply a single ledger record
    ///
    /// # Errors
    ///
    /// Returns an error if the record breaks a group rule; the group is left
    /// unchanged.
    pub fn process_record(&self, record: LedgerRecord) -> Result<(), SettlementError> {
        let group_id = record.group().clone();

        match record {
            LedgerRecord::Join { .. } => self
                .store
                .upsert(&group_id, |group| apply_record(group, record))?,
            LedgerRecord::Leave { .. } => {
                self.store
                    .update(&group_id, |group| apply_record(group, record))?;
                if self.store.remove_if_empty(&group_id) {
                    tracing::debug!(group = %group_id, "Deleted group after last member left");
                }
            }
            _ => self
                .store
                .update(&group_id, |group| apply_record(group, record))?,
        }

        Ok(())
    }

    /// Settlement report for one group, computed on a snapshot
    ///
    /// # Errors
    ///
    /// Returns `GroupNotFound` for an unknown group, or any error raised while
    /// settling it.
    pub fn report(&self, group_id: &str) -> Result<GroupReport, SettlementError> {
        let group = self
            .store
            .get(group_id)
            .ok_or_else(|| SettlementError::group_not_found(group_id))?;
        settle_group(&group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Expense, Member};
    use rust_decimal_macros::dec;

    fn ledger() -> AsyncGroupLedger {
        AsyncGroupLedger::new(Arc::new(AsyncGroupStore::new()))
    }

    fn join(group: &str, id: &str) -> LedgerRecord {
        LedgerRecord::Join {
            group: group.to_string(),
            member: Member::new(id, id.to_uppercase()),
        }
    }

    #[test]
    fn test_join_and_expense() {
        let ledger = ledger();
        ledger.process_record(join("trip", "a")).unwrap();
        ledger.process_record(join("trip", "b")).unwrap();

        ledger
            .process_record(LedgerRecord::AddExpense {
                group: "trip".to_string(),
                expense: Expense::new("e1", dec!(10), "a", &["a", "b"]),
            })
            .unwrap();

        let report = ledger.report("trip").unwrap();
        assert_eq!(report.transfers.len(), 1);
        assert_eq!(report.transfers[0].amount, dec!(5));
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let ledger = ledger();
        ledger.process_record(join("trip", "a")).unwrap();

        let result = ledger.process_record(join("trip", "a"));

        assert_eq!(result, Err(SettlementError::duplicate_member("trip", "a")));
    }

    #[test]
    fn test_expense_for_missing_group_rejected() {
        let ledger = ledger();

        let result = ledger.process_record(LedgerRecord::AddExpense {
            group: "trip".to_string(),
            expense: Expense::new("e1", dec!(10), "a", &["a"]),
        });

        assert_eq!(result, Err(SettlementError::group_not_found("trip")));
        assert!(ledger.store().is_empty());
    }

    #[test]
    fn test_last_member_leaving_deletes_group() {
        let ledger = ledger();
        ledger.process_record(join("trip", "a")).unwrap();

        ledger
            .process_record(LedgerRecord::Leave {
                group: "trip".to_string(),
                member: "a".to_string(),
            })
            .unwrap();

        assert!(ledger.store().get("trip").is_none());
        assert_eq!(
            ledger.report("trip"),
            Err(SettlementError::group_not_found("trip"))
        );
    }

    #[test]
    fn test_rejected_leave_keeps_group() {
        let ledger = ledger();
        ledger.process_record(join("trip", "a")).unwrap();
        ledger
            .process_record(LedgerRecord::AddExpense {
                group: "trip".to_string(),
                expense: Expense::new("e1", dec!(10), "a", &["a"]),
            })
            .unwrap();

        let result = ledger.process_record(LedgerRecord::Leave {
            group: "trip".to_string(),
            member: "a".to_string(),
        });

        assert!(matches!(
            result,
            Err(SettlementError::MemberHasExpenses { expenses: 1, .. })
        ));
        assert!(ledger.store().get("trip").is_some());
    }
}
