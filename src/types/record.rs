//! Ledger records for the SplitPay engine
//!
//! A ledger record is one user action against a group document, as read from
//! the input CSV. Records are applied in order by the ledger.

use super::expense::{Expense, ExpenseId};
use super::member::{GroupId, Member, MemberId};

/// Record types supported by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    /// Add a member to a group, creating the group if needed
    Member,

    /// Log a shared expense
    Expense,

    /// Delete a previously logged expense
    Delete,

    /// Remove a member from a group
    ///
    /// Rejected while any expense references the member.
    Leave,
}

/// A single action against a group
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerRecord {
    Join { group: GroupId, member: Member },
    AddExpense { group: GroupId, expense: Expense },
    DeleteExpense { group: GroupId, expense: ExpenseId },
    Leave { group: GroupId, member: MemberId },
}

impl LedgerRecord {
    /// The group this record applies to
    pub fn group(&self) -> &GroupId {
        match self {
            LedgerRecord::Join { group, .. }
            | LedgerRecord::AddExpense { group, .. }
            | LedgerRecord::DeleteExpense { group, .. }
            | LedgerRecord::Leave { group, .. } => group,
        }
    }

    /// The record type
    pub fn record_type(&self) -> RecordType {
        match self {
            LedgerRecord::Join { .. } => RecordType::Member,
            LedgerRecord::AddExpense { .. } => RecordType::Expense,
            LedgerRecord::DeleteExpense { .. } => RecordType::Delete,
            LedgerRecord::Leave { .. } => RecordType::Leave,
        }
    }
}
