//! Group ledger
//!
//! This module provides the `GroupLedger`, which applies ledger records to the
//! group store and produces settlement reports.
//!
//! The ledger enforces the group business rules:
//! - A `member` record creates the group on first use; member ids are unique
//!   within a group
//! - An `expense` record needs an existing group, a positive amount, a
//!   non-empty split, a payer and participants who are all members, and an
//!   expense id not used before in the group
//! - A `delete` record removes an existing expense
//! - A `leave` record removes a member nobody's expenses reference; when the
//!   last member leaves, the group is deleted
//!
//! A rejected record leaves the group unchanged.

use crate::core::balance_calculator::validate_expense;
use crate::core::group_store::GroupStore;
use crate::core::report::{settle_group, GroupReport};
use crate::types::{Expense, Group, LedgerRecord, Member, SettlementError};

/// Applies ledger records to an in-memory group store
#[derive(Debug, Default)]
pub struct GroupLedger {
    store: GroupStore,
}

impl GroupLedger {
    /// Create a ledger with no groups
    pub fn new() -> Self {
        GroupLedger {
            store: GroupStore::new(),
        }
    }

    /// Apply a single ledger record
    ///
    /// # Errors
    ///
    /// Returns an error if the record breaks a group rule. The store is left
    /// unchanged in that case.
    pub fn process(&mut self, record: LedgerRecord) -> Result<(), SettlementError> {
        let group_id = record.group().clone();
        let is_leave = matches!(record, LedgerRecord::Leave { .. });

        match record {
            LedgerRecord::Join { .. } => {
                apply_record(self.store.get_or_create(&group_id), record)?;
            }
            _ => self
                .store
                .update(&group_id, |group| apply_record(group, record))?,
        }

        if is_leave
            && self
                .store
                .get(&group_id)
                .is_some_and(|group| group.members.is_empty())
        {
            self.store.delete(&group_id);
            tracing::debug!(group = %group_id, "Deleted group after last member left");
        }

        Ok(())
    }

    /// The underlying group store
    pub fn store(&self) -> &GroupStore {
        &self.store
    }

    /// Settlement report for one group
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
        settle_group(group)
    }

    /// Settlement reports for all groups, sorted by group id
    ///
    /// A group whose settlement fails is logged and left out.
    pub fn reports(&self) -> Vec<GroupReport> {
        self.store
            .groups()
            .into_iter()
            .filter_map(|group| match settle_group(group) {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::error!(group = %group.id, error = %e, "Failed to settle group");
                    None
                }
            })
            .collect()
    }
}

/// Apply a record to a group document
///
/// Shared by the sync and async ledgers. The caller resolves the group;
/// removing an emptied group is also left to the caller.
pub(crate) fn apply_record(group: &mut Group, record: LedgerRecord) -> Result<(), SettlementError> {
    match record {
        LedgerRecord::Join { member, .. } => join(group, member),
        LedgerRecord::AddExpense { expense, .. } => add_expense(group, expense),
        LedgerRecord::DeleteExpense { expense, .. } => delete_expense(group, &expense),
        LedgerRecord::Leave { member, .. } => leave(group, &member),
    }
}

fn join(group: &mut Group, member: Member) -> Result<(), SettlementError> {
    if group.member(&member.id).is_some() {
        return Err(SettlementError::duplicate_member(&group.id, &member.id));
    }
    group.members.push(member);
    Ok(())
}

fn add_expense(group: &mut Group, expense: Expense) -> Result<(), SettlementError> {
    validate_expense(&expense)?;

    let unknown = std::iter::once(&expense.paid_by)
        .chain(expense.split_between.iter())
        .find(|id| group.member(id).is_none());
    if let Some(id) = unknown {
        return Err(SettlementError::member_not_found(&group.id, id));
    }

    if group.expense(&expense.id).is_some() {
        return Err(SettlementError::duplicate_expense(&group.id, &expense.id));
    }

    group.expenses.push(expense);
    Ok(())
}

fn delete_expense(group: &mut Group, expense_id: &str) -> Result<(), SettlementError> {
    let idx = group
        .expenses
        .iter()
        .position(|e| e.id == expense_id)
        .ok_or_else(|| SettlementError::expense_not_found(&group.id, expense_id))?;
    group.expenses.remove(idx);
    Ok(())
}

fn leave(group: &mut Group, member_id: &str) -> Result<(), SettlementError> {
    let idx = group
        .members
        .iter()
        .position(|m| m.id == member_id)
        .ok_or_else(|| SettlementError::member_not_found(&group.id, member_id))?;

    let referencing = group
        .expenses
        .iter()
        .filter(|e| e.references(member_id))
        .count();
    if referencing > 0 {
        return Err(SettlementError::member_has_expenses(
            &group.id,
            member_id,
            referencing,
        ));
    }

    group.members.remove(idx);
    Ok(())
}
