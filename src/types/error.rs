//! Error types for the SplitPay engine
//!
//! This module defines the errors that can occur while computing balances,
//! simplifying debts and applying ledger records, plus the recoverable
//! data-consistency warnings reported by the debt simplifier.
//!
//! # Error Categories
//!
//! - **Expense Errors**: Empty split list, non-positive amount
//! - **Integrity Errors**: A matched party cannot be resolved to a member
//! - **Ledger Errors**: Unknown group/member/expense, duplicates, removal rules
//! - **Arithmetic Errors**: Overflow in balance accumulation

use super::expense::ExpenseId;
use super::member::{GroupId, MemberId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the settlement engine
///
/// Each variant includes the context needed to report the failure to the
/// calling layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    /// An expense cannot be split
    ///
    /// Raised by the balance calculator for an empty `split_between` or a
    /// non-positive amount. Fatal for the current computation.
    #[error("Invalid expense '{expense}': {reason}")]
    InvalidExpense {
        /// Expense id
        expense: ExpenseId,
        /// Why the expense was rejected
        reason: String,
    },

    /// Arithmetic overflow would occur
    #[error("Arithmetic overflow in {operation} for member '{member}'")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Member whose balance was being updated
        member: MemberId,
    },

    /// A creditor or debtor could not be resolved to a member mid-computation
    ///
    /// Fatal for the current call: no partial transfer list is returned.
    #[error("Data integrity error: member '{member}' cannot be resolved")]
    DataIntegrity {
        /// The unresolvable member id
        member: MemberId,
    },

    /// Referenced group does not exist
    #[error("Group '{group}' not found")]
    GroupNotFound {
        /// Group id
        group: GroupId,
    },

    /// Referenced member is not part of the group
    #[error("Member '{member}' not found in group '{group}'")]
    MemberNotFound {
        /// Group id
        group: GroupId,
        /// Member id
        member: MemberId,
    },

    /// Member id already present in the group
    #[error("Duplicate member '{member}' in group '{group}'")]
    DuplicateMember {
        /// Group id
        group: GroupId,
        /// Member id
        member: MemberId,
    },

    /// Expense id already present in the group
    #[error("Duplicate expense '{expense}' in group '{group}'")]
    DuplicateExpense {
        /// Group id
        group: GroupId,
        /// Expense id
        expense: ExpenseId,
    },

    /// Referenced expense does not exist
    #[error("Expense '{expense}' not found in group '{group}'")]
    ExpenseNotFound {
        /// Group id
        group: GroupId,
        /// Expense id
        expense: ExpenseId,
    },

    /// Member cannot leave while expenses reference them
    #[error("Member '{member}' cannot leave group '{group}': referenced by {expenses} expense(s)")]
    MemberHasExpenses {
        /// Group id
        group: GroupId,
        /// Member id
        member: MemberId,
        /// Number of referencing expenses
        expenses: usize,
    },
}

// Helper functions for creating common errors

impl SettlementError {
    /// Create an InvalidExpense error
    pub fn invalid_expense(expense: &str, reason: &str) -> Self {
        SettlementError::InvalidExpense {
            expense: expense.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, member: &str) -> Self {
        SettlementError::ArithmeticOverflow {
            operation: operation.to_string(),
            member: member.to_string(),
        }
    }

    /// Create a DataIntegrity error
    pub fn data_integrity(member: &str) -> Self {
        SettlementError::DataIntegrity {
            member: member.to_string(),
        }
    }

    /// Create a GroupNotFound error
    pub fn group_not_found(group: &str) -> Self {
        SettlementError::GroupNotFound {
            group: group.to_string(),
        }
    }

    /// Create a MemberNotFound error
    pub fn member_not_found(group: &str, member: &str) -> Self {
        SettlementError::MemberNotFound {
            group: group.to_string(),
            member: member.to_string(),
        }
    }

    /// Create a DuplicateMember error
    pub fn duplicate_member(group: &str, member: &str) -> Self {
        SettlementError::DuplicateMember {
            group: group.to_string(),
            member: member.to_string(),
        }
    }

    /// Create a DuplicateExpense error
    pub fn duplicate_expense(group: &str, expense: &str) -> Self {
        SettlementError::DuplicateExpense {
            group: group.to_string(),
            expense: expense.to_string(),
        }
    }

    /// Create an ExpenseNotFound error
    pub fn expense_not_found(group: &str, expense: &str) -> Self {
        SettlementError::ExpenseNotFound {
            group: group.to_string(),
            expense: expense.to_string(),
        }
    }

    /// Create a MemberHasExpenses error
    pub fn member_has_expenses(group: &str, member: &str, expenses: usize) -> Self {
        SettlementError::MemberHasExpenses {
            group: group.to_string(),
            member: member.to_string(),
            expenses,
        }
    }
}

/// Recoverable data-consistency problems found while simplifying debts
///
/// These signal upstream bugs in expense data or balance computation. They
/// are reported to the caller and logged, but never abort the computation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataConsistencyWarning {
    /// Balances do not sum to zero within tolerance
    #[error("Balances do not sum to zero (sum {sum})")]
    UnbalancedTotal {
        /// The actual sum of all balances
        sum: Decimal,
    },

    /// A balance-map key has no matching member; the entry is skipped
    #[error("Balance entry '{member}' has no matching member")]
    UnknownMember {
        /// The unknown key
        member: MemberId,
    },

    /// A member has neither a display identifier nor a name
    ///
    /// The raw id is used as the label instead.
    #[error("Member '{member}' has no display name")]
    MissingDisplayName {
        /// Member id
        member: MemberId,
    },

    /// A party still had an open amount when the other side ran out
    ///
    /// `amount` is the signed unrounded remainder, positive for a creditor.
    #[error("Member '{member}' left unsettled with {amount}")]
    UnsettledRemainder {
        /// Member id
        member: MemberId,
        /// Remaining balance
        amount: Decimal,
    },

    /// Several members resolve to the same label (case-insensitive)
    #[error("Label '{label}' is shared by members {}", members.join(", "))]
    AmbiguousLabel {
        /// The colliding label
        label: String,
        /// Members sharing it
        members: Vec<MemberId>,
    },
}
