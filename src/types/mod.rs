//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `member`: Member and identifier types
//! - `expense`: Expenses, categories and the Group document
//! - `record`: Ledger records read from input
//! - `settlement`: Balance map and transfer types
//! - `error`: Error and warning types

pub mod error;
pub mod expense;
pub mod member;
pub mod record;
pub mod settlement;

pub use error::{DataConsistencyWarning, SettlementError};
pub use expense::{Expense, ExpenseCategory, ExpenseId, Group};
pub use member::{GroupId, Member, MemberId};
pub use record::{LedgerRecord, RecordType};
pub use settlement::{BalanceMap, Transfer};
