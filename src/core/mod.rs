//! Core business logic module
//!
//! This module contains the settlement components:
//! - `money` - Currency tolerance and rounding
//! - `roster` - Member lookup and label resolution
//! - `balance_calculator` - Net balances from expenses
//! - `debt_simplifier` - Greedy transfer minimization
//! - `report` - Per-group settlement reports and statistics
//! - `group_store` - In-memory group documents
//! - `ledger` - Ledger record processing with group rules
//! - `async` - Thread-safe store, ledger and batch processor

pub mod r#async;
pub mod balance_calculator;
pub mod debt_simplifier;
pub mod group_store;
pub mod ledger;
pub mod money;
pub mod report;
pub mod roster;

pub use balance_calculator::{validate_expense, BalanceCalculator};
pub use debt_simplifier::{DebtSimplifier, Simplification, ValidationReport};
pub use group_store::GroupStore;
pub use ledger::GroupLedger;
pub use money::{is_settled, round_currency, CURRENCY_SCALE, SETTLEMENT_EPSILON};
pub use r#async::{AsyncGroupLedger, AsyncGroupStore, BatchProcessor};
pub use report::{original_debts, settle_group, GroupReport};
pub use roster::MemberRoster;
