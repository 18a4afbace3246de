//! SplitPay Settlement Engine
//!
//! # Overview
//!
//! Computes who owes whom in a group of people sharing expenses, and reduces
//! the resulting debts to a small set of direct transfers.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Member, Expense, Group, Transfer, errors)
//! - [`cli`] - CLI argument parsing
//! - [`core`] - Business logic components:
//!   - [`core::balance_calculator`] - Net balance per member from expenses
//!   - [`core::debt_simplifier`] - Greedy settlement with exact-match priority
//!   - [`core::report`] - Per-group report with reduction statistics
//!   - [`core::ledger`] - Group rules for members joining and leaving,
//!     and for expenses being added and deleted
//! - [`io`] - CSV input and report output
//! - [`strategy`] - Sync and async processing pipelines
//!
//! # Settlement
//!
//! Each expense credits its payer with the full amount and debits every
//! participant an equal share. The simplifier then repeatedly settles the
//! largest creditor against the largest debtor, preferring any pair whose
//! amounts match within one cent, until everybody is settled. Amounts are
//! `rust_decimal::Decimal` throughout and emitted transfers are rounded
//! half-up to cents.
//!
//! ```
//! use rust_decimal_macros::dec;
//! use splitpay_engine::core::{BalanceCalculator, DebtSimplifier, MemberRoster};
//! use splitpay_engine::types::{Expense, Member};
//!
//! let members = vec![Member::new("a", "Alice"), Member::new("b", "Bob")];
//! let expenses = vec![Expense::new("e1", dec!(30), "a", &["a", "b"])];
//!
//! let balances = BalanceCalculator.calculate(["a", "b"], &expenses).unwrap();
//! let plan = DebtSimplifier
//!     .simplify(&balances, &MemberRoster::new(&members))
//!     .unwrap();
//!
//! assert_eq!(plan.transfers.len(), 1);
//! assert_eq!(plan.transfers[0].from_label, "Bob");
//! assert_eq!(plan.transfers[0].amount, dec!(15));
//! ```

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{settle_group, BalanceCalculator, DebtSimplifier, GroupLedger, GroupReport};
pub use types::{
    BalanceMap, DataConsistencyWarning, Expense, Group, LedgerRecord, Member, SettlementError,
    Transfer,
};
