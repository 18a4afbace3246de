//! Settlement-related types for the SplitPay engine
//!
//! This module defines the balance map produced by the balance calculator and
//! the transfer records produced by the debt simplifier.

use super::member::MemberId;
use indexmap::IndexMap;
use rust_decimal::Decimal;

/// Net balance per member
///
/// Positive values are owed *to* the member, negative values are owed *by*
/// the member. Insertion order is preserved so that every computation over
/// the map is deterministic.
pub type BalanceMap = IndexMap<MemberId, Decimal>;

/// One settlement instruction: `from` pays `to` the given amount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Id of the paying member (debtor)
    pub from: MemberId,

    /// Id of the receiving member (creditor)
    pub to: MemberId,

    /// Display label of the paying member
    pub from_label: String,

    /// Display label of the receiving member
    pub to_label: String,

    /// Positive amount, rounded to currency precision
    pub amount: Decimal,
}
