//! Per-group settlement report
//!
//! Combines the balance calculator and the debt simplifier into one report per
//! group, together with the statistics the presentation layer shows next to
//! the settlement plan:
//! - total spent, member and expense counts
//! - the unsimplified ("original") debts, where every debtor pays every
//!   creditor in proportion to that creditor's share of total credit
//! - the reduction from original to simplified transfer count

use crate::core::balance_calculator::BalanceCalculator;
use crate::core::debt_simplifier::DebtSimplifier;
use crate::core::money::{round_currency, SETTLEMENT_EPSILON};
use crate::core::roster::MemberRoster;
use crate::types::{
    BalanceMap, DataConsistencyWarning, Group, GroupId, SettlementError, Transfer,
};
use rust_decimal::{Decimal, RoundingStrategy};

/// Settlement report for one group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupReport {
    pub group: GroupId,
    pub member_count: usize,
    pub expense_count: usize,

    /// Sum of all expense amounts
    pub total_spent: Decimal,

    /// Net balance per member, full precision
    pub balances: BalanceMap,

    /// Simplified settlement plan, in emission order
    pub transfers: Vec<Transfer>,

    /// Unsimplified proportional debts, for comparison
    pub original_debts: Vec<Transfer>,

    /// Consistency warnings raised while simplifying
    pub warnings: Vec<DataConsistencyWarning>,
}

impl GroupReport {
    /// Percentage of transfers saved by simplification, rounded half-up
    ///
    /// Zero when there are no original debts.
    pub fn reduction_percent(&self) -> Decimal {
        let original = self.original_debts.len();
        if original == 0 {
            return Decimal::ZERO;
        }
        let saved = Decimal::from(original as i64 - self.transfers.len() as i64);
        (saved * Decimal::ONE_HUNDRED / Decimal::from(original))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Build the settlement report for a group
///
/// # Errors
///
/// Returns an error if an expense is invalid, arithmetic overflows, or the
/// simplifier hits an unresolvable member.
pub fn settle_group(group: &Group) -> Result<GroupReport, SettlementError> {
    let roster = MemberRoster::new(&group.members);
    let balances = BalanceCalculator.for_group(group)?;
    let simplification = DebtSimplifier.simplify(&balances, &roster)?;
    let original_debts = original_debts(&balances, &roster)?;

    let total_spent = group
        .expenses
        .iter()
        .try_fold(Decimal::ZERO, |acc, expense| acc.checked_add(expense.amount))
        .ok_or_else(|| SettlementError::arithmetic_overflow("total_spent", &group.id))?;

    tracing::debug!(
        group = %group.id,
        transfers = simplification.transfers.len(),
        original_debts = original_debts.len(),
        warnings = simplification.warnings.len(),
        "Settled group"
    );

    Ok(GroupReport {
        group: group.id.clone(),
        member_count: group.members.len(),
        expense_count: group.expenses.len(),
        total_spent,
        balances,
        transfers: simplification.transfers,
        original_debts,
        warnings: simplification.warnings,
    })
}

/// Unsimplified debts: each debtor pays each creditor proportionally
///
/// For debtor `d` and creditor `c`:
/// `portion = balance(c) / total_credit * |balance(d)|`. Portions not above
/// ε are dropped. Members are visited in roster order.
///
/// # Errors
///
/// Returns `ArithmeticOverflow` if a portion cannot be computed.
pub fn original_debts(
    balances: &BalanceMap,
    roster: &MemberRoster<'_>,
) -> Result<Vec<Transfer>, SettlementError> {
    let total_credit = balances
        .values()
        .filter(|balance| **balance > Decimal::ZERO)
        .try_fold(Decimal::ZERO, |acc, balance| acc.checked_add(*balance))
        .ok_or_else(|| SettlementError::arithmetic_overflow("total_credit", ""))?;

    let balance_of = |id: &str| balances.get(id).copied().unwrap_or(Decimal::ZERO);
    let mut debts = Vec::new();

    for debtor in roster.members() {
        let owed = balance_of(&debtor.id);
        if owed >= -SETTLEMENT_EPSILON {
            continue;
        }
        for creditor in roster.members() {
            let credit = balance_of(&creditor.id);
            if creditor.id == debtor.id || credit <= SETTLEMENT_EPSILON {
                continue;
            }

            let portion = credit
                .checked_div(total_credit)
                .and_then(|share| share.checked_mul(owed.abs()))
                .ok_or_else(|| SettlementError::arithmetic_overflow("portion", &debtor.id))?;
            if portion <= SETTLEMENT_EPSILON {
                continue;
            }

            debts.push(Transfer {
                from: debtor.id.clone(),
                to: creditor.id.clone(),
                from_label: roster.label(&debtor.id).unwrap_or(&debtor.id).to_string(),
                to_label: roster.label(&creditor.id).unwrap_or(&creditor.id).to_string(),
                amount: round_currency(portion),
            });
        }
    }

    Ok(debts)
}
