//! Balance calculation from a group's expenses
//!
//! This module provides the `BalanceCalculator`, which derives each member's
//! net balance from the current expense list. It is a pure function of its
//! inputs: no caching, no state between calls.
//!
//! For every expense the payer is credited the full amount and each
//! participant is debited `amount / |split_between|`. A payer who is also a
//! participant ends up with the net of both.
//!
//! Membership is not validated here. An expense referencing an id outside the
//! member set introduces a new entry for that id, which the debt simplifier
//! later reports as an unknown member.

use crate::types::{BalanceMap, Expense, Group, SettlementError};
use rust_decimal::Decimal;

/// Balance calculation service
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Calculate net balances for a group's members
    ///
    /// Every member id starts at zero, so members without any expense
    /// activity still appear in the result. The map keeps member order, then
    /// unknown ids in the order expenses first reference them.
    ///
    /// # Arguments
    ///
    /// * `member_ids` - Ids of the group's members, in roster order
    /// * `expenses` - The group's expenses (order does not affect the result)
    ///
    /// # Returns
    ///
    /// * `Ok(BalanceMap)` - Net balance per member
    /// * `Err(SettlementError)` - If an expense is invalid or arithmetic overflows
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An expense has an empty split list or a non-positive amount
    /// - Accumulating a balance would overflow
    pub fn calculate<'m, I>(
        &self,
        member_ids: I,
        expenses: &[Expense],
    ) -> Result<BalanceMap, SettlementError>
    where
        I: IntoIterator<Item = &'m str>,
    {
        // Reject bad input before touching any balance
        for expense in expenses {
            validate_expense(expense)?;
        }

        let mut balances: BalanceMap = member_ids
            .into_iter()
            .map(|id| (id.to_string(), Decimal::ZERO))
            .collect();

        for expense in expenses {
            let participants = Decimal::from(expense.split_between.len());
            let split_amount = expense
                .amount
                .checked_div(participants)
                .ok_or_else(|| SettlementError::arithmetic_overflow("split", &expense.paid_by))?;

            apply(&mut balances, &expense.paid_by, expense.amount, "credit")?;

            for member in &expense.split_between {
                apply(&mut balances, member, -split_amount, "debit")?;
            }
        }

        tracing::debug!(
            member_count = balances.len(),
            expense_count = expenses.len(),
            "Calculated group balances"
        );

        Ok(balances)
    }

    /// Calculate net balances for every member of a group
    pub fn for_group(&self, group: &Group) -> Result<BalanceMap, SettlementError> {
        self.calculate(
            group.members.iter().map(|member| member.id.as_str()),
            &group.expenses,
        )
    }
}

/// Check that an expense can be split
///
/// # Errors
///
/// Returns `InvalidExpense` if the amount is not positive or nobody shares it.
pub fn validate_expense(expense: &Expense) -> Result<(), SettlementError> {
    if expense.amount <= Decimal::ZERO {
        return Err(SettlementError::invalid_expense(
            &expense.id,
            &format!("amount must be positive, got {}", expense.amount),
        ));
    }
    if expense.split_between.is_empty() {
        return Err(SettlementError::invalid_expense(
            &expense.id,
            "split list is empty",
        ));
    }
    Ok(())
}

fn apply(
    balances: &mut BalanceMap,
    member: &str,
    delta: Decimal,
    operation: &str,
) -> Result<(), SettlementError> {
    let balance = balances.entry(member.to_string()).or_insert(Decimal::ZERO);
    *balance = balance
        .checked_add(delta)
        .ok_or_else(|| SettlementError::arithmetic_overflow(operation, member))?;
    Ok(())
}
