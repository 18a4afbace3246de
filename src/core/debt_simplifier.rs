//! Debt simplification
//!
//! This module provides the `DebtSimplifier`, which turns a balance map into a
//! short list of transfers that settles every balance. It solves the
//! minimum-cash-flow problem with a deterministic greedy heuristic rather than
//! an exact solver, so the result is small but not guaranteed minimal.
//!
//! # Algorithm
//!
//! 1. Partition members into creditors (balance > ε) and debtors
//!    (balance < -ε). Members within ε of zero are already settled.
//! 2. While both sides are non-empty:
//!    - sort both sides by remaining amount, largest first (every iteration)
//!    - take the first creditor/debtor pair whose amounts differ by less than
//!      ε, scanning creditors in the outer loop and debtors in the inner loop
//!    - without such a pair, take the largest creditor and largest debtor
//!    - emit `debtor -> creditor` for the smaller of the two amounts, rounded
//!      to cents, and subtract the unrounded amount from both parties
//!    - drop any party whose remainder fell below ε
//! 3. Return the transfers in emission order. Parties still open when one
//!    side ran out are reported as warnings.
//!
//! Rounding each transfer to cents means applying the plan can leave a
//! member off by up to half a cent per transfer it takes part in, on top of
//! the ε tolerance. Many sub-cent shares owed to one creditor can therefore
//! leave that creditor more than ε away from zero.
//!
//! The input map is never mutated; the loop works on local copies.

use crate::core::money::{is_settled, round_currency, SETTLEMENT_EPSILON};
use crate::core::roster::MemberRoster;
use crate::types::{BalanceMap, DataConsistencyWarning, MemberId, SettlementError, Transfer};
use rust_decimal::Decimal;

/// One side of an open debt: a member and the absolute amount outstanding
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Party {
    pub id: MemberId,
    pub amount: Decimal,
}

impl Party {
    pub(crate) fn new(id: impl Into<MemberId>, amount: Decimal) -> Self {
        Party {
            id: id.into(),
            amount,
        }
    }
}

/// Outcome of the pre-simplification consistency checks
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// Sum of all balances (should be within ε of zero)
    pub sum: Decimal,

    /// Problems found; empty when the input is consistent
    pub warnings: Vec<DataConsistencyWarning>,
}

impl ValidationReport {
    /// Whether no consistency problem was found
    pub fn is_valid(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Result of a successful simplification
#[derive(Debug, Clone, PartialEq)]
pub struct Simplification {
    /// Transfers in emission order
    ///
    /// Applying them leaves each member within ε plus half a cent per
    /// transfer touching that member, since every amount is rounded to cents
    /// while the unrounded amount is settled.
    pub transfers: Vec<Transfer>,

    /// Consistency warnings from validation, followed by any parties left
    /// open when one side ran out
    pub warnings: Vec<DataConsistencyWarning>,
}

/// Debt simplification service
#[derive(Debug, Clone, Copy, Default)]
pub struct DebtSimplifier;

impl DebtSimplifier {
    /// Check a balance map against the group roster
    ///
    /// Reports, without failing:
    /// - balances that do not sum to zero within ε
    /// - balance keys with no matching member
    /// - members with no usable display label
    /// - labels shared by several members
    pub fn validate(
        &self,
        balances: &BalanceMap,
        roster: &MemberRoster<'_>,
    ) -> ValidationReport {
        let mut warnings = Vec::new();

        let sum = balances
            .values()
            .try_fold(Decimal::ZERO, |acc, balance| acc.checked_add(*balance))
            .unwrap_or(Decimal::MAX);
        if !is_settled(sum) {
            warnings.push(DataConsistencyWarning::UnbalancedTotal { sum });
        }

        for id in balances.keys() {
            if !roster.contains(id) {
                warnings.push(DataConsistencyWarning::UnknownMember {
                    member: id.clone(),
                });
            }
        }

        for member in roster.unlabelled() {
            warnings.push(DataConsistencyWarning::MissingDisplayName {
                member: member.id.clone(),
            });
        }

        for (label, members) in roster.ambiguous_labels() {
            warnings.push(DataConsistencyWarning::AmbiguousLabel { label, members });
        }

        ValidationReport { sum, warnings }
    }

    /// Compute the settlement transfers for a balance map
    ///
    /// Validation runs first; its warnings are logged and returned with the
    /// transfers. Entries for unknown members are skipped.
    ///
    /// # Arguments
    ///
    /// * `balances` - Net balance per member id
    /// * `roster` - The group's members, used to label transfers
    ///
    /// # Returns
    ///
    /// * `Ok(Simplification)` - Transfers plus any consistency warnings
    /// * `Err(SettlementError)` - If a matched party cannot be resolved
    ///
    /// # Errors
    ///
    /// Returns `DataIntegrity` if a creditor or debtor cannot be resolved to a
    /// member while transfers are being built. No partial list is returned.
    pub fn simplify(
        &self,
        balances: &BalanceMap,
        roster: &MemberRoster<'_>,
    ) -> Result<Simplification, SettlementError> {
        let report = self.validate(balances, roster);
        for warning in &report.warnings {
            tracing::warn!(
                warning = %warning,
                "Data consistency warning before debt simplification"
            );
        }

        let (creditors, debtors) = partition(balances, roster);
        let (transfers, unsettled) = settle(creditors, debtors, roster)?;

        let mut warnings = report.warnings;
        warnings.extend(unsettled);

        Ok(Simplification {
            transfers,
            warnings,
        })
    }
}

/// Split known members into creditors and debtors, skipping settled ones
fn partition(balances: &BalanceMap, roster: &MemberRoster<'_>) -> (Vec<Party>, Vec<Party>) {
    let mut creditors = Vec::new();
    let mut debtors = Vec::new();

    for (id, &balance) in balances {
        if !roster.contains(id) {
            continue;
        }
        if balance > SETTLEMENT_EPSILON {
            creditors.push(Party::new(id.clone(), balance));
        } else if balance < -SETTLEMENT_EPSILON {
            debtors.push(Party::new(id.clone(), -balance));
        }
    }

    (creditors, debtors)
}

/// Greedily pair creditors with debtors until one side is exhausted
///
/// Parties still open at the end are returned as `UnsettledRemainder`
/// warnings, creditors first.
pub(crate) fn settle(
    mut creditors: Vec<Party>,
    mut debtors: Vec<Party>,
    roster: &MemberRoster<'_>,
) -> Result<(Vec<Transfer>, Vec<DataConsistencyWarning>), SettlementError> {
    let mut transfers = Vec::new();

    while !creditors.is_empty() && !debtors.is_empty() {
        // Re-sorted every round: reducing a party changes the next pairing
        creditors.sort_by(|a, b| b.amount.cmp(&a.amount));
        debtors.sort_by(|a, b| b.amount.cmp(&a.amount));

        let exact_match = find_exact_match(&creditors, &debtors);
        let (ci, di) = exact_match.unwrap_or((0, 0));
        let creditor = &creditors[ci];
        let debtor = &debtors[di];

        let to_label = roster.label(&creditor.id).ok_or_else(|| {
            tracing::error!(member = %creditor.id, "Creditor cannot be resolved to a member");
            SettlementError::data_integrity(&creditor.id)
        })?;
        let from_label = roster.label(&debtor.id).ok_or_else(|| {
            tracing::error!(member = %debtor.id, "Debtor cannot be resolved to a member");
            SettlementError::data_integrity(&debtor.id)
        })?;

        let amount = creditor.amount.min(debtor.amount);
        let transfer = Transfer {
            from: debtor.id.clone(),
            to: creditor.id.clone(),
            from_label: from_label.to_string(),
            to_label: to_label.to_string(),
            amount: round_currency(amount),
        };
        tracing::debug!(
            from = %transfer.from,
            to = %transfer.to,
            amount = %transfer.amount,
            exact_match = exact_match.is_some(),
            "Emitting settlement transfer"
        );
        transfers.push(transfer);

        creditors[ci].amount -= amount;
        debtors[di].amount -= amount;

        if creditors[ci].amount < SETTLEMENT_EPSILON {
            creditors.remove(ci);
        }
        if debtors[di].amount < SETTLEMENT_EPSILON {
            debtors.remove(di);
        }
    }

    if !creditors.is_empty() || !debtors.is_empty() {
        tracing::warn!(
            open_creditors = creditors.len(),
            open_debtors = debtors.len(),
            "Balances left unsettled after simplification"
        );
    }

    let unsettled = creditors
        .into_iter()
        .map(|party| (party.id, party.amount))
        .chain(debtors.into_iter().map(|party| (party.id, -party.amount)))
        .map(|(member, amount)| DataConsistencyWarning::UnsettledRemainder { member, amount })
        .collect();

    Ok((transfers, unsettled))
}

/// First creditor/debtor pair whose amounts match within ε
fn find_exact_match(creditors: &[Party], debtors: &[Party]) -> Option<(usize, usize)> {
    creditors.iter().enumerate().find_map(|(ci, creditor)| {
        debtors
            .iter()
            .position(|debtor| (creditor.amount - debtor.amount).abs() < SETTLEMENT_EPSILON)
            .map(|di| (ci, di))
    })
}
