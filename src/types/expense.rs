//! Expense and group types for the SplitPay engine
//!
//! This module defines shared expenses, their categories, and the Group
//! document that owns members and expenses.

use super::member::{GroupId, Member, MemberId};
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Expense identifier, unique within a group
pub type ExpenseId = String;

/// Expense categories supported by the application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Accommodation,
    Entertainment,
    #[default]
    Other,
}

impl ExpenseCategory {
    /// Parse a category name (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "food" => Some(ExpenseCategory::Food),
            "transport" => Some(ExpenseCategory::Transport),
            "accommodation" => Some(ExpenseCategory::Accommodation),
            "entertainment" => Some(ExpenseCategory::Entertainment),
            "other" => Some(ExpenseCategory::Other),
            _ => None,
        }
    }
}

/// One shared cost
///
/// The amount is divided equally among `split_between`. The payer does not
/// have to be one of the participants.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// Unique expense id within the group
    pub id: ExpenseId,

    /// Free-form description
    pub description: String,

    /// Total amount paid (must be positive)
    pub amount: Decimal,

    /// Member who paid the full amount
    pub paid_by: MemberId,

    /// Members sharing the cost (must be non-empty)
    pub split_between: Vec<MemberId>,

    pub category: ExpenseCategory,

    pub date: Option<NaiveDate>,
}

impl Expense {
    /// Create an expense with default category and no date
    pub fn new(
        id: impl Into<ExpenseId>,
        amount: Decimal,
        paid_by: impl Into<MemberId>,
        split_between: &[&str],
    ) -> Self {
        Expense {
            id: id.into(),
            description: String::new(),
            amount,
            paid_by: paid_by.into(),
            split_between: split_between.iter().map(|s| s.to_string()).collect(),
            category: ExpenseCategory::Other,
            date: None,
        }
    }

    /// Whether the member paid for or shares this expense
    pub fn references(&self, member: &str) -> bool {
        self.paid_by == member || self.split_between.iter().any(|m| m == member)
    }
}

/// A group document: members plus their shared expenses
///
/// This is the shape the external document store persists. The settlement
/// core only ever reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: GroupId,
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
}

impl Group {
    /// Create an empty group
    pub fn new(id: impl Into<GroupId>) -> Self {
        Group {
            id: id.into(),
            members: Vec::new(),
            expenses: Vec::new(),
        }
    }

    /// Look up a member by id
    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Look up an expense by id
    pub fn expense(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }
}
