//! CSV format handling for ledger records and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to ledger records
//! - Report serialization (settlements, balances, summary)
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::core::money::round_currency;
use crate::core::report::GroupReport;
use crate::types::{Expense, ExpenseCategory, LedgerRecord, Member};
use chrono::NaiveDate;
use csv::Writer;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Separator between member ids in the `split` column
pub const SPLIT_SEPARATOR: char = ';';

/// CSV record structure for deserialization
///
/// Matches the input columns:
/// `type,group,id,name,display,amount,paid_by,split,category,date`.
/// Which optional columns are needed depends on the record type; trailing
/// columns may be left out entirely.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub group: String,
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub paid_by: Option<String>,
    #[serde(default)]
    pub split: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Convert a CsvRecord to a LedgerRecord
///
/// This function only checks the record's shape: required columns present,
/// amount, category and date parseable. Group rules (membership, duplicates,
/// positive amounts) are enforced by the ledger.
///
/// # Returns
///
/// * `Ok(LedgerRecord)` - Successfully converted record
/// * `Err(String)` - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<LedgerRecord, String> {
    let group = csv_record.group.trim().to_string();
    let id = csv_record.id.trim().to_string();
    if group.is_empty() {
        return Err(format!("Record '{}' is missing a group", csv_record.record_type));
    }
    if id.is_empty() {
        return Err(format!(
            "Record '{}' in group '{}' is missing an id",
            csv_record.record_type, group
        ));
    }

    match csv_record.record_type.trim().to_lowercase().as_str() {
        "member" => {
            let mut member = Member::new(id, non_blank(csv_record.name).unwrap_or_default());
            if let Some(display) = non_blank(csv_record.display) {
                member = member.with_display_identifier(display);
            }
            Ok(LedgerRecord::Join { group, member })
        }
        "expense" => {
            let amount_str = non_blank(csv_record.amount)
                .ok_or_else(|| format!("Expense '{}' requires an amount", id))?;
            let amount = Decimal::from_str(&amount_str)
                .map_err(|_| format!("Invalid amount '{}' for expense '{}'", amount_str, id))?;

            let paid_by = non_blank(csv_record.paid_by)
                .ok_or_else(|| format!("Expense '{}' requires a payer", id))?;

            let split_between = csv_record
                .split
                .unwrap_or_default()
                .split(SPLIT_SEPARATOR)
                .map(str::trim)
                .filter(|member| !member.is_empty())
                .map(str::to_string)
                .collect();

            let category = match non_blank(csv_record.category) {
                Some(raw) => ExpenseCategory::parse(&raw)
                    .ok_or_else(|| format!("Invalid category '{}' for expense '{}'", raw, id))?,
                None => ExpenseCategory::default(),
            };

            let date = non_blank(csv_record.date)
                .map(|raw| {
                    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                        .map_err(|_| format!("Invalid date '{}' for expense '{}'", raw, id))
                })
                .transpose()?;

            Ok(LedgerRecord::AddExpense {
                group,
                expense: Expense {
                    id,
                    description: non_blank(csv_record.name).unwrap_or_default(),
                    amount,
                    paid_by,
                    split_between,
                    category,
                    date,
                },
            })
        }
        "delete" => Ok(LedgerRecord::DeleteExpense { group, expense: id }),
        "leave" => Ok(LedgerRecord::Leave { group, member: id }),
        _ => Err(format!(
            "Invalid record type: '{}' for id '{}'",
            csv_record.record_type, id
        )),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_currency(amount))
}

/// Write settlement transfers to CSV format
///
/// Columns: group, from, to, amount. Groups appear in the given order and
/// transfers in emission order; `from`/`to` are member labels.
pub fn write_settlements_csv(reports: &[GroupReport], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["group", "from", "to", "amount"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for report in reports {
        for transfer in &report.transfers {
            writer
                .write_record([
                    report.group.as_str(),
                    transfer.from_label.as_str(),
                    transfer.to_label.as_str(),
                    format_amount(transfer.amount).as_str(),
                ])
                .map_err(|e| format!("Failed to write settlement record: {}", e))?;
        }
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}

/// Write member balances to CSV format
///
/// Columns: group, member, balance. Members appear in roster order; balances
/// are rounded to cents.
pub fn write_balances_csv(reports: &[GroupReport], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["group", "member", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for report in reports {
        for (member, balance) in &report.balances {
            writer
                .write_record([
                    report.group.as_str(),
                    member.as_str(),
                    format_amount(*balance).as_str(),
                ])
                .map_err(|e| format!("Failed to write balance record: {}", e))?;
        }
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}

/// Write one summary line per group to CSV format
///
/// Columns: group, members, expenses, total_spent, original_transfers,
/// simplified_transfers, reduction_percent.
pub fn write_summary_csv(reports: &[GroupReport], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "group",
            "members",
            "expenses",
            "total_spent",
            "original_transfers",
            "simplified_transfers",
            "reduction_percent",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for report in reports {
        writer
            .write_record(&[
                report.group.clone(),
                report.member_count.to_string(),
                report.expense_count.to_string(),
                format_amount(report.total_spent),
                report.original_debts.len().to_string(),
                report.transfers.len().to_string(),
                report.reduction_percent().to_string(),
            ])
            .map_err(|e| format!("Failed to write summary record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}
