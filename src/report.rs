//! CSV reports over a snapshot of expenses.

use crate::error::{LedgerError, Result};
use crate::expense::ExpenseRecord;
use crate::settlement::BalanceSummary;
use crate::stats::{active_months, monthly_summary, user_stats};
use std::collections::BTreeSet;
use std::io::Write;
use std::str::FromStr;

/// Which report to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Report {
    /// `user,amount`
    Balances,
    /// `from,to,amount`
    #[default]
    Settlements,
    /// `user,total_paid,total_owed,net_balance,expense_count`
    Stats,
    /// `year,month,total_expenses,expense_count,top_category,average_per_day`
    Monthly,
    /// `id,date,paid_by,amount,category,description`
    Expenses,
}

impl FromStr for Report {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "balances" => Ok(Report::Balances),
            "settlements" => Ok(Report::Settlements),
            "stats" => Ok(Report::Stats),
            "monthly" => Ok(Report::Monthly),
            "expenses" => Ok(Report::Expenses),
            other => Err(LedgerError::UnknownReport(other.to_string())),
        }
    }
}

pub(crate) fn write_balances<W: Write>(summary: &BalanceSummary, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["user", "amount"])?;
    for balance in &summary.balances {
        csv_writer.write_record([balance.user_id.clone(), balance.amount.to_string()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub(crate) fn write_settlements<W: Write>(summary: &BalanceSummary, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["from", "to", "amount"])?;
    for settlement in &summary.settlements {
        csv_writer.write_record([
            settlement.from.clone(),
            settlement.to.clone(),
            settlement.amount.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub(crate) fn write_stats<W: Write>(expenses: &[ExpenseRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "user",
        "total_paid",
        "total_owed",
        "net_balance",
        "expense_count",
    ])?;

    let users: BTreeSet<&str> = expenses
        .iter()
        .flat_map(|e| {
            std::iter::once(e.paid_by.as_str()).chain(e.splits.iter().map(|s| s.user_id.as_str()))
        })
        .collect();

    for user in users {
        let stats = user_stats(expenses, user)?;
        csv_writer.write_record([
            stats.user_id,
            stats.total_paid.to_string(),
            stats.total_owed.to_string(),
            stats.net_balance.to_string(),
            stats.expense_count.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub(crate) fn write_monthly<W: Write>(expenses: &[ExpenseRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "year",
        "month",
        "total_expenses",
        "expense_count",
        "top_category",
        "average_per_day",
    ])?;

    for (year, month) in active_months(expenses) {
        let summary = monthly_summary(expenses, year, month)?;
        csv_writer.write_record([
            summary.year.to_string(),
            summary.month.to_string(),
            summary.total_expenses.to_string(),
            summary.expense_count.to_string(),
            summary.top_category,
            summary.average_per_day.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub(crate) fn write_expenses<W: Write>(expenses: &[ExpenseRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["id", "date", "paid_by", "amount", "category", "description"])?;
    for expense in expenses {
        csv_writer.write_record([
            expense.id.clone(),
            expense.date.format("%Y-%m-%d").to_string(),
            expense.paid_by.clone(),
            expense.amount.to_string(),
            expense.category.clone(),
            expense.description.clone(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_names() {
        assert_eq!(Report::from_str("balances").unwrap(), Report::Balances);
        assert_eq!(Report::from_str(" Settlements ").unwrap(), Report::Settlements);
        assert_eq!(Report::from_str("STATS").unwrap(), Report::Stats);
        assert_eq!(Report::from_str("monthly").unwrap(), Report::Monthly);
        assert_eq!(Report::from_str("expenses").unwrap(), Report::Expenses);
        assert!(matches!(
            Report::from_str("ledger"),
            Err(LedgerError::UnknownReport(ref name)) if name == "ledger"
        ));
        assert_eq!(Report::default(), Report::Settlements);
    }
}
