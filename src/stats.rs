//! Spending statistics per user and per calendar month.

use crate::error::{LedgerError, Result};
use crate::expense::{ExpenseRecord, UserId};
use crate::money::Money;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

/// Spending statistics for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub user_id: UserId,
    /// Sum of expenses this user paid for.
    pub total_paid: Money,
    /// Sum of this user's splits.
    pub total_owed: Money,
    pub net_balance: Money,
    /// Expenses the user paid for or takes part in.
    pub expense_count: usize,
    /// Amount paid by this user, per category.
    pub by_category: BTreeMap<String, Money>,
}

/// Expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub total_expenses: Money,
    pub expense_count: usize,
    pub by_category: BTreeMap<String, Money>,
    /// Category with the largest total; empty when the month has no expenses.
    pub top_category: String,
    pub average_per_day: Money,
}

/// Computes statistics for `user_id`.
///
/// # Errors
///
/// [`LedgerError::UnknownUser`] if no expense involves the user.
pub fn user_stats(expenses: &[ExpenseRecord], user_id: &str) -> Result<UserStats> {
    let mut stats = UserStats {
        user_id: user_id.to_string(),
        total_paid: Money::ZERO,
        total_owed: Money::ZERO,
        net_balance: Money::ZERO,
        expense_count: 0,
        by_category: BTreeMap::new(),
    };

    for expense in expenses.iter().filter(|e| e.involves(user_id)) {
        stats.expense_count += 1;

        if expense.paid_by == user_id {
            stats.total_paid += expense.amount;
            *stats
                .by_category
                .entry(expense.category.clone())
                .or_default() += expense.amount;
        }

        stats.total_owed += expense
            .splits
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.amount)
            .sum::<Money>();
    }

    if stats.expense_count == 0 {
        return Err(LedgerError::UnknownUser(user_id.to_string()));
    }

    stats.net_balance = stats.total_paid - stats.total_owed;
    Ok(stats)
}

/// Summarizes the expenses dated within `year`-`month`.
///
/// # Errors
///
/// [`LedgerError::InvalidArgument`] if `month` is not in `1..=12`.
pub fn monthly_summary(expenses: &[ExpenseRecord], year: i32, month: u32) -> Result<MonthlySummary> {
    let days = days_in_month(year, month)
        .ok_or_else(|| LedgerError::invalid_argument("month must be between 1 and 12"))?;

    let mut total = Money::ZERO;
    let mut count = 0;
    let mut by_category: BTreeMap<String, Money> = BTreeMap::new();

    for expense in expenses
        .iter()
        .filter(|e| e.date.year() == year && e.date.month() == month)
    {
        total += expense.amount;
        count += 1;
        *by_category.entry(expense.category.clone()).or_default() += expense.amount;
    }

    // Ascending iteration, so a strict comparison keeps the smallest name on ties.
    let mut top: Option<(&String, Money)> = None;
    for (category, amount) in &by_category {
        if top.map_or(true, |(_, best)| *amount > best) {
            top = Some((category, *amount));
        }
    }
    let top_category = top.map(|(c, _)| c.clone()).unwrap_or_default();

    let average_per_day =
        NonZeroUsize::new(days as usize).map_or(Money::ZERO, |d| total.share_of(d));

    Ok(MonthlySummary {
        year,
        month,
        total_expenses: total,
        expense_count: count,
        by_category,
        top_category,
        average_per_day,
    })
}

/// Returns every `(year, month)` that has at least one expense, ascending.
pub fn active_months(expenses: &[ExpenseRecord]) -> Vec<(i32, u32)> {
    let mut months: Vec<(i32, u32)> = expenses
        .iter()
        .map(|e| (e.date.year(), e.date.month()))
        .collect();
    months.sort_unstable();
    months.dedup();
    months
}

fn days_in_month(year: i32, month: u32) -> Option<i64> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days())
}
