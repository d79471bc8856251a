//! Net position of every user across a set of expenses.
//!
//! The aggregation is zero-sum: every expense credits its payer with exactly
//! what it debits from its participants, as long as the splits add up.

use crate::expense::{ExpenseRecord, UserId};
use crate::money::Money;
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeMap;

/// A user's net position.
///
/// Positive means the group owes this user; negative means the user owes the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub user_id: UserId,
    pub amount: Money,
}

impl Balance {
    pub fn new(user_id: impl Into<UserId>, amount: Money) -> Self {
        Balance {
            user_id: user_id.into(),
            amount,
        }
    }
}

/// Computes every user's net balance.
///
/// Each expense credits `paid_by` with its amount and debits every split
/// participant with their split. A payer who also takes part in the split
/// receives both entries. Users with no activity never appear.
///
/// Balances are returned sorted by user ID.
pub fn compute_balances(expenses: &[ExpenseRecord]) -> Vec<Balance> {
    let mut net: BTreeMap<&str, Money> = BTreeMap::new();

    for expense in expenses {
        *net.entry(expense.paid_by.as_str()).or_default() += expense.amount;
        for split in &expense.splits {
            *net.entry(split.user_id.as_str()).or_default() -= split.amount;
        }
    }

    let balances: Vec<Balance> = net
        .into_iter()
        .map(|(user, amount)| Balance::new(user, amount))
        .collect();

    debug!(
        "Aggregated {} expenses into {} balances",
        expenses.len(),
        balances.len()
    );

    if let Some(residual) = imbalance(&balances) {
        warn!(
            "Balances do not sum to zero (residual {}); some expenses have splits that do not match their amount",
            residual
        );
    }

    balances
}

/// Returns the sum of all balances when it is not zero.
///
/// Balances derived from consistent expenses always sum to zero, so a
/// residual points at an input integrity problem.
pub fn imbalance(balances: &[Balance]) -> Option<Money> {
    let residual: Money = balances.iter().map(|b| b.amount).sum();
    if residual.is_zero() {
        None
    } else {
        Some(residual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::SplitEntry;
    use chrono::NaiveDate;

    fn expense(paid_by: &str, amount: i64, splits: &[(&str, i64)]) -> ExpenseRecord {
        ExpenseRecord {
            id: format!("{}-{}", paid_by, amount),
            description: "test".to_string(),
            category: "misc".to_string(),
            amount: Money::from_cents(amount),
            paid_by: paid_by.to_string(),
            splits: splits
                .iter()
                .map(|(u, c)| SplitEntry::new(*u, Money::from_cents(*c)))
                .collect(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_payer_in_split_nets_partially() {
        let balances = compute_balances(&[expense("a", 10_000, &[("a", 5_000), ("b", 5_000)])]);
        assert_eq!(
            balances,
            vec![
                Balance::new("a", Money::from_cents(5_000)),
                Balance::new("b", Money::from_cents(-5_000)),
            ]
        );
    }

    #[test]
    fn test_payer_outside_split_is_fully_credited() {
        let balances = compute_balances(&[expense("a", 3_000, &[("b", 1_500), ("c", 1_500)])]);
        assert_eq!(balances[0], Balance::new("a", Money::from_cents(3_000)));
        assert_eq!(balances[1], Balance::new("b", Money::from_cents(-1_500)));
        assert_eq!(balances[2], Balance::new("c", Money::from_cents(-1_500)));
    }

    #[test]
    fn test_multiple_expenses_accumulate() {
        let balances = compute_balances(&[
            expense("a", 10_000, &[("a", 5_000), ("b", 5_000)]),
            expense("b", 6_000, &[("a", 3_000), ("b", 3_000)]),
        ]);
        assert_eq!(balances[0], Balance::new("a", Money::from_cents(2_000)));
        assert_eq!(balances[1], Balance::new("b", Money::from_cents(-2_000)));
    }

    #[test]
    fn test_self_paid_expense_yields_zero_balance() {
        let balances = compute_balances(&[expense("a", 2_000, &[("a", 2_000)])]);
        assert_eq!(balances, vec![Balance::new("a", Money::ZERO)]);
    }

    #[test]
    fn test_no_expenses_no_balances() {
        assert!(compute_balances(&[]).is_empty());
    }

    #[test]
    fn test_output_sorted_by_user() {
        let balances = compute_balances(&[
            expense("zoe", 900, &[("mia", 300), ("bob", 300), ("zoe", 300)]),
        ]);
        let users: Vec<&str> = balances.iter().map(|b| b.user_id.as_str()).collect();
        assert_eq!(users, vec!["bob", "mia", "zoe"]);
    }

    #[test]
    fn test_imbalance_detects_residual() {
        let balances = compute_balances(&[expense("a", 10_000, &[("b", 9_999)])]);
        assert_eq!(imbalance(&balances), Some(Money::from_cents(1)));

        let balanced = compute_balances(&[expense("a", 10_000, &[("b", 10_000)])]);
        assert_eq!(imbalance(&balanced), None);
    }
}
