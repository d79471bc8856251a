//! Debt simplification: reducing net balances to a short list of payments.
//!
//! The reducer is a single greedy pass. Debtors and creditors are matched in
//! the order they appear in the input, which is not an optimal
//! minimum-transaction solver.

use crate::balance::{compute_balances, imbalance, Balance};
use crate::expense::{ExpenseRecord, UserId};
use crate::money::Money;
use log::{debug, warn};
use serde::Serialize;

/// A recommended payment from one user to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub from: UserId,
    pub to: UserId,
    pub amount: Money,
}

/// Balances plus the payments that would settle them.
///
/// Derived from a snapshot of expenses and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceSummary {
    pub balances: Vec<Balance>,
    pub settlements: Vec<Settlement>,
}

impl BalanceSummary {
    /// Sum of all balances. Zero when the underlying expenses are consistent.
    pub fn residual(&self) -> Money {
        self.balances.iter().map(|b| b.amount).sum()
    }
}

/// An outstanding position consumed by the reducer.
struct Position<'a> {
    user_id: &'a str,
    remaining: Money,
}

/// Reduces balances to directed payments.
///
/// Balances strictly within [`Money::TOLERANCE`] of zero are ignored.
/// The first outstanding debtor pays the first outstanding creditor
/// `min(debt, credit)`; whichever side is then settled is dropped.
/// The pass stops when either side runs out, leaving any residual unsettled.
///
/// For zero-sum input at most `debtors + creditors - 1` payments are produced.
pub fn reduce_to_settlements(balances: &[Balance]) -> Vec<Settlement> {
    let mut debtors: Vec<Position<'_>> = Vec::new();
    let mut creditors: Vec<Position<'_>> = Vec::new();

    for balance in balances {
        if balance.amount.is_negligible() {
            continue;
        }
        if balance.amount.is_negative() {
            debtors.push(Position {
                user_id: &balance.user_id,
                remaining: -balance.amount,
            });
        } else {
            creditors.push(Position {
                user_id: &balance.user_id,
                remaining: balance.amount,
            });
        }
    }

    let mut settlements = Vec::new();
    let (mut d, mut c) = (0, 0);

    while d < debtors.len() && c < creditors.len() {
        let debtor = &mut debtors[d];
        let creditor = &mut creditors[c];

        let amount = debtor.remaining.min(creditor.remaining);
        debtor.remaining -= amount;
        creditor.remaining -= amount;

        debug!(
            "Settlement: {} pays {} {}",
            debtor.user_id, creditor.user_id, amount
        );
        settlements.push(Settlement {
            from: debtor.user_id.to_string(),
            to: creditor.user_id.to_string(),
            amount,
        });

        if debtor.remaining.is_negligible() {
            d += 1;
        }
        if creditor.remaining.is_negligible() {
            c += 1;
        }
    }

    let unsettled: Money = debtors[d..]
        .iter()
        .chain(creditors[c..].iter())
        .map(|p| p.remaining)
        .sum();
    if !unsettled.is_zero() {
        warn!(
            "{} left unsettled after {} settlements; balances do not sum to zero",
            unsettled,
            settlements.len()
        );
    }

    settlements
}

/// Computes balances and settlements for a snapshot of expenses.
pub fn summarize(expenses: &[ExpenseRecord]) -> BalanceSummary {
    let balances = compute_balances(expenses);
    let settlements = reduce_to_settlements(&balances);
    if let Some(residual) = imbalance(&balances) {
        debug!("Summary carries a residual of {}", residual);
    }
    BalanceSummary {
        balances,
        settlements,
    }
}
