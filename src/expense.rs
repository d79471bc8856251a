//! Expense records and their splits.
//!
//! Records are plain values: whoever loaded them (a database, a CSV ledger)
//! hands the balance engine read-only snapshots.

use crate::allocator::allocate_custom_split;
use crate::error::{LedgerError, Result};
use crate::money::Money;
use chrono::NaiveDate;
use serde::Serialize;

/// Identifier of a participant.
pub type UserId = String;

/// The portion of one expense owed by one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitEntry {
    pub user_id: UserId,
    pub amount: Money,
}

impl SplitEntry {
    pub fn new(user_id: impl Into<UserId>, amount: Money) -> Self {
        SplitEntry {
            user_id: user_id.into(),
            amount,
        }
    }
}

/// A shared expense: who paid, how much, and how the cost is split.
///
/// # Invariants
///
/// A validated record has a positive `amount`, a payer, at least one split,
/// and splits summing to `amount` within [`Money::TOLERANCE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseRecord {
    pub id: String,
    pub description: String,
    pub category: String,
    pub amount: Money,
    pub paid_by: UserId,
    pub splits: Vec<SplitEntry>,
    pub date: NaiveDate,
}

impl ExpenseRecord {
    /// Checks the record's invariants.
    ///
    /// The first violated rule is reported as [`LedgerError::Validation`].
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(LedgerError::validation("expense description is required"));
        }
        if !self.amount.is_positive() {
            return Err(LedgerError::validation(
                "expense amount must be greater than zero",
            ));
        }
        if !self.amount.is_within_bounds() {
            return Err(LedgerError::validation("expense amount is out of range"));
        }
        if self.paid_by.trim().is_empty() {
            return Err(LedgerError::validation("paidBy is required"));
        }
        if self.splits.is_empty() {
            return Err(LedgerError::validation("at least one split is required"));
        }
        if self.splits.iter().any(|s| !s.amount.is_within_bounds()) {
            return Err(LedgerError::validation("split amount is out of range"));
        }
        allocate_custom_split(self.amount, self.splits.clone()).map(|_| ())
    }

    /// Returns `true` if the user paid for or shares in this expense.
    pub fn involves(&self, user_id: &str) -> bool {
        self.paid_by == user_id || self.splits.iter().any(|s| s.user_id == user_id)
    }

    /// Sum of the split amounts.
    pub fn split_total(&self) -> Money {
        self.splits.iter().map(|s| s.amount).sum()
    }
}
