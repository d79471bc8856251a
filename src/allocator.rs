//! Split allocation: turning a total into per-participant owed amounts.

use crate::error::{LedgerError, Result};
use crate::expense::{SplitEntry, UserId};
use crate::money::Money;
use log::debug;
use std::num::NonZeroUsize;

/// Divides `total` evenly among `participants`.
///
/// Every participant except the last owes `total / n` rounded to the cent.
/// The last participant owes whatever is left, so the shares always sum to
/// `total` exactly. Which participant absorbs the rounding remainder depends
/// only on the order of `participants`.
///
/// # Errors
///
/// [`LedgerError::InvalidArgument`] if `participants` is empty.
///
/// # Examples
///
/// ```
/// use homies_ledger::{allocate_equal_split, Money};
///
/// let people = vec!["a".to_string(), "b".to_string(), "c".to_string()];
/// let splits = allocate_equal_split(Money::from_cents(10_000), &people).unwrap();
/// assert_eq!(splits[0].amount.to_string(), "33.33");
/// assert_eq!(splits[2].amount.to_string(), "33.34");
/// ```
pub fn allocate_equal_split(total: Money, participants: &[UserId]) -> Result<Vec<SplitEntry>> {
    let [rest @ .., last] = participants else {
        return Err(LedgerError::invalid_argument(
            "at least one participant required",
        ));
    };

    let share = total.share_of(NonZeroUsize::MIN.saturating_add(rest.len()));

    let mut splits: Vec<SplitEntry> = rest
        .iter()
        .map(|user| SplitEntry::new(user.clone(), share))
        .collect();

    let remainder = total - share.times(rest.len());
    splits.push(SplitEntry::new(last.clone(), remainder));

    debug!(
        "Split {} among {} participants: share {}, last participant {}",
        total,
        participants.len(),
        share,
        remainder
    );

    Ok(splits)
}

/// Validates caller-supplied splits against `total`.
///
/// The splits are returned unchanged when their sum is within
/// [`Money::TOLERANCE`] of `total`.
///
/// # Errors
///
/// [`LedgerError::Validation`] if the sum differs from `total` by more than the tolerance.
pub fn allocate_custom_split(total: Money, splits: Vec<SplitEntry>) -> Result<Vec<SplitEntry>> {
    let sum = splits
        .iter()
        .try_fold(Money::ZERO, |acc, s| acc.checked_add(s.amount))
        .ok_or_else(|| LedgerError::validation("split amounts are too large"))?;
    if !sum.approx_eq(total) {
        debug!("Custom splits sum to {} but the amount is {}", sum, total);
        return Err(LedgerError::validation("sum of splits must equal amount"));
    }
    Ok(splits)
}
