//! Selecting expenses by participant, category and date.

use crate::error::{LedgerError, Result};
use crate::expense::{ExpenseRecord, UserId};
use chrono::NaiveDate;

/// Optional criteria an expense must all meet.
///
/// Date bounds are inclusive and must be given together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Payer or split participant.
    pub user: Option<UserId>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ExpenseFilter {
    /// Returns `true` if no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.user.is_none()
            && self.category.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Sets one criterion from a `key=value` argument.
    ///
    /// Keys: `user`, `category`, `from`, `to`. Dates are `YYYY-MM-DD`.
    pub fn apply_arg(&mut self, arg: &str) -> Result<()> {
        let (key, value) = arg.split_once('=').ok_or_else(|| {
            LedgerError::invalid_argument(format!("expected key=value, got '{}'", arg))
        })?;
        let value = value.trim();

        match key.trim().to_lowercase().as_str() {
            "user" => self.user = Some(value.to_string()),
            "category" => self.category = Some(value.to_string()),
            "from" => self.start_date = Some(parse_date(value)?),
            "to" => self.end_date = Some(parse_date(value)?),
            other => {
                return Err(LedgerError::invalid_argument(format!(
                    "unknown filter '{}', expected user, category, from or to",
                    other
                )))
            }
        }
        Ok(())
    }

    fn matches(&self, expense: &ExpenseRecord) -> bool {
        self.user.as_deref().map_or(true, |u| expense.involves(u))
            && self
                .category
                .as_deref()
                .map_or(true, |c| expense.category == c)
            && self.start_date.map_or(true, |start| expense.date >= start)
            && self.end_date.map_or(true, |end| expense.date <= end)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| LedgerError::invalid_argument(format!("invalid date '{}': {}", value, e)))
}

/// Expenses matching every criterion of `filter`, in input order.
///
/// An empty filter selects everything.
///
/// # Errors
///
/// [`LedgerError::InvalidArgument`] if the category is blank, only one date
/// bound is given, or the start date is after the end date.
pub fn filter_expenses<'a>(
    expenses: &'a [ExpenseRecord],
    filter: &ExpenseFilter,
) -> Result<Vec<&'a ExpenseRecord>> {
    if filter
        .category
        .as_deref()
        .is_some_and(|c| c.trim().is_empty())
    {
        return Err(LedgerError::invalid_argument("category is required"));
    }
    match (filter.start_date, filter.end_date) {
        (Some(start), Some(end)) if start > end => {
            return Err(LedgerError::invalid_argument(
                "start_date must not be after end_date",
            ));
        }
        (Some(_), None) | (None, Some(_)) => {
            return Err(LedgerError::invalid_argument(
                "both start_date and end_date must be provided together",
            ));
        }
        _ => {}
    }

    Ok(expenses.iter().filter(|e| filter.matches(e)).collect())
}

/// Expenses the user paid for or takes part in.
///
/// # Errors
///
/// [`LedgerError::UnknownUser`] if no expense involves the user.
pub fn expenses_by_user<'a>(
    expenses: &'a [ExpenseRecord],
    user_id: &str,
) -> Result<Vec<&'a ExpenseRecord>> {
    let selected: Vec<&ExpenseRecord> = expenses.iter().filter(|e| e.involves(user_id)).collect();
    if selected.is_empty() {
        return Err(LedgerError::UnknownUser(user_id.to_string()));
    }
    Ok(selected)
}

/// # Errors
///
/// [`LedgerError::InvalidArgument`] if `category` is blank.
pub fn expenses_by_category<'a>(
    expenses: &'a [ExpenseRecord],
    category: &str,
) -> Result<Vec<&'a ExpenseRecord>> {
    if category.trim().is_empty() {
        return Err(LedgerError::invalid_argument("category is required"));
    }
    Ok(expenses.iter().filter(|e| e.category == category).collect())
}

/// Expenses dated between `start` and `end`, both inclusive.
///
/// # Errors
///
/// [`LedgerError::InvalidArgument`] if either bound is missing or `start` is after `end`.
pub fn expenses_by_date_range<'a>(
    expenses: &'a [ExpenseRecord],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<&'a ExpenseRecord>> {
    let (Some(start), Some(end)) = (start, end) else {
        return Err(LedgerError::invalid_argument(
            "both start_date and end_date are required",
        ));
    };
    filter_expenses(
        expenses,
        &ExpenseFilter {
            start_date: Some(start),
            end_date: Some(end),
            ..ExpenseFilter::default()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::SplitEntry;
    use crate::money::Money;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(id: &str, paid_by: &str, category: &str, day: u32, split_with: &str) -> ExpenseRecord {
        ExpenseRecord {
            id: id.to_string(),
            description: id.to_string(),
            category: category.to_string(),
            amount: Money::from_cents(1_000),
            paid_by: paid_by.to_string(),
            splits: vec![SplitEntry::new(split_with, Money::from_cents(1_000))],
            date: date(2025, 11, day),
        }
    }

    fn sample() -> Vec<ExpenseRecord> {
        vec![
            expense("groceries", "u1", "food", 5, "u1"),
            expense("movie", "u1", "entertainment", 15, "u2"),
            expense("pizza", "u2", "food", 30, "u3"),
        ]
    }

    fn ids(selected: Vec<&ExpenseRecord>) -> Vec<&str> {
        selected.into_iter().map(|e| e.id.as_str()).collect()
    }

    fn invalid_argument(result: Result<Vec<&ExpenseRecord>>) -> String {
        match result {
            Err(LedgerError::InvalidArgument(message)) => message,
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_filter_selects_everything() {
        let expenses = sample();
        let filter = ExpenseFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter_expenses(&expenses, &filter).unwrap().len(), 3);
    }

    #[test]
    fn test_filter_by_category() {
        let expenses = sample();
        let filter = ExpenseFilter {
            category: Some("food".to_string()),
            ..ExpenseFilter::default()
        };
        assert_eq!(
            ids(filter_expenses(&expenses, &filter).unwrap()),
            vec!["groceries", "pizza"]
        );
    }

    #[test]
    fn test_filter_combines_user_category_and_dates() {
        let expenses = sample();
        let filter = ExpenseFilter {
            user: Some("u2".to_string()),
            category: Some("food".to_string()),
            start_date: Some(date(2025, 11, 1)),
            end_date: Some(date(2025, 11, 30)),
        };
        assert_eq!(ids(filter_expenses(&expenses, &filter).unwrap()), vec!["pizza"]);
    }

    #[test]
    fn test_filter_rejects_blank_category() {
        let expenses = sample();
        let filter = ExpenseFilter {
            category: Some(" ".to_string()),
            ..ExpenseFilter::default()
        };
        assert_eq!(
            invalid_argument(filter_expenses(&expenses, &filter)),
            "category is required"
        );
    }

    #[test]
    fn test_filter_rejects_single_date_bound() {
        let expenses = sample();
        let filter = ExpenseFilter {
            start_date: Some(date(2025, 11, 1)),
            ..ExpenseFilter::default()
        };
        assert_eq!(
            invalid_argument(filter_expenses(&expenses, &filter)),
            "both start_date and end_date must be provided together"
        );
    }

    #[test]
    fn test_filter_rejects_inverted_range() {
        let expenses = sample();
        let filter = ExpenseFilter {
            start_date: Some(date(2025, 11, 30)),
            end_date: Some(date(2025, 11, 1)),
            ..ExpenseFilter::default()
        };
        assert_eq!(
            invalid_argument(filter_expenses(&expenses, &filter)),
            "start_date must not be after end_date"
        );
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let expenses = sample();
        let selected =
            expenses_by_date_range(&expenses, Some(date(2025, 11, 5)), Some(date(2025, 11, 15)))
                .unwrap();
        assert_eq!(ids(selected), vec!["groceries", "movie"]);
    }

    #[test]
    fn test_date_range_requires_both_bounds() {
        let expenses = sample();
        assert_eq!(
            invalid_argument(expenses_by_date_range(&expenses, None, Some(date(2025, 11, 1)))),
            "both start_date and end_date are required"
        );
        assert_eq!(
            invalid_argument(expenses_by_date_range(&expenses, None, None)),
            "both start_date and end_date are required"
        );
    }

    #[test]
    fn test_by_category() {
        let expenses = sample();
        assert_eq!(
            ids(expenses_by_category(&expenses, "entertainment").unwrap()),
            vec!["movie"]
        );
        assert_eq!(
            invalid_argument(expenses_by_category(&expenses, "")),
            "category is required"
        );
    }

    #[test]
    fn test_by_user_includes_split_participation() {
        let expenses = sample();
        assert_eq!(
            ids(expenses_by_user(&expenses, "u2").unwrap()),
            vec!["movie", "pizza"]
        );
        assert!(matches!(
            expenses_by_user(&expenses, "nobody"),
            Err(LedgerError::UnknownUser(ref u)) if u == "nobody"
        ));
    }

    #[test]
    fn test_apply_arg() {
        let mut filter = ExpenseFilter::default();
        filter.apply_arg("user=alice").unwrap();
        filter.apply_arg("category = food").unwrap();
        filter.apply_arg("from=2025-11-01").unwrap();
        filter.apply_arg("to=2025-11-30").unwrap();
        assert_eq!(
            filter,
            ExpenseFilter {
                user: Some("alice".to_string()),
                category: Some("food".to_string()),
                start_date: Some(date(2025, 11, 1)),
                end_date: Some(date(2025, 11, 30)),
            }
        );

        assert!(filter.apply_arg("from=11/01/2025").is_err());
        assert!(filter.apply_arg("payer=bob").is_err());
        assert!(filter.apply_arg("food").is_err());
    }
}
