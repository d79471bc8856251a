//! Ledger row models for CSV parsing.

use crate::expense::UserId;
use crate::money::Money;
use chrono::NaiveDate;
use serde::Deserialize;
use std::str::FromStr;

/// Raw ledger row as read from CSV.
///
/// Every field after `kind` and `expense` is optional because each row kind
/// only uses a subset of the columns.
#[derive(Debug, Deserialize)]
pub struct LedgerRecord {
    /// Row kind: expense, split, share
    pub kind: String,

    /// Expense ID the row belongs to
    pub expense: String,

    /// Payer for `expense` rows, participant for `split` and `share` rows
    #[serde(default)]
    pub user: Option<String>,

    /// Expense total for `expense` rows, owed amount for `split` rows
    #[serde(default)]
    pub amount: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    /// Expense date, `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
}

impl LedgerRecord {
    /// Parses the raw CSV row into a typed row.
    ///
    /// Returns a description of the problem if the row is unusable.
    pub fn parse(&self) -> Result<ParsedRow, String> {
        let expense_id = self.expense.trim();
        if expense_id.is_empty() {
            return Err("missing expense ID".to_string());
        }

        let kind = match self.kind.trim().to_lowercase().as_str() {
            "expense" => RowKind::Expense {
                paid_by: self.required_user()?,
                amount: self.required_amount()?,
                description: text(&self.description),
                category: text(&self.category),
                date: self.parse_date()?,
            },
            "split" => RowKind::Split {
                user: self.required_user()?,
                amount: self.required_amount()?,
            },
            "share" => RowKind::Share {
                user: self.required_user()?,
            },
            other => return Err(format!("unknown row kind '{}'", other)),
        };

        Ok(ParsedRow {
            expense_id: expense_id.to_string(),
            kind,
        })
    }

    fn required_user(&self) -> Result<UserId, String> {
        let user = text(&self.user);
        if user.is_empty() {
            return Err("missing user".to_string());
        }
        Ok(user)
    }

    fn required_amount(&self) -> Result<Money, String> {
        let raw = text(&self.amount);
        if raw.is_empty() {
            return Err("missing amount".to_string());
        }
        let amount =
            Money::from_str(&raw).map_err(|e| format!("invalid amount '{}': {}", raw, e))?;
        if !amount.is_within_bounds() {
            return Err(format!("amount '{}' is out of range", raw));
        }
        Ok(amount)
    }

    /// Missing dates default to 1970-01-01.
    fn parse_date(&self) -> Result<NaiveDate, String> {
        let raw = text(&self.date);
        if raw.is_empty() {
            return Ok(NaiveDate::default());
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{}': {}", raw, e))
    }
}

fn text(field: &Option<String>) -> String {
    field.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// A parsed ledger row ready for processing.
#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub expense_id: String,
    pub kind: RowKind,
}

/// Row variants with associated data.
#[derive(Debug, Clone)]
pub enum RowKind {
    /// Opens an expense paid by `paid_by`.
    Expense {
        paid_by: UserId,
        amount: Money,
        description: String,
        category: String,
        date: NaiveDate,
    },

    /// An explicit amount owed by `user`.
    Split { user: UserId, amount: Money },

    /// `user` takes an equal share of the expense.
    Share { user: UserId },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, user: Option<&str>, amount: Option<&str>) -> LedgerRecord {
        LedgerRecord {
            kind: kind.to_string(),
            expense: "e1".to_string(),
            user: user.map(str::to_string),
            amount: amount.map(str::to_string),
            description: Some("Dinner".to_string()),
            category: Some("food".to_string()),
            date: Some("2025-11-05".to_string()),
        }
    }

    #[test]
    fn test_parse_expense() {
        let parsed = record("expense", Some("alice"), Some("100")).parse().unwrap();
        assert_eq!(parsed.expense_id, "e1");
        match parsed.kind {
            RowKind::Expense {
                paid_by,
                amount,
                description,
                category,
                date,
            } => {
                assert_eq!(paid_by, "alice");
                assert_eq!(amount.to_string(), "100.00");
                assert_eq!(description, "Dinner");
                assert_eq!(category, "food");
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 11, 5).unwrap());
            }
            _ => panic!("Expected Expense"),
        }
    }

    #[test]
    fn test_parse_split() {
        let parsed = record("split", Some("bob"), Some("33.3")).parse().unwrap();
        match parsed.kind {
            RowKind::Split { user, amount } => {
                assert_eq!(user, "bob");
                assert_eq!(amount.to_string(), "33.30");
            }
            _ => panic!("Expected Split"),
        }
    }

    #[test]
    fn test_parse_share_ignores_amount() {
        let parsed = record("share", Some("carol"), None).parse().unwrap();
        assert!(matches!(parsed.kind, RowKind::Share { ref user } if user == "carol"));
    }

    #[test]
    fn test_parse_handles_whitespace_and_case() {
        let parsed = record("  Expense ", Some(" alice "), Some(" 10.0 "))
            .parse()
            .unwrap();
        match parsed.kind {
            RowKind::Expense {
                paid_by, amount, ..
            } => {
                assert_eq!(paid_by, "alice");
                assert_eq!(amount.to_string(), "10.00");
            }
            _ => panic!("Expected Expense"),
        }
    }

    #[test]
    fn test_missing_date_defaults_to_epoch() {
        let mut r = record("expense", Some("alice"), Some("1"));
        r.date = None;
        match r.parse().unwrap().kind {
            RowKind::Expense { date, .. } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
            }
            _ => panic!("Expected Expense"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_rows() {
        assert!(record("refund", Some("a"), Some("1")).parse().is_err());
        assert!(record("split", None, Some("1")).parse().is_err());
        assert!(record("split", Some("a"), None).parse().is_err());
        assert!(record("expense", Some("a"), Some("ten")).parse().is_err());

        let mut bad_date = record("expense", Some("a"), Some("1"));
        bad_date.date = Some("05/11/2025".to_string());
        assert!(bad_date.parse().is_err());

        let huge = "79228162514264337593543950335";
        assert_eq!(
            record("split", Some("a"), Some(huge)).parse().unwrap_err(),
            format!("amount '{}' is out of range", huge)
        );
        assert!(record("expense", Some("a"), Some("-92233720368547758.08"))
            .parse()
            .is_err());
        assert!(record("expense", Some("a"), Some("92233720368547758.07"))
            .parse()
            .is_ok());

        let mut no_id = record("share", Some("a"), None);
        no_id.expense = " ".to_string();
        assert!(no_id.parse().is_err());
    }
}
