//! # Homies Ledger
//!
//! Shared-expense splitting and settlement for a group of people.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: Money carries exactly 2 decimal places via `rust_decimal`
//! - **Exact splits**: Equal splits always sum to the expense amount; the last
//!   participant absorbs the rounding remainder
//! - **Pure core**: Allocation, aggregation and settlement are stateless functions
//!   over value data
//! - **Deterministic output**: Balances sorted by user ID, settlements in FIFO match order
//!
//! ## Example
//!
//! ```
//! use homies_ledger::{allocate_equal_split, summarize, ExpenseRecord, Money};
//!
//! let people = vec!["alice".to_string(), "bob".to_string()];
//! let expense = ExpenseRecord {
//!     id: "e1".to_string(),
//!     description: "Dinner".to_string(),
//!     category: "food".to_string(),
//!     amount: Money::from_cents(10_000),
//!     paid_by: "alice".to_string(),
//!     splits: allocate_equal_split(Money::from_cents(10_000), &people).unwrap(),
//!     date: chrono::NaiveDate::from_ymd_opt(2025, 11, 5).unwrap(),
//! };
//!
//! let summary = summarize(&[expense]);
//! assert_eq!(summary.settlements[0].from, "bob");
//! assert_eq!(summary.settlements[0].amount.to_string(), "50.00");
//! ```

pub mod allocator;
pub mod balance;
pub mod error;
pub mod expense;
pub mod ledger;
pub mod money;
pub mod query;
pub mod record;
pub mod report;
pub mod settlement;
pub mod stats;

pub use allocator::{allocate_custom_split, allocate_equal_split};
pub use balance::{compute_balances, imbalance, Balance};
pub use error::{LedgerError, Result};
pub use expense::{ExpenseRecord, SplitEntry, UserId};
pub use ledger::Ledger;
pub use money::Money;
pub use query::{
    expenses_by_category, expenses_by_date_range, expenses_by_user, filter_expenses, ExpenseFilter,
};
pub use record::{LedgerRecord, ParsedRow, RowKind};
pub use report::Report;
pub use settlement::{reduce_to_settlements, summarize, BalanceSummary, Settlement};
pub use stats::{monthly_summary, user_stats, MonthlySummary, UserStats};
