//! Error types for the expense ledger.

use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while splitting, validating or reporting expenses.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A caller passed an argument the operation cannot work with
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An expense or its splits failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed ledger row
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Expense ID seen twice
    #[error("Duplicate expense ID {0}")]
    DuplicateExpense(String),

    /// The user has no recorded activity
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    /// Missing input file argument
    #[error(
        "Missing input file argument. Usage: homies-ledger <ledger.csv> [balances|settlements|stats|monthly|expenses] [user=..] [category=..] [from=YYYY-MM-DD to=YYYY-MM-DD]"
    )]
    MissingArgument,

    /// Unsupported report name on the command line
    #[error("Unknown report '{0}'. Expected one of: balances, settlements, stats, monthly, expenses")]
    UnknownReport(String),
}

impl LedgerError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        LedgerError::InvalidArgument(message.into())
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }
}
