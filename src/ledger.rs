//! CSV expense ledger processing.
//!
//! Reads ledger rows in streaming fashion, assembles them into validated
//! expense records and writes balance, settlement and statistics reports.

use crate::allocator::{allocate_custom_split, allocate_equal_split};
use crate::error::{LedgerError, Result};
use crate::expense::{ExpenseRecord, SplitEntry, UserId};
use crate::money::Money;
use crate::record::{LedgerRecord, ParsedRow, RowKind};
use crate::query::{filter_expenses, ExpenseFilter};
use crate::report::{
    write_balances, write_expenses, write_monthly, write_settlements, write_stats, Report,
};
use crate::settlement::{summarize, BalanceSummary};
use crate::stats::{monthly_summary, user_stats, MonthlySummary, UserStats};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};

/// How an expense's cost is divided.
#[derive(Debug)]
enum Division {
    /// No `split` or `share` rows seen yet.
    Undecided,
    Custom(Vec<SplitEntry>),
    Equal(Vec<UserId>),
}

/// An expense whose rows are still being read.
#[derive(Debug)]
struct ExpenseDraft {
    id: String,
    description: String,
    category: String,
    amount: Money,
    paid_by: UserId,
    date: NaiveDate,
    division: Division,
    row: usize,
}

impl ExpenseDraft {
    /// Allocates the splits and validates the resulting record.
    fn finalize(self) -> Result<ExpenseRecord> {
        let splits = match self.division {
            Division::Undecided => Vec::new(),
            Division::Custom(splits) => allocate_custom_split(self.amount, splits)?,
            Division::Equal(participants) => allocate_equal_split(self.amount, &participants)?,
        };

        let record = ExpenseRecord {
            id: self.id,
            description: self.description,
            category: self.category,
            amount: self.amount,
            paid_by: self.paid_by,
            splits,
            date: self.date,
        };
        record.validate()?;
        Ok(record)
    }
}

/// The expense ledger.
///
/// Holds validated expenses in the order they were opened. Every report is
/// recomputed from this snapshot.
pub struct Ledger {
    expenses: Vec<ExpenseRecord>,

    /// IDs of accepted expenses. A rejected draft's ID stays free for a corrected retry.
    seen_ids: HashSet<String>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Ledger {
            expenses: Vec::new(),
            seen_ids: HashSet::new(),
        }
    }

    /// Processes ledger rows from a CSV reader.
    ///
    /// `split` and `share` rows may appear anywhere after the `expense` row
    /// they reference. Invalid rows are logged at warn level and skipped;
    /// expenses that fail validation once all rows are read are logged and
    /// dropped.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut drafts: Vec<ExpenseDraft> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (row_idx, result) in csv_reader.deserialize::<LedgerRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => match record.parse() {
                    Ok(parsed) => {
                        match self.process_row(parsed, row_num, &mut drafts, &mut index) {
                            Ok(()) => {}
                            Err(e @ LedgerError::InvalidRecord { .. }) => warn!("{}", e),
                            Err(e) => warn!("Row {}: {}", row_num, e),
                        }
                    }
                    Err(message) => {
                        warn!(
                            "{}",
                            LedgerError::InvalidRecord {
                                row: row_num,
                                message
                            }
                        );
                    }
                },
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        for draft in drafts {
            let (id, row) = (draft.id.clone(), draft.row);
            match draft.finalize() {
                Ok(record) => {
                    debug!(
                        "Expense {}: {} paid {} split {} ways",
                        record.id,
                        record.paid_by,
                        record.amount,
                        record.splits.len()
                    );
                    self.seen_ids.insert(record.id.clone());
                    self.expenses.push(record);
                }
                Err(e) => warn!("Row {}: Dropping expense {}: {}", row, id, e),
            }
        }

        Ok(())
    }

    /// Applies a single parsed row to the open drafts.
    fn process_row(
        &mut self,
        row: ParsedRow,
        row_num: usize,
        drafts: &mut Vec<ExpenseDraft>,
        index: &mut HashMap<String, usize>,
    ) -> Result<()> {
        let ParsedRow { expense_id, kind } = row;

        match kind {
            RowKind::Expense {
                paid_by,
                amount,
                description,
                category,
                date,
            } => {
                if index.contains_key(&expense_id) || self.seen_ids.contains(&expense_id) {
                    return Err(LedgerError::DuplicateExpense(expense_id));
                }
                index.insert(expense_id.clone(), drafts.len());
                drafts.push(ExpenseDraft {
                    id: expense_id,
                    description,
                    category,
                    amount,
                    paid_by,
                    date,
                    division: Division::Undecided,
                    row: row_num,
                });
            }
            RowKind::Split { user, amount } => {
                let draft = Self::draft_for(&expense_id, row_num, drafts, index)?;
                match draft.division {
                    Division::Undecided => {
                        draft.division = Division::Custom(vec![SplitEntry::new(user, amount)]);
                    }
                    Division::Custom(ref mut splits) => splits.push(SplitEntry::new(user, amount)),
                    Division::Equal(_) => {
                        return Err(LedgerError::InvalidRecord {
                            row: row_num,
                            message: format!(
                                "expense {} already uses equal shares, ignoring split",
                                expense_id
                            ),
                        });
                    }
                }
            }
            RowKind::Share { user } => {
                let draft = Self::draft_for(&expense_id, row_num, drafts, index)?;
                match draft.division {
                    Division::Undecided => draft.division = Division::Equal(vec![user]),
                    Division::Equal(ref mut participants) => {
                        if participants.contains(&user) {
                            debug!(
                                "Row {}: {} already shares expense {}, ignoring",
                                row_num, user, expense_id
                            );
                        } else {
                            participants.push(user);
                        }
                    }
                    Division::Custom(_) => {
                        return Err(LedgerError::InvalidRecord {
                            row: row_num,
                            message: format!(
                                "expense {} already uses custom splits, ignoring share",
                                expense_id
                            ),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    fn draft_for<'a>(
        expense_id: &str,
        row_num: usize,
        drafts: &'a mut [ExpenseDraft],
        index: &HashMap<String, usize>,
    ) -> Result<&'a mut ExpenseDraft> {
        index
            .get(expense_id)
            .and_then(|&i| drafts.get_mut(i))
            .ok_or_else(|| LedgerError::InvalidRecord {
                row: row_num,
                message: format!("unknown expense {}", expense_id),
            })
    }

    /// Adds an already assembled expense.
    ///
    /// # Errors
    ///
    /// [`LedgerError::DuplicateExpense`] if the ID is taken, or the record's
    /// validation error.
    pub fn add_expense(&mut self, expense: ExpenseRecord) -> Result<()> {
        expense.validate()?;
        if !self.seen_ids.insert(expense.id.clone()) {
            return Err(LedgerError::DuplicateExpense(expense.id));
        }
        self.expenses.push(expense);
        Ok(())
    }

    /// Validated expenses in the order they were opened.
    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    /// Balances and settlements over every expense.
    pub fn summary(&self) -> BalanceSummary {
        summarize(&self.expenses)
    }

    pub fn user_stats(&self, user_id: &str) -> Result<UserStats> {
        user_stats(&self.expenses, user_id)
    }

    pub fn monthly_summary(&self, year: i32, month: u32) -> Result<MonthlySummary> {
        monthly_summary(&self.expenses, year, month)
    }

    /// Writes the requested report as CSV.
    ///
    /// All monetary values are formatted with exactly 2 decimal places.
    pub fn write_output<W: Write>(&self, report: Report, writer: W) -> Result<()> {
        self.write_filtered(report, &ExpenseFilter::default(), writer)
    }

    /// Writes the requested report over the expenses selected by `filter`.
    ///
    /// Balances and settlements are recomputed from the selection alone.
    ///
    /// # Errors
    ///
    /// The filter's [`LedgerError::InvalidArgument`] before anything is written.
    pub fn write_filtered<W: Write>(
        &self,
        report: Report,
        filter: &ExpenseFilter,
        writer: W,
    ) -> Result<()> {
        let selected: Vec<ExpenseRecord> = if filter.is_empty() {
            self.expenses.clone()
        } else {
            filter_expenses(&self.expenses, filter)?
                .into_iter()
                .cloned()
                .collect()
        };
        debug!(
            "Writing {:?} report over {} of {} expenses",
            report,
            selected.len(),
            self.expenses.len()
        );

        match report {
            Report::Balances => write_balances(&summarize(&selected), writer),
            Report::Settlements => write_settlements(&summarize(&selected), writer),
            Report::Stats => write_stats(&selected, writer),
            Report::Monthly => write_monthly(&selected, writer),
            Report::Expenses => write_expenses(&selected, writer),
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
