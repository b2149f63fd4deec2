//! Summaries of expenses: totals per category, totals per month, and sorting by amount.
//!
//! These functions do no I/O and only look at the expenses they are given.

use std::{collections::HashMap, fmt::Display, str::FromStr};

use time::{Date, Month};

use crate::{Error, expense::Expense};

/// The total amount spent in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category name, exactly as entered.
    pub category: String,
    /// The sum of the amounts of every expense in the category.
    pub total: f64,
}

/// A calendar month, written as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    /// Create the month `month` of `year`.
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Whether `date` falls in this month.
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parse a month in the format `YYYY-MM`, e.g. "2024-03".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(s.to_owned());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;

        if year.len() != 4
            || month.len() != 2
            || !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        Ok(Self::new(year, month))
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, u8::from(self.month))
    }
}

/// Sum the amount spent in each category.
///
/// Categories are listed in the order they first appear in `expenses`. Only
/// categories that appear in `expenses` are included.
pub fn category_summary(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index_by_category: HashMap<&str, usize> = HashMap::new();

    for expense in expenses {
        let index = *index_by_category
            .entry(expense.category.as_str())
            .or_insert_with(|| {
                totals.push(CategoryTotal {
                    category: expense.category.clone(),
                    total: 0.0,
                });
                totals.len() - 1
            });

        totals[index].total += expense.amount;
    }

    totals
}

/// Sum the amount spent in `month`.
pub fn monthly_summary(expenses: &[Expense], month: YearMonth) -> f64 {
    expenses
        .iter()
        .filter(|expense| month.contains(expense.date))
        .map(|expense| expense.amount)
        .sum()
}

/// Sort `expenses` by amount, largest first.
///
/// The sort is stable: expenses with the same amount keep their relative order.
pub fn sort_by_amount_descending(mut expenses: Vec<Expense>) -> Vec<Expense> {
    expenses.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    expenses
}
