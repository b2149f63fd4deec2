//! Defines the expense model and the database queries for expenses.

use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// The number of rows changed by an `UPDATE` or `DELETE` statement.
pub type RowsAffected = usize;

/// A single expense, i.e. an event where money was spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the database.
    pub id: ExpenseId,
    /// A short description of what the money was spent on.
    pub title: String,
    /// The amount of money spent. Always greater than zero.
    pub amount: f64,
    /// A free-form category, e.g. "Food" or "Housing".
    pub category: String,
    /// When the money was spent.
    pub date: Date,
}

/// The fields of an expense that a user supplies.
///
/// Values of this type should come from [parse_expense_form](crate::expense::form::parse_expense_form),
/// which guarantees a trimmed non-empty title and category and a positive amount.
/// The repository functions trust these invariants and do not check them again.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// A short description of what the money was spent on.
    pub title: String,
    /// The amount of money spent.
    pub amount: f64,
    /// A free-form category, e.g. "Food" or "Housing".
    pub category: String,
    /// When the money was spent.
    pub date: Date,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the expenses table in the database.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Expense].
///
/// The row must contain the columns `id, title, amount, category, date` in that order.
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let amount = row.get(2)?;
    let category = row.get(3)?;
    let date = row.get(4)?;

    Ok(Expense {
        id,
        title,
        amount,
        category,
        date,
    })
}

/// Insert a new expense. The database assigns the ID.
///
/// # Errors
/// Returns an [Error::SqlError] if the insert fails.
pub fn add_expense(expense: &NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "INSERT INTO expenses (title, amount, category, date)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, title, amount, category, date",
        )?
        .query_row(
            params![expense.title, expense.amount, expense.category, expense.date],
            map_expense_row,
        )?;

    Ok(expense)
}

/// Get every expense, most recent date first.
///
/// Expenses on the same date are ordered by ID, newest first.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, title, amount, category, date FROM expenses
             ORDER BY date DESC, id DESC",
        )?
        .query_map([], map_expense_row)?
        .map(|expense_result| expense_result.map_err(Error::from))
        .collect()
}

/// Get the expense with `id`, or `None` if there is no such expense.
///
/// # Errors
/// Returns an [Error::SqlError] if the query fails.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Option<Expense>, Error> {
    connection
        .prepare("SELECT id, title, amount, category, date FROM expenses WHERE id = :id")?
        .query_row(&[(":id", &id)], map_expense_row)
        .optional()
        .map_err(Error::from)
}

/// Replace the title, amount, category and date of the expense with `id`.
///
/// Updating an expense that does not exist is not an error, zero rows are affected.
///
/// # Errors
/// Returns an [Error::SqlError] if the update fails.
pub fn update_expense(
    id: ExpenseId,
    expense: &NewExpense,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE expenses
            SET \
                title = ?1, \
                amount = ?2, \
                category = ?3, \
                date = ?4 \
            WHERE id = ?5;",
            params![
                expense.title,
                expense.amount,
                expense.category,
                expense.date,
                id,
            ],
        )
        .map_err(Error::from)
}

/// Delete the expense with `id`.
///
/// Deleting an expense that does not exist is not an error, zero rows are affected.
///
/// # Errors
/// Returns an [Error::SqlError] if the delete fails.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM expenses WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}

// ============================================================================
// TESTS
// ============================================================================
