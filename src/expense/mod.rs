//! Expense management.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and the database functions for storing and querying expenses
//! - Validation of submitted expense forms
//! - Summaries by category and by month
//! - The dashboard, edit page and the endpoints that change expenses

mod add_endpoint;
mod core;
mod dashboard_page;
mod delete_endpoint;
mod edit_page;
pub(crate) mod form;
mod summary;
mod update_endpoint;

pub use add_endpoint::add_expense_endpoint;
pub use self::core::{
    Expense, ExpenseId, NewExpense, RowsAffected, add_expense, create_expense_table,
    delete_expense, get_all_expenses, get_expense, update_expense,
};
pub use dashboard_page::get_dashboard_page;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_page::get_edit_expense_page;
pub use summary::{
    CategoryTotal, YearMonth, category_summary, monthly_summary, sort_by_amount_descending,
};
pub use update_endpoint::update_expense_endpoint;
