//! Defines the route handler for the page for editing an existing expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    expense::{
        Expense, ExpenseId,
        form::{ExpenseFormDefaults, expense_form_fields},
        get_expense,
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base},
};

/// The state needed for the edit expense page.
#[derive(Debug, Clone)]
pub struct EditExpensePageState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn edit_expense_view(expense: &Expense) -> Markup {
    let update_url = format_endpoint(endpoints::UPDATE_EXPENSE, expense.id);
    let fields = expense_form_fields(&ExpenseFormDefaults {
        title: Some(&expense.title),
        amount: Some(expense.amount),
        category: Some(&expense.category),
        date: Some(expense.date),
        autofocus_title: true,
    });

    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            form
                method="post"
                action=(update_url)
                class="w-full space-y-4 md:space-y-6 py-8"
            {
                h2 class="text-xl font-bold" { "Edit Expense" }

                (fields)

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Changes" }

                a href=(endpoints::ROOT) class=(LINK_STYLE) { "Cancel" }
            }
        }
    };

    base("Edit Expense", &content)
}

/// Renders the page for editing an expense.
///
/// # Errors
/// Returns [Error::NotFound] if there is no expense with `expense_id`.
pub async fn get_edit_expense_page(
    State(state): State<EditExpensePageState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(expense_id, &connection)
        .inspect_err(|error| tracing::error!("could not get expense {expense_id}: {error}"))?
        .ok_or(Error::NotFound)?;

    Ok(edit_expense_view(&expense).into_response())
}
