//! Defines the endpoint for adding a new expense.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    expense::{
        add_expense,
        dashboard_page::dashboard_url_with_error,
        form::{ExpenseForm, parse_expense_form},
    },
};

/// The state needed to add an expense.
#[derive(Debug, Clone)]
pub struct AddExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AddExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for adding an expense, redirects to the dashboard.
///
/// Invalid submissions redirect to the dashboard with an error message and
/// nothing is saved.
pub async fn add_expense_endpoint(
    State(state): State<AddExpenseState>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let expense = match parse_expense_form(&form) {
        Ok(expense) => expense,
        Err(error) => {
            tracing::debug!("Rejected new expense {form:?}: {error}");
            return Redirect::to(&dashboard_url_with_error(error.user_message())).into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match add_expense(&expense, &connection) {
        Ok(expense) => tracing::info!("Added expense {}", expense.id),
        Err(error) => {
            tracing::error!("Could not add expense {expense:?}: {error}");
            return error.into_response();
        }
    }

    Redirect::to(endpoints::ROOT).into_response()
}
