//! Defines the endpoint for updating an existing expense.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    expense::{
        ExpenseId,
        dashboard_page::dashboard_url_with_error,
        form::{ExpenseForm, parse_expense_form},
        update_expense,
    },
};

/// The state needed to update an expense.
#[derive(Debug, Clone)]
pub struct UpdateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for replacing the fields of an expense, redirects to the dashboard.
///
/// Updating an expense that does not exist changes nothing and still redirects.
pub async fn update_expense_endpoint(
    State(state): State<UpdateExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let expense = match parse_expense_form(&form) {
        Ok(expense) => expense,
        Err(error) => {
            tracing::debug!("Rejected update to expense {expense_id} with {form:?}: {error}");
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

    match update_expense(expense_id, &expense, &connection) {
        Ok(0) => tracing::warn!("Tried to update expense {expense_id}, but it does not exist"),
        Ok(_) => tracing::info!("Updated expense {expense_id}"),
        Err(error) => {
            tracing::error!("Could not update expense {expense_id}: {error}");
            return error.into_response();
        }
    }

    Redirect::to(endpoints::ROOT).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        endpoints,
        expense::{Expense, NewExpense, add_expense, form::ExpenseForm, get_expense},
        test_utils::assert_redirect,
    };

    use super::{UpdateExpenseState, update_expense_endpoint};

    fn get_test_state_with_expense() -> (UpdateExpenseState, Expense) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let expense = add_expense(
            &NewExpense {
                title: "Coffee".to_owned(),
                amount: 4.5,
                category: "Food".to_owned(),
                date: date!(2024 - 03 - 01),
            },
            &conn,
        )
        .expect("could not create test expense");

        (
            UpdateExpenseState {
                db_connection: Arc::new(Mutex::new(conn)),
            },
            expense,
        )
    }

    fn form(title: &str, amount: &str, category: &str, date: &str) -> ExpenseForm {
        ExpenseForm {
            title: title.to_owned(),
            amount: amount.to_owned(),
            category: category.to_owned(),
            date: date.to_owned(),
        }
    }

    #[tokio::test]
    async fn can_update_expense() {
        let (state, expense) = get_test_state_with_expense();

        let response = update_expense_endpoint(
            State(state.clone()),
            Path(expense.id),
            Form(form("Tea", "3", "Drinks", "2024-03-02")),
        )
        .await;

        assert_redirect(&response, endpoints::ROOT);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_expense(expense.id, &connection),
            Ok(Some(Expense {
                id: expense.id,
                title: "Tea".to_owned(),
                amount: 3.0,
                category: "Drinks".to_owned(),
                date: date!(2024 - 03 - 02),
            }))
        );
    }

    #[tokio::test]
    async fn invalid_date_keeps_old_values() {
        let (state, expense) = get_test_state_with_expense();

        let response = update_expense_endpoint(
            State(state.clone()),
            Path(expense.id),
            Form(form("Tea", "3", "Drinks", "2024-13-01")),
        )
        .await;

        assert_redirect(&response, "/?error=Invalid+amount+or+date.");
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_expense(expense.id, &connection), Ok(Some(expense)));
    }

    #[tokio::test]
    async fn updating_missing_expense_redirects() {
        let (state, expense) = get_test_state_with_expense();

        let response = update_expense_endpoint(
            State(state.clone()),
            Path(expense.id + 100),
            Form(form("Tea", "3", "Drinks", "2024-03-02")),
        )
        .await;

        assert_redirect(&response, endpoints::ROOT);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_expense(expense.id, &connection), Ok(Some(expense)));
    }
}
