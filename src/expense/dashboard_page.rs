//! The dashboard: every expense, a form for adding expenses, and spending summaries.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints::{self, format_endpoint},
    expense::{
        Expense,
        form::{ExpenseFormDefaults, expense_form_fields},
        get_all_expenses,
        summary::{
            CategoryTotal, YearMonth, category_summary, monthly_summary,
            sort_by_amount_descending,
        },
    },
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_currency,
    },
    timezone::local_today,
};

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// "amount" sorts expenses by amount, anything else keeps the newest first.
    pub sort: Option<String>,
    /// The month to total, `YYYY-MM`. Defaults to the current month.
    pub month: Option<String>,
    /// An error message from a rejected form submission.
    pub error: Option<String>,
}

/// Build the dashboard URL that displays `message` as an error alert.
pub(crate) fn dashboard_url_with_error(message: &str) -> String {
    match serde_urlencoded::to_string([("error", message)]) {
        Ok(query) => format!("{}?{query}", endpoints::ROOT),
        Err(error) => {
            tracing::error!("Could not encode error message {message:?}: {error}");
            endpoints::ROOT.to_owned()
        }
    }
}

/// The expense data to display in the table.
#[derive(Debug, PartialEq)]
struct ExpenseTableRow {
    title: String,
    amount: f64,
    category: String,
    date: Date,
    edit_url: String,
    delete_url: String,
}

impl From<Expense> for ExpenseTableRow {
    fn from(expense: Expense) -> Self {
        Self {
            edit_url: format_endpoint(endpoints::EDIT_EXPENSE_VIEW, expense.id),
            delete_url: format_endpoint(endpoints::DELETE_EXPENSE, expense.id),
            title: expense.title,
            amount: expense.amount,
            category: expense.category,
            date: expense.date,
        }
    }
}

struct DashboardView {
    expenses: Vec<ExpenseTableRow>,
    category_totals: Vec<CategoryTotal>,
    month: YearMonth,
    month_total: f64,
    sort_by_amount: bool,
    today: Date,
    alert: Option<Alert>,
}

fn dashboard_view(view: DashboardView) -> Markup {
    let add_form_fields = expense_form_fields(&ExpenseFormDefaults {
        date: Some(view.today),
        autofocus_title: true,
        ..Default::default()
    });

    let content = html!(
        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-8"
            {
                h1 class="text-2xl font-bold" { "Expenses" }

                @if let Some(alert) = view.alert {
                    (alert.into_html())
                }

                div class="grid gap-8 lg:grid-cols-2"
                {
                    section class="space-y-4" aria-labelledby="add-expense-heading"
                    {
                        h2 id="add-expense-heading" class="text-xl font-bold" { "Add Expense" }

                        form
                            method="post"
                            action=(endpoints::ADD_EXPENSE)
                            class="w-full space-y-4"
                        {
                            (add_form_fields)

                            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
                        }
                    }

                    (summary_view(&view.category_totals, view.month, view.month_total))
                }

                (expense_table_view(&view.expenses, view.sort_by_amount))
            }
        }
    );

    base("Expenses", &content)
}

fn summary_view(category_totals: &[CategoryTotal], month: YearMonth, month_total: f64) -> Markup {
    html!(
        section id="summary" class="space-y-4" aria-labelledby="summary-heading"
        {
            h2 id="summary-heading" class="text-xl font-bold" { "Summary" }

            p id="month-total"
            {
                "Spent in " (month) ": "
                span class="font-semibold" { (format_currency(month_total)) }
            }

            table id="category-totals" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-4 text-right" { "Total" }
                    }
                }

                tbody
                {
                    @for CategoryTotal { category, total } in category_totals {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                span class=(CATEGORY_BADGE_STYLE) { (category) }
                            }
                            td class="px-6 py-4 text-right" { (format_currency(*total)) }
                        }
                    }

                    @if category_totals.is_empty() {
                        tr
                        {
                            td colspan="2" class="px-6 py-4 text-center" { "Nothing spent yet." }
                        }
                    }
                }
            }
        }
    )
}

fn expense_table_view(expenses: &[ExpenseTableRow], sort_by_amount: bool) -> Markup {
    let sort_by_amount_url = format!("{}?sort=amount", endpoints::ROOT);

    html!(
        section class="space-y-4 overflow-x-auto" aria-labelledby="expenses-heading"
        {
            header class="flex justify-between flex-wrap items-end"
            {
                h2 id="expenses-heading" class="text-xl font-bold" { "All Expenses" }

                @if sort_by_amount {
                    a href=(endpoints::ROOT) class=(LINK_STYLE) { "Sort by date" }
                } @else {
                    a href=(sort_by_amount_url) class=(LINK_STYLE) { "Sort by amount" }
                }
            }

            table id="expenses" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-4 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for expense in expenses {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                time datetime=(expense.date) { (expense.date) }
                            }
                            th
                                scope="row"
                                class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                            {
                                (expense.title)
                            }
                            td class=(TABLE_CELL_STYLE)
                            {
                                span class=(CATEGORY_BADGE_STYLE) { (expense.category) }
                            }
                            td class="px-6 py-4 text-right" { (format_currency(expense.amount)) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                div class="flex gap-4"
                                {
                                    a href=(expense.edit_url) class=(LINK_STYLE) { "Edit" }

                                    form
                                        method="post"
                                        action=(expense.delete_url)
                                        onsubmit="return confirm('Are you sure you want to delete this expense? This cannot be undone.')"
                                    {
                                        button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                                    }
                                }
                            }
                        }
                    }

                    @if expenses.is_empty() {
                        tr
                        {
                            td colspan="5" class="px-6 py-4 text-center"
                            {
                                "No expenses yet. Add one with the form above."
                            }
                        }
                    }
                }
            }
        }
    )
}

/// Renders the dashboard with all expenses and their summaries.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let expenses = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_expenses(&connection)
            .inspect_err(|error| tracing::error!("could not get all expenses: {error}"))?
    };

    let today = local_today(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let mut alert = query.error.as_deref().map(Alert::error_simple);

    let month = match query.month.as_deref().map(str::parse::<YearMonth>) {
        Some(Ok(month)) => month,
        Some(Err(error)) => {
            tracing::debug!("Ignoring month query parameter: {error}");
            alert = Some(Alert::error_simple(error.user_message()));
            YearMonth::from_date(today)
        }
        None => YearMonth::from_date(today),
    };

    let sort_by_amount = query.sort.as_deref() == Some("amount");
    let expenses = if sort_by_amount {
        sort_by_amount_descending(expenses)
    } else {
        expenses
    };

    let category_totals = category_summary(&expenses);
    let month_total = monthly_summary(&expenses, month);

    let view = DashboardView {
        expenses: expenses.into_iter().map(ExpenseTableRow::from).collect(),
        category_totals,
        month,
        month_total,
        sort_by_amount,
        today,
        alert,
    };

    Ok(dashboard_view(view).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::Body,
        extract::{Query, State},
        http::Response,
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        endpoints,
        expense::{NewExpense, add_expense},
        test_utils::{
            assert_content_type, assert_form_action, assert_form_input, assert_status_ok,
            assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::{DashboardQuery, DashboardState, dashboard_url_with_error, get_dashboard_page};

    fn get_test_state() -> DashboardState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        for (title, amount, category, date) in [
            ("Coffee", 4.5, "Food", date!(2024 - 03 - 01)),
            ("Rent", 1200.0, "Housing", date!(2024 - 03 - 01)),
            ("Groceries", 85.25, "Food", date!(2024 - 02 - 20)),
        ] {
            add_expense(
                &NewExpense {
                    title: title.to_owned(),
                    amount,
                    category: category.to_owned(),
                    date,
                },
                &conn,
            )
            .expect("could not create test expense");
        }

        DashboardState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    async fn get_page(query: DashboardQuery) -> Html {
        let response = get_dashboard_page(State(get_test_state()), Query(query))
            .await
            .expect("could not render dashboard");

        assert_status_ok(&response);
        assert_content_type(&response, "text/html; charset=utf-8");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        html
    }

    fn select_text(html: &Html, selector: &str) -> Vec<String> {
        html.select(&Selector::parse(selector).unwrap())
            .map(|element| element.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn lists_expenses_newest_first() {
        let html = get_page(DashboardQuery::default()).await;

        let titles = select_text(&html, "#expenses tbody th");

        assert_eq!(titles, vec!["Rent", "Coffee", "Groceries"]);
    }

    #[tokio::test]
    async fn sorts_by_amount() {
        let html = get_page(DashboardQuery {
            sort: Some("amount".to_owned()),
            ..Default::default()
        })
        .await;

        let titles = select_text(&html, "#expenses tbody th");

        assert_eq!(titles, vec!["Rent", "Groceries", "Coffee"]);
    }

    #[tokio::test]
    async fn unknown_sort_keeps_date_order() {
        let html = get_page(DashboardQuery {
            sort: Some("title".to_owned()),
            ..Default::default()
        })
        .await;

        let titles = select_text(&html, "#expenses tbody th");

        assert_eq!(titles, vec!["Rent", "Coffee", "Groceries"]);
    }

    #[tokio::test]
    async fn shows_category_totals() {
        let html = get_page(DashboardQuery::default()).await;

        let categories = select_text(&html, "#category-totals tbody td:first-child");

        assert_eq!(categories, vec!["Housing", "Food"]);
    }

    #[tokio::test]
    async fn shows_total_for_requested_month() {
        let html = get_page(DashboardQuery {
            month: Some("2024-03".to_owned()),
            ..Default::default()
        })
        .await;

        let month_total = select_text(&html, "#month-total");

        assert_eq!(month_total, vec!["Spent in 2024-03: $1,204.50"]);
    }

    #[tokio::test]
    async fn invalid_month_shows_alert() {
        let html = get_page(DashboardQuery {
            month: Some("March".to_owned()),
            ..Default::default()
        })
        .await;

        let alerts = select_text(&html, "div[role=alert]");

        assert_eq!(alerts, vec![Error::InvalidMonth(String::new()).user_message()]);
    }

    #[tokio::test]
    async fn shows_error_from_query() {
        let html = get_page(DashboardQuery {
            error: Some("Please fill in all fields.".to_owned()),
            ..Default::default()
        })
        .await;

        let alerts = select_text(&html, "div[role=alert]");

        assert_eq!(alerts, vec!["Please fill in all fields."]);
    }

    #[tokio::test]
    async fn has_add_expense_form() {
        let html = get_page(DashboardQuery::default()).await;
        let form = must_get_form(&html);

        assert_form_action(&form, endpoints::ADD_EXPENSE);
        assert_form_input(&form, "title", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "category", "text");
        assert_form_input(&form, "date", "date");
    }

    #[tokio::test]
    async fn empty_database_shows_placeholder() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let state = DashboardState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response: Response<Body> =
            get_dashboard_page(State(state), Query(DashboardQuery::default()))
                .await
                .unwrap();
        let html = parse_html_document(response).await;

        let rows = select_text(&html, "#expenses tbody td");
        assert_eq!(rows, vec!["No expenses yet. Add one with the form above."]);
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let mut state = get_test_state();
        state.local_timezone = "Nowhere/Special".to_owned();

        let result = get_dashboard_page(State(state), Query(DashboardQuery::default())).await;

        assert!(matches!(
            result,
            Err(Error::InvalidTimezoneError(timezone)) if timezone == "Nowhere/Special"
        ));
    }

    #[test]
    fn error_url_is_encoded() {
        assert_eq!(
            dashboard_url_with_error("Invalid amount or date."),
            "/?error=Invalid+amount+or+date."
        );
    }
}
