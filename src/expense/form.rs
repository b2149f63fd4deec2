//! Validation of submitted expense forms and the shared form fields.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    expense::NewExpense,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The raw form data submitted when creating or editing an expense.
///
/// All fields are kept as text so that missing or malformed input can be
/// reported to the user instead of being rejected by the extractor.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExpenseForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub date: String,
}

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Validate `form` and convert it into a [NewExpense].
///
/// # Errors
/// Returns:
/// - [Error::EmptyField] if any field is empty after trimming whitespace,
/// - [Error::InvalidAmount] if the amount is not a finite number,
/// - [Error::NonPositiveAmount] if the amount is zero or negative,
/// - [Error::InvalidDate] if the date is not a real calendar date in the format `YYYY-MM-DD`.
pub fn parse_expense_form(form: &ExpenseForm) -> Result<NewExpense, Error> {
    let title = form.title.trim();
    let category = form.category.trim();
    let date = form.date.trim();
    let amount = form.amount.trim();

    for (name, value) in [
        ("title", title),
        ("category", category),
        ("date", date),
        ("amount", amount),
    ] {
        if value.is_empty() {
            return Err(Error::EmptyField(name));
        }
    }

    Ok(NewExpense {
        title: title.to_owned(),
        amount: parse_amount(amount)?,
        category: category.to_owned(),
        date: parse_date(date)?,
    })
}

/// Parse a strictly positive amount of money with at most two decimal places.
///
/// Only plain decimal notation is accepted, e.g. "12", "4.5" or "1200.00".
pub fn parse_amount(raw_amount: &str) -> Result<f64, Error> {
    if !is_plain_decimal(raw_amount) {
        return Err(Error::InvalidAmount(raw_amount.to_owned()));
    }

    let amount: f64 = raw_amount
        .parse()
        .map_err(|_| Error::InvalidAmount(raw_amount.to_owned()))?;

    if !amount.is_finite() {
        return Err(Error::InvalidAmount(raw_amount.to_owned()));
    }

    if amount <= 0.0 {
        return Err(Error::NonPositiveAmount(amount));
    }

    Ok(amount)
}

/// An optional minus sign, at least one digit, then optionally a point and one or two digits.
fn is_plain_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (whole, cents) = unsigned.split_once('.').unwrap_or((unsigned, "0"));

    !whole.is_empty()
        && whole.bytes().all(|byte| byte.is_ascii_digit())
        && (1..=2).contains(&cents.len())
        && cents.bytes().all(|byte| byte.is_ascii_digit())
}

/// Parse a date in the format `YYYY-MM-DD`.
///
/// The year must be exactly four digits with no sign.
pub fn parse_date(raw_date: &str) -> Result<Date, Error> {
    let has_plain_year = raw_date.len() == 10
        && raw_date.as_bytes()[..4].iter().all(|byte| byte.is_ascii_digit());

    if !has_plain_year {
        return Err(Error::InvalidDate(raw_date.to_owned()));
    }

    Date::parse(raw_date, DATE_FORMAT).map_err(|_| Error::InvalidDate(raw_date.to_owned()))
}

/// The values to pre-fill the expense form fields with.
#[derive(Debug, Default)]
pub struct ExpenseFormDefaults<'a> {
    pub title: Option<&'a str>,
    pub amount: Option<f64>,
    pub category: Option<&'a str>,
    pub date: Option<Date>,
    pub autofocus_title: bool,
}

pub fn expense_form_fields(defaults: &ExpenseFormDefaults<'_>) -> Markup {
    let amount_str = defaults.amount.map(|amount| amount.to_string());

    html! {
        div
        {
            label
                for="title"
                class=(FORM_LABEL_STYLE)
            {
                "Title"
            }

            input
                name="title"
                id="title"
                type="text"
                placeholder="Coffee"
                required
                value=[defaults.title]
                autofocus[defaults.autofocus_title]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                min="0.01"
                placeholder="0.00"
                required
                value=[amount_str.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            input
                name="category"
                id="category"
                type="text"
                placeholder="Food"
                required
                value=[defaults.category]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                required
                value=[defaults.date]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
