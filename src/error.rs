//! Defines the app level error type and conversions to rendered HTML pages.
use axum::response::{IntoResponse, Response};

use crate::{internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required form field was empty after trimming whitespace.
    ///
    /// The string is the name of the offending field.
    #[error("the field \"{0}\" must not be empty")]
    EmptyField(&'static str),

    /// The submitted amount could not be parsed as a number.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The submitted amount was zero or negative.
    ///
    /// Expenses record money that was spent, so amounts must be strictly positive.
    #[error("{0} is not a positive amount")]
    NonPositiveAmount(f64),

    /// The submitted date was not a real calendar date in the format `YYYY-MM-DD`.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A month string was not in the format `YYYY-MM`.
    #[error("\"{0}\" is not a valid month, expected YYYY-MM")]
    InvalidMonth(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl Error {
    /// Whether the error was caused by invalid user input rather than a server fault.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyField(_)
                | Error::InvalidAmount(_)
                | Error::NonPositiveAmount(_)
                | Error::InvalidDate(_)
                | Error::InvalidMonth(_)
        )
    }

    /// The message shown to the user when a form submission is rejected.
    pub fn user_message(&self) -> &'static str {
        match self {
            Error::EmptyField(_) => "Please fill in all fields.",
            Error::InvalidAmount(_) | Error::NonPositiveAmount(_) | Error::InvalidDate(_) => {
                "Invalid amount or date."
            }
            Error::InvalidMonth(_) => "Invalid month, expected YYYY-MM.",
            Error::NotFound => "The expense could not be found.",
            _ => "Something went wrong. Try again later or check the server logs.",
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::Error;

    #[test]
    fn validation_errors_have_form_messages() {
        assert_eq!(
            Error::EmptyField("title").user_message(),
            "Please fill in all fields."
        );
        assert_eq!(
            Error::NonPositiveAmount(-5.0).user_message(),
            "Invalid amount or date."
        );
        assert_eq!(
            Error::InvalidAmount("abc".to_owned()).user_message(),
            "Invalid amount or date."
        );
        assert_eq!(
            Error::InvalidDate("2024-02-30".to_owned()).user_message(),
            "Invalid amount or date."
        );
    }

    #[test]
    fn storage_faults_are_not_validation_errors() {
        assert!(!Error::DatabaseLockError.is_validation_error());
        assert!(!Error::NotFound.is_validation_error());
        assert!(Error::EmptyField("category").is_validation_error());
    }

    #[test]
    fn not_found_renders_404() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn lock_error_renders_500() {
        let response = Error::DatabaseLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
