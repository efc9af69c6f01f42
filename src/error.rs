//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use time::Date;

use crate::Money;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an email and password combination that does not
    /// match a registered user.
    #[error("incorrect email or password")]
    InvalidCredentials,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The auth cookie could not be read or has expired.
    #[error("the auth token is invalid or has expired")]
    InvalidToken,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The user provided a string that is not a valid email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// A user with the email address is already registered.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A transaction was created with an amount below zero.
    #[error("{0} is a negative amount, transaction amounts must be zero or more")]
    NegativeAmount(Money),

    /// A budget goal was set below zero.
    #[error("{0} is a negative amount, budget goals must be zero or more")]
    NegativeGoal(Money),

    /// An investment was recorded with a value below zero.
    #[error("{0} is a negative amount, investment values must be zero or more")]
    NegativeInvestmentValue(Money),

    /// An amount of money could not be parsed or had more than two decimal places.
    #[error("\"{0}\" is not a valid amount of money")]
    InvalidAmount(String),

    /// An empty string was used as a category name.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// An empty string was used as a transaction description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// An empty string was used as an investment name.
    #[error("investment name cannot be empty")]
    EmptyInvestmentName,

    /// The start of a date range came after its end.
    #[error("the date range {0} to {1} is empty, the start must not be after the end")]
    InvalidDateRange(Date, Date),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The resource exists but belongs to another user.
    #[error("you do not have permission to access this resource")]
    Forbidden,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code that best describes the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials | Error::CookieMissing | Error::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Error::TooWeak(_)
            | Error::InvalidEmail(_)
            | Error::NegativeAmount(_)
            | Error::NegativeGoal(_)
            | Error::NegativeInvestmentValue(_)
            | Error::InvalidAmount(_)
            | Error::EmptyCategory
            | Error::EmptyDescription
            | Error::EmptyInvestmentName
            | Error::InvalidDateRange(_, _) => StatusCode::BAD_REQUEST,
            Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::HashingError(_)
            | Error::SqlError(_)
            | Error::InvalidTimezoneError(_)
            | Error::JSONSerializationError(_)
            | Error::DatabaseLockError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal details stay in the server logs.
            tracing::error!("An unexpected error occurred: {}", self);
            "an internal error occurred, check the server logs for more details".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use time::macros::date;

    use crate::{Error, Money};

    async fn body_json(error: Error) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn client_errors_include_message() {
        let (status, body) = body_json(Error::NegativeAmount(Money::from_cents(-500))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "-5.00 is a negative amount, transaction amounts must be zero or more"
        );
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) = body_json(Error::HashingError("bcrypt exploded".to_owned())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["error"].as_str().unwrap().contains("bcrypt"));
    }

    #[test]
    fn ownership_errors_map_to_distinct_statuses() {
        assert_eq!(Error::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Error::DuplicateEmail.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            Error::InvalidDateRange(date!(2025 - 10 - 31), date!(2025 - 10 - 01)).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_rows_become_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}
