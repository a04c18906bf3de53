//! Expense Tracker is a web app for recording personal expenses and seeing
//! where the money goes.
//!
//! Pages are rendered on the server and HTMX handles form submissions.
//! [build_router] wires up every page and [AppState] holds what they share.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod category;
mod dashboard;
mod db;
mod endpoints;
mod expense;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod password;
mod routing;
mod timezone;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use category::{CategoryName, create_category, get_all_categories};
pub use db::initialize as initialize_db;
pub use expense::{NewExpense, create_expense};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use password::{PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use user::{User, UserID, Username, create_user, get_user_by_username, update_password};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFound};

/// How long in-flight requests get to finish once shutdown starts.
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(1);

/// Wait for Ctrl+C or SIGTERM and then stop the server behind `handle`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let signal_name = shutdown_signal().await;
    tracing::info!("Received {signal_name}, shutting down.");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE_PERIOD));
}

async fn ctrl_c() -> &'static str {
    if let Err(error) = signal::ctrl_c().await {
        tracing::error!("could not listen for Ctrl+C: {error}");
        std::future::pending::<()>().await;
    }

    "Ctrl+C"
}

#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    let mut terminate = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(terminate) => terminate,
        Err(error) => {
            tracing::error!("could not listen for SIGTERM: {error}");
            return ctrl_c().await;
        }
    };

    tokio::select! {
        signal_name = ctrl_c() => signal_name,
        _ = terminate.recv() => "SIGTERM",
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    ctrl_c().await
}

/// Everything that can go wrong while handling a request.
///
/// Handlers log the details and show the user a page or alert from [IntoResponse]
/// or [Error::into_alert_response].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request has no session cookie, or it could not be decrypted.
    #[error("no session cookie")]
    CookieMissing,

    /// The session cookie decrypted but did not hold a token.
    #[error("malformed session token: {0}")]
    InvalidToken(String),

    /// The session token is past its expiry.
    #[error("the session has expired")]
    TokenExpired,

    /// Extending the session would go past the largest representable date.
    #[error("session expiry out of range")]
    DateTimeOverflow,

    /// The session token could not be written as JSON.
    #[error("JSON serialization failed: {0}")]
    JSONSerializationError(String),

    /// Holds advice on picking a stronger password.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// bcrypt failed. Log it, never show it.
    #[error("could not hash password: {0}")]
    HashingError(String),

    /// Holds the username rule that was broken, worded for the sign-up form.
    #[error("{0}")]
    InvalidUsername(String),

    /// Someone already registered with the username.
    #[error("that username is taken")]
    DuplicateUsername,

    /// The category name was blank after trimming.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// Category names are unique across all users.
    #[error("a category with that name already exists")]
    DuplicateCategoryName,

    /// An expense referred to a category ID that does not exist.
    #[error("no category with that ID")]
    InvalidCategory,

    /// No such row, or the row belongs to another user.
    #[error("not found")]
    NotFound,

    /// A database error with no more specific variant.
    #[error("SQL error: {0}")]
    SqlError(rusqlite::Error),

    /// The configured timezone is not in the timezone database.
    #[error("unknown timezone {0}")]
    InvalidTimezoneError(String),

    /// The database mutex was poisoned by a panicking request.
    #[error("database lock poisoned")]
    DatabaseLockError,

    /// The expense to update does not exist or belongs to another user.
    #[error("no such expense to update")]
    UpdateMissingExpense,

    /// The expense to delete does not exist or belongs to another user.
    #[error("no such expense to delete")]
    DeleteMissingExpense,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // SQLITE_CONSTRAINT_UNIQUE
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("category.name") =>
            {
                Error::DuplicateCategoryName
            }
            // SQLITE_CONSTRAINT_FOREIGNKEY. Clients only choose the expense category.
            rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == 787 => {
                Error::InvalidCategory
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("SQL error: {error}");
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::UpdateMissingExpense | Error::DeleteMissingExpense => {
                NotFound.into_response()
            }
            Error::InvalidTimezoneError(timezone) => InternalServerError::misconfigured(format!(
                "\"{timezone}\" is not a known timezone. Restart the server with a canonical \
                timezone name such as \"Pacific/Auckland\"."
            ))
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert fragment for HTMX requests.
    fn into_alert_response(self) -> Response {
        match self {
            Error::NotFound => Alert::error(
                "Could not find expense",
                "The expense does not exist or belongs to another user.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::UpdateMissingExpense => Alert::error(
                "Could not update expense",
                "The expense could not be found.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingExpense => Alert::error(
                "Could not delete expense",
                "The expense could not be found. \
                Try refreshing the page to see if the expense has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::InvalidTimezoneError(timezone) => Alert::error(
                "Unknown timezone",
                &format!("The server is set to \"{timezone}\", which is not a known timezone."),
            )
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            error => {
                tracing::error!("An unexpected error occurred: {error}");

                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                )
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
