//! Umsatz is a small personal-banking transaction viewer.
//!
//! This library provides a JSON REST API over a SQLite database of bank
//! accounts, their transactions ("Umsätze") and free-text labels attached to
//! transactions, plus the view models a browser frontend drives.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod account;
mod app_state;
mod database_id;
mod db;
mod endpoints;
mod extract;
mod label;
mod logging;
mod routing;
mod transaction;
pub mod view;

#[cfg(test)]
mod test_utils;

pub use account::{Account, AccountId};
pub use app_state::AppState;
pub use database_id::{DatabaseId, TransactionId};
pub use db::initialize as initialize_db;
pub use label::{
    ForceDeleteOutcome, Label, LabelEvents, LabelId, LabelName, LabelUpdate, LinkOutcome,
    UnlinkOutcome,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::Transaction;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing from a request body.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A field held a value that can never be valid, e.g. a non-positive ID.
    #[error("{0} must be a positive ID")]
    InvalidField(&'static str),

    /// An empty string was used to create a label name.
    #[error("label name cannot be empty")]
    EmptyLabelName,

    /// The request body could not be parsed as the expected JSON document.
    #[error("could not parse JSON body: {0}")]
    InvalidJson(String),

    /// A path parameter could not be parsed, e.g. a non-numeric ID.
    #[error("invalid path parameter: {0}")]
    InvalidPathParameter(String),

    /// A transaction already carries a label with this name, ignoring case.
    #[error("the label \"{0}\" is already present")]
    LabelAlreadyPresent(String),

    /// A label was to be attached to a transaction that does not exist.
    #[error("there is no transaction with the ID {0}")]
    UnknownTransaction(TransactionId),

    /// The requested resource was not found.
    ///
    /// Internally, this error occurs when a query returns no rows. The read
    /// API turns it into an empty result rather than surfacing it.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidJson(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidPathParameter(rejection.body_text())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingField(_)
            | Error::InvalidField(_)
            | Error::EmptyLabelName
            | Error::InvalidJson(_)
            | Error::InvalidPathParameter(_)
            | Error::LabelAlreadyPresent(_)
            | Error::UnknownTransaction(_) => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::SqlError(_) | Error::DatabaseLockError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
