//! Daftar is a web app for small business bookkeeping.
//!
//! It records financial transactions ("records") tied to companies and their
//! employees, computes running balances and serves a JSON reporting API for
//! partners alongside server-rendered HTML pages for creating invoices.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_server::Handle;
use maud::html;
use tokio::signal;

mod app_state;
mod auth;
mod company;
mod database_id;
mod db;
mod employee;
mod endpoints;
mod invoice;
mod log_in;
mod log_out;
mod logging;
mod not_found;
mod partner;
mod password;
mod record;
mod routing;
mod timezone;
mod view_templates;

pub use app_state::AppState;
pub use company::create_company;
pub use db::initialize as initialize_db;
pub use employee::{add_employee_document, create_employee};
pub use invoice::{NewInvoice, create_invoice};
pub use logging::logging_middleware;
pub use partner::{Partner, PartnerId, create_partner};
pub use password::PasswordHash;
pub use record::{Record, RecordBuilder, RecordType};
pub use routing::build_router;

use crate::view_templates::base;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
    /// The partner provided an invalid username and password combination, or
    /// presented a session token that is malformed or expired.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The session token cookie is missing from the cookie jar in the request.
    #[error("no session cookie in the cookie jar")]
    CookieMissing,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A date time could not be rendered with the expected format.
    #[error("could not format date time: {0}")]
    DateFormatError(String),

    /// An error occurred while serializing a struct as JSON.
    #[error("could not serialize as JSON: {0}")]
    JsonSerializationError(String),
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

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => not_found::get_404_not_found_response(),
            Error::CookieMissing | Error::InvalidCredentials => {
                Redirect::to(endpoints::LOG_IN_VIEW).into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                let page = base(
                    "Something Went Wrong",
                    &html! {
                        main class="center-panel" {
                            h1 { "500 Internal Server Error" }
                            p { "Something went wrong, check the server logs for more details." }
                        }
                    },
                );

                (StatusCode::INTERNAL_SERVER_ERROR, page).into_response()
            }
        }
    }
}
