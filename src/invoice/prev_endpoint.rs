//! The endpoint that serves the numbering metadata of the latest invoice.
//!
//! The invoice form fetches this to prefill the suffix and the next invoice
//! number.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, Error, auth::verify_partner};

use super::core::previous_invoice_meta;

/// The state needed for the previous invoice endpoint.
#[derive(Debug, Clone)]
pub struct PrevInvoiceState {
    /// The key for decrypting private cookies.
    pub cookie_key: Key,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PrevInvoiceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<PrevInvoiceState> for Key {
    fn from_ref(state: &PrevInvoiceState) -> Self {
        state.cookie_key.clone()
    }
}

/// A GET handler that returns the suffix and number of the latest invoice.
///
/// Responds with 404 when no invoice exists yet, and 401 with the error
/// message in a JSON object on any other failure.
pub async fn get_prev_invoice_endpoint(
    State(state): State<PrevInvoiceState>,
    jar: PrivateCookieJar,
) -> Response {
    let result = verify_partner(&jar).and_then(|_| {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        previous_invoice_meta(&connection)
    });

    match result {
        Ok(meta) => (StatusCode::OK, Json(meta)).into_response(),
        Err(Error::NotFound) => StatusCode::NOT_FOUND.into_response(),
        Err(error) => {
            tracing::error!("could not get previous invoice: {error}");

            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response()
        }
    }
}
