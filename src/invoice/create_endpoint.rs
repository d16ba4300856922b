//! The endpoint for submitting the new invoice form.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, Error, auth::verify_partner, endpoints};

use super::core::{NewInvoice, create_invoice};

/// The state needed for creating invoices.
#[derive(Debug, Clone)]
pub struct CreateInvoiceState {
    /// The key for decrypting private cookies.
    pub cookie_key: Key,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateInvoiceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<CreateInvoiceState> for Key {
    fn from_ref(state: &CreateInvoiceState) -> Self {
        state.cookie_key.clone()
    }
}

/// The submitted fields of the new invoice form.
///
/// Every field is free-form text; the form performs no validation.
#[derive(Debug, Deserialize)]
pub struct InvoiceForm {
    title: String,
    purpose: String,
    client: String,
    location: String,
    date: String,
    remarks: String,
    suffix: String,
    #[serde(rename = "invoiceNo")]
    invoice_no: String,
}

impl From<InvoiceForm> for NewInvoice {
    fn from(form: InvoiceForm) -> Self {
        Self {
            title: form.title,
            purpose: form.purpose,
            client: form.client,
            location: form.location,
            date: form.date,
            remarks: form.remarks,
            suffix: form.suffix,
            invoice_no: form.invoice_no,
        }
    }
}

/// A POST handler that saves a new invoice.
///
/// On success the client is redirected back to a fresh invoice form. Since
/// the form is submitted with htmx, redirects use the `HX-Redirect` header
/// rather than a `Location` header.
pub async fn create_invoice_endpoint(
    State(state): State<CreateInvoiceState>,
    jar: PrivateCookieJar,
    Form(form): Form<InvoiceForm>,
) -> Response {
    if let Err(error) = verify_partner(&jar) {
        tracing::warn!("rejecting invoice submission: {error}");

        return (HxRedirect(endpoints::LOG_IN_VIEW.to_owned()), StatusCode::OK).into_response();
    }

    let result = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| create_invoice(form.into(), &connection));

    match result {
        Ok(invoice) => {
            tracing::info!("created invoice {}{}", invoice.suffix, invoice.invoice_no);

            (
                HxRedirect(endpoints::NEW_INVOICE_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => error.into_response(),
    }
}
