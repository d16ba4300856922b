//! The page with the form for creating a new invoice.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{OffsetDateTime, macros::format_description};

use crate::{
    AppState, Error,
    auth::verify_partner,
    endpoints,
    timezone::get_local_offset,
    view_templates::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base},
};

use super::core::{next_invoice_number, previous_invoice_meta};

/// The state needed for the new invoice page.
#[derive(Debug, Clone)]
pub struct NewInvoicePageState {
    /// The key for decrypting private cookies.
    pub cookie_key: Key,
    /// The timezone used to pick today's date.
    pub local_timezone: String,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewInvoicePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<NewInvoicePageState> for Key {
    fn from_ref(state: &NewInvoicePageState) -> Self {
        state.cookie_key.clone()
    }
}

/// The numbering fields the form is prefilled with.
#[derive(Debug, Default, PartialEq)]
struct NumberingPrefill {
    suffix: String,
    invoice_no: String,
}

/// Derive the prefill from the latest invoice.
///
/// The suffix carries over as-is and the invoice number is incremented. A
/// previous number that is not numeric leaves the number field empty.
fn get_numbering_prefill(connection: &Connection) -> Result<NumberingPrefill, Error> {
    let meta = previous_invoice_meta(connection)?;

    let invoice_no = match next_invoice_number(&meta.invoice_no) {
        Some(next) => next,
        None => {
            tracing::warn!(
                "previous invoice number {:?} is not numeric, leaving number empty",
                meta.invoice_no
            );
            String::new()
        }
    };

    Ok(NumberingPrefill {
        suffix: meta.suffix,
        invoice_no,
    })
}

/// Today's date in `local_timezone` as "YYYY-MM-DD" for the date input.
fn get_today(local_timezone: &str) -> String {
    let now = OffsetDateTime::now_utc();
    let today = match get_local_offset(local_timezone) {
        Some(offset) => now.to_offset(offset).date(),
        None => {
            tracing::warn!("unknown timezone {local_timezone:?}, using UTC for today's date");
            now.date()
        }
    };

    today
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

/// A GET handler that displays the new invoice form.
///
/// The numbering fields are prefilled from the most recent invoice; if there
/// is none, or the lookup fails, they are left empty and the partner fills
/// them in by hand.
pub async fn get_new_invoice_page(
    State(state): State<NewInvoicePageState>,
    jar: PrivateCookieJar,
) -> Response {
    if verify_partner(&jar).is_err() {
        return Redirect::to(endpoints::LOG_IN_VIEW).into_response();
    }

    let prefill_result = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| get_numbering_prefill(&connection));

    let prefill = match prefill_result {
        Ok(prefill) => prefill,
        Err(Error::NotFound) => NumberingPrefill::default(),
        Err(error) => {
            tracing::error!("could not prefill invoice numbering: {error}");
            NumberingPrefill::default()
        }
    };

    new_invoice_page(&prefill, &get_today(&state.local_timezone)).into_response()
}

fn text_input(label: &str, name: &str, value: &str) -> Markup {
    html! {
        label class=(FORM_LABEL_STYLE)
        {
            (label)
            input class=(FORM_TEXT_INPUT_STYLE) type="text" name=(name) value=(value);
        }
    }
}

fn new_invoice_page(prefill: &NumberingPrefill, today: &str) -> Markup {
    base(
        "New Invoice",
        &html! {
            main class="center-panel"
            {
                h1 { "New Invoice" }

                form hx-post=(endpoints::INVOICES_API) hx-disabled-elt="find button"
                {
                    (text_input("Title", "title", ""))
                    (text_input("Purpose", "purpose", ""))
                    (text_input("Client", "client", ""))
                    (text_input("Location", "location", ""))

                    label class=(FORM_LABEL_STYLE)
                    {
                        "Date"
                        input class=(FORM_TEXT_INPUT_STYLE) type="date" name="date" value=(today);
                    }

                    label class=(FORM_LABEL_STYLE)
                    {
                        "Remarks"
                        textarea class=(FORM_TEXT_INPUT_STYLE) name="remarks" {}
                    }

                    (text_input("Suffix", "suffix", &prefill.suffix))
                    (text_input("Invoice No.", "invoiceNo", &prefill.invoice_no))

                    button class=(BUTTON_PRIMARY_STYLE) type="submit"
                    {
                        "Save Invoice"
                        span class="htmx-indicator" { " ..." }
                    }
                }
            }
        },
    )
}

#[cfg(test)]
mod new_invoice_page_tests {
    use axum::{
        Router,
        routing::{get, post},
    };
    use axum_extra::extract::PrivateCookieJar;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::Duration;

    use crate::{
        AppState, Error,
        auth::{COOKIE_TOKEN, set_auth_cookie},
        endpoints::{INVOICES_API, LOG_IN_VIEW, NEW_INVOICE_VIEW},
        invoice::core::{NewInvoice, create_invoice},
        partner::PartnerId,
    };

    use super::get_new_invoice_page;

    const TEST_LOG_IN: &str = "/test_log_in";

    async fn post_test_log_in(jar: PrivateCookieJar) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(jar, PartnerId::new(1), Duration::minutes(5))
    }

    fn get_test_app() -> (TestServer, AppState) {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "42", "Asia/Dubai")
            .expect("could not create app state");

        let app = Router::new()
            .route(NEW_INVOICE_VIEW, get(get_new_invoice_page))
            .route(TEST_LOG_IN, post(post_test_log_in))
            .with_state(state.clone());
        let server = TestServer::new(app).expect("could not create test server");

        (server, state)
    }

    async fn log_in(server: &mut TestServer) {
        let response = server.post(TEST_LOG_IN).await;
        let auth_cookie = response.cookie(COOKIE_TOKEN);
        server.add_cookie(auth_cookie);
    }

    #[track_caller]
    fn assert_input_value(document: &Html, name: &str, want: &str) {
        let selector = Selector::parse(&format!("input[name='{name}']")).unwrap();
        let input = document
            .select(&selector)
            .next()
            .unwrap_or_else(|| panic!("no input named {name}"));

        assert_eq!(input.value().attr("value"), Some(want), "input {name}");
    }

    fn seed_invoice(state: &AppState, suffix: &str, invoice_no: &str) {
        let conn = state.db_connection.lock().unwrap();
        create_invoice(
            NewInvoice {
                title: "Visa Services".to_owned(),
                purpose: "Visa renewal".to_owned(),
                client: "Falcon Trading LLC".to_owned(),
                location: "Deira".to_owned(),
                date: "2024-01-05".to_owned(),
                remarks: "".to_owned(),
                suffix: suffix.to_owned(),
                invoice_no: invoice_no.to_owned(),
            },
            &conn,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn page_redirects_to_log_in_without_auth() {
        let (server, _) = get_test_app();

        let response = server.get(NEW_INVOICE_VIEW).await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("location").to_str().unwrap(),
            LOG_IN_VIEW
        );
    }

    #[tokio::test]
    async fn numbering_is_prefilled_from_latest_invoice() {
        let (mut server, state) = get_test_app();
        seed_invoice(&state, "INV", "12");
        log_in(&mut server).await;

        let response = server.get(NEW_INVOICE_VIEW).await;

        response.assert_status_ok();
        let document = Html::parse_document(&response.text());
        assert_input_value(&document, "suffix", "INV");
        assert_input_value(&document, "invoiceNo", "13");
    }

    #[tokio::test]
    async fn numbering_is_empty_without_invoices() {
        let (mut server, _) = get_test_app();
        log_in(&mut server).await;

        let response = server.get(NEW_INVOICE_VIEW).await;

        response.assert_status_ok();
        let document = Html::parse_document(&response.text());
        assert_input_value(&document, "suffix", "");
        assert_input_value(&document, "invoiceNo", "");
    }

    #[tokio::test]
    async fn non_numeric_previous_number_leaves_field_empty() {
        let (mut server, state) = get_test_app();
        seed_invoice(&state, "INV", "12-B");
        log_in(&mut server).await;

        let response = server.get(NEW_INVOICE_VIEW).await;

        response.assert_status_ok();
        let document = Html::parse_document(&response.text());
        assert_input_value(&document, "suffix", "INV");
        assert_input_value(&document, "invoiceNo", "");
    }

    #[tokio::test]
    async fn form_posts_to_invoices_api() {
        let (mut server, _) = get_test_app();
        log_in(&mut server).await;

        let response = server.get(NEW_INVOICE_VIEW).await;

        let text = response.text();
        let document = Html::parse_document(&text);
        let selector = Selector::parse("form").unwrap();
        let form = document.select(&selector).next().expect("no form on page");

        assert_eq!(form.value().attr("hx-post"), Some(INVOICES_API));
    }

    #[tokio::test]
    async fn date_is_prefilled() {
        let (mut server, _) = get_test_app();
        log_in(&mut server).await;

        let response = server.get(NEW_INVOICE_VIEW).await;

        let text = response.text();
        let document = Html::parse_document(&text);
        let selector = Selector::parse("input[name='date']").unwrap();
        let input = document.select(&selector).next().expect("no date input");

        let value = input.value().attr("value").unwrap_or_default();
        assert_eq!(value.len(), 10, "expected YYYY-MM-DD, got {value:?}");
    }
}
