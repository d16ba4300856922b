//! The log in page and the endpoint it submits to.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{set_auth_cookie, verify_partner},
    endpoints,
    partner::get_partner_by_username,
    view_templates::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, error_banner,
    },
};

/// The state needed for logging in partners.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key for encrypting and decrypting private cookies.
    pub cookie_key: Key,
    /// How long an auth cookie stays valid after logging in.
    pub cookie_duration: Duration,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The credentials submitted by the log in form.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    username: String,
    password: String,
}

fn log_in_form(error: Option<&str>) -> Markup {
    html! {
        form hx-post=(endpoints::LOG_IN_API) hx-swap="outerHTML" hx-disabled-elt="find button"
        {
            @if let Some(message) = error {
                (error_banner("Could not log in", message))
            }

            label class=(FORM_LABEL_STYLE)
            {
                "Username"
                input class=(FORM_TEXT_INPUT_STYLE) type="text" name="username" autocomplete="username";
            }

            label class=(FORM_LABEL_STYLE)
            {
                "Password"
                input class=(FORM_TEXT_INPUT_STYLE) type="password" name="password" autocomplete="current-password";
            }

            button class=(BUTTON_PRIMARY_STYLE) type="submit"
            {
                "Log In"
                span class="htmx-indicator" { " ..." }
            }
        }
    }
}

/// A GET handler that displays the log in page.
///
/// A partner that is already logged in is sent straight to the invoice form.
pub async fn get_log_in_page(State(_): State<LogInState>, jar: PrivateCookieJar) -> Response {
    if verify_partner(&jar).is_ok() {
        return Redirect::to(endpoints::NEW_INVOICE_VIEW).into_response();
    }

    base(
        "Log In",
        &html! {
            main class="center-panel"
            {
                h1 { "Log In" }
                (log_in_form(None))
            }
        },
    )
    .into_response()
}

/// A POST handler that checks a partner's credentials and sets the auth cookie.
///
/// On invalid credentials the form is re-rendered with an error banner, which
/// htmx swaps in place of the submitted form.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(credentials): Form<Credentials>,
) -> Response {
    let partner_result = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| get_partner_by_username(&credentials.username, &connection));

    let partner = match partner_result {
        Ok(partner) => partner,
        // An unknown username gets the same message as a wrong password.
        Err(Error::NotFound) => {
            return log_in_form(Some("Incorrect username or password.")).into_response();
        }
        Err(error) => return error.into_response(),
    };

    match partner.password_hash.verify(&credentials.password) {
        Ok(true) => {}
        Ok(false) => {
            return log_in_form(Some("Incorrect username or password.")).into_response();
        }
        Err(error) => return error.into_response(),
    }

    match set_auth_cookie(jar, partner.id, state.cookie_duration) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::NEW_INVOICE_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod log_in_tests {
    use axum::{
        Router,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        AppState, PasswordHash,
        auth::COOKIE_TOKEN,
        endpoints::{LOG_IN_API, LOG_IN_VIEW, NEW_INVOICE_VIEW},
        partner::create_partner,
    };

    use super::{get_log_in_page, post_log_in};

    fn get_test_app() -> (TestServer, AppState) {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "42", "Asia/Dubai")
            .expect("could not create app state");
        {
            let conn = state.db_connection.lock().unwrap();
            let hash = PasswordHash::new("hunter2", 4).unwrap();
            create_partner("acme", hash, &conn).unwrap();
        }

        let app = Router::new()
            .route(LOG_IN_VIEW, get(get_log_in_page))
            .route(LOG_IN_API, post(post_log_in))
            .with_state(state.clone());
        let server = TestServer::new(app).expect("could not create test server");

        (server, state)
    }

    #[tokio::test]
    async fn page_contains_log_in_form() {
        let (server, _) = get_test_app();

        let response = server.get(LOG_IN_VIEW).await;

        response.assert_status_ok();
        let text = response.text();
        let document = Html::parse_document(&text);
        let form_selector = Selector::parse("form").unwrap();
        let form = document
            .select(&form_selector)
            .next()
            .expect("no form on page");

        assert_eq!(form.value().attr("hx-post"), Some(LOG_IN_API));

        for name in ["username", "password"] {
            let selector = Selector::parse(&format!("input[name='{name}']")).unwrap();
            assert!(
                document.select(&selector).next().is_some(),
                "no input named {name}"
            );
        }
    }

    #[tokio::test]
    async fn valid_credentials_set_cookie_and_redirect() {
        let (server, _) = get_test_app();

        let response = server
            .post(LOG_IN_API)
            .form(&[("username", "acme"), ("password", "hunter2")])
            .await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("hx-redirect").to_str().unwrap(),
            NEW_INVOICE_VIEW
        );
        assert!(!response.cookie(COOKIE_TOKEN).value().is_empty());
    }

    #[tokio::test]
    async fn wrong_password_renders_error_without_cookie() {
        let (server, _) = get_test_app();

        let response = server
            .post(LOG_IN_API)
            .form(&[("username", "acme"), ("password", "password123")])
            .await;

        response.assert_status_ok();
        assert!(response.maybe_cookie(COOKIE_TOKEN).is_none());
        assert!(
            response.text().contains("Incorrect username or password."),
            "missing error banner"
        );
    }

    #[tokio::test]
    async fn unknown_username_gets_same_error_as_wrong_password() {
        let (server, _) = get_test_app();

        let response = server
            .post(LOG_IN_API)
            .form(&[("username", "nobody"), ("password", "hunter2")])
            .await;

        response.assert_status_ok();
        assert!(response.maybe_cookie(COOKIE_TOKEN).is_none());
        assert!(response.text().contains("Incorrect username or password."));
    }

    #[tokio::test]
    async fn logged_in_partner_is_redirected_away_from_log_in_page() {
        let (mut server, _) = get_test_app();

        let response = server
            .post(LOG_IN_API)
            .form(&[("username", "acme"), ("password", "hunter2")])
            .await;
        server.add_cookie(response.cookie(COOKIE_TOKEN));

        let response = server.get(LOG_IN_VIEW).await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("location").to_str().unwrap(),
            NEW_INVOICE_VIEW
        );
    }
}
