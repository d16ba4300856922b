//! The endpoint for logging out the current partner.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::invalidate_auth_cookie, endpoints};

/// A GET handler that invalidates the auth cookie and returns to the log in
/// page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    (
        invalidate_auth_cookie(jar),
        Redirect::to(endpoints::LOG_IN_VIEW),
    )
        .into_response()
}
