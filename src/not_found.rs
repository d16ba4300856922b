//! Defines the 404 not found page and its route handler.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{endpoints, view_templates::base};

/// Get a response containing the 404 not found page.
pub(crate) fn get_404_not_found_response() -> Response {
    let page = base(
        "Page Not Found",
        &html! {
            main class="center-panel"
            {
                h1 { "404 Not Found" }
                p { "The page you were looking for does not exist." }
                a href=(endpoints::ROOT) { "Back to safety" }
            }
        },
    );

    (StatusCode::NOT_FOUND, page).into_response()
}

/// The fallback route handler for unknown paths.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}
