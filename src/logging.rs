//! Middleware for logging requests and responses.

use axum::{extract::Request, http::header::CONTENT_TYPE, middleware::Next, response::Response};

/// How many bytes of a request or response body to log at the `info` level.
const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is truncated
/// and the full body logged at the `debug` level. Password fields in form
/// submissions are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let body_text = String::from_utf8_lossy(&body_bytes).to_string();

    let is_form_post = parts.method == axum::http::Method::POST
        && parts.headers.get(CONTENT_TYPE)
            == Some(&"application/x-www-form-urlencoded".parse().unwrap());
    let display_text = if is_form_post {
        redact_field(&body_text, "password")
    } else {
        body_text.clone()
    };
    log_payload("Received request", &format!("{parts:#?}"), &display_text);

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    let body_text = String::from_utf8_lossy(&body_bytes).to_string();
    log_payload("Sending response", &format!("{parts:#?}"), &body_text);

    Response::from_parts(parts, body_text.into())
}

fn redact_field(form_text: &str, field_name: &str) -> String {
    let start = match form_text.find(&format!("{field_name}=")) {
        Some(field_pos) => field_pos,
        None => return form_text.to_string(),
    };

    let end = form_text[start..]
        .find('&')
        .map(|end| start + end)
        .unwrap_or(form_text.len());
    let field = &form_text[start..end];

    form_text.replace(field, &format!("{field_name}=********"))
}

fn log_payload(direction: &str, headers: &str, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "{direction}: {headers}\nbody: {}...",
            &body[..LOG_BODY_LENGTH_LIMIT]
        );
        tracing::debug!("Full body: {body:?}");
    } else {
        tracing::info!("{direction}: {headers}\nbody: {body:?}");
    }
}
