//! Defines the routes of the application and glues the handlers together.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    invoice::{create_invoice_endpoint, get_new_invoice_page, get_prev_invoice_endpoint},
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    not_found::get_404_not_found,
    record::get_company_summary_endpoint,
};

/// Create the router for the application with `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::ROOT,
            get(|| async { Redirect::to(endpoints::NEW_INVOICE_VIEW) }),
        )
        .route(endpoints::NEW_INVOICE_VIEW, get(get_new_invoice_page))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::COMPANY_SUMMARY_API,
            get(get_company_summary_endpoint),
        )
        .route(endpoints::PREV_INVOICE_API, get(get_prev_invoice_endpoint))
        .route(endpoints::INVOICES_API, post(create_invoice_endpoint))
        .nest_service(endpoints::STATIC, ServeDir::new("static"))
        .fallback(get_404_not_found)
        .with_state(state)
}
