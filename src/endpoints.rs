//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/company/{company_id}', use [format_endpoint].

/// The root route which redirects to the new invoice page.
pub const ROOT: &str = "/";
/// The page for creating a new invoice.
pub const NEW_INVOICE_VIEW: &str = "/invoices/new";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a partner.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current partner.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for the aggregated record summary of a company.
pub const COMPANY_SUMMARY_API: &str = "/api/company/{company_id}";
/// The route for the numbering metadata of the most recent invoice.
pub const PREV_INVOICE_API: &str = "/api/invoice/prev";
/// The route to create an invoice.
pub const INVOICES_API: &str = "/api/invoices";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/company/{company_id}',
/// '{company_id}' is the parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
