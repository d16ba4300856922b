//! The endpoint that serves a company's aggregated record summary as JSON.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;
use time::OffsetDateTime;

use crate::{
    AppState, Error, auth::verify_partner, employee::get_employee_documents,
    timezone::get_zone_offset,
};

use super::{
    query::{DisplayRow, fetch_display_rows, fetch_totals_rows},
    summary::{
        ClientDescriptor, CompanySummary, RecordSummary, Totals, employee_descriptor,
        format_amount, format_record_date,
    },
};

/// The state needed for the company summary endpoint.
#[derive(Debug, Clone)]
pub struct CompanySummaryState {
    /// The key for decrypting private cookies.
    pub cookie_key: Key,
    /// The timezone record dates are rendered in.
    pub local_timezone: String,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CompanySummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<CompanySummaryState> for Key {
    fn from_ref(state: &CompanySummaryState) -> Self {
        state.cookie_key.clone()
    }
}

/// The query string of the company summary endpoint.
#[derive(Debug, Deserialize)]
pub struct CompanySummaryParams {
    /// Whether to include employee-tagged records. Any value other than the
    /// literal string "false" (including absence) means yes.
    #[serde(rename = "showEmployee")]
    show_employee: Option<String>,
}

/// A GET handler that aggregates a company's published records.
///
/// The company ID path segment is taken as an opaque string, so an ID that is
/// not a number simply matches no records and yields an all-zero summary.
///
/// Any failure, including a missing or invalid session token, produces a 401
/// response with the error message in a JSON object.
pub async fn get_company_summary_endpoint(
    State(state): State<CompanySummaryState>,
    Path(company_id): Path<String>,
    Query(params): Query<CompanySummaryParams>,
    jar: PrivateCookieJar,
) -> Response {
    let show_employee = params.show_employee.as_deref() != Some("false");

    let result =
        verify_partner(&jar).and_then(|_| build_company_summary(&company_id, show_employee, &state));

    match result {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => {
            tracing::error!("could not build summary for company {company_id}: {error}");

            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response()
        }
    }
}

fn build_company_summary(
    company_id: &str,
    show_employee: bool,
    state: &CompanySummaryState,
) -> Result<CompanySummary, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;
    let now = OffsetDateTime::now_utc();

    let display_rows = fetch_display_rows(company_id, show_employee, &connection)?;
    let totals_rows = fetch_totals_rows(company_id, show_employee, &connection)?;

    let mut records = Vec::with_capacity(display_rows.len());
    for row in display_rows {
        records.push(summarize_row(row, &state.local_timezone, now, &connection)?);
    }

    let totals = Totals::from_rows(&totals_rows);

    Ok(CompanySummary {
        count: records.len(),
        records,
        balance: totals.balance(),
        total_income: totals.income,
        total_expense: totals.expense,
        total_transactions: totals.transactions,
    })
}

/// Shape one display row, resolving its client descriptor.
///
/// The employee association wins over the company one, which wins over the
/// free-text self label.
fn summarize_row(
    row: DisplayRow,
    local_timezone: &str,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<RecordSummary, Error> {
    let client = match (&row.employee, &row.company, &row.self_client) {
        (Some((employee_id, name)), _, _) => {
            let documents = get_employee_documents(*employee_id, connection)?;
            Some(employee_descriptor(*employee_id, name, &documents, now))
        }
        (None, Some((company_id, name)), _) => Some(ClientDescriptor::Company {
            id: *company_id,
            name: name.clone(),
        }),
        (None, None, Some(name)) => Some(ClientDescriptor::SelfClient { name: name.clone() }),
        (None, None, None) => None,
    };

    let offset = get_zone_offset(local_timezone, row.created_at)
        .ok_or_else(|| Error::InvalidTimezoneError(local_timezone.to_owned()))?;
    let date = format_record_date(row.created_at, offset)
        .map_err(|error| Error::DateFormatError(error.to_string()))?;

    Ok(RecordSummary {
        id: row.id,
        record_type: row.record_type,
        client,
        method: row.method,
        particular: row.particular,
        invoice_no: row.invoice_no,
        amount: format_amount(row.amount),
        service_fee: row.service_fee.map(format_amount),
        creator: row.creator,
        status: row.status,
        number: row.number,
        suffix: row.suffix,
        date,
    })
}

#[cfg(test)]
mod company_summary_endpoint_tests {
    use axum::{
        Router,
        routing::{get, post},
    };
    use axum_extra::extract::PrivateCookieJar;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};
    use time::{Duration, macros::datetime};

    use crate::{
        AppState, Error,
        auth::{COOKIE_TOKEN, set_auth_cookie},
        company::create_company,
        employee::{add_employee_document, create_employee},
        endpoints::{COMPANY_SUMMARY_API, format_endpoint},
        partner::PartnerId,
        record::{Record, RecordType},
    };

    use super::get_company_summary_endpoint;

    const TEST_LOG_IN: &str = "/test_log_in";

    async fn post_test_log_in(jar: PrivateCookieJar) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(jar, PartnerId::new(1), Duration::minutes(5))
    }

    fn get_test_app() -> (TestServer, AppState) {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "42", "Asia/Dubai")
            .expect("could not create app state");

        let app = Router::new()
            .route(COMPANY_SUMMARY_API, get(get_company_summary_endpoint))
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

    #[tokio::test]
    async fn summary_requires_auth() {
        let (server, _) = get_test_app();

        let response = server.get(&format_endpoint(COMPANY_SUMMARY_API, 1)).await;

        response.assert_status_unauthorized();
        let body: Value = response.json();
        assert!(
            body.get("error").is_some_and(Value::is_string),
            "response missing error message: {body}"
        );
    }

    #[tokio::test]
    async fn summary_of_company_without_records_is_all_zero() {
        let (mut server, state) = get_test_app();
        let company_id = {
            let conn = state.db_connection.lock().unwrap();
            create_company("Falcon Trading LLC", &conn).unwrap().id
        };
        log_in(&mut server).await;

        let response = server
            .get(&format_endpoint(COMPANY_SUMMARY_API, company_id))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "count": 0,
            "records": [],
            "balance": 0.0,
            "totalIncome": 0.0,
            "totalExpense": 0.0,
            "totalTransactions": 0,
        }));
    }

    #[tokio::test]
    async fn summary_shapes_records_and_totals() {
        let (mut server, state) = get_test_app();

        let company_id = {
            let conn = state.db_connection.lock().unwrap();
            let falcon = create_company("Falcon Trading LLC", &conn).unwrap();
            let rashid = create_employee("Rashid", falcon.id, &conn).unwrap();
            add_employee_document(
                rashid.id,
                "visa",
                Some(time::macros::date!(2099 - 01 - 01)),
                &conn,
            )
            .unwrap();

            Record::build(RecordType::Income, 100.0)
                .method("cash")
                .company(falcon.id)
                .employee(rashid.id)
                .created_at(datetime!(2024-01-05 10:30:00 UTC))
                .insert(&conn)
                .unwrap();
            Record::build(RecordType::Expense, 30.0)
                .service_fee(5.0)
                .company(falcon.id)
                .created_at(datetime!(2024-01-04 10:30:00 UTC))
                .insert(&conn)
                .unwrap();

            falcon.id
        };
        log_in(&mut server).await;

        let response = server
            .get(&format_endpoint(COMPANY_SUMMARY_API, company_id))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();

        assert_eq!(body["count"], json!(2));
        assert_eq!(body["totalIncome"], json!(100.0));
        assert_eq!(body["totalExpense"], json!(35.0));
        assert_eq!(body["balance"], json!(65.0));
        assert_eq!(body["totalTransactions"], json!(2));

        // Newest first, with a 12-hour Dubai timestamp (UTC+4).
        let newest = &body["records"][0];
        assert_eq!(newest["type"], json!("income"));
        assert_eq!(newest["amount"], json!("100.00"));
        assert_eq!(newest["date"], json!("Jan-05 02:30pm"));
        assert_eq!(newest["client"]["type"], json!("employee"));
        assert_eq!(newest["client"]["name"], json!("Rashid"));
        assert_eq!(newest["client"]["visaStatus"], json!("active"));

        let oldest = &body["records"][1];
        assert_eq!(oldest["amount"], json!("30.00"));
        assert_eq!(oldest["serviceFee"], json!("5.00"));
        assert_eq!(oldest["client"]["type"], json!("company"));
    }

    #[tokio::test]
    async fn summary_falls_back_to_company_for_foreign_employee() {
        let (mut server, state) = get_test_app();

        let falcon_id = {
            let conn = state.db_connection.lock().unwrap();
            let falcon = create_company("Falcon Trading LLC", &conn).unwrap();
            let oasis = create_company("Oasis Shipping FZE", &conn).unwrap();
            let outsider = create_employee("Dmitri", oasis.id, &conn).unwrap();

            // Pulled in by the employee clause, but Dmitri is not Falcon's
            // employee so the descriptor should name Oasis instead.
            Record::build(RecordType::Expense, 40.0)
                .company(oasis.id)
                .employee(outsider.id)
                .insert(&conn)
                .unwrap();

            falcon.id
        };
        log_in(&mut server).await;

        let response = server
            .get(&format_endpoint(COMPANY_SUMMARY_API, falcon_id))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();

        assert_eq!(body["count"], json!(1));
        assert_eq!(body["records"][0]["client"]["type"], json!("company"));
        assert_eq!(
            body["records"][0]["client"]["name"],
            json!("Oasis Shipping FZE")
        );
        // The foreign record must not leak into the totals.
        assert_eq!(body["totalTransactions"], json!(0));
        assert_eq!(body["totalExpense"], json!(0.0));
    }

    #[tokio::test]
    async fn summary_falls_back_to_self_label_and_then_null() {
        let (mut server, state) = get_test_app();

        let falcon_id = {
            let conn = state.db_connection.lock().unwrap();
            let falcon = create_company("Falcon Trading LLC", &conn).unwrap();
            let oasis = create_company("Oasis Shipping FZE", &conn).unwrap();
            let outsider = create_employee("Dmitri", oasis.id, &conn).unwrap();

            // Neither record has a company, and the employee does not belong
            // to Falcon, so the descriptor falls through to the self label
            // and then to nothing.
            Record::build(RecordType::Income, 200.0)
                .employee(outsider.id)
                .self_client("walk-in")
                .created_at(datetime!(2024-01-05 10:30:00 UTC))
                .insert(&conn)
                .unwrap();
            Record::build(RecordType::Income, 50.0)
                .employee(outsider.id)
                .created_at(datetime!(2024-01-04 10:30:00 UTC))
                .insert(&conn)
                .unwrap();

            falcon.id
        };
        log_in(&mut server).await;

        let response = server
            .get(&format_endpoint(COMPANY_SUMMARY_API, falcon_id))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();

        assert_eq!(body["count"], json!(2));
        assert_eq!(
            body["records"][0]["client"],
            json!({"type": "self", "name": "walk-in"})
        );
        assert_eq!(body["records"][1]["client"], json!(null));
    }

    #[tokio::test]
    async fn summary_hides_employee_records_when_asked() {
        let (mut server, state) = get_test_app();

        let company_id = {
            let conn = state.db_connection.lock().unwrap();
            let falcon = create_company("Falcon Trading LLC", &conn).unwrap();
            let rashid = create_employee("Rashid", falcon.id, &conn).unwrap();

            Record::build(RecordType::Income, 100.0)
                .company(falcon.id)
                .insert(&conn)
                .unwrap();
            Record::build(RecordType::Expense, 40.0)
                .company(falcon.id)
                .employee(rashid.id)
                .insert(&conn)
                .unwrap();

            falcon.id
        };
        log_in(&mut server).await;

        let path = format_endpoint(COMPANY_SUMMARY_API, company_id);
        let response = server
            .get(&path)
            .add_query_param("showEmployee", "false")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();

        assert_eq!(body["count"], json!(1));
        assert_eq!(body["totalTransactions"], json!(1));
        assert_eq!(body["totalExpense"], json!(0.0));
        assert_eq!(body["balance"], json!(100.0));
    }

    #[tokio::test]
    async fn show_employee_defaults_to_true_for_other_values() {
        let (mut server, state) = get_test_app();

        let company_id = {
            let conn = state.db_connection.lock().unwrap();
            let falcon = create_company("Falcon Trading LLC", &conn).unwrap();
            let rashid = create_employee("Rashid", falcon.id, &conn).unwrap();

            Record::build(RecordType::Expense, 40.0)
                .company(falcon.id)
                .employee(rashid.id)
                .insert(&conn)
                .unwrap();

            falcon.id
        };
        log_in(&mut server).await;

        let path = format_endpoint(COMPANY_SUMMARY_API, company_id);
        let response = server.get(&path).add_query_param("showEmployee", "0").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["count"], json!(1));
    }

    #[tokio::test]
    async fn unknown_company_id_yields_empty_summary() {
        let (mut server, _) = get_test_app();
        log_in(&mut server).await;

        let response = server.get("/api/company/not-a-number").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["count"], json!(0));
        assert_eq!(body["balance"], json!(0.0));
    }
}
