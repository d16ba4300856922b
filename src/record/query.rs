//! Database query helpers for the company summary endpoint.
//!
//! The endpoint runs two queries with different filters: a display query that
//! also picks up employee-tagged records from other companies when requested,
//! and a stricter totals query over the company's own records only.

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{Error, database_id::DatabaseId};

use super::core::RecordType;

/// A published record joined with its creator, company and employee names,
/// ready to be shaped into a display summary.
#[derive(Debug, PartialEq)]
pub(crate) struct DisplayRow {
    pub(crate) id: DatabaseId,
    pub(crate) record_type: RecordType,
    pub(crate) method: Option<String>,
    pub(crate) amount: f64,
    pub(crate) service_fee: Option<f64>,
    pub(crate) particular: Option<String>,
    pub(crate) invoice_no: Option<String>,
    pub(crate) number: Option<String>,
    pub(crate) suffix: Option<String>,
    pub(crate) status: Option<String>,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) self_client: Option<String>,
    /// The creating partner's username.
    pub(crate) creator: Option<String>,
    /// The id and name of the record's company.
    pub(crate) company: Option<(DatabaseId, String)>,
    /// The id and name of the record's employee, only resolved when the
    /// employee belongs to the queried company.
    pub(crate) employee: Option<(DatabaseId, String)>,
}

/// The columns needed to compute a company's running totals.
#[derive(Debug, PartialEq)]
pub(crate) struct TotalsRow {
    pub(crate) record_type: RecordType,
    pub(crate) method: Option<String>,
    pub(crate) amount: f64,
    pub(crate) service_fee: Option<f64>,
}

/// The WHERE clause for the display query.
///
/// With `show_employee`, employee-tagged records are included regardless of
/// which company they belong to.
pub(crate) fn display_predicate(show_employee: bool) -> &'static str {
    if show_employee {
        "record.published = 1 AND (record.company_id = ?1 OR record.employee_id IS NOT NULL)"
    } else {
        "record.published = 1 AND record.company_id = ?1"
    }
}

/// The WHERE clause for the totals query.
///
/// Totals only ever cover the queried company's own records; without
/// `show_employee`, records tagged with an employee are excluded as well.
pub(crate) fn totals_predicate(show_employee: bool) -> &'static str {
    if show_employee {
        "published = 1 AND company_id = ?1"
    } else {
        "published = 1 AND company_id = ?1 AND employee_id IS NULL"
    }
}

/// Get the published records to display for `company_id`, newest first.
///
/// `company_id` is treated as an opaque string: SQLite's column affinity
/// coerces numeric text for the comparison, and anything else simply matches
/// no rows.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Record row mapping fails
pub(crate) fn fetch_display_rows(
    company_id: &str,
    show_employee: bool,
    connection: &Connection,
) -> Result<Vec<DisplayRow>, Error> {
    // The employee resolution is constrained to employees of the queried
    // company; an employee-matched record from another company keeps a null
    // employee column. Without show_employee the join is disabled outright so
    // the row shape stays fixed.
    let employee_join = if show_employee {
        "LEFT JOIN employee ON employee.id = record.employee_id AND employee.company_id = ?1"
    } else {
        "LEFT JOIN employee ON 0"
    };

    // Sort by creation time, and then ID to keep record order stable.
    let query = format!(
        "SELECT record.id, record.record_type, record.method, record.amount, \
        record.service_fee, record.particular, record.invoice_no, record.number, \
        record.suffix, record.status, record.created_at, record.self_client, \
        partner.username, company.id, company.name, employee.id, employee.name \
        FROM record \
        LEFT JOIN partner ON partner.id = record.created_by \
        LEFT JOIN company ON company.id = record.company_id \
        {employee_join} \
        WHERE {} \
        ORDER BY record.created_at DESC, record.id DESC",
        display_predicate(show_employee)
    );

    connection
        .prepare(&query)?
        .query_map([company_id], |row| {
            let company_id: Option<DatabaseId> = row.get(13)?;
            let company_name: Option<String> = row.get(14)?;
            let employee_id: Option<DatabaseId> = row.get(15)?;
            let employee_name: Option<String> = row.get(16)?;

            Ok(DisplayRow {
                id: row.get(0)?,
                record_type: row.get(1)?,
                method: row.get(2)?,
                amount: row.get(3)?,
                service_fee: row.get(4)?,
                particular: row.get(5)?,
                invoice_no: row.get(6)?,
                number: row.get(7)?,
                suffix: row.get(8)?,
                status: row.get(9)?,
                created_at: row.get(10)?,
                self_client: row.get(11)?,
                creator: row.get(12)?,
                company: company_id.zip(company_name),
                employee: employee_id.zip(employee_name),
            })
        })?
        .map(|row_result| row_result.map_err(Error::SqlError))
        .collect()
}

/// Get the rows feeding the totals for `company_id`.
///
/// # Errors
/// Returns [Error::SqlError] if the SQL query preparation or execution fails.
pub(crate) fn fetch_totals_rows(
    company_id: &str,
    show_employee: bool,
    connection: &Connection,
) -> Result<Vec<TotalsRow>, Error> {
    let query = format!(
        "SELECT record_type, method, amount, service_fee FROM record WHERE {}",
        totals_predicate(show_employee)
    );

    connection
        .prepare(&query)?
        .query_map([company_id], |row| {
            Ok(TotalsRow {
                record_type: row.get(0)?,
                method: row.get(1)?,
                amount: row.get(2)?,
                service_fee: row.get(3)?,
            })
        })?
        .map(|row_result| row_result.map_err(Error::SqlError))
        .collect()
}
