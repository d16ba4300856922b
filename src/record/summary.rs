//! Shapes query rows into the JSON summary served by the company endpoint.

use serde::Serialize;
use time::{
    Date, OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::{database_id::DatabaseId, employee::EmployeeDocument};

use super::{core::RecordType, query::TotalsRow};

/// The derived freshness of an employee's visa document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) enum VisaStatus {
    /// The visa's expiry date is in the future.
    #[serde(rename = "active")]
    Active,
    /// The visa's expiry date has passed.
    #[serde(rename = "expired")]
    Expired,
    /// The employee has no visa document with an expiry date on file.
    #[serde(rename = "no-visa")]
    NoVisa,
}

/// The client association attached to a record for display.
///
/// At most one of employee, company and self is the meaningful association,
/// chosen in that priority order.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub(crate) enum ClientDescriptor {
    /// The record belongs to an employee of the queried company.
    #[serde(rename = "employee")]
    Employee {
        id: DatabaseId,
        name: String,
        /// How many documents the employee has on file.
        docs: usize,
        #[serde(rename = "visaExpiry")]
        visa_expiry: Option<Date>,
        #[serde(rename = "visaStatus")]
        visa_status: VisaStatus,
    },
    /// The record belongs to a company.
    #[serde(rename = "company")]
    Company { id: DatabaseId, name: String },
    /// The record stands alone with a free-text client label.
    #[serde(rename = "self")]
    SelfClient { name: String },
}

/// Build the employee variant of the client descriptor.
///
/// The visa document is the first document named "visa", matched
/// case-insensitively. A visa document without an expiry date counts the same
/// as no visa document.
pub(crate) fn employee_descriptor(
    id: DatabaseId,
    name: &str,
    documents: &[EmployeeDocument],
    now: OffsetDateTime,
) -> ClientDescriptor {
    let visa_expiry = documents
        .iter()
        .find(|document| document.name.eq_ignore_ascii_case("visa"))
        .and_then(|document| document.expiry_date);

    let visa_status = match visa_expiry {
        Some(expiry) if expiry.midnight().assume_utc() < now => VisaStatus::Expired,
        Some(_) => VisaStatus::Active,
        None => VisaStatus::NoVisa,
    };

    ClientDescriptor::Employee {
        id,
        name: name.to_owned(),
        docs: documents.len(),
        visa_expiry,
        visa_status,
    }
}

/// One record shaped for display.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecordSummary {
    pub(crate) id: DatabaseId,
    #[serde(rename = "type")]
    pub(crate) record_type: RecordType,
    pub(crate) client: Option<ClientDescriptor>,
    pub(crate) method: Option<String>,
    pub(crate) particular: Option<String>,
    pub(crate) invoice_no: Option<String>,
    /// The amount rendered with exactly two decimal places.
    pub(crate) amount: String,
    /// The service fee rendered with exactly two decimal places, if present.
    pub(crate) service_fee: Option<String>,
    /// The creating partner's username.
    pub(crate) creator: Option<String>,
    pub(crate) status: Option<String>,
    pub(crate) number: Option<String>,
    pub(crate) suffix: Option<String>,
    /// The creation time rendered in the local timezone, e.g. "Jan-05 02:30pm".
    pub(crate) date: String,
}

/// The full response body of the company summary endpoint.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompanySummary {
    /// How many records are in the display list.
    pub(crate) count: usize,
    pub(crate) records: Vec<RecordSummary>,
    pub(crate) balance: f64,
    pub(crate) total_income: f64,
    pub(crate) total_expense: f64,
    /// How many records fed the totals. This counts the stricter totals set,
    /// not the display list.
    pub(crate) total_transactions: usize,
}

/// Running totals over a company's own published records.
#[derive(Debug, PartialEq)]
pub(crate) struct Totals {
    pub(crate) income: f64,
    pub(crate) expense: f64,
    pub(crate) transactions: usize,
}

impl Totals {
    /// Sum up the totals rows.
    ///
    /// Income counts amounts of income records unless their method is
    /// "liability". The expense total takes the amounts of expense records
    /// plus the service fee of every record in the set, income records
    /// included.
    pub(crate) fn from_rows(rows: &[TotalsRow]) -> Self {
        let mut income = 0.0;
        let mut expense = 0.0;

        for row in rows {
            match row.record_type {
                RecordType::Income if row.method.as_deref() != Some("liability") => {
                    income += row.amount;
                }
                RecordType::Income => {}
                RecordType::Expense => expense += row.amount,
            }

            expense += row.service_fee.unwrap_or(0.0);
        }

        Self {
            income,
            expense,
            transactions: rows.len(),
        }
    }

    pub(crate) fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// Render a money amount with exactly two decimal places, e.g. `5` → "5.00".
pub(crate) fn format_amount(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Display format for record creation times, e.g. "Jan-05 02:30pm".
const RECORD_DATE_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[month repr:short]-[day] [hour repr:12 padding:zero]:[minute][period case:lower]"
);

/// Render `created_at` in the timezone given by `offset`.
///
/// # Errors
/// Returns a [time::error::Format] if the date time cannot be formatted.
pub(crate) fn format_record_date(
    created_at: OffsetDateTime,
    offset: UtcOffset,
) -> Result<String, time::error::Format> {
    created_at.to_offset(offset).format(RECORD_DATE_FORMAT)
}
