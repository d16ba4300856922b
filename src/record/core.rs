use rusqlite::{
    Connection, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, database_id::DatabaseId};

/// Whether a record brings money in or takes money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// Money received.
    Income,
    /// Money paid out.
    Expense,
}

impl RecordType {
    fn as_str(&self) -> &'static str {
        match self {
            RecordType::Income => "income",
            RecordType::Expense => "expense",
        }
    }
}

impl ToSql for RecordType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for RecordType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(RecordType::Income),
            "expense" => Ok(RecordType::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown record type {other:?}").into(),
            )),
        }
    }
}

/// One financial transaction entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The record's ID in the application database.
    pub id: DatabaseId,
    /// Whether the record is income or an expense.
    pub record_type: RecordType,
    /// How the money moved, e.g. "cash", "bank" or "liability".
    pub method: Option<String>,
    /// The amount of money received or paid.
    pub amount: f64,
    /// An additional fee charged on top of the amount.
    pub service_fee: Option<f64>,
    /// What the transaction was for.
    pub particular: Option<String>,
    /// The invoice number the record was billed under.
    pub invoice_no: Option<String>,
    /// The record's own running number.
    pub number: Option<String>,
    /// The record's numbering suffix.
    pub suffix: Option<String>,
    /// A free-form status, e.g. "paid" or "pending".
    pub status: Option<String>,
    /// When the record was created, in UTC.
    pub created_at: OffsetDateTime,
    /// Whether the record is finalized and visible, as opposed to a draft.
    pub published: bool,
    /// The company the record belongs to, if any.
    pub company_id: Option<DatabaseId>,
    /// The employee the record belongs to, if any.
    pub employee_id: Option<DatabaseId>,
    /// A free-text client label for records with no company or employee.
    pub self_client: Option<String>,
    /// The partner who created the record.
    pub created_by: Option<DatabaseId>,
}

impl Record {
    /// Start building a published record with the given type and amount,
    /// created now. All other fields default to empty.
    pub fn build(record_type: RecordType, amount: f64) -> RecordBuilder {
        RecordBuilder {
            record_type,
            amount,
            method: None,
            service_fee: None,
            particular: None,
            invoice_no: None,
            number: None,
            suffix: None,
            status: None,
            created_at: OffsetDateTime::now_utc(),
            published: true,
            company_id: None,
            employee_id: None,
            self_client: None,
            created_by: None,
        }
    }
}

/// Builds a [Record] field by field before inserting it.
///
/// Used by tests and the seed binary; records are not created through the web
/// interface shown here.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record_type: RecordType,
    amount: f64,
    method: Option<String>,
    service_fee: Option<f64>,
    particular: Option<String>,
    invoice_no: Option<String>,
    number: Option<String>,
    suffix: Option<String>,
    status: Option<String>,
    created_at: OffsetDateTime,
    published: bool,
    company_id: Option<DatabaseId>,
    employee_id: Option<DatabaseId>,
    self_client: Option<String>,
    created_by: Option<DatabaseId>,
}

impl RecordBuilder {
    /// Set the payment method.
    pub fn method(mut self, method: &str) -> Self {
        self.method = Some(method.to_owned());
        self
    }

    /// Set the service fee.
    pub fn service_fee(mut self, service_fee: f64) -> Self {
        self.service_fee = Some(service_fee);
        self
    }

    /// Set the particular (what the transaction was for).
    pub fn particular(mut self, particular: &str) -> Self {
        self.particular = Some(particular.to_owned());
        self
    }

    /// Set the invoice number.
    pub fn invoice_no(mut self, invoice_no: &str) -> Self {
        self.invoice_no = Some(invoice_no.to_owned());
        self
    }

    /// Set the record's running number.
    pub fn number(mut self, number: &str) -> Self {
        self.number = Some(number.to_owned());
        self
    }

    /// Set the numbering suffix.
    pub fn suffix(mut self, suffix: &str) -> Self {
        self.suffix = Some(suffix.to_owned());
        self
    }

    /// Set the status.
    pub fn status(mut self, status: &str) -> Self {
        self.status = Some(status.to_owned());
        self
    }

    /// Set the creation time.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = created_at;
        self
    }

    /// Mark the record as a draft, hiding it from the summary endpoint.
    pub fn unpublished(mut self) -> Self {
        self.published = false;
        self
    }

    /// Associate the record with a company.
    pub fn company(mut self, company_id: DatabaseId) -> Self {
        self.company_id = Some(company_id);
        self
    }

    /// Associate the record with an employee.
    pub fn employee(mut self, employee_id: DatabaseId) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    /// Attach a free-text client label.
    pub fn self_client(mut self, self_client: &str) -> Self {
        self.self_client = Some(self_client.to_owned());
        self
    }

    /// Set the partner who created the record.
    pub fn created_by(mut self, partner_id: DatabaseId) -> Self {
        self.created_by = Some(partner_id);
        self
    }

    /// Insert the record into the database.
    ///
    /// # Errors
    ///
    /// Returns a [Error::SqlError] if an SQL related error occurred.
    pub fn insert(self, connection: &Connection) -> Result<Record, Error> {
        let created_at = self.created_at.to_offset(UtcOffset::UTC);

        connection.execute(
            "INSERT INTO record (
                record_type, method, amount, service_fee, particular, invoice_no,
                number, suffix, status, created_at, published, company_id,
                employee_id, self_client, created_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                self.record_type,
                self.method,
                self.amount,
                self.service_fee,
                self.particular,
                self.invoice_no,
                self.number,
                self.suffix,
                self.status,
                created_at,
                self.published,
                self.company_id,
                self.employee_id,
                self.self_client,
                self.created_by,
            ],
        )?;

        Ok(Record {
            id: connection.last_insert_rowid(),
            record_type: self.record_type,
            method: self.method,
            amount: self.amount,
            service_fee: self.service_fee,
            particular: self.particular,
            invoice_no: self.invoice_no,
            number: self.number,
            suffix: self.suffix,
            status: self.status,
            created_at,
            published: self.published,
            company_id: self.company_id,
            employee_id: self.employee_id,
            self_client: self.self_client,
            created_by: self.created_by,
        })
    }
}

/// Create the record table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_record_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS record (
                id INTEGER PRIMARY KEY,
                record_type TEXT NOT NULL,
                method TEXT,
                amount REAL NOT NULL,
                service_fee REAL,
                particular TEXT,
                invoice_no TEXT,
                number TEXT,
                suffix TEXT,
                status TEXT,
                created_at TEXT NOT NULL,
                published INTEGER NOT NULL DEFAULT 0,
                company_id INTEGER REFERENCES company(id),
                employee_id INTEGER REFERENCES employee(id),
                self_client TEXT,
                created_by INTEGER REFERENCES partner(id)
                )",
        (),
    )?;

    Ok(())
}
