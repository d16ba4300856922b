use rusqlite::Connection;
use serde::Serialize;

use crate::{Error, database_id::DatabaseId};

/// An invoice issued to a client.
///
/// All fields are kept as the free-form text the partner typed in; the
/// invoice form does not validate its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    /// The invoice's ID in the application database.
    pub id: DatabaseId,
    /// The invoice's title.
    pub title: String,
    /// What the invoice is for.
    pub purpose: String,
    /// Who the invoice is billed to.
    pub client: String,
    /// Where the work was done.
    pub location: String,
    /// The invoice date as the partner entered it.
    pub date: String,
    /// Free-form remarks.
    pub remarks: String,
    /// The numbering suffix, e.g. "INV".
    pub suffix: String,
    /// The invoice number, e.g. "1042".
    pub invoice_no: String,
}

/// The fields of an invoice that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    /// The invoice's title.
    pub title: String,
    /// What the invoice is for.
    pub purpose: String,
    /// Who the invoice is billed to.
    pub client: String,
    /// Where the work was done.
    pub location: String,
    /// The invoice date as the partner entered it.
    pub date: String,
    /// Free-form remarks.
    pub remarks: String,
    /// The numbering suffix, e.g. "INV".
    pub suffix: String,
    /// The invoice number, e.g. "1042".
    pub invoice_no: String,
}

/// Create the invoice table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_invoice_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS invoice (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                purpose TEXT NOT NULL,
                client TEXT NOT NULL,
                location TEXT NOT NULL,
                date TEXT NOT NULL,
                remarks TEXT NOT NULL,
                suffix TEXT NOT NULL,
                invoice_no TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Insert a new invoice into the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn create_invoice(invoice: NewInvoice, connection: &Connection) -> Result<Invoice, Error> {
    connection.execute(
        "INSERT INTO invoice (title, purpose, client, location, date, remarks, suffix, invoice_no) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        (
            &invoice.title,
            &invoice.purpose,
            &invoice.client,
            &invoice.location,
            &invoice.date,
            &invoice.remarks,
            &invoice.suffix,
            &invoice.invoice_no,
        ),
    )?;

    Ok(Invoice {
        id: connection.last_insert_rowid(),
        title: invoice.title,
        purpose: invoice.purpose,
        client: invoice.client,
        location: invoice.location,
        date: invoice.date,
        remarks: invoice.remarks,
        suffix: invoice.suffix,
        invoice_no: invoice.invoice_no,
    })
}

/// The numbering metadata of an invoice, used to prefill the next one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct InvoiceMeta {
    /// The numbering suffix, e.g. "INV".
    pub(crate) suffix: String,
    /// The invoice number, e.g. "1041".
    #[serde(rename = "invoiceNo")]
    pub(crate) invoice_no: String,
}

/// Get the numbering metadata of the most recently created invoice.
///
/// # Errors
///
/// Returns:
/// - [Error::NotFound] if no invoice has been created yet.
/// - [Error::SqlError] if an SQL related error occurred.
pub(crate) fn previous_invoice_meta(connection: &Connection) -> Result<InvoiceMeta, Error> {
    let meta = connection.query_row(
        "SELECT suffix, invoice_no FROM invoice ORDER BY id DESC LIMIT 1",
        [],
        |row| {
            Ok(InvoiceMeta {
                suffix: row.get(0)?,
                invoice_no: row.get(1)?,
            })
        },
    )?;

    Ok(meta)
}

/// Compute the invoice number following `previous`, e.g. "1041" to "1042".
///
/// Returns [None] if `previous` is not a number.
pub(crate) fn next_invoice_number(previous: &str) -> Option<String> {
    previous
        .trim()
        .parse::<i64>()
        .ok()
        .map(|number| (number + 1).to_string())
}
