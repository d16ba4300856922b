//! Code for creating the employee and employee document tables and querying them.
//!
//! Employees belong to a company and carry a collection of documents (visa,
//! labour card, and so on), each with an optional expiry date. The record
//! summary endpoint uses the document named "visa" to derive a visa status
//! for each employee.

use rusqlite::Connection;
use time::Date;

use crate::{Error, database_id::DatabaseId};

/// An employee of a company.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    /// The employee's ID in the application database.
    pub id: DatabaseId,
    /// The employee's display name.
    pub name: String,
    /// The company the employee belongs to.
    pub company_id: DatabaseId,
}

/// A document held on file for an employee.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDocument {
    /// The document's ID in the application database.
    pub id: DatabaseId,
    /// The employee the document belongs to.
    pub employee_id: DatabaseId,
    /// The document's name, e.g. "visa".
    pub name: String,
    /// When the document expires, if it has an expiry date at all.
    pub expiry_date: Option<Date>,
}

/// Create the employee table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_employee_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS employee (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                company_id INTEGER NOT NULL REFERENCES company(id)
                )",
        (),
    )?;

    Ok(())
}

/// Create the employee document table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_employee_document_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS employee_document (
                id INTEGER PRIMARY KEY,
                employee_id INTEGER NOT NULL REFERENCES employee(id),
                name TEXT NOT NULL,
                expiry_date TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new employee into the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn create_employee(
    name: &str,
    company_id: DatabaseId,
    connection: &Connection,
) -> Result<Employee, Error> {
    connection.execute(
        "INSERT INTO employee (name, company_id) VALUES (?1, ?2)",
        (name, company_id),
    )?;

    Ok(Employee {
        id: connection.last_insert_rowid(),
        name: name.to_owned(),
        company_id,
    })
}

/// Add a document to an employee's file.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn add_employee_document(
    employee_id: DatabaseId,
    name: &str,
    expiry_date: Option<Date>,
    connection: &Connection,
) -> Result<EmployeeDocument, Error> {
    connection.execute(
        "INSERT INTO employee_document (employee_id, name, expiry_date) VALUES (?1, ?2, ?3)",
        (employee_id, name, expiry_date),
    )?;

    Ok(EmployeeDocument {
        id: connection.last_insert_rowid(),
        employee_id,
        name: name.to_owned(),
        expiry_date,
    })
}

/// Get all documents on file for the employee with `employee_id`.
///
/// Returns an empty list for an employee with no documents.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub(crate) fn get_employee_documents(
    employee_id: DatabaseId,
    connection: &Connection,
) -> Result<Vec<EmployeeDocument>, Error> {
    connection
        .prepare(
            "SELECT id, employee_id, name, expiry_date FROM employee_document \
            WHERE employee_id = ?1 ORDER BY id ASC",
        )?
        .query_map([employee_id], |row| {
            Ok(EmployeeDocument {
                id: row.get(0)?,
                employee_id: row.get(1)?,
                name: row.get(2)?,
                expiry_date: row.get(3)?,
            })
        })?
        .map(|document_result| document_result.map_err(Error::SqlError))
        .collect()
}
