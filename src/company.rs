//! Code for creating the company table and inserting companies.

use rusqlite::Connection;

use crate::{Error, database_id::DatabaseId};

/// A company whose records are tracked by the application.
#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    /// The company's ID in the application database.
    pub id: DatabaseId,
    /// The company's display name.
    pub name: String,
}

/// Create the company table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_company_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS company (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new company into the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn create_company(name: &str, connection: &Connection) -> Result<Company, Error> {
    connection.execute("INSERT INTO company (name) VALUES (?1)", (name,))?;

    Ok(Company {
        id: connection.last_insert_rowid(),
        name: name.to_owned(),
    })
}
