//! Code for creating the partner table and fetching partner accounts from the database.
//!
//! Partners are the authenticated users of the application. They may query
//! company-wide aggregates and create invoices, and they appear as the
//! creators of records.

use std::fmt::Display;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer partner IDs.
///
/// This helps disambiguate partner IDs from other types of IDs, leading to
/// better compile time errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct PartnerId(i64);

impl PartnerId {
    /// Create a new partner ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the partner ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for PartnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A partner account.
#[derive(Debug, Clone, PartialEq)]
pub struct Partner {
    /// The partner's ID in the application database.
    pub id: PartnerId,
    /// The name the partner logs in with, also shown as the creator of records.
    pub username: String,
    /// The partner's password hash.
    pub password_hash: PasswordHash,
}

/// Create the partner table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_partner_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS partner (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new partner into the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred, including
/// when `username` is already taken.
pub fn create_partner(
    username: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<Partner, Error> {
    connection.execute(
        "INSERT INTO partner (username, password) VALUES (?1, ?2)",
        (username, password_hash.as_ref()),
    )?;

    let id = PartnerId::new(connection.last_insert_rowid());

    Ok(Partner {
        id,
        username: username.to_owned(),
        password_hash,
    })
}

/// Get the partner from the database with a username equal to `username`.
///
/// # Errors
///
/// This function will return an error if:
/// - `username` does not belong to a registered partner.
/// - there was an error trying to access the database.
pub fn get_partner_by_username(
    username: &str,
    connection: &Connection,
) -> Result<Partner, Error> {
    connection
        .prepare("SELECT id, username, password FROM partner WHERE username = :username")?
        .query_row(&[(":username", username)], |row| {
            let raw_id = row.get(0)?;
            let username: String = row.get(1)?;
            let raw_password_hash: String = row.get(2)?;

            Ok(Partner {
                id: PartnerId::new(raw_id),
                username,
                password_hash: PasswordHash::new_unchecked(&raw_password_hash),
            })
        })
        .map_err(|error| error.into())
}
