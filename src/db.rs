//! Creates the application database schema.

use rusqlite::Connection;

use crate::{
    company::create_company_table,
    employee::{create_employee_document_table, create_employee_table},
    invoice::create_invoice_table,
    partner::create_partner_table,
    record::create_record_table,
};

/// Create the tables for the domain models.
///
/// # Errors
/// Returns an error if any of the create table queries fail.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_partner_table(connection)?;
    create_company_table(connection)?;
    create_employee_table(connection)?;
    create_employee_document_table(connection)?;
    create_record_table(connection)?;
    create_invoice_table(connection)?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), initialize(&connection));
    }

    #[test]
    fn is_idempotent() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        initialize(&connection).unwrap();

        assert_eq!(Ok(()), initialize(&connection));
    }
}
