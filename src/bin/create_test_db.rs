use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::macros::{date, datetime};

use daftar::{
    NewInvoice, PasswordHash, Record, RecordType, add_employee_document, create_company,
    create_employee, create_invoice, create_partner, initialize_db,
};

/// A utility for creating a test database for the daftar web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test partner (username 'test', password 'test')...");
    let hash = PasswordHash::new("test", PasswordHash::DEFAULT_COST)?;
    let partner = create_partner("test", hash, &conn)?;

    println!("Creating test companies and employees...");
    let falcon = create_company("Falcon Trading LLC", &conn)?;
    let oasis = create_company("Oasis Shipping FZE", &conn)?;

    let rashid = create_employee("Rashid", falcon.id, &conn)?;
    add_employee_document(rashid.id, "visa", Some(date!(2026 - 03 - 14)), &conn)?;
    add_employee_document(rashid.id, "labour card", None, &conn)?;

    let priya = create_employee("Priya", falcon.id, &conn)?;
    add_employee_document(priya.id, "visa", Some(date!(2024 - 11 - 01)), &conn)?;

    let dmitri = create_employee("Dmitri", oasis.id, &conn)?;

    println!("Creating test records...");
    Record::build(RecordType::Income, 1500.0)
        .method("bank")
        .particular("Trade licence renewal")
        .invoice_no("1038")
        .status("paid")
        .created_at(datetime!(2024-01-02 06:15:00 UTC))
        .company(falcon.id)
        .created_by(partner.id.as_i64())
        .insert(&conn)?;
    Record::build(RecordType::Income, 350.0)
        .method("cash")
        .service_fee(25.0)
        .particular("Visa renewal")
        .invoice_no("1039")
        .status("paid")
        .created_at(datetime!(2024-01-05 10:30:00 UTC))
        .company(falcon.id)
        .employee(rashid.id)
        .created_by(partner.id.as_i64())
        .insert(&conn)?;
    Record::build(RecordType::Income, 500.0)
        .method("liability")
        .particular("Deposit held")
        .created_at(datetime!(2024-01-06 08:00:00 UTC))
        .company(falcon.id)
        .created_by(partner.id.as_i64())
        .insert(&conn)?;
    Record::build(RecordType::Expense, 120.0)
        .method("cash")
        .service_fee(10.0)
        .particular("Typing centre fees")
        .created_at(datetime!(2024-01-07 09:45:00 UTC))
        .company(falcon.id)
        .employee(priya.id)
        .created_by(partner.id.as_i64())
        .insert(&conn)?;
    Record::build(RecordType::Expense, 75.0)
        .method("bank")
        .particular("Medical test")
        .created_at(datetime!(2024-01-08 12:20:00 UTC))
        .company(oasis.id)
        .employee(dmitri.id)
        .created_by(partner.id.as_i64())
        .insert(&conn)?;
    Record::build(RecordType::Income, 200.0)
        .method("cash")
        .particular("Walk-in attestation")
        .self_client("walk-in")
        .created_at(datetime!(2024-01-09 07:10:00 UTC))
        .created_by(partner.id.as_i64())
        .insert(&conn)?;
    // A draft that should stay hidden from the summary.
    Record::build(RecordType::Expense, 999.0)
        .particular("Unfinished entry")
        .unpublished()
        .company(falcon.id)
        .insert(&conn)?;

    println!("Creating test invoice...");
    create_invoice(
        NewInvoice {
            title: "Visa Services".to_owned(),
            purpose: "Visa renewal".to_owned(),
            client: "Falcon Trading LLC".to_owned(),
            location: "Deira".to_owned(),
            date: "2024-01-05".to_owned(),
            remarks: "".to_owned(),
            suffix: "INV".to_owned(),
            invoice_no: "1041".to_owned(),
        },
        &conn,
    )?;

    println!("Success!");

    Ok(())
}
