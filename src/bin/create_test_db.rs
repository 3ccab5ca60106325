use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, macros::date};

use umsatz_rs::{LabelName, initialize_db, view::BankApi};

/// A utility for creating a test database for the REST API server of umsatz_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const ACCOUNTS: [(i64, &str, &str, &str); 2] = [
    (1, "DE89370400440532013000", "Erika", "Mustermann"),
    (2, "DE02120300000000202051", "Max", "Mustermann"),
];

const TRANSACTIONS: [(i64, i64, Date, &str, f64, Option<&str>); 8] = [
    (1, 1, date!(2025 - 01 - 01), "Gehalt Januar", 2450.00, Some("DE12500105170648489890")),
    (2, 1, date!(2025 - 01 - 03), "Miete Januar", -850.00, Some("DE75512108001245126199")),
    (3, 1, date!(2025 - 01 - 07), "Supermarkt", -63.42, None),
    (4, 1, date!(2025 - 01 - 15), "Stromabschlag", -74.00, Some("DE44500105175407324931")),
    (5, 1, date!(2025 - 02 - 01), "Gehalt Februar", 2450.00, Some("DE12500105170648489890")),
    (6, 1, date!(2025 - 02 - 03), "Miete Februar", -850.00, Some("DE75512108001245126199")),
    (7, 2, date!(2025 - 01 - 10), "Bäckerei", -4.80, None),
    (8, 2, date!(2025 - 01 - 12), "Taschengeld", 50.00, Some("DE89370400440532013000")),
];

const LABELS: [(i64, &str); 4] = [(2, "Miete"), (6, "Miete"), (3, "Lebensmittel"), (7, "Lebensmittel")];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'Bank.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'Bank.db').");
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

    println!("Creating test accounts...");

    for (id, iban, first_name, last_name) in ACCOUNTS {
        conn.execute(
            "INSERT INTO Account (accountID, IBAN, Vorname, Nachname) VALUES (?1, ?2, ?3, ?4)",
            (id, iban, first_name, last_name),
        )?;
    }

    println!("Creating test transactions...");

    for (id, account_id, date, description, amount, sender_iban) in TRANSACTIONS {
        conn.execute(
            "INSERT INTO Umsatz (UmsatzID, AccountID, Datum, Beschreibung, Betrag, SenderIBAN)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (id, account_id, date, description, amount, sender_iban),
        )?;
    }

    println!("Labelling test transactions...");

    for (transaction_id, name) in LABELS {
        conn.create_label(transaction_id, LabelName::new(name)?)?;
    }

    println!("Success!");

    Ok(())
}
