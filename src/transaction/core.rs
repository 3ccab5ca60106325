//! Defines the transaction model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, account::AccountId, database_id::TransactionId};

/// An expense or income, i.e. an event where money left or entered an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    #[serde(rename = "UmsatzID")]
    pub id: TransactionId,
    /// The account the transaction was booked on.
    #[serde(rename = "AccountID")]
    pub account_id: AccountId,
    /// When the transaction happened.
    #[serde(rename = "Datum")]
    pub date: Date,
    /// A text description of what the transaction was for.
    #[serde(rename = "Beschreibung")]
    pub description: String,
    /// The amount of money spent (negative) or earned (positive).
    #[serde(rename = "Betrag")]
    pub amount: f64,
    /// The IBAN of the counterparty, if the bank reported one.
    #[serde(rename = "SenderIBAN")]
    pub sender_iban: Option<String>,
}

pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS Umsatz (
            UmsatzID INTEGER PRIMARY KEY,
            AccountID INTEGER NOT NULL,
            Datum TEXT NOT NULL,
            Beschreibung TEXT NOT NULL,
            Betrag REAL NOT NULL,
            SenderIBAN TEXT,
            FOREIGN KEY(AccountID) REFERENCES Account(accountID) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_umsatz_account_datum ON Umsatz(AccountID, Datum);",
    )?;

    Ok(())
}

/// A row that cannot be read is logged with its ID.
fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id: TransactionId = row.get(0)?;

    let read_columns = || -> Result<Transaction, rusqlite::Error> {
        Ok(Transaction {
            id,
            account_id: row.get(1)?,
            date: row.get(2)?,
            description: row.get(3)?,
            amount: row.get(4)?,
            sender_iban: row.get(5)?,
        })
    };

    read_columns().inspect_err(|error| {
        tracing::error!("Could not read transaction {id} from table Umsatz: {error}");
    })
}

/// Get all transactions booked on `account_id`, newest first.
///
/// Transactions on the same date are ordered by descending ID.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn list_transactions(
    account_id: AccountId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT UmsatzID, AccountID, Datum, Beschreibung, Betrag, SenderIBAN
             FROM Umsatz
             WHERE AccountID = ?1
             ORDER BY Datum DESC, UmsatzID DESC",
        )?
        .query_map([account_id], map_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Check whether a transaction with `transaction_id` exists.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn transaction_exists(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<bool, Error> {
    let exists: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM Umsatz WHERE UmsatzID = ?1)",
        [transaction_id],
        |row| row.get(0),
    )?;

    Ok(exists)
}
