use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId};

/// Database identifier for an account.
pub type AccountId = DatabaseId;

/// A bank account and the name of its holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// The id for the account.
    #[serde(rename = "accountID")]
    pub id: AccountId,
    /// The international bank account number.
    #[serde(rename = "IBAN")]
    pub iban: String,
    /// The account holder's first name.
    #[serde(rename = "Vorname")]
    pub first_name: String,
    /// The account holder's last name.
    #[serde(rename = "Nachname")]
    pub last_name: String,
}

impl Account {
    /// The account holder's full name, e.g. "Erika Mustermann".
    pub fn holder_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS Account (
            accountID INTEGER PRIMARY KEY,
            IBAN TEXT NOT NULL,
            Vorname TEXT NOT NULL,
            Nachname TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        iban: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
    })
}

/// Get every account ordered by ID.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn list_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT accountID, IBAN, Vorname, Nachname FROM Account ORDER BY accountID")?
        .query_map([], map_row)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Get a single account, or `None` if there is no account with `account_id`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn get_account(account_id: AccountId, connection: &Connection) -> Result<Option<Account>, Error> {
    connection
        .prepare("SELECT accountID, IBAN, Vorname, Nachname FROM Account WHERE accountID = ?1")?
        .query_row([account_id], map_row)
        .optional()
        .map_err(Error::from)
}
