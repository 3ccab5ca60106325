#![allow(missing_docs)]

//! Fixtures shared by the unit tests.

use rusqlite::Connection;
use time::Date;

use crate::{AppState, db::initialize};

#[track_caller]
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");

    connection
}

#[track_caller]
pub(crate) fn get_test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(connection).expect("Could not create app state.")
}

#[track_caller]
pub(crate) fn insert_account(
    connection: &Connection,
    id: i64,
    iban: &str,
    first_name: &str,
    last_name: &str,
) {
    connection
        .execute(
            "INSERT INTO Account (accountID, IBAN, Vorname, Nachname) VALUES (?1, ?2, ?3, ?4)",
            (id, iban, first_name, last_name),
        )
        .expect("Could not insert account.");
}

#[track_caller]
pub(crate) fn insert_transaction(
    connection: &Connection,
    id: i64,
    account_id: i64,
    date: Date,
    description: &str,
    amount: f64,
) {
    connection
        .execute(
            "INSERT INTO Umsatz (UmsatzID, AccountID, Datum, Beschreibung, Betrag)
            VALUES (?1, ?2, ?3, ?4, ?5)",
            (id, account_id, date, description, amount),
        )
        .expect("Could not insert transaction.");
}

#[track_caller]
pub(crate) fn count_labels(connection: &Connection) -> i64 {
    connection
        .query_row("SELECT COUNT(*) FROM Labels", [], |row| row.get(0))
        .expect("Could not count labels.")
}

#[track_caller]
pub(crate) fn count_links(connection: &Connection) -> i64 {
    connection
        .query_row("SELECT COUNT(*) FROM UmsatzLabels", [], |row| row.get(0))
        .expect("Could not count label links.")
}

/// Replace the `{...}` parameter in `endpoint_path` with `id`, e.g. '/api/umsatz/{account_id}'
/// becomes '/api/umsatz/1'. Paths without a parameter are returned unchanged.
pub(crate) fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
