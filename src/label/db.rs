//! Database operations for labels and the transaction-label junction table.
//!
//! These functions each run a single statement. Anything that needs several of them to be
//! consistent goes through [crate::label::service], which wraps them in one SQLite transaction.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    database_id::TransactionId,
    label::{Label, LabelId, LabelName},
};

/// Initialize the label and junction tables and their indexes.
///
/// Label names are made unique with an index. Databases created before that index existed may
/// already hold duplicate names, in which case the index is skipped and a warning is logged; see
/// [find_label_by_name] for how such duplicates are resolved.
pub fn create_label_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS Labels (
            LabelID INTEGER PRIMARY KEY,
            Name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS UmsatzLabels (
            UmsatzID INTEGER NOT NULL,
            LabelID INTEGER NOT NULL,
            PRIMARY KEY (UmsatzID, LabelID),
            FOREIGN KEY(UmsatzID) REFERENCES Umsatz(UmsatzID) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(LabelID) REFERENCES Labels(LabelID) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_umsatz_labels_label_id ON UmsatzLabels(LabelID);",
    )?;

    match connection.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_labels_name ON Labels(Name)",
        (),
    ) {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(error, _))
            if error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            let duplicates = get_duplicate_label_names(connection)?;
            tracing::warn!(
                "Labels contains duplicate names {duplicates:?}, label names will not be \
                enforced as unique. The label with the lowest ID is used for each name."
            );
            Ok(())
        }
        Err(error) => Err(error),
    }
}

fn get_duplicate_label_names(connection: &Connection) -> Result<Vec<String>, rusqlite::Error> {
    connection
        .prepare("SELECT Name FROM Labels GROUP BY Name HAVING COUNT(*) > 1 ORDER BY Name")?
        .query_map([], |row| row.get(0))?
        .collect()
}

fn map_row(row: &Row) -> Result<Label, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = LabelName::new_unchecked(&raw_name);

    Ok(Label { id, name })
}

/// Find the label with exactly `name`.
///
/// If there are several labels with the same name, the one with the lowest ID is returned.
pub fn find_label_by_name(name: &LabelName, connection: &Connection) -> Result<Option<Label>, Error> {
    connection
        .prepare("SELECT LabelID, Name FROM Labels WHERE Name = ?1 ORDER BY LabelID LIMIT 1")?
        .query_row([name.as_ref()], map_row)
        .optional()
        .map_err(Error::from)
}

/// Create a label and return it with its generated ID.
pub fn insert_label(name: LabelName, connection: &Connection) -> Result<Label, Error> {
    connection.execute("INSERT INTO Labels (Name) VALUES (?1)", (name.as_ref(),))?;

    let id = connection.last_insert_rowid();

    Ok(Label { id, name })
}

/// Retrieve a single label by ID.
#[cfg(test)]
pub fn get_label(label_id: LabelId, connection: &Connection) -> Result<Option<Label>, Error> {
    connection
        .prepare("SELECT LabelID, Name FROM Labels WHERE LabelID = ?1")?
        .query_row([label_id], map_row)
        .optional()
        .map_err(Error::from)
}

/// Delete a label by ID. Returns whether a row was deleted.
pub fn delete_label(label_id: LabelId, connection: &Connection) -> Result<bool, Error> {
    let rows_affected = connection.execute("DELETE FROM Labels WHERE LabelID = ?1", [label_id])?;

    Ok(rows_affected > 0)
}

/// Get all labels attached to a transaction, ordered by name.
pub fn get_transaction_labels(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<Vec<Label>, Error> {
    connection
        .prepare(
            "SELECT l.LabelID, l.Name
             FROM Labels l
             INNER JOIN UmsatzLabels ul ON l.LabelID = ul.LabelID
             WHERE ul.UmsatzID = ?1
             ORDER BY l.Name, l.LabelID",
        )?
        .query_map([transaction_id], map_row)?
        .map(|maybe_label| maybe_label.map_err(Error::from))
        .collect()
}

/// Whether `label_id` is attached to `transaction_id`.
pub fn is_linked(
    transaction_id: TransactionId,
    label_id: LabelId,
    connection: &Connection,
) -> Result<bool, Error> {
    let linked: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM UmsatzLabels WHERE UmsatzID = ?1 AND LabelID = ?2)",
        (transaction_id, label_id),
        |row| row.get(0),
    )?;

    Ok(linked)
}

/// Attach a label to a transaction.
pub fn link_label(
    transaction_id: TransactionId,
    label_id: LabelId,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO UmsatzLabels (UmsatzID, LabelID) VALUES (?1, ?2)",
        (transaction_id, label_id),
    )?;

    Ok(())
}

/// Detach a label from a transaction. Returns whether a link was removed.
pub fn unlink_label(
    transaction_id: TransactionId,
    label_id: LabelId,
    connection: &Connection,
) -> Result<bool, Error> {
    let rows_affected = connection.execute(
        "DELETE FROM UmsatzLabels WHERE UmsatzID = ?1 AND LabelID = ?2",
        (transaction_id, label_id),
    )?;

    Ok(rows_affected > 0)
}

/// Get the number of transactions a label is attached to.
pub fn count_label_links(label_id: LabelId, connection: &Connection) -> Result<i64, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(*) FROM UmsatzLabels WHERE LabelID = ?1",
        [label_id],
        |row| row.get(0),
    )?;

    Ok(count)
}

/// Get the IDs of every transaction a label is attached to.
pub fn get_linked_transaction_ids(
    label_id: LabelId,
    connection: &Connection,
) -> Result<Vec<TransactionId>, Error> {
    connection
        .prepare("SELECT UmsatzID FROM UmsatzLabels WHERE LabelID = ?1 ORDER BY UmsatzID")?
        .query_map([label_id], |row| row.get(0))?
        .map(|maybe_id| maybe_id.map_err(Error::from))
        .collect()
}

/// Detach a label from every transaction. Returns the number of links removed.
pub fn unlink_label_everywhere(label_id: LabelId, connection: &Connection) -> Result<usize, Error> {
    let rows_affected =
        connection.execute("DELETE FROM UmsatzLabels WHERE LabelID = ?1", [label_id])?;

    Ok(rows_affected)
}
