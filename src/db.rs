//! Creating the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, account::create_account_table, label::create_label_tables,
    transaction::create_transaction_table,
};

/// Create the application's tables and enable foreign key enforcement.
///
/// Tables that already exist are left untouched, so this is safe to call on a database that
/// holds data.
///
/// # Errors
/// Returns an [Error::SqlError] if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction.
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_account_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_label_tables(&transaction)?;

    transaction.commit()?;

    Ok(())
}
