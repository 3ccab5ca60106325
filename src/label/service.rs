//! Reference-counted label management.
//!
//! A label exists exactly as long as at least one transaction carries it. Each operation runs in
//! a single immediate SQLite transaction, so a concurrent writer can neither create a second
//! label with the same name nor observe a label between its creation and its first link.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};
use serde::Serialize;

use crate::{
    Error,
    database_id::TransactionId,
    label::{
        Label, LabelId, LabelName,
        db::{
            count_label_links, delete_label, find_label_by_name, get_linked_transaction_ids,
            insert_label, is_linked, link_label, unlink_label, unlink_label_everywhere,
        },
    },
    transaction::transaction_exists,
};

/// The result of attaching a label to a transaction by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    /// The label now attached to the transaction.
    pub label: Label,
    /// Whether the label was created by this call rather than reused.
    pub label_created: bool,
    /// Whether the transaction already carried the label, in which case nothing changed.
    pub already_linked: bool,
}

/// The result of detaching a label from one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlinkOutcome {
    /// Whether the transaction carried the label before the call.
    pub deleted_link: bool,
    /// Whether the label was deleted because no transaction carries it anymore.
    pub deleted_label: bool,
    /// How many transactions still carry the label, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_references: Option<i64>,
}

/// The result of deleting a label from every transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceDeleteOutcome {
    /// The transactions that carried the label before it was deleted.
    pub affected_transactions: Vec<TransactionId>,
    /// Whether a label row was deleted.
    pub deleted_label: bool,
}

/// Attach the label called `name` to a transaction, creating the label if no label has that name.
///
/// Calling this again with the same transaction and name changes nothing and reports
/// [LinkOutcome::already_linked].
///
/// # Errors
/// This function will return a:
/// - [Error::UnknownTransaction] if `transaction_id` does not refer to a transaction,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_or_reuse_label(
    transaction_id: TransactionId,
    name: LabelName,
    connection: &Connection,
) -> Result<LinkOutcome, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    if !transaction_exists(transaction_id, &transaction)? {
        return Err(Error::UnknownTransaction(transaction_id));
    }

    let (label, label_created) = match find_label_by_name(&name, &transaction)? {
        Some(label) => (label, false),
        None => (insert_label(name, &transaction)?, true),
    };

    let already_linked = is_linked(transaction_id, label.id, &transaction)?;

    if !already_linked {
        link_label(transaction_id, label.id, &transaction)?;
    }

    transaction.commit()?;

    if label_created {
        tracing::info!("Created label {} \"{}\"", label.id, label.name);
    }

    Ok(LinkOutcome {
        label,
        label_created,
        already_linked,
    })
}

/// Detach a label from a transaction and delete the label if no other transaction carries it.
///
/// Detaching a label the transaction does not carry is not an error.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is a SQL error.
pub fn unlink_and_collect_label(
    transaction_id: TransactionId,
    label_id: LabelId,
    connection: &Connection,
) -> Result<UnlinkOutcome, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let deleted_link = unlink_label(transaction_id, label_id, &transaction)?;
    let remaining = count_label_links(label_id, &transaction)?;

    let outcome = if remaining == 0 {
        let deleted_label = delete_label(label_id, &transaction)?;

        UnlinkOutcome {
            deleted_link,
            deleted_label,
            remaining_references: None,
        }
    } else {
        UnlinkOutcome {
            deleted_link,
            deleted_label: false,
            remaining_references: Some(remaining),
        }
    };

    transaction.commit()?;

    if outcome.deleted_label {
        tracing::info!("Deleted label {label_id}, no transaction carries it anymore");
    }

    Ok(outcome)
}

/// Delete a label and detach it from every transaction that carries it.
///
/// Prefer [unlink_and_collect_label], which only affects one transaction.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is a SQL error.
pub fn force_delete_label(
    label_id: LabelId,
    connection: &Connection,
) -> Result<ForceDeleteOutcome, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let affected_transactions = get_linked_transaction_ids(label_id, &transaction)?;
    unlink_label_everywhere(label_id, &transaction)?;
    let deleted_label = delete_label(label_id, &transaction)?;

    transaction.commit()?;

    tracing::info!(
        "Deleted label {label_id} from {} transaction(s)",
        affected_transactions.len()
    );

    Ok(ForceDeleteOutcome {
        affected_transactions,
        deleted_label,
    })
}

#[cfg(test)]
mod create_or_reuse_label_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        label::{
            LabelName,
            db::{count_label_links, get_transaction_labels},
        },
        test_utils::{count_labels, get_test_connection, insert_account, insert_transaction},
    };

    use super::create_or_reuse_label;

    fn get_connection_with_transactions() -> Connection {
        let conn = get_test_connection();
        insert_account(&conn, 1, "DE01", "Erika", "Mustermann");
        insert_transaction(&conn, 10, 1, date!(2025 - 01 - 01), "Miete", -50.0);
        insert_transaction(&conn, 11, 1, date!(2025 - 01 - 02), "Gehalt", 200.0);
        conn
    }

    #[test]
    fn creates_label_and_link() {
        let conn = get_connection_with_transactions();

        let outcome = create_or_reuse_label(10, LabelName::new_unchecked("Food"), &conn).unwrap();

        assert!(outcome.label_created);
        assert!(!outcome.already_linked);
        assert_eq!(outcome.label.name.as_ref(), "Food");
        assert_eq!(get_transaction_labels(10, &conn), Ok(vec![outcome.label]));
    }

    #[test]
    fn is_idempotent_for_same_transaction() {
        let conn = get_connection_with_transactions();

        let first = create_or_reuse_label(10, LabelName::new_unchecked("Food"), &conn).unwrap();
        let second = create_or_reuse_label(10, LabelName::new_unchecked("Food"), &conn).unwrap();

        assert_eq!(first.label.id, second.label.id);
        assert!(!second.label_created);
        assert!(second.already_linked);
        assert_eq!(count_label_links(first.label.id, &conn), Ok(1));
    }

    #[test]
    fn reuses_label_across_transactions() {
        let conn = get_connection_with_transactions();

        let first = create_or_reuse_label(10, LabelName::new_unchecked("Food"), &conn).unwrap();
        let second = create_or_reuse_label(11, LabelName::new_unchecked("Food"), &conn).unwrap();

        assert_eq!(first.label.id, second.label.id);
        assert!(!second.label_created);
        assert!(!second.already_linked);
        assert_eq!(count_labels(&conn), 1);
        assert_eq!(count_label_links(first.label.id, &conn), Ok(2));
    }

    #[test]
    fn names_are_case_sensitive() {
        let conn = get_connection_with_transactions();

        let first = create_or_reuse_label(10, LabelName::new_unchecked("Food"), &conn).unwrap();
        let second = create_or_reuse_label(10, LabelName::new_unchecked("food"), &conn).unwrap();

        assert_ne!(first.label.id, second.label.id);
        assert_eq!(count_labels(&conn), 2);
    }

    #[test]
    fn unknown_transaction_is_rejected_without_creating_label() {
        let conn = get_connection_with_transactions();

        let result = create_or_reuse_label(999, LabelName::new_unchecked("Food"), &conn);

        assert_eq!(result, Err(Error::UnknownTransaction(999)));
        assert_eq!(count_labels(&conn), 0);
    }
}


#[cfg(test)]
mod force_delete_label_tests {
    use time::macros::date;

    use crate::{
        label::{
            LabelName,
            db::{get_label, get_transaction_labels},
        },
        test_utils::{count_links, get_test_connection, insert_account, insert_transaction},
    };

    use super::{ForceDeleteOutcome, create_or_reuse_label, force_delete_label};

    #[test]
    fn deletes_label_from_every_transaction() {
        let conn = get_test_connection();
        insert_account(&conn, 1, "DE01", "Erika", "Mustermann");
        insert_transaction(&conn, 10, 1, date!(2025 - 01 - 01), "Miete", -50.0);
        insert_transaction(&conn, 11, 1, date!(2025 - 01 - 02), "Gehalt", 200.0);
        let label = create_or_reuse_label(10, LabelName::new_unchecked("Food"), &conn)
            .unwrap()
            .label;
        create_or_reuse_label(11, LabelName::new_unchecked("Food"), &conn).unwrap();
        let other = create_or_reuse_label(11, LabelName::new_unchecked("Other"), &conn)
            .unwrap()
            .label;

        let outcome = force_delete_label(label.id, &conn).unwrap();

        assert_eq!(
            outcome,
            ForceDeleteOutcome {
                affected_transactions: vec![10, 11],
                deleted_label: true,
            }
        );
        assert_eq!(get_label(label.id, &conn), Ok(None));
        assert_eq!(get_transaction_labels(10, &conn), Ok(vec![]));
        assert_eq!(get_transaction_labels(11, &conn), Ok(vec![other]));
        assert_eq!(count_links(&conn), 1);
    }

    #[test]
    fn unknown_label_is_not_an_error() {
        let conn = get_test_connection();

        let outcome = force_delete_label(77, &conn).unwrap();

        assert_eq!(
            outcome,
            ForceDeleteOutcome {
                affected_transactions: vec![],
                deleted_label: false,
            }
        );
    }
}
