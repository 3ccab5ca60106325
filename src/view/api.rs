use rusqlite::Connection;

use crate::{
    Error,
    account::{self, Account, AccountId},
    database_id::TransactionId,
    label::{
        Label, LabelId, LabelName, LinkOutcome, UnlinkOutcome, create_or_reuse_label,
        get_transaction_labels, unlink_and_collect_label,
    },
    transaction::{self, Transaction},
};

/// The operations of the REST API that the views use.
pub trait BankApi {
    /// Get the account with `account_id`, if it exists.
    fn get_account(&self, account_id: AccountId) -> Result<Option<Account>, Error>;

    /// Get the transactions of `account_id`, newest first.
    fn list_transactions(&self, account_id: AccountId) -> Result<Vec<Transaction>, Error>;

    /// Get the labels attached to `transaction_id`.
    fn list_labels(&self, transaction_id: TransactionId) -> Result<Vec<Label>, Error>;

    /// Attach the label called `name` to `transaction_id`, creating it if needed.
    fn create_label(
        &self,
        transaction_id: TransactionId,
        name: LabelName,
    ) -> Result<LinkOutcome, Error>;

    /// Detach `label_id` from `transaction_id`, deleting the label once it is unused.
    fn unlink_label(
        &self,
        transaction_id: TransactionId,
        label_id: LabelId,
    ) -> Result<UnlinkOutcome, Error>;
}

impl BankApi for Connection {
    fn get_account(&self, account_id: AccountId) -> Result<Option<Account>, Error> {
        account::get_account(account_id, self)
    }

    fn list_transactions(&self, account_id: AccountId) -> Result<Vec<Transaction>, Error> {
        transaction::list_transactions(account_id, self)
    }

    fn list_labels(&self, transaction_id: TransactionId) -> Result<Vec<Label>, Error> {
        get_transaction_labels(transaction_id, self)
    }

    fn create_label(
        &self,
        transaction_id: TransactionId,
        name: LabelName,
    ) -> Result<LinkOutcome, Error> {
        create_or_reuse_label(transaction_id, name, self)
    }

    fn unlink_label(
        &self,
        transaction_id: TransactionId,
        label_id: LabelId,
    ) -> Result<UnlinkOutcome, Error> {
        unlink_and_collect_label(transaction_id, label_id, self)
    }
}
