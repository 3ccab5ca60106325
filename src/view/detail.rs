//! A single transaction with its labels.

use crate::{
    Error,
    account::AccountId,
    database_id::TransactionId,
    label::{Label, LabelId, LabelName, LabelUpdate},
    transaction::Transaction,
    view::BankApi,
};

/// A single transaction and the labels attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDetailView {
    /// The transaction being shown.
    pub transaction: Transaction,
    /// The labels attached to the transaction.
    pub labels: Vec<Label>,
}

impl TransactionDetailView {
    /// Fetch `transaction_id` from the transactions of `account_id` along with its labels.
    ///
    /// Returns `None` if the account has no such transaction.
    ///
    /// # Errors
    /// Returns any error from `api`.
    pub fn load(
        api: &impl BankApi,
        account_id: AccountId,
        transaction_id: TransactionId,
    ) -> Result<Option<Self>, Error> {
        let Some(transaction) = api
            .list_transactions(account_id)?
            .into_iter()
            .find(|transaction| transaction.id == transaction_id)
        else {
            tracing::debug!("Transaction {transaction_id} is not in account {account_id}");
            return Ok(None);
        };

        let labels = api.list_labels(transaction_id)?;

        Ok(Some(Self {
            transaction,
            labels,
        }))
    }

    /// Attach the label called `name` to the transaction.
    ///
    /// Surrounding whitespace is trimmed and empty input is ignored. Returns the update to
    /// publish to other views, or `None` if nothing changed.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::LabelAlreadyPresent] if the transaction already has a label with this name,
    ///   ignoring case,
    /// - any error from `api`.
    pub fn add_label(
        &mut self,
        api: &impl BankApi,
        name: &str,
    ) -> Result<Option<LabelUpdate>, Error> {
        let Ok(name) = LabelName::new(name) else {
            return Ok(None);
        };

        if self
            .labels
            .iter()
            .any(|label| label.name.eq_ignore_case(name.as_ref()))
        {
            return Err(Error::LabelAlreadyPresent(name.to_string()));
        }

        let outcome = api.create_label(self.transaction.id, name)?;

        if !self.labels.iter().any(|label| label.id == outcome.label.id) {
            self.labels.push(outcome.label);
        }

        Ok(Some(self.label_update()))
    }

    /// Detach `label_id` from the transaction.
    ///
    /// Returns the update to publish to other views.
    ///
    /// # Errors
    /// Returns any error from `api`.
    pub fn remove_label(
        &mut self,
        api: &impl BankApi,
        label_id: LabelId,
    ) -> Result<LabelUpdate, Error> {
        api.unlink_label(self.transaction.id, label_id)?;
        self.labels.retain(|label| label.id != label_id);

        Ok(self.label_update())
    }

    /// The transaction's current labels as an update for other views.
    pub fn label_update(&self) -> LabelUpdate {
        LabelUpdate {
            transaction_id: self.transaction.id,
            labels: self.labels.clone(),
        }
    }
}
