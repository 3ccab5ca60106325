//! The list of an account's transactions with their labels and the account balance.

use std::collections::HashMap;

use time::Date;

use crate::{
    Error,
    account::{Account, AccountId},
    database_id::TransactionId,
    label::{LabelName, LabelUpdate},
    view::BankApi,
};

/// Format `amount` in euros with two decimals, e.g. "-50.00 €".
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.2} €")
}

/// One transaction in a [TransactionListView].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    /// The transaction ID.
    pub id: TransactionId,
    /// The booking date.
    pub date: Date,
    /// The booking text.
    pub description: String,
    /// The signed amount in euros.
    pub amount: f64,
    /// The labels to display: stored labels followed by temporary ones.
    pub labels: Vec<LabelName>,
    stored_labels: Vec<LabelName>,
}

impl TransactionRow {
    /// The row's labels separated by commas, e.g. "Miete, Wohnung".
    pub fn labels_text(&self) -> String {
        self.labels
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn refresh_labels(&mut self, temporary_labels: Option<&Vec<LabelName>>) {
        let mut labels = self.stored_labels.clone();

        for name in temporary_labels.into_iter().flatten() {
            if !labels.contains(name) {
                labels.push(name.clone());
            }
        }

        self.labels = labels;
    }
}

/// The transactions of one account.
///
/// Temporary labels are label edits that have not been confirmed by the store yet. They are
/// shown after the stored labels until a [LabelUpdate] confirms them.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionListView {
    account_id: AccountId,
    /// The account, if it exists.
    pub account: Option<Account>,
    /// The transactions, newest first.
    pub rows: Vec<TransactionRow>,
    temporary_labels: HashMap<TransactionId, Vec<LabelName>>,
}

impl TransactionListView {
    /// Fetch the account, its transactions and the labels of each transaction.
    ///
    /// # Errors
    /// Returns any error from `api`.
    pub fn load(api: &impl BankApi, account_id: AccountId) -> Result<Self, Error> {
        let mut view = Self {
            account_id,
            account: None,
            rows: Vec::new(),
            temporary_labels: HashMap::new(),
        };
        view.fetch(api)?;

        Ok(view)
    }

    /// Fetch everything again, keeping temporary labels.
    ///
    /// # Errors
    /// Returns any error from `api`. The view is left unchanged on error.
    pub fn reload(&mut self, api: &impl BankApi) -> Result<(), Error> {
        let mut reloaded = self.clone();
        reloaded.fetch(api)?;
        *self = reloaded;

        Ok(())
    }

    fn fetch(&mut self, api: &impl BankApi) -> Result<(), Error> {
        let account = api.get_account(self.account_id)?;
        let rows = api
            .list_transactions(self.account_id)?
            .into_iter()
            .map(|transaction| {
                let stored_labels = api
                    .list_labels(transaction.id)?
                    .into_iter()
                    .map(|label| label.name)
                    .collect();

                Ok(TransactionRow {
                    id: transaction.id,
                    date: transaction.date,
                    description: transaction.description,
                    amount: transaction.amount,
                    labels: Vec::new(),
                    stored_labels,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        self.account = account;
        self.rows = rows;

        for row in &mut self.rows {
            row.refresh_labels(self.temporary_labels.get(&row.id));
        }

        Ok(())
    }

    /// Hold `names` as temporary labels of `transaction_id`.
    ///
    /// Empty names and names already held for the transaction are skipped.
    pub fn add_temporary_labels<S: AsRef<str>>(
        &mut self,
        transaction_id: TransactionId,
        names: impl IntoIterator<Item = S>,
    ) {
        let temporary_labels = self.temporary_labels.entry(transaction_id).or_default();

        for name in names {
            let Ok(name) = LabelName::new(name.as_ref()) else {
                continue;
            };

            if !temporary_labels.contains(&name) {
                temporary_labels.push(name);
            }
        }

        self.refresh_row(transaction_id);
    }

    /// Replace the stored labels of the updated transaction and drop the temporary labels the
    /// update confirms.
    ///
    /// Returns `false` if the transaction is not in this view, in which case nothing changes.
    pub fn apply_label_update(&mut self, update: &LabelUpdate) -> bool {
        let Some(row) = self.rows.iter_mut().find(|row| row.id == update.transaction_id) else {
            return false;
        };

        row.stored_labels = update.labels.iter().map(|label| label.name.clone()).collect();

        if let Some(temporary_labels) = self.temporary_labels.get_mut(&update.transaction_id) {
            temporary_labels.retain(|name| !row.stored_labels.contains(name));

            if temporary_labels.is_empty() {
                self.temporary_labels.remove(&update.transaction_id);
            }
        }

        self.refresh_row(update.transaction_id);

        true
    }

    fn refresh_row(&mut self, transaction_id: TransactionId) {
        if let Some(row) = self.rows.iter_mut().find(|row| row.id == transaction_id) {
            row.refresh_labels(self.temporary_labels.get(&transaction_id));
        }
    }

    /// The displayed labels of `transaction_id` separated by commas, or `None` if the
    /// transaction is not in this view.
    pub fn row_labels_text(&self, transaction_id: TransactionId) -> Option<String> {
        self.rows
            .iter()
            .find(|row| row.id == transaction_id)
            .map(TransactionRow::labels_text)
    }

    /// The account holder and IBAN for the page header, e.g. "Erika Mustermann (DE01)", or
    /// `None` if the account does not exist.
    pub fn header_text(&self) -> Option<String> {
        self.account
            .as_ref()
            .map(|account| format!("{} ({})", account.holder_name(), account.iban))
    }

    /// The sum of all transaction amounts.
    pub fn balance(&self) -> f64 {
        self.rows.iter().map(|row| row.amount).sum()
    }

    /// The balance formatted for display, e.g. "150.00 €".
    pub fn balance_text(&self) -> String {
        format_amount(self.balance())
    }
}
