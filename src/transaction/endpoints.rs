//! Transaction read endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, account::AccountId, app_state::lock_connection, extract::ApiPath,
    transaction::list_transactions,
};

/// The state needed for reading transactions.
#[derive(Debug, Clone)]
pub struct TransactionState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the transactions of one account, newest first.
pub async fn list_transactions_endpoint(
    ApiPath(account_id): ApiPath<AccountId>,
    State(state): State<TransactionState>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transactions = list_transactions(account_id, &connection)?;

    Ok(Json(transactions).into_response())
}
