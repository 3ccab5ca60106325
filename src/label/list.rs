//! Endpoint listing the labels of a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, app_state::lock_connection, database_id::TransactionId, extract::ApiPath,
    label::db::get_transaction_labels,
};

/// The state needed for listing labels.
#[derive(Debug, Clone)]
pub struct ListLabelsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListLabelsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the labels of a transaction. An unknown transaction has no labels.
pub async fn list_labels_endpoint(
    ApiPath(transaction_id): ApiPath<TransactionId>,
    State(state): State<ListLabelsState>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let labels = get_transaction_labels(transaction_id, &connection)?;

    Ok(Json(labels).into_response())
}
