//! Endpoint attaching a label to a transaction by name.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    app_state::lock_connection,
    database_id::TransactionId,
    extract::ApiJson,
    label::{
        Label, LabelEvents, LabelName,
        events::publish_label_updates,
        service::create_or_reuse_label,
    },
};

/// The message sent when the transaction already carried the label.
pub const ALREADY_LINKED_MESSAGE: &str = "Label already linked";

/// The state needed for creating labels.
#[derive(Debug, Clone)]
pub struct CreateLabelState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub label_events: LabelEvents,
}

impl FromRef<AppState> for CreateLabelState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            label_events: state.label_events.clone(),
        }
    }
}

/// The JSON body for attaching a label.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLabelRequest {
    /// The transaction to attach the label to.
    #[serde(rename = "umsatzID")]
    pub transaction_id: Option<TransactionId>,
    /// The label text.
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateLabelResponse {
    success: bool,
    label: Label,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

/// Attach the label called `name` to a transaction, creating the label if needed.
pub async fn create_label_endpoint(
    State(state): State<CreateLabelState>,
    ApiJson(request): ApiJson<CreateLabelRequest>,
) -> Result<Response, Error> {
    let transaction_id = match request.transaction_id {
        Some(id) if id > 0 => id,
        Some(_) => return Err(Error::InvalidField("umsatzID")),
        None => return Err(Error::MissingField("umsatzID")),
    };
    let name = match request.name {
        Some(name) if !name.is_empty() => LabelName::new(&name)?,
        _ => return Err(Error::MissingField("name")),
    };

    let connection = lock_connection(&state.db_connection)?;
    let outcome = create_or_reuse_label(transaction_id, name, &connection)?;

    if !outcome.already_linked {
        publish_label_updates(&state.label_events, &[transaction_id], &connection);
    }

    Ok(Json(CreateLabelResponse {
        success: true,
        label: outcome.label,
        message: outcome.already_linked.then_some(ALREADY_LINKED_MESSAGE),
    })
    .into_response())
}
