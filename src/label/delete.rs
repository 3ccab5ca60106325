//! Endpoints detaching and deleting labels.

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
    extract::{ApiJson, ApiPath},
    label::{
        LabelEvents, LabelId, UnlinkOutcome,
        events::publish_label_updates,
        service::{force_delete_label, unlink_and_collect_label},
    },
};

/// The state needed for deleting labels.
#[derive(Debug, Clone)]
pub struct DeleteLabelState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub label_events: LabelEvents,
}

impl FromRef<AppState> for DeleteLabelState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            label_events: state.label_events.clone(),
        }
    }
}

/// The JSON body for detaching a label.
///
/// Without a transaction ID the label is deleted from every transaction.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteLabelRequest {
    /// The transaction to detach the label from.
    #[serde(rename = "umsatzID")]
    pub transaction_id: Option<TransactionId>,
    /// The label to detach.
    #[serde(rename = "labelID")]
    pub label_id: Option<LabelId>,
}

#[derive(Debug, Serialize)]
struct UnlinkResponse {
    success: bool,
    #[serde(flatten)]
    outcome: UnlinkOutcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GlobalDeleteResponse {
    success: bool,
    deleted_link: bool,
    deleted_label: bool,
}

#[derive(Debug, Serialize)]
struct SuccessResponse {
    success: bool,
}

/// Detach a label from one transaction, deleting the label once no transaction carries it.
///
/// If the body has no transaction ID, the label is deleted from every transaction. A transaction
/// ID that is present but not positive is rejected rather than treated as missing.
pub async fn delete_label_endpoint(
    State(state): State<DeleteLabelState>,
    ApiJson(request): ApiJson<DeleteLabelRequest>,
) -> Result<Response, Error> {
    let label_id = match request.label_id {
        Some(id) if id > 0 => id,
        Some(_) => return Err(Error::InvalidField("labelID")),
        None => return Err(Error::MissingField("labelID")),
    };

    let connection = lock_connection(&state.db_connection)?;

    match request.transaction_id {
        Some(transaction_id) if transaction_id > 0 => {
            let outcome = unlink_and_collect_label(transaction_id, label_id, &connection)?;

            if outcome.deleted_link {
                publish_label_updates(&state.label_events, &[transaction_id], &connection);
            }

            Ok(Json(UnlinkResponse {
                success: true,
                outcome,
            })
            .into_response())
        }
        Some(_) => Err(Error::InvalidField("umsatzID")),
        None => {
            let outcome = force_delete_label(label_id, &connection)?;
            publish_label_updates(
                &state.label_events,
                &outcome.affected_transactions,
                &connection,
            );

            Ok(Json(GlobalDeleteResponse {
                success: true,
                deleted_link: !outcome.affected_transactions.is_empty(),
                deleted_label: outcome.deleted_label,
            })
            .into_response())
        }
    }
}

/// Delete a label from every transaction.
pub async fn force_delete_label_endpoint(
    ApiPath(label_id): ApiPath<LabelId>,
    State(state): State<DeleteLabelState>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let outcome = force_delete_label(label_id, &connection)?;
    publish_label_updates(
        &state.label_events,
        &outcome.affected_transactions,
        &connection,
    );

    Ok(Json(SuccessResponse { success: true }).into_response())
}

#[cfg(test)]
mod delete_label_endpoint_tests {
    use axum::{
        Router,
        routing::{delete, post},
    };
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        AppState,
        label::{
            create::create_label_endpoint,
            db::{get_label, get_transaction_labels},
        },
        test_utils::{count_labels, get_test_state, insert_account, insert_transaction},
    };

    use super::{delete_label_endpoint, force_delete_label_endpoint};

    fn get_test_server() -> (TestServer, AppState) {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            insert_account(&connection, 1, "DE01", "Erika", "Mustermann");
            insert_transaction(&connection, 10, 1, date!(2025 - 01 - 01), "Miete", -50.0);
            insert_transaction(&connection, 11, 1, date!(2025 - 01 - 02), "Gehalt", 200.0);
        }
        let app = Router::new()
            .route(
                "/labels",
                post(create_label_endpoint).delete(delete_label_endpoint),
            )
            .route("/labels/{id}", delete(force_delete_label_endpoint))
            .with_state(state.clone());

        (
            TestServer::try_new(app).expect("Could not create test server."),
            state,
        )
    }

    async fn add_label(server: &TestServer, transaction_id: i64, name: &str) -> i64 {
        let response = server
            .post("/labels")
            .json(&json!({ "umsatzID": transaction_id, "name": name }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();

        body["label"]["LabelID"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn deleting_only_link_deletes_label() {
        let (server, state) = get_test_server();
        let label_id = add_label(&server, 10, "Miete").await;

        let response = server
            .delete("/labels")
            .json(&json!({ "umsatzID": 10, "labelID": label_id }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "success": true,
            "deletedLink": true,
            "deletedLabel": true,
        }));
        assert_eq!(count_labels(&state.db_connection.lock().unwrap()), 0);
    }

    #[tokio::test]
    async fn deleting_shared_label_keeps_it_for_other_transaction() {
        let (server, state) = get_test_server();
        let label_id = add_label(&server, 10, "Rent").await;
        assert_eq!(add_label(&server, 11, "Rent").await, label_id);
        let mut receiver = state.label_events.subscribe();

        let response = server
            .delete("/labels")
            .json(&json!({ "umsatzID": 10, "labelID": label_id }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "success": true,
            "deletedLink": true,
            "deletedLabel": false,
            "remainingReferences": 1,
        }));
        let connection = state.db_connection.lock().unwrap();
        assert!(get_label(label_id, &connection).unwrap().is_some());
        assert_eq!(get_transaction_labels(11, &connection).unwrap().len(), 1);

        let update = receiver.try_recv().expect("No label update published");
        assert_eq!(update.transaction_id, 10);
        assert!(update.labels.is_empty());
    }

    #[tokio::test]
    async fn delete_without_transaction_deletes_globally() {
        let (server, state) = get_test_server();
        let label_id = add_label(&server, 10, "Rent").await;
        add_label(&server, 11, "Rent").await;
        let mut receiver = state.label_events.subscribe();

        let response = server
            .delete("/labels")
            .json(&json!({ "labelID": label_id }))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "success": true,
            "deletedLink": true,
            "deletedLabel": true,
        }));
        assert_eq!(count_labels(&state.db_connection.lock().unwrap()), 0);
        assert_eq!(receiver.try_recv().unwrap().transaction_id, 10);
        assert_eq!(receiver.try_recv().unwrap().transaction_id, 11);
    }

    #[tokio::test]
    async fn delete_without_label_id_is_bad_request() {
        let (server, _) = get_test_server();

        let response = server
            .delete("/labels")
            .json(&json!({ "umsatzID": 10 }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "error": "labelID is required" }));
    }

    #[tokio::test]
    async fn zero_transaction_id_is_rejected_not_deleted_globally() {
        let (server, state) = get_test_server();
        let label_id = add_label(&server, 10, "Rent").await;

        let response = server
            .delete("/labels")
            .json(&json!({ "umsatzID": 0, "labelID": label_id }))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({ "error": "umsatzID must be a positive ID" }));
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_labels(&connection), 1);
        assert_eq!(get_transaction_labels(10, &connection).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn force_delete_removes_label_everywhere() {
        let (server, state) = get_test_server();
        let label_id = add_label(&server, 10, "Rent").await;
        add_label(&server, 11, "Rent").await;

        let response = server.delete(&format!("/labels/{label_id}")).await;

        response.assert_status_ok();
        response.assert_json(&json!({ "success": true }));
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_labels(&connection), 0);
        assert!(get_transaction_labels(10, &connection).unwrap().is_empty());
        assert!(get_transaction_labels(11, &connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn force_delete_unknown_label_succeeds() {
        let (server, _) = get_test_server();

        let response = server.delete("/labels/123").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "success": true }));
    }
}
