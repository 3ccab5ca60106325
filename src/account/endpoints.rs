//! Account read endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error,
    account::{AccountId, get_account, list_accounts},
    app_state::lock_connection,
    extract::ApiPath,
};

/// The state needed for reading accounts.
#[derive(Debug, Clone)]
pub struct AccountState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List all accounts.
pub async fn list_accounts_endpoint(State(state): State<AccountState>) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let accounts = list_accounts(&connection)?;

    Ok(Json(accounts).into_response())
}

/// Get one account. An unknown ID is answered with an empty object.
pub async fn get_account_endpoint(
    ApiPath(account_id): ApiPath<AccountId>,
    State(state): State<AccountState>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;

    match get_account(account_id, &connection)? {
        Some(account) => Ok(Json(account).into_response()),
        None => Ok(Json(json!({})).into_response()),
    }
}

#[cfg(test)]
mod account_endpoint_tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::test_utils::{get_test_state, insert_account};

    use super::{get_account_endpoint, list_accounts_endpoint};

    fn get_test_server() -> TestServer {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            insert_account(&connection, 1, "DE89370400440532013000", "Erika", "Mustermann");
            insert_account(&connection, 2, "DE02120300000000202051", "Max", "Mustermann");
        }

        let app = Router::new()
            .route("/konten", get(list_accounts_endpoint))
            .route("/konten/{id}", get(get_account_endpoint))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn lists_accounts() {
        let server = get_test_server();

        let response = server.get("/konten").await;

        response.assert_status_ok();
        let accounts: Vec<Value> = response.json();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0]["accountID"], 1);
        assert_eq!(accounts[1]["Vorname"], "Max");
    }

    #[tokio::test]
    async fn gets_single_account() {
        let server = get_test_server();

        let response = server.get("/konten/1").await;

        response.assert_status_ok();
        response.assert_json(&json!({
            "accountID": 1,
            "IBAN": "DE89370400440532013000",
            "Vorname": "Erika",
            "Nachname": "Mustermann",
        }));
    }

    #[tokio::test]
    async fn unknown_account_is_empty_object() {
        let server = get_test_server();

        let response = server.get("/konten/99").await;

        response.assert_status_ok();
        response.assert_json(&json!({}));
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let server = get_test_server();

        let response = server.get("/konten/abc").await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert!(body["error"].is_string());
    }
}
