//! Application router configuration.

use std::path::Path;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::{
    AppState,
    account::{get_account_endpoint, list_accounts_endpoint},
    endpoints,
    label::{
        create_label_endpoint, delete_label_endpoint, force_delete_label_endpoint,
        label_events_endpoint, list_labels_endpoint,
    },
    logging::logging_middleware,
    transaction::list_transactions_endpoint,
};

/// Return a router with all the app's routes.
///
/// If `static_dir` is given, requests that match no API route are served from that directory.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route(endpoints::ACCOUNTS, get(list_accounts_endpoint))
        .route(endpoints::ACCOUNT, get(get_account_endpoint))
        .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint))
        .route(
            endpoints::LABELS,
            post(create_label_endpoint).delete(delete_label_endpoint),
        )
        .route(
            endpoints::LABEL,
            get(list_labels_endpoint).delete(force_delete_label_endpoint),
        )
        .route(endpoints::LABEL_EVENTS, get(label_events_endpoint))
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state);

    match static_dir {
        Some(static_dir) => router.fallback_service(ServeDir::new(static_dir)),
        None => router,
    }
}
