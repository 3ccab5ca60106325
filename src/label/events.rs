//! Publishing label changes to every open view.
//!
//! After each successful label mutation the server publishes the complete label set of the
//! affected transaction. Views subscribe through a server-sent events stream and replace their
//! copy of that transaction's labels, so the most recent update is always the correct one.

use std::convert::Infallible;

use axum::{
    extract::{FromRef, State},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::stream::{self, Stream};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::{
    AppState, Error,
    database_id::TransactionId,
    label::{Label, db::get_transaction_labels},
};

/// The SSE event name for a [LabelUpdate].
pub const LABEL_UPDATE_EVENT: &str = "labelUpdate";

/// The SSE event name telling a subscriber it missed updates and must reload.
pub const RESYNC_EVENT: &str = "resync";

/// How many updates a slow subscriber may fall behind before it has to resync.
const LABEL_EVENT_CAPACITY: usize = 64;

/// The labels a transaction carries after a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelUpdate {
    /// The transaction whose labels changed.
    #[serde(rename = "umsatzID")]
    pub transaction_id: TransactionId,
    /// Every label the transaction carries now.
    pub labels: Vec<Label>,
}

impl LabelUpdate {
    /// Read the current labels of `transaction_id` from the database.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the query fails.
    pub fn load(transaction_id: TransactionId, connection: &Connection) -> Result<Self, Error> {
        Ok(Self {
            transaction_id,
            labels: get_transaction_labels(transaction_id, connection)?,
        })
    }
}

/// A broadcast channel for [LabelUpdate]s.
///
/// Cloning shares the same channel.
#[derive(Debug, Clone)]
pub struct LabelEvents {
    sender: broadcast::Sender<LabelUpdate>,
}

impl Default for LabelEvents {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(LABEL_EVENT_CAPACITY);

        Self { sender }
    }
}

impl LabelEvents {
    /// Send `update` to every current subscriber. Having no subscribers is not an error.
    pub fn publish(&self, update: LabelUpdate) {
        let transaction_id = update.transaction_id;

        match self.sender.send(update) {
            Ok(receivers) => {
                tracing::debug!(
                    "Published label update for transaction {transaction_id} to {receivers} subscriber(s)"
                );
            }
            Err(_) => {
                tracing::debug!("No subscribers for label update of transaction {transaction_id}");
            }
        }
    }

    /// Receive every update published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<LabelUpdate> {
        self.sender.subscribe()
    }
}

impl FromRef<AppState> for LabelEvents {
    fn from_ref(state: &AppState) -> Self {
        state.label_events.clone()
    }
}

/// Load and publish the labels of each transaction in `transaction_ids`.
///
/// Failing to read the labels is logged rather than returned: the mutation that triggered the
/// update has already been committed.
pub(crate) fn publish_label_updates(
    events: &LabelEvents,
    transaction_ids: &[TransactionId],
    connection: &Connection,
) {
    for &transaction_id in transaction_ids {
        match LabelUpdate::load(transaction_id, connection) {
            Ok(update) => events.publish(update),
            Err(error) => tracing::error!(
                "Could not load labels of transaction {transaction_id} for publishing: {error}"
            ),
        }
    }
}

/// Stream label updates to the client as server-sent events.
pub async fn label_events_endpoint(State(events): State<LabelEvents>) -> Response {
    tracing::debug!("New label event subscriber");

    Sse::new(label_event_stream(events.subscribe()))
        .keep_alive(KeepAlive::default())
        .into_response()
}

fn label_event_stream(
    receiver: broadcast::Receiver<LabelUpdate>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(receiver, |mut receiver| async move {
        let event = match receiver.recv().await {
            Ok(update) => to_event(&update),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Label event subscriber missed {skipped} update(s)");
                Event::default().event(RESYNC_EVENT).data(skipped.to_string())
            }
            Err(RecvError::Closed) => return None,
        };

        Some((Ok(event), receiver))
    })
}

fn to_event(update: &LabelUpdate) -> Event {
    match Event::default().event(LABEL_UPDATE_EVENT).json_data(update) {
        Ok(event) => event,
        Err(error) => {
            tracing::error!("Could not serialize label update: {error}");
            Event::default()
                .event(RESYNC_EVENT)
                .data("serialization failed")
        }
    }
}
