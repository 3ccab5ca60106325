//! Free-text labels attached to transactions.
//!
//! Labels are shared between transactions by name and are deleted together with their last
//! link, see [service].

mod create;
mod db;
mod delete;
mod domain;
mod events;
mod list;
pub(crate) mod service;

pub use create::create_label_endpoint;
pub use db::{create_label_tables, get_transaction_labels};
pub use delete::{delete_label_endpoint, force_delete_label_endpoint};
pub use domain::{Label, LabelId, LabelName};
pub use events::{LabelEvents, LabelUpdate, label_events_endpoint};
pub use list::list_labels_endpoint;
pub use service::{
    ForceDeleteOutcome, LinkOutcome, UnlinkOutcome, create_or_reuse_label, unlink_and_collect_label,
};
