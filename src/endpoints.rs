//! The API endpoints URIs.

/// The route to list all accounts.
pub const ACCOUNTS: &str = "/api/konten";
/// The route to get a single account.
pub const ACCOUNT: &str = "/api/konten/{account_id}";
/// The route to list the transactions of an account.
pub const TRANSACTIONS: &str = "/api/umsatz/{account_id}";
/// The route to attach and detach labels.
pub const LABELS: &str = "/api/labels";
/// The route to list the labels of a transaction (GET) or delete a label everywhere (DELETE).
///
/// The two methods share one path so the parameter is named generically.
pub const LABEL: &str = "/api/labels/{id}";
/// The route streaming label updates as server-sent events.
pub const LABEL_EVENTS: &str = "/api/label-events";
