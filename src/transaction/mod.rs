//! Bank transactions ("Umsätze").
//!
//! Transactions are seeded outside of this application and are read-only
//! here. Labels attached to them live in [crate::label].

mod core;
mod endpoints;

pub use core::{Transaction, create_transaction_table, list_transactions, transaction_exists};
pub use endpoints::list_transactions_endpoint;
