//! Bank accounts ("Konten").
//!
//! Accounts are seeded outside of this application and are read-only here.

mod core;
mod endpoints;

pub use core::{Account, AccountId, create_account_table, get_account, list_accounts};
pub use endpoints::{get_account_endpoint, list_accounts_endpoint};
