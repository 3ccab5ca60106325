//! View models for the transaction pages of a frontend.
//!
//! Views hold all of a page's state explicitly and talk to the store through [BankApi], so the
//! same logic drives a browser client or an in-process caller.

mod api;
mod detail;
mod transactions;

pub use api::BankApi;
pub use detail::TransactionDetailView;
pub use transactions::{TransactionListView, TransactionRow, format_amount};
