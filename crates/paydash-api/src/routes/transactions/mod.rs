//! Transaction routes
//!
//! Thin adapters over the store: no query parameters, no request bodies.
//! Outgoing payloads are checked against the contract before they are sent.

pub mod api;

pub use api::{api_stats, api_transactions};
