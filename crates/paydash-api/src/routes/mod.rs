//! Route modules for the API server
//!
//! - transactions: transaction list and dashboard stats

pub mod transactions;
