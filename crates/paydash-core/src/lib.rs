//! Transaction schema, API contract and in-memory store
//!
//! - types: currency, direction and status enumerations
//! - models: `Transaction`, `NewTransaction`, `DashboardStats`
//! - contract: endpoint registry, validators and error bodies
//! - store: the process-wide `TransactionStore` and its seeding routine

pub mod contract;
pub mod error;
pub mod models;
pub mod store;
pub mod types;

pub use contract::{api, build_url, Endpoint, Method, Validate};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use models::{Amounts, DashboardStats, NewTransaction, Transaction};
pub use store::{TransactionStorage, TransactionStore};
pub use types::{Currency, TransactionStatus, TransactionType};
