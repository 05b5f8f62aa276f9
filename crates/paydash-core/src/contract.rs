//! API contract shared by the route layer and the client
//!
//! Endpoints are typed by their `200` response so that the server's
//! serializer and the client's validator work from one shape definition.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

use crate::error::{CoreError, CoreResult};
use crate::models::{DashboardStats, NewTransaction, Transaction};

/// HTTP method of a contract endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
        }
    }
}

/// A contract endpoint whose success body is `R`
#[derive(Debug)]
pub struct Endpoint<R> {
    pub method: Method,
    pub path: &'static str,
    response: PhantomData<fn() -> R>,
}

impl<R> Endpoint<R> {
    pub const fn new(method: Method, path: &'static str) -> Self {
        Self {
            method,
            path,
            response: PhantomData,
        }
    }
}

impl<R> Clone for Endpoint<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Endpoint<R> {}

impl<R: DeserializeOwned + Validate> Endpoint<R> {
    /// Deserialize a response body and validate it against the contract
    pub fn parse(&self, body: &[u8]) -> CoreResult<R> {
        let value: R = serde_json::from_slice(body)?;
        value.validate()?;
        Ok(value)
    }
}

/// Endpoint registry
pub mod api {
    use super::*;

    /// `GET /api/transactions`
    pub const TRANSACTIONS_LIST: Endpoint<Vec<Transaction>> = Endpoint::new(Method::Get, "/api/transactions");

    /// `GET /api/stats`
    pub const TRANSACTIONS_STATS: Endpoint<DashboardStats> = Endpoint::new(Method::Get, "/api/stats");

    /// Liveness probe, not part of the data contract
    pub const HEALTH: &str = "/api/health";
}

/// Substitute `:name` placeholders in a path
pub fn build_url<V: ToString>(path: &str, params: &[(&str, V)]) -> String {
    let mut url = path.to_string();
    for (key, value) in params {
        let placeholder = format!(":{}", key);
        if url.contains(&placeholder) {
            url = url.replace(&placeholder, &value.to_string());
        }
    }
    url
}

// ==================== Error Bodies ====================

/// `400` body: client data failed shape or business rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// `404` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotFoundBody {
    pub message: String,
}

/// `500` body, message only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalErrorBody {
    pub message: String,
}

// ==================== Validation ====================

/// Checks run after deserialization
pub trait Validate {
    fn validate(&self) -> CoreResult<()>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> CoreResult<()> {
        self.iter().try_for_each(Validate::validate)
    }
}

fn require_non_empty(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::field(field, format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_references(fields: [(&str, &str); 5]) -> CoreResult<()> {
    fields
        .iter()
        .try_for_each(|(field, value)| require_non_empty(field, value))
}

impl Validate for Transaction {
    fn validate(&self) -> CoreResult<()> {
        require_references([
            ("user", self.user.as_str()),
            ("orderId", self.order_id.as_str()),
            ("txnRef", self.txn_ref.as_str()),
            ("uniqueRef", self.unique_ref.as_str()),
            ("bankRef", self.bank_ref.as_str()),
        ])
    }
}

impl Validate for NewTransaction {
    fn validate(&self) -> CoreResult<()> {
        require_references([
            ("user", self.user.as_str()),
            ("orderId", self.order_id.as_str()),
            ("txnRef", self.txn_ref.as_str()),
            ("uniqueRef", self.unique_ref.as_str()),
            ("bankRef", self.bank_ref.as_str()),
        ])?;

        for (field, amount) in [("gross", self.gross), ("mdr", self.mdr), ("net", self.net)] {
            if amount.scale() > 2 {
                return Err(CoreError::field(field, format!("{} must not have more than 2 decimals", field)));
            }
        }
        if self.gross.is_sign_negative() {
            return Err(CoreError::field("gross", "gross must not be negative"));
        }
        if self.net != self.gross - self.mdr {
            return Err(CoreError::field("net", "net must equal gross minus mdr"));
        }
        Ok(())
    }
}

impl Validate for DashboardStats {
    fn validate(&self) -> CoreResult<()> {
        require_non_empty("totalBalance", &self.total_balance)?;
        require_non_empty("todayDeposited", &self.today_deposited)
    }
}

impl From<&CoreError> for ValidationErrorBody {
    fn from(error: &CoreError) -> Self {
        let field = match error {
            CoreError::Validation { field, .. } => field.clone(),
            _ => None,
        };
        Self {
            message: error.to_string(),
            field,
        }
    }
}
