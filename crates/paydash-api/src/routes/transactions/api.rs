//! Transactions JSON API endpoints
//!
//! Endpoints:
//! - api_transactions: `GET /api/transactions`
//! - api_stats: `GET /api/stats`

use crate::{ApiError, AppState};
use axum::extract::State;
use axum::Json;
use paydash_core::{DashboardStats, Transaction, Validate};
use serde::Serialize;

/// A body that would fail the client's validator is a server fault.
fn respond<T: Serialize + Validate>(value: T) -> Result<Json<T>, ApiError> {
    value.validate().map_err(|e| ApiError::Internal {
        message: format!("response violates contract: {}", e.to_details()),
    })?;
    Ok(Json(value))
}

/// Get the full transaction list, ordered by id
pub async fn api_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let transactions = state.store.list_transactions();
    log::debug!("Serving {} transactions", transactions.len());
    respond(transactions)
}

/// Get the dashboard stats snapshot
pub async fn api_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, ApiError> {
    respond(state.store.stats())
}
