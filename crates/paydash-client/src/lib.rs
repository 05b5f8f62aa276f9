//! Typed data-fetching client for the dashboard API
//!
//! Each query validates the response against the shared contract and
//! caches the last successful body per endpoint path, so repeated
//! consumers reuse it instead of issuing a new request.

pub mod error;
pub mod fetch;

use bytes::Bytes;
use paydash_core::{api, DashboardStats, Endpoint, Transaction, Validate};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};

pub use error::FetchError;
pub use fetch::{Fetch, FetchResponse, HttpFetcher};

/// Outstanding request count per path
type InFlight = Mutex<HashMap<&'static str, usize>>;

/// Counts one outstanding request for a path for as long as it is alive
struct LoadingGuard<'a> {
    in_flight: &'a InFlight,
    path: &'static str,
}

impl<'a> LoadingGuard<'a> {
    fn new(in_flight: &'a InFlight, path: &'static str) -> Self {
        *in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path)
            .or_insert(0) += 1;
        Self { in_flight, path }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(count) = in_flight.get_mut(self.path) {
            *count -= 1;
            if *count == 0 {
                in_flight.remove(self.path);
            }
        }
    }
}

/// Dashboard data client
pub struct DashboardClient<F> {
    fetcher: F,
    cache: RwLock<HashMap<&'static str, Bytes>>,
    in_flight: InFlight,
}

impl<F: Fetch> DashboardClient<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// `GET /api/transactions`
    pub async fn transactions(&self) -> Result<Vec<Transaction>, FetchError> {
        self.query(api::TRANSACTIONS_LIST).await
    }

    /// `GET /api/stats`
    pub async fn stats(&self) -> Result<DashboardStats, FetchError> {
        self.query(api::TRANSACTIONS_STATS).await
    }

    /// Serve from cache when possible, otherwise fetch
    pub async fn query<R: DeserializeOwned + Validate>(&self, endpoint: Endpoint<R>) -> Result<R, FetchError> {
        if let Some(body) = self.cached_body(endpoint.path) {
            log::debug!("Cache hit for {}", endpoint.path);
            return Self::decode(endpoint, &body);
        }
        self.refetch(endpoint).await
    }

    /// Always hit the network; a successful body replaces the cached one
    pub async fn refetch<R: DeserializeOwned + Validate>(&self, endpoint: Endpoint<R>) -> Result<R, FetchError> {
        let _loading = LoadingGuard::new(&self.in_flight, endpoint.path);

        let response = self.fetcher.get(endpoint.path).await?;
        if !response.is_success() {
            log::warn!("{} {} returned HTTP {}", endpoint.method, endpoint.path, response.status);
            return Err(FetchError::Status {
                path: endpoint.path.to_string(),
                status: response.status,
            });
        }

        let value = Self::decode(endpoint, &response.body)?;
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(endpoint.path, response.body);
        Ok(value)
    }

    /// Whether a request for `path` is currently outstanding
    pub fn is_loading(&self, path: &str) -> bool {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner).contains_key(path)
    }

    pub fn is_cached(&self, path: &str) -> bool {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).contains_key(path)
    }

    /// Drop the cached body so the next query refetches
    pub fn invalidate(&self, path: &str) {
        self.cache.write().unwrap_or_else(PoisonError::into_inner).remove(path);
    }

    fn cached_body(&self, path: &str) -> Option<Bytes> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).get(path).cloned()
    }

    fn decode<R: DeserializeOwned + Validate>(endpoint: Endpoint<R>, body: &[u8]) -> Result<R, FetchError> {
        endpoint.parse(body).map_err(|source| {
            log::log!(
                source.severity().log_level(),
                "{} response failed validation: {}",
                endpoint.path,
                source.to_details()
            );
            FetchError::Contract {
                path: endpoint.path.to_string(),
                source,
            }
        })
    }
}

impl DashboardClient<HttpFetcher> {
    pub fn from_config(config: &paydash_config::Config) -> Self {
        Self::new(HttpFetcher::from_config(config))
    }
}

// ==================== Tests ====================
