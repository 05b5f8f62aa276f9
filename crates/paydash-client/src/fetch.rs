//! Transport seam between the data client and the network

use async_trait::async_trait;
use bytes::Bytes;
use hyper::client::HttpConnector;
use hyper::{header, Body, Client, Request, Uri};
use paydash_config::Config;

use crate::error::FetchError;

/// Raw response: status code plus body bytes
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Bytes,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues `GET` requests for contract paths
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get(&self, path: &str) -> Result<FetchResponse, FetchError>;
}

/// `hyper` client bound to a base URL
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client<HttpConnector>,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.client.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get(&self, path: &str) -> Result<FetchResponse, FetchError> {
        let uri: Uri = format!("{}{}", self.base_url, path)
            .parse()
            .map_err(|e| FetchError::transport(path, e))?;
        let request = Request::get(uri)
            .header(header::ACCEPT, "application/json")
            .body(Body::empty())
            .map_err(|e| FetchError::transport(path, e))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| FetchError::transport(path, e))?;
        let status = response.status().as_u16();
        let body = hyper::body::to_bytes(response.into_body())
            .await
            .map_err(|e| FetchError::transport(path, e))?;

        log::debug!("GET {} -> {} ({} bytes)", path, status, body.len());
        Ok(FetchResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let fetcher = HttpFetcher::new("http://127.0.0.1:8081/");
        assert_eq!(fetcher.base_url(), "http://127.0.0.1:8081");
        assert_eq!(HttpFetcher::from_config(&Config::default()).base_url(), "http://127.0.0.1:8081");
    }

    #[test]
    fn test_is_success() {
        let ok = FetchResponse { status: 204, body: Bytes::new() };
        let err = FetchResponse { status: 404, body: Bytes::new() };
        assert!(ok.is_success());
        assert!(!err.is_success());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) is not expected to accept HTTP connections
        let fetcher = HttpFetcher::new("http://127.0.0.1:9");
        let err = fetcher.get("/api/stats").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.path(), "/api/stats");
    }
}
