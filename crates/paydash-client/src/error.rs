//! Error types for paydash-client
//!
//! Presentation code treats every variant as one generic fetch failure;
//! the variants exist for logging.

use paydash_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to fetch {path}: HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("Failed to fetch {path}: {message}")]
    Transport { path: String, message: String },

    #[error("Failed to fetch {path}: {source}")]
    Contract {
        path: String,
        #[source]
        source: CoreError,
    },
}

impl FetchError {
    pub fn transport(path: &str, error: impl std::fmt::Display) -> Self {
        FetchError::Transport {
            path: path.to_string(),
            message: error.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FetchError::Status { path, .. }
            | FetchError::Transport { path, .. }
            | FetchError::Contract { path, .. } => path,
        }
    }
}
