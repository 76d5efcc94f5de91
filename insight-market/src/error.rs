//! Marketplace adapter error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication rejected for {url}")]
    Unauthorized { url: String },

    #[error("Request to {url} failed with status {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("Serialization error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No Product Ads advertiser registered for this account")]
    NoAdvertiser,

    #[error("Invalid access token: {0}")]
    InvalidToken(String),
}

impl MarketError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MarketError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for marketplace operations.
pub type MarketResult<T> = Result<T, MarketError>;
