use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FetchCause {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Other(String),
}

/// Raised by a [`Fetcher`](crate::Fetcher) when an address cannot be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{cause}: {address}")]
pub struct FetchError {
    pub address: String,
    pub cause: FetchCause,
}

impl FetchError {
    pub fn not_found(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            cause: FetchCause::NotFound,
        }
    }

    pub fn other(address: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            cause: FetchCause::Other(message.into()),
        }
    }
}

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("start address must not be empty")]
    EmptyAddress,

    #[error("Config error: {0}")]
    ConfigError(#[from] serde_json::Error),
}

pub type CrawlResult<T> = Result<T, CrawlError>;
