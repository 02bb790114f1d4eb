//! Cache Viewer Server Client
//!
//! Provides access to the image cache server:
//! - Wire types for the catalog listing
//! - `CacheBackend`: async interface over the server endpoints
//! - `HttpBackend`: reqwest implementation

mod wire;
mod backend;
mod http;

pub use wire::{CatalogResponse, ImageInfo, Timestamp};
pub use backend::CacheBackend;
pub use http::{Endpoints, HttpBackend};

use thiserror::Error;

/// Server client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server returned {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<url::ParseError> for ClientError {
    fn from(e: url::ParseError) -> Self {
        ClientError::InvalidUrl(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
