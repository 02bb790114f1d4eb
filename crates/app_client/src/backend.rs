//! Backend abstraction over the cache server endpoints

use crate::{CatalogResponse, Result};
use async_trait::async_trait;

/// Operations the cache server exposes
///
/// Every call is status-checked: a non-success status is an error even when
/// the endpoint returns no body.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// `GET /images`
    async fn list_images(&self) -> Result<CatalogResponse>;

    /// `GET /images/{name}`
    async fn fetch_image(&self, name: &str) -> Result<Vec<u8>>;

    /// `DELETE /delete-cache`
    async fn delete_cache(&self) -> Result<()>;

    /// `DELETE /delete-image?path={name}`
    async fn delete_image(&self, name: &str) -> Result<()>;

    /// `GET /open-file?path={name}`
    async fn open_in_explorer(&self, name: &str) -> Result<()>;
}
