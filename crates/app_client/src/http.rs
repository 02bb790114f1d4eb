//! reqwest implementation of the cache backend

use crate::{CacheBackend, CatalogResponse, ClientError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use std::time::Duration;
use url::Url;

/// URL builder for the server endpoints
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!("{} cannot be a base URL", base)));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn list(&self) -> Url {
        self.with_segments(&["images"])
    }

    /// The name is encoded as a single path segment
    pub fn image(&self, name: &str) -> Url {
        self.with_segments(&["images", name])
    }

    pub fn delete_cache(&self) -> Url {
        self.with_segments(&["delete-cache"])
    }

    pub fn delete_image(&self, name: &str) -> Url {
        self.with_path_query(&["delete-image"], name)
    }

    pub fn open_file(&self, name: &str) -> Url {
        self.with_path_query(&["open-file"], name)
    }

    fn with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn with_path_query(&self, segments: &[&str], name: &str) -> Url {
        let mut url = self.with_segments(segments);
        url.query_pairs_mut().append_pair("path", name);
        url
    }
}

/// HTTP backend talking to the cache server
pub struct HttpBackend {
    client: Client,
    endpoints: Endpoints,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoints = Endpoints::new(base_url)?;

        tracing::info!("Cache server: {}", endpoints.base());

        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn send(&self, method: Method, url: Url) -> Result<Response> {
        tracing::debug!("{} {}", method, url);

        let endpoint = url.path().to_string();
        let response = self.client.request(method, url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} returned {}", endpoint, status);
            return Err(ClientError::Status {
                status: status.as_u16(),
                endpoint,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl CacheBackend for HttpBackend {
    async fn list_images(&self) -> Result<CatalogResponse> {
        let response = self.send(Method::GET, self.endpoints.list()).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_image(&self, name: &str) -> Result<Vec<u8>> {
        let response = self.send(Method::GET, self.endpoints.image(name)).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn delete_cache(&self) -> Result<()> {
        self.send(Method::DELETE, self.endpoints.delete_cache()).await?;
        Ok(())
    }

    async fn delete_image(&self, name: &str) -> Result<()> {
        self.send(Method::DELETE, self.endpoints.delete_image(name)).await?;
        Ok(())
    }

    async fn open_in_explorer(&self, name: &str) -> Result<()> {
        self.send(Method::GET, self.endpoints.open_file(name)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        let endpoints = Endpoints::new("http://localhost:8080").unwrap();

        assert_eq!(endpoints.list().as_str(), "http://localhost:8080/images");
        assert_eq!(endpoints.delete_cache().as_str(), "http://localhost:8080/delete-cache");
        assert_eq!(
            endpoints.image("f_000123.png").as_str(),
            "http://localhost:8080/images/f_000123.png"
        );
    }

    #[test]
    fn test_names_are_encoded() {
        let endpoints = Endpoints::new("http://localhost:8080/").unwrap();

        assert_eq!(
            endpoints.image("a b#1.png").as_str(),
            "http://localhost:8080/images/a%20b%231.png"
        );
        assert_eq!(
            endpoints.delete_image("a&b.png").as_str(),
            "http://localhost:8080/delete-image?path=a%26b.png"
        );
        assert_eq!(
            endpoints.open_file("x.png").as_str(),
            "http://localhost:8080/open-file?path=x.png"
        );
    }

    #[test]
    fn test_base_with_prefix() {
        let endpoints = Endpoints::new("http://127.0.0.1:9000/cache/").unwrap();
        assert_eq!(endpoints.list().as_str(), "http://127.0.0.1:9000/cache/images");
    }

    #[test]
    fn test_invalid_base() {
        assert!(matches!(Endpoints::new("not a url"), Err(ClientError::InvalidUrl(_))));
        assert!(matches!(Endpoints::new("mailto:me@example.com"), Err(ClientError::InvalidUrl(_))));
    }
}
