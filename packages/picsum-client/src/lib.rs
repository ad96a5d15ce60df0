//! Pure Picsum Photos REST API client.
//!
//! A minimal client for <https://picsum.photos>. Supports listing images
//! page by page and looking up a single image's metadata.
//!
//! # Example
//!
//! ```rust,ignore
//! use picsum_client::PicsumClient;
//!
//! let client = PicsumClient::new();
//!
//! let images = client.list_images(1, 10).await?;
//! for image in &images {
//!     println!("{} by {}", image.id, image.author);
//! }
//!
//! match client.image_info("237").await? {
//!     Some(image) => println!("{}", image.download_url),
//!     None => println!("no such image"),
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{PicsumError, Result};
pub use types::{ListQuery, PicsumImage};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

/// Public Picsum endpoint.
pub const DEFAULT_BASE_URL: &str = "https://picsum.photos";

#[derive(Clone)]
pub struct PicsumClient {
    client: reqwest::Client,
    base_url: Url,
}

impl Default for PicsumClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PicsumClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL"),
        }
    }

    /// Point the client at another host (mirrors, local test servers).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| PicsumError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(PicsumError::InvalidBaseUrl(base_url.to_string()));
        }
        self.base_url = parsed;
        Ok(self)
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, user agent).
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Fetch one page of the image list. Pages are 1-based; an empty
    /// vector means the list is exhausted.
    pub async fn list_images(&self, page: u32, limit: u32) -> Result<Vec<PicsumImage>> {
        let url = self.endpoint(&["v2", "list"])?;
        tracing::debug!(page, limit, "Fetching image list page");

        let resp = self
            .client
            .get(url)
            .query(&ListQuery { page, limit })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PicsumError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let images: Vec<PicsumImage> = decode(resp).await?;
        tracing::debug!(page, count = images.len(), "Fetched image list page");
        Ok(images)
    }

    /// Fetch metadata for a single image. A 404 means the image does not
    /// exist and yields `Ok(None)`.
    pub async fn image_info(&self, id: &str) -> Result<Option<PicsumImage>> {
        let url = self.endpoint(&["id", id, "info"])?;
        tracing::debug!(id, "Fetching image info");

        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(id, "Image not found");
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PicsumError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let image: PicsumImage = decode(resp).await?;
        Ok(Some(image))
    }

    /// Build `{base}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PicsumError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}
