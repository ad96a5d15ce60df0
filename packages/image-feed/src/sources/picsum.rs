//! Picsum Photos source.
//!
//! Adapts [`picsum_client::PicsumClient`] to the [`ImageSource`] port.

use async_trait::async_trait;
use picsum_client::{PicsumClient, PicsumError};
use tracing::warn;

use crate::error::{FeedError, FeedResult};
use crate::traits::source::ImageSource;
use crate::types::image::RawImage;

/// Image source backed by the Picsum REST API.
///
/// # Example
///
/// ```rust,ignore
/// use image_feed::sources::PicsumSource;
///
/// let source = PicsumSource::new(PicsumClient::new());
/// let rows = source.fetch_page(1, 10).await?;
/// ```
#[derive(Clone, Default)]
pub struct PicsumSource {
    client: PicsumClient,
}

impl PicsumSource {
    pub fn new(client: PicsumClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &PicsumClient {
        &self.client
    }
}

impl From<PicsumError> for FeedError {
    fn from(err: PicsumError) -> Self {
        match err {
            PicsumError::Decode(e) => FeedError::malformed(e.to_string()),
            other => FeedError::Fetch(Box::new(other)),
        }
    }
}

#[async_trait]
impl ImageSource for PicsumSource {
    async fn fetch_page(&self, page: u32, limit: u32) -> FeedResult<Vec<RawImage>> {
        let images = self.client.list_images(page, limit).await.map_err(|e| {
            warn!(page, limit, error = %e, "Picsum list request failed");
            FeedError::from(e)
        })?;
        Ok(images.into_iter().map(RawImage::from).collect())
    }

    async fn fetch_by_id(&self, id: &str) -> FeedResult<Option<RawImage>> {
        let image = self.client.image_info(id).await.map_err(|e| {
            warn!(id, error = %e, "Picsum info request failed");
            FeedError::from(e)
        })?;
        Ok(image.map(RawImage::from))
    }

    fn name(&self) -> &str {
        "picsum"
    }
}
