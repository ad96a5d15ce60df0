//! Image repository: the single place that wires a source, a mapper and
//! the feed configuration together.

use std::sync::Arc;

use tracing::debug;

use crate::error::FeedResult;
use crate::mapper::ImageMapper;
use crate::paging::{ImagePagingSource, Pager};
use crate::traits::source::ImageSource;
use crate::types::config::FeedConfig;
use crate::types::image::Image;

pub struct FeedRepository {
    source: Arc<dyn ImageSource>,
    mapper: Arc<ImageMapper>,
    config: FeedConfig,
}

impl FeedRepository {
    /// Validates `config` and builds a mapper from it.
    pub fn new(source: Arc<dyn ImageSource>, config: FeedConfig) -> FeedResult<Self> {
        config.validate()?;
        Ok(Self {
            mapper: Arc::new(ImageMapper::from_config(&config)),
            source,
            config,
        })
    }

    /// Replace the mapper (e.g. a seeded one).
    pub fn with_mapper(mut self, mapper: ImageMapper) -> Self {
        self.mapper = Arc::new(mapper);
        self
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// A fresh pager. Each call starts an independent sequence; hold on to
    /// the returned pager to keep its cache.
    pub fn paged_images(&self) -> Pager {
        let source = ImagePagingSource::new(self.source.clone(), self.mapper.clone());
        Pager::new(source, &self.config)
    }

    /// Look up and map a single image. `Ok(None)` when it does not exist.
    pub async fn image_by_id(&self, id: &str) -> FeedResult<Option<Image>> {
        debug!(source = self.source.name(), id, "Fetching image by id");
        let raw = self.source.fetch_by_id(id).await?;
        raw.map(|r| self.mapper.map(&r)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedError;
    use crate::testing::MockImageSource;

    #[test]
    fn test_rejects_invalid_config() {
        let result = FeedRepository::new(
            Arc::new(MockImageSource::new()),
            FeedConfig::new().with_image_width(0),
        );
        assert!(matches!(result, Err(FeedError::Config(_))));
    }

    #[tokio::test]
    async fn test_image_by_id_maps_with_config_width() {
        let repo = FeedRepository::new(
            Arc::new(MockImageSource::with_total(5)),
            FeedConfig::new().with_image_width(300),
        )
        .unwrap();

        let image = repo.image_by_id("3").await.unwrap().unwrap();

        assert_eq!(image.id, "3");
        assert_eq!(image.width, 300);
        assert!((120..=300).contains(&image.height));
    }

    #[tokio::test]
    async fn test_image_by_id_absent() {
        let repo =
            FeedRepository::new(Arc::new(MockImageSource::with_total(5)), FeedConfig::default())
                .unwrap();

        assert!(repo.image_by_id("missing-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_paged_images_are_independent() {
        let mock = MockImageSource::with_total(50);
        let repo = FeedRepository::new(Arc::new(mock.clone()), FeedConfig::default()).unwrap();

        let a = repo.paged_images();
        let b = repo.paged_images();
        a.start().await;

        assert_eq!(a.snapshot().len(), 10);
        assert!(b.snapshot().is_empty());
    }
}
