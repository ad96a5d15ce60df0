//! Use cases exposed to the presentation layer.

use std::sync::Arc;

use crate::error::{FeedError, FeedResult};
use crate::paging::Pager;
use crate::repository::FeedRepository;
use crate::types::image::Image;

/// Hands out the paged image feed.
#[derive(Clone)]
pub struct GetImagesUseCase {
    repository: Arc<FeedRepository>,
}

impl GetImagesUseCase {
    pub fn new(repository: Arc<FeedRepository>) -> Self {
        Self { repository }
    }

    /// A new pager over the feed. The caller owns its lifetime; keep it in
    /// a scope that outlives individual views so re-subscribing is free.
    pub fn execute(&self) -> Pager {
        self.repository.paged_images()
    }
}

/// Looks up a single image.
#[derive(Clone)]
pub struct GetImageByIdUseCase {
    repository: Arc<FeedRepository>,
}

impl GetImageByIdUseCase {
    pub fn new(repository: Arc<FeedRepository>) -> Self {
        Self { repository }
    }

    /// `Err(InvalidId)` for a blank id, `Ok(None)` when the image does not
    /// exist, `Err(_)` when the lookup itself failed.
    pub async fn execute(&self, id: &str) -> FeedResult<Option<Image>> {
        let id = id.trim();
        if id.is_empty() {
            return Err(FeedError::InvalidId);
        }
        self.repository.image_by_id(id).await
    }
}
