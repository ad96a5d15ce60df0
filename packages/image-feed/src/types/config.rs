//! Configuration for the feed and its pager.

use serde::{Deserialize, Serialize};

use crate::error::{FeedError, FeedResult};

/// Configuration for the image feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Records requested per page, for every load direction.
    ///
    /// Default: 10.
    pub page_size: u32,

    /// Fixed display width every image is mapped to.
    ///
    /// Default: 400.
    pub image_width: u32,

    /// Host used to build size-specific rendition URLs.
    ///
    /// Default: `https://picsum.photos`.
    pub image_base_url: String,

    /// How close (in items) to either end of the materialized sequence an
    /// access must be before the next page is requested.
    ///
    /// Default: same as `page_size`.
    pub prefetch_distance: usize,

    /// Upper bound on pages held in memory. `None` keeps everything.
    ///
    /// When set, pages at the end opposite to the current load direction
    /// are dropped and reloaded on demand.
    #[serde(default)]
    pub max_cached_pages: Option<usize>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            image_width: 400,
            image_base_url: picsum_client::DEFAULT_BASE_URL.to_string(),
            prefetch_distance: 10,
            max_cached_pages: None,
        }
    }
}

impl FeedConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the fixed display width.
    pub fn with_image_width(mut self, width: u32) -> Self {
        self.image_width = width;
        self
    }

    /// Set the host for rendition URLs.
    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }

    /// Set the prefetch distance.
    pub fn with_prefetch_distance(mut self, distance: usize) -> Self {
        self.prefetch_distance = distance;
        self
    }

    /// Bound the number of cached pages.
    pub fn with_max_cached_pages(mut self, max: usize) -> Self {
        self.max_cached_pages = Some(max);
        self
    }

    /// Reject values the pager cannot work with.
    pub fn validate(&self) -> FeedResult<()> {
        if self.page_size == 0 {
            return Err(FeedError::Config("page_size must be > 0".into()));
        }
        if self.image_width == 0 {
            return Err(FeedError::Config("image_width must be > 0".into()));
        }
        if self.image_base_url.trim().is_empty() {
            return Err(FeedError::Config("image_base_url must not be empty".into()));
        }
        if let Some(max) = self.max_cached_pages {
            if max < 2 {
                return Err(FeedError::Config("max_cached_pages must be >= 2".into()));
            }
        }
        Ok(())
    }
}
