//! Remote fetch port.
//!
//! An [`ImageSource`] answers two questions: "give me page N of size S" and
//! "give me the record with this id". Everything above it (mapping, paging,
//! load states) is source-agnostic.
//!
//! # Usage
//!
//! ```rust,ignore
//! use image_feed::traits::source::ImageSource;
//!
//! let rows = source.fetch_page(1, 10).await?;
//! let one = source.fetch_by_id("237").await?;
//! ```

use async_trait::async_trait;

use crate::error::FeedResult;
use crate::types::image::RawImage;

/// Remote source of raw image records.
///
/// Implementations must surface transport failures and non-2xx responses
/// as [`FeedError::Fetch`](crate::error::FeedError::Fetch) and undecodable
/// bodies as [`FeedError::Malformed`](crate::error::FeedError::Malformed).
/// They must not retry on their own.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch one page of records. `page` is 1-based; an empty vector
    /// signals the end of the data.
    async fn fetch_page(&self, page: u32, limit: u32) -> FeedResult<Vec<RawImage>>;

    /// Fetch a single record. A record that does not exist is `Ok(None)`,
    /// not an error.
    async fn fetch_by_id(&self, id: &str) -> FeedResult<Option<RawImage>>;

    /// Name used in logs.
    fn name(&self) -> &str;
}
