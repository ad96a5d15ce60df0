//! Raw record to [`Image`] mapping.
//!
//! Every image gets the same fixed width and a random height in
//! `[0.4 * width, width]`, and its download URL is rewritten to request
//! exactly that rendition. Mapping the same record twice yields a new
//! height each time, so callers map once and keep the result.

use std::sync::{Mutex, PoisonError};

use crate::error::{FeedError, FeedResult};
use crate::types::config::FeedConfig;
use crate::types::image::{Image, RawImage};

/// Default fixed width.
pub const DEFAULT_WIDTH: u32 = 400;

/// Maps raw records to display-ready images.
pub struct ImageMapper {
    width: u32,
    image_base_url: String,
    rng: Mutex<fastrand::Rng>,
}

impl Default for ImageMapper {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH)
    }
}

impl ImageMapper {
    /// Mapper with a fixed width and a randomly seeded RNG.
    pub fn new(width: u32) -> Self {
        Self {
            width,
            image_base_url: picsum_client::DEFAULT_BASE_URL.to_string(),
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.image_width).with_image_base_url(config.image_base_url.clone())
    }

    /// Seed the height RNG for reproducible output.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
            ..self
        }
    }

    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Inclusive bounds every mapped height falls in.
    pub fn height_range(&self) -> (u32, u32) {
        // 2/5 of a u32 always fits back into a u32.
        let min = ((u64::from(self.width) * 2 / 5) as u32).max(1);
        (min, self.width.max(min))
    }

    /// Map one record. Fails only when the record is unusable.
    pub fn map(&self, raw: &RawImage) -> FeedResult<Image> {
        validate(raw)?;

        let (min, max) = self.height_range();
        let height = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .u32(min..=max);

        Ok(Image {
            id: raw.id.clone(),
            author: raw.author.clone(),
            url: raw.url.clone(),
            width: self.width,
            height,
            download_url: self.rendition_url(&raw.id, height),
        })
    }

    /// Map a whole page, failing on the first bad record.
    pub fn map_all(&self, raws: &[RawImage]) -> FeedResult<Vec<Image>> {
        raws.iter().map(|raw| self.map(raw)).collect()
    }

    fn rendition_url(&self, id: &str, height: u32) -> String {
        format!(
            "{}/id/{}/{}/{}",
            self.image_base_url.trim_end_matches('/'),
            id,
            self.width,
            height
        )
    }
}

fn validate(raw: &RawImage) -> FeedResult<()> {
    if raw.id.trim().is_empty() {
        return Err(FeedError::malformed("record has no id"));
    }
    if raw
        .id
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%'))
    {
        return Err(FeedError::malformed(format!(
            "id {:?} is not a valid path segment",
            raw.id
        )));
    }
    if raw.author.trim().is_empty() {
        return Err(FeedError::malformed(format!("record {} has no author", raw.id)));
    }
    if raw.url.trim().is_empty() {
        return Err(FeedError::malformed(format!("record {} has no url", raw.id)));
    }
    Ok(())
}
