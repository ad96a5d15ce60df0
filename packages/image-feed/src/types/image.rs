//! Image entity and the raw record it is mapped from.

use serde::{Deserialize, Serialize};

/// A feed image ready for display.
///
/// Built once by [`ImageMapper`](crate::mapper::ImageMapper) when a page
/// arrives and never mutated afterwards. `height` is derived at mapping
/// time and `download_url` always points at a `width x height` rendition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Image {
    /// Stable identifier from the source
    pub id: String,
    pub author: String,
    /// Canonical source URL
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Dimension-specific rendition URL
    pub download_url: String,
}

impl Image {
    /// Height divided by width, for layout.
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 {
            return 0.0;
        }
        self.height as f32 / self.width as f32
    }
}

/// An image record as delivered by a remote source, before mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawImage {
    pub id: String,
    pub author: String,
    pub width: u32,
    pub height: u32,
    pub url: String,
    pub download_url: String,
}

impl RawImage {
    /// Create a raw record; `download_url` defaults to the original rendition.
    pub fn new(id: impl Into<String>, author: impl Into<String>, url: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            download_url: format!("https://picsum.photos/id/{}/5000/3333", id),
            id,
            author: author.into(),
            width: 5000,
            height: 3333,
            url: url.into(),
        }
    }

    /// Set original dimensions.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

impl From<picsum_client::PicsumImage> for RawImage {
    fn from(image: picsum_client::PicsumImage) -> Self {
        Self {
            id: image.id,
            author: image.author,
            width: image.width,
            height: image.height,
            url: image.url,
            download_url: image.download_url,
        }
    }
}
