use anyhow::{Context, Result};
use dotenvy::dotenv;
use image_feed::FeedConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default HTTP request timeout.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub picsum_base_url: String,
    pub page_size: u32,
    pub image_width: u32,
    pub prefetch_distance: usize,
    pub max_cached_pages: Option<usize>,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        let feed = FeedConfig::default();
        Self {
            picsum_base_url: picsum_client::DEFAULT_BASE_URL.to_string(),
            page_size: feed.page_size,
            image_width: feed.image_width,
            prefetch_distance: feed.prefetch_distance,
            max_cached_pages: feed.max_cached_pages,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable lookup; unset variables fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            picsum_base_url: lookup("PICSUM_BASE_URL").unwrap_or(defaults.picsum_base_url),
            page_size: parse_or(&lookup, "FEED_PAGE_SIZE", defaults.page_size)?,
            image_width: parse_or(&lookup, "FEED_IMAGE_WIDTH", defaults.image_width)?,
            prefetch_distance: parse_or(
                &lookup,
                "FEED_PREFETCH_DISTANCE",
                defaults.prefetch_distance,
            )?,
            max_cached_pages: lookup("FEED_MAX_CACHED_PAGES")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .context("FEED_MAX_CACHED_PAGES must be a valid number")
                })
                .transpose()?,
            http_timeout: Duration::from_secs(parse_or(
                &lookup,
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
        })
    }

    /// Feed settings for the library.
    pub fn feed_config(&self) -> FeedConfig {
        let config = FeedConfig::new()
            .with_page_size(self.page_size)
            .with_image_width(self.image_width)
            .with_image_base_url(self.picsum_base_url.clone())
            .with_prefetch_distance(self.prefetch_distance);

        match self.max_cached_pages {
            Some(max) => config.with_max_cached_pages(max),
            None => config,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        None => Ok(default),
    }
}
