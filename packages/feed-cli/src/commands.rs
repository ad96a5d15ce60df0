//! Command implementations and output formatting.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use futures::StreamExt;
use image_feed::{
    DetailState, FeedRepository, FeedSnapshot, GetImageByIdUseCase, GetImagesUseCase, Image,
    ImageDetail, ImageMapper, LoadOutcome, Pager, PicsumSource,
};
use picsum_client::PicsumClient;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;

/// Wire the HTTP client, source and repository together.
pub fn build_repository(config: &Config, seed: Option<u64>) -> Result<Arc<FeedRepository>> {
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .context("Failed to build HTTP client")?;
    let client = PicsumClient::new()
        .with_base_url(&config.picsum_base_url)
        .with_context(|| format!("Invalid Picsum base URL: {}", config.picsum_base_url))?
        .with_http_client(http);

    let feed_config = config.feed_config();
    let source = Arc::new(PicsumSource::new(client));
    let mut repository = FeedRepository::new(source, feed_config.clone())
        .context("Invalid feed configuration")?;
    if let Some(seed) = seed {
        let mapper = ImageMapper::from_config(&feed_config).with_seed(seed);
        repository = repository.with_mapper(mapper);
    }

    Ok(Arc::new(repository))
}

/// Start the pager and append until `pages` pages are loaded, the data
/// runs out, or a load fails. Failures are left in the load states.
pub async fn load_feed(pager: &Pager, pages: usize) -> FeedSnapshot {
    if let LoadOutcome::Failed(err) = pager.start().await {
        warn!(error = %err, "Initial load failed");
        return pager.snapshot();
    }

    for _ in 1..pages {
        match pager.append().await {
            LoadOutcome::Loaded { items: 0 } | LoadOutcome::Skipped => {
                info!("Reached the end of the feed");
                break;
            }
            LoadOutcome::Loaded { .. } => {}
            LoadOutcome::Failed(err) => {
                warn!(error = %err, "Stopped loading after a failed page");
                break;
            }
            LoadOutcome::Cancelled => break,
        }
    }

    pager.snapshot()
}

pub async fn feed(repository: Arc<FeedRepository>, pages: usize, json: bool) -> Result<()> {
    let pager = GetImagesUseCase::new(repository).execute();

    let mut snapshots = pager.stream();
    let watcher = tokio::spawn(async move {
        while let Some(snapshot) = snapshots.next().await {
            debug!(
                items = snapshot.len(),
                generation = snapshot.generation,
                refresh = %snapshot.load_states.refresh,
                append = %snapshot.load_states.append,
                "Feed updated"
            );
        }
    });

    let snapshot = load_feed(&pager, pages).await;
    pager.close();
    watcher.abort();

    if json {
        println!("{}", serde_json::to_string_pretty(&FeedOutput::from(&snapshot))?);
    } else {
        for image in &snapshot.items {
            println!("{}", render_image_line(image));
        }
        println!("{}", render_summary(&snapshot));
    }

    if let Some((load_type, err)) = snapshot.load_states.first_error() {
        bail!("{} failed: {}", load_type, err);
    }
    Ok(())
}

pub async fn show(repository: Arc<FeedRepository>, id: Option<&str>, json: bool) -> Result<()> {
    let detail = ImageDetail::new(GetImageByIdUseCase::new(repository));

    match detail.open(id).await {
        DetailState::Loaded(image) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&image)?);
            } else {
                println!("{}", render_image_detail(&image));
            }
            Ok(())
        }
        DetailState::NotFound { id } => bail!("Image {} not found", id),
        DetailState::Failed { id, message } => bail!("Failed to load image {}: {}", id, message),
        DetailState::InvalidId => bail!("An image id is required"),
        DetailState::Loading => bail!("Image lookup did not finish"),
    }
}

#[derive(Debug, Serialize)]
pub struct FeedOutput<'a> {
    pub items: &'a [Image],
    pub end_of_pagination_reached: bool,
}

impl<'a> From<&'a FeedSnapshot> for FeedOutput<'a> {
    fn from(snapshot: &'a FeedSnapshot) -> Self {
        Self {
            items: &snapshot.items,
            end_of_pagination_reached: snapshot.load_states.append.end_of_pagination_reached(),
        }
    }
}

pub fn render_image_line(image: &Image) -> String {
    format!(
        "{:>6}  {:<28} {:>4}x{:<4} {}",
        image.id, image.author, image.width, image.height, image.download_url
    )
}

pub fn render_summary(snapshot: &FeedSnapshot) -> String {
    let states = &snapshot.load_states;
    format!(
        "{} images (refresh: {}, prepend: {}, append: {})",
        snapshot.len(),
        states.refresh,
        states.prepend,
        states.append
    )
}

pub fn render_image_detail(image: &Image) -> String {
    format!(
        "Image {}\n  Author: {}\n  Size:   {}x{}\n  Source: {}\n  Image:  {}",
        image.id, image.author, image.width, image.height, image.url, image.download_url
    )
}
