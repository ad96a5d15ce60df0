//! Picsum feed browser
//!
//! Loads pages of the photo feed, or a single image, and prints them.

use anyhow::Result;
use clap::Parser;
use feed_cli::{commands, Cli, Commands, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so stdout stays machine-readable)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,image_feed=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.apply(Config::from_env()?);
    tracing::info!(
        base_url = %config.picsum_base_url,
        page_size = config.page_size,
        width = config.image_width,
        "Starting pinfeed"
    );

    let repository = commands::build_repository(&config, cli.seed)?;

    match cli.command {
        Commands::Feed { pages, json } => commands::feed(repository, pages, json).await,
        Commands::Show { id, json } => commands::show(repository, id.as_deref(), json).await,
    }
}
