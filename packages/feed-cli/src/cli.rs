use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "pinfeed")]
#[command(about = "Browse the Picsum photo feed page by page")]
pub struct Cli {
    /// Picsum host (overrides PICSUM_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Images per page (overrides FEED_PAGE_SIZE)
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    /// Display width every image is mapped to (overrides FEED_IMAGE_WIDTH)
    #[arg(long, global = true)]
    pub width: Option<u32>,

    /// Seed for the random display heights
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Load the feed and print its images
    Feed {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: usize,

        #[arg(long)]
        json: bool,
    },

    /// Look up a single image by id
    Show {
        id: Option<String>,

        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the environment config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(base_url) = &self.base_url {
            config.picsum_base_url = base_url.clone();
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(width) = self.width {
            config.image_width = width;
        }
        config
    }
}
