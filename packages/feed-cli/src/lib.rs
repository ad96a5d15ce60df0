//! `pinfeed`: a terminal front end for the image feed.
//!
//! Composition happens in [`commands::build_repository`]; everything else
//! lives in the `image-feed` library.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
