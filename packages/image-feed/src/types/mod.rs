//! Domain types for the image feed.

pub mod config;
pub mod image;
