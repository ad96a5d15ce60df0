//! Paginated Image Feed
//!
//! Turns a page-numbered photo API into one continuous, observable sequence
//! of display-ready images, with per-direction load states a UI can render
//! spinners, error banners and retry buttons from.
//!
//! # Pipeline
//!
//! ```text
//! ImageSource (fetch page N) -> ImageMapper (RawImage -> Image)
//!     -> ImagePagingSource (Page + prev/next keys)
//!     -> Pager (cache, single-flight loads, snapshots)
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use image_feed::{FeedConfig, FeedRepository, GetImagesUseCase, PicsumSource};
//!
//! let source = Arc::new(PicsumSource::new(picsum_client::PicsumClient::new()));
//! let repository = Arc::new(FeedRepository::new(source, FeedConfig::default())?);
//!
//! let pager = GetImagesUseCase::new(repository).execute();
//! pager.start().await;
//! // user scrolled near the end: prefetch page 2
//! for load in pager.access(7) {
//!     tokio::spawn(load);
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - The remote fetch port ([`ImageSource`])
//! - [`types`] - Image entity, raw record and configuration
//! - [`mapper`] - Raw record to image mapping
//! - [`paging`] - Paged source, load states and the [`Pager`]
//! - [`sources`] - Source implementations (Picsum)
//! - [`detail`] - Single-image detail state
//! - [`testing`] - Mock implementations for testing

pub mod detail;
pub mod error;
pub mod mapper;
pub mod paging;
pub mod repository;
pub mod sources;
pub mod testing;
pub mod traits;
pub mod types;
pub mod usecase;

// Re-export core types at crate root
pub use detail::{DetailState, ImageDetail};
pub use error::{FeedError, FeedResult};
pub use mapper::ImageMapper;
pub use paging::{
    FeedSnapshot, ImagePagingSource, LoadOutcome, LoadParams, LoadState, LoadStates, LoadType,
    Page, Pager, PagingState,
};
pub use repository::FeedRepository;
pub use sources::PicsumSource;
pub use traits::source::ImageSource;
pub use types::{
    config::FeedConfig,
    image::{Image, RawImage},
};
pub use usecase::{GetImageByIdUseCase, GetImagesUseCase};
