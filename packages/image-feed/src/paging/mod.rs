//! Paging pipeline: page-keyed fetch, mapping, materialized sequence and
//! load states.
//!
//! - [`source`] - stateless page loader and refresh-key computation
//! - [`state`] - pages and anchor position
//! - [`load_state`] - per-direction load state machine
//! - [`pager`] - controller owning the cache and notifying subscribers

pub mod load_state;
pub mod pager;
pub mod source;
pub mod state;

pub use load_state::{LoadState, LoadStates, LoadType};
pub use pager::{FeedSnapshot, LoadOutcome, Pager};
pub use source::{ImagePagingSource, LoadParams, STARTING_PAGE};
pub use state::{Page, PagingState};
