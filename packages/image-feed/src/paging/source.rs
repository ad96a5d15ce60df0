//! Page-keyed loader over an [`ImageSource`].

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::FeedResult;
use crate::mapper::ImageMapper;
use crate::paging::state::{Page, PagingState};
use crate::traits::source::ImageSource;

/// Key used when a load has none (the initial load).
pub const STARTING_PAGE: u32 = 1;

/// Input to a single [`ImagePagingSource::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadParams {
    /// Page to load; `None` means [`STARTING_PAGE`].
    pub key: Option<u32>,
    pub load_size: u32,
}

impl LoadParams {
    pub fn new(key: Option<u32>, load_size: u32) -> Self {
        Self { key, load_size }
    }
}

/// Turns numbered page fetches into [`Page`]s with neighbour keys.
///
/// Holds no state between calls beyond its collaborators; every `load` is
/// independent.
#[derive(Clone)]
pub struct ImagePagingSource {
    source: Arc<dyn ImageSource>,
    mapper: Arc<ImageMapper>,
}

impl ImagePagingSource {
    pub fn new(source: Arc<dyn ImageSource>, mapper: Arc<ImageMapper>) -> Self {
        Self { source, mapper }
    }

    /// Fetch and map one page. Errors are returned as-is, never retried.
    pub async fn load(&self, params: LoadParams) -> FeedResult<Page> {
        let page = params.key.unwrap_or(STARTING_PAGE);
        debug!(source = self.source.name(), page, load_size = params.load_size, "Loading page");

        let rows = self
            .source
            .fetch_page(page, params.load_size)
            .await
            .map_err(|e| {
                warn!(page, error = %e, "Page fetch failed");
                e
            })?;

        let items = self.mapper.map_all(&rows).map_err(|e| {
            warn!(page, error = %e, "Page mapping failed");
            e
        })?;

        let prev_key = page.checked_sub(1).filter(|k| *k >= STARTING_PAGE);
        let next_key = if items.is_empty() {
            None
        } else {
            page.checked_add(1)
        };

        debug!(page, count = items.len(), ?prev_key, ?next_key, "Loaded page");
        Ok(Page {
            items,
            prev_key,
            next_key,
        })
    }

    /// Key to restart from so the reload lands near the anchor.
    ///
    /// Prefers the page after the anchor page's predecessor, then the page
    /// before its successor; `None` restarts from [`STARTING_PAGE`].
    pub fn refresh_key(&self, state: &PagingState) -> Option<u32> {
        let anchor = state.anchor_position?;
        let page = state.closest_page_to_position(anchor)?;
        page.prev_key
            .and_then(|k| k.checked_add(1))
            .or_else(|| page.next_key.and_then(|k| k.checked_sub(1)))
    }
}
