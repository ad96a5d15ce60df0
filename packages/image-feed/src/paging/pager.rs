//! Paging controller.
//!
//! A [`Pager`] owns the materialized pages and exposes them as one ordered
//! sequence of images. Consumers observe [`FeedSnapshot`]s through a watch
//! channel, so a late subscriber immediately sees the latest state without
//! triggering any fetch.
//!
//! # Guarantees
//!
//! - **Single-flight per direction**: a refresh, prepend or append requested
//!   while the same kind of load is in flight is skipped, not queued.
//! - **Generations**: a refresh cancels in-flight prepend/append loads of the
//!   previous generation; their results are never applied.
//! - **Cancellation**: after [`Pager::close`] no fetch result mutates state.
//!
//! # Example
//!
//! ```rust,ignore
//! let pager = repository.paged_images();
//! let mut snapshots = pager.stream();
//!
//! pager.start().await;
//! while let Some(snapshot) = snapshots.next().await {
//!     render(&snapshot.items, &snapshot.load_states);
//! }
//! ```

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{FeedError, FeedResult};
use crate::paging::load_state::{LoadState, LoadStates, LoadType};
use crate::paging::source::{ImagePagingSource, LoadParams};
use crate::paging::state::{Page, PagingState};
use crate::types::config::FeedConfig;
use crate::types::image::Image;

/// What subscribers observe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedSnapshot {
    /// Materialized images in order.
    pub items: Vec<Image>,
    pub load_states: LoadStates,
    /// Incremented every time a refresh starts.
    pub generation: u64,
}

impl FeedSnapshot {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of one requested load.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// A page arrived and was applied.
    Loaded { items: usize },
    /// Nothing was fetched: a load of this kind is in flight, the end was
    /// reached, or a refresh must succeed first.
    Skipped,
    /// The fetch failed; the axis is now in `Error`.
    Failed(Arc<FeedError>),
    /// The pager was closed, a refresh superseded this load, or cache
    /// eviction moved the boundary it was loading against.
    Cancelled,
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

struct PagerState {
    paging: PagingState,
    load_states: LoadStates,
    generation: u64,
    /// Cancelled when the next refresh starts.
    generation_token: CancellationToken,
    started: bool,
}

struct Inner {
    source: ImagePagingSource,
    page_size: u32,
    prefetch_distance: usize,
    max_cached_pages: Option<usize>,
    state: Mutex<PagerState>,
    snapshots: watch::Sender<FeedSnapshot>,
    cancel: CancellationToken,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Paging controller over an [`ImagePagingSource`]. Cheap to clone; clones
/// share the same cache.
#[derive(Clone)]
pub struct Pager {
    inner: Arc<Inner>,
}

impl Pager {
    pub fn new(source: ImagePagingSource, config: &FeedConfig) -> Self {
        let cancel = CancellationToken::new();
        let (snapshots, _) = watch::channel(FeedSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                source,
                page_size: config.page_size,
                prefetch_distance: config.prefetch_distance,
                max_cached_pages: config.max_cached_pages,
                state: Mutex::new(PagerState {
                    paging: PagingState::default(),
                    load_states: LoadStates::default(),
                    generation: 0,
                    generation_token: cancel.child_token(),
                    started: false,
                }),
                snapshots,
                cancel,
            }),
        }
    }

    /// Observe snapshots. The receiver already holds the latest one.
    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.inner.snapshots.subscribe()
    }

    /// Snapshots as a stream, starting with the current one.
    pub fn stream(&self) -> WatchStream<FeedSnapshot> {
        WatchStream::new(self.subscribe())
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.inner.snapshots.borrow().clone()
    }

    pub fn load_states(&self) -> LoadStates {
        self.lock().load_states.clone()
    }

    /// Pages and anchor as currently held.
    pub fn paging_state(&self) -> PagingState {
        self.lock().paging.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Run the initial refresh unless one has already been started.
    pub async fn start(&self) -> LoadOutcome {
        if self.lock().started {
            return LoadOutcome::Skipped;
        }
        self.refresh().await
    }

    /// Discard everything and reload from the refresh key (page 1 when no
    /// anchor is known). Previous items stay visible until the new first
    /// page arrives.
    pub async fn refresh(&self) -> LoadOutcome {
        let (key, token, generation) = {
            let mut state = self.lock();
            if self.is_closed() {
                return LoadOutcome::Cancelled;
            }
            if state.load_states.refresh.is_loading() {
                debug!("Refresh already in flight");
                return LoadOutcome::Skipped;
            }

            let key = self.inner.source.refresh_key(&state.paging);

            state.generation_token.cancel();
            state.generation_token = self.inner.cancel.child_token();
            state.generation += 1;
            state.started = true;
            state.load_states = LoadStates {
                refresh: LoadState::Loading,
                ..LoadStates::default()
            };
            self.publish(&state);

            (key, state.generation_token.clone(), state.generation)
        };

        info!(?key, generation, "Refreshing feed");
        let Some(result) = self.fetch(&token, key).await else {
            return LoadOutcome::Cancelled;
        };

        let mut state = self.lock();
        if token.is_cancelled() || state.generation != generation {
            return LoadOutcome::Cancelled;
        }

        match result {
            Ok(page) => {
                let items = page.len();
                state.load_states = LoadStates {
                    refresh: LoadState::INCOMPLETE,
                    prepend: end_state(page.prev_key),
                    append: end_state(page.next_key),
                };
                state.paging = PagingState::new(vec![page], None);
                self.publish(&state);
                LoadOutcome::Loaded { items }
            }
            Err(e) => {
                warn!(error = %e, "Refresh failed");
                let err = Arc::new(e);
                state.load_states.refresh = LoadState::Error(err.clone());
                self.publish(&state);
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Load the page after the last materialized one.
    pub async fn append(&self) -> LoadOutcome {
        self.load_boundary(LoadType::Append).await
    }

    /// Load the page before the first materialized one.
    pub async fn prepend(&self) -> LoadOutcome {
        self.load_boundary(LoadType::Prepend).await
    }

    /// Re-issue every failed load. A failed refresh is retried alone since
    /// nothing can be appended to it.
    pub async fn retry(&self) -> Vec<(LoadType, LoadOutcome)> {
        let states = self.load_states();
        if states.refresh.is_error() {
            info!("Retrying refresh");
            return vec![(LoadType::Refresh, self.refresh().await)];
        }

        let mut outcomes = Vec::new();
        if states.prepend.is_error() {
            info!("Retrying prepend");
            outcomes.push((LoadType::Prepend, self.prepend().await));
        }
        if states.append.is_error() {
            info!("Retrying append");
            outcomes.push((LoadType::Append, self.append().await));
        }
        outcomes
    }

    /// Record that the consumer looked at item `index` and return the
    /// prefetch loads due because it is within `prefetch_distance` of either
    /// end. Nothing is fetched until the caller awaits or spawns them.
    /// Failed directions are left alone until [`Pager::retry`].
    #[must_use = "prefetch loads do nothing unless awaited or spawned"]
    pub fn access(
        &self,
        index: usize,
    ) -> Vec<impl Future<Output = LoadOutcome> + Send + 'static> {
        let mut wanted = Vec::new();
        {
            let mut state = self.lock();
            let count = state.paging.item_count();
            if count > 0 && !self.is_closed() {
                let index = index.min(count - 1);
                state.paging.anchor_position = Some(index);

                let after = count - 1 - index;
                if after < self.inner.prefetch_distance
                    && self.can_load(&state, LoadType::Append, false)
                {
                    wanted.push(LoadType::Append);
                }
                if index < self.inner.prefetch_distance
                    && self.can_load(&state, LoadType::Prepend, false)
                {
                    wanted.push(LoadType::Prepend);
                }
            }
        }

        wanted
            .into_iter()
            .map(|load_type| {
                let pager = self.clone();
                async move { pager.load_boundary(load_type).await }
            })
            .collect()
    }

    /// End the producing scope. In-flight fetches are abandoned and any
    /// result that still arrives is dropped.
    pub fn close(&self) {
        info!("Closing pager");
        self.inner.cancel.cancel();
    }

    async fn load_boundary(&self, load_type: LoadType) -> LoadOutcome {
        let (key, token, generation) = {
            let mut state = self.lock();
            if self.is_closed() {
                return LoadOutcome::Cancelled;
            }
            if !self.can_load(&state, load_type, true) {
                return LoadOutcome::Skipped;
            }
            let Some(key) = boundary_key(&state.paging, load_type) else {
                return LoadOutcome::Skipped;
            };

            state.load_states.set(load_type, LoadState::Loading);
            self.publish(&state);
            (key, state.generation_token.clone(), state.generation)
        };

        debug!(%load_type, key, generation, "Loading boundary page");
        let Some(result) = self.fetch(&token, Some(key)).await else {
            return LoadOutcome::Cancelled;
        };

        let mut state = self.lock();
        if token.is_cancelled() || state.generation != generation {
            debug!(%load_type, key, "Discarding stale page");
            return LoadOutcome::Cancelled;
        }
        // Eviction may have moved the boundary this load started from.
        if boundary_key(&state.paging, load_type) != Some(key) {
            debug!(%load_type, key, "Boundary moved, discarding page");
            let reset = end_state(boundary_key(&state.paging, load_type));
            state.load_states.set(load_type, reset);
            self.publish(&state);
            return LoadOutcome::Cancelled;
        }

        match result {
            Ok(page) => {
                let items = page.len();
                match load_type {
                    LoadType::Append => {
                        state.load_states.append = end_state(page.next_key);
                        if !page.is_empty() {
                            state.paging.pages.push(page);
                            self.evict(&mut state, LoadType::Append);
                        }
                    }
                    _ => {
                        state.load_states.prepend = end_state(page.prev_key);
                        if !page.is_empty() {
                            if let Some(anchor) = state.paging.anchor_position.as_mut() {
                                *anchor += items;
                            }
                            state.paging.pages.insert(0, page);
                            self.evict(&mut state, LoadType::Prepend);
                        }
                    }
                }
                self.publish(&state);
                LoadOutcome::Loaded { items }
            }
            Err(e) => {
                warn!(%load_type, key, error = %e, "Boundary load failed");
                let err = Arc::new(e);
                state.load_states.set(load_type, LoadState::Error(err.clone()));
                self.publish(&state);
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Whether a boundary load may start. `explicit` loads may leave an
    /// `Error` state; prefetch-triggered ones may not.
    fn can_load(&self, state: &PagerState, load_type: LoadType, explicit: bool) -> bool {
        if !state.started || !matches!(state.load_states.refresh, LoadState::NotLoading { .. }) {
            return false;
        }
        let axis = state.load_states.get(load_type);
        if axis.is_loading() || axis.end_of_pagination_reached() {
            return false;
        }
        if axis.is_error() && !explicit {
            return false;
        }
        boundary_key(&state.paging, load_type).is_some()
    }

    /// Drop pages from the end opposite to `load_type` beyond the cache bound.
    /// An axis with a load in flight keeps its `Loading` state; that load is
    /// discarded when it completes against the moved boundary.
    fn evict(&self, state: &mut PagerState, load_type: LoadType) {
        let Some(max) = self.inner.max_cached_pages else {
            return;
        };
        while state.paging.pages.len() > max {
            match load_type {
                LoadType::Append => {
                    let dropped = state.paging.pages.remove(0);
                    if let Some(anchor) = state.paging.anchor_position.as_mut() {
                        *anchor = anchor.saturating_sub(dropped.len());
                    }
                    if !state.load_states.prepend.is_loading() {
                        state.load_states.prepend = LoadState::INCOMPLETE;
                    }
                }
                _ => {
                    state.paging.pages.pop();
                    if !state.load_states.append.is_loading() {
                        state.load_states.append = LoadState::INCOMPLETE;
                    }
                }
            }
            debug!(%load_type, pages = state.paging.pages.len(), "Evicted cached page");
        }
    }

    async fn fetch(&self, token: &CancellationToken, key: Option<u32>) -> Option<FeedResult<Page>> {
        let params = LoadParams::new(key, self.inner.page_size);
        tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.inner.source.load(params) => Some(result),
        }
    }

    fn publish(&self, state: &PagerState) {
        self.inner.snapshots.send_replace(FeedSnapshot {
            items: state.paging.items(),
            load_states: state.load_states.clone(),
            generation: state.generation,
        });
    }

    fn lock(&self) -> MutexGuard<'_, PagerState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Key of the page a boundary load in `load_type`'s direction would fetch.
fn boundary_key(paging: &PagingState, load_type: LoadType) -> Option<u32> {
    match load_type {
        LoadType::Append => paging.last_page().and_then(|p| p.next_key),
        _ => paging.first_page().and_then(|p| p.prev_key),
    }
}

fn end_state(key: Option<u32>) -> LoadState {
    if key.is_some() {
        LoadState::INCOMPLETE
    } else {
        LoadState::COMPLETE
    }
}
