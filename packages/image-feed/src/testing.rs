//! Testing utilities including mock implementations.
//!
//! These are useful for testing code that uses the image feed without
//! making real network calls.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

use crate::error::{FeedError, FeedResult};
use crate::traits::source::ImageSource;
use crate::types::image::{Image, RawImage};

/// Build a display-ready image with a fixed 400x300 rendition.
pub fn image(id: &str) -> Image {
    Image {
        id: id.to_string(),
        author: format!("Author {}", id),
        url: format!("https://unsplash.com/photos/{}", id),
        width: 400,
        height: 300,
        download_url: format!("https://picsum.photos/id/{}/400/300", id),
    }
}

/// Build a raw record as the API would return it.
pub fn raw_image(id: &str) -> RawImage {
    RawImage::new(
        id,
        format!("Author {}", id),
        format!("https://unsplash.com/photos/{}", id),
    )
}

/// A mock image source backed by an in-memory list of records.
///
/// Records are `"0"`, `"1"`, ... in order; page `n` of size `s` returns
/// records `(n-1)*s .. n*s`. Failures and a gate that holds fetches in
/// flight can be switched on for concurrency tests.
///
/// # Example
///
/// ```rust
/// use image_feed::testing::MockImageSource;
///
/// let mock = MockImageSource::with_total(25);
/// mock.fail_page(3);
/// ```
#[derive(Clone)]
pub struct MockImageSource {
    records: Arc<RwLock<Vec<RawImage>>>,
    failing_pages: Arc<RwLock<HashSet<u32>>>,
    fail_lookups: Arc<RwLock<bool>>,
    page_calls: Arc<RwLock<Vec<(u32, u32)>>>,
    id_calls: Arc<RwLock<Vec<String>>>,
    /// `true` while fetches must wait.
    gate: Arc<watch::Sender<bool>>,
    /// Pages whose fetches must wait, independent of `gate`.
    held_pages: Arc<watch::Sender<HashSet<u32>>>,
    /// Number of page fetches entered so far.
    started: Arc<watch::Sender<usize>>,
}

impl Default for MockImageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockImageSource {
    /// Create an empty mock source.
    pub fn new() -> Self {
        let (gate, _) = watch::channel(false);
        let (held_pages, _) = watch::channel(HashSet::new());
        let (started, _) = watch::channel(0);
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            failing_pages: Arc::new(RwLock::new(HashSet::new())),
            fail_lookups: Arc::new(RwLock::new(false)),
            page_calls: Arc::new(RwLock::new(Vec::new())),
            id_calls: Arc::new(RwLock::new(Vec::new())),
            gate: Arc::new(gate),
            held_pages: Arc::new(held_pages),
            started: Arc::new(started),
        }
    }

    /// Create a mock holding `total` sequential records.
    pub fn with_total(total: usize) -> Self {
        let mock = Self::new();
        mock.records
            .write()
            .unwrap()
            .extend((0..total).map(|i| raw_image(&i.to_string())));
        mock
    }

    /// Append a record.
    pub fn add_record(&self, record: RawImage) {
        self.records.write().unwrap().push(record);
    }

    /// Blank out the id of the record at `index` so mapping rejects it.
    pub fn corrupt_record(&self, index: usize) {
        if let Some(record) = self.records.write().unwrap().get_mut(index) {
            record.id = String::new();
        }
    }

    /// Make every fetch of `page` fail until [`clear_failures`](Self::clear_failures).
    pub fn fail_page(&self, page: u32) {
        self.failing_pages.write().unwrap().insert(page);
    }

    /// Make single-record lookups fail (or succeed again).
    pub fn fail_lookups(&self, fail: bool) {
        *self.fail_lookups.write().unwrap() = fail;
    }

    pub fn clear_failures(&self) {
        self.failing_pages.write().unwrap().clear();
        self.fail_lookups(false);
    }

    /// Hold every subsequent page fetch until [`release`](Self::release).
    pub fn hold(&self) {
        self.gate.send_replace(true);
    }

    /// Let held fetches complete.
    pub fn release(&self) {
        self.gate.send_replace(false);
    }

    /// Hold fetches of `page` only until [`release_page`](Self::release_page).
    pub fn hold_page(&self, page: u32) {
        self.held_pages.send_modify(|held| {
            held.insert(page);
        });
    }

    pub fn release_page(&self, page: u32) {
        self.held_pages.send_modify(|held| {
            held.remove(&page);
        });
    }

    /// Wait until at least `count` page fetches have been entered.
    pub async fn wait_for_page_calls(&self, count: usize) {
        let mut rx = self.started.subscribe();
        let _ = rx.wait_for(|n| *n >= count).await;
    }

    /// `(page, limit)` of every page fetch, in order.
    pub fn page_calls(&self) -> Vec<(u32, u32)> {
        self.page_calls.read().unwrap().clone()
    }

    pub fn page_call_count(&self) -> usize {
        self.page_calls.read().unwrap().len()
    }

    /// Ids of every single-record lookup, in order.
    pub fn id_calls(&self) -> Vec<String> {
        self.id_calls.read().unwrap().clone()
    }

    /// Clear all recorded calls.
    pub fn reset_calls(&self) {
        self.page_calls.write().unwrap().clear();
        self.id_calls.write().unwrap().clear();
    }

    async fn wait_for_gate(&self, page: u32) {
        // The senders live as long as self, so these cannot fail.
        let mut rx = self.gate.subscribe();
        let _ = rx.wait_for(|held| !*held).await;
        let mut rx = self.held_pages.subscribe();
        let _ = rx.wait_for(|held| !held.contains(&page)).await;
    }
}

fn unavailable(what: String) -> FeedError {
    FeedError::Fetch(Box::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        what,
    )))
}

#[async_trait]
impl ImageSource for MockImageSource {
    async fn fetch_page(&self, page: u32, limit: u32) -> FeedResult<Vec<RawImage>> {
        self.page_calls.write().unwrap().push((page, limit));
        self.started.send_modify(|n| *n += 1);
        self.wait_for_gate(page).await;

        if self.failing_pages.read().unwrap().contains(&page) {
            return Err(unavailable(format!("page {} unavailable", page)));
        }

        let records = self.records.read().unwrap();
        let start = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);
        Ok(records
            .iter()
            .skip(start)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn fetch_by_id(&self, id: &str) -> FeedResult<Option<RawImage>> {
        self.id_calls.write().unwrap().push(id.to_string());

        if *self.fail_lookups.read().unwrap() {
            return Err(unavailable(format!("lookup of {} failed", id)));
        }

        Ok(self
            .records
            .read()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
