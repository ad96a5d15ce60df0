//! Single-image detail loading.
//!
//! Keeps "the id was bad", "the image does not exist" and "the lookup
//! failed" apart so a detail screen can react to each differently.

use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::FeedError;
use crate::types::image::Image;
use crate::usecase::GetImageByIdUseCase;

/// Observable state of a detail view.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(Image),
    /// The lookup succeeded but no such image exists.
    NotFound { id: String },
    /// The lookup itself failed; a retry may help.
    Failed { id: String, message: String },
    /// The caller supplied no usable id.
    InvalidId,
}

impl DetailState {
    pub fn image(&self) -> Option<&Image> {
        match self {
            DetailState::Loaded(image) => Some(image),
            _ => None,
        }
    }
}

/// Loads one image at a time and publishes its [`DetailState`].
pub struct ImageDetail {
    use_case: GetImageByIdUseCase,
    current_id: Mutex<Option<String>>,
    state: watch::Sender<DetailState>,
}

impl ImageDetail {
    pub fn new(use_case: GetImageByIdUseCase) -> Self {
        let (state, _) = watch::channel(DetailState::Loading);
        Self {
            use_case,
            current_id: Mutex::new(None),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn current_id(&self) -> Option<String> {
        self.current_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Entry point for a navigation argument that may be missing.
    pub async fn open(&self, id: Option<&str>) -> DetailState {
        match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => self.load(id).await,
            None => {
                warn!("Detail opened without a usable image id");
                self.state.send_replace(DetailState::InvalidId);
                DetailState::InvalidId
            }
        }
    }

    /// Load `id`, making it the current id. If another load starts before
    /// this one finishes, this result is dropped.
    pub async fn load(&self, id: &str) -> DetailState {
        *self
            .current_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(id.to_string());
        self.state.send_replace(DetailState::Loading);
        debug!(id, "Loading image detail");

        let next = match self.use_case.execute(id).await {
            Ok(Some(image)) => {
                debug!(id = %image.id, "Loaded image detail");
                DetailState::Loaded(image)
            }
            Ok(None) => {
                warn!(id, "Image not found");
                DetailState::NotFound { id: id.to_string() }
            }
            Err(FeedError::InvalidId) => DetailState::InvalidId,
            Err(e) => {
                warn!(id, error = %e, "Failed to load image detail");
                DetailState::Failed {
                    id: id.to_string(),
                    message: e.to_string(),
                }
            }
        };

        if self.current_id().as_deref() != Some(id) {
            debug!(id, "Dropping superseded detail result");
            return self.state();
        }
        self.state.send_replace(next.clone());
        next
    }

    /// Reload the current id, or report `InvalidId` when there is none.
    pub async fn retry(&self) -> DetailState {
        match self.current_id() {
            Some(id) => self.load(&id).await,
            None => {
                warn!("Cannot retry: no image id");
                self.state.send_replace(DetailState::InvalidId);
                DetailState::InvalidId
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::FeedRepository;
    use crate::testing::MockImageSource;
    use crate::types::config::FeedConfig;
    use std::sync::Arc;

    fn detail(mock: &MockImageSource) -> ImageDetail {
        let repo = FeedRepository::new(Arc::new(mock.clone()), FeedConfig::default()).unwrap();
        ImageDetail::new(GetImageByIdUseCase::new(Arc::new(repo)))
    }

    #[tokio::test]
    async fn test_loaded() {
        let mock = MockImageSource::with_total(5);
        let detail = detail(&mock);

        let state = detail.open(Some("2")).await;

        assert_eq!(state.image().map(|i| i.id.as_str()), Some("2"));
        assert_eq!(detail.state(), state);
    }

    #[tokio::test]
    async fn test_missing_argument_is_invalid() {
        let mock = MockImageSource::with_total(5);
        let detail = detail(&mock);

        assert_eq!(detail.open(None).await, DetailState::InvalidId);
        assert_eq!(detail.open(Some("  ")).await, DetailState::InvalidId);
        assert!(mock.id_calls().is_empty());
    }

    #[tokio::test]
    async fn test_not_found() {
        let mock = MockImageSource::with_total(5);
        let detail = detail(&mock);

        let state = detail.open(Some("missing-id")).await;

        assert_eq!(
            state,
            DetailState::NotFound {
                id: "missing-id".into()
            }
        );
    }

    #[tokio::test]
    async fn test_failure_then_retry() {
        let mock = MockImageSource::with_total(5);
        mock.fail_lookups(true);
        let detail = detail(&mock);

        let state = detail.open(Some("1")).await;
        assert!(matches!(state, DetailState::Failed { ref id, .. } if id == "1"));

        mock.fail_lookups(false);
        let state = detail.retry().await;
        assert!(state.image().is_some());
        assert_eq!(mock.id_calls(), vec!["1".to_string(), "1".to_string()]);
    }

    #[tokio::test]
    async fn test_retry_without_id() {
        let mock = MockImageSource::with_total(5);
        let detail = detail(&mock);

        assert_eq!(detail.retry().await, DetailState::InvalidId);
    }

    #[tokio::test]
    async fn test_subscriber_sees_result() {
        let mock = MockImageSource::with_total(5);
        let detail = detail(&mock);
        let rx = detail.subscribe();

        detail.load("4").await;

        assert!(rx.borrow().image().is_some());
    }
}
