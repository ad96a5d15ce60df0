//! Per-direction load states.
//!
//! Each axis (refresh, prepend, append) is independently in exactly one of
//! three states. UIs react to transitions: a spinner while `Loading`, a
//! retry affordance on `Error`.
//!
//! ```text
//! NotLoading --start--> Loading --ok--> NotLoading
//!                          |
//!                          +--err--> Error --retry--> Loading
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::FeedError;

/// Which end of the sequence a load works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadType {
    /// Full reload, replacing everything materialized so far
    Refresh,
    /// Load the page before the first materialized page
    Prepend,
    /// Load the page after the last materialized page
    Append,
}

impl fmt::Display for LoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadType::Refresh => write!(f, "refresh"),
            LoadType::Prepend => write!(f, "prepend"),
            LoadType::Append => write!(f, "append"),
        }
    }
}

/// State of one load axis.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Idle. `end_of_pagination_reached` is set once the source reported
    /// there is nothing further in this direction.
    NotLoading { end_of_pagination_reached: bool },
    /// A load is in flight.
    Loading,
    /// The last load failed; stays here until retried.
    Error(Arc<FeedError>),
}

impl LoadState {
    /// Idle with more data possibly available.
    pub const INCOMPLETE: LoadState = LoadState::NotLoading {
        end_of_pagination_reached: false,
    };

    /// Idle with nothing left to load.
    pub const COMPLETE: LoadState = LoadState::NotLoading {
        end_of_pagination_reached: true,
    };

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadState::Error(_))
    }

    pub fn error(&self) -> Option<&Arc<FeedError>> {
        match self {
            LoadState::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn end_of_pagination_reached(&self) -> bool {
        matches!(
            self,
            LoadState::NotLoading {
                end_of_pagination_reached: true
            }
        )
    }
}

impl Default for LoadState {
    fn default() -> Self {
        LoadState::INCOMPLETE
    }
}

impl PartialEq for LoadState {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                LoadState::NotLoading {
                    end_of_pagination_reached: a,
                },
                LoadState::NotLoading {
                    end_of_pagination_reached: b,
                },
            ) => a == b,
            (LoadState::Loading, LoadState::Loading) => true,
            (LoadState::Error(a), LoadState::Error(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::NotLoading {
                end_of_pagination_reached: true,
            } => write!(f, "complete"),
            LoadState::NotLoading { .. } => write!(f, "idle"),
            LoadState::Loading => write!(f, "loading"),
            LoadState::Error(e) => write!(f, "error: {}", e),
        }
    }
}

/// One [`LoadState`] per axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadStates {
    pub refresh: LoadState,
    pub prepend: LoadState,
    pub append: LoadState,
}

impl LoadStates {
    pub fn get(&self, load_type: LoadType) -> &LoadState {
        match load_type {
            LoadType::Refresh => &self.refresh,
            LoadType::Prepend => &self.prepend,
            LoadType::Append => &self.append,
        }
    }

    pub fn set(&mut self, load_type: LoadType, state: LoadState) {
        match load_type {
            LoadType::Refresh => self.refresh = state,
            LoadType::Prepend => self.prepend = state,
            LoadType::Append => self.append = state,
        }
    }

    /// No axis is loading.
    pub fn is_idle(&self) -> bool {
        !self.refresh.is_loading() && !self.prepend.is_loading() && !self.append.is_loading()
    }

    pub fn has_error(&self) -> bool {
        self.first_error().is_some()
    }

    /// First failing axis, refresh taking precedence.
    pub fn first_error(&self) -> Option<(LoadType, &Arc<FeedError>)> {
        [LoadType::Refresh, LoadType::Prepend, LoadType::Append]
            .into_iter()
            .find_map(|t| self.get(t).error().map(|e| (t, e)))
    }
}
