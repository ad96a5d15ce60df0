//! Materialized pages and the viewport anchor.

use crate::types::image::Image;

/// One loaded page of images with the keys of its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<Image>,
    /// Key of the page before this one; `None` at the start of the data.
    pub prev_key: Option<u32>,
    /// Key of the page after this one; `None` at the end of the data.
    pub next_key: Option<u32>,
}

impl Page {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Snapshot of what the pager holds, used to compute refresh keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingState {
    /// Pages in sequence order.
    pub pages: Vec<Page>,
    /// Index of the item nearest the viewport, if anything was accessed.
    pub anchor_position: Option<usize>,
}

impl PagingState {
    pub fn new(pages: Vec<Page>, anchor_position: Option<usize>) -> Self {
        Self {
            pages,
            anchor_position,
        }
    }

    /// Total items across all pages.
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Page holding `position`, clamped to the first or last non-empty page.
    pub fn closest_page_to_position(&self, position: usize) -> Option<&Page> {
        let mut remaining = position;
        for page in &self.pages {
            if remaining < page.len() {
                return Some(page);
            }
            remaining -= page.len();
        }
        self.pages.iter().rev().find(|p| !p.is_empty())
    }

    /// Item at `position`, clamped to the last item.
    pub fn closest_item_to_position(&self, position: usize) -> Option<&Image> {
        let mut items = self.pages.iter().flat_map(|p| p.items.iter());
        let count = self.item_count();
        if count == 0 {
            return None;
        }
        items.nth(position.min(count - 1))
    }

    pub fn first_page(&self) -> Option<&Page> {
        self.pages.first()
    }

    pub fn last_page(&self) -> Option<&Page> {
        self.pages.last()
    }

    /// All items in order.
    pub fn items(&self) -> Vec<Image> {
        self.pages
            .iter()
            .flat_map(|p| p.items.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::image;

    fn page(ids: std::ops::Range<u32>, prev: Option<u32>, next: Option<u32>) -> Page {
        Page {
            items: ids.map(|i| image(&i.to_string())).collect(),
            prev_key: prev,
            next_key: next,
        }
    }

    #[test]
    fn test_item_count() {
        let state = PagingState::new(
            vec![page(0..10, None, Some(2)), page(10..15, Some(1), Some(3))],
            None,
        );
        assert_eq!(state.item_count(), 15);
        assert!(!state.is_empty());
    }

    #[test]
    fn test_closest_page_inside() {
        let state = PagingState::new(
            vec![page(0..10, None, Some(2)), page(10..20, Some(1), Some(3))],
            None,
        );
        assert_eq!(state.closest_page_to_position(3).unwrap().next_key, Some(2));
        assert_eq!(state.closest_page_to_position(10).unwrap().next_key, Some(3));
        assert_eq!(state.closest_page_to_position(19).unwrap().next_key, Some(3));
    }

    #[test]
    fn test_closest_page_clamps_past_end() {
        let state = PagingState::new(
            vec![page(0..10, None, Some(2)), page(10..20, Some(1), Some(3))],
            None,
        );
        assert_eq!(state.closest_page_to_position(500).unwrap().prev_key, Some(1));
    }

    #[test]
    fn test_closest_page_empty() {
        assert!(PagingState::default().closest_page_to_position(0).is_none());
        let state = PagingState::new(vec![page(0..0, None, None)], None);
        assert!(state.closest_page_to_position(0).is_none());
    }

    #[test]
    fn test_closest_item() {
        let state = PagingState::new(vec![page(0..3, None, None)], None);
        assert_eq!(state.closest_item_to_position(1).unwrap().id, "1");
        assert_eq!(state.closest_item_to_position(99).unwrap().id, "2");
        assert!(PagingState::default().closest_item_to_position(0).is_none());
    }
}
