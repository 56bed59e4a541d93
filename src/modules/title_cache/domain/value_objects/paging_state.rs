use crate::modules::title_cache::domain::entities::CachedTitle;

/// One page already handed to the paging consumer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedPage {
    pub items: Vec<CachedTitle>,
}

impl LoadedPage {
    pub fn new(items: Vec<CachedTitle>) -> Self {
        Self { items }
    }
}

/// Snapshot of what the consumer has loaded and where it is scrolled
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagingState {
    pub pages: Vec<LoadedPage>,
    /// Index into the flattened item list closest to the viewport
    pub anchor_position: Option<usize>,
}

impl PagingState {
    pub fn new(pages: Vec<LoadedPage>, anchor_position: Option<usize>) -> Self {
        Self {
            pages,
            anchor_position,
        }
    }

    /// State before anything has been loaded
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|p| p.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Item at `position`, clamped to the loaded range
    pub fn closest_item_to_position(&self, position: usize) -> Option<&CachedTitle> {
        let count = self.item_count();
        if count == 0 {
            return None;
        }
        self.pages
            .iter()
            .flat_map(|p| p.items.iter())
            .nth(position.min(count - 1))
    }

    /// Item closest to the anchor, if there is an anchor
    pub fn anchor_item(&self) -> Option<&CachedTitle> {
        self.anchor_position
            .and_then(|position| self.closest_item_to_position(position))
    }

    /// First row of the first non-empty page
    pub fn first_item(&self) -> Option<&CachedTitle> {
        self.pages
            .iter()
            .find(|p| !p.items.is_empty())
            .and_then(|p| p.items.first())
    }

    /// Last row of the last non-empty page
    pub fn last_item(&self) -> Option<&CachedTitle> {
        self.pages
            .iter()
            .rev()
            .find(|p| !p.items.is_empty())
            .and_then(|p| p.items.last())
    }
}
