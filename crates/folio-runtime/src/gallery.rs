#![forbid(unsafe_code)]

//! Portfolio grid filtering and lightbox state.

use folio_core::content::{ALL_CATEGORIES, PORTFOLIO, PortfolioItem, categories};
use serde::Serialize;
use tracing::trace;

/// Keys the lightbox responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryKey {
    Escape,
    ArrowLeft,
    ArrowRight,
}

impl GalleryKey {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Escape" | "Esc" => Some(Self::Escape),
            "ArrowLeft" => Some(Self::ArrowLeft),
            "ArrowRight" => Some(Self::ArrowRight),
            _ => None,
        }
    }
}

/// Serializable view of the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryView {
    pub filter: &'static str,
    pub categories: Vec<&'static str>,
    pub visible: Vec<u32>,
    pub lightbox: Option<u32>,
}

/// Category filter plus an optional open lightbox.
///
/// The lightbox only ever shows an item that passes the current filter.
#[derive(Debug, Clone)]
pub struct PortfolioGallery {
    items: &'static [PortfolioItem],
    categories: Vec<&'static str>,
    filter: &'static str,
    selected: Option<u32>,
}

impl Default for PortfolioGallery {
    fn default() -> Self {
        Self::new(&PORTFOLIO)
    }
}

impl PortfolioGallery {
    #[must_use]
    pub fn new(items: &'static [PortfolioItem]) -> Self {
        Self {
            items,
            categories: categories(items),
            filter: ALL_CATEGORIES,
            selected: None,
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[&'static str] {
        &self.categories
    }

    #[must_use]
    pub fn filter(&self) -> &'static str {
        self.filter
    }

    /// Select a filter chip. Unknown categories are rejected. Closes the
    /// lightbox if its item is filtered out.
    pub fn set_filter(&mut self, category: &str) -> bool {
        let Some(&chip) = self.categories.iter().find(|c| **c == category) else {
            return false;
        };
        self.filter = chip;
        if let Some(id) = self.selected {
            if !self.filtered().iter().any(|it| it.id == id) {
                trace!(id, "lightbox item filtered out");
                self.selected = None;
            }
        }
        true
    }

    /// Items passing the filter, in catalog order.
    #[must_use]
    pub fn filtered(&self) -> Vec<&'static PortfolioItem> {
        self.items
            .iter()
            .filter(|it| self.filter == ALL_CATEGORIES || it.category == self.filter)
            .collect()
    }

    /// Open the lightbox on a visible item.
    pub fn open(&mut self, id: u32) -> bool {
        if self.filtered().iter().any(|it| it.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    /// Close the lightbox. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        self.selected.take().is_some()
    }

    #[must_use]
    pub fn selected(&self) -> Option<&'static PortfolioItem> {
        let id = self.selected?;
        self.items.iter().find(|it| it.id == id)
    }

    /// Step to the next visible item. Stops at the last one.
    pub fn next(&mut self) -> bool {
        self.step(1)
    }

    /// Step to the previous visible item. Stops at the first one.
    pub fn prev(&mut self) -> bool {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> bool {
        let Some(id) = self.selected else {
            return false;
        };
        let visible = self.filtered();
        let Some(pos) = visible.iter().position(|it| it.id == id) else {
            return false;
        };
        let Some(item) = pos
            .checked_add_signed(delta)
            .and_then(|next| visible.get(next))
        else {
            return false;
        };
        self.selected = Some(item.id);
        true
    }

    /// Handle a key while the lightbox is open. Returns whether it was used.
    pub fn handle_key(&mut self, key: GalleryKey) -> bool {
        if self.selected.is_none() {
            return false;
        }
        match key {
            GalleryKey::Escape => self.close(),
            GalleryKey::ArrowLeft => self.prev(),
            GalleryKey::ArrowRight => self.next(),
        }
    }

    /// Page scrolling is locked while the lightbox is open.
    #[must_use]
    pub fn body_scroll_locked(&self) -> bool {
        self.selected.is_some()
    }

    #[must_use]
    pub fn view(&self) -> GalleryView {
        GalleryView {
            filter: self.filter,
            categories: self.categories.clone(),
            visible: self.filtered().iter().map(|it| it.id).collect(),
            lightbox: self.selected,
        }
    }
}
