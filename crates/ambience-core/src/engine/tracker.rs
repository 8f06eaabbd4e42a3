//! Page activity tracking
//!
//! The active page set is in-memory state owned by one process incarnation.
//! A copy is mirrored into the settings store for display, but the mirror is
//! never read back: page handles from an earlier incarnation are garbage.

use crate::config::{ConfigStore, Setting};
use crate::types::PageId;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Edge produced by a membership change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Membership changed (or didn't) without crossing empty/non-empty
    Unchanged,
    /// The set went from empty to non-empty
    BecameActive,
    /// The set went from non-empty to empty
    BecameIdle,
}

/// Set of pages currently believed to be qualifying and open
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivePageSet {
    pages: BTreeSet<PageId>,
}

impl ActivePageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a page; no-op if already present
    pub fn qualify(&mut self, page: PageId) -> Transition {
        let was_empty = self.pages.is_empty();
        if self.pages.insert(page) && was_empty {
            Transition::BecameActive
        } else {
            Transition::Unchanged
        }
    }

    /// Remove a page; no-op if absent
    pub fn close(&mut self, page: PageId) -> Transition {
        if self.pages.remove(&page) && self.pages.is_empty() {
            Transition::BecameIdle
        } else {
            Transition::Unchanged
        }
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Members in ascending handle order
    pub fn to_vec(&self) -> Vec<PageId> {
        self.pages.iter().copied().collect()
    }
}

/// Active page set plus its advisory mirror in the settings store
pub struct PageActivityTracker {
    set: ActivePageSet,
    store: Arc<dyn ConfigStore>,
}

impl PageActivityTracker {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            set: ActivePageSet::new(),
            store,
        }
    }

    pub fn on_page_qualified(&mut self, page: PageId) -> Transition {
        let before = self.set.len();
        let transition = self.set.qualify(page);
        if self.set.len() != before {
            log::debug!("{} qualified ({} active)", page, self.set.len());
            self.persist();
        }
        transition
    }

    pub fn on_page_closed(&mut self, page: PageId) -> Transition {
        let before = self.set.len();
        let transition = self.set.close(page);
        if self.set.len() != before {
            log::debug!("{} closed ({} active)", page, self.set.len());
            self.persist();
        }
        transition
    }

    /// Discard all membership, including the persisted mirror
    pub fn reset(&mut self) {
        self.set.clear();
        self.persist();
    }

    pub fn set(&self) -> &ActivePageSet {
        &self.set
    }

    pub fn active_count(&self) -> usize {
        self.set.len()
    }

    fn persist(&self) {
        if let Err(e) = self.store.write(&[Setting::ActivePages(self.set.to_vec())]) {
            log::warn!("Failed to mirror active pages to settings: {}", e);
        }
    }
}
