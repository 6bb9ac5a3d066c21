use crate::page::{Page, PageId};
use std::collections::BTreeSet;

/// Ids of the pages the user has selected. View-only: it never owns pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: BTreeSet<PageId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: &PageId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    pub fn insert(&mut self, id: PageId) {
        self.ids.insert(id);
    }

    pub fn remove(&mut self, id: &PageId) -> bool {
        self.ids.remove(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &PageId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageId> {
        self.ids.iter()
    }

    /// Drop ids whose page is no longer in `active`.
    pub fn retain_existing(&mut self, active: &[Page]) {
        self.ids
            .retain(|id| active.iter().any(|page| &page.id == id));
    }
}

impl FromIterator<PageId> for Selection {
    fn from_iter<I: IntoIterator<Item = PageId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
