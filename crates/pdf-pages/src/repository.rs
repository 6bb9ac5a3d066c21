//! Active page collection and its trash.
//!
//! The repository only moves records around. Recording history snapshots
//! after each change is the workspace's job.

use crate::page::{Page, PageId};
use crate::selection::Selection;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct PageRepository {
    active: Vec<Page>,
    trash: Vec<Page>,
    /// Active pages a snapshot pulled out of the trash. They go back to the
    /// trash when a later snapshot drops them again.
    recovered: HashSet<PageId>,
}

impl PageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &[Page] {
        &self.active
    }

    pub fn trash(&self) -> &[Page] {
        &self.trash
    }

    pub fn get(&self, id: &PageId) -> Option<&Page> {
        self.active.iter().find(|page| &page.id == id)
    }

    pub fn position(&self, id: &PageId) -> Option<usize> {
        self.active.iter().position(|page| &page.id == id)
    }

    pub fn in_trash(&self, id: &PageId) -> bool {
        self.trash.iter().any(|page| &page.id == id)
    }

    /// Append pages in input order. Pages whose id is already known
    /// (active or trashed) are skipped. Returns the number appended.
    pub fn add(&mut self, pages: Vec<Page>) -> usize {
        let mut added = 0;
        for page in pages {
            if self.get(&page.id).is_some() || self.in_trash(&page.id) {
                log::warn!("Skipping page {}: id already in use", page.id);
                continue;
            }
            self.active.push(page);
            added += 1;
        }
        added
    }

    /// Swap in a new revision of a page at its current index.
    /// Returns `false` (and changes nothing) if the id is not active.
    pub fn replace_at(&mut self, page: Page) -> bool {
        match self.position(&page.id) {
            Some(index) => {
                self.active[index] = page;
                true
            }
            None => false,
        }
    }

    /// Array-move: remove at `old_index`, insert at `new_index`.
    pub fn reorder(&mut self, old_index: usize, new_index: usize) -> bool {
        let len = self.active.len();
        if old_index == new_index || old_index >= len || new_index >= len {
            return false;
        }
        let page = self.active.remove(old_index);
        self.active.insert(new_index, page);
        true
    }

    /// Move every active page in `ids` to the end of the trash, keeping
    /// relative order on both sides. Returns the number moved.
    pub fn move_to_trash(&mut self, ids: &Selection) -> usize {
        let (removed, kept): (Vec<Page>, Vec<Page>) = std::mem::take(&mut self.active)
            .into_iter()
            .partition(|page| ids.contains(&page.id));
        self.active = kept;
        for page in &removed {
            self.recovered.remove(&page.id);
        }
        let moved = removed.len();
        self.trash.extend(removed);
        moved
    }

    /// Move a trashed page back to the end of the active collection.
    pub fn restore(&mut self, id: &PageId) -> bool {
        match self.trash.iter().position(|page| &page.id == id) {
            Some(index) => {
                let page = self.trash.remove(index);
                self.active.push(page);
                true
            }
            None => false,
        }
    }

    /// Remove a page from the trash for good.
    pub fn purge(&mut self, id: &PageId) -> Option<Page> {
        let index = self.trash.iter().position(|page| &page.id == id)?;
        Some(self.trash.remove(index))
    }

    /// Replace the active collection with a history snapshot.
    ///
    /// Pages that come back from the snapshot leave the trash. If a later
    /// snapshot drops them from the active collection again they return to
    /// the end of the trash, so undo/redo never loses a trashed page.
    pub fn set_active(&mut self, pages: Vec<Page>) {
        let in_snapshot = |id: &PageId| pages.iter().any(|page| &page.id == id);

        let (recovered, trash): (Vec<Page>, Vec<Page>) = std::mem::take(&mut self.trash)
            .into_iter()
            .partition(|trashed| in_snapshot(&trashed.id));
        self.trash = trash;
        self.recovered
            .extend(recovered.into_iter().map(|page| page.id));

        for page in std::mem::take(&mut self.active) {
            if !in_snapshot(&page.id) && self.recovered.remove(&page.id) {
                self.trash.push(page);
            }
        }
        self.active = pages;
    }
}
