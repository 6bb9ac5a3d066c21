//! The page workspace
//!
//! Owns the repository, its history, the selection, the drag controller
//! and the thumbnail registry, and is the only place that commits changes.
//! Every change of the active collection either pushes a snapshot or
//! applies one from undo/redo; both prune the selection afterwards.

use crate::export::{export_pages, save_export, select_pages};
use crate::geometry::{PageSize, Rect};
use crate::history::History;
use crate::import;
use crate::notice::NoticeLog;
use crate::options::{ExportOptions, SelectionMode};
use crate::page::{Page, PageId};
use crate::pdf::Annotation;
use crate::reorder::{DragState, DropIndicator, ReorderController};
use crate::repository::PageRepository;
use crate::selection::Selection;
use crate::thumbnail::ThumbnailRegistry;
use crate::transform;
use crate::types::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Pages checked out for a transform.
///
/// While a ticket is alive no other transform may check out the same ids.
/// Hand it back with [`PageWorkspace::commit`] or [`PageWorkspace::abandon`].
#[derive(Debug)]
#[must_use = "a transform ticket must be committed or abandoned"]
pub struct TransformTicket {
    pages: Vec<Page>,
}

impl TransformTicket {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn ids(&self) -> impl Iterator<Item = &PageId> {
        self.pages.iter().map(|page| &page.id)
    }
}

#[derive(Debug, Default)]
pub struct PageWorkspace {
    repository: PageRepository,
    history: History<Vec<Page>>,
    selection: Selection,
    reorder: ReorderController,
    thumbnails: ThumbnailRegistry,
    notices: NoticeLog,
    in_flight: HashSet<PageId>,
    next_batch: u64,
    revision: u64,
}

impl PageWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn pages(&self) -> &[Page] {
        self.repository.active()
    }

    pub fn trash(&self) -> &[Page] {
        self.repository.trash()
    }

    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.repository.get(id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn drag_state(&self) -> &DragState {
        self.reorder.state()
    }

    pub fn thumbnails(&self) -> &ThumbnailRegistry {
        &self.thumbnails
    }

    pub fn notices(&self) -> &NoticeLog {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut NoticeLog {
        &mut self.notices
    }

    pub fn history(&self) -> &History<Vec<Page>> {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Incremented on every change of the active collection, the trash or
    /// the selection.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_in_flight(&self, id: &PageId) -> bool {
        self.in_flight.contains(id)
    }

    // =========================================================================
    // Import
    // =========================================================================

    /// Append already-built pages. Returns the number added.
    pub fn add(&mut self, pages: Vec<Page>) -> usize {
        let added = self.repository.add(pages);
        if added > 0 {
            self.commit_change();
        }
        added
    }

    /// Import every file in order. Rejected or unreadable files produce a
    /// notice and do not stop the remaining ones.
    pub async fn import_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> usize {
        let mut total = 0;
        for path in paths {
            let path = path.as_ref();
            let batch = self.take_batch();
            let result = import::import_file(path, batch, &self.thumbnails).await;
            total += self.finish_import(&path.display().to_string(), result);
        }
        total
    }

    /// Import one in-memory file. Returns the number of pages added.
    pub async fn import_bytes(&mut self, name: &str, bytes: Vec<u8>) -> usize {
        let batch = self.take_batch();
        let result = import::import_bytes(name, bytes, batch, &self.thumbnails).await;
        self.finish_import(name, result)
    }

    fn take_batch(&mut self) -> u64 {
        let batch = self.next_batch;
        self.next_batch += 1;
        batch
    }

    fn finish_import(&mut self, name: &str, result: Result<Vec<Page>>) -> usize {
        match result {
            Ok(pages) => {
                let added = self.add(pages);
                self.notices
                    .info(format!("Imported {} pages from {}", added, name));
                added
            }
            Err(PagesError::NotPdf { name }) => {
                self.notices
                    .warn(format!("{} is not a PDF file and was skipped", name));
                0
            }
            Err(e) => {
                self.notices.error(format!("Failed to import {}: {}", name, e));
                0
            }
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Flip selection of an active page. Returns whether it is now selected.
    pub fn toggle_select(&mut self, id: &PageId) -> bool {
        if self.repository.get(id).is_none() {
            return false;
        }
        self.revision += 1;
        self.selection.toggle(id)
    }

    pub fn select(&mut self, id: &PageId) -> bool {
        if self.repository.get(id).is_none() || self.selection.contains(id) {
            return false;
        }
        self.selection.insert(id.clone());
        self.revision += 1;
        true
    }

    pub fn select_all(&mut self) {
        self.selection = self.pages().iter().map(|page| page.id.clone()).collect();
        self.revision += 1;
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.revision += 1;
        }
    }

    // =========================================================================
    // Reordering
    // =========================================================================

    /// Array-move within the active collection.
    pub fn reorder(&mut self, old_index: usize, new_index: usize) -> bool {
        if !self.repository.reorder(old_index, new_index) {
            return false;
        }
        self.commit_change();
        true
    }

    pub fn drag_start(&mut self, id: &PageId) -> bool {
        self.reorder.start(id, self.repository.active())
    }

    pub fn drag_over(&mut self, target: Option<&PageId>) -> Option<DropIndicator> {
        self.reorder
            .over(target, self.repository.active())
            .cloned()
    }

    /// Drop onto `target`. Returns whether the collection changed.
    pub fn drag_end(&mut self, target: Option<&PageId>) -> bool {
        match self.reorder.end(target, self.repository.active()) {
            Some(step) => self.reorder(step.old_index, step.new_index),
            None => false,
        }
    }

    pub fn drag_cancel(&mut self) {
        self.reorder.cancel();
    }

    // =========================================================================
    // Trash
    // =========================================================================

    pub fn delete_selected(&mut self) -> usize {
        let selected = self.selection.clone();
        self.move_to_trash(&selected)
    }

    pub fn move_to_trash(&mut self, ids: &Selection) -> usize {
        let moved = self.repository.move_to_trash(ids);
        if moved > 0 {
            self.commit_change();
            self.notices
                .info(format!("{} pages moved to trash", moved));
        }
        moved
    }

    /// Put a trashed page back at the end of the active collection.
    pub fn restore(&mut self, id: &PageId) -> bool {
        if !self.repository.restore(id) {
            log::debug!("Restore of {} ignored: not in trash", id);
            return false;
        }
        self.commit_change();
        self.notices.info(format!("Page {} restored", id));
        true
    }

    /// Delete a trashed page for good.
    ///
    /// The page is also scrubbed from every history snapshot so neither undo
    /// nor redo can bring it back, and its thumbnail is released once the
    /// returned record (if kept) is dropped.
    pub fn purge(&mut self, id: &PageId) -> bool {
        if self.repository.purge(id).is_none() {
            log::debug!("Purge of {} ignored: not in trash", id);
            return false;
        }
        self.history
            .rewrite(|snapshot| snapshot.retain(|page| &page.id != id));
        self.revision += 1;
        self.notices.info(format!("Page {} permanently deleted", id));
        true
    }

    pub fn empty_trash(&mut self) -> usize {
        let ids: Vec<PageId> = self.trash().iter().map(|page| page.id.clone()).collect();
        ids.iter().filter(|id| self.purge(id)).count()
    }

    // =========================================================================
    // History
    // =========================================================================

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            None => false,
        }
    }

    fn commit_change(&mut self) {
        self.history.push(self.repository.active().to_vec());
        self.after_change();
    }

    fn apply_snapshot(&mut self, snapshot: Vec<Page>) {
        self.repository.set_active(snapshot);
        self.after_change();
    }

    fn after_change(&mut self) {
        self.selection.retain_existing(self.repository.active());
        let dragged_page_gone = self
            .reorder
            .active()
            .is_some_and(|active| self.repository.get(active).is_none());
        if dragged_page_gone {
            self.reorder.cancel();
        }
        self.revision += 1;
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    /// Reserve pages for a transform. Fails with `Busy` if any of them is
    /// already checked out, or `PageNotFound` if one is not active.
    pub fn checkout(&mut self, ids: &[PageId]) -> Result<TransformTicket> {
        let mut pages = Vec::with_capacity(ids.len());
        for id in ids {
            if self.in_flight.contains(id) {
                return Err(PagesError::Busy(id.clone()));
            }
            let page = self
                .repository
                .get(id)
                .ok_or_else(|| PagesError::PageNotFound(id.clone()))?;
            pages.push(page.clone());
        }
        if pages.is_empty() {
            return Err(PagesError::NoPages);
        }

        self.in_flight
            .extend(pages.iter().map(|page| page.id.clone()));
        Ok(TransformTicket { pages })
    }

    /// Commit transformed pages as one history step. Pages that left the
    /// active collection while the transform ran are dropped. Returns the
    /// number of pages replaced.
    pub fn commit(&mut self, ticket: TransformTicket, pages: Vec<Page>) -> usize {
        self.release(&ticket);
        let replaced = pages
            .into_iter()
            .filter(|page| ticket.pages.iter().any(|held| held.id == page.id))
            .map(|page| self.repository.replace_at(page))
            .filter(|replaced| *replaced)
            .count();
        if replaced > 0 {
            self.commit_change();
        }
        replaced
    }

    /// Give a ticket back without changing anything.
    pub fn abandon(&mut self, ticket: TransformTicket) {
        self.release(&ticket);
    }

    fn release(&mut self, ticket: &TransformTicket) {
        for id in ticket.ids() {
            self.in_flight.remove(id);
        }
    }

    /// Check out, run the transform, then commit or abandon. Pages that are
    /// not active are a silent no-op (`Ok(false)`).
    async fn run_transform<F, Fut>(
        &mut self,
        ids: &[PageId],
        label: &str,
        transform: F,
    ) -> Result<bool>
    where
        F: FnOnce(Vec<Page>, ThumbnailRegistry) -> Fut,
        Fut: Future<Output = Result<Vec<Page>>>,
    {
        let ticket = match self.checkout(ids) {
            Ok(ticket) => ticket,
            Err(PagesError::PageNotFound(id)) => {
                log::debug!("{} of {} ignored: page is not active", label, id);
                return Ok(false);
            }
            Err(e) => {
                self.notices.warn(format!("{} skipped: {}", label, e));
                return Err(e);
            }
        };

        let result = transform(ticket.pages.clone(), self.thumbnails.clone()).await;
        match result {
            Ok(pages) => {
                let replaced = self.commit(ticket, pages);
                self.notices
                    .info(format!("{} applied to {} pages", label, replaced));
                Ok(replaced > 0)
            }
            Err(e) => {
                self.abandon(ticket);
                self.notices.error(format!("{} failed: {}", label, e));
                Err(e)
            }
        }
    }

    pub async fn rotate(&mut self, id: &PageId, degrees: i32) -> Result<bool> {
        self.run_transform(
            std::slice::from_ref(id),
            "Rotation",
            |pages, thumbnails| async move {
                let mut rotated = Vec::with_capacity(pages.len());
                for page in &pages {
                    rotated.push(transform::rotate(page, degrees, &thumbnails).await?);
                }
                Ok(rotated)
            },
        )
        .await
    }

    pub async fn resize(&mut self, id: &PageId, reference: PageSize) -> Result<bool> {
        self.run_transform(
            std::slice::from_ref(id),
            "Resize",
            |pages, thumbnails| async move {
                let mut resized = Vec::with_capacity(pages.len());
                for page in &pages {
                    resized.push(transform::resize_to_reference(page, reference, &thumbnails).await?);
                }
                Ok(resized)
            },
        )
        .await
    }

    /// Resize every page of `mode` to the first of them.
    pub async fn resize_all(&mut self, mode: SelectionMode) -> Result<bool> {
        let ids: Vec<PageId> = select_pages(self.pages(), mode, &self.selection)
            .into_iter()
            .map(|page| page.id.clone())
            .collect();
        if ids.len() < 2 {
            log::debug!("Resize all ignored: fewer than two pages");
            return Ok(false);
        }

        self.run_transform(&ids, "Resize all", |pages, thumbnails| async move {
            transform::resize_all_to_first(&pages, &thumbnails).await
        })
        .await
    }

    pub async fn crop(&mut self, id: &PageId, rect: Rect) -> Result<bool> {
        self.run_transform(
            std::slice::from_ref(id),
            "Crop",
            |pages, thumbnails| async move {
                let mut cropped = Vec::with_capacity(pages.len());
                for page in &pages {
                    cropped.push(transform::crop_to(page, rect, &thumbnails).await?);
                }
                Ok(cropped)
            },
        )
        .await
    }

    pub async fn annotate(&mut self, id: &PageId, annotations: &[Annotation]) -> Result<bool> {
        let annotations = annotations.to_vec();
        self.run_transform(
            std::slice::from_ref(id),
            "Annotation",
            |pages, thumbnails| async move {
                let mut annotated = Vec::with_capacity(pages.len());
                for page in &pages {
                    annotated.push(transform::annotate(page, &annotations, &thumbnails).await?);
                }
                Ok(annotated)
            },
        )
        .await
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Merge the pages of `mode` into one document.
    pub async fn export(&mut self, mode: SelectionMode, options: &ExportOptions) -> Result<Vec<u8>> {
        let pages = select_pages(self.repository.active(), mode, &self.selection);
        let result = export_pages(pages, options).await;
        match result {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                self.notices.error(format!("Export failed: {}", e));
                Err(e)
            }
        }
    }

    /// Export and write the result into `dir`. Returns the written path
    /// and the number of pages exported.
    pub async fn export_to(
        &mut self,
        mode: SelectionMode,
        options: &ExportOptions,
        dir: impl AsRef<Path>,
    ) -> Result<(PathBuf, usize)> {
        let page_count = select_pages(self.repository.active(), mode, &self.selection).len();
        let bytes = self.export(mode, options).await?;

        match save_export(&bytes, dir, options).await {
            Ok(path) => {
                self.notices.info(format!(
                    "Exported {} pages to {}",
                    page_count,
                    path.display()
                ));
                Ok((path, page_count))
            }
            Err(e) => {
                self.notices.error(format!("Export failed: {}", e));
                Err(e)
            }
        }
    }
}
