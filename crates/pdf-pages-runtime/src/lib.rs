//! Message types and the worker task that drives a [`PageWorkspace`]
//! from a front end.
//!
//! The front end sends [`PageCommand`]s and renders the [`PageUpdate`]s it
//! gets back. The worker handles commands one at a time, so commits are
//! applied in arrival order.

mod worker;

use std::path::PathBuf;

// Re-export types from the library crate
pub use pdf_pages::{
    Annotation, DropIndicator, ExportOptions, Notice, Page, PageId, PageSize, PageWorkspace,
    Quality, Rect, SelectionMode,
};
pub use worker::worker_task;

/// Commands sent from the front end to the worker
#[derive(Debug)]
pub enum PageCommand {
    ImportFiles {
        paths: Vec<PathBuf>,
    },
    ImportBytes {
        name: String,
        bytes: Vec<u8>,
    },
    ToggleSelect {
        id: PageId,
    },
    SelectAll,
    ClearSelection,
    DragStart {
        id: PageId,
    },
    /// Hovering during a drag; queued hovers collapse into the latest one
    DragOver {
        target: Option<PageId>,
    },
    DragEnd {
        target: Option<PageId>,
    },
    DragCancel,
    Reorder {
        old_index: usize,
        new_index: usize,
    },
    DeleteSelected,
    Restore {
        id: PageId,
    },
    Purge {
        id: PageId,
    },
    EmptyTrash,
    Rotate {
        id: PageId,
        degrees: i32,
    },
    Resize {
        id: PageId,
        size: PageSize,
    },
    ResizeAll {
        mode: SelectionMode,
    },
    Crop {
        id: PageId,
        rect: Rect,
    },
    Annotate {
        id: PageId,
        annotations: Vec<Annotation>,
    },
    Undo,
    Redo,
    Export {
        mode: SelectionMode,
        options: ExportOptions,
        dir: PathBuf,
    },
}

/// Updates sent from the worker to the front end
#[derive(Debug, Clone)]
pub enum PageUpdate {
    PagesChanged {
        active: Vec<PageSummary>,
        trash: Vec<PageSummary>,
        can_undo: bool,
        can_redo: bool,
    },
    DropIndicator {
        indicator: Option<DropIndicator>,
    },
    Exported {
        path: PathBuf,
        page_count: usize,
    },
    Notice(Notice),
}

/// What a front end needs to draw one page tile
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    pub id: PageId,
    pub number: usize,
    pub rotation: u16,
    /// Registry id of the page's thumbnail handle
    pub thumbnail: u64,
    pub selected: bool,
}

impl PageSummary {
    pub fn new(page: &Page, selected: bool) -> Self {
        Self {
            id: page.id.clone(),
            number: page.number,
            rotation: page.rotation,
            thumbnail: page.thumbnail.id(),
            selected,
        }
    }
}
