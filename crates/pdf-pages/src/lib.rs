//! Page-level PDF workspace: split documents into pages, rearrange them,
//! transform them and merge a subset back into a single document.

mod constants;
mod export;
mod geometry;
mod history;
mod import;
mod notice;
mod options;
mod page;
pub mod pdf;
mod reorder;
mod repository;
mod script;
mod selection;
mod thumbnail;
pub mod transform;
mod types;
mod workspace;

pub use constants::{DEFAULT_EXPORT_FILENAME, FALLBACK_EXPORT_FILENAME};
pub use export::{export_pages, save_export, select_pages};
pub use geometry::{PageSize, Point, Rect};
pub use history::History;
pub use import::{import_bytes, import_file, is_pdf};
pub use notice::{Notice, NoticeLog};
pub use options::*;
pub use page::{Page, PageId};
pub use pdf::{Annotation, AnnotationKind, Color};
pub use reorder::{DragState, DropIndicator, DropPosition, Move, ReorderController};
pub use repository::PageRepository;
pub use script::{EditScript, EditStep, PageRef, StepOutcome};
pub use selection::Selection;
pub use thumbnail::{Thumbnail, ThumbnailRegistry};
pub use types::*;
pub use workspace::{PageWorkspace, TransformTicket};
