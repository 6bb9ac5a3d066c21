//! PDF object-model operations
//!
//! Everything that touches lopdf lives here:
//! - Deep copying pages between documents
//! - Splitting a document into single-page documents and merging them back
//! - Rebuilding a page as a Form XObject for resize, crop and annotation
//! - Rendering annotations to content stream operators
//!
//! All functions are synchronous; callers move them off the async
//! executor with `spawn_blocking`.

mod annotate;
mod copy;
mod document;
mod rebuild;

pub use annotate::{Annotation, AnnotationKind, AnnotationOverlay, Color, render_annotations};
pub use copy::{copy_object_deep, copy_page};
pub use document::{
    SplitPage, first_page_id, load_document, merge_pages, page_size, save_document, split_pages,
    visible_box,
};
pub use rebuild::{annotate_page, crop_page, resize_page, rotate_page};

pub(crate) use document::normalize_rotation;
