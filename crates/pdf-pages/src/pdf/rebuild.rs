//! Single-page transforms
//!
//! Rotation only rewrites `/Rotate`. Resize, crop and annotation rebuild
//! the page: the old content becomes a Form XObject which is placed on a
//! fresh page with a transformation matrix, optionally followed by
//! annotation operators.

use super::annotate::{Annotation, AnnotationOverlay, render_annotations};
use super::copy::{copy_object_deep, inherited_attribute};
use super::document::{
    finish_page_tree, first_page_id, load_document, page_rotation, save_document, visible_box,
};
use crate::constants::{HIGHLIGHT_ALPHA, OUTPUT_PDF_VERSION};
use crate::geometry::{PageSize, Rect};
use crate::options::Quality;
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Resource name of the wrapped source page
const PAGE_XOBJECT_NAME: &str = "P0";

/// Resource name of the annotation font
pub(crate) const ANNOTATION_FONT_NAME: &str = "FA";

/// Resource name of the highlight transparency state
pub(crate) const HIGHLIGHT_GS_NAME: &str = "GA";

/// Uniform scale plus translation, emitted as a `cm` operator
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    scale: f32,
    tx: f32,
    ty: f32,
}

impl Placement {
    fn translate(tx: f32, ty: f32) -> Self {
        Self { scale: 1.0, tx, ty }
    }

    fn command(&self) -> String {
        format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            self.scale, self.scale, self.tx, self.ty, PAGE_XOBJECT_NAME
        )
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Set the page's `/Rotate` to `rotation` (already normalised).
pub fn rotate_page(bytes: &[u8], rotation: u16) -> Result<Vec<u8>> {
    let mut doc = load_document(bytes)?;
    let page_id = first_page_id(&doc)?;
    doc.get_object_mut(page_id)?
        .as_dict_mut()?
        .set("Rotate", Object::Integer(rotation as i64));
    save_document(&mut doc, Quality::High)
}

/// Scale the page uniformly to fit `target` and center it there.
pub fn resize_page(bytes: &[u8], target: PageSize) -> Result<Vec<u8>> {
    let source = load_document(bytes)?;
    let page_id = first_page_id(&source)?;
    let visible = visible_box(&source, page_id);

    let scale = PageSize::new(visible.width, visible.height).fit_scale(&target);
    let placement = Placement {
        scale,
        tx: (target.width - visible.width * scale) / 2.0 - visible.x * scale,
        ty: (target.height - visible.height * scale) / 2.0 - visible.y * scale,
    };

    rebuild(&source, page_id, target, placement, None)
}

/// Keep only `rect` (relative to the visible lower-left corner). The
/// result's media box is `[0 0 width height]`.
pub fn crop_page(bytes: &[u8], rect: Rect) -> Result<Vec<u8>> {
    let source = load_document(bytes)?;
    let page_id = first_page_id(&source)?;
    let visible = visible_box(&source, page_id);

    let rect = rect.crop_within(&PageSize::new(visible.width, visible.height));
    let placement = Placement::translate(-(visible.x + rect.x), -(visible.y + rect.y));

    rebuild(
        &source,
        page_id,
        PageSize::new(rect.width, rect.height),
        placement,
        None,
    )
}

/// Burn annotations into the page. Coordinates are relative to the
/// visible lower-left corner.
pub fn annotate_page(bytes: &[u8], annotations: &[Annotation]) -> Result<Vec<u8>> {
    let source = load_document(bytes)?;
    let page_id = first_page_id(&source)?;
    let visible = visible_box(&source, page_id);

    let overlay = render_annotations(annotations);
    rebuild(
        &source,
        page_id,
        PageSize::new(visible.width, visible.height),
        Placement::translate(-visible.x, -visible.y),
        Some(&overlay),
    )
}

// =============================================================================
// Page Rebuilding
// =============================================================================

fn rebuild(
    source: &Document,
    page_id: ObjectId,
    size: PageSize,
    placement: Placement,
    overlay: Option<&AnnotationOverlay>,
) -> Result<Vec<u8>> {
    let mut output = Document::with_version(OUTPUT_PDF_VERSION);
    let pages_id = output.new_object_id();
    let mut cache = HashMap::new();

    let xobject_id = create_page_xobject(&mut output, source, page_id, &mut cache)?;

    let mut xobjects = Dictionary::new();
    xobjects.set(PAGE_XOBJECT_NAME, Object::Reference(xobject_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut content = placement.command();
    if let Some(overlay) = overlay {
        content.push_str(&overlay.ops);
        add_overlay_resources(&mut output, &mut resources, overlay);
    }
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(size.width),
            Object::Real(size.height),
        ]),
    );
    let rotation = page_rotation(source, page_id);
    if rotation != 0 {
        page_dict.set("Rotate", Object::Integer(rotation as i64));
    }
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    let new_page_id = output.add_object(page_dict);
    finish_page_tree(&mut output, pages_id, &[new_page_id]);

    save_document(&mut output, Quality::High)
}

fn add_overlay_resources(
    output: &mut Document,
    resources: &mut Dictionary,
    overlay: &AnnotationOverlay,
) {
    if overlay.uses_font {
        let font_id = output.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(b"Helvetica".to_vec())),
            ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
        ]));
        let mut fonts = Dictionary::new();
        fonts.set(ANNOTATION_FONT_NAME, Object::Reference(font_id));
        resources.set("Font", Object::Dictionary(fonts));
    }

    if overlay.uses_transparency {
        let gs = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"ExtGState".to_vec())),
            ("ca", Object::Real(HIGHLIGHT_ALPHA)),
            ("CA", Object::Real(HIGHLIGHT_ALPHA)),
        ]);
        let mut states = Dictionary::new();
        states.set(HIGHLIGHT_GS_NAME, Object::Dictionary(gs));
        resources.set("ExtGState", Object::Dictionary(states));
    }
}

// =============================================================================
// XObject Creation
// =============================================================================

/// Create a Form XObject from a source page, clipped to its visible box.
fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;
    let visible = visible_box(source, page_id);
    let content_data = get_page_content(source, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set(
        "BBox",
        Object::Array(vec![
            Object::Real(visible.x),
            Object::Real(visible.y),
            Object::Real(visible.right()),
            Object::Real(visible.top()),
        ]),
    );
    xobject_dict.set("FormType", Object::Integer(1));

    if let Some(resources) = inherited_attribute(source, page_id, b"Resources") {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, source, resources, cache)?,
        );
    }

    Ok(output.add_object(Stream::new(xobject_dict, content_data)))
}

/// Get the content stream data from a page.
fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(refs) => get_concatenated_content_streams(doc, refs),
            other => Ok(stream_content(other)),
        },
        Object::Array(refs) => get_concatenated_content_streams(doc, refs),
        _ => Ok(Vec::new()),
    }
}

/// Concatenate multiple content streams
fn get_concatenated_content_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();

    for obj in refs {
        if let Object::Reference(id) = obj {
            result.extend_from_slice(&stream_content(doc.get_object(*id)?));
            result.push(b'\n');
        }
    }

    Ok(result)
}

fn stream_content(obj: &Object) -> Vec<u8> {
    match obj.as_stream() {
        Ok(stream) => stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone()),
        Err(_) => Vec::new(),
    }
}
