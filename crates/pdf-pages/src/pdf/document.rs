//! Whole-document operations: load, split, merge, save

use super::copy::{copy_page, inherited_attribute};
use crate::constants::{DEFAULT_PAGE_DIMENSIONS, OUTPUT_PDF_VERSION, ROTATION_STEP};
use crate::geometry::{PageSize, Rect};
use crate::options::Quality;
use crate::types::{PagesError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};

/// One page cut out of a source document
#[derive(Debug, Clone)]
pub struct SplitPage {
    /// Complete single-page PDF
    pub data: Vec<u8>,
    /// `/Rotate` of the source page, normalised to `0..360`
    pub rotation: u16,
}

pub fn load_document(bytes: &[u8]) -> Result<Document> {
    Ok(Document::load_mem(bytes)?)
}

/// Serialise a document, applying the save parameters of a quality tier.
pub fn save_document(doc: &mut Document, quality: Quality) -> Result<Vec<u8>> {
    match quality {
        Quality::Low => {
            doc.prune_objects();
            doc.compress();
        }
        Quality::Medium => doc.compress(),
        Quality::High => {}
    }

    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    Ok(writer)
}

pub fn first_page_id(doc: &Document) -> Result<ObjectId> {
    doc.get_pages()
        .values()
        .next()
        .copied()
        .ok_or(PagesError::NoPages)
}

/// Cut a document into one single-page document per page, in page order.
pub fn split_pages(bytes: &[u8]) -> Result<Vec<SplitPage>> {
    let source = load_document(bytes)?;
    let page_ids: Vec<ObjectId> = source.get_pages().values().copied().collect();
    if page_ids.is_empty() {
        return Err(PagesError::NoPages);
    }

    page_ids
        .into_iter()
        .map(|page_id| {
            let mut output = Document::with_version(OUTPUT_PDF_VERSION);
            let pages_id = output.new_object_id();
            let new_page_id = copy_page(&mut output, &source, page_id, pages_id)?;
            finish_page_tree(&mut output, pages_id, &[new_page_id]);

            Ok(SplitPage {
                data: save_document(&mut output, Quality::High)?,
                rotation: page_rotation(&source, page_id),
            })
        })
        .collect()
}

/// Concatenate the first page of every input document, in input order.
pub fn merge_pages<'a>(documents: impl IntoIterator<Item = &'a [u8]>) -> Result<Document> {
    let mut output = Document::with_version(OUTPUT_PDF_VERSION);
    let pages_id = output.new_object_id();
    let mut kids = Vec::new();

    for bytes in documents {
        let source = load_document(bytes)?;
        let page_id = first_page_id(&source)?;
        kids.push(copy_page(&mut output, &source, page_id, pages_id)?);
    }

    if kids.is_empty() {
        return Err(PagesError::NoPages);
    }

    finish_page_tree(&mut output, pages_id, &kids);
    Ok(output)
}

/// Write the `Pages` node under `pages_id` and a catalog pointing at it.
pub(crate) fn finish_page_tree(doc: &mut Document, pages_id: ObjectId, kids: &[ObjectId]) {
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        (
            "Kids",
            Object::Array(kids.iter().map(|&id| Object::Reference(id)).collect()),
        ),
        ("Count", Object::Integer(kids.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);
}

/// `/Rotate` of a page snapped to a multiple of 90 in `0..360`.
pub(crate) fn page_rotation(doc: &Document, page_id: ObjectId) -> u16 {
    let degrees = inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|obj| obj.as_i64().ok())
        .unwrap_or(0);
    normalize_rotation(degrees as i32)
}

/// Snap to the nearest multiple of 90 and wrap into `0..360`.
pub(crate) fn normalize_rotation(degrees: i32) -> u16 {
    let step = ROTATION_STEP;
    let snapped = (degrees.rem_euclid(360) + step / 2) / step * step;
    (snapped % 360) as u16
}

/// The region a viewer shows: the crop box if present, else the media box.
pub fn visible_box(doc: &Document, page_id: ObjectId) -> Rect {
    let media = inherited_attribute(doc, page_id, b"MediaBox")
        .and_then(|obj| box_from_object(doc, obj))
        .unwrap_or_else(|| {
            Rect::new(0.0, 0.0, DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1)
        });

    match inherited_attribute(doc, page_id, b"CropBox").and_then(|obj| box_from_object(doc, obj)) {
        Some(crop) => intersect(&media, &crop).unwrap_or(media),
        None => media,
    }
}

/// Size of the visible box of the first page of a single-page PDF.
pub fn page_size(bytes: &[u8]) -> Result<PageSize> {
    let doc = load_document(bytes)?;
    let page_id = first_page_id(&doc)?;
    let visible = visible_box(&doc, page_id);
    Ok(PageSize::new(visible.width, visible.height))
}

fn box_from_object(doc: &Document, obj: &Object) -> Option<Rect> {
    let resolved = match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let arr = resolved.as_array().ok()?;
    if arr.len() != 4 {
        return None;
    }
    let llx = extract_number(&arr[0])?;
    let lly = extract_number(&arr[1])?;
    let urx = extract_number(&arr[2])?;
    let ury = extract_number(&arr[3])?;

    // Corners may come in any order
    let rect = Rect::new(llx.min(urx), lly.min(ury), (urx - llx).abs(), (ury - lly).abs());
    (!rect.is_empty()).then_some(rect)
}

fn intersect(a: &Rect, b: &Rect) -> Option<Rect> {
    let x = a.x.max(b.x);
    let y = a.y.max(b.y);
    let right = a.right().min(b.right());
    let top = a.top().min(b.top());
    (right > x && top > y).then(|| Rect::new(x, y, right - x, top - y))
}

/// Extract numeric value from a PDF object
fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
