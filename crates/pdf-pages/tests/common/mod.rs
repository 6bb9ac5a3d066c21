#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};

/// Content marker drawn on page `number` of the test documents
pub fn page_marker(number: usize) -> String {
    format!("(Page {}) Tj", number)
}

/// Document with one page per entry of `sizes`, page n showing `page_marker(n)`.
pub fn create_sized_pdf(sizes: &[(i64, i64)]) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for (index, (width, height)) in sizes.iter().enumerate() {
        let content = format!("BT /F1 24 Tf 72 72 Td {} ET", page_marker(index + 1));
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(*width),
                    Object::Integer(*height),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(sizes.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

/// Letter-sized test document
pub fn create_test_pdf(num_pages: usize) -> Document {
    create_sized_pdf(&vec![(612, 792); num_pages])
}

pub fn pdf_bytes(mut doc: Document) -> Vec<u8> {
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}

pub fn write_pdf(dir: &Path, name: &str, doc: Document) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pdf_bytes(doc)).unwrap();
    path
}

/// Concatenated content of every page, in page order
pub fn page_contents(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned())
        .collect()
}

pub fn page_rotate(bytes: &[u8]) -> Option<i64> {
    let doc = Document::load_mem(bytes).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    let page = doc.get_dictionary(page_id).unwrap();
    page.get(b"Rotate").ok().and_then(|obj| obj.as_i64().ok())
}

/// Add a link annotation on page `from` whose destination is page `to`
/// (both 1-based).
pub fn add_page_link(doc: &mut Document, from: u32, to: u32) {
    let pages = doc.get_pages();
    let from_id = pages[&from];
    let to_id = pages[&to];

    let link_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Annot".to_vec())),
        ("Subtype", Object::Name(b"Link".to_vec())),
        (
            "Rect",
            Object::Array(vec![
                Object::Integer(72),
                Object::Integer(72),
                Object::Integer(144),
                Object::Integer(96),
            ]),
        ),
        (
            "Dest",
            Object::Array(vec![Object::Reference(to_id), Object::Name(b"Fit".to_vec())]),
        ),
    ]));

    let page = doc.get_dictionary_mut(from_id).unwrap();
    page.set("Annots", Object::Array(vec![Object::Reference(link_id)]));
}

/// Whether `needle` appears anywhere in the raw bytes
pub fn contains_bytes(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle.as_bytes())
}
