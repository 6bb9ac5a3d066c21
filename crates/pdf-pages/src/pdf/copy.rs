//! Deep copy of objects and pages between documents

use crate::constants::MAX_PAGE_TREE_DEPTH;
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Page keys that tie a page to its old document
const SKIPPED_PAGE_KEYS: [&[u8]; 2] = [b"Parent", b"B"];

/// Deep copy an object from source to output document, following references.
///
/// `cache` maps source ids to output ids. An id is reserved before its
/// target is copied, so reference cycles (annotation `/P` back-links, for
/// one) resolve to the reserved id instead of recursing forever.
///
/// References to page tree nodes that are not in `cache` become null. A
/// link destination naming another page must not drag that page, and
/// through its `/Parent` the whole source document, into the copy.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let referenced = match source.get_object(*id) {
                Ok(referenced) if !is_page_tree_node(referenced) => referenced,
                // Dangling references and foreign pages read as null
                _ => return Ok(Object::Null),
            };

            let new_id = output.new_object_id();
            cache.insert(*id, new_id);
            let copied = copy_object_deep(output, source, referenced, cache)?;
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        // Primitive types: just clone
        _ => Ok(obj.clone()),
    }
}

fn is_page_tree_node(obj: &Object) -> bool {
    let Object::Dictionary(dict) = obj else {
        return false;
    };
    dict.get(b"Type")
        .and_then(Object::as_name)
        .is_ok_and(|name| name == b"Page" || name == b"Pages")
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}

/// Copy one page of `source` into `output` under `parent_id`.
///
/// Inherited attributes are materialised on the copy, so it renders the
/// same once detached from its old page tree.
pub fn copy_page(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    parent_id: ObjectId,
) -> Result<ObjectId> {
    let mut cache = HashMap::new();
    let new_page_id = output.new_object_id();
    cache.insert(page_id, new_page_id);

    let page_dict = source.get_dictionary(page_id)?;
    let mut new_dict = Dictionary::new();
    for (key, value) in page_dict.iter() {
        if SKIPPED_PAGE_KEYS.contains(&key.as_slice()) {
            continue;
        }
        new_dict.set(key.clone(), copy_object_deep(output, source, value, &mut cache)?);
    }

    for key in INHERITABLE_KEYS {
        if new_dict.has(key) {
            continue;
        }
        if let Some(value) = inherited_attribute(source, page_id, key) {
            new_dict.set(key.to_vec(), copy_object_deep(output, source, value, &mut cache)?);
        }
    }

    new_dict.set("Parent", Object::Reference(parent_id));
    output
        .objects
        .insert(new_page_id, Object::Dictionary(new_dict));

    Ok(new_page_id)
}

/// Look up `key` on a page, walking up the page tree when it is inherited.
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        dict = doc.get_dictionary(parent).ok()?;
    }
    None
}
