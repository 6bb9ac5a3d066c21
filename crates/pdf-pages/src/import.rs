//! Splitting dropped files into page records

use crate::constants::PDF_MAGIC;
use crate::page::{Page, PageId};
use crate::pdf;
use crate::thumbnail::ThumbnailRegistry;
use crate::types::*;
use std::path::Path;

/// Accept a file when its name ends in `.pdf` or its content carries the
/// PDF header.
pub fn is_pdf(name: &str, bytes: &[u8]) -> bool {
    let by_extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    by_extension || bytes.starts_with(PDF_MAGIC)
}

/// Read `path` and split it into pages.
pub async fn import_file(
    path: impl AsRef<Path>,
    batch: u64,
    thumbnails: &ThumbnailRegistry,
) -> Result<Vec<Page>> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let bytes = tokio::fs::read(path).await?;
    import_bytes(&name, bytes, batch, thumbnails).await
}

/// Split an in-memory file into one page record per source page, numbered
/// from 1 in source order.
pub async fn import_bytes(
    name: &str,
    bytes: Vec<u8>,
    batch: u64,
    thumbnails: &ThumbnailRegistry,
) -> Result<Vec<Page>> {
    if !is_pdf(name, &bytes) {
        return Err(PagesError::NotPdf {
            name: name.to_string(),
        });
    }

    let split = tokio::task::spawn_blocking(move || pdf::split_pages(&bytes)).await??;
    log::debug!("Split {} into {} pages", name, split.len());

    Ok(split
        .into_iter()
        .enumerate()
        .map(|(index, page)| {
            Page::new(
                PageId::imported(name, batch, index),
                index + 1,
                page.data,
                page.rotation,
                thumbnails,
            )
        })
        .collect())
}
