//! Merging a subset of pages into one document

use crate::options::{ExportOptions, SelectionMode};
use crate::page::Page;
use crate::pdf;
use crate::selection::Selection;
use crate::types::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Pages to export, always in collection order.
pub fn select_pages<'a>(
    pages: &'a [Page],
    mode: SelectionMode,
    selection: &Selection,
) -> Vec<&'a Page> {
    match mode {
        SelectionMode::All => pages.iter().collect(),
        SelectionMode::Selection => pages
            .iter()
            .filter(|page| selection.contains(&page.id))
            .collect(),
    }
}

/// Merge `pages` and serialise with the quality tier of `options`.
pub async fn export_pages<'a>(
    pages: impl IntoIterator<Item = &'a Page>,
    options: &ExportOptions,
) -> Result<Vec<u8>> {
    let data: Vec<Arc<[u8]>> = pages.into_iter().map(|page| page.data.clone()).collect();
    if data.is_empty() {
        return Err(PagesError::NoPages);
    }
    let quality = options.quality;

    tokio::task::spawn_blocking(move || {
        let mut doc = pdf::merge_pages(data.iter().map(|bytes| &bytes[..]))?;
        pdf::save_document(&mut doc, quality)
    })
    .await?
}

/// Write exported bytes to `dir`, named after the options' filename.
pub async fn save_export(
    bytes: &[u8],
    dir: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<PathBuf> {
    options.validate()?;
    let path = dir.as_ref().join(options.resolved_filename());
    tokio::fs::write(&path, bytes).await?;
    log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}
