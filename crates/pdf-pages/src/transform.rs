//! Page transforms
//!
//! Each transform takes a page by reference and returns a new record with
//! the same `id` and `number`, new `data` and a fresh thumbnail. The
//! input is never touched; its thumbnail is released when the caller
//! drops the last record that holds it.

use crate::geometry::{PageSize, Rect};
use crate::page::Page;
use crate::pdf::{self, Annotation};
use crate::thumbnail::ThumbnailRegistry;
use crate::types::*;

/// Rotate by `degrees` on top of the page's current rotation.
///
/// `degrees` is snapped to a multiple of 90; the cumulative result wraps
/// modulo 360.
pub async fn rotate(page: &Page, degrees: i32, thumbnails: &ThumbnailRegistry) -> Result<Page> {
    let rotation = pdf::normalize_rotation(page.rotation as i32 + degrees.rem_euclid(360));
    let bytes = page.data.clone();

    let data = tokio::task::spawn_blocking(move || pdf::rotate_page(&bytes, rotation)).await??;

    let mut rotated = page.revise(data, thumbnails);
    rotated.rotation = rotation;
    Ok(rotated)
}

/// Fit the page into `reference`, preserving aspect ratio, centred.
pub async fn resize_to_reference(
    page: &Page,
    reference: PageSize,
    thumbnails: &ThumbnailRegistry,
) -> Result<Page> {
    let bytes = page.data.clone();
    let data = tokio::task::spawn_blocking(move || pdf::resize_page(&bytes, reference)).await??;
    Ok(page.revise(data, thumbnails))
}

/// Resize every page to the size of the first one. Order and ids are kept.
pub async fn resize_all_to_first(
    pages: &[Page],
    thumbnails: &ThumbnailRegistry,
) -> Result<Vec<Page>> {
    let Some(first) = pages.first() else {
        return Ok(Vec::new());
    };

    let bytes = first.data.clone();
    let reference = tokio::task::spawn_blocking(move || pdf::page_size(&bytes)).await??;
    log::debug!(
        "Resizing {} pages to {}x{} pt",
        pages.len(),
        reference.width,
        reference.height
    );

    let mut resized = Vec::with_capacity(pages.len());
    for page in pages {
        resized.push(resize_to_reference(page, reference, thumbnails).await?);
    }
    Ok(resized)
}

/// Keep only `rect`, given in points from the page's lower-left corner.
///
/// The rectangle is normalised first: negative extents are flipped, it is
/// clamped to the page and never smaller than one point.
pub async fn crop_to(page: &Page, rect: Rect, thumbnails: &ThumbnailRegistry) -> Result<Page> {
    let bytes = page.data.clone();
    let data = tokio::task::spawn_blocking(move || pdf::crop_page(&bytes, rect)).await??;
    Ok(page.revise(data, thumbnails))
}

/// Burn annotations into the page content.
pub async fn annotate(
    page: &Page,
    annotations: &[Annotation],
    thumbnails: &ThumbnailRegistry,
) -> Result<Page> {
    let bytes = page.data.clone();
    let annotations = annotations.to_vec();
    let data =
        tokio::task::spawn_blocking(move || pdf::annotate_page(&bytes, &annotations)).await??;
    Ok(page.revise(data, thumbnails))
}
