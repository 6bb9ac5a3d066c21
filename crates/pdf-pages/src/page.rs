use crate::thumbnail::{Thumbnail, ThumbnailRegistry};
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identity of a page, unique within the active collection and within the trash
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for page `index` (0-based) of the `batch`-th import of `file_name`.
    pub fn imported(file_name: &str, batch: u64, index: usize) -> Self {
        Self(format!("{file_name}#{batch}-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One page of the workspace.
///
/// `data` is a complete single-page PDF. Transforms never mutate a page;
/// they build a new record with the same `id` and `number`.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: PageId,
    /// 1-based position in the source document, never renumbered
    pub number: usize,
    pub data: Arc<[u8]>,
    pub thumbnail: Thumbnail,
    /// Cumulative rotation in degrees, always in `0..360`
    pub rotation: u16,
}

impl Page {
    pub fn new(
        id: PageId,
        number: usize,
        data: Vec<u8>,
        rotation: u16,
        thumbnails: &ThumbnailRegistry,
    ) -> Self {
        let data: Arc<[u8]> = Arc::from(data);
        let thumbnail = thumbnails.allocate(data.clone());
        Self {
            id,
            number,
            data,
            thumbnail,
            rotation: rotation % 360,
        }
    }

    /// New revision of this page carrying `data` and a fresh thumbnail.
    pub fn revise(&self, data: Vec<u8>, thumbnails: &ThumbnailRegistry) -> Self {
        Self::new(
            self.id.clone(),
            self.number,
            data,
            self.rotation,
            thumbnails,
        )
    }
}
