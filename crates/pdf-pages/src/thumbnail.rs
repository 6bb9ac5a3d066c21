//! Releasable preview handles.
//!
//! A [`Thumbnail`] is the display handle of one page revision. Handles are
//! reference counted: cloning a page (into a history snapshot, the trash,
//! an export batch) shares the handle, and the registry entry is released
//! when the last clone is dropped.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

#[derive(Default)]
struct RegistryState {
    next_id: u64,
    live: HashMap<u64, Arc<[u8]>>,
}

type SharedState = Arc<Mutex<RegistryState>>;

fn lock(state: &Mutex<RegistryState>) -> MutexGuard<'_, RegistryState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Allocates thumbnail handles and tracks the ones still alive
#[derive(Clone, Default)]
pub struct ThumbnailRegistry {
    state: SharedState,
}

impl ThumbnailRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a handle previewing `data`.
    pub fn allocate(&self, data: Arc<[u8]>) -> Thumbnail {
        let mut state = lock(&self.state);
        state.next_id += 1;
        let id = state.next_id;
        state.live.insert(id, data);
        log::trace!("Allocated thumbnail {id}");

        Thumbnail {
            inner: Arc::new(HandleInner {
                id,
                registry: Arc::downgrade(&self.state),
            }),
        }
    }

    /// Bytes behind a handle, if it has not been released.
    pub fn resolve(&self, thumbnail: &Thumbnail) -> Option<Arc<[u8]>> {
        lock(&self.state).live.get(&thumbnail.id()).cloned()
    }

    /// Number of handles allocated and not yet released
    pub fn live(&self) -> usize {
        lock(&self.state).live.len()
    }
}

impl fmt::Debug for ThumbnailRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThumbnailRegistry")
            .field("live", &self.live())
            .finish()
    }
}

struct HandleInner {
    id: u64,
    registry: Weak<Mutex<RegistryState>>,
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        if let Some(state) = self.registry.upgrade() {
            lock(&state).live.remove(&self.id);
            log::trace!("Released thumbnail {}", self.id);
        }
    }
}

/// Handle to a page preview
#[derive(Clone)]
pub struct Thumbnail {
    inner: Arc<HandleInner>,
}

impl Thumbnail {
    pub fn id(&self) -> u64 {
        self.inner.id
    }
}

impl PartialEq for Thumbnail {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Thumbnail {}

impl fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thumbnail({})", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(data: &[u8]) -> Arc<[u8]> {
        Arc::from(data)
    }

    #[test]
    fn test_last_clone_releases_handle() {
        let registry = ThumbnailRegistry::new();
        let thumb = registry.allocate(bytes(b"page"));
        let copy = thumb.clone();
        assert_eq!(registry.live(), 1);

        drop(thumb);
        assert_eq!(registry.live(), 1);
        assert!(registry.resolve(&copy).is_some());

        drop(copy);
        assert_eq!(registry.live(), 0);
    }

    #[test]
    fn test_handles_are_distinct() {
        let registry = ThumbnailRegistry::new();
        let a = registry.allocate(bytes(b"a"));
        let b = registry.allocate(bytes(b"a"));
        assert_ne!(a, b);
        assert_eq!(registry.live(), 2);
    }

    #[test]
    fn test_handle_outlives_registry() {
        let registry = ThumbnailRegistry::new();
        let thumb = registry.allocate(bytes(b"page"));
        drop(registry);
        // Dropping after the registry is gone must not panic
        drop(thumb);
    }
}
