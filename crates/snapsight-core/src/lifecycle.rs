//! Ownership of preview resources.
//!
//! A [PreviewHandle] names a locally renderable copy of the selected image.
//! [ResourceLifecycle] keeps at most one handle outstanding and revokes every
//! handle it was given exactly once: when superseded, on explicit release, or
//! when the lifecycle itself is dropped.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use uuid::Uuid;

use crate::error::LifecycleError;
use crate::file::SelectedImage;
use crate::print_debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle(Uuid);

impl PreviewHandle {
    pub fn generate() -> Self {
        PreviewHandle(Uuid::new_v4())
    }

    /// URI a renderer can load the preview from.
    pub fn uri(&self) -> String {
        format!("blob:snapsight/{}", self.0)
    }
}

impl Display for PreviewHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uri())
    }
}

/// Backend that materializes previews, e.g. an object URL registry or a texture cache.
pub trait PreviewStore {
    fn allocate(&mut self, image: &SelectedImage) -> PreviewHandle;
    fn revoke(&mut self, handle: &PreviewHandle);
}

/// Keeps preview bytes in memory, keyed by handle.
#[derive(Debug, Default)]
pub struct MemoryPreviewStore {
    entries: HashMap<PreviewHandle, Arc<[u8]>>,
}

impl MemoryPreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: &PreviewHandle) -> Option<&[u8]> {
        self.entries.get(handle).map(|bytes| &bytes[..])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PreviewStore for MemoryPreviewStore {
    fn allocate(&mut self, image: &SelectedImage) -> PreviewHandle {
        let handle = PreviewHandle::generate();
        self.entries.insert(handle.clone(), image.shared_bytes());
        handle
    }

    fn revoke(&mut self, handle: &PreviewHandle) {
        self.entries.remove(handle);
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleStats {
    /// Handles handed to [ResourceLifecycle::supersede].
    pub superseded: usize,
    /// Handles revoked.
    pub released: usize,
}

impl LifecycleStats {
    pub fn outstanding(&self) -> usize {
        self.superseded - self.released
    }
}

pub struct ResourceLifecycle<S: PreviewStore> {
    store: S,
    outstanding: Option<PreviewHandle>,
    stats: LifecycleStats,
}

impl<S: PreviewStore> ResourceLifecycle<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            outstanding: None,
            stats: LifecycleStats::default(),
        }
    }

    /// Install `handle` as the outstanding one, revoking its predecessor.
    pub fn supersede(&mut self, handle: PreviewHandle) -> PreviewHandle {
        if let Some(previous) = self.outstanding.take() {
            self.revoke(&previous);
        }
        self.stats.superseded += 1;
        self.outstanding = Some(handle.clone());
        handle
    }

    /// Release a specific handle. Fails if it is not the outstanding one, so a
    /// handle can never be revoked twice.
    pub fn release(&mut self, handle: &PreviewHandle) -> Result<(), LifecycleError> {
        match self.outstanding.take() {
            Some(current) if &current == handle => {
                self.revoke(&current);
                Ok(())
            }
            other => {
                self.outstanding = other;
                Err(LifecycleError::NotOutstanding(handle.clone()))
            }
        }
    }

    /// Release whatever is outstanding. Returns whether a handle was released.
    pub fn release_outstanding(&mut self) -> bool {
        match self.outstanding.take() {
            Some(handle) => {
                self.revoke(&handle);
                true
            }
            None => false,
        }
    }

    pub fn outstanding(&self) -> Option<&PreviewHandle> {
        self.outstanding.as_ref()
    }

    pub fn stats(&self) -> LifecycleStats {
        self.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn revoke(&mut self, handle: &PreviewHandle) {
        print_debug!("Revoking preview {handle}");
        self.store.revoke(handle);
        self.stats.released += 1;
    }
}

impl<S: PreviewStore> Drop for ResourceLifecycle<S> {
    fn drop(&mut self) {
        self.release_outstanding();
    }
}
