use crate::file::SelectedImage;
use crate::lifecycle::{LifecycleStats, PreviewHandle, PreviewStore, ResourceLifecycle};
use crate::print_debug;

/// Renderable stand-in for the selected image. Only the handle, never the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewArtifact {
    handle: PreviewHandle,
}

impl PreviewArtifact {
    pub fn handle(&self) -> &PreviewHandle {
        &self.handle
    }

    pub fn uri(&self) -> String {
        self.handle.uri()
    }
}

/// Allocates a preview for every validated file, superseding the previous one.
pub struct PreviewManager<S: PreviewStore> {
    lifecycle: ResourceLifecycle<S>,
}

impl<S: PreviewStore> PreviewManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            lifecycle: ResourceLifecycle::new(store),
        }
    }

    pub fn on_valid_file(&mut self, image: &SelectedImage) -> PreviewArtifact {
        let handle = self.lifecycle.store_mut().allocate(image);
        let handle = self.lifecycle.supersede(handle);
        print_debug!("Preview {handle} allocated for '{}'", image.name());
        PreviewArtifact { handle }
    }

    /// Drop the current preview, if any.
    pub fn discard(&mut self) -> bool {
        self.lifecycle.release_outstanding()
    }

    pub fn current(&self) -> Option<&PreviewHandle> {
        self.lifecycle.outstanding()
    }

    pub fn stats(&self) -> LifecycleStats {
        self.lifecycle.stats()
    }

    pub fn store(&self) -> &S {
        self.lifecycle.store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{FileInput, FileValidator};
    use crate::lifecycle::MemoryPreviewStore;

    fn image(name: &str) -> SelectedImage {
        FileValidator::validate(Some(FileInput::new(name.as_bytes().to_vec(), "image/jpeg", name)))
            .unwrap()
    }

    #[test]
    fn new_file_replaces_previous_preview() {
        let mut previews = PreviewManager::new(MemoryPreviewStore::new());

        let first = previews.on_valid_file(&image("a.jpg"));
        let second = previews.on_valid_file(&image("b.jpg"));

        assert_ne!(first, second);
        assert_eq!(previews.current(), Some(second.handle()));
        assert!(previews.store().get(first.handle()).is_none());
        assert_eq!(previews.store().get(second.handle()), Some(&b"b.jpg"[..]));
        assert!(second.uri().starts_with("blob:"));
    }

    #[test]
    fn discard_leaves_nothing_outstanding() {
        let mut previews = PreviewManager::new(MemoryPreviewStore::new());
        previews.on_valid_file(&image("a.jpg"));

        assert!(previews.discard());
        assert!(previews.current().is_none());
        assert!(previews.store().is_empty());
        assert_eq!(previews.stats().outstanding(), 0);
    }
}
