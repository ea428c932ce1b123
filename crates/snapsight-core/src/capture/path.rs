use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use image::ImageFormat;

use super::{CapturePicker, CaptureRequest};
use crate::file::FileInput;
use crate::print_warn;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Picker backed by local paths, used by headless drivers.
///
/// The declared MIME type comes from the file extension. Files without a known
/// image extension get `application/octet-stream` and are left for the
/// validator to refuse.
#[derive(Debug, Default)]
pub struct PathPicker {
    queued: VecDeque<PathBuf>,
}

impl PathPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.queued.push_back(path.into());
        self
    }

    /// Read a file from disk into a [FileInput].
    pub fn read(path: &Path) -> std::io::Result<FileInput> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(FileInput::new(bytes, mime_for_path(path), name))
    }
}

pub fn mime_for_path(path: &Path) -> String {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| FALLBACK_MIME.to_string())
}

impl CapturePicker for PathPicker {
    fn request_capture(&mut self, _request: CaptureRequest) -> Option<FileInput> {
        let path = self.queued.pop_front()?;
        match Self::read(&path) {
            Ok(file) => Some(file),
            Err(e) => {
                print_warn!("Could not read {}: {e}", path.display());
                None
            }
        }
    }
}
