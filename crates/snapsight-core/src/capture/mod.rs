//! Image acquisition sources.
//!
//! The session never talks to a platform picker directly. It asks a
//! [CapturePicker] for at most one file in a given [CaptureMode] and feeds the
//! answer to the validator.

use std::collections::VecDeque;

use strum::{Display, EnumString};

use crate::file::FileInput;

mod path;
pub use path::*;

#[cfg(feature = "native-dialog")]
mod dialog;
#[cfg(feature = "native-dialog")]
pub use dialog::*;

/// Accept filter handed to every picker.
pub const IMAGE_ACCEPT: &str = "image/*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CaptureMode {
    /// Bias the picker toward live capture with the rear camera.
    Camera,
    /// Bias the picker toward existing files.
    Library,
}

impl CaptureMode {
    /// Value of the capture hint for pickers that understand one.
    pub fn capture_hint(self) -> Option<&'static str> {
        match self {
            CaptureMode::Camera => Some("environment"),
            CaptureMode::Library => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRequest {
    pub mode: CaptureMode,
    pub accept: &'static str,
}

impl CaptureRequest {
    pub fn new(mode: CaptureMode) -> Self {
        Self {
            mode,
            accept: IMAGE_ACCEPT,
        }
    }
}

/// Capability to obtain a single file from the user.
///
/// Returning `None` means the user cancelled.
pub trait CapturePicker {
    fn request_capture(&mut self, request: CaptureRequest) -> Option<FileInput>;
}

impl<P: CapturePicker + ?Sized> CapturePicker for Box<P> {
    fn request_capture(&mut self, request: CaptureRequest) -> Option<FileInput> {
        (**self).request_capture(request)
    }
}

/// Picker answering from a queue of canned results, recording every request.
#[derive(Debug, Default)]
pub struct ScriptedPicker {
    answers: VecDeque<Option<FileInput>>,
    requests: Vec<CaptureRequest>,
}

impl ScriptedPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a file the next request will return.
    pub fn push_file(&mut self, file: FileInput) -> &mut Self {
        self.answers.push_back(Some(file));
        self
    }

    /// Queue a cancellation.
    pub fn push_cancel(&mut self) -> &mut Self {
        self.answers.push_back(None);
        self
    }

    pub fn requests(&self) -> &[CaptureRequest] {
        &self.requests
    }
}

impl CapturePicker for ScriptedPicker {
    fn request_capture(&mut self, request: CaptureRequest) -> Option<FileInput> {
        self.requests.push(request);
        self.answers.pop_front().flatten()
    }
}
