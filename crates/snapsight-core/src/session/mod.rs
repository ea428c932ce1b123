//! The acquisition → preview → upload → result state machine.

use url::Url;

use crate::capture::{CaptureMode, CapturePicker, CaptureRequest};
use crate::error::{ModalError, SubmitError, ValidationError};
use crate::file::{FileInput, FileValidator};
use crate::lifecycle::{LifecycleStats, MemoryPreviewStore, PreviewStore};
use crate::modal::ModalController;
use crate::preview::PreviewManager;
use crate::render::{DisplayModel, Renderer};
use crate::state::SessionState;
use crate::upload::{Disposition, Generation, UploadCompletion, UploadController, UploadTicket};
use crate::{print_debug, print_info, print_warn};


/// What a capture request ended in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureResult {
    Selected,
    Rejected(ValidationError),
    Cancelled,
}

/// Everything a view needs: the state projection plus the overlays that live
/// outside [SessionState].
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub model: DisplayModel,
    /// Transient validation message, cleared by the next successful action.
    pub inline_message: Option<String>,
    /// Image shown enlarged while the modal is open.
    pub modal_image: Option<Url>,
}

/// One user session. All transitions run to completion on the caller's thread.
pub struct Session<S: PreviewStore = MemoryPreviewStore> {
    state: SessionState,
    previews: PreviewManager<S>,
    uploads: UploadController,
    modal: ModalController,
    notice: Option<ValidationError>,
}

impl Session<MemoryPreviewStore> {
    pub fn new() -> Self {
        Self::with_store(MemoryPreviewStore::new())
    }
}

impl Default for Session<MemoryPreviewStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PreviewStore> Session<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            state: SessionState::Idle,
            previews: PreviewManager::new(store),
            uploads: UploadController::new(),
            modal: ModalController::new(),
            notice: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn generation(&self) -> Generation {
        self.uploads.generation()
    }

    pub fn is_uploading(&self) -> bool {
        self.state.is_uploading()
    }

    /// Network requests this session has allowed so far.
    pub fn uploads_issued(&self) -> usize {
        self.uploads.issued()
    }

    pub fn preview_stats(&self) -> LifecycleStats {
        self.previews.stats()
    }

    pub fn preview_store(&self) -> &S {
        self.previews.store()
    }

    pub fn validation_notice(&self) -> Option<&ValidationError> {
        self.notice.as_ref()
    }

    /// Open only while the current result still has an annotated image.
    pub fn is_modal_open(&self) -> bool {
        self.modal.is_open() && self.state.annotated_image_ref().is_some()
    }

    /// Ask the picker for a file and select it.
    pub fn capture<P: CapturePicker + ?Sized>(
        &mut self,
        picker: &mut P,
        mode: CaptureMode,
    ) -> CaptureResult {
        match picker.request_capture(CaptureRequest::new(mode)) {
            None => {
                print_debug!("Capture ({mode}) cancelled");
                CaptureResult::Cancelled
            }
            Some(file) => match self.select(file) {
                Ok(()) => CaptureResult::Selected,
                Err(e) => CaptureResult::Rejected(e),
            },
        }
    }

    /// Select a file from any source: picker, drop or paste.
    ///
    /// A rejected file leaves the state untouched and only sets the inline notice.
    pub fn select(&mut self, file: FileInput) -> Result<(), ValidationError> {
        let name = file.name.clone();
        let image = match FileValidator::validate(Some(file)) {
            Ok(image) => image,
            Err(e) => {
                print_warn!("'{name}' rejected: {e}");
                self.notice = Some(e.clone());
                return Err(e);
            }
        };

        let preview = self.previews.on_valid_file(&image);
        self.uploads.invalidate();
        self.modal.close();
        self.notice = None;
        print_info!(
            "Selected '{}' ({}, {} bytes)",
            image.name(),
            image.mime_type(),
            image.len()
        );
        self.state = SessionState::Selected { image, preview };
        Ok(())
    }

    /// Move to `Uploading` and hand out the ticket for the single request.
    ///
    /// Allowed from `Selected` and from `Resolved` (uploading the same image again).
    pub fn submit(&mut self) -> Result<UploadTicket, SubmitError> {
        let (image, preview) = match &self.state {
            SessionState::Idle => return Err(SubmitError::NothingSelected),
            SessionState::Uploading { .. } => {
                print_debug!("Submit ignored, upload already in progress");
                return Err(SubmitError::AlreadyUploading);
            }
            SessionState::Selected { image, preview }
            | SessionState::Resolved { image, preview, .. } => (image.clone(), preview.clone()),
        };

        let ticket = self.uploads.begin(image.clone());
        self.modal.close();
        self.notice = None;
        print_info!(
            "Uploading '{}' ({} bytes) under {}",
            image.name(),
            image.len(),
            ticket.generation()
        );
        self.state = SessionState::Uploading { image, preview };
        Ok(ticket)
    }

    /// Apply a finished upload, unless it belongs to a superseded generation.
    pub fn complete(&mut self, completion: UploadCompletion) -> Disposition {
        let UploadCompletion {
            generation,
            outcome,
        } = completion;

        if self.uploads.accept(generation) == Disposition::Stale {
            print_debug!(
                "Discarding stale completion of {generation} (current {})",
                self.uploads.generation()
            );
            return Disposition::Stale;
        }

        match std::mem::take(&mut self.state) {
            SessionState::Uploading { image, preview } => {
                if outcome.is_success() {
                    print_info!("Upload of '{}' completed", image.name());
                } else {
                    print_warn!("Upload of '{}' failed", image.name());
                }
                self.state = SessionState::Resolved {
                    image,
                    preview,
                    outcome,
                };
                Disposition::Applied
            }
            other => {
                // In-flight generations are only issued together with `Uploading`.
                self.state = other;
                Disposition::Stale
            }
        }
    }

    /// Back to `Idle`, releasing the preview. An in-flight upload becomes stale.
    pub fn reset(&mut self) {
        self.previews.discard();
        self.uploads.invalidate();
        self.modal.close();
        self.notice = None;
        self.state = SessionState::Idle;
        print_info!("Session reset");
    }

    /// Enlarge the annotated image, if `renderer` can resolve it.
    pub fn open_modal(&mut self, renderer: &Renderer) -> Result<(), ModalError> {
        self.modal.open(&self.state, renderer)
    }

    pub fn close_modal(&mut self) -> bool {
        self.modal.close()
    }

    pub fn screen(&self, renderer: &Renderer) -> Screen {
        let model = renderer.render(&self.state);
        let modal_image = if self.is_modal_open() {
            model.annotated_image.clone()
        } else {
            None
        };

        Screen {
            model,
            inline_message: self.notice.as_ref().map(|e| e.to_string()),
            modal_image,
        }
    }
}
