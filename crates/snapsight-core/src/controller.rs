//! Single-threaded event loop around a [Session].
//!
//! User actions and picker answers arrive as [SessionEvent]s; upload results
//! arrive from the [UploadWorker] and are applied by [Controller::pump] or
//! [Controller::wait_idle]. Each event runs to completion before the next.

use std::time::{Duration, Instant};

use crate::capture::{CaptureMode, CapturePicker};
use crate::config::SessionConfig;
use crate::error::{InitError, ModalError, SubmitError, ValidationError};
use crate::file::FileInput;
use crate::lifecycle::{MemoryPreviewStore, PreviewStore};
use crate::outcome::UploadOutcome;
use crate::render::Renderer;
use crate::session::{CaptureResult, Screen, Session};
use crate::upload::{Disposition, Generation, UploadCompletion, UploadTransport, UploadWorker};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Open the picker in the given mode.
    Capture(CaptureMode),
    /// A file dropped or pasted onto the page. Treated like a library pick.
    Dropped(FileInput),
    Submit,
    Reset,
    OpenModal,
    CloseModal,
    UploadFinished(UploadCompletion),
}

/// What handling one event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Selected,
    Rejected(ValidationError),
    Cancelled,
    UploadStarted(Generation),
    SubmitIgnored(SubmitError),
    Resolved,
    StaleDiscarded,
    Reset,
    ModalOpened,
    ModalRefused(ModalError),
    ModalClosed,
}

pub struct Controller<P: CapturePicker, S: PreviewStore = MemoryPreviewStore> {
    session: Session<S>,
    picker: P,
    worker: UploadWorker,
    renderer: Renderer,
}

impl<P: CapturePicker> Controller<P, MemoryPreviewStore> {
    /// Controller uploading through the HTTP client described by `config`.
    pub fn from_config(config: &SessionConfig, picker: P) -> Result<Self, InitError> {
        let client = config.client()?;
        Ok(Self::new(
            Session::new(),
            picker,
            client,
            config.renderer(),
        ))
    }
}

impl<P: CapturePicker, S: PreviewStore> Controller<P, S> {
    pub fn new<T: UploadTransport>(
        session: Session<S>,
        picker: P,
        transport: T,
        renderer: Renderer,
    ) -> Self {
        Self {
            session,
            picker,
            worker: UploadWorker::spawn(transport),
            renderer,
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn picker_mut(&mut self) -> &mut P {
        &mut self.picker
    }

    pub fn screen(&self) -> Screen {
        self.session.screen(&self.renderer)
    }

    pub fn dispatch(&mut self, event: SessionEvent) -> Effect {
        match event {
            SessionEvent::Capture(mode) => match self.session.capture(&mut self.picker, mode) {
                CaptureResult::Selected => Effect::Selected,
                CaptureResult::Rejected(e) => Effect::Rejected(e),
                CaptureResult::Cancelled => Effect::Cancelled,
            },
            SessionEvent::Dropped(file) => match self.session.select(file) {
                Ok(()) => Effect::Selected,
                Err(e) => Effect::Rejected(e),
            },
            SessionEvent::Submit => self.submit(),
            SessionEvent::Reset => {
                self.session.reset();
                Effect::Reset
            }
            SessionEvent::OpenModal => match self.session.open_modal(&self.renderer) {
                Ok(()) => Effect::ModalOpened,
                Err(e) => Effect::ModalRefused(e),
            },
            SessionEvent::CloseModal => {
                self.session.close_modal();
                Effect::ModalClosed
            }
            SessionEvent::UploadFinished(completion) => match self.session.complete(completion) {
                Disposition::Applied => Effect::Resolved,
                Disposition::Stale => Effect::StaleDiscarded,
            },
        }
    }

    fn submit(&mut self) -> Effect {
        let ticket = match self.session.submit() {
            Ok(ticket) => ticket,
            Err(e) => return Effect::SubmitIgnored(e),
        };
        let generation = ticket.generation();

        match self.worker.enqueue(ticket) {
            Ok(()) => Effect::UploadStarted(generation),
            Err(ticket) => {
                // Without a worker the attempt can only fail.
                self.session.complete(UploadCompletion::new(
                    ticket.generation(),
                    UploadOutcome::failure("upload worker is not running"),
                ));
                Effect::Resolved
            }
        }
    }

    /// Apply every upload result that has arrived, without blocking.
    pub fn pump(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Some(completion) = self.worker.try_completion() {
            effects.push(self.dispatch(SessionEvent::UploadFinished(completion)));
        }
        effects
    }

    /// Block until no upload is in flight or `timeout` elapses. Stale results
    /// received meanwhile are discarded. Returns whether the session is idle.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.session.is_uploading() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            if let Some(completion) = self.worker.wait_completion(remaining) {
                self.dispatch(SessionEvent::UploadFinished(completion));
            }
        }
        !self.session.is_uploading()
    }
}
