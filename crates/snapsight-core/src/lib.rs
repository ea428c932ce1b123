//! Snapsight session core
//!
//! Client-side flow of an image analysis session: acquire a file, preview it,
//! upload it to the analysis service and render the result. The [Session] is a
//! plain state machine; the [Controller] drives it from events and runs uploads
//! on a background worker.

pub mod capture;
pub mod config;
pub mod controller;
pub mod error;
pub mod file;
pub mod lifecycle;
pub mod logging;
pub mod modal;
pub mod outcome;
pub mod preview;
pub mod render;
pub mod session;
pub mod state;
pub mod upload;

pub use capture::{CaptureMode, CapturePicker, CaptureRequest, PathPicker, ScriptedPicker};
#[cfg(feature = "native-dialog")]
pub use capture::DialogPicker;
pub use config::{SessionConfig, SessionConfigBuilder};
pub use controller::{Controller, Effect, SessionEvent};
pub use error::{InitError, LifecycleError, ModalError, SubmitError, ValidationError};
pub use file::{FileInput, FileValidator, SelectedImage};
pub use lifecycle::{MemoryPreviewStore, PreviewHandle, PreviewStore, ResourceLifecycle};
pub use outcome::{Prediction, UploadOutcome};
pub use preview::{PreviewArtifact, PreviewManager};
pub use render::{DisplayModel, PredictionRow, Renderer, StatusPanel, SubmitButton};
pub use session::{CaptureResult, Screen, Session};
pub use state::{SessionPhase, SessionState};
pub use upload::{Generation, UploadCompletion, UploadTransport, UploadWorker};
