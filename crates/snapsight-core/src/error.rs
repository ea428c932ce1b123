use snapsight_api::ClientError;

use crate::lifecycle::PreviewHandle;

/// The selected input was refused by the file validator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("not an image")]
    NotAnImage {
        /// Declared MIME type of the refused file, `None` when there was no file at all.
        mime_type: Option<String>,
    },
}

/// A submit request that was not turned into a network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("No image selected")]
    NothingSelected,
    #[error("An upload is already in progress")]
    AlreadyUploading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ModalError {
    #[error("There is no annotated image to enlarge")]
    NoAnnotatedImage,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// The handle was already released, or never belonged to this lifecycle.
    #[error("Preview handle {0} is not outstanding")]
    NotOutstanding(PreviewHandle),
}

/// Errors that can occur while building a session from its configuration.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Failed to parse endpoint URL: {0}")]
    InvalidEndpointUrl(String),
    #[error("Failed to parse asset base URL: {0}")]
    InvalidAssetBase(String),
    #[error("Client error: {0}")]
    Client(#[from] ClientError),
}
