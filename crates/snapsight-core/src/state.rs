use strum::Display;

use crate::file::SelectedImage;
use crate::outcome::UploadOutcome;
use crate::preview::PreviewArtifact;

/// The whole mutable state of a session.
///
/// Every non-idle variant carries the image and its preview, so an upload or a
/// result without a selected image cannot be represented.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    Selected {
        image: SelectedImage,
        preview: PreviewArtifact,
    },
    Uploading {
        image: SelectedImage,
        preview: PreviewArtifact,
    },
    Resolved {
        image: SelectedImage,
        preview: PreviewArtifact,
        outcome: UploadOutcome,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SessionPhase {
    Idle,
    Selected,
    Uploading,
    Resolved,
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::Selected { .. } => SessionPhase::Selected,
            SessionState::Uploading { .. } => SessionPhase::Uploading,
            SessionState::Resolved { .. } => SessionPhase::Resolved,
        }
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        match self {
            SessionState::Idle => None,
            SessionState::Selected { image, .. }
            | SessionState::Uploading { image, .. }
            | SessionState::Resolved { image, .. } => Some(image),
        }
    }

    pub fn preview(&self) -> Option<&PreviewArtifact> {
        match self {
            SessionState::Idle => None,
            SessionState::Selected { preview, .. }
            | SessionState::Uploading { preview, .. }
            | SessionState::Resolved { preview, .. } => Some(preview),
        }
    }

    pub fn outcome(&self) -> Option<&UploadOutcome> {
        match self {
            SessionState::Resolved { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// Raw annotated image reference of a successful result.
    pub fn annotated_image_ref(&self) -> Option<&str> {
        self.outcome().and_then(UploadOutcome::annotated_image_ref)
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self, SessionState::Uploading { .. })
    }
}
