use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The service answered with a non-success status.
    #[error("Upload failed with status {status}")]
    Status { status: StatusCode, body: String },
    /// No response was received at all.
    #[error("{0}")]
    Transport(String),
    #[error("malformed response")]
    MalformedResponse(#[source] serde_json::Error),
    #[error("Invalid upload part: {0}")]
    InvalidPart(String),
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::Transport(error.to_string())
    }
}
