use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::multipart::{Form, Part};

use crate::error::ClientError;
use crate::schemas::{AnalysisResponse, ImageUpload};

/// Multipart field carrying the image when none is configured.
pub const DEFAULT_FIELD_NAME: &str = "image";

trait ResponseExt {
    fn map_to_client_err(self) -> Result<reqwest::blocking::Response, ClientError>;
}

impl ResponseExt for reqwest::blocking::Response {
    fn map_to_client_err(self) -> Result<reqwest::blocking::Response, ClientError> {
        if self.status().is_success() {
            Ok(self)
        } else {
            let status = self.status();
            // The body is only kept for diagnostics, a failed read is not worth a second error.
            let body = self.text().unwrap_or_default();
            Err(ClientError::Status { status, body })
        }
    }
}

/// Builder for [Client], created with [Client::builder].
pub struct ClientBuilder {
    endpoint: Url,
    field_name: String,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    fn new(endpoint: Url) -> Self {
        ClientBuilder {
            endpoint,
            field_name: DEFAULT_FIELD_NAME.to_string(),
            timeout: None,
        }
    }

    /// Set the multipart field name the image is sent under.
    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    /// Set a request timeout. Without one the request waits for the server indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Client, ClientError> {
        let http_client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Client {
            http_client,
            endpoint: self.endpoint,
            field_name: self.field_name,
        })
    }
}

/// A client for the image analysis endpoint.
///
/// Each call to [Client::upload_image] performs exactly one POST request; there is no retry.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: reqwest::blocking::Client,
    endpoint: Url,
    field_name: String,
}

impl Client {
    /// Create a client with default settings for the given endpoint.
    pub fn new(endpoint: Url) -> Result<Self, ClientError> {
        ClientBuilder::new(endpoint).build()
    }

    pub fn builder(endpoint: Url) -> ClientBuilder {
        ClientBuilder::new(endpoint)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Send the image as a single multipart part and parse the analysis result.
    pub fn upload_image(&self, upload: ImageUpload<'_>) -> Result<AnalysisResponse, ClientError> {
        let part = Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name.to_string())
            .mime_str(upload.mime_type)
            .map_err(|e| ClientError::InvalidPart(e.to_string()))?;
        let form = Form::new().part(self.field_name.clone(), part);

        log::debug!(
            "POST {} ({} bytes as '{}')",
            self.endpoint,
            upload.bytes.len(),
            upload.file_name
        );

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()?
            .map_to_client_err()?;
        let body = response.bytes()?;

        AnalysisResponse::from_slice(&body)
    }
}
