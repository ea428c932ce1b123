use std::time::Duration;

use snapsight_api::Client;
use snapsight_api::client::DEFAULT_FIELD_NAME;
use url::Url;

use crate::error::InitError;
use crate::render::Renderer;

/// Upload endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/upload";

/// Configuration for a session. Created with [SessionConfig::builder].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Where images are POSTed.
    pub endpoint: Url,
    /// Base for relative annotated image references.
    pub asset_base: Url,
    /// Multipart field carrying the image.
    pub field_name: String,
    pub timeout: Option<Duration>,
}

impl SessionConfig {
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::new()
    }

    pub fn client(&self) -> Result<Client, InitError> {
        let client = Client::builder(self.endpoint.clone())
            .with_field_name(self.field_name.clone())
            .with_timeout(self.timeout)
            .build()?;
        Ok(client)
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.asset_base.clone())
    }
}

/// Builder for the SessionConfig
pub struct SessionConfigBuilder {
    endpoint: String,
    asset_base: Option<String>,
    field_name: String,
    timeout: Option<Duration>,
}

impl SessionConfigBuilder {
    fn new() -> Self {
        SessionConfigBuilder {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            asset_base: None,
            field_name: DEFAULT_FIELD_NAME.to_string(),
            timeout: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Defaults to the origin of the endpoint.
    pub fn with_asset_base(mut self, asset_base: impl Into<String>) -> Self {
        self.asset_base = Some(asset_base.into());
        self
    }

    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<SessionConfig, InitError> {
        let endpoint = self
            .endpoint
            .parse::<Url>()
            .map_err(|e| InitError::InvalidEndpointUrl(e.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(InitError::InvalidEndpointUrl(format!(
                "unsupported scheme '{}'",
                endpoint.scheme()
            )));
        }

        let asset_base = match self.asset_base {
            Some(base) => base.parse::<Url>(),
            None => endpoint.join("/"),
        }
        .map_err(|e| InitError::InvalidAssetBase(e.to_string()))?;
        if asset_base.cannot_be_a_base() {
            return Err(InitError::InvalidAssetBase(asset_base.to_string()));
        }

        Ok(SessionConfig {
            endpoint,
            asset_base,
            field_name: self.field_name,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_local_service() {
        let config = SessionConfig::builder().build().unwrap();
        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.asset_base.as_str(), "http://localhost:3000/");
        assert_eq!(config.field_name, "image");
        assert!(config.timeout.is_none());
    }

    #[test]
    fn asset_base_follows_endpoint_origin() {
        let config = SessionConfig::builder()
            .with_endpoint("https://vision.example.com/api/v1/upload")
            .build()
            .unwrap();
        assert_eq!(config.asset_base.as_str(), "https://vision.example.com/");
    }

    #[test]
    fn explicit_asset_base_wins() {
        let config = SessionConfig::builder()
            .with_asset_base("https://cdn.example.com/")
            .with_timeout(Duration::from_secs(10))
            .build()
            .unwrap();
        assert_eq!(config.asset_base.as_str(), "https://cdn.example.com/");
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.renderer().asset_base(), &config.asset_base);
    }

    #[test]
    fn invalid_urls_are_reported() {
        let err = SessionConfig::builder()
            .with_endpoint("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, InitError::InvalidEndpointUrl(_)));

        let err = SessionConfig::builder()
            .with_endpoint("ftp://host/upload")
            .build()
            .unwrap_err();
        assert!(matches!(err, InitError::InvalidEndpointUrl(_)));

        let err = SessionConfig::builder()
            .with_asset_base("mailto:someone@example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, InitError::InvalidAssetBase(_)));
    }

    #[test]
    fn client_uses_configured_field() {
        let config = SessionConfig::builder()
            .with_field_name("file")
            .build()
            .unwrap();
        let client = config.client().unwrap();
        assert_eq!(client.field_name(), "file");
        assert_eq!(client.endpoint(), &config.endpoint);
    }
}
