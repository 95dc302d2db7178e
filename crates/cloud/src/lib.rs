use anyhow::Result;
use async_trait::async_trait;
use cms_site_core::Locale;
use serde_json::Value;

pub mod config;
pub mod content_service;
pub mod media;

pub use config::*;
pub use content_service::*;
pub use media::{resolve_media_path, strapi_media};

/// Why a content request produced nothing usable
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status} {reason} from {url}")]
    Status { status: u16, reason: String, url: String },
    #[error("Invalid JSON body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("No {resource} content in response")]
    MissingData { resource: String },
    #[error("Unexpected {resource} response shape: expected {expected}")]
    UnexpectedShape { resource: String, expected: String },
}

impl ContentError {
    /// True when the request worked but the envelope lacked the expected fields
    pub fn is_shape_error(&self) -> bool {
        matches!(self, ContentError::MissingData { .. } | ContentError::UnexpectedShape { .. })
    }
}

pub type ContentResult<T> = std::result::Result<T, ContentError>;

/// Collapse a typed result into an optional value, logging why it is absent.
///
/// This is the degrade-to-absent policy: page code gets `None` and renders
/// the section empty instead of failing.
pub fn absorb<T>(result: ContentResult<T>, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_shape_error() => {
            log::warn!("[Strapi] {}: {}", what, e);
            None
        }
        Err(e) => {
            log::error!("[Strapi] Error fetching {}: {}", what, e);
            None
        }
    }
}

#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// GET `endpoint` for `locale` and return the raw JSON envelope
    async fn fetch_resource(&self, endpoint: &str, locale: &Locale) -> ContentResult<Value>;
    async fn test_connection(&self) -> ContentResult<()>;
}

pub fn backend(config: ContentConfig) -> Result<Box<dyn ContentBackend>> {
    Ok(Box::new(StrapiBackend::new(config)?))
}

/// REST client for a Strapi content service
pub struct StrapiBackend {
    client: reqwest::Client,
    config: ContentConfig,
}

impl StrapiBackend {
    pub fn new(config: ContentConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        if config.api_token.is_none() {
            log::warn!("[Strapi] No API token configured, requests will be unauthenticated");
        }

        Ok(Self { client, config })
    }

}

#[async_trait]
impl ContentBackend for StrapiBackend {
    async fn fetch_resource(&self, endpoint: &str, locale: &Locale) -> ContentResult<Value> {
        let url = self.config.api_url(endpoint, locale);
        log::debug!("[Strapi] GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                url,
            });
        }

        let body = response.text().await?;
        let envelope: Value = serde_json::from_str(&body)?;
        Ok(envelope)
    }

    async fn test_connection(&self) -> ContentResult<()> {
        let url = format!("{}/_health", self.config.origin());
        log::info!("[Strapi] Testing connection: {}", url);

        let response = self.client.head(&url).send().await?;
        let status = response.status();
        if status.is_success() {
            log::info!("[Strapi] Content service reachable ({})", status);
            Ok(())
        } else {
            Err(ContentError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                url,
            })
        }
    }
}
