use cms_site_core::Locale;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Origin used when no content service is configured (local Strapi dev server)
pub const DEFAULT_ORIGIN: &str = "http://localhost:1337";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

pub const ENV_DOMAIN: &str = "PUBLIC_STRAPI_DOMAIN";
pub const ENV_API_TOKEN: &str = "PUBLIC_STRAPI_API_TOKEN";
pub const ENV_MEDIA_URL: &str = "PUBLIC_STRAPI_URL";
pub const ENV_TIMEOUT: &str = "CMS_REQUEST_TIMEOUT_SECS";

/// Connection settings for the content service
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContentConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    /// Origin prepended to relative media paths
    pub media_url: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ORIGIN.to_string(),
            api_token: None,
            media_url: DEFAULT_ORIGIN.to_string(),
            request_timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl fmt::Debug for ContentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("media_url", &self.media_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl ContentConfig {
    /// Read the process environment once
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Replace fields for which `lookup` has a non-empty value
    pub fn overlay<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(domain) = lookup(ENV_DOMAIN) {
            self.base_url = domain;
        }
        if let Some(token) = lookup(ENV_API_TOKEN) {
            self.api_token = Some(token);
        }
        if let Some(media) = lookup(ENV_MEDIA_URL) {
            self.media_url = media;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(0) => self.request_timeout_secs = None,
                Ok(secs) => self.request_timeout_secs = Some(secs),
                Err(e) => log::warn!("Ignoring {}='{}': {}", ENV_TIMEOUT, raw, e),
            }
        }
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_media_url(mut self, media_url: impl Into<String>) -> Self {
        self.media_url = media_url.into();
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// `{origin}/api/{endpoint}` with the locale appended to its query string
    pub fn api_url(&self, endpoint: &str, locale: &Locale) -> String {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}/api/{}{}locale={}",
            self.origin(),
            endpoint,
            separator,
            urlencoding::encode(locale.as_str())
        )
    }

    /// Base origin without a trailing slash
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
