use crate::{absorb, strapi_media, ContentBackend, ContentConfig, ContentError, ContentResult, StrapiBackend};
use anyhow::Result;
use cms_site_core::Locale;
use serde_json::Value;

/// Posts returned by [`ContentService::blog_posts`] when no limit is given
pub const DEFAULT_POSTS_LIMIT: u32 = 3;
/// Posts returned by [`ContentService::all_blog_posts`] when no limit is given
pub const DEFAULT_ALL_POSTS_LIMIT: u32 = 10;

/// Blog listing parameters. A bare number converts into a query with only a limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPostQuery {
    pub limit: u32,
    pub category_slug: Option<String>,
}

impl Default for BlogPostQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_POSTS_LIMIT,
            category_slug: None,
        }
    }
}

impl From<u32> for BlogPostQuery {
    fn from(limit: u32) -> Self {
        Self {
            limit,
            category_slug: None,
        }
    }
}

impl BlogPostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn in_category(mut self, slug: impl Into<String>) -> Self {
        self.category_slug = Some(slug.into());
        self
    }

    /// Endpoint path with pagination, newest-first sort, and the optional
    /// category filter. The slug is percent-encoded.
    pub fn endpoint(&self) -> String {
        match self.category_slug.as_deref().filter(|slug| !slug.is_empty()) {
            Some(slug) => format!(
                "blog-posts?filters[category][slug]={}&pagination[limit]={}&sort=publishedAt:desc&populate=*",
                urlencoding::encode(slug),
                self.limit
            ),
            None => format!(
                "blog-posts?pagination[limit]={}&sort=publishedAt:desc&populate=*",
                self.limit
            ),
        }
    }

    fn describe(&self) -> String {
        match &self.category_slug {
            Some(slug) => format!("blog posts (category: {})", slug),
            None => "blog posts (category: all)".to_string(),
        }
    }
}

/// Resource accessors layered over a [`ContentBackend`].
///
/// Every accessor comes in two forms: `try_*` keeps the failure reason,
/// the plain form logs it and returns `None` or an empty list.
pub struct ContentService {
    backend: Box<dyn ContentBackend>,
    media_url: String,
}

impl ContentService {
    pub fn new(backend: Box<dyn ContentBackend>) -> Self {
        Self {
            backend,
            media_url: crate::DEFAULT_ORIGIN.to_string(),
        }
    }

    pub fn from_config(config: ContentConfig) -> Result<Self> {
        let media_url = config.media_url.clone();
        let backend = StrapiBackend::new(config)?;
        Ok(Self::new(Box::new(backend)).with_media_url(media_url))
    }

    pub fn with_media_url(mut self, media_url: impl Into<String>) -> Self {
        self.media_url = media_url.into();
        self
    }

    pub fn backend(&self) -> &dyn ContentBackend {
        self.backend.as_ref()
    }

    /// Raw envelope for `endpoint`, `None` on any failure
    pub async fn fetch_api(&self, endpoint: &str, locale: &Locale) -> Option<Value> {
        absorb(self.backend.fetch_resource(endpoint, locale).await, endpoint)
    }

    /// Absolute URL for a media reference, using the configured media origin
    pub fn media_url(&self, media: Option<&Value>) -> Option<String> {
        strapi_media(media, &self.media_url)
    }

    pub async fn try_hero_content(&self, locale: &Locale) -> ContentResult<Value> {
        let envelope = self.backend.fetch_resource("heroes?populate=*", locale).await?;
        first_entry(envelope, "hero")
    }

    pub async fn hero_content(&self, locale: &Locale) -> Option<Value> {
        absorb(self.try_hero_content(locale).await, "hero content")
    }

    pub async fn try_consultation_content(&self, locale: &Locale) -> ContentResult<Value> {
        let envelope = self.backend.fetch_resource("consultations?populate=*", locale).await?;
        first_entry(envelope, "consultation")
    }

    pub async fn consultation_content(&self, locale: &Locale) -> Option<Value> {
        absorb(self.try_consultation_content(locale).await, "consultation content")
    }

    pub async fn try_services_content(&self, locale: &Locale) -> ContentResult<Value> {
        let envelope = self.backend.fetch_resource("services?populate=*", locale).await?;
        log::debug!("[Strapi] Services response: {}", envelope);
        first_entry(envelope, "services")
    }

    pub async fn services_content(&self, locale: &Locale) -> Option<Value> {
        absorb(self.try_services_content(locale).await, "services content")
    }

    pub async fn try_blog_posts(&self, query: &BlogPostQuery, locale: &Locale) -> ContentResult<Vec<Value>> {
        let endpoint = query.endpoint();
        log::debug!("[Strapi] Fetching {} from {}", query.describe(), endpoint);
        let envelope = self.backend.fetch_resource(&endpoint, locale).await?;
        entry_list(envelope, "blog-posts")
    }

    /// Newest posts, optionally restricted to one category
    pub async fn blog_posts(&self, query: impl Into<BlogPostQuery>, locale: &Locale) -> Vec<Value> {
        let query = query.into();
        absorb(self.try_blog_posts(&query, locale).await, &query.describe()).unwrap_or_default()
    }

    pub async fn try_all_blog_posts(&self, limit: u32, locale: &Locale) -> ContentResult<Vec<Value>> {
        self.try_blog_posts(&BlogPostQuery::from(limit), locale).await
    }

    pub async fn all_blog_posts(&self, limit: Option<u32>, locale: &Locale) -> Vec<Value> {
        let limit = limit.unwrap_or(DEFAULT_ALL_POSTS_LIMIT);
        absorb(self.try_all_blog_posts(limit, locale).await, "all blog posts").unwrap_or_default()
    }

    pub async fn try_translations(&self, locale: &Locale) -> ContentResult<Value> {
        self.backend.fetch_resource("i18n/localizations", locale).await
    }

    /// Remote localization envelope, `None` when it could not be fetched
    pub async fn translations(&self, locale: &Locale) -> Option<Value> {
        absorb(self.try_translations(locale).await, "translations")
    }

    /// Logo URL. The logo is not localized, so the default locale is always requested.
    pub async fn try_logo(&self) -> ContentResult<String> {
        let envelope = self.backend.fetch_resource("logo?populate=*", &Locale::default()).await?;
        let url = envelope
            .get("data")
            .and_then(|data| data.get("logo"))
            .and_then(|logo| logo.get("url"))
            .ok_or_else(|| ContentError::MissingData {
                resource: "logo".to_string(),
            })?;
        self.media_url(Some(url)).ok_or_else(|| ContentError::UnexpectedShape {
            resource: "logo".to_string(),
            expected: "a non-empty url string".to_string(),
        })
    }

    pub async fn logo(&self) -> Option<String> {
        absorb(self.try_logo().await, "logo")
    }

    pub async fn try_nav_items(&self, locale: &Locale) -> ContentResult<Vec<Value>> {
        let envelope = self.backend.fetch_resource("navbar-items?populate=*", locale).await?;
        entry_list(envelope, "navbar-items")
    }

    pub async fn nav_items(&self, locale: &Locale) -> Vec<Value> {
        absorb(self.try_nav_items(locale).await, "navigation items").unwrap_or_default()
    }
}

/// First element of a list-shaped `data` field
fn first_entry(envelope: Value, resource: &str) -> ContentResult<Value> {
    match envelope {
        Value::Object(mut fields) => match fields.remove("data") {
            Some(Value::Array(entries)) => entries.into_iter().next().ok_or_else(|| ContentError::MissingData {
                resource: resource.to_string(),
            }),
            Some(Value::Null) | None => Err(ContentError::MissingData {
                resource: resource.to_string(),
            }),
            Some(_) => Err(ContentError::UnexpectedShape {
                resource: resource.to_string(),
                expected: "a list in `data`".to_string(),
            }),
        },
        _ => Err(ContentError::UnexpectedShape {
            resource: resource.to_string(),
            expected: "a JSON object envelope".to_string(),
        }),
    }
}

/// Whole list-shaped `data` field
fn entry_list(envelope: Value, resource: &str) -> ContentResult<Vec<Value>> {
    match envelope {
        Value::Object(mut fields) => match fields.remove("data") {
            Some(Value::Array(entries)) => Ok(entries),
            Some(Value::Null) | None => Err(ContentError::MissingData {
                resource: resource.to_string(),
            }),
            Some(_) => Err(ContentError::UnexpectedShape {
                resource: resource.to_string(),
                expected: "a list in `data`".to_string(),
            }),
        },
        _ => Err(ContentError::UnexpectedShape {
            resource: resource.to_string(),
            expected: "a JSON object envelope".to_string(),
        }),
    }
}
