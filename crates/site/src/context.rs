use anyhow::Result;
use cms_site_cloud::ContentService;
use cms_site_core::{Locale, Translator};
use cms_site_persistence::{JsonFileStorage, KeyValueStorage, LanguageStore, SystemLocale};
use std::sync::Arc;

use crate::SiteSettings;

/// Everything page code needs, built once and passed explicitly
pub struct SiteContext {
    pub language: Arc<LanguageStore>,
    pub translator: Translator,
    pub content: ContentService,
    pub posts_per_section: u32,
}

impl SiteContext {
    pub fn new(settings: &SiteSettings) -> Result<Self> {
        let storage = if settings.ephemeral {
            None
        } else {
            let storage = match &settings.preferences_path {
                Some(path) => JsonFileStorage::open(path)?,
                None => JsonFileStorage::open_default()?,
            };
            log::debug!("Preferences file: {}", storage.path().display());
            let storage: Arc<dyn KeyValueStorage> = Arc::new(storage);
            Some(storage)
        };

        let language = Arc::new(LanguageStore::initialize(storage, &SystemLocale));
        let content = ContentService::from_config(settings.content.clone())?;
        Ok(Self::with_parts(language, content, settings))
    }

    pub fn with_parts(language: Arc<LanguageStore>, content: ContentService, settings: &SiteSettings) -> Self {
        let translator = Translator::new(language.clone()).with_substitution(settings.placeholder_mode);
        Self {
            language,
            translator,
            content,
            posts_per_section: settings.posts_per_section,
        }
    }

    pub fn locale(&self) -> Locale {
        self.language.language()
    }

    pub fn set_language(&self, code: &str) {
        self.language.set_language(code);
    }

    pub fn t(&self, key: &str) -> String {
        self.translator.t(key)
    }
}
