use serde::{Deserialize, Serialize};
use std::fmt;

pub mod i18n;
pub mod posts;

pub use i18n::{interpolate, SubstitutionMode, TranslationTable, Translator};
pub use posts::{
    category_slug, filter_posts_by_category, podcast_posts, standard_posts, PostSummary,
    PODCAST_POST, STANDARD_POST,
};

/// Language code used when nothing better is known
pub const DEFAULT_LOCALE: &str = "en";

/// Short language code ("en", "de", "fr") driving translations and content selection.
///
/// Never empty: blank input collapses to [`DEFAULT_LOCALE`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            Self(DEFAULT_LOCALE.to_string())
        } else if trimmed.len() == code.len() {
            Self(code)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Reduce a runtime language tag ("de-DE", "pt_BR.UTF-8") to its language part
    pub fn from_language_tag(tag: &str) -> Self {
        let language = tag
            .split(|c| c == '-' || c == '_' || c == '.')
            .next()
            .unwrap_or("");
        Self::new(language)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_LOCALE
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(DEFAULT_LOCALE.to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Locale {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

/// Anything that can report the locale currently in effect.
///
/// Readers call this on every lookup instead of caching the value, so a
/// language switch is visible to them immediately.
pub trait LocaleSource: Send + Sync {
    fn current_locale(&self) -> Locale;
}

impl LocaleSource for Locale {
    fn current_locale(&self) -> Locale {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_locale_falls_back_to_default() {
        assert_eq!(Locale::new("").as_str(), "en");
        assert_eq!(Locale::new("   ").as_str(), "en");
        assert!(Locale::default().is_default());
    }

    #[test]
    fn test_locale_is_trimmed() {
        assert_eq!(Locale::new(" fr ").as_str(), "fr");
    }

    #[test]
    fn test_language_tag_reduction() {
        assert_eq!(Locale::from_language_tag("de-DE").as_str(), "de");
        assert_eq!(Locale::from_language_tag("pt_BR.UTF-8").as_str(), "pt");
        assert_eq!(Locale::from_language_tag("fr").as_str(), "fr");
        assert_eq!(Locale::from_language_tag("").as_str(), "en");
        assert_eq!(Locale::from_language_tag("-US").as_str(), "en");
    }

    #[test]
    fn test_locale_serializes_as_plain_string() {
        let json = serde_json::to_string(&Locale::new("de")).unwrap();
        assert_eq!(json, "\"de\"");

        let parsed: Locale = serde_json::from_str("\"\"").unwrap();
        assert_eq!(parsed, Locale::default());
    }
}
