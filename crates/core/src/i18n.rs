use crate::{Locale, LocaleSource, DEFAULT_LOCALE};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

static BUILTIN_TABLE: Lazy<Arc<TranslationTable>> = Lazy::new(|| {
    Arc::new(
        TranslationTable::new()
            .with_catalog(
                "en",
                [
                    ("welcome", "Welcome"),
                    ("services", "Services"),
                    ("solutions", "Solutions"),
                    ("about", "About"),
                    ("blog", "Blog"),
                    ("contact", "Contact"),
                    ("readMore", "Read More"),
                    ("learnMore", "Learn More"),
                ],
            )
            .with_catalog(
                "de",
                [
                    ("welcome", "Willkommen"),
                    ("services", "Dienstleistungen"),
                    ("solutions", "Lösungen"),
                    ("about", "Über uns"),
                    ("blog", "Blog"),
                    ("contact", "Kontakt"),
                    ("readMore", "Mehr lesen"),
                    ("learnMore", "Mehr erfahren"),
                ],
            )
            .with_catalog(
                "fr",
                [
                    ("welcome", "Bienvenue"),
                    ("services", "Services"),
                    ("solutions", "Solutions"),
                    ("about", "À propos"),
                    ("blog", "Blog"),
                    ("contact", "Contact"),
                    ("readMore", "Lire plus"),
                    ("learnMore", "En savoir plus"),
                ],
            ),
    )
});

/// How `{name}` placeholders are filled in a resolved template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionMode {
    /// Only the first `{name}` of each parameter is replaced
    #[default]
    FirstOccurrence,
    EveryOccurrence,
}

/// Locale -> (key -> template) mapping, fixed once built
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    catalogs: HashMap<Locale, HashMap<String, String>>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The en/de/fr table shipped with the site
    pub fn builtin() -> Arc<TranslationTable> {
        Arc::clone(&BUILTIN_TABLE)
    }

    /// Add (or extend) the catalog for one locale
    pub fn with_catalog<L, I, K, V>(mut self, locale: L, entries: I) -> Self
    where
        L: Into<Locale>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let catalog = self.catalogs.entry(locale.into()).or_default();
        for (key, template) in entries {
            catalog.insert(key.into(), template.into());
        }
        self
    }

    /// Catalog for `locale`, or the default-locale catalog when `locale` is unknown
    pub fn catalog_for(&self, locale: &Locale) -> Option<&HashMap<String, String>> {
        self.catalogs
            .get(locale)
            .or_else(|| self.catalogs.get(&Locale::new(DEFAULT_LOCALE)))
    }

    /// Raw template for `key`, or `key` itself when the chosen catalog lacks it
    pub fn resolve(&self, locale: &Locale, key: &str) -> String {
        self.catalog_for(locale)
            .and_then(|catalog| catalog.get(key))
            .filter(|template| !template.is_empty())
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn contains_locale(&self, locale: &Locale) -> bool {
        self.catalogs.contains_key(locale)
    }

    /// Locales with a catalog, sorted by code
    pub fn locales(&self) -> Vec<Locale> {
        let mut locales: Vec<Locale> = self.catalogs.keys().cloned().collect();
        locales.sort();
        locales
    }

    /// Locales paired with a human readable name for language pickers
    pub fn available_languages(&self) -> Vec<(Locale, String)> {
        self.locales()
            .into_iter()
            .map(|locale| {
                let name = language_name(&locale)
                    .map(str::to_string)
                    .unwrap_or_else(|| locale.to_string());
                (locale, name)
            })
            .collect()
    }
}

/// Native name of a language, when known
pub fn language_name(locale: &Locale) -> Option<&'static str> {
    match locale.as_str() {
        "en" => Some("English"),
        "de" => Some("Deutsch"),
        "fr" => Some("Français"),
        _ => None,
    }
}

/// Fill `{name}` placeholders in `template`.
///
/// Parameters are applied in order, each on the output of the previous one.
pub fn interpolate(template: &str, params: &[(&str, &dyn Display)], mode: SubstitutionMode) -> String {
    let mut output = template.to_string();
    for (name, value) in params {
        let placeholder = format!("{{{}}}", name);
        let value = value.to_string();
        output = match mode {
            SubstitutionMode::FirstOccurrence => output.replacen(&placeholder, &value, 1),
            SubstitutionMode::EveryOccurrence => output.replace(&placeholder, &value),
        };
    }
    output
}

/// Translation lookup bound to a live locale source.
///
/// The locale is read from the source on every call, so switching the
/// language takes effect without rebuilding the translator.
#[derive(Clone)]
pub struct Translator {
    table: Arc<TranslationTable>,
    source: Arc<dyn LocaleSource>,
    mode: SubstitutionMode,
}

impl Translator {
    pub fn new(source: Arc<dyn LocaleSource>) -> Self {
        Self {
            table: TranslationTable::builtin(),
            source,
            mode: SubstitutionMode::default(),
        }
    }

    pub fn with_table(mut self, table: Arc<TranslationTable>) -> Self {
        self.table = table;
        self
    }

    pub fn with_substitution(mut self, mode: SubstitutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn locale(&self) -> Locale {
        self.source.current_locale()
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    /// Localized string for `key` with `params` substituted. Total: unknown
    /// locales use the default catalog, unknown keys come back verbatim.
    pub fn translate(&self, key: &str, params: &[(&str, &dyn Display)]) -> String {
        let locale = self.source.current_locale();
        let template = self.table.resolve(&locale, key);
        interpolate(&template, params, self.mode)
    }

    /// Shorthand for [`Translator::translate`] without parameters
    pub fn t(&self, key: &str) -> String {
        self.translate(key, &[])
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("locale", &self.source.current_locale())
            .field("mode", &self.mode)
            .finish()
    }
}
