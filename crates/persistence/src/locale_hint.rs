/// Source of the runtime's reported locale ("en-US", "de_DE.UTF-8", ...)
pub trait LocaleHint {
    fn locale_tag(&self) -> Option<String>;
}

/// Locale reported by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocale;

impl LocaleHint for SystemLocale {
    fn locale_tag(&self) -> Option<String> {
        sys_locale::get_locale()
    }
}

/// A fixed answer, for tests and for callers that already know the locale
#[derive(Debug, Clone, Default)]
pub struct FixedLocale(pub Option<String>);

impl FixedLocale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Some(tag.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl LocaleHint for FixedLocale {
    fn locale_tag(&self) -> Option<String> {
        self.0.clone()
    }
}
