use crate::{KeyValueStorage, LocaleHint};
use cms_site_core::{Locale, LocaleSource};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Storage key holding the chosen language code
pub const LANGUAGE_KEY: &str = "language";

/// Callback run with the new locale after every change
pub type LanguageSubscriber = Arc<dyn Fn(&Locale) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The current language for a session.
///
/// With storage attached, the language is seeded from it and written back
/// on every change. Without storage (no client-side context) it starts at
/// the default locale and lives only in memory.
pub struct LanguageStore {
    current: RwLock<Locale>,
    storage: Option<Arc<dyn KeyValueStorage>>,
    subscribers: Mutex<Vec<(SubscriptionId, LanguageSubscriber)>>,
    next_id: AtomicU64,
}

impl LanguageStore {
    /// Seed from storage, else from the runtime locale hint, else the default locale
    pub fn initialize(storage: Option<Arc<dyn KeyValueStorage>>, hint: &dyn LocaleHint) -> Self {
        let initial = match &storage {
            Some(storage) => Self::initial_language(&**storage, hint),
            None => Locale::default(),
        };
        log::info!("Initial language: {}", initial);

        let store = Self {
            current: RwLock::new(initial),
            storage,
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        };
        store.persist(&store.language());
        store
    }

    /// Store for a context without client-side storage: always starts at the default locale
    pub fn detached() -> Self {
        Self::initialize(None, &crate::FixedLocale::none())
    }

    fn initial_language(storage: &dyn KeyValueStorage, hint: &dyn LocaleHint) -> Locale {
        match storage.get_item(LANGUAGE_KEY) {
            Ok(Some(saved)) if !saved.trim().is_empty() => return Locale::new(saved),
            Ok(_) => {}
            Err(e) => log::warn!("Could not read saved language: {}", e),
        }

        match hint.locale_tag() {
            Some(tag) => Locale::from_language_tag(&tag),
            None => Locale::default(),
        }
    }

    pub fn language(&self) -> Locale {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_persistent(&self) -> bool {
        self.storage.is_some()
    }

    /// Replace the current language. Any code is accepted as-is (blank
    /// becomes the default locale); the value is persisted and every
    /// subscriber is notified before this returns.
    pub fn set_language(&self, code: &str) {
        let locale = Locale::new(code);
        {
            // Persisted under the lock: the saved code always matches `current`
            let mut current = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            *current = locale.clone();
            self.persist(&locale);
        }
        log::debug!("Language set to {}", locale);

        self.notify(&locale);
    }

    /// Register `subscriber`. It is called right away with the current
    /// language and again after every change.
    pub fn subscribe<F>(&self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&Locale) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let subscriber: LanguageSubscriber = Arc::new(subscriber);
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((id, Arc::clone(&subscriber)));

        subscriber(&self.language());
        id
    }

    /// Returns whether the subscription was still registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn persist(&self, locale: &Locale) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.set_item(LANGUAGE_KEY, locale.as_str()) {
                log::warn!("Could not save language '{}': {}", locale, e);
            }
        }
    }

    fn notify(&self, locale: &Locale) {
        // Snapshot so callbacks may subscribe or unsubscribe without deadlocking
        let subscribers: Vec<LanguageSubscriber> = self
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect();

        for subscriber in subscribers {
            subscriber(locale);
        }
    }
}

impl LocaleSource for LanguageStore {
    fn current_locale(&self) -> Locale {
        self.language()
    }
}

impl std::fmt::Debug for LanguageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageStore")
            .field("current", &self.language())
            .field("persistent", &self.is_persistent())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedLocale, JsonFileStorage, MemoryStorage};
    use cms_site_core::Translator;
    use std::cell::Cell;
    use tempfile::TempDir;

    /// Fails the test if the runtime locale is consulted
    struct UnreachableHint;

    impl LocaleHint for UnreachableHint {
        fn locale_tag(&self) -> Option<String> {
            panic!("runtime locale hint should not be consulted");
        }
    }

    struct CountingHint {
        calls: Cell<u32>,
        tag: Option<String>,
    }

    impl LocaleHint for CountingHint {
        fn locale_tag(&self) -> Option<String> {
            self.calls.set(self.calls.get() + 1);
            self.tag.clone()
        }
    }

    fn memory() -> Arc<MemoryStorage> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn test_detached_store_defaults_to_english() {
        let store = LanguageStore::detached();
        assert_eq!(store.language().as_str(), "en");
        assert!(!store.is_persistent());
    }

    #[test]
    fn test_detached_store_ignores_hint() {
        let store = LanguageStore::initialize(None, &UnreachableHint);
        assert_eq!(store.language().as_str(), "en");
    }

    #[test]
    fn test_saved_language_wins_over_hint() {
        let storage = memory();
        storage.set_item(LANGUAGE_KEY, "fr").unwrap();

        let store = LanguageStore::initialize(Some(storage), &UnreachableHint);
        assert_eq!(store.language().as_str(), "fr");
    }

    #[test]
    fn test_hint_is_reduced_to_language_code() {
        let hint = CountingHint {
            calls: Cell::new(0),
            tag: Some("de-AT".to_string()),
        };
        let store = LanguageStore::initialize(Some(memory()), &hint);

        assert_eq!(store.language().as_str(), "de");
        assert_eq!(hint.calls.get(), 1);
    }

    #[test]
    fn test_no_saved_value_and_no_hint() {
        let store = LanguageStore::initialize(Some(memory()), &FixedLocale::none());
        assert_eq!(store.language().as_str(), "en");

        let store = LanguageStore::initialize(Some(memory()), &FixedLocale::new(""));
        assert_eq!(store.language().as_str(), "en");
    }

    #[test]
    fn test_initial_language_is_persisted() {
        let storage = memory();
        let _store = LanguageStore::initialize(Some(storage.clone()), &FixedLocale::new("de-DE"));
        assert_eq!(storage.get_item(LANGUAGE_KEY).unwrap().as_deref(), Some("de"));
    }

    #[test]
    fn test_set_language_persists() {
        let storage = memory();
        let store = LanguageStore::initialize(Some(storage.clone()), &FixedLocale::none());

        store.set_language("fr");
        assert_eq!(store.language().as_str(), "fr");
        assert_eq!(storage.get_item(LANGUAGE_KEY).unwrap().as_deref(), Some("fr"));
    }

    #[test]
    fn test_concurrent_setters_leave_storage_in_sync() {
        let storage = memory();
        let store = LanguageStore::initialize(Some(storage.clone()), &FixedLocale::none());

        std::thread::scope(|scope| {
            for code in ["de", "fr", "en", "es"] {
                let store = &store;
                scope.spawn(move || {
                    for _ in 0..200 {
                        store.set_language(code);
                    }
                });
            }
        });

        let saved = storage.get_item(LANGUAGE_KEY).unwrap();
        assert_eq!(saved.as_deref(), Some(store.language().as_str()));
    }

    #[test]
    fn test_set_language_accepts_unknown_codes() {
        let store = LanguageStore::detached();
        store.set_language("xx");
        assert_eq!(store.language().as_str(), "xx");

        store.set_language("");
        assert_eq!(store.language().as_str(), "en");
    }

    #[test]
    fn test_language_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");

        let storage = Arc::new(JsonFileStorage::open(&path).unwrap());
        LanguageStore::initialize(Some(storage), &FixedLocale::new("en-US")).set_language("fr");

        let storage = Arc::new(JsonFileStorage::open(&path).unwrap());
        let store = LanguageStore::initialize(Some(storage), &UnreachableHint);
        assert_eq!(store.language().as_str(), "fr");
    }

    #[test]
    fn test_subscribers_see_every_change() {
        let store = LanguageStore::detached();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = store.subscribe(move |locale| sink.lock().unwrap().push(locale.to_string()));

        store.set_language("de");
        store.set_language("fr");
        assert!(store.unsubscribe(id));
        store.set_language("en");

        assert_eq!(*seen.lock().unwrap(), vec!["en", "de", "fr"]);
        assert!(!store.unsubscribe(id));
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_subscriber_may_unsubscribe_itself() {
        let store = Arc::new(LanguageStore::detached());
        let calls = Arc::new(AtomicU64::new(0));

        let inner_store = Arc::clone(&store);
        let counter = Arc::clone(&calls);
        store.subscribe(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 1 {
                inner_store.unsubscribe(SubscriptionId(0));
            }
        });

        store.set_language("de");
        store.set_language("fr");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_translator_tracks_store() {
        let store = Arc::new(LanguageStore::detached());
        let translator = Translator::new(store.clone());
        assert_eq!(translator.t("readMore"), "Read More");

        store.set_language("de");
        assert_eq!(translator.t("readMore"), "Mehr lesen");

        store.set_language("xx");
        assert_eq!(translator.t("welcome"), "Welcome");
    }
}
