//! The locale manager: default language, catalog cache and scoped switches.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use super::catalog::{default_loader, Catalog, CatalogLoader};
use super::language::{detect_language, detect_language_with, LanguageCode};
use super::os::{OsLocaleProvider, SystemLocale};
use super::translator::Translator;
use crate::config::Config;

/// Owns the default language and the catalogs loaded so far.
///
/// Construction installs the default language's catalog into the manager's
/// [`Translator`] (the global one unless another is supplied). Failures to
/// detect a language or load a catalog are never reported to the caller;
/// text simply stays untranslated.
///
/// ```no_run
/// use notify_i18n::i18n::{gettext, LocaleManager};
///
/// let mut locale = LocaleManager::new(None);
/// let title = locale.with_language("fr", || gettext("Notification"));
/// ```
pub struct LocaleManager {
    language: Option<LanguageCode>,
    catalogs: HashMap<LanguageCode, Catalog>,
    loader: Option<Box<dyn CatalogLoader>>,
    translator: Translator,
}

impl LocaleManager {
    /// Create a manager for `language`, detecting it from the environment
    /// and OS when `None`.
    pub fn new(language: Option<&str>) -> Self {
        Self::from_config_with_language(&Config::default(), language)
    }

    /// Create a manager from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::from_config_with_language(config, config.locale.language.as_deref())
    }

    fn from_config_with_language(config: &Config, language: Option<&str>) -> Self {
        let mut builder = Self::builder();
        if let Some(language) = language {
            builder = builder.language(language);
        }
        if config.locale.enabled {
            if let Some(loader) = default_loader(config) {
                builder = builder.boxed_loader(loader);
            }
        }
        builder.build()
    }

    pub fn builder() -> LocaleManagerBuilder {
        LocaleManagerBuilder::default()
    }

    /// The default language fixed at construction.
    pub fn language(&self) -> Option<&LanguageCode> {
        self.language.as_ref()
    }

    /// Whether catalogs can be loaded at all.
    pub fn is_enabled(&self) -> bool {
        self.loader.is_some()
    }

    /// The translator this manager installs catalogs into.
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Languages whose catalogs are cached, sorted.
    pub fn cached_languages(&self) -> Vec<&LanguageCode> {
        let mut langs: Vec<_> = self.catalogs.keys().collect();
        langs.sort();
        langs
    }

    /// Translate through this manager's translator.
    pub fn gettext(&self, msgid: &str) -> String {
        self.translator.gettext(msgid)
    }

    /// Plural-aware translation through this manager's translator.
    pub fn ngettext(&self, singular: &str, plural: &str, n: u64) -> String {
        self.translator.ngettext(singular, plural, n)
    }

    /// Switch to `lang` until the returned guard is dropped.
    ///
    /// The previously active catalog comes back on drop, including during
    /// unwinding. An unknown language or a missing catalog leaves the
    /// active catalog untouched. Switching to the default language
    /// reinstalls its catalog when an outer switch replaced it.
    pub fn lang_at(&mut self, lang: &str) -> LanguageGuard {
        if self.loader.is_none() {
            return LanguageGuard::inactive(&self.translator);
        }

        let Some(code) = detect_language(Some(lang), false) else {
            debug!(language = lang, "Ignoring switch to unrecognized language");
            return LanguageGuard::inactive(&self.translator);
        };

        let target = self.catalog(&code);
        let is_default = self.language.as_ref() == Some(&code);
        if target.is_none() && !is_default {
            return LanguageGuard::inactive(&self.translator);
        }

        // Switching back to the default inside another switch must
        // reinstall the default catalog, or passthrough when it has none.
        let already_active = match (&target, self.translator.active()) {
            (Some(target), Some(active)) => Arc::ptr_eq(target, &active),
            (None, None) => true,
            _ => false,
        };
        if already_active {
            return LanguageGuard::inactive(&self.translator);
        }

        let previous = self.translator.install(target);
        LanguageGuard {
            translator: self.translator.clone(),
            previous: Some(previous),
        }
    }

    /// Run `f` with `lang` active, then restore the previous catalog.
    pub fn with_language<R>(&mut self, lang: &str, f: impl FnOnce() -> R) -> R {
        let _guard = self.lang_at(lang);
        f()
    }

    /// Cached catalog for `code`, loading it on first use.
    fn catalog(&mut self, code: &LanguageCode) -> Option<Catalog> {
        if let Some(catalog) = self.catalogs.get(code) {
            return Some(catalog.clone());
        }
        let loader = self.loader.as_ref()?;
        match loader.load(code) {
            Ok(catalog) => {
                self.catalogs.insert(code.clone(), catalog.clone());
                Some(catalog)
            }
            Err(e) => {
                debug!(language = %code, error = %e, "Catalog unavailable");
                None
            }
        }
    }

    fn install_default(&mut self) {
        if self.loader.is_none() {
            return;
        }
        let Some(code) = self.language.clone() else {
            return;
        };
        if let Some(catalog) = self.catalog(&code) {
            self.translator.install(Some(catalog));
        }
    }
}

impl fmt::Debug for LocaleManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleManager")
            .field("language", &self.language)
            .field("cached", &self.cached_languages())
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Restores the previously active catalog when dropped.
#[must_use = "the language reverts as soon as the guard is dropped"]
pub struct LanguageGuard {
    translator: Translator,
    /// `None` when no switch happened.
    previous: Option<Option<Catalog>>,
}

impl LanguageGuard {
    fn inactive(translator: &Translator) -> Self {
        Self {
            translator: translator.clone(),
            previous: None,
        }
    }

    /// Whether entering the guard changed the active catalog.
    pub fn is_switched(&self) -> bool {
        self.previous.is_some()
    }
}

impl Drop for LanguageGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.translator.install(previous);
        }
    }
}

impl fmt::Debug for LanguageGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageGuard")
            .field("switched", &self.is_switched())
            .finish()
    }
}

/// Environment lookup used during detection.
type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Builder for [`LocaleManager`] with injectable collaborators.
#[derive(Default)]
pub struct LocaleManagerBuilder {
    language: Option<String>,
    loader: Option<Box<dyn CatalogLoader>>,
    translator: Option<Translator>,
    os: Option<Box<dyn OsLocaleProvider>>,
    env: Option<EnvLookup>,
}

impl LocaleManagerBuilder {
    /// Preferred language; detected when never set.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Catalog loader. Without one the manager is a no-op.
    pub fn loader(self, loader: impl CatalogLoader + 'static) -> Self {
        self.boxed_loader(Box::new(loader))
    }

    pub fn boxed_loader(mut self, loader: Box<dyn CatalogLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Translator to install catalogs into instead of the global one.
    pub fn translator(mut self, translator: Translator) -> Self {
        self.translator = Some(translator);
        self
    }

    /// OS locale source consulted during detection.
    pub fn os_locale(mut self, provider: impl OsLocaleProvider + 'static) -> Self {
        self.os = Some(Box::new(provider));
        self
    }

    /// Environment lookup consulted during detection instead of the
    /// process environment.
    pub fn env(mut self, lookup: impl Fn(&str) -> Option<String> + 'static) -> Self {
        self.env = Some(Box::new(lookup));
        self
    }

    pub fn build(self) -> LocaleManager {
        let os: &dyn OsLocaleProvider = match self.os.as_deref() {
            Some(os) => os,
            None => &SystemLocale,
        };
        let language = detect_language_with(
            self.language.as_deref(),
            true,
            |var| match &self.env {
                Some(lookup) => lookup(var),
                None => std::env::var(var).ok(),
            },
            os,
        );
        debug!(language = ?language.as_ref().map(LanguageCode::as_str), "Locale manager language");

        let mut manager = LocaleManager {
            language,
            catalogs: HashMap::new(),
            loader: self.loader,
            translator: self
                .translator
                .unwrap_or_else(|| Translator::global().clone()),
        };
        manager.install_default();
        manager
    }
}

#[derive(Serialize, Deserialize)]
struct ManagerState {
    language: Option<LanguageCode>,
}

/// Only the default language is persisted.
impl Serialize for LocaleManager {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ManagerState {
            language: self.language.clone(),
        }
        .serialize(serializer)
    }
}

/// Restores the default language with an empty cache, the default loader
/// and the global translator. Nothing is installed.
impl<'de> Deserialize<'de> for LocaleManager {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let state = ManagerState::deserialize(deserializer)?;
        Ok(LocaleManager {
            language: state.language,
            catalogs: HashMap::new(),
            loader: default_loader(&Config::default()),
            translator: Translator::global().clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LocaleError, Result};
    use crate::i18n::catalog::MessageTable;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct NoOsLocale;

    impl OsLocaleProvider for NoOsLocale {
        fn system_locale(&self) -> Option<String> {
            None
        }
    }

    /// Serves "fr" and "de" catalogs and counts loads per call.
    fn counting_loader(count: Arc<AtomicUsize>) -> impl CatalogLoader {
        move |lang: &LanguageCode| -> Result<Catalog> {
            count.fetch_add(1, Ordering::SeqCst);
            match lang.as_str() {
                "fr" => Ok(MessageTable::from_pairs([("Hello", "Bonjour")]).into_catalog()),
                "de" => Ok(MessageTable::from_pairs([("Hello", "Hallo")]).into_catalog()),
                "en" => Ok(MessageTable::new().into_catalog()),
                other => Err(LocaleError::CatalogNotFound {
                    language: other.to_string(),
                    path: "memory".into(),
                }),
            }
        }
    }

    fn manager(language: &str, count: Arc<AtomicUsize>) -> LocaleManager {
        LocaleManager::builder()
            .language(language)
            .loader(counting_loader(count))
            .translator(Translator::new())
            .os_locale(NoOsLocale)
            .build()
    }

    #[test]
    fn test_construction_installs_default() {
        let count = Arc::new(AtomicUsize::new(0));
        let m = manager("fr_FR.UTF-8", count.clone());
        assert_eq!(m.language().map(LanguageCode::as_str), Some("fr"));
        assert_eq!(m.gettext("Hello"), "Bonjour");
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(m.is_enabled());
    }

    #[test]
    fn test_missing_default_catalog_keeps_language() {
        let count = Arc::new(AtomicUsize::new(0));
        let m = manager("ja", count);
        assert_eq!(m.language().map(LanguageCode::as_str), Some("ja"));
        assert!(!m.translator().is_installed());
        assert_eq!(m.gettext("Hello"), "Hello");
    }

    #[test]
    fn test_without_loader_is_noop() {
        let translator = Translator::new();
        let mut m = LocaleManager::builder()
            .language("fr")
            .translator(translator.clone())
            .build();
        assert!(!m.is_enabled());
        assert!(!translator.is_installed());

        let guard = m.lang_at("de");
        assert!(!guard.is_switched());
        assert_eq!(m.gettext("Hello"), "Hello");
    }

    #[test]
    fn test_scoped_switch_restores_previous() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut m = manager("fr", count);
        let t = m.translator().clone();

        {
            let guard = m.lang_at("de_DE");
            assert!(guard.is_switched());
            assert_eq!(t.gettext("Hello"), "Hallo");
        }
        assert_eq!(t.gettext("Hello"), "Bonjour");
    }

    #[test]
    fn test_with_language_closure() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut m = manager("fr", count);
        let t = m.translator().clone();
        let inside = m.with_language("de", || t.gettext("Hello"));
        assert_eq!(inside, "Hallo");
        assert_eq!(m.gettext("Hello"), "Bonjour");
    }

    #[test]
    fn test_switch_to_default_does_not_swap() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut m = manager("fr", count.clone());
        let guard = m.lang_at("FR_ca");
        assert!(!guard.is_switched());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_catalog_runs_body_and_restores() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut m = manager("fr", count);
        let t = m.translator().clone();
        let ran = m.with_language("pt", || {
            assert_eq!(t.gettext("Hello"), "Bonjour");
            true
        });
        assert!(ran);
        assert_eq!(m.gettext("Hello"), "Bonjour");
        assert!(m.cached_languages().iter().all(|l| l.as_str() != "pt"));
    }

    #[test]
    fn test_invalid_language_runs_body() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut m = manager("fr", count.clone());
        let guard = m.lang_at("42");
        assert!(!guard.is_switched());
        drop(guard);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(m.gettext("Hello"), "Bonjour");
    }

    #[test]
    fn test_repeated_switch_uses_cache() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut m = manager("fr", count.clone());
        for _ in 0..3 {
            let _guard = m.lang_at("de");
        }
        // One load for "fr" at construction, one for "de".
        assert_eq!(count.load(Ordering::SeqCst), 2);
        let cached: Vec<&str> = m
            .cached_languages()
            .into_iter()
            .map(LanguageCode::as_str)
            .collect();
        assert_eq!(cached, ["de", "fr"]);
    }

    #[test]
    fn test_switch_loads_requested_language() {
        // The default has no catalog; the requested one must still be
        // loaded under its own code.
        let count = Arc::new(AtomicUsize::new(0));
        let mut m = manager("ja", count);
        let t = m.translator().clone();
        let inside = m.with_language("de", || t.gettext("Hello"));
        assert_eq!(inside, "Hallo");
        assert!(!t.is_installed());
    }

    #[test]
    fn test_nested_switches_unwind_in_order() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut m = manager("en", count);
        let t = m.translator().clone();

        let outer = m.lang_at("fr");
        assert_eq!(t.gettext("Hello"), "Bonjour");
        let inner = m.lang_at("de");
        assert_eq!(t.gettext("Hello"), "Hallo");
        drop(inner);
        assert_eq!(t.gettext("Hello"), "Bonjour");
        drop(outer);
        assert_eq!(t.gettext("Hello"), "Hello");
    }

    #[test]
    fn test_panic_in_scope_restores() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut m = manager("fr", count);
        let t = m.translator().clone();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            m.with_language("de", || panic!("delivery failed"))
        }));
        assert!(result.is_err());
        assert_eq!(t.gettext("Hello"), "Bonjour");
    }

    #[test]
    fn test_detected_language_from_os() {
        struct Swedish;
        impl OsLocaleProvider for Swedish {
            fn system_locale(&self) -> Option<String> {
                Some("sv-SE".to_string())
            }
        }

        let m = LocaleManager::builder()
            .translator(Translator::new())
            .env(|_| None)
            .os_locale(Swedish)
            .build();
        assert_eq!(m.language().map(LanguageCode::as_str), Some("sv"));
        assert!(!m.is_enabled());
    }

    #[test]
    fn test_detected_language_from_injected_env() {
        let m = LocaleManager::builder()
            .translator(Translator::new())
            .env(|var| (var == "LANGUAGE").then(|| "de_DE".to_string()))
            .os_locale(NoOsLocale)
            .build();
        assert_eq!(m.language().map(LanguageCode::as_str), Some("de"));
    }

    #[test]
    fn test_nothing_detected_leaves_language_unset() {
        let count = Arc::new(AtomicUsize::new(0));
        let m = LocaleManager::builder()
            .loader(counting_loader(count.clone()))
            .translator(Translator::new())
            .env(|_| None)
            .os_locale(NoOsLocale)
            .build();
        assert!(m.language().is_none());
        assert!(!m.translator().is_installed());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_nested_switch_back_to_default() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut m = manager("fr", count.clone());
        let t = m.translator().clone();

        let outer = m.lang_at("de");
        assert_eq!(t.gettext("Hello"), "Hallo");
        let inside = m.with_language("fr", || t.gettext("Hello"));
        assert_eq!(inside, "Bonjour");
        assert_eq!(t.gettext("Hello"), "Hallo");
        drop(outer);
        assert_eq!(t.gettext("Hello"), "Bonjour");
        // The default came from the cache, not a second load.
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_nested_switch_back_to_default_without_catalog() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut m = manager("ja", count);
        let t = m.translator().clone();

        let outer = m.lang_at("de");
        let inside = m.with_language("ja_JP", || t.gettext("Hello"));
        assert_eq!(inside, "Hello");
        assert_eq!(t.gettext("Hello"), "Hallo");
        drop(outer);
        assert!(!t.is_installed());
    }

    #[test]
    fn test_serialize_only_language() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut m = manager("fr", count);
        let _ = m.lang_at("de");
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"language":"fr"}"#);

        let restored: LocaleManager = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.language().map(LanguageCode::as_str), Some("fr"));
        assert!(restored.cached_languages().is_empty());
        assert!(restored.translator().same_slot(Translator::global()));
    }
}
