//! Internationalization (i18n) module.
//!
//! Detects the user's language, loads gettext catalogs for it and lets
//! callers temporarily switch the active language:
//!
//! - [`detect_language`] reduces locale strings and environment/OS signals
//!   to a two-letter [`LanguageCode`].
//! - [`LocaleManager`] caches one [`Catalog`] per language and installs them
//!   into a [`Translator`]; [`LocaleManager::lang_at`] switches languages for
//!   the lifetime of a guard.
//! - [`gettext_lazy`] defers translation until the text is rendered.
//!
//! The free functions below use [`Translator::global`].

pub mod catalog;
pub mod language;
pub mod lazy;
pub mod manager;
pub mod os;
pub mod translator;

pub use catalog::{default_loader, Catalog, CatalogLoader, MessageTable, Translate};
#[cfg(feature = "gettext")]
pub use catalog::MoCatalogLoader;
pub use language::{detect_language, detect_language_with, LanguageCode, LOCALE_ENV_VARS};
pub use lazy::LazyText;
pub use manager::{LanguageGuard, LocaleManager, LocaleManagerBuilder};
pub use os::{OsLocaleProvider, SystemLocale};
pub use translator::Translator;

/// Translate `msgid` with the globally active catalog.
pub fn gettext(msgid: &str) -> String {
    Translator::global().gettext(msgid)
}

/// Plural-aware translation with the globally active catalog.
pub fn ngettext(singular: &str, plural: &str, n: u64) -> String {
    Translator::global().ngettext(singular, plural, n)
}

/// Wrap `text` for translation at render time.
pub fn gettext_lazy(text: impl Into<std::borrow::Cow<'static, str>>) -> LazyText {
    LazyText::new(text)
}

/// Whether `.mo` catalog support is compiled in.
pub const fn catalogs_supported() -> bool {
    cfg!(feature = "gettext")
}
