//! The installable "active catalog" slot.
//!
//! Whatever catalog is installed in a [`Translator`] answers every lookup
//! made through it. [`Translator::global`] is the process-wide slot used by
//! [`super::gettext`] and by [`super::LazyText`]'s `Display`.
//!
//! The slot is locked per access, not per scope: two threads switching the
//! same translator will see each other's catalogs. Use separate translators
//! when that matters.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use super::catalog::{english_plural, Catalog};

static GLOBAL: OnceLock<Translator> = OnceLock::new();

/// Cloneable handle to a shared active-catalog slot.
#[derive(Clone, Default)]
pub struct Translator {
    active: Arc<RwLock<Option<Catalog>>>,
}

impl Translator {
    /// A fresh slot with nothing installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide translator.
    pub fn global() -> &'static Translator {
        GLOBAL.get_or_init(Translator::new)
    }

    /// Install `catalog` (or uninstall with `None`), returning the previous one.
    pub fn install(&self, catalog: Option<Catalog>) -> Option<Catalog> {
        let mut slot = self.active.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, catalog)
    }

    /// The currently installed catalog.
    pub fn active(&self) -> Option<Catalog> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a catalog is installed.
    pub fn is_installed(&self) -> bool {
        self.active().is_some()
    }

    /// Translate `msgid` with the active catalog, or return it unchanged.
    pub fn gettext(&self, msgid: &str) -> String {
        match self.active() {
            Some(catalog) => catalog.gettext(msgid).to_string(),
            None => msgid.to_string(),
        }
    }

    /// Plural-aware translation. Without a catalog the English rule applies.
    pub fn ngettext(&self, singular: &str, plural: &str, n: u64) -> String {
        match self.active() {
            Some(catalog) => catalog.ngettext(singular, plural, n).to_string(),
            None => english_plural(singular, plural, n).to_string(),
        }
    }

    /// Whether two handles share the same slot.
    pub fn same_slot(&self, other: &Translator) -> bool {
        Arc::ptr_eq(&self.active, &other.active)
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("installed", &self.is_installed())
            .finish()
    }
}
