//! Translation catalogs and the loaders that produce them.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;

use super::language::LanguageCode;

/// A table of source text to localized text for one language.
pub trait Translate: Send + Sync {
    /// Translate `msgid`, returning it unchanged when there is no entry.
    fn gettext<'a>(&'a self, msgid: &'a str) -> &'a str;

    /// Translate a message with a plural form selected by `n`.
    fn ngettext<'a>(&'a self, singular: &'a str, plural: &'a str, n: u64) -> &'a str {
        self.gettext(english_plural(singular, plural, n))
    }
}

/// Shared handle to a loaded catalog.
pub type Catalog = Arc<dyn Translate>;

/// Produces the catalog for a language code.
pub trait CatalogLoader: Send + Sync {
    /// Load the catalog for `language`.
    fn load(&self, language: &LanguageCode) -> Result<Catalog>;
}

impl<F> CatalogLoader for F
where
    F: Fn(&LanguageCode) -> Result<Catalog> + Send + Sync,
{
    fn load(&self, language: &LanguageCode) -> Result<Catalog> {
        self(language)
    }
}

/// Pick the singular form for exactly one, the plural otherwise.
pub(crate) fn english_plural<'a>(singular: &'a str, plural: &'a str, n: u64) -> &'a str {
    if n == 1 {
        singular
    } else {
        plural
    }
}

/// An in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct MessageTable {
    messages: HashMap<String, String>,
}

impl MessageTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(msgid, translation)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            messages: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Add or replace one translation.
    pub fn insert(&mut self, msgid: impl Into<String>, translation: impl Into<String>) {
        self.messages.insert(msgid.into(), translation.into());
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Wrap into a shareable [`Catalog`].
    pub fn into_catalog(self) -> Catalog {
        Arc::new(self)
    }
}

impl Translate for MessageTable {
    fn gettext<'a>(&'a self, msgid: &'a str) -> &'a str {
        self.messages.get(msgid).map(String::as_str).unwrap_or(msgid)
    }
}

#[cfg(feature = "gettext")]
pub use mo::MoCatalogLoader;

#[cfg(feature = "gettext")]
mod mo {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use tracing::debug;

    use super::{Catalog, CatalogLoader, Translate};
    use crate::error::{LocaleError, Result};
    use crate::i18n::language::LanguageCode;

    impl Translate for gettext::Catalog {
        fn gettext<'a>(&'a self, msgid: &'a str) -> &'a str {
            gettext::Catalog::gettext(self, msgid)
        }

        fn ngettext<'a>(&'a self, singular: &'a str, plural: &'a str, n: u64) -> &'a str {
            gettext::Catalog::ngettext(self, singular, plural, n)
        }
    }

    /// Loads compiled gettext catalogs laid out as
    /// `<locale_dir>/<lang>/LC_MESSAGES/<domain>.mo`.
    #[derive(Debug, Clone)]
    pub struct MoCatalogLoader {
        locale_dir: PathBuf,
        domain: String,
    }

    impl MoCatalogLoader {
        pub fn new(locale_dir: impl Into<PathBuf>, domain: impl Into<String>) -> Self {
            Self {
                locale_dir: locale_dir.into(),
                domain: domain.into(),
            }
        }

        pub fn locale_dir(&self) -> &Path {
            &self.locale_dir
        }

        pub fn domain(&self) -> &str {
            &self.domain
        }

        /// Where the catalog for `language` is expected.
        pub fn catalog_path(&self, language: &LanguageCode) -> PathBuf {
            self.locale_dir
                .join(language.as_str())
                .join("LC_MESSAGES")
                .join(format!("{}.mo", self.domain))
        }
    }

    impl CatalogLoader for MoCatalogLoader {
        fn load(&self, language: &LanguageCode) -> Result<Catalog> {
            let path = self.catalog_path(language);
            if !path.is_file() {
                return Err(LocaleError::CatalogNotFound {
                    language: language.to_string(),
                    path,
                });
            }

            let file = File::open(&path).map_err(|e| LocaleError::io(&path, e))?;
            let catalog = gettext::Catalog::parse(BufReader::new(file)).map_err(|e| {
                LocaleError::InvalidCatalog {
                    path: path.clone(),
                    reason: e.to_string(),
                }
            })?;
            debug!(path = %path.display(), language = %language, "Loaded catalog");
            Ok(Arc::new(catalog))
        }
    }
}

/// The loader used when none is supplied, or `None` when catalog support
/// is not compiled in.
#[allow(unused_variables)]
pub fn default_loader(config: &crate::config::Config) -> Option<Box<dyn CatalogLoader>> {
    #[cfg(feature = "gettext")]
    {
        let dir = crate::config::locale_dir(config);
        Some(Box::new(MoCatalogLoader::new(
            dir,
            config.locale.domain.clone(),
        )))
    }
    #[cfg(not(feature = "gettext"))]
    {
        None
    }
}
