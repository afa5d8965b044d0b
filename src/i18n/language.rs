//! Language codes and language detection.
//!
//! A locale string such as `fr_CA.UTF-8`, `de:AT` or `en` is reduced to its
//! two-letter language code. Detection walks the POSIX locale variables in
//! priority order and then asks the operating system.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::os::{OsLocaleProvider, SystemLocale};
use crate::error::LocaleError;

/// Environment variables consulted during detection, highest priority first.
pub const LOCALE_ENV_VARS: [&str; 4] = ["LC_ALL", "LC_CTYPE", "LANG", "LANGUAGE"];

/// `lang[_country][.encoding]`, ASCII case-insensitive. Anything after a
/// leading two-letter code is tolerated. Case folding is ASCII-only so that
/// letters like U+212A KELVIN SIGN never match `k`.
static LOCALE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*(?P<lang>(?i-u:[a-z]{2}))",
        r"([_:](?P<country>(?i-u:[a-z]{2}))?(\.(?P<enc>(?i-u:[a-z0-9]+)))?|.+)?",
    ))
    .expect("locale regex is valid")
});

/// A normalized two-letter lowercase language code ("en", "fr").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Normalize a raw locale string. Returns `None` when it does not start
    /// with a two-letter alphabetic code.
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = LOCALE_RE.captures(raw)?;
        let lang = caps.name("lang")?.as_str();
        Some(Self(lang.to_ascii_lowercase()))
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LanguageCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for LanguageCode {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| LocaleError::InvalidLanguage(s.to_string()))
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

/// Detect a language using the process environment and the host OS.
///
/// With `raw` set, only normalizes it. Without it, returns `None` unless
/// `allow_fallback` is set, in which case the locale environment variables
/// and then the OS are consulted.
pub fn detect_language(raw: Option<&str>, allow_fallback: bool) -> Option<LanguageCode> {
    detect_language_with(
        raw,
        allow_fallback,
        |var| std::env::var(var).ok(),
        &SystemLocale,
    )
}

/// [`detect_language`] with an explicit environment lookup and OS provider.
pub fn detect_language_with<E>(
    raw: Option<&str>,
    allow_fallback: bool,
    env: E,
    provider: &dyn OsLocaleProvider,
) -> Option<LanguageCode>
where
    E: Fn(&str) -> Option<String>,
{
    if let Some(raw) = raw {
        return LanguageCode::parse(raw);
    }
    if !allow_fallback {
        return None;
    }

    for var in LOCALE_ENV_VARS {
        let Some(value) = env(var).filter(|v| !v.is_empty()) else {
            continue;
        };
        if let Some(code) = LanguageCode::parse(&value) {
            debug!(variable = var, language = %code, "Language detected from environment");
            return Some(code);
        }
    }

    if let Some(ui) = provider.ui_language() {
        if let Some(code) = LanguageCode::parse(&ui) {
            debug!(locale = %ui, language = %code, "Language detected from UI language");
            return Some(code);
        }
    }

    match provider.system_locale() {
        Some(locale) => match LanguageCode::parse(&locale) {
            Some(code) => {
                debug!(locale = %locale, language = %code, "Language detected from OS locale");
                Some(code)
            }
            None => {
                warn!(
                    locale = %locale,
                    "Language detection failure / unparsable OS locale"
                );
                None
            }
        },
        None => None,
    }
}
