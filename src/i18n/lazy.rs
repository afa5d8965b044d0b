//! Deferred translation.

use std::borrow::Cow;
use std::fmt;

use super::translator::Translator;

/// Text that is translated only when rendered.
///
/// Lets translatable strings live in statics and constants before the
/// final language is known. Each render looks the text up again, so a
/// value rendered inside a scoped language switch follows that switch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LazyText {
    text: Cow<'static, str>,
}

impl LazyText {
    pub fn new(text: impl Into<Cow<'static, str>>) -> Self {
        Self { text: text.into() }
    }

    /// Usable in `static` items.
    pub const fn from_static(text: &'static str) -> Self {
        Self {
            text: Cow::Borrowed(text),
        }
    }

    /// The untranslated source text.
    pub fn source(&self) -> &str {
        &self.text
    }

    /// Render against a specific translator instead of the global one.
    pub fn translate_with(&self, translator: &Translator) -> String {
        translator.gettext(&self.text)
    }
}

impl fmt::Display for LazyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.translate_with(Translator::global()))
    }
}

impl From<&'static str> for LazyText {
    fn from(text: &'static str) -> Self {
        Self::from_static(text)
    }
}

impl From<String> for LazyText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
