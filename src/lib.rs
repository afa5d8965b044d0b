//! `notify-i18n`: language detection and translation lookup for
//! notification libraries.
//!
//! This crate detects the preferred language from the environment and the
//! operating system, caches gettext catalogs per language, and provides a
//! scoped, automatically reverted language switch.

pub mod config;
pub mod error;
pub mod i18n;

pub use error::{LocaleError, Result};
pub use i18n::{gettext, gettext_lazy, ngettext, LanguageCode, LazyText, LocaleManager};
