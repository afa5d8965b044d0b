//! Operating-system locale lookup.

/// Source of locale strings from the host operating system.
///
/// Consulted only after the POSIX locale variables yield nothing.
pub trait OsLocaleProvider {
    /// The user's UI language as a locale string (e.g. `"fr-FR"`).
    /// Only Windows has a notion of this separate from the locale.
    fn ui_language(&self) -> Option<String> {
        None
    }

    /// The generic OS locale (e.g. `"en-US"`).
    fn system_locale(&self) -> Option<String>;
}

/// The host's real locale APIs, selected at compile time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocale;

impl OsLocaleProvider for SystemLocale {
    fn ui_language(&self) -> Option<String> {
        windows_ui_language()
    }

    fn system_locale(&self) -> Option<String> {
        sys_locale::get_locale()
    }
}

/// Map `GetUserDefaultUILanguage` to a locale name such as `"de-DE"`.
#[cfg(windows)]
fn windows_ui_language() -> Option<String> {
    use windows::Win32::Globalization::{GetUserDefaultUILanguage, LCIDToLocaleName};

    const LOCALE_NAME_MAX_LENGTH: usize = 85;

    let langid = unsafe { GetUserDefaultUILanguage() };
    let mut buf = [0u16; LOCALE_NAME_MAX_LENGTH];
    let len = unsafe { LCIDToLocaleName(u32::from(langid), Some(&mut buf), 0) };
    if len <= 1 {
        tracing::debug!(langid, "No locale name for Windows UI language");
        return None;
    }
    // `len` counts the terminating NUL.
    let name = String::from_utf16_lossy(&buf[..len as usize - 1]);
    Some(name)
}

#[cfg(not(windows))]
fn windows_ui_language() -> Option<String> {
    None
}
