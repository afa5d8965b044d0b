//! Library configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$NOTIFY_I18N_CONFIG` (environment variable)
//! 2. `~/.config/notify-i18n/config.toml` (Linux/macOS)
//!    `%APPDATA%\notify-i18n\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "NOTIFY_I18N_CONFIG";

/// Default gettext translation domain.
pub const DEFAULT_DOMAIN: &str = "notify";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language selection and catalog lookup.
    pub locale: LocaleConfig,
}

/// Language selection and catalog lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Preferred language ("fr", "de_DE.UTF-8", ...). Detected when unset.
    pub language: Option<String>,
    /// gettext domain: catalogs are named `<domain>.mo`.
    pub domain: String,
    /// Directory holding `<lang>/LC_MESSAGES/<domain>.mo`.
    /// Defaults to `i18n/` next to the running executable.
    pub locale_dir: Option<PathBuf>,
    /// Disable to keep all text untranslated.
    pub enabled: bool,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language: None,
            domain: DEFAULT_DOMAIN.to_string(),
            locale_dir: None,
            enabled: true,
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("notify-i18n").join("config.toml"))
}

/// Return the directory catalogs are loaded from.
pub fn locale_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.locale.locale_dir {
        return dir.clone();
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("i18n")))
        .unwrap_or_else(|| PathBuf::from("i18n"))
}
