//! # i18n Client
//!
//! Key → text lookup over translation tables served by the backend.
//!
//! ## Lifecycle
//! ```text
//! init(backend)
//!   ├── get_user_settings          → language (fallback "ja")
//!   └── get_translations{language} → table   (fallback: empty table)
//!
//! t("menu.admin")          → "管理" | "menu.admin" when missing
//! t_with("x", {n: 3})      → "{n} items" → "3 items"
//! set_language(backend, l) → update_user_settings + reload
//! ```

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::backend::{invoke_typed, Backend, BackendError};
use crate::DEFAULT_LANGUAGE;

/// Languages the translation tables exist for.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "ja"];

/// Backend diagnostics mixed into translation tables.
const DEBUG_KEY_PREFIX: &str = "__DEBUG";

#[derive(Debug, Deserialize)]
struct UserSettings {
    language: Option<String>,
}

/// Translation client for one window.
#[derive(Debug, Clone)]
pub struct I18n {
    language: String,
    translations: HashMap<String, String>,
}

impl Default for I18n {
    fn default() -> Self {
        I18n {
            language: DEFAULT_LANGUAGE.to_string(),
            translations: HashMap::new(),
        }
    }
}

impl I18n {
    /// Builds a client from an already loaded table.
    pub fn with_translations(language: impl Into<String>, translations: HashMap<String, String>) -> Self {
        I18n {
            language: language.into(),
            translations,
        }
    }

    /// Loads the user's language and its translation table.
    ///
    /// Never fails: an unreadable setting falls back to Japanese and an
    /// unreadable table leaves every key untranslated.
    pub fn init<B: Backend + ?Sized>(backend: &B) -> Self {
        let language = match invoke_typed::<UserSettings, _>(backend, "get_user_settings", json!({})) {
            Ok(settings) => settings
                .language
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            Err(err) => {
                warn!(error = %err, "failed to read user settings, using default language");
                DEFAULT_LANGUAGE.to_string()
            }
        };

        let mut i18n = I18n {
            language,
            translations: HashMap::new(),
        };
        i18n.load_translations(backend);

        info!(language = %i18n.language, keys = i18n.translations.len(), "i18n initialized");
        i18n
    }

    /// Current language code.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Translates `key`, or returns the key itself when it has no entry.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.translations.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Translates `key` and substitutes every `{name}` placeholder.
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use kakeibon_core::i18n::I18n;
    ///
    /// let table = HashMap::from([("items".to_string(), "{n} items, {n} total".to_string())]);
    /// let i18n = I18n::with_translations("en", table);
    /// assert_eq!(i18n.t_with("items", &[("n", "3")]), "3 items, 3 total");
    /// ```
    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        params
            .iter()
            .fold(self.t(key).to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }

    /// Switches language, persisting the choice on the backend.
    ///
    /// Selecting the current language is a no-op.
    pub fn set_language<B: Backend + ?Sized>(&mut self, backend: &B, language: &str) -> Result<(), BackendError> {
        if self.language == language {
            return Ok(());
        }

        backend.invoke(
            "update_user_settings",
            json!({ "settings": { "language": language } }),
        )?;

        self.language = language.to_string();
        self.load_translations(backend);

        info!(language, "language changed");
        Ok(())
    }

    fn load_translations<B: Backend + ?Sized>(&mut self, backend: &B) {
        let args = json!({ "language": self.language });
        match invoke_typed::<HashMap<String, serde_json::Value>, _>(backend, "get_translations", args) {
            Ok(table) => {
                self.translations = table
                    .into_iter()
                    .filter(|(key, _)| !key.starts_with(DEBUG_KEY_PREFIX))
                    .filter_map(|(key, value)| match value {
                        serde_json::Value::String(text) => Some((key, text)),
                        _ => None,
                    })
                    .collect();
                debug!(language = %self.language, keys = self.translations.len(), "translations loaded");
            }
            Err(err) => {
                warn!(error = %err, language = %self.language, "failed to load translations");
                self.translations.clear();
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
