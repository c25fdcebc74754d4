//! # Core Configuration
//!
//! Defaults the rules fall back to when the backend has not said otherwise.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`KAKEIBON_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read once at startup and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::types::{RoundingPolicy, TaxRate};
use crate::validation::PasswordPolicy;
use crate::{DEFAULT_LANGUAGE, DEFAULT_TAX_RATE_PERCENT, MIN_PASSWORD_LENGTH};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreConfig {
    /// UI language used before the user settings load.
    pub language: String,

    /// Tax rate pre-selected for new detail rows.
    pub default_tax_rate: TaxRate,

    /// Rounding used when a transaction header carries no policy.
    pub default_rounding: RoundingPolicy,

    /// Minimum password length in UTF-16 code units.
    pub min_password_length: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            language: DEFAULT_LANGUAGE.to_string(),
            default_tax_rate: TaxRate::from_percent(DEFAULT_TAX_RATE_PERCENT),
            default_rounding: RoundingPolicy::RoundDown,
            min_password_length: MIN_PASSWORD_LENGTH,
        }
    }
}

impl CoreConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `KAKEIBON_LANGUAGE`: Override language (e.g., "en")
    /// - `KAKEIBON_TAX_RATE`: Override default tax rate in percent (e.g., "8")
    /// - `KAKEIBON_ROUNDING`: Override rounding code (`0` down, `1` half up, `2` up)
    /// - `KAKEIBON_MIN_PASSWORD_LENGTH`: Override minimum password length
    ///
    /// Values that do not parse are ignored.
    pub fn from_env() -> Self {
        CoreConfig::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = CoreConfig::default();

        if let Some(language) = lookup("KAKEIBON_LANGUAGE") {
            let language = language.trim();
            if !language.is_empty() {
                config.language = language.to_string();
            }
        }

        if let Some(rate) = lookup("KAKEIBON_TAX_RATE") {
            if let Ok(percent) = rate.trim().parse::<u32>() {
                config.default_tax_rate = TaxRate::from_percent(percent);
            }
        }

        if let Some(rounding) = lookup("KAKEIBON_ROUNDING") {
            if let Ok(code @ 0..=2) = rounding.trim().parse::<i64>() {
                config.default_rounding = RoundingPolicy::from_code(code);
            }
        }

        if let Some(length) = lookup("KAKEIBON_MIN_PASSWORD_LENGTH") {
            if let Ok(min) = length.trim().parse::<usize>() {
                config.min_password_length = min;
            }
        }

        config
    }

    /// Password rules for this configuration.
    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy::new(self.min_password_length)
    }
}
