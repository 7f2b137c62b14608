//! Per-source configuration.
//!
//! Selector values outside the provider's accepted set fall back to the
//! provider default with a warning. Missing credentials or locations are
//! configuration errors: the source is left out for the process lifetime.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use supp_core::{Error, Result};
use tracing::warn;

use crate::rate_limit::RateLimiter;
use crate::transport::FetchRetry;

pub const FORECAST_TYPES: &[&str] = &["3day", "5day", "7day", "10day", "15day"];
pub const NARRATIVE_MODES: &[&str] = &["day", "day-night"];
pub const LOCATORS: &[&str] = &["geocode", "iataCode", "icaoCode", "placeid", "postalKey"];
pub const FORECAST_UNITS: &[&str] = &["e", "m", "s", "h"];
pub const FORECAST_LANGUAGES: &[&str] = &[
    "ar-AE", "az-AZ", "bg-BG", "bn-BD", "bn-IN", "bs-BA", "ca-ES", "cs-CZ", "da-DK", "de-DE",
    "el-GR", "en-GB", "en-IN", "en-US", "es-AR", "es-ES", "es-LA", "es-MX", "es-UN", "es-US",
    "et-EE", "fa-IR", "fi-FI", "fr-CA", "fr-FR", "gu-IN", "he-IL", "hi-IN", "hr-HR", "hu-HU",
    "in-ID", "is-IS", "it-IT", "iw-IL", "ja-JP", "jv-ID", "ka-GE", "kk-KZ", "kn-IN", "ko-KR",
    "lt-LT", "lv-LV", "mk-MK", "mn-MN", "ms-MY", "nl-NL", "no-NO", "pl-PL", "pt-BR", "pt-PT",
    "ro-RO", "ru-RU", "si-LK", "sk-SK", "sl-SI", "sq-AL", "sr-BA", "sr-ME", "sr-RS", "sv-SE",
    "sw-KE", "ta-IN", "ta-LK", "te-IN", "tg-TJ", "th-TH", "tk-TM", "tl-PH", "tr-TR", "uk-UA",
    "ur-PK", "uz-UZ", "vi-VN", "zh-CN", "zh-HK", "zh-TW",
];

pub const CONDITIONS_UNITS: &[&str] = &["auto", "ca", "uk2", "us", "si"];
pub const CONDITIONS_LANGUAGES: &[&str] = &[
    "ar", "az", "be", "bg", "bs", "ca", "cs", "da", "de", "el", "en", "es", "et", "fi", "fr",
    "hr", "hu", "id", "is", "it", "ja", "ka", "ko", "kw", "nb", "nl", "pl", "pt", "ro", "ru",
    "sk", "sl", "sr", "sv", "tet", "tr", "uk", "x-pig-latin", "zh", "zh-tw",
];
/// Forecast blocks the conditions provider can return besides `currently`.
pub const CONDITIONS_BLOCKS: &[&str] = &["minutely", "hourly", "daily", "alerts"];

/// Settings shared by every source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub api_key: Option<String>,
    /// Seconds between polls.
    #[serde(default = "default_interval")]
    pub interval: u64,
    /// Minimum seconds between any two calls.
    #[serde(default = "default_lockout")]
    pub api_lockout_period: u64,
    #[serde(default = "default_max_tries")]
    pub max_tries: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    1800
}

fn default_lockout() -> u64 {
    60
}

fn default_max_tries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_key: None,
            interval: default_interval(),
            api_lockout_period: default_lockout(),
            max_tries: default_max_tries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SourceConfig {
    /// Returns the credential or a [`Error::MissingCredential`] for `source`.
    pub fn require_key(&self, source: &str) -> Result<String> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => Err(Error::missing_credential(source)),
        }
    }

    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.interval, self.api_lockout_period)
    }

    pub fn fetch_retry(&self) -> FetchRetry {
        FetchRetry {
            max_tries: self.max_tries.max(1),
            backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Daily forecast narrative provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastSourceConfig {
    #[serde(flatten)]
    pub common: SourceConfig,
    #[serde(default = "default_forecast_type")]
    pub forecast_type: String,
    /// `day` for the whole-day narrative, `day-night` for the day or night
    /// part narrative.
    #[serde(default = "default_forecast_text")]
    pub forecast_text: String,
    /// `<locator>,<value>`, e.g. `geocode,-27.45,153.03` or `postalKey,4000:AU`.
    pub location: Option<String>,
    #[serde(default = "default_forecast_units")]
    pub units: String,
    #[serde(default = "default_forecast_language")]
    pub language: String,
}

fn default_forecast_type() -> String {
    "5day".to_string()
}

fn default_forecast_text() -> String {
    "day-night".to_string()
}

fn default_forecast_units() -> String {
    "m".to_string()
}

fn default_forecast_language() -> String {
    "en-GB".to_string()
}

impl Default for ForecastSourceConfig {
    fn default() -> Self {
        Self {
            common: SourceConfig::default(),
            forecast_type: default_forecast_type(),
            forecast_text: default_forecast_text(),
            location: None,
            units: default_forecast_units(),
            language: default_forecast_language(),
        }
    }
}

/// Current conditions (and optional summary forecast) provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionsSourceConfig {
    #[serde(flatten)]
    pub common: SourceConfig,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default = "default_conditions_units")]
    pub units: String,
    #[serde(default = "default_conditions_language")]
    pub language: String,
    #[serde(default = "default_block")]
    pub block: String,
    /// Also extract the block summary as forecast fields.
    #[serde(default = "default_enabled")]
    pub forecast: bool,
}

fn default_conditions_units() -> String {
    "ca".to_string()
}

fn default_conditions_language() -> String {
    "en".to_string()
}

fn default_block() -> String {
    "daily".to_string()
}

impl Default for ConditionsSourceConfig {
    fn default() -> Self {
        Self {
            common: SourceConfig::default(),
            latitude: None,
            longitude: None,
            units: default_conditions_units(),
            language: default_conditions_language(),
            block: default_block(),
            forecast: true,
        }
    }
}

/// The `[sources]` config section. Absent subsections disable the source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub forecast: Option<ForecastSourceConfig>,
    #[serde(default)]
    pub conditions: Option<ConditionsSourceConfig>,
}

/// Returns `value` if it is one of `valid`, otherwise `default` with a
/// warning naming the offending setting.
pub(crate) fn select_or_default(
    source: &str,
    setting: &str,
    value: &str,
    valid: &[&str],
    default: &str,
) -> String {
    match valid.iter().find(|v| v.eq_ignore_ascii_case(value.trim())) {
        Some(v) => v.to_string(),
        None => {
            warn!(
                source = source,
                setting = setting,
                value = value,
                default = default,
                "Unsupported setting, using default"
            );
            default.to_string()
        }
    }
}
