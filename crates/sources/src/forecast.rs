//! Daily forecast narrative source.
//!
//! The provider drops the day-part narrative late in the afternoon and only
//! brings it back in the early hours, so day-night mode prefers today's
//! day-part before 19:00 and falls back to the first night-part otherwise.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use supp_core::{fields, Error, FieldPackage, Result};
use telemetry::metrics;
use tracing::{debug, info};

use crate::config::{
    select_or_default, ForecastSourceConfig, FORECAST_LANGUAGES, FORECAST_TYPES, FORECAST_UNITS,
    LOCATORS, NARRATIVE_MODES,
};
use crate::forecast_api::{ForecastApi, ForecastRequest};
use crate::rate_limit::{Permit, RateLimiter};
use crate::source::{RawResponse, Source};
use crate::transport::Transport;

/// Hour from which the night-part narrative is used.
const NIGHT_STARTS: u32 = 19;

/// Which narrative to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeMode {
    /// Whole-day narrative.
    Day,
    /// Day-part or night-part narrative, by local hour.
    DayNight,
}

impl NarrativeMode {
    fn from_setting(value: &str) -> Self {
        if value == "day" {
            Self::Day
        } else {
            Self::DayNight
        }
    }
}

/// Narrative extracted from a forecast payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Narrative {
    pub text: Option<String>,
    pub icon: Option<i64>,
}

/// Picks the narrative for `hour` out of a decoded forecast payload.
pub fn select_narrative(json: &Value, mode: NarrativeMode, hour: u32) -> Result<Narrative> {
    if mode == NarrativeMode::Day {
        let text = json
            .get("narrative")
            .ok_or_else(|| Error::decode("missing 'narrative'"))?
            .get(0)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::decode("no whole-day narrative"))?;
        return Ok(Narrative {
            text: Some(text.to_string()),
            icon: None,
        });
    }

    let daypart = json
        .get("daypart")
        .ok_or_else(|| Error::decode("missing 'daypart'"))?
        .get(0)
        .ok_or_else(|| Error::decode("empty 'daypart'"))?;
    let markers = daypart
        .get("dayOrNight")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::decode("missing 'dayOrNight'"))?;
    let position = |marker: &str| markers.iter().position(|m| m.as_str() == Some(marker));

    let day_index = if hour < NIGHT_STARTS {
        position("D")
    } else {
        None
    };
    // A day-part beyond index 1 belongs to tomorrow.
    let index = match day_index {
        Some(i) if i <= 1 => i,
        _ => position("N").ok_or_else(|| Error::decode("no day or night part"))?,
    };

    let text = daypart
        .get("narrative")
        .and_then(|n| n.get(index))
        .and_then(Value::as_str)
        .map(str::to_string);
    let icon = daypart
        .get("iconCode")
        .and_then(|c| c.get(index))
        .and_then(Value::as_i64);

    if text.is_none() && icon.is_none() {
        return Err(Error::decode(format!("no narrative or icon at index {}", index)));
    }
    Ok(Narrative { text, icon })
}

pub struct ForecastSource {
    name: String,
    api: ForecastApi,
    request: ForecastRequest,
    mode: NarrativeMode,
    limiter: RateLimiter,
}

impl std::fmt::Debug for ForecastSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastSource")
            .field("name", &self.name)
            .field("request", &self.request)
            .field("mode", &self.mode)
            .field("limiter", &self.limiter)
            .finish()
    }
}

impl ForecastSource {
    pub const NAME: &'static str = "forecast";

    pub fn new(config: &ForecastSourceConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let name = Self::NAME;
        let api_key = config.common.require_key(name)?;

        let location = config
            .location
            .as_deref()
            .ok_or_else(|| Error::config("forecast source requires 'location'"))?;
        let (locator, location) = location
            .split_once(',')
            .map(|(l, v)| (l.trim(), v.trim()))
            .filter(|(_, v)| !v.is_empty())
            .ok_or_else(|| {
                Error::config(format!(
                    "forecast location '{}' is not '<locator>,<value>'",
                    location
                ))
            })?;

        let request = ForecastRequest {
            forecast: select_or_default(
                name,
                "forecast_type",
                &config.forecast_type,
                FORECAST_TYPES,
                "5day",
            ),
            locator: select_or_default(name, "locator", locator, LOCATORS, "geocode"),
            location: location.to_string(),
            units: select_or_default(name, "units", &config.units, FORECAST_UNITS, "m"),
            language: select_or_default(
                name,
                "language",
                &config.language,
                FORECAST_LANGUAGES,
                "en-GB",
            ),
        };
        let mode = NarrativeMode::from_setting(&select_or_default(
            name,
            "forecast_text",
            &config.forecast_text,
            NARRATIVE_MODES,
            "day-night",
        ));

        let api = ForecastApi::new(api_key, transport, config.common.fetch_retry())?;

        info!(
            source = name,
            interval = config.common.interval,
            lockout = config.common.api_lockout_period,
            max_tries = config.common.max_tries,
            forecast = %request.forecast,
            locator = %request.locator,
            units = %request.units,
            language = %request.language,
            "Forecast source configured"
        );

        Ok(Self {
            name: name.to_string(),
            api,
            request,
            mode,
            limiter: config.common.rate_limiter(),
        })
    }

    /// Replaces the API client, keeping the validated request.
    pub fn with_api(mut self, api: ForecastApi) -> Self {
        self.api = api;
        self
    }

    pub fn request(&self) -> &ForecastRequest {
        &self.request
    }

    pub fn mode(&self) -> NarrativeMode {
        self.mode
    }
}

#[async_trait]
impl Source for ForecastSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_raw(&mut self, now: DateTime<Utc>) -> Option<RawResponse> {
        let ts = now.timestamp();
        match self.limiter.check(ts) {
            Permit::Allowed => {}
            Permit::NotDue => return None,
            Permit::LockedOut => {
                metrics().polls_skipped.inc();
                info!(
                    source = %self.name,
                    lockout = self.limiter.lockout_secs(),
                    "API call inside lockout period skipped"
                );
                return None;
            }
        }

        let body = self.api.forecast(&self.request).await?;
        self.limiter.record_success(ts);
        debug!(source = %self.name, bytes = body.len(), "Downloaded forecast");
        Some(RawResponse::new(body, now))
    }

    fn parse(&self, raw: RawResponse) -> Option<FieldPackage> {
        let narrative = serde_json::from_str::<Value>(&raw.body)
            .map_err(|e| Error::decode(e.to_string()))
            .and_then(|json| select_narrative(&json, self.mode, raw.local_hour()));

        match narrative {
            Ok(narrative) => {
                let mut package = FieldPackage::new(self.name.clone(), raw.fetched_at.timestamp());
                if let Some(text) = narrative.text {
                    package.insert(fields::FORECAST_TEXT, text);
                }
                if let Some(icon) = narrative.icon {
                    package.insert(fields::FORECAST_ICON, icon);
                }
                Some(package)
            }
            Err(e) => {
                metrics().parse_failures.inc();
                info!(source = %self.name, error = %e, "Unusable forecast response");
                None
            }
        }
    }
}
