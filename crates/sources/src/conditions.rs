//! Current conditions source.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use serde_json::{Map, Value};
use supp_core::{fields, Error, FieldPackage, Result, WdIcon};
use telemetry::metrics;
use tracing::{debug, info, warn};

use crate::conditions_api::ConditionsApi;
use crate::config::{
    select_or_default, ConditionsSourceConfig, CONDITIONS_BLOCKS, CONDITIONS_LANGUAGES,
    CONDITIONS_UNITS,
};
use crate::rate_limit::{Permit, RateLimiter};
use crate::source::{RawResponse, Source};
use crate::transport::Transport;

/// Daytime is [06:00, 18:00) local.
pub fn is_daytime(hour: u32) -> bool {
    (6..18).contains(&hour)
}

/// Maps a provider condition code to the local icon set.
///
/// Codes with an explicit `-day` or `-night` suffix pick their own variant;
/// the rest use `is_day`.
pub fn icon_for(code: &str, is_day: bool) -> Option<WdIcon> {
    let icon = match code {
        "clear-day" => WdIcon::Sunny,
        "clear-night" => WdIcon::ClearNight,
        "partly-cloudy-day" => WdIcon::PartlyCloudy,
        "partly-cloudy-night" => WdIcon::CloudyNight,
        "cloudy" if is_day => WdIcon::Overcast,
        "cloudy" => WdIcon::NightOvercast,
        "rain" if is_day => WdIcon::Rain,
        "rain" => WdIcon::NightRain,
        "snow" if is_day => WdIcon::Snow,
        "snow" => WdIcon::NightSnow,
        "fog" if is_day => WdIcon::Fog,
        "fog" => WdIcon::NightFog,
        "thunderstorm" if is_day => WdIcon::Thunderstorms,
        "thunderstorm" => WdIcon::NightThunder,
        "sleet" | "hail" => WdIcon::Sleet,
        "wind" => WdIcon::Windy,
        "tornado" => WdIcon::Tornado,
        _ => return None,
    };
    Some(icon)
}

fn summary_and_icon(block: &Value, is_day: bool) -> (Option<String>, Option<WdIcon>) {
    let summary = block
        .get("summary")
        .and_then(Value::as_str)
        .map(str::to_string);
    let icon = block.get("icon").and_then(Value::as_str).and_then(|code| {
        let icon = icon_for(code, is_day);
        if icon.is_none() {
            debug!(code = code, "Unknown condition code");
        }
        icon
    });
    (summary, icon)
}

fn local_hour_of(object: &Map<String, Value>, fallback: u32) -> u32 {
    object
        .get("currently")
        .and_then(|c| c.get("time"))
        .and_then(Value::as_i64)
        .and_then(|ts| Local.timestamp_opt(ts, 0).single())
        .map(|t| t.hour())
        .unwrap_or(fallback)
}

/// Extracts current and (optionally) block summary fields from a payload.
pub fn decode_conditions(
    body: &str,
    block: &str,
    include_forecast: bool,
    source: &str,
    fetched_at: i64,
    fallback_hour: u32,
) -> Result<FieldPackage> {
    let json: Value = serde_json::from_str(body).map_err(|e| Error::decode(e.to_string()))?;
    let object = json
        .as_object()
        .ok_or_else(|| Error::decode("payload is not an object"))?;

    match object.get("flags") {
        Some(flags) if flags.get("darksky-unavailable").is_some() => {
            warn!(source = source, "Provider data for this location temporarily unavailable");
        }
        Some(_) => {}
        None => debug!(source = source, "No flags object in response"),
    }

    let currently = object.get("currently");
    let forecast = if include_forecast {
        object.get(block)
    } else {
        None
    };
    if currently.is_none() && forecast.is_none() {
        return Err(Error::decode(format!(
            "neither 'currently' nor '{}' present",
            block
        )));
    }

    let is_day = is_daytime(local_hour_of(object, fallback_hour));
    let mut package = FieldPackage::new(source, fetched_at);

    if let Some(currently) = currently {
        let (text, icon) = summary_and_icon(currently, is_day);
        if let Some(text) = text {
            package.insert(fields::CURRENT_TEXT, text);
        }
        if let Some(icon) = icon {
            package.insert(fields::CURRENT_ICON, icon);
        }
    }
    if let Some(forecast) = forecast {
        let (text, icon) = summary_and_icon(forecast, is_day);
        if let Some(text) = text {
            package.insert(fields::FORECAST_TEXT, text);
        }
        if let Some(icon) = icon {
            package.insert(fields::FORECAST_ICON, icon);
        }
    }

    if package.is_empty() {
        return Err(Error::decode("no summary or icon in response"));
    }
    Ok(package)
}

pub struct ConditionsSource {
    name: String,
    api: ConditionsApi,
    block: String,
    language: String,
    units: String,
    include_forecast: bool,
    limiter: RateLimiter,
}

impl std::fmt::Debug for ConditionsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionsSource")
            .field("name", &self.name)
            .field("block", &self.block)
            .field("language", &self.language)
            .field("units", &self.units)
            .field("include_forecast", &self.include_forecast)
            .field("limiter", &self.limiter)
            .finish()
    }
}

impl ConditionsSource {
    pub const NAME: &'static str = "conditions";

    pub fn new(config: &ConditionsSourceConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        let name = Self::NAME;
        let key = config.common.require_key(name)?;
        let (latitude, longitude) = match (config.latitude, config.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                return Err(Error::config(
                    "conditions source requires 'latitude' and 'longitude'",
                ))
            }
        };

        let block = select_or_default(name, "block", &config.block, CONDITIONS_BLOCKS, "daily");
        let language = select_or_default(
            name,
            "language",
            &config.language,
            CONDITIONS_LANGUAGES,
            "en",
        );
        let units = select_or_default(name, "units", &config.units, CONDITIONS_UNITS, "ca");
        let api = ConditionsApi::new(
            key,
            latitude,
            longitude,
            transport,
            config.common.fetch_retry(),
        )?;

        info!(
            source = name,
            interval = config.common.interval,
            lockout = config.common.api_lockout_period,
            max_tries = config.common.max_tries,
            block = %block,
            units = %units,
            language = %language,
            forecast = config.forecast,
            "Conditions source configured"
        );

        Ok(Self {
            name: name.to_string(),
            api,
            block,
            language,
            units,
            include_forecast: config.forecast,
            limiter: config.common.rate_limiter(),
        })
    }

    pub fn with_api(mut self, api: ConditionsApi) -> Self {
        self.api = api;
        self
    }
}

#[async_trait]
impl Source for ConditionsSource {
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

        let body = self
            .api
            .data(&self.block, &self.language, &self.units)
            .await?;
        self.limiter.record_success(ts);
        debug!(source = %self.name, bytes = body.len(), "Downloaded conditions");
        Some(RawResponse::new(body, now))
    }

    fn parse(&self, raw: RawResponse) -> Option<FieldPackage> {
        let decoded = decode_conditions(
            &raw.body,
            &self.block,
            self.include_forecast,
            &self.name,
            raw.fetched_at.timestamp(),
            raw.local_hour(),
        );
        match decoded {
            Ok(package) => Some(package),
            Err(e) => {
                metrics().parse_failures.inc();
                info!(source = %self.name, error = %e, "Unusable conditions response");
                None
            }
        }
    }
}
