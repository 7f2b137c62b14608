//! Latest console values from the loop stream.

use supp_core::{fields, forecast_rule_text, FieldValue, LoopPacket};
use tracing::debug;

/// Slow-changing loop fields held until the next archive record.
///
/// Every loop packet overwrites every tracked value, so a field the console
/// stops reporting is cleared rather than carried forward.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stash {
    forecast_icon: Option<i64>,
    forecast_rule: Option<u16>,
    storm_rain: Option<f64>,
    storm_start: Option<i64>,
    max_solar_rad: Option<f64>,
}

impl Stash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, packet: &LoopPacket) {
        self.forecast_icon = packet.forecast_icon;
        self.forecast_rule = packet.forecast_rule;
        self.storm_rain = packet.storm_rain;
        self.storm_start = packet.storm_start;
        self.max_solar_rad = packet.max_solar_rad;
    }

    /// Fields to merge into the record. Absent values contribute nothing.
    pub fn fields(&self) -> Vec<(String, FieldValue)> {
        let mut out = Vec::with_capacity(5);

        if let Some(icon) = self.forecast_icon {
            out.push((fields::VANTAGE_FORECAST_ICON.to_string(), FieldValue::Int(icon)));
        }
        if let Some(rule) = self.forecast_rule {
            match forecast_rule_text(rule) {
                Some(text) => out.push((
                    fields::VANTAGE_FORECAST_RULE.to_string(),
                    FieldValue::Text(text.to_string()),
                )),
                None => debug!(rule = rule, "Could not decode console forecast rule"),
            }
        }
        if let Some(rain) = self.storm_rain {
            out.push((fields::STORM_RAIN.to_string(), FieldValue::Real(rain)));
        }
        if let Some(start) = self.storm_start {
            out.push((fields::STORM_START.to_string(), FieldValue::Timestamp(start)));
        }
        if let Some(rad) = self.max_solar_rad {
            out.push((fields::MAX_SOLAR_RAD.to_string(), FieldValue::Real(rad)));
        }

        out
    }
}
