//! Field packages and composite archive records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::events::{ArchiveEvent, UnitSystem};
use crate::icons::WdIcon;

/// Column names any source or the stash may contribute.
pub mod fields {
    pub const FORECAST_ICON: &str = "forecast_icon";
    pub const FORECAST_TEXT: &str = "forecast_text";
    pub const CURRENT_ICON: &str = "current_icon";
    pub const CURRENT_TEXT: &str = "current_text";
    pub const VANTAGE_FORECAST_ICON: &str = "vantage_forecast_icon";
    pub const VANTAGE_FORECAST_RULE: &str = "vantage_forecast_rule";
    pub const STORM_RAIN: &str = "storm_rain";
    pub const STORM_START: &str = "storm_start";
    pub const MAX_SOLAR_RAD: &str = "max_solar_rad";
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Real(f64),
    Int(i64),
    Text(String),
    Icon(WdIcon),
    /// Unix seconds.
    Timestamp(i64),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            Self::Int(v) | Self::Timestamp(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) | Self::Timestamp(v) => Some(*v),
            Self::Icon(icon) => Some(icon.code() as i64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<WdIcon> for FieldValue {
    fn from(v: WdIcon) -> Self {
        Self::Icon(v)
    }
}

/// Data produced by one successful source poll.
///
/// Serializes with a `"type": "data"` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "data")]
pub struct FieldPackage {
    pub source: String,
    /// Unix seconds of the fetch that produced this package.
    pub fetched_at: i64,
    pub fields: BTreeMap<String, FieldValue>,
}

impl FieldPackage {
    pub fn new(source: impl Into<String>, fetched_at: i64) -> Self {
        Self {
            source: source.into(),
            fetched_at,
            fields: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The merged row persisted once per archive period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRecord {
    /// Unix seconds, unique per row.
    pub timestamp: i64,
    pub unit_system: UnitSystem,
    pub interval: u32,
    pub fields: BTreeMap<String, FieldValue>,
}

impl CompositeRecord {
    /// Starts an empty record carrying the event's authoritative fields.
    pub fn from_event(event: &ArchiveEvent) -> Self {
        Self {
            timestamp: event.date_time,
            unit_system: event.us_units,
            interval: event.interval,
            fields: BTreeMap::new(),
        }
    }

    /// Merges fields, later values replacing earlier ones.
    pub fn merge<I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = (String, FieldValue)>,
    {
        self.fields.extend(fields);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}
