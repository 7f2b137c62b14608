//! Events consumed from the primary archive pipeline.

use serde::{Deserialize, Serialize};

/// Unit system tag carried by every primary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum UnitSystem {
    Us,
    #[default]
    Metric,
    MetricWx,
}

impl UnitSystem {
    pub fn code(self) -> u8 {
        match self {
            Self::Us => 0x01,
            Self::Metric => 0x10,
            Self::MetricWx => 0x11,
        }
    }
}

impl From<UnitSystem> for u8 {
    fn from(units: UnitSystem) -> Self {
        units.code()
    }
}

impl TryFrom<u8> for UnitSystem {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0x01 => Ok(Self::Us),
            0x10 => Ok(Self::Metric),
            0x11 => Ok(Self::MetricWx),
            other => Err(format!("unknown unit system {}", other)),
        }
    }
}

/// "Archive period elapsed" event: the authoritative fields of the cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEvent {
    /// Unix seconds at the end of the archive period.
    pub date_time: i64,
    pub us_units: UnitSystem,
    /// Archive interval in minutes.
    pub interval: u32,
}

/// The volatile fields of a primary loop tick.
///
/// Keys missing from the packet deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoopPacket {
    pub date_time: Option<i64>,
    pub forecast_icon: Option<i64>,
    pub forecast_rule: Option<u16>,
    pub storm_rain: Option<f64>,
    pub storm_start: Option<i64>,
    pub max_solar_rad: Option<f64>,
}

/// One message from the primary pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum PrimaryEvent {
    Loop { packet: LoopPacket },
    Archive { record: ArchiveEvent },
}
