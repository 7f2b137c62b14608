//! Local weather icon set.
//!
//! Numbering follows the Weather Display icon set consumed by the
//! downstream dashboards, so the discriminants are part of the storage
//! format and must not change.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum WdIcon {
    Sunny = 0,
    ClearNight = 1,
    Cloudy = 2,
    CloudyNight = 4,
    Fog = 6,
    Haze = 7,
    HeavyRain = 8,
    MainlyFine = 9,
    NightFog = 11,
    NightHeavyRain = 12,
    NightOvercast = 13,
    NightRain = 14,
    NightShowers = 15,
    NightSnow = 16,
    NightThunder = 17,
    Overcast = 18,
    PartlyCloudy = 19,
    Rain = 20,
    Showers = 22,
    Sleet = 23,
    SleetShowers = 24,
    Snow = 25,
    SnowShowers = 27,
    ThunderShowers = 29,
    Thunderstorms = 31,
    Tornado = 32,
    Windy = 33,
}

impl WdIcon {
    const ALL: [WdIcon; 27] = [
        Self::Sunny,
        Self::ClearNight,
        Self::Cloudy,
        Self::CloudyNight,
        Self::Fog,
        Self::Haze,
        Self::HeavyRain,
        Self::MainlyFine,
        Self::NightFog,
        Self::NightHeavyRain,
        Self::NightOvercast,
        Self::NightRain,
        Self::NightShowers,
        Self::NightSnow,
        Self::NightThunder,
        Self::Overcast,
        Self::PartlyCloudy,
        Self::Rain,
        Self::Showers,
        Self::Sleet,
        Self::SleetShowers,
        Self::Snow,
        Self::SnowShowers,
        Self::ThunderShowers,
        Self::Thunderstorms,
        Self::Tornado,
        Self::Windy,
    ];

    /// Numeric icon code as stored.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|icon| icon.code() == code)
    }

    /// Whether this icon belongs to the night-time set.
    pub fn is_night(self) -> bool {
        matches!(
            self,
            Self::ClearNight
                | Self::CloudyNight
                | Self::NightFog
                | Self::NightHeavyRain
                | Self::NightOvercast
                | Self::NightRain
                | Self::NightShowers
                | Self::NightSnow
                | Self::NightThunder
        )
    }
}

impl From<WdIcon> for u8 {
    fn from(icon: WdIcon) -> Self {
        icon.code()
    }
}

impl TryFrom<u8> for WdIcon {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown icon code {}", code))
    }
}
