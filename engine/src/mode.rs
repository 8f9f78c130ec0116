use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{error::Error, quick_mode::QuickMode};

/// Mode a component is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatingMode {
    /// Follow the time program.
    Auto,
    On,
    Off,
    Day,
    Night,
    Manual,
    QuickVeto,
}

impl OperatingMode {
    pub const ALL: [Self; 7] = [
        Self::Auto,
        Self::On,
        Self::Off,
        Self::Day,
        Self::Night,
        Self::Manual,
        Self::QuickVeto,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::On => "ON",
            Self::Off => "OFF",
            Self::Day => "DAY",
            Self::Night => "NIGHT",
            Self::Manual => "MANUAL",
            Self::QuickVeto => "QUICK_VETO",
        }
    }
}

impl FromStr for OperatingMode {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == name)
            .ok_or_else(|| Error::unknown_mode("operating mode", name))
    }
}

/// Value carried by a time program slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SettingMode {
    On,
    Off,
    Day,
    Night,
}

impl SettingMode {
    pub const ALL: [Self; 4] = [Self::On, Self::Off, Self::Day, Self::Night];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
            Self::Day => "DAY",
            Self::Night => "NIGHT",
        }
    }

    /// DAY and ON select the high setpoint, NIGHT and OFF the low one.
    pub fn is_high(self) -> bool {
        matches!(self, Self::Day | Self::On)
    }
}

impl FromStr for SettingMode {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == name)
            .ok_or_else(|| Error::unknown_mode("setting mode", name))
    }
}

/// Label of the layer that won the resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Mode {
    Operating(OperatingMode),
    Quick(QuickMode),
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Operating(mode) => mode.as_str(),
            Self::Quick(mode) => mode.as_str(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<OperatingMode> for Mode {
    fn from(mode: OperatingMode) -> Self {
        Self::Operating(mode)
    }
}

impl From<QuickMode> for Mode {
    fn from(mode: QuickMode) -> Self {
        Self::Quick(mode)
    }
}

/// Effective state of a component at one instant.
///
/// `target_temperature` is a fan level for ventilation. `sub_mode` is only set
/// when `current_mode` is AUTO and carries the time program setting in force.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActiveMode {
    #[serde(rename = "currentMode")]
    pub current_mode: Mode,
    #[serde(rename = "targetTemperature")]
    pub target_temperature: Option<f32>,
    #[serde(rename = "subMode")]
    pub sub_mode: Option<SettingMode>,
}

impl ActiveMode {
    pub fn new(current_mode: impl Into<Mode>, target_temperature: Option<f32>) -> Self {
        Self {
            current_mode: current_mode.into(),
            target_temperature,
            sub_mode: None,
        }
    }

    pub fn auto(setting: SettingMode, target_temperature: Option<f32>) -> Self {
        Self {
            current_mode: Mode::Operating(OperatingMode::Auto),
            target_temperature,
            sub_mode: Some(setting),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_operating_mode_name() {
        for mode in OperatingMode::ALL {
            assert_eq!(mode.as_str().parse::<OperatingMode>(), Ok(mode));
        }
    }

    #[test]
    fn rejects_unknown_setting_mode() {
        let err = "BOOST".parse::<SettingMode>().unwrap_err();

        assert_eq!(
            err,
            Error::UnknownMode {
                kind: "setting mode",
                name: "BOOST".to_string(),
            }
        );
    }

    #[test]
    fn operating_mode_names_match_serde() {
        let json = serde_json::to_string(&OperatingMode::QuickVeto).unwrap();
        assert_eq!(json, "\"QUICK_VETO\"");

        let parsed: SettingMode = serde_json::from_str("\"NIGHT\"").unwrap();
        assert_eq!(parsed, SettingMode::Night);
    }

    #[test]
    fn active_mode_serializes_labels() {
        let mode = ActiveMode::auto(SettingMode::Day, Some(21.0));
        let json = serde_json::to_value(mode).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "currentMode": "AUTO",
                "targetTemperature": 21.0,
                "subMode": "DAY",
            })
        );
    }
}
