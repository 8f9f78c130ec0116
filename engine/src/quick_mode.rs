use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentCategory {
    Zone,
    Room,
    HotWater,
    Circulation,
    Ventilation,
}

impl ComponentCategory {
    pub const ALL: [Self; 5] = [
        Self::Zone,
        Self::Room,
        Self::HotWater,
        Self::Circulation,
        Self::Ventilation,
    ];

    /// Domestic hot water side of the installation.
    pub fn is_dhw(self) -> bool {
        matches!(self, Self::HotWater | Self::Circulation)
    }

    /// Categories affected by an applied holiday mode.
    pub fn follows_holiday(self) -> bool {
        !self.is_dhw()
    }
}

/// Temporary override set from the app, usually for the whole system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuickMode {
    /// Heats the cylinder once up to the hot water setpoint.
    #[serde(rename = "QM_HOTWATER_BOOST")]
    HotwaterBoost,
    /// Zones off for 30 minutes, ventilation at the highest level.
    #[serde(rename = "QM_VENTILATION_BOOST")]
    VentilationBoost,
    /// Frost protection for 24 hours, hot water and circulation off.
    #[serde(rename = "QM_ONE_DAY_AWAY")]
    OneDayAway,
    #[serde(rename = "QM_SYSTEM_OFF")]
    SystemOff,
    /// Zones follow Sunday's program for one day.
    #[serde(rename = "QM_ONE_DAY_AT_HOME")]
    OneDayAtHome,
    /// Zones held at the day setpoint for six hours.
    #[serde(rename = "QM_PARTY")]
    Party,
    #[serde(rename = "QM_HOLIDAY")]
    Holiday,
    /// Reported while a single zone runs a quick veto. Applies to nothing.
    #[serde(rename = "QM_QUICK_VETO")]
    QuickVeto,
    #[serde(rename = "QM_COOLING_FOR_X_DAYS")]
    CoolingForXDays,
}

/// How a quick mode picks the target of a component it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickModeTarget {
    FrostProtection,
    /// The component's own high (day) setpoint.
    OwnHigh,
    /// High or low setpoint according to Sunday's time program.
    SundayProgram,
    CoolingHigh,
    MaxLevel,
    MinLevel,
    NoTemperature,
}

impl QuickMode {
    pub const ALL: [Self; 9] = [
        Self::HotwaterBoost,
        Self::VentilationBoost,
        Self::OneDayAway,
        Self::SystemOff,
        Self::OneDayAtHome,
        Self::Party,
        Self::Holiday,
        Self::QuickVeto,
        Self::CoolingForXDays,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HotwaterBoost => "QM_HOTWATER_BOOST",
            Self::VentilationBoost => "QM_VENTILATION_BOOST",
            Self::OneDayAway => "QM_ONE_DAY_AWAY",
            Self::SystemOff => "QM_SYSTEM_OFF",
            Self::OneDayAtHome => "QM_ONE_DAY_AT_HOME",
            Self::Party => "QM_PARTY",
            Self::Holiday => "QM_HOLIDAY",
            Self::QuickVeto => "QM_QUICK_VETO",
            Self::CoolingForXDays => "QM_COOLING_FOR_X_DAYS",
        }
    }

    pub fn for_zone(self) -> bool {
        matches!(
            self,
            Self::VentilationBoost
                | Self::OneDayAway
                | Self::SystemOff
                | Self::OneDayAtHome
                | Self::Party
                | Self::Holiday
                | Self::CoolingForXDays
        )
    }

    pub fn for_room(self) -> bool {
        matches!(self, Self::SystemOff | Self::Holiday)
    }

    /// Hot water and circulation.
    pub fn for_dhw(self) -> bool {
        matches!(
            self,
            Self::HotwaterBoost | Self::OneDayAway | Self::SystemOff | Self::Party | Self::Holiday
        )
    }

    pub fn for_ventilation(self) -> bool {
        matches!(
            self,
            Self::VentilationBoost
                | Self::OneDayAway
                | Self::SystemOff
                | Self::Party
                | Self::Holiday
        )
    }

    pub fn applies_to(self, category: ComponentCategory) -> bool {
        match category {
            ComponentCategory::Zone => self.for_zone(),
            ComponentCategory::Room => self.for_room(),
            ComponentCategory::HotWater | ComponentCategory::Circulation => self.for_dhw(),
            ComponentCategory::Ventilation => self.for_ventilation(),
        }
    }

    /// Every quick mode applicable to `category`, in declaration order.
    pub fn available_for(category: ComponentCategory) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|mode| mode.applies_to(category))
            .collect()
    }

    /// Target rule for `category`, `None` when the mode does not override it.
    ///
    /// The holiday marker never overrides on its own: the holiday record
    /// decides whether holiday applies.
    pub fn target(self, category: ComponentCategory) -> Option<QuickModeTarget> {
        if !self.applies_to(category) {
            return None;
        }

        use QuickModeTarget as T;
        match (category, self) {
            (_, Self::Holiday | Self::QuickVeto) => None,
            (_, Self::SystemOff) => Some(T::NoTemperature),
            (ComponentCategory::Zone, Self::VentilationBoost | Self::OneDayAway) => {
                Some(T::FrostProtection)
            }
            (ComponentCategory::Zone, Self::OneDayAtHome) => Some(T::SundayProgram),
            (ComponentCategory::Zone, Self::Party) => Some(T::OwnHigh),
            (ComponentCategory::Zone, Self::CoolingForXDays) => Some(T::CoolingHigh),
            (ComponentCategory::HotWater, Self::HotwaterBoost | Self::Party) => Some(T::OwnHigh),
            (ComponentCategory::HotWater, Self::OneDayAway) => Some(T::FrostProtection),
            (ComponentCategory::Circulation, _) => Some(T::NoTemperature),
            (ComponentCategory::Ventilation, Self::VentilationBoost) => Some(T::MaxLevel),
            (ComponentCategory::Ventilation, Self::OneDayAway) => Some(T::MinLevel),
            (ComponentCategory::Ventilation, Self::Party) => Some(T::OwnHigh),
            _ => None,
        }
    }

    /// An overriding quick mode hides any quick veto on the component.
    pub fn masks_quick_veto(self, category: ComponentCategory) -> bool {
        self.target(category).is_some()
    }
}

impl fmt::Display for QuickMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuickMode {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == name)
            .ok_or_else(|| Error::unknown_mode("quick mode", name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickModeScope {
    #[default]
    System,
    /// Restricted to the component with this id.
    Component(String),
}

/// The quick mode currently running, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveQuickMode {
    #[serde(rename = "quickMode")]
    pub mode: QuickMode,
    /// Remaining minutes as reported upstream, often absent or zero.
    /// Informational only, resolution never reads it.
    #[serde(default)]
    pub duration: Option<u16>,
    #[serde(default)]
    pub scope: QuickModeScope,
}

impl ActiveQuickMode {
    pub fn system(mode: QuickMode) -> Self {
        Self {
            mode,
            duration: None,
            scope: QuickModeScope::System,
        }
    }

    pub fn for_component(mode: QuickMode, component_id: impl Into<String>) -> Self {
        Self {
            mode,
            duration: None,
            scope: QuickModeScope::Component(component_id.into()),
        }
    }

    pub fn with_duration(mut self, minutes: u16) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn is_in_scope(&self, component_id: &str) -> bool {
        match &self.scope {
            QuickModeScope::System => true,
            QuickModeScope::Component(id) => id == component_id,
        }
    }

    /// Target rule for one component, `None` when this quick mode leaves it alone.
    pub fn target_for(
        &self,
        category: ComponentCategory,
        component_id: &str,
    ) -> Option<QuickModeTarget> {
        if !self.is_in_scope(component_id) {
            return None;
        }
        self.mode.target(category)
    }
}
