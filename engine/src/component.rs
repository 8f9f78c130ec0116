use serde::{Deserialize, Serialize};

use crate::{
    mode::{OperatingMode, SettingMode},
    quick_mode::ComponentCategory,
    quick_veto::QuickVeto,
    timeprogram::TimeProgram,
};

/// Something with a time program and an operating mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub operating_mode: OperatingMode,
    pub time_program: TimeProgram,
    /// Day or comfort setpoint, the fan level for ventilation.
    #[serde(default)]
    pub target_high: Option<f32>,
    /// Set-back setpoint.
    #[serde(default)]
    pub target_low: Option<f32>,
}

impl Function {
    pub fn new(operating_mode: OperatingMode, time_program: TimeProgram) -> Self {
        Self {
            operating_mode,
            time_program,
            target_high: None,
            target_low: None,
        }
    }

    pub fn with_targets(mut self, target_high: Option<f32>, target_low: Option<f32>) -> Self {
        self.target_high = target_high;
        self.target_low = target_low;
        self
    }

    pub fn target_for(&self, setting: SettingMode) -> Option<f32> {
        if setting.is_high() {
            self.target_high
        } else {
            self.target_low
        }
    }
}

/// Read access shared by every resolvable component.
pub trait Component {
    fn id(&self) -> &str;

    fn category(&self) -> ComponentCategory;

    /// Function whose operating mode currently drives the component.
    fn function(&self) -> &Function;

    /// Heating side, used by quick modes that pick a comfort setpoint.
    fn heating(&self) -> &Function {
        self.function()
    }

    fn cooling(&self) -> Option<&Function> {
        None
    }

    /// True when `function()` is the cooling side.
    fn is_cooling(&self) -> bool {
        false
    }

    fn quick_veto(&self) -> Option<&QuickVeto> {
        None
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActiveFunction {
    #[default]
    Standby,
    Heating,
    Cooling,
}

/// Heating circuit, optionally able to cool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    pub heating: Function,
    #[serde(default)]
    pub cooling: Option<Function>,
    #[serde(default)]
    pub active_function: ActiveFunction,
    #[serde(default)]
    pub quick_veto: Option<QuickVeto>,
    /// Room by room: the zone follows its rooms.
    #[serde(default)]
    pub rbr: bool,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl Zone {
    pub fn new(id: impl Into<String>, heating: Function) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            temperature: None,
            heating,
            cooling: None,
            active_function: ActiveFunction::Standby,
            quick_veto: None,
            rbr: false,
            enabled: true,
        }
    }
}

impl Component for Zone {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Zone
    }

    fn function(&self) -> &Function {
        match (&self.cooling, self.active_function) {
            (Some(cooling), ActiveFunction::Cooling) => cooling,
            _ => &self.heating,
        }
    }

    fn heating(&self) -> &Function {
        &self.heating
    }

    fn cooling(&self) -> Option<&Function> {
        self.cooling.as_ref()
    }

    fn is_cooling(&self) -> bool {
        self.cooling.is_some() && self.active_function == ActiveFunction::Cooling
    }

    fn quick_veto(&self) -> Option<&QuickVeto> {
        self.quick_veto.as_ref()
    }
}

/// Room controlled by radio thermostats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    pub function: Function,
    #[serde(default)]
    pub quick_veto: Option<QuickVeto>,
    #[serde(default)]
    pub child_lock: bool,
    #[serde(default)]
    pub window_open: bool,
    #[serde(default)]
    pub humidity: Option<f32>,
}

impl Room {
    pub fn new(id: impl Into<String>, function: Function) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            temperature: None,
            function,
            quick_veto: None,
            child_lock: false,
            window_open: false,
            humidity: None,
        }
    }
}

impl Component for Room {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> ComponentCategory {
        ComponentCategory::Room
    }

    fn function(&self) -> &Function {
        &self.function
    }

    fn quick_veto(&self) -> Option<&QuickVeto> {
        self.quick_veto.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotWater {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    pub function: Function,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circulation {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub function: Function,
}

/// Fan unit. Targets are levels rather than temperatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ventilation {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub function: Function,
}

impl HotWater {
    pub fn new(id: impl Into<String>, function: Function) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            temperature: None,
            function,
        }
    }
}

impl Circulation {
    pub fn new(id: impl Into<String>, function: Function) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            function,
        }
    }
}

impl Ventilation {
    pub fn new(id: impl Into<String>, function: Function) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            function,
        }
    }
}

macro_rules! impl_component {
    ($ty:ty, $category:expr) => {
        impl Component for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn category(&self) -> ComponentCategory {
                $category
            }

            fn function(&self) -> &Function {
                &self.function
            }
        }
    };
}

impl_component!(HotWater, ComponentCategory::HotWater);
impl_component!(Circulation, ComponentCategory::Circulation);
impl_component!(Ventilation, ComponentCategory::Ventilation);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeprogram::TimeProgramDay;

    fn function(mode: OperatingMode) -> Function {
        Function::new(
            mode,
            TimeProgram::uniform(TimeProgramDay::constant(SettingMode::Day)),
        )
        .with_targets(Some(21.0), Some(17.0))
    }

    #[test]
    fn zone_follows_cooling_only_when_cooling_is_active() {
        let mut zone = Zone::new("zone-1", function(OperatingMode::Auto));
        zone.cooling = Some(function(OperatingMode::Off));

        assert_eq!(zone.function().operating_mode, OperatingMode::Auto);
        assert!(!zone.is_cooling());

        zone.active_function = ActiveFunction::Cooling;
        assert_eq!(zone.function().operating_mode, OperatingMode::Off);
        assert!(zone.is_cooling());
        assert_eq!(zone.heating().operating_mode, OperatingMode::Auto);

        zone.cooling = None;
        assert_eq!(zone.function().operating_mode, OperatingMode::Auto);
        assert!(!zone.is_cooling());
    }

    #[test]
    fn target_follows_setting() {
        let function = function(OperatingMode::Auto);

        assert_eq!(function.target_for(SettingMode::Day), Some(21.0));
        assert_eq!(function.target_for(SettingMode::On), Some(21.0));
        assert_eq!(function.target_for(SettingMode::Night), Some(17.0));
        assert_eq!(function.target_for(SettingMode::Off), Some(17.0));
    }

    #[test]
    fn dhw_components_carry_no_veto() {
        let hot_water = HotWater::new("dhw", function(OperatingMode::On));
        let circulation = Circulation::new("circ", function(OperatingMode::Off));

        assert!(hot_water.quick_veto().is_none());
        assert_eq!(hot_water.category(), ComponentCategory::HotWater);
        assert_eq!(circulation.category(), ComponentCategory::Circulation);
        assert_eq!(circulation.id(), "circ");
    }
}
