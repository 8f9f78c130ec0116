use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::{
    component::{Circulation, Component, Function, HotWater, Room, Ventilation, Zone},
    config::ResolverConfig,
    holiday::HolidayMode,
    mode::{ActiveMode, OperatingMode, SettingMode},
    quick_mode::{ActiveQuickMode, ComponentCategory, QuickMode, QuickModeTarget},
    timeprogram::{minute_of_day, DayOfWeek},
};

/// Computes what a component is really doing at a given instant.
///
/// Layers are checked top-down and the first one that applies wins:
/// holiday mode, quick mode, quick veto, then the component's own operating
/// mode. Inputs are never modified and no clock is read, so the same inputs
/// always give the same answer.
#[derive(Debug, Clone, Default)]
pub struct ActiveModeResolver {
    config: ResolverConfig,
}

impl ActiveModeResolver {
    pub fn new(mut config: ResolverConfig) -> Self {
        config.sanitize();
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn resolve_zone(
        &self,
        zone: &Zone,
        holiday: &HolidayMode,
        quick_mode: Option<&ActiveQuickMode>,
        now: NaiveDateTime,
    ) -> ActiveMode {
        self.resolve(zone, holiday, quick_mode, now)
    }

    pub fn resolve_room(
        &self,
        room: &Room,
        holiday: &HolidayMode,
        quick_mode: Option<&ActiveQuickMode>,
        now: NaiveDateTime,
    ) -> ActiveMode {
        self.resolve(room, holiday, quick_mode, now)
    }

    /// Holiday mode never changes hot water.
    pub fn resolve_hot_water(
        &self,
        hot_water: &HotWater,
        holiday: &HolidayMode,
        quick_mode: Option<&ActiveQuickMode>,
        now: NaiveDateTime,
    ) -> ActiveMode {
        self.resolve(hot_water, holiday, quick_mode, now)
    }

    /// Holiday mode never changes circulation, and circulation has no target.
    pub fn resolve_circulation(
        &self,
        circulation: &Circulation,
        holiday: &HolidayMode,
        quick_mode: Option<&ActiveQuickMode>,
        now: NaiveDateTime,
    ) -> ActiveMode {
        self.resolve(circulation, holiday, quick_mode, now)
    }

    pub fn resolve_ventilation(
        &self,
        ventilation: &Ventilation,
        holiday: &HolidayMode,
        quick_mode: Option<&ActiveQuickMode>,
        now: NaiveDateTime,
    ) -> ActiveMode {
        self.resolve(ventilation, holiday, quick_mode, now)
    }

    pub fn resolve(
        &self,
        component: &dyn Component,
        holiday: &HolidayMode,
        quick_mode: Option<&ActiveQuickMode>,
        now: NaiveDateTime,
    ) -> ActiveMode {
        let category = component.category();

        if category.follows_holiday() && holiday.is_applied(now) {
            debug!("{}: holiday mode applied", component.id());
            let target = match category {
                ComponentCategory::Ventilation => Some(self.config.ventilation_min_level),
                _ => holiday.target_temperature,
            };
            return ActiveMode::new(QuickMode::Holiday, target);
        }

        let overridden = quick_mode.and_then(|qm| self.quick_mode_override(component, qm, now));
        if let Some(mode) = overridden {
            debug!("{}: overridden by {}", component.id(), mode.current_mode);
            return mode;
        }

        if let Some(veto) = component.quick_veto() {
            if !veto.is_expired(now) {
                debug!("{}: quick veto applied", component.id());
                return ActiveMode::new(OperatingMode::QuickVeto, Some(veto.target_temperature));
            }
            debug!("{}: quick veto expired, ignoring it", component.id());
        }

        self.operating_mode_default(component, now)
    }

    fn quick_mode_override(
        &self,
        component: &dyn Component,
        quick_mode: &ActiveQuickMode,
        now: NaiveDateTime,
    ) -> Option<ActiveMode> {
        let target = match quick_mode.target_for(component.category(), component.id())? {
            QuickModeTarget::FrostProtection => Some(self.config.frost_protection_temp_c),
            QuickModeTarget::OwnHigh => component.heating().target_high,
            QuickModeTarget::SundayProgram => {
                let heating = component.heating();
                let period = heating
                    .time_program
                    .get_for(DayOfWeek::Sunday, minute_of_day(now));
                match period.setting {
                    SettingMode::Night => heating.target_low,
                    _ => heating.target_high,
                }
            }
            QuickModeTarget::CoolingHigh => component.cooling()?.target_high,
            QuickModeTarget::MaxLevel => Some(self.config.ventilation_max_level),
            QuickModeTarget::MinLevel => Some(self.config.ventilation_min_level),
            QuickModeTarget::NoTemperature => None,
        };

        Some(ActiveMode::new(quick_mode.mode, target))
    }

    fn operating_mode_default(&self, component: &dyn Component, now: NaiveDateTime) -> ActiveMode {
        let function = component.function();

        let mode = match function.operating_mode {
            OperatingMode::Auto => self.follow_time_program(component, function, now),
            OperatingMode::QuickVeto => {
                if component.quick_veto().is_none() {
                    warn!(
                        "{}: QUICK_VETO without a quick veto, following time program",
                        component.id()
                    );
                }
                self.follow_time_program(component, function, now)
            }
            mode @ (OperatingMode::Day | OperatingMode::Manual | OperatingMode::On) => {
                ActiveMode::new(mode, function.target_high)
            }
            OperatingMode::Night => ActiveMode::new(OperatingMode::Night, function.target_low),
            OperatingMode::Off => ActiveMode::new(OperatingMode::Off, self.off_target(component)),
        };

        // Circulation only pumps, whatever its record carries.
        if component.category() == ComponentCategory::Circulation {
            return ActiveMode {
                target_temperature: None,
                ..mode
            };
        }
        mode
    }

    fn follow_time_program(
        &self,
        component: &dyn Component,
        function: &Function,
        now: NaiveDateTime,
    ) -> ActiveMode {
        let period = function.time_program.get_at(now);
        let mut target = period
            .target_temperature
            .or_else(|| function.target_for(period.setting));

        if component.category() == ComponentCategory::HotWater && !period.setting.is_high() {
            target = target.or(Some(self.config.hot_water_min_temp_c));
        }

        ActiveMode::auto(period.setting, target)
    }

    fn off_target(&self, component: &dyn Component) -> Option<f32> {
        match component.category() {
            ComponentCategory::Zone if component.is_cooling() => None,
            ComponentCategory::Zone | ComponentCategory::Room => {
                Some(self.config.frost_protection_temp_c)
            }
            ComponentCategory::HotWater => Some(self.config.hot_water_min_temp_c),
            ComponentCategory::Circulation => None,
            ComponentCategory::Ventilation => Some(self.config.ventilation_min_level),
        }
    }
}
