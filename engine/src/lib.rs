pub mod component;
pub mod config;
pub mod error;
pub mod holiday;
pub mod mode;
pub mod quick_mode;
pub mod quick_veto;
pub mod resolver;
pub mod system;
pub mod timeprogram;

pub use component::{
    ActiveFunction, Circulation, Component, Function, HotWater, Room, Ventilation, Zone,
};
pub use config::ResolverConfig;
pub use error::{Error, Result};
pub use holiday::HolidayMode;
pub use mode::{ActiveMode, Mode, OperatingMode, SettingMode};
pub use quick_mode::{
    ActiveQuickMode, ComponentCategory, QuickMode, QuickModeScope, QuickModeTarget,
};
pub use quick_veto::{QuickVeto, MAX_DURATION_MINUTES};
pub use resolver::ActiveModeResolver;
pub use system::{ResolvedState, System};
pub use timeprogram::{DayOfWeek, TimePeriodSetting, TimeProgram, TimeProgramDay};
