use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    component::{Circulation, Component, HotWater, Room, Ventilation, Zone},
    holiday::HolidayMode,
    mode::ActiveMode,
    quick_mode::{ActiveQuickMode, ComponentCategory},
    resolver::ActiveModeResolver,
};

/// One snapshot of an installation as reported by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct System {
    pub holiday: HolidayMode,
    pub quick_mode: Option<ActiveQuickMode>,
    pub zones: Vec<Zone>,
    pub rooms: Vec<Room>,
    pub hot_water: Option<HotWater>,
    pub circulation: Option<Circulation>,
    pub ventilation: Option<Ventilation>,
}

/// Resolved mode of one component, handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedState {
    pub component_id: String,
    pub category: ComponentCategory,
    pub active_mode: ActiveMode,
}

impl System {
    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == id)
    }

    pub fn active_mode_zone(
        &self,
        resolver: &ActiveModeResolver,
        zone: &Zone,
        now: NaiveDateTime,
    ) -> ActiveMode {
        resolver.resolve_zone(zone, &self.holiday, self.quick_mode.as_ref(), now)
    }

    pub fn active_mode_room(
        &self,
        resolver: &ActiveModeResolver,
        room: &Room,
        now: NaiveDateTime,
    ) -> ActiveMode {
        resolver.resolve_room(room, &self.holiday, self.quick_mode.as_ref(), now)
    }

    pub fn active_mode_hot_water(
        &self,
        resolver: &ActiveModeResolver,
        hot_water: &HotWater,
        now: NaiveDateTime,
    ) -> ActiveMode {
        resolver.resolve_hot_water(hot_water, &self.holiday, self.quick_mode.as_ref(), now)
    }

    pub fn active_mode_circulation(
        &self,
        resolver: &ActiveModeResolver,
        circulation: &Circulation,
        now: NaiveDateTime,
    ) -> ActiveMode {
        resolver.resolve_circulation(circulation, &self.holiday, self.quick_mode.as_ref(), now)
    }

    pub fn active_mode_ventilation(
        &self,
        resolver: &ActiveModeResolver,
        ventilation: &Ventilation,
        now: NaiveDateTime,
    ) -> ActiveMode {
        resolver.resolve_ventilation(ventilation, &self.holiday, self.quick_mode.as_ref(), now)
    }

    /// Zones, rooms, then hot water, circulation and ventilation.
    pub fn components(&self) -> impl Iterator<Item = &dyn Component> + '_ {
        let zones = self.zones.iter().map(|zone| zone as &dyn Component);
        let rooms = self.rooms.iter().map(|room| room as &dyn Component);
        let dhw = self
            .hot_water
            .iter()
            .map(|hot_water| hot_water as &dyn Component);
        let circulation = self.circulation.iter().map(|c| c as &dyn Component);
        let ventilation = self.ventilation.iter().map(|v| v as &dyn Component);

        zones
            .chain(rooms)
            .chain(dhw)
            .chain(circulation)
            .chain(ventilation)
    }

    pub fn resolve_all(
        &self,
        resolver: &ActiveModeResolver,
        now: NaiveDateTime,
    ) -> Vec<ResolvedState> {
        self.components()
            .map(|component| ResolvedState {
                component_id: component.id().to_string(),
                category: component.category(),
                active_mode: resolver.resolve(
                    component,
                    &self.holiday,
                    self.quick_mode.as_ref(),
                    now,
                ),
            })
            .collect()
    }
}
