use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// System wide holiday mode.
///
/// `active` only says the user switched it on. It is applied while the
/// current date is inside the inclusive date range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HolidayMode {
    pub active: bool,
    #[serde(rename = "startDate", default)]
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "targetTemperature", default)]
    pub target_temperature: Option<f32>,
}

impl HolidayMode {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, target_temperature: f32) -> Self {
        Self {
            active: true,
            start_date: Some(start_date),
            end_date: Some(end_date),
            target_temperature: Some(target_temperature),
        }
    }

    pub fn inactive() -> Self {
        Self::default()
    }

    pub fn is_applied(&self, now: NaiveDateTime) -> bool {
        let today = now.date();
        match (self.active, self.start_date, self.end_date) {
            (true, Some(start), Some(end)) => start <= today && today <= end,
            _ => false,
        }
    }
}
