use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Longest duration the API accepts, one day.
pub const MAX_DURATION_MINUTES: u16 = 1440;

/// Temporary setpoint on a single zone or room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuickVeto")]
pub struct QuickVeto {
    #[serde(rename = "targetTemperature")]
    pub target_temperature: f32,
    /// `None` keeps the veto until it is cleared.
    #[serde(rename = "remainingDuration")]
    remaining_duration: Option<u16>,
    /// When `remaining_duration` was reported.
    #[serde(rename = "observedAt")]
    observed_at: Option<NaiveDateTime>,
}

#[derive(Deserialize)]
struct RawQuickVeto {
    #[serde(rename = "targetTemperature")]
    target_temperature: f32,
    #[serde(rename = "remainingDuration", default)]
    remaining_duration: Option<u16>,
    #[serde(rename = "observedAt", default)]
    observed_at: Option<NaiveDateTime>,
}

impl TryFrom<RawQuickVeto> for QuickVeto {
    type Error = Error;

    fn try_from(raw: RawQuickVeto) -> Result<Self> {
        let veto = Self::new(raw.target_temperature, raw.remaining_duration)?;
        Ok(match raw.observed_at {
            Some(at) => veto.observed_at(at),
            None => veto,
        })
    }
}

impl QuickVeto {
    pub fn new(target_temperature: f32, remaining_duration: Option<u16>) -> Result<Self> {
        if let Some(minutes) = remaining_duration.filter(|m| *m > MAX_DURATION_MINUTES) {
            return Err(Error::QuickVetoDuration {
                minutes,
                max: MAX_DURATION_MINUTES,
            });
        }
        Ok(Self {
            target_temperature,
            remaining_duration,
            observed_at: None,
        })
    }

    pub fn indefinite(target_temperature: f32) -> Self {
        Self {
            target_temperature,
            remaining_duration: None,
            observed_at: None,
        }
    }

    /// Anchors the countdown at the instant the snapshot was taken.
    pub fn observed_at(mut self, at: NaiveDateTime) -> Self {
        self.observed_at = Some(at);
        self
    }

    pub fn remaining_duration(&self) -> Option<u16> {
        self.remaining_duration
    }

    /// Minutes left at `now`, `None` for an indefinite veto.
    pub fn remaining_at(&self, now: NaiveDateTime) -> Option<i64> {
        let remaining = i64::from(self.remaining_duration?);
        let elapsed = self
            .observed_at
            .map_or(0, |at| (now - at).num_minutes().max(0));
        Some(remaining - elapsed)
    }

    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.remaining_at(now).is_some_and(|minutes| minutes <= 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn rejects_duration_over_one_day() {
        assert_eq!(
            QuickVeto::new(20.0, Some(1441)),
            Err(Error::QuickVetoDuration {
                minutes: 1441,
                max: 1440
            })
        );
        assert!(QuickVeto::new(20.0, Some(1440)).is_ok());
    }

    #[test]
    fn counts_down_from_observation() {
        let veto = QuickVeto::new(19.5, Some(90))
            .unwrap()
            .observed_at(at(10, 0));

        assert_eq!(veto.remaining_at(at(10, 0)), Some(90));
        assert_eq!(veto.remaining_at(at(11, 0)), Some(30));
        assert!(!veto.is_expired(at(11, 29)));
        assert!(veto.is_expired(at(11, 30)));
        // Evaluating before the observation does not extend the veto.
        assert_eq!(veto.remaining_at(at(9, 0)), Some(90));
    }

    #[test]
    fn zero_duration_is_expired_and_missing_duration_is_not() {
        let zero = QuickVeto::new(19.5, Some(0)).unwrap();
        assert!(zero.is_expired(at(10, 0)));

        let indefinite = QuickVeto::indefinite(19.5);
        assert_eq!(indefinite.remaining_at(at(23, 0)), None);
        assert!(!indefinite.is_expired(at(23, 0)));
    }

    #[test]
    fn deserialization_validates_duration() {
        let json = r#"{
            "targetTemperature": 17.0,
            "remainingDuration": 45,
            "observedAt": "2026-01-05T10:00:00"
        }"#;
        let veto: QuickVeto = serde_json::from_str(json).unwrap();
        assert_eq!(veto.remaining_at(at(10, 15)), Some(30));

        assert!(serde_json::from_str::<QuickVeto>(
            r#"{"targetTemperature": 17.0, "remainingDuration": 2000}"#
        )
        .is_err());
    }
}
