use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Target applied when a zone, room or cylinder is switched off.
    pub frost_protection_temp_c: f32,
    /// Hot water target outside of its time windows.
    pub hot_water_min_temp_c: f32,
    pub ventilation_min_level: f32,
    pub ventilation_max_level: f32,
    /// Wall clock of the installation, an IANA name.
    pub timezone: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            frost_protection_temp_c: 5.0,
            hot_water_min_temp_c: 35.0,
            ventilation_min_level: 1.0,
            ventilation_max_level: 6.0,
            timezone: "Europe/Berlin".to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        self.frost_protection_temp_c =
            finite_or(self.frost_protection_temp_c, defaults.frost_protection_temp_c);
        self.hot_water_min_temp_c =
            finite_or(self.hot_water_min_temp_c, defaults.hot_water_min_temp_c);
        self.ventilation_min_level =
            finite_or(self.ventilation_min_level, defaults.ventilation_min_level);
        self.ventilation_max_level =
            finite_or(self.ventilation_max_level, defaults.ventilation_max_level);

        self.frost_protection_temp_c = self.frost_protection_temp_c.clamp(5.0, 30.0);
        self.hot_water_min_temp_c = self.hot_water_min_temp_c.clamp(35.0, 70.0);
        self.ventilation_min_level = self.ventilation_min_level.clamp(1.0, 6.0);
        self.ventilation_max_level = self
            .ventilation_max_level
            .clamp(self.ventilation_min_level, 6.0);
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| Error::UnknownTimezone(self.timezone.clone()))
    }

    /// Installation wall clock time for an instant.
    pub fn local_time(&self, instant: DateTime<Utc>) -> Result<NaiveDateTime> {
        Ok(instant.with_timezone(&self.tz()?).naive_local())
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let mut config = ResolverConfig {
            frost_protection_temp_c: -3.0,
            hot_water_min_temp_c: 90.0,
            ventilation_min_level: 4.0,
            ventilation_max_level: 2.0,
            ..ResolverConfig::default()
        };
        config.sanitize();

        assert_eq!(config.frost_protection_temp_c, 5.0);
        assert_eq!(config.hot_water_min_temp_c, 70.0);
        assert_eq!(config.ventilation_max_level, 4.0);
    }

    #[test]
    fn sanitize_replaces_non_finite_values_with_defaults() {
        let mut config = ResolverConfig {
            frost_protection_temp_c: f32::INFINITY,
            hot_water_min_temp_c: f32::NAN,
            ventilation_min_level: f32::NAN,
            ventilation_max_level: f32::NEG_INFINITY,
            ..ResolverConfig::default()
        };
        config.sanitize();

        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn converts_instant_to_installation_time() {
        let config = ResolverConfig::default();
        let instant = Utc.with_ymd_and_hms(2026, 7, 6, 8, 0, 0).unwrap();

        let local = config.local_time(instant).unwrap();
        assert_eq!(local.to_string(), "2026-07-06 10:00:00");
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        let config = ResolverConfig {
            timezone: "Mars/Olympus".to_string(),
            ..ResolverConfig::default()
        };

        assert_eq!(
            config.local_time(Utc::now()),
            Err(Error::UnknownTimezone("Mars/Olympus".to_string()))
        );
    }
}
