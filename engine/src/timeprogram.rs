use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    mode::SettingMode,
};

pub const MINUTES_PER_DAY: u16 = 24 * 60;
const GRID_MINUTES: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Monday => 0,
            Self::Tuesday => 1,
            Self::Wednesday => 2,
            Self::Thursday => 3,
            Self::Friday => 4,
            Self::Saturday => 5,
            Self::Sunday => 6,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 7]
    }

    pub fn from_chrono(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }

    pub fn succ(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

/// Minutes since midnight, seconds truncated.
pub fn minute_of_day(at: NaiveDateTime) -> u16 {
    (at.hour() * 60 + at.minute()) as u16
}

fn parse_hhmm(value: &str) -> Result<u16> {
    let invalid = || Error::InvalidStartTime(value.to_string());

    let (hour, minute) = value.split_once(':').ok_or_else(invalid)?;
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if hour.len() > 2 || minute.len() != 2 || !digits(hour) || !digits(minute) {
        return Err(invalid());
    }
    let hour: u16 = hour.parse().map_err(|_| invalid())?;
    let minute: u16 = minute.parse().map_err(|_| invalid())?;
    if minute >= 60 {
        return Err(invalid());
    }

    let total = hour * 60 + minute;
    if total >= MINUTES_PER_DAY || total % GRID_MINUTES != 0 {
        return Err(invalid());
    }
    Ok(total)
}

fn format_hhmm(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// One slot of a day. It lasts until the next slot starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod", into = "RawPeriod")]
pub struct TimePeriodSetting {
    start_time: u16,
    pub setting: SettingMode,
    /// Only room programs carry their own temperature.
    pub target_temperature: Option<f32>,
}

impl TimePeriodSetting {
    pub fn new(start_time: u16, setting: SettingMode) -> Result<Self> {
        if start_time >= MINUTES_PER_DAY || start_time % GRID_MINUTES != 0 {
            return Err(Error::InvalidStartTime(format_hhmm(start_time)));
        }
        Ok(Self {
            start_time,
            setting,
            target_temperature: None,
        })
    }

    /// Parses a `HH:MM` start time.
    pub fn parse(start_time: &str, setting: SettingMode) -> Result<Self> {
        Self::new(parse_hhmm(start_time)?, setting)
    }

    pub fn with_target_temperature(mut self, target_temperature: f32) -> Self {
        self.target_temperature = Some(target_temperature);
        self
    }

    pub fn start_time(&self) -> u16 {
        self.start_time
    }

    pub fn start_hhmm(&self) -> String {
        format_hhmm(self.start_time)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawPeriod {
    #[serde(rename = "startTime")]
    start_time: String,
    setting: SettingMode,
    #[serde(
        rename = "targetTemperature",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    target_temperature: Option<f32>,
}

impl TryFrom<RawPeriod> for TimePeriodSetting {
    type Error = Error;

    fn try_from(raw: RawPeriod) -> Result<Self> {
        let mut period = Self::parse(&raw.start_time, raw.setting)?;
        period.target_temperature = raw.target_temperature;
        Ok(period)
    }
}

impl From<TimePeriodSetting> for RawPeriod {
    fn from(period: TimePeriodSetting) -> Self {
        Self {
            start_time: period.start_hhmm(),
            setting: period.setting,
            target_temperature: period.target_temperature,
        }
    }
}

/// Ordered periods of one weekday, the first one starting at midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TimePeriodSetting>", into = "Vec<TimePeriodSetting>")]
pub struct TimeProgramDay {
    periods: Vec<TimePeriodSetting>,
}

impl TimeProgramDay {
    pub fn new(periods: Vec<TimePeriodSetting>) -> Result<Self> {
        let Some(first) = periods.first() else {
            return Err(Error::InvalidTimeProgram("day has no period".to_string()));
        };
        if first.start_time != 0 {
            return Err(Error::InvalidTimeProgram(format!(
                "first period starts at {} instead of 00:00",
                first.start_hhmm()
            )));
        }
        if let Some(pair) = periods
            .windows(2)
            .find(|pair| pair[0].start_time >= pair[1].start_time)
        {
            return Err(Error::InvalidTimeProgram(format!(
                "period at {} does not follow {}",
                pair[1].start_hhmm(),
                pair[0].start_hhmm()
            )));
        }

        Ok(Self { periods })
    }

    /// A day with a single setting from midnight on.
    pub fn constant(setting: SettingMode) -> Self {
        Self {
            periods: vec![TimePeriodSetting {
                start_time: 0,
                setting,
                target_temperature: None,
            }],
        }
    }

    /// Builds a day from `(start, end, setting)` ranges in minutes, filling
    /// every uncovered stretch with `fill`. `end` may be 1440.
    pub fn from_ranges(
        ranges: impl IntoIterator<Item = (u16, u16, SettingMode)>,
        fill: SettingMode,
    ) -> Result<Self> {
        let mut ranges: Vec<_> = ranges.into_iter().collect();
        ranges.sort_by_key(|(start, _, _)| *start);

        let mut periods = Vec::with_capacity(ranges.len() * 2 + 1);
        let mut cursor = 0;
        for (start, end, setting) in ranges {
            if start < cursor || end <= start || end > MINUTES_PER_DAY || end % GRID_MINUTES != 0
            {
                return Err(Error::InvalidTimeProgram(format!(
                    "range {}-{} overlaps or is out of bounds",
                    format_hhmm(start),
                    format_hhmm(end)
                )));
            }
            if start > cursor {
                periods.push(TimePeriodSetting::new(cursor, fill)?);
            }
            periods.push(TimePeriodSetting::new(start, setting)?);
            cursor = end;
        }
        if cursor < MINUTES_PER_DAY {
            periods.push(TimePeriodSetting::new(cursor, fill)?);
        }

        Self::new(periods)
    }

    pub fn periods(&self) -> &[TimePeriodSetting] {
        &self.periods
    }

    /// Last period starting at or before `minute`.
    pub fn get_for(&self, minute: u16) -> &TimePeriodSetting {
        let idx = self
            .periods
            .partition_point(|period| period.start_time <= minute);
        &self.periods[idx.saturating_sub(1)]
    }

    /// First period starting strictly after `minute`.
    pub fn next_after(&self, minute: u16) -> Option<&TimePeriodSetting> {
        let idx = self
            .periods
            .partition_point(|period| period.start_time <= minute);
        self.periods.get(idx)
    }
}

impl TryFrom<Vec<TimePeriodSetting>> for TimeProgramDay {
    type Error = Error;

    fn try_from(periods: Vec<TimePeriodSetting>) -> Result<Self> {
        Self::new(periods)
    }
}

impl From<TimeProgramDay> for Vec<TimePeriodSetting> {
    fn from(day: TimeProgramDay) -> Self {
        day.periods
    }
}

/// Weekly schedule followed in AUTO mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTimeProgram", into = "RawTimeProgram")]
pub struct TimeProgram {
    days: [TimeProgramDay; 7],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawTimeProgram {
    monday: TimeProgramDay,
    tuesday: TimeProgramDay,
    wednesday: TimeProgramDay,
    thursday: TimeProgramDay,
    friday: TimeProgramDay,
    saturday: TimeProgramDay,
    sunday: TimeProgramDay,
}

impl From<RawTimeProgram> for TimeProgram {
    fn from(raw: RawTimeProgram) -> Self {
        Self::new([
            raw.monday,
            raw.tuesday,
            raw.wednesday,
            raw.thursday,
            raw.friday,
            raw.saturday,
            raw.sunday,
        ])
    }
}

impl From<TimeProgram> for RawTimeProgram {
    fn from(program: TimeProgram) -> Self {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] = program.days;
        Self {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
        }
    }
}

impl TimeProgram {
    /// Days ordered Monday to Sunday.
    pub fn new(days: [TimeProgramDay; 7]) -> Self {
        Self { days }
    }

    /// Same day program for the whole week.
    pub fn uniform(day: TimeProgramDay) -> Self {
        Self {
            days: std::array::from_fn(|_| day.clone()),
        }
    }

    pub fn day(&self, day: DayOfWeek) -> &TimeProgramDay {
        &self.days[day.index()]
    }

    pub fn get_for(&self, day: DayOfWeek, minute: u16) -> &TimePeriodSetting {
        self.day(day).get_for(minute)
    }

    pub fn get_at(&self, at: NaiveDateTime) -> &TimePeriodSetting {
        self.get_for(DayOfWeek::from_chrono(at.weekday()), minute_of_day(at))
    }

    /// Next period start after the given instant, looking into the following
    /// day when the current one has no later period.
    pub fn next_after(&self, day: DayOfWeek, minute: u16) -> (DayOfWeek, &TimePeriodSetting) {
        match self.day(day).next_after(minute) {
            Some(period) => (day, period),
            None => {
                let next_day = day.succ();
                (next_day, &self.day(next_day).periods[0])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn fixed_time(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        // Jan 5, 2026 is Monday.
        NaiveDate::from_ymd_opt(2026, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn period(start: &str, setting: SettingMode) -> TimePeriodSetting {
        TimePeriodSetting::parse(start, setting).unwrap()
    }

    fn weekday_program() -> TimeProgram {
        let monday = TimeProgramDay::new(vec![
            period("00:00", SettingMode::Night),
            period("04:00", SettingMode::Day),
            period("19:30", SettingMode::Night),
        ])
        .unwrap();
        let mut days: [TimeProgramDay; 7] =
            std::array::from_fn(|_| TimeProgramDay::constant(SettingMode::Night));
        days[0] = monday;
        days[6] = TimeProgramDay::new(vec![
            period("00:00", SettingMode::Night),
            period("08:00", SettingMode::Day),
            period("22:00", SettingMode::Night),
        ])
        .unwrap();
        TimeProgram::new(days)
    }

    #[test]
    fn parses_start_times_on_the_grid() {
        assert_eq!(period("7:05", SettingMode::Day).start_time(), 425);
        assert_eq!(period("23:55", SettingMode::Day).start_time(), 1435);

        for bad in [
            "24:00", "12:03", "12:60", "1205", "ab:cd", "12:5", ":30", "+5:00", "12:+5",
        ] {
            assert_eq!(
                TimePeriodSetting::parse(bad, SettingMode::Day),
                Err(Error::InvalidStartTime(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn rejects_invalid_days() {
        assert!(TimeProgramDay::new(Vec::new()).is_err());
        assert!(TimeProgramDay::new(vec![period("01:00", SettingMode::Day)]).is_err());
        assert!(TimeProgramDay::new(vec![
            period("00:00", SettingMode::Day),
            period("06:00", SettingMode::Night),
            period("06:00", SettingMode::Day),
        ])
        .is_err());
    }

    #[test]
    fn finds_period_at_exact_and_inner_minutes() {
        let program = weekday_program();

        let at = |hour, minute| program.get_at(fixed_time(5, hour, minute)).setting;
        assert_eq!(at(0, 0), SettingMode::Night);
        assert_eq!(at(3, 59), SettingMode::Night);
        assert_eq!(at(4, 0), SettingMode::Day);
        assert_eq!(at(10, 0), SettingMode::Day);
        assert_eq!(at(19, 30), SettingMode::Night);
        assert_eq!(at(23, 59), SettingMode::Night);
    }

    #[test]
    fn midnight_returns_first_period_of_every_day() {
        let program = weekday_program();

        for day in DayOfWeek::ALL {
            assert_eq!(
                program.get_for(day, 0),
                &program.day(day).periods()[0],
                "{day:?}"
            );
        }
    }

    #[test]
    fn every_minute_falls_inside_its_period() {
        let program = weekday_program();

        for day in DayOfWeek::ALL {
            let periods = program.day(day).periods();
            for minute in 0..MINUTES_PER_DAY {
                let found = program.get_for(day, minute);
                let idx = periods.iter().position(|p| p == found).unwrap();
                let end = periods
                    .get(idx + 1)
                    .map_or(MINUTES_PER_DAY, TimePeriodSetting::start_time);

                assert!(found.start_time() <= minute && minute < end);
            }
        }
    }

    #[test]
    fn next_period_wraps_to_following_day() {
        let program = weekday_program();

        let (day, next) = program.next_after(DayOfWeek::Monday, 10 * 60);
        assert_eq!(
            (day, next.start_hhmm()),
            (DayOfWeek::Monday, "19:30".to_string())
        );

        let (day, next) = program.next_after(DayOfWeek::Monday, 19 * 60 + 30);
        assert_eq!(
            (day, next.start_hhmm()),
            (DayOfWeek::Tuesday, "00:00".to_string())
        );

        let (day, next) = program.next_after(DayOfWeek::Sunday, 23 * 60);
        assert_eq!(
            (day, next.start_hhmm()),
            (DayOfWeek::Monday, "00:00".to_string())
        );
    }

    #[test]
    fn fills_gaps_between_ranges() {
        let day = TimeProgramDay::from_ranges(
            [(18 * 60, 22 * 60, SettingMode::Day), (6 * 60, 8 * 60, SettingMode::Day)],
            SettingMode::Night,
        )
        .unwrap();

        let summary: Vec<_> = day
            .periods()
            .iter()
            .map(|p| (p.start_hhmm(), p.setting))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("00:00".to_string(), SettingMode::Night),
                ("06:00".to_string(), SettingMode::Day),
                ("08:00".to_string(), SettingMode::Night),
                ("18:00".to_string(), SettingMode::Day),
                ("22:00".to_string(), SettingMode::Night),
            ]
        );

        let full =
            TimeProgramDay::from_ranges([(0, MINUTES_PER_DAY, SettingMode::On)], SettingMode::Off)
                .unwrap();
        assert_eq!(full, TimeProgramDay::constant(SettingMode::On));

        assert!(TimeProgramDay::from_ranges(
            [(0, 120, SettingMode::On), (60, 180, SettingMode::On)],
            SettingMode::Off
        )
        .is_err());
    }

    #[test]
    fn identical_sources_give_identical_programs() {
        let json = include_str!("../fixtures/time_program.json");

        let first: TimeProgram = serde_json::from_str(json).unwrap();
        let second: TimeProgram = serde_json::from_str(json).unwrap();
        assert_eq!(first, second);

        let reparsed: TimeProgram =
            serde_json::from_value(serde_json::to_value(&first).unwrap()).unwrap();
        assert_eq!(reparsed, first);

        let monday = first.get_for(DayOfWeek::Monday, 10 * 60);
        assert_eq!(monday.setting, SettingMode::Day);
        assert_eq!(
            first.get_for(DayOfWeek::Sunday, 23 * 60).setting,
            SettingMode::Night
        );
    }

    #[test]
    fn rejects_program_with_bad_day() {
        let json = r#"{"startTime": "01:00", "setting": "DAY"}"#;
        let day = format!(r#"[{json}]"#);

        assert!(serde_json::from_str::<TimeProgramDay>(&day).is_err());
    }
}
