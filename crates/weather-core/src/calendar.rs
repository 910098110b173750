//! The Common Year calendar: twelve 28-day months and four 7-day festivals.
//!
//! The generator treats the calendar as a read-only oracle. Advancing the
//! date is the caller's business (see [`CalendarDate::next_day`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WeatherError};

pub const MONTH_DAYS: u8 = 28;
pub const FESTIVAL_DAYS: u8 = 7;
pub const YEAR_DAYS: u16 = 12 * MONTH_DAYS as u16 + 4 * FESTIVAL_DAYS as u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    Needfest,
    Fireseek,
    Readying,
    Coldeven,
    Growfest,
    Planting,
    Flocktime,
    Wealsun,
    Richfest,
    Reaping,
    Goodmonth,
    Harvester,
    Brewfest,
    Patchwall,
    ReadyReat,
    Sunsebb,
}

impl Month {
    /// All months in calendar order, Needfest first.
    pub const ALL: [Month; 16] = [
        Month::Needfest,
        Month::Fireseek,
        Month::Readying,
        Month::Coldeven,
        Month::Growfest,
        Month::Planting,
        Month::Flocktime,
        Month::Wealsun,
        Month::Richfest,
        Month::Reaping,
        Month::Goodmonth,
        Month::Harvester,
        Month::Brewfest,
        Month::Patchwall,
        Month::ReadyReat,
        Month::Sunsebb,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::Needfest => "Needfest",
            Month::Fireseek => "Fireseek",
            Month::Readying => "Readying",
            Month::Coldeven => "Coldeven",
            Month::Growfest => "Growfest",
            Month::Planting => "Planting",
            Month::Flocktime => "Flocktime",
            Month::Wealsun => "Wealsun",
            Month::Richfest => "Richfest",
            Month::Reaping => "Reaping",
            Month::Goodmonth => "Goodmonth",
            Month::Harvester => "Harvester",
            Month::Brewfest => "Brewfest",
            Month::Patchwall => "Patchwall",
            Month::ReadyReat => "Ready'reat",
            Month::Sunsebb => "Sunsebb",
        }
    }

    pub fn is_festival(self) -> bool {
        matches!(self, Month::Needfest | Month::Growfest | Month::Richfest | Month::Brewfest)
    }

    pub fn length(self) -> u8 {
        if self.is_festival() { FESTIVAL_DAYS } else { MONTH_DAYS }
    }

    pub fn season(self) -> Season {
        match self {
            Month::Needfest | Month::Fireseek | Month::Sunsebb => Season::Winter,
            Month::Readying | Month::Coldeven | Month::Growfest => Season::Spring,
            Month::Planting | Month::Flocktime | Month::Wealsun => Season::LowSummer,
            Month::Richfest | Month::Reaping | Month::Goodmonth | Month::Harvester => {
                Season::HighSummer
            }
            Month::Brewfest | Month::Patchwall | Month::ReadyReat => Season::Autumn,
        }
    }

    /// Following month, wrapping Sunsebb → Needfest.
    pub fn next(self) -> Month {
        Month::ALL[(self.index() + 1) % Month::ALL.len()]
    }

    /// Preceding month, wrapping Needfest → Sunsebb.
    pub fn previous(self) -> Month {
        Month::ALL[(self.index() + Month::ALL.len() - 1) % Month::ALL.len()]
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self> {
        let key = lookup_key(s);
        Month::ALL
            .into_iter()
            .find(|m| lookup_key(m.name()) == key)
            .ok_or_else(|| WeatherError::config(format!("unknown month `{s}`")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    LowSummer,
    HighSummer,
    Autumn,
}

/// Coarser season grouping used by the prevailing-wind tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindSeason {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn wind_bucket(self) -> WindSeason {
        match self {
            Season::Winter => WindSeason::Winter,
            Season::Spring => WindSeason::Spring,
            Season::LowSummer | Season::HighSummer => WindSeason::Summer,
            Season::Autumn => WindSeason::Autumn,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::LowSummer => "Low Summer",
            Season::HighSummer => "High Summer",
            Season::Autumn => "Autumn",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A day in the Common Year calendar. `day` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    pub month: Month,
    pub day: u8,
    pub year: i32,
}

impl CalendarDate {
    /// Build a date, rejecting days outside the month.
    pub fn new(month: Month, day: u8, year: i32) -> Result<Self> {
        let date = Self { month, day, year };
        date.validate()?;
        Ok(date)
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_in(&GreyhawkCalendar::new(*self))
    }

    /// Check the day against `calendar`'s length for the month.
    pub fn validate_in<C: CalendarOracle + ?Sized>(&self, calendar: &C) -> Result<()> {
        let length = calendar.month_length(self.month);
        if self.day == 0 || self.day > length {
            return Err(WeatherError::config(format!(
                "{} has {length} days, got day {}",
                self.month, self.day
            )));
        }
        Ok(())
    }

    pub fn season(&self) -> Season {
        self.month.season()
    }

    /// 1-based position within the year (Needfest 1 = 1, Sunsebb 28 = 364).
    pub fn day_of_year(&self) -> u16 {
        let before: u16 = Month::ALL[..self.month.index()]
            .iter()
            .map(|m| u16::from(m.length()))
            .sum();
        before + u16::from(self.day)
    }

    /// The following day, rolling the year over after Sunsebb.
    pub fn next_day(&self) -> Self {
        if self.day < self.month.length() {
            return Self { day: self.day + 1, ..*self };
        }
        let month = self.month.next();
        let year = if month == Month::Needfest { self.year + 1 } else { self.year };
        Self { month, day: 1, year }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}, {} CY", self.month, self.day, self.year)
    }
}

/// The host calendar, as far as the generator is concerned.
pub trait CalendarOracle {
    fn current_date(&self) -> CalendarDate;

    fn month_length(&self, month: Month) -> u8 {
        month.length()
    }

    fn season(&self, month: Month) -> Season {
        month.season()
    }
}

/// Standalone calendar used when no host calendar is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreyhawkCalendar {
    today: CalendarDate,
}

impl GreyhawkCalendar {
    pub fn new(today: CalendarDate) -> Self {
        Self { today }
    }

    pub fn advance(&mut self) {
        self.today = self.today.next_day();
    }
}

impl CalendarOracle for GreyhawkCalendar {
    fn current_date(&self) -> CalendarDate {
        self.today
    }
}

/// Case- and punctuation-insensitive key for name lookups.
pub(crate) fn lookup_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_has_364_days() {
        let total: u16 = Month::ALL.iter().map(|m| u16::from(m.length())).sum();
        assert_eq!(total, YEAR_DAYS);
        assert_eq!(total, 364);
    }

    #[test]
    fn month_names_parse_loosely() {
        assert_eq!("Ready'reat".parse::<Month>().unwrap(), Month::ReadyReat);
        assert_eq!("readyreat".parse::<Month>().unwrap(), Month::ReadyReat);
        assert_eq!("COLDEVEN".parse::<Month>().unwrap(), Month::Coldeven);
        assert!("Smarch".parse::<Month>().is_err());
    }

    #[test]
    fn day_outside_month_is_rejected() {
        assert!(CalendarDate::new(Month::Growfest, 8, 591).is_err());
        assert!(CalendarDate::new(Month::Fireseek, 0, 591).is_err());
        assert!(CalendarDate::new(Month::Fireseek, 28, 591).is_ok());
    }

    #[test]
    fn next_day_crosses_month_and_year() {
        let d = CalendarDate::new(Month::Needfest, 7, 591).unwrap();
        assert_eq!(d.next_day(), CalendarDate::new(Month::Fireseek, 1, 591).unwrap());

        let eve = CalendarDate::new(Month::Sunsebb, 28, 591).unwrap();
        assert_eq!(eve.next_day(), CalendarDate::new(Month::Needfest, 1, 592).unwrap());
    }

    #[test]
    fn day_of_year_spans_whole_year() {
        assert_eq!(CalendarDate::new(Month::Needfest, 1, 0).unwrap().day_of_year(), 1);
        assert_eq!(CalendarDate::new(Month::Fireseek, 1, 0).unwrap().day_of_year(), 8);
        assert_eq!(CalendarDate::new(Month::Sunsebb, 28, 0).unwrap().day_of_year(), 364);
    }

    #[test]
    fn summer_months_share_a_wind_bucket() {
        assert_eq!(Month::Planting.season().wind_bucket(), WindSeason::Summer);
        assert_eq!(Month::Goodmonth.season().wind_bucket(), WindSeason::Summer);
        assert_eq!(Month::Fireseek.season().wind_bucket(), WindSeason::Winter);
    }

    #[test]
    fn oracle_advances() {
        let mut cal = GreyhawkCalendar::new(CalendarDate::new(Month::Coldeven, 28, 591).unwrap());
        cal.advance();
        assert_eq!(cal.current_date().month, Month::Growfest);
        assert_eq!(cal.month_length(Month::Growfest), 7);
    }

    /// Host calendar with longer festivals.
    struct LongFestivals(CalendarDate);

    impl CalendarOracle for LongFestivals {
        fn current_date(&self) -> CalendarDate {
            self.0
        }

        fn month_length(&self, month: Month) -> u8 {
            if month.length() == 7 { 10 } else { month.length() }
        }
    }

    #[test]
    fn validation_asks_the_calendar() {
        let date = CalendarDate { month: Month::Richfest, day: 9, year: 591 };
        assert!(date.validate().is_err());
        assert!(date.validate_in(&LongFestivals(date)).is_ok());
        assert!(CalendarDate { day: 11, ..date }.validate_in(&LongFestivals(date)).is_err());
    }
}
