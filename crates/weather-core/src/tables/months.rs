//! Per-month climate: baseline temperature, daily high/low spread, base
//! precipitation chance, sky odds and daylight hours.
//!
//! Baselines are calibrated to latitude 40° at sea level.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calendar::Month;

/// Time of day on a 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Cumulative d100 thresholds for the sky condition of a dry day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkyOdds {
    /// Rolls up to this value are clear.
    pub clear_max: u32,
    /// Rolls above `clear_max` up to this value are partly cloudy; the rest cloudy.
    pub partly_cloudy_max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthClimate {
    /// Baseline temperature in °F.
    pub base_temperature: i32,
    /// Added to the baseline for the daily high.
    pub high_adjustment: &'static str,
    /// Subtracted from the baseline for the daily low.
    pub low_adjustment: &'static str,
    /// Base chance (percent) of any precipitation.
    pub precipitation_chance: u32,
    pub sky: SkyOdds,
    pub sunrise: ClockTime,
    pub sunset: ClockTime,
}

const fn row(
    base_temperature: i32,
    high_adjustment: &'static str,
    low_adjustment: &'static str,
    precipitation_chance: u32,
    sky: (u32, u32),
    sunrise: (u8, u8),
    sunset: (u8, u8),
) -> MonthClimate {
    MonthClimate {
        base_temperature,
        high_adjustment,
        low_adjustment,
        precipitation_chance,
        sky: SkyOdds { clear_max: sky.0, partly_cloudy_max: sky.1 },
        sunrise: ClockTime::new(sunrise.0, sunrise.1),
        sunset: ClockTime::new(sunset.0, sunset.1),
    }
}

pub fn climate(month: Month) -> MonthClimate {
    match month {
        Month::Needfest  => row(30, "d8",    "d20",   45, (23, 50), (7, 17), (16, 58)),
        Month::Fireseek  => row(32, "d10",   "d20",   46, (23, 50), (7, 10), (17, 8)),
        Month::Readying  => row(34, "d6+4",  "d10+4", 40, (25, 50), (6, 58), (17, 37)),
        Month::Coldeven  => row(42, "d8+4",  "d10+4", 44, (27, 54), (6, 24), (18, 10)),
        Month::Growfest  => row(47, "d10+5", "d10+4", 43, (20, 55), (6, 0),  (18, 25)),
        Month::Planting  => row(52, "d10+6", "d8",    42, (20, 55), (5, 40), (18, 42)),
        Month::Flocktime => row(63, "d10+6", "d10+6", 42, (20, 53), (5, 4),  (19, 10)),
        Month::Wealsun   => row(71, "d8+8",  "d6+6",  36, (20, 60), (4, 42), (19, 30)),
        Month::Richfest  => row(75, "d6+6",  "d6+6",  34, (22, 62), (4, 40), (19, 32)),
        Month::Reaping   => row(77, "d6+4",  "d6+6",  33, (22, 62), (4, 52), (19, 22)),
        Month::Goodmonth => row(75, "d4+6",  "d6+6",  33, (25, 60), (5, 15), (18, 47)),
        Month::Harvester => row(68, "d8+6",  "d8+6",  33, (33, 54), (5, 42), (18, 0)),
        Month::Brewfest  => row(62, "d10+5", "d10+5", 34, (33, 54), (5, 55), (17, 35)),
        Month::Patchwall => row(57, "d10+5", "d10+5", 36, (35, 60), (6, 8),  (17, 13)),
        Month::ReadyReat => row(46, "d10+6", "d10+4", 40, (20, 50), (6, 40), (16, 55)),
        Month::Sunsebb   => row(35, "d8",    "d8",    43, (25, 50), (7, 8),  (16, 53)),
    }
}
