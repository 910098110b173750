//! Moon phases and lycanthrope activity. Pure lookups, no dice.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarDate, Month};
use crate::tables::moons::key_days;
use crate::tables::{Moon, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoonPhase {
    pub phase: Phase,
    /// The day sits between two key days.
    pub transitional: bool,
}

impl MoonPhase {
    pub fn is_full(&self) -> bool {
        self.phase == Phase::Full && !self.transitional
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phase.name())
    }
}

/// Phase of `moon` on `day` of `month`.
///
/// A key day reports its own phase. Any other day reports the phase that
/// follows the latest earlier key, searching back into previous months when
/// the month has no earlier key.
pub fn phase_of(moon: Moon, month: Month, day: u8) -> MoonPhase {
    let keys = key_days(moon, month);
    if let Some(&(_, phase)) = keys.iter().find(|&&(d, _)| d == day) {
        return MoonPhase { phase, transitional: false };
    }
    if let Some(&(_, phase)) = keys.iter().rev().find(|&&(d, _)| d < day) {
        return MoonPhase { phase: phase.following(), transitional: true };
    }

    let mut previous = month.previous();
    for _ in 0..Month::ALL.len() {
        if let Some(&(_, phase)) = key_days(moon, previous).last() {
            return MoonPhase { phase: phase.following(), transitional: true };
        }
        previous = previous.previous();
    }
    MoonPhase { phase: Phase::New, transitional: true }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActivityLevel {
    Normal,
    Heightened,
    Maximum,
}

impl ActivityLevel {
    pub fn name(self) -> &'static str {
        match self {
            ActivityLevel::Normal => "normal",
            ActivityLevel::Heightened => "heightened",
            ActivityLevel::Maximum => "maximum",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Festival nights on which both moons are always full.
const FESTIVAL_NIGHTS: [(Month, u8); 2] = [(Month::Growfest, 4), (Month::Brewfest, 4)];

pub fn activity_for(month: Month, day: u8, luna: &MoonPhase, celene: &MoonPhase) -> ActivityLevel {
    if FESTIVAL_NIGHTS.contains(&(month, day)) {
        return ActivityLevel::Maximum;
    }
    match (luna.is_full(), celene.is_full()) {
        (true, true) => ActivityLevel::Maximum,
        (true, false) | (false, true) => ActivityLevel::Heightened,
        (false, false) => ActivityLevel::Normal,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoonReport {
    pub luna: MoonPhase,
    pub celene: MoonPhase,
    pub lycanthrope_activity: ActivityLevel,
}

pub fn moons_on(date: &CalendarDate) -> MoonReport {
    let luna = phase_of(Moon::Luna, date.month, date.day);
    let celene = phase_of(Moon::Celene, date.month, date.day);
    MoonReport {
        luna,
        celene,
        lycanthrope_activity: activity_for(date.month, date.day, &luna, &celene),
    }
}
