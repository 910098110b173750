//! Key-day phase tables for Luna and Celene.
//!
//! Luna runs a 28-day cycle locked to the months (full on the 11th) and is
//! full on the 4th of every festival. Celene runs a 91-day cycle and is full
//! only on the 4th of each festival. Days between keys are looked up by
//! `moon::phase_of`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calendar::Month;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Moon {
    Luna,
    Celene,
}

impl Moon {
    pub fn name(self) -> &'static str {
        match self {
            Moon::Luna => "Luna",
            Moon::Celene => "Celene",
        }
    }
}

impl fmt::Display for Moon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl Phase {
    /// The in-between phase that follows a key phase. Intermediate phases
    /// map to themselves.
    pub fn following(self) -> Phase {
        match self {
            Phase::New => Phase::WaxingCrescent,
            Phase::FirstQuarter => Phase::WaxingGibbous,
            Phase::Full => Phase::WaningGibbous,
            Phase::LastQuarter => Phase::WaningCrescent,
            other => other,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::New => "New",
            Phase::WaxingCrescent => "Waxing Crescent",
            Phase::FirstQuarter => "Waxing Half",
            Phase::WaxingGibbous => "Waxing Gibbous",
            Phase::Full => "Full",
            Phase::WaningGibbous => "Waning Gibbous",
            Phase::LastQuarter => "Waning Half",
            Phase::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const LUNA_MONTH: &[(u8, Phase)] = &[
    (4, Phase::FirstQuarter),
    (11, Phase::Full),
    (18, Phase::LastQuarter),
    (25, Phase::New),
];
const LUNA_FESTIVAL: &[(u8, Phase)] = &[(4, Phase::Full)];

const CELENE_FULL: &[(u8, Phase)] = &[(4, Phase::Full)];
const CELENE_WANING: &[(u8, Phase)] = &[(20, Phase::LastQuarter)];
const CELENE_NEW: &[(u8, Phase)] = &[(14, Phase::New)];
const CELENE_WAXING: &[(u8, Phase)] = &[(9, Phase::FirstQuarter)];

/// Key days for `moon` in `month`, ascending by day. May be empty.
pub fn key_days(moon: Moon, month: Month) -> &'static [(u8, Phase)] {
    match moon {
        Moon::Luna if month.is_festival() => LUNA_FESTIVAL,
        Moon::Luna => LUNA_MONTH,
        // Each festival opens a 91-day quarter of Celene's cycle.
        Moon::Celene => match (month.index() % 4, month.is_festival()) {
            (0, true) => CELENE_FULL,
            (1, _) => CELENE_WANING,
            (2, _) => CELENE_NEW,
            (3, _) => CELENE_WAXING,
            _ => &[],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_days_are_sorted_and_within_month() {
        for moon in [Moon::Luna, Moon::Celene] {
            for month in Month::ALL {
                let keys = key_days(moon, month);
                assert!(keys.windows(2).all(|w| w[0].0 < w[1].0));
                assert!(keys.iter().all(|&(d, _)| d >= 1 && d <= month.length()));
            }
        }
    }

    #[test]
    fn celene_is_full_on_every_festival() {
        for month in Month::ALL.into_iter().filter(|m| m.is_festival()) {
            assert_eq!(key_days(Moon::Celene, month), &[(4, Phase::Full)]);
        }
    }

    #[test]
    fn celene_quarters_are_91_days_apart() {
        let full = crate::calendar::CalendarDate::new(Month::Needfest, 4, 0).unwrap();
        let next_full = crate::calendar::CalendarDate::new(Month::Growfest, 4, 0).unwrap();
        assert_eq!(next_full.day_of_year() - full.day_of_year(), 91);
    }
}
