//! Daily high/low temperatures and the record-temperature state machine.
//!
//! Pipeline, in order:
//!   1. Month baseline and dice spread.
//!   2. Record roll (d100) when enabled and no extreme is running.
//!   3. Active extreme shifts the baseline before the dice are rolled.
//!   4. Latitude: +2°F per degree equatorward of 40°.
//!   5. Altitude: -3°F per full 1,000 ft.
//!   6. Terrain offsets (or canopy scaling of the dice spread).
//!   7. The extreme's remaining duration ticks down once.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{CalendarDate, Season};
use crate::dice::{DiceExpr, DiceRoller};
use crate::error::Result;
use crate::settings::LocationConfig;
use crate::tables::{climate, MonthClimate, TemperatureAdjustment};

/// Latitude the month baselines are calibrated to.
pub const BASELINE_LATITUDE: i32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtremeKind {
    #[default]
    None,
    RecordLow,
    SevereLow,
    ExtremeLow,
    RecordHigh,
    SevereHigh,
    ExtremeHigh,
}

impl ExtremeKind {
    /// Multiple of the month's maximum dice spread.
    pub fn multiplier(self) -> i32 {
        match self {
            ExtremeKind::None => 0,
            ExtremeKind::RecordLow | ExtremeKind::RecordHigh => 1,
            ExtremeKind::SevereLow | ExtremeKind::SevereHigh => 2,
            ExtremeKind::ExtremeLow | ExtremeKind::ExtremeHigh => 3,
        }
    }

    pub fn is_low(self) -> bool {
        matches!(self, ExtremeKind::RecordLow | ExtremeKind::SevereLow | ExtremeKind::ExtremeLow)
    }

    pub fn name(self) -> &'static str {
        match self {
            ExtremeKind::None => "none",
            ExtremeKind::RecordLow => "record low",
            ExtremeKind::SevereLow => "severe record low",
            ExtremeKind::ExtremeLow => "extreme record low",
            ExtremeKind::RecordHigh => "record high",
            ExtremeKind::SevereHigh => "severe record high",
            ExtremeKind::ExtremeHigh => "extreme record high",
        }
    }

    /// d100 record-temperature table.
    pub fn from_roll(roll: u32) -> ExtremeKind {
        match roll {
            1 => ExtremeKind::ExtremeLow,
            2 => ExtremeKind::SevereLow,
            3..=4 => ExtremeKind::RecordLow,
            97..=98 => ExtremeKind::RecordHigh,
            99 => ExtremeKind::SevereHigh,
            100 => ExtremeKind::ExtremeHigh,
            _ => ExtremeKind::None,
        }
    }
}

impl fmt::Display for ExtremeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Multi-day record temperature carried between days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtremeState {
    pub kind: ExtremeKind,
    pub remaining_days: u32,
}

impl ExtremeState {
    pub const NONE: ExtremeState = ExtremeState { kind: ExtremeKind::None, remaining_days: 0 };

    pub fn is_active(&self) -> bool {
        self.kind != ExtremeKind::None && self.remaining_days > 0
    }

    /// One day passes. Reverts to [`ExtremeState::NONE`] at zero.
    pub fn tick(self) -> ExtremeState {
        if !self.is_active() {
            return ExtremeState::NONE;
        }
        match self.remaining_days - 1 {
            0 => ExtremeState::NONE,
            remaining_days => ExtremeState { kind: self.kind, remaining_days },
        }
    }
}

/// d20 duration of a new extreme, skewed toward a few days.
pub fn extreme_duration(roll: u32) -> u32 {
    match roll {
        0..=1 => 1,
        2..=3 => 2,
        4..=10 => 3,
        11..=14 => 4,
        15..=17 => 5,
        18..=19 => 6,
        _ => 7,
    }
}

/// Signed shift an extreme applies to the month baseline.
///
/// Lows scale with the month's low-side dice ceiling, highs with the
/// high-side ceiling.
pub fn extreme_magnitude(kind: ExtremeKind, climate: &MonthClimate) -> Result<i32> {
    if kind == ExtremeKind::None {
        return Ok(0);
    }
    let magnitude = if kind.is_low() {
        -DiceExpr::parse(climate.low_adjustment)?.max()
    } else {
        DiceExpr::parse(climate.high_adjustment)?.max()
    };
    Ok(magnitude * kind.multiplier())
}

pub fn latitude_adjustment(latitude: i32) -> i32 {
    (BASELINE_LATITUDE - latitude) * 2
}

pub fn altitude_adjustment(elevation_feet: u32) -> i32 {
    -3 * (elevation_feet / 1000) as i32
}

/// (high, low) scale applied to the dice spread under a sylvan canopy.
pub fn canopy_factors(season: Season) -> (f64, f64) {
    match season {
        Season::Winter => (1.0, 0.25),
        Season::Spring | Season::Autumn => (0.25, 0.5),
        Season::LowSummer | Season::HighSummer => (0.5, 0.5),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTemperatures {
    pub high: i32,
    pub low: i32,
    /// The extreme in force today, before the end-of-day tick.
    pub extreme_today: ExtremeState,
    /// State to hand to tomorrow's generation.
    pub next_extreme: ExtremeState,
}

pub fn compute_daily_temperatures(
    date: &CalendarDate,
    location: &LocationConfig,
    prior: ExtremeState,
    use_record_temperatures: bool,
    roller: &mut dyn DiceRoller,
) -> Result<DailyTemperatures> {
    let climate = climate(date.month);
    let high_dice = DiceExpr::parse(climate.high_adjustment)?;
    let low_dice = DiceExpr::parse(climate.low_adjustment)?;

    // Continuing extremes run their course even if the flag was switched off.
    let mut today = if prior.is_active() { prior } else { ExtremeState::NONE };
    if use_record_temperatures && !today.is_active() {
        let kind = ExtremeKind::from_roll(roller.percentile());
        if kind != ExtremeKind::None {
            let remaining_days = extreme_duration(roller.roll(20));
            debug!(%kind, remaining_days, "record temperature begins");
            today = ExtremeState { kind, remaining_days };
        }
    }

    let shift = extreme_magnitude(today.kind, &climate)?;
    let baseline = f64::from(climate.base_temperature + shift);

    let mut high_spread = f64::from(high_dice.sample(roller));
    let mut low_spread = f64::from(low_dice.sample(roller));

    let thousands = (location.elevation_feet / 1000) as i32;
    let (day_offset, night_offset) = match location.terrain.profile().temperature {
        TemperatureAdjustment::Fixed { day, night } => (day, night),
        TemperatureAdjustment::PerThousandFeet { day, night } => (day * thousands, night * thousands),
        TemperatureAdjustment::CanopyScaled => {
            let (high_factor, low_factor) = canopy_factors(date.season());
            high_spread *= high_factor;
            low_spread *= low_factor;
            (0, 0)
        }
    };

    let common = f64::from(latitude_adjustment(location.latitude) + altitude_adjustment(location.elevation_feet));
    let mut high = baseline + high_spread + common + f64::from(day_offset);
    let mut low = baseline - low_spread + common + f64::from(night_offset);
    if high < low {
        std::mem::swap(&mut high, &mut low);
    }

    Ok(DailyTemperatures {
        high: high.round() as i32,
        low: low.round() as i32,
        extreme_today: today,
        next_extreme: today.tick(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Month;
    use crate::dice::{RandomRoller, ScriptedRoller};
    use crate::tables::Terrain;
    use approx::assert_relative_eq;

    fn plains(latitude: i32) -> LocationConfig {
        LocationConfig { latitude, elevation_feet: 0, terrain: Terrain::Plains }
    }

    fn date(month: Month, day: u8) -> CalendarDate {
        CalendarDate::new(month, day, 591).unwrap()
    }

    #[test]
    fn adjustment_formulas() {
        assert_eq!(altitude_adjustment(3000), -9);
        assert_eq!(altitude_adjustment(2999), -6);
        assert_eq!(latitude_adjustment(30), 20);
        assert_eq!(latitude_adjustment(40), 0);
        assert_eq!(latitude_adjustment(60), -40);
    }

    #[test]
    fn duration_table_edges() {
        let expected = [(1, 1), (2, 2), (3, 2), (4, 3), (10, 3), (11, 4), (14, 4), (15, 5), (17, 5), (18, 6), (19, 6), (20, 7)];
        for (roll, days) in expected {
            assert_eq!(extreme_duration(roll), days, "d20={roll}");
        }
    }

    #[test]
    fn record_roll_table() {
        assert_eq!(ExtremeKind::from_roll(1), ExtremeKind::ExtremeLow);
        assert_eq!(ExtremeKind::from_roll(2), ExtremeKind::SevereLow);
        assert_eq!(ExtremeKind::from_roll(4), ExtremeKind::RecordLow);
        assert_eq!(ExtremeKind::from_roll(5), ExtremeKind::None);
        assert_eq!(ExtremeKind::from_roll(96), ExtremeKind::None);
        assert_eq!(ExtremeKind::from_roll(97), ExtremeKind::RecordHigh);
        assert_eq!(ExtremeKind::from_roll(99), ExtremeKind::SevereHigh);
        assert_eq!(ExtremeKind::from_roll(100), ExtremeKind::ExtremeHigh);
    }

    #[test]
    fn extreme_low_shifts_both_temperatures_by_three_times_low_ceiling() {
        let d = date(Month::Coldeven, 1);
        let loc = plains(40);
        // No extreme: d100 = 50, then high d8+4 → 3, low d10+4 → 5.
        let mut calm = ScriptedRoller::new([50, 3, 5], 0);
        let base = compute_daily_temperatures(&d, &loc, ExtremeState::NONE, true, &mut calm).unwrap();
        // Extreme low: d100 = 1, d20 = 20 (7 days), same spread rolls.
        let mut cold = ScriptedRoller::new([1, 20, 3, 5], 0);
        let t = compute_daily_temperatures(&d, &loc, ExtremeState::NONE, true, &mut cold).unwrap();

        let magnitude = -3 * DiceExpr::parse(climate(Month::Coldeven).low_adjustment).unwrap().max();
        assert_eq!(magnitude, -42);
        assert_eq!(t.high - base.high, magnitude);
        assert_eq!(t.low - base.low, magnitude);
        assert_eq!(t.extreme_today, ExtremeState { kind: ExtremeKind::ExtremeLow, remaining_days: 7 });
        assert_eq!(t.next_extreme.remaining_days, 6);
    }

    #[test]
    fn extreme_runs_its_duration_then_clears() {
        let d = date(Month::Fireseek, 3);
        let loc = plains(40);
        let mut roller = ScriptedRoller::new([100, 12], 5);
        let first = compute_daily_temperatures(&d, &loc, ExtremeState::NONE, true, &mut roller).unwrap();
        assert_eq!(first.extreme_today.kind, ExtremeKind::ExtremeHigh);
        assert_eq!(first.extreme_today.remaining_days, 4);

        let mut state = first.next_extreme;
        let mut days = 1;
        while state.is_active() {
            let t = compute_daily_temperatures(&d, &loc, state, true, &mut roller).unwrap();
            assert_eq!(t.extreme_today.kind, ExtremeKind::ExtremeHigh, "no new roll while active");
            assert!(t.next_extreme.remaining_days < state.remaining_days || !t.next_extreme.is_active());
            state = t.next_extreme;
            days += 1;
        }
        assert_eq!(days, 4);
        assert_eq!(state, ExtremeState::NONE);
    }

    #[test]
    fn disabled_records_consume_no_roll() {
        let d = date(Month::Reaping, 10);
        // Only the two spread rolls are scripted; a record roll would eat one.
        let mut roller = ScriptedRoller::new([1, 1], 0);
        let t = compute_daily_temperatures(&d, &plains(40), ExtremeState::NONE, false, &mut roller).unwrap();
        assert_eq!(roller.remaining(), 0);
        // Reaping: 77 + (d6+4 → 5), 77 - (d6+6 → 7).
        assert_eq!((t.high, t.low), (82, 70));
    }

    #[test]
    fn latitude_and_altitude_apply_to_both() {
        let d = date(Month::Reaping, 10);
        let loc = LocationConfig { latitude: 30, elevation_feet: 3000, terrain: Terrain::Plains };
        let mut roller = ScriptedRoller::new([1, 1], 0);
        let t = compute_daily_temperatures(&d, &loc, ExtremeState::NONE, false, &mut roller).unwrap();
        assert_eq!((t.high, t.low), (82 + 20 - 9, 70 + 20 - 9));
    }

    #[test]
    fn mountains_cool_per_thousand_feet() {
        // Reaping at 40°N, 5,000 ft: 77 + 5 - 15 and 77 - 7 - 15 on the plains.
        let d = date(Month::Reaping, 10);
        let at = |terrain| LocationConfig { latitude: 40, elevation_feet: 5000, terrain };

        let mut roller = ScriptedRoller::new([1, 1], 0);
        let plains = compute_daily_temperatures(&d, &at(Terrain::Plains), ExtremeState::NONE, false, &mut roller).unwrap();
        assert_eq!((plains.high, plains.low), (67, 55));

        let mut roller = ScriptedRoller::new([1, 1], 0);
        let peaks = compute_daily_temperatures(&d, &at(Terrain::Mountains), ExtremeState::NONE, false, &mut roller).unwrap();
        assert_eq!((peaks.high, peaks.low), (67 - 5, 55 - 10));

        // Below a thousand feet the mountains add nothing.
        let mut roller = ScriptedRoller::new([1, 1], 0);
        let low_pass = LocationConfig { elevation_feet: 999, ..at(Terrain::Mountains) };
        let t = compute_daily_temperatures(&d, &low_pass, ExtremeState::NONE, false, &mut roller).unwrap();
        assert_eq!((t.high, t.low), (82, 70));
    }

    #[test]
    fn canopy_scales_spread_by_season() {
        let (h, l) = canopy_factors(Season::Spring);
        assert_relative_eq!(h, 0.25);
        assert_relative_eq!(l, 0.5);
        let (h, l) = canopy_factors(Season::Winter);
        assert_relative_eq!(h, 1.0);
        assert_relative_eq!(l, 0.25);

        // Reaping (High Summer): 77 + 0.5 * 10 = 82, 77 - 0.5 * 12 = 71.
        let loc = LocationConfig { latitude: 40, elevation_feet: 0, terrain: Terrain::SylvanForest };
        let mut roller = ScriptedRoller::new([6, 6], 0);
        let t = compute_daily_temperatures(&date(Month::Reaping, 1), &loc, ExtremeState::NONE, false, &mut roller).unwrap();
        assert_eq!((t.high, t.low), (82, 71));
    }

    #[test]
    fn high_never_below_low() {
        let mut roller = RandomRoller::seeded(11);
        for terrain in Terrain::ALL {
            for month in Month::ALL {
                let loc = LocationConfig { latitude: 45, elevation_feet: 6000, terrain };
                let t = compute_daily_temperatures(&date(month, 1), &loc, ExtremeState::NONE, true, &mut roller).unwrap();
                assert!(t.high >= t.low, "{terrain} {month}: {} < {}", t.high, t.low);
            }
        }
    }
}
