//! Precipitation state machine.
//!
//! Per day:
//!   1. A continuing type from yesterday is reused as-is, unless today's
//!      terrain forbids it.
//!   2. Otherwise d100 against the month's chance plus the terrain
//!      adjustment, then up to [`MAX_TYPE_ATTEMPTS`] d100 rolls on the table
//!      for a row the terrain and the day's high both allow.
//!   3. Amount and duration are sampled from the row's dice.
//!   4. After wind, [`continue_or_end`] decides tomorrow's state and rolls
//!      for a rainbow when the weather ends.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dice::{DiceExpr, DiceRoller};
use crate::error::{Result, WeatherError};
use crate::tables::precipitation::{lookup, TableRoll};
use crate::tables::{
    DurationUnit, MovementRate, PrecipitationEntry, PrecipitationKind, Terrain, PRECIPITATION_TABLE,
};

/// Type-roll attempts before a wet day falls back to dry.
pub const MAX_TYPE_ATTEMPTS: u32 = 2;

/// Precipitation carried from one day to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PrecipitationState {
    #[default]
    None,
    Active {
        /// Row of [`PRECIPITATION_TABLE`].
        type_index: usize,
        /// In the row's own duration unit.
        remaining_duration: i32,
        /// Percent chance the row continues past the next day.
        chance_continuing: u32,
    },
}

impl PrecipitationState {
    pub fn active(type_index: usize, remaining_duration: i32) -> Self {
        PrecipitationState::Active {
            type_index,
            remaining_duration,
            chance_continuing: PRECIPITATION_TABLE[type_index].continuation_chance,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, PrecipitationState::Active { .. })
    }

    /// Rejects a persisted state whose row no longer exists.
    pub fn validate(&self) -> Result<()> {
        match *self {
            PrecipitationState::Active { type_index, .. } if type_index >= PRECIPITATION_TABLE.len() => {
                Err(WeatherError::config(format!(
                    "precipitation row {type_index} is outside the table (0..{})",
                    PRECIPITATION_TABLE.len()
                )))
            }
            _ => Ok(()),
        }
    }
}

/// What kind of day today is, before any amounts are rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Determination {
    Dry,
    Row { index: usize, continuing: bool },
    /// d100 came up 100 with special weather enabled.
    Special,
}

/// Pick today's precipitation type.
pub fn determine_type(
    prior: &PrecipitationState,
    month_chance: u32,
    terrain: Terrain,
    high: i32,
    enable_special_weather: bool,
    roller: &mut dyn DiceRoller,
) -> Determination {
    if let PrecipitationState::Active { type_index, .. } = *prior {
        let index = type_index.min(PRECIPITATION_TABLE.len() - 1);
        let entry = &PRECIPITATION_TABLE[index];
        if entry.allows_terrain(terrain) {
            return Determination::Row { index, continuing: true };
        }
        debug!(kind = %entry.kind, %terrain, "carried precipitation forbidden here, determining afresh");
    }

    let chance = month_chance as i32 + terrain.profile().precipitation_adjustment;
    if roller.percentile() as i32 > chance {
        return Determination::Dry;
    }

    for attempt in 1..=MAX_TYPE_ATTEMPTS {
        match lookup(roller.percentile()) {
            TableRoll::Special if enable_special_weather => return Determination::Special,
            TableRoll::Special => debug!(attempt, "special weather disabled, rerolling type"),
            TableRoll::Row(index) => {
                let entry = &PRECIPITATION_TABLE[index];
                if entry.allows_terrain(terrain) && entry.allows_temperature(high) {
                    return Determination::Row { index, continuing: false };
                }
                debug!(attempt, kind = %entry.kind, %terrain, high, "precipitation type rejected");
            }
        }
    }
    debug!(attempts = MAX_TYPE_ATTEMPTS, "no valid precipitation type, day is dry");
    Determination::Dry
}

/// Sampled precipitation for the day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecipitationOutcome {
    pub index: usize,
    pub kind: PrecipitationKind,
    /// `None` for rows without a measurable amount (fog, mist).
    pub amount: Option<i32>,
    pub amount_unit: &'static str,
    pub duration: i32,
    pub duration_unit: DurationUnit,
    pub movement: MovementRate,
    pub vision: &'static str,
    pub tracking: &'static str,
    pub wind_speed: &'static str,
    pub continuing: bool,
    /// Percent chance the weather carries into tomorrow.
    pub chance_continuing: u32,
}

impl PrecipitationOutcome {
    pub fn entry(&self) -> &'static PrecipitationEntry {
        &PRECIPITATION_TABLE[self.index]
    }
}

/// Duration for `entry`, doubled for fog and mist where the terrain says so.
/// The doubled value stays in the row's own unit.
pub fn sample_duration(entry: &PrecipitationEntry, terrain: Terrain, roller: &mut dyn DiceRoller) -> Result<i32> {
    let duration = DiceExpr::parse(entry.detail.duration)?.sample(roller).max(1);
    if entry.kind.is_fog_or_mist() && terrain.profile().doubles_fog() {
        Ok(duration * 2)
    } else {
        Ok(duration)
    }
}

/// Roll amount and (for a new type) duration for row `index`.
///
/// A continuing type keeps the duration and continuation chance carried in
/// `prior`.
pub fn sample_outcome(
    index: usize,
    continuing: bool,
    prior: &PrecipitationState,
    terrain: Terrain,
    roller: &mut dyn DiceRoller,
) -> Result<PrecipitationOutcome> {
    let entry = &PRECIPITATION_TABLE[index];
    let detail = &entry.detail;

    let amount_expr = DiceExpr::parse(detail.amount)?;
    let amount = (!amount_expr.is_zero()).then(|| amount_expr.sample(roller).max(0));

    let (duration, chance_continuing) = match (*prior, continuing) {
        (PrecipitationState::Active { remaining_duration, chance_continuing, .. }, true) => {
            (remaining_duration, chance_continuing)
        }
        _ => (sample_duration(entry, terrain, roller)?, entry.continuation_chance),
    };

    Ok(PrecipitationOutcome {
        index,
        kind: entry.kind,
        amount,
        amount_unit: detail.amount_unit,
        duration,
        duration_unit: detail.duration_unit,
        movement: detail.movement,
        vision: detail.vision,
        tracking: detail.tracking,
        wind_speed: detail.wind_speed,
        continuing,
        chance_continuing,
    })
}

// ── Continuation ─────────────────────────────────────────────────────────────

/// Move one row milder on a 1, one row more severe on a 10. Clamped to the
/// table, and a step onto a row the terrain forbids stays put.
pub fn shift_index(index: usize, d10: u32, terrain: Terrain) -> usize {
    let last = PRECIPITATION_TABLE.len() - 1;
    let index = index.min(last);
    let target = match d10 {
        1 => index.saturating_sub(1),
        10 => (index + 1).min(last),
        _ => index,
    };
    if PRECIPITATION_TABLE[target].allows_terrain(terrain) {
        target
    } else {
        index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rainbow {
    Single,
    Double,
    Triple,
    Moonbow,
    Prismatic,
}

impl Rainbow {
    /// Classify the second d100 of a successful rainbow check.
    pub fn from_roll(roll: u32) -> Rainbow {
        match roll {
            0..=89 => Rainbow::Single,
            90..=95 => Rainbow::Double,
            96..=98 => Rainbow::Triple,
            99 => Rainbow::Moonbow,
            _ => Rainbow::Prismatic,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Rainbow::Single => "a single rainbow",
            Rainbow::Double => "a double rainbow (possibly an omen)",
            Rainbow::Triple => "a triple rainbow (almost certainly an omen)",
            Rainbow::Moonbow => "a moonbow, a rare omen of change",
            Rainbow::Prismatic => "a prismatic sky, the rarest of omens",
        }
    }
}

impl fmt::Display for Rainbow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

pub fn rainbow_check(chance: u32, roller: &mut dyn DiceRoller) -> Option<Rainbow> {
    if roller.percentile() > chance {
        return None;
    }
    Some(Rainbow::from_roll(roller.percentile()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Continuation {
    pub next: PrecipitationState,
    pub rainbow: Option<Rainbow>,
}

/// Decide tomorrow's state for today's row `index`, which continues with
/// `chance_continuing` percent.
pub fn continue_or_end(
    index: usize,
    chance_continuing: u32,
    terrain: Terrain,
    roller: &mut dyn DiceRoller,
) -> Result<Continuation> {
    let entry = &PRECIPITATION_TABLE[index];
    if roller.percentile() <= chance_continuing {
        let next_index = shift_index(index, roller.roll(10), terrain);
        if next_index != index {
            debug!(from = %entry.kind, to = %PRECIPITATION_TABLE[next_index].kind, "precipitation shifted");
        }
        let duration = sample_duration(&PRECIPITATION_TABLE[next_index], terrain, roller)?;
        return Ok(Continuation { next: PrecipitationState::active(next_index, duration), rainbow: None });
    }
    Ok(Continuation {
        next: PrecipitationState::None,
        rainbow: rainbow_check(entry.rainbow_chance, roller),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{RandomRoller, ScriptedRoller};

    #[test]
    fn forbidden_rows_are_never_selected() {
        let mut roller = RandomRoller::seeded(11);
        for terrain in Terrain::ALL {
            for _ in 0..1000 {
                let high = roller.roll(130) as i32 - 20;
                if let Determination::Row { index, .. } =
                    determine_type(&PrecipitationState::None, 100, terrain, high, true, &mut roller)
                {
                    let entry = &PRECIPITATION_TABLE[index];
                    assert!(entry.allows_terrain(terrain), "{} selected in {terrain}", entry.kind);
                    assert!(entry.allows_temperature(high), "{} selected at {high}°F", entry.kind);
                }
            }
        }
    }

    #[test]
    fn continuation_never_shifts_onto_forbidden_rows() {
        let mut roller = RandomRoller::seeded(12);
        for terrain in Terrain::ALL {
            for start in (0..PRECIPITATION_TABLE.len()).filter(|&i| PRECIPITATION_TABLE[i].allows_terrain(terrain)) {
                let mut index = start;
                for _ in 0..200 {
                    index = shift_index(index, roller.roll(10), terrain);
                    assert!(PRECIPITATION_TABLE[index].allows_terrain(terrain));
                }
            }
        }
    }

    #[test]
    fn index_stays_in_bounds() {
        let mut roller = RandomRoller::seeded(13);
        let last = PRECIPITATION_TABLE.len() - 1;
        for start in 0..=last {
            let mut index = start;
            for _ in 0..1000 {
                index = shift_index(index, roller.roll(10), Terrain::Plains);
                assert!(index <= last);
            }
        }
        assert_eq!(shift_index(0, 1, Terrain::Plains), 0);
        assert_eq!(shift_index(last, 10, Terrain::SwampOrMarsh), last);
    }

    #[test]
    fn shift_direction() {
        // LightRainstorm (10) in plains.
        assert_eq!(shift_index(10, 1, Terrain::Plains), 9);
        assert_eq!(shift_index(10, 5, Terrain::Plains), 10);
        assert_eq!(shift_index(10, 10, Terrain::Plains), 11);
        // Gale (15) → Hurricane (16) is forbidden in the mountains.
        assert_eq!(shift_index(15, 10, Terrain::Mountains), 15);
    }

    #[test]
    fn dry_when_chance_fails() {
        let mut r = ScriptedRoller::new([45], 0);
        assert_eq!(determine_type(&PrecipitationState::None, 44, Terrain::Dust, 50, true, &mut r), Determination::Dry);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn retry_is_bounded_to_two_attempts() {
        // Hit, then two blizzards on a warm day.
        let mut r = ScriptedRoller::new([1, 1, 2, 50], 0);
        assert_eq!(determine_type(&PrecipitationState::None, 50, Terrain::Plains, 70, true, &mut r), Determination::Dry);
        assert_eq!(r.remaining(), 1, "a third type roll was made");

        // First candidate rejected, second accepted.
        let mut r = ScriptedRoller::new([1, 1, 50], 0);
        assert_eq!(
            determine_type(&PrecipitationState::None, 50, Terrain::Plains, 70, true, &mut r),
            Determination::Row { index: 10, continuing: false }
        );
    }

    #[test]
    fn special_roll_respects_flag() {
        let mut r = ScriptedRoller::new([1, 100], 0);
        assert_eq!(determine_type(&PrecipitationState::None, 50, Terrain::Plains, 70, true, &mut r), Determination::Special);

        let mut r = ScriptedRoller::new([1, 100, 50], 0);
        assert_eq!(
            determine_type(&PrecipitationState::None, 50, Terrain::Plains, 70, false, &mut r),
            Determination::Row { index: 10, continuing: false }
        );
    }

    #[test]
    fn continuing_type_skips_rolls() {
        let prior = PrecipitationState::active(6, 3);
        let mut r = ScriptedRoller::new([0u32; 0], 0);
        // Heavy fog at 90°F would fail its gate, but it is already here.
        let d = determine_type(&prior, 50, Terrain::Plains, 90, true, &mut r);
        assert_eq!(d, Determination::Row { index: 6, continuing: true });
        let out = sample_outcome(6, true, &prior, Terrain::Plains, &mut r).unwrap();
        assert_eq!(out.duration, 3);
        assert_eq!(out.chance_continuing, PRECIPITATION_TABLE[6].continuation_chance);
        assert_eq!(out.amount, None);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn carried_type_forbidden_by_terrain_is_redetermined() {
        // Heavy blizzard carried into the desert: roll 1 hits the chance,
        // 50 picks a light rainstorm.
        let prior = PrecipitationState::active(0, 5);
        assert!(!PRECIPITATION_TABLE[0].allows_terrain(Terrain::Desert));
        let mut r = ScriptedRoller::new([1, 50], 0);
        let d = determine_type(&prior, 50, Terrain::Desert, 70, true, &mut r);
        assert_eq!(d, Determination::Row { index: 10, continuing: false });
        assert_eq!(r.remaining(), 0);

        // A miss on the chance roll makes it a dry day.
        let mut r = ScriptedRoller::new([100], 0);
        assert_eq!(determine_type(&prior, 50, Terrain::Desert, 70, true, &mut r), Determination::Dry);
    }

    #[test]
    fn carried_chance_governs_continuation() {
        let prior = PrecipitationState::Active { type_index: 10, remaining_duration: 2, chance_continuing: 0 };
        let mut r = ScriptedRoller::new([5], 0);
        let out = sample_outcome(10, true, &prior, Terrain::Plains, &mut r).unwrap();
        assert_eq!(out.chance_continuing, 0);

        // Roll 1 would continue a fresh light rainstorm (45%), not this one.
        let mut r = ScriptedRoller::new([1, 100], 0);
        let c = continue_or_end(out.index, out.chance_continuing, Terrain::Plains, &mut r).unwrap();
        assert_eq!(c.next, PrecipitationState::None);
        assert_eq!(c.rainbow, None);
    }

    #[test]
    fn fog_doubles_in_swamp() {
        let fog = &PRECIPITATION_TABLE[6];
        let mut r = ScriptedRoller::new([5, 5], 0);
        assert_eq!(sample_duration(fog, Terrain::Plains, &mut r).unwrap(), 5);
        assert_eq!(sample_duration(fog, Terrain::SwampOrMarsh, &mut r).unwrap(), 10);
        let rain = &PRECIPITATION_TABLE[10];
        let mut r = ScriptedRoller::new([5], 0);
        assert_eq!(sample_duration(rain, Terrain::SwampOrMarsh, &mut r).unwrap(), 5);
    }

    #[test]
    fn continuation_and_rainbow() {
        // LightRainstorm: continue 45%, rainbow 15%.
        let mut r = ScriptedRoller::new([45, 10, 4], 0);
        let c = continue_or_end(10, 45, Terrain::Plains, &mut r).unwrap();
        assert_eq!(c.next, PrecipitationState::Active { type_index: 11, remaining_duration: 4, chance_continuing: 30 });
        assert_eq!(c.rainbow, None);

        let mut r = ScriptedRoller::new([46, 15, 99], 0);
        let c = continue_or_end(10, 45, Terrain::Plains, &mut r).unwrap();
        assert_eq!(c.next, PrecipitationState::None);
        assert_eq!(c.rainbow, Some(Rainbow::Moonbow));

        let mut r = ScriptedRoller::new([46, 16], 0);
        assert_eq!(continue_or_end(10, 45, Terrain::Plains, &mut r).unwrap().rainbow, None);
    }

    #[test]
    fn rainbow_classes() {
        assert_eq!(Rainbow::from_roll(1), Rainbow::Single);
        assert_eq!(Rainbow::from_roll(89), Rainbow::Single);
        assert_eq!(Rainbow::from_roll(90), Rainbow::Double);
        assert_eq!(Rainbow::from_roll(95), Rainbow::Double);
        assert_eq!(Rainbow::from_roll(98), Rainbow::Triple);
        assert_eq!(Rainbow::from_roll(99), Rainbow::Moonbow);
        assert_eq!(Rainbow::from_roll(100), Rainbow::Prismatic);
    }

    #[test]
    fn state_serialises_tagged() {
        let json = serde_json::to_string(&PrecipitationState::active(2, 5)).unwrap();
        assert!(json.contains(r#""state":"active""#), "{json}");
        let back: PrecipitationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PrecipitationState::active(2, 5));
        let stale = PrecipitationState::Active { type_index: 17, remaining_duration: 1, chance_continuing: 0 };
        assert!(stale.validate().is_err());
    }
}
