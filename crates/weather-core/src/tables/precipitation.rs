//! The ordered precipitation table.
//!
//! Row order matters: the continuation step moves one row up or down, so
//! neighbouring rows are neighbouring kinds of weather. A d100 roll of 100
//! does not select a row; it routes to the terrain's special phenomena.

use std::fmt;

use serde::{Deserialize, Serialize};

use self::DurationUnit::{Days, Hours, Minutes};
use self::MovementRate::{PerMode, Uniform};
use self::PrecipitationKind as K;
use super::terrain::Terrain;
use super::terrain::Terrain as T;

/// d100 result that selects a special phenomenon instead of a table row.
pub const SPECIAL_ROLL: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrecipitationKind {
    HeavyBlizzard,
    Blizzard,
    HeavySnowstorm,
    LightSnowstorm,
    Sleetstorm,
    Hailstorm,
    HeavyFog,
    LightFog,
    Mist,
    Drizzle,
    LightRainstorm,
    HeavyRainstorm,
    Thunderstorm,
    TropicalStorm,
    Monsoon,
    Gale,
    Hurricane,
}

impl PrecipitationKind {
    pub fn name(self) -> &'static str {
        match self {
            PrecipitationKind::HeavyBlizzard => "Heavy Blizzard",
            PrecipitationKind::Blizzard => "Blizzard",
            PrecipitationKind::HeavySnowstorm => "Heavy Snowstorm",
            PrecipitationKind::LightSnowstorm => "Light Snowstorm",
            PrecipitationKind::Sleetstorm => "Sleetstorm",
            PrecipitationKind::Hailstorm => "Hailstorm",
            PrecipitationKind::HeavyFog => "Heavy Fog",
            PrecipitationKind::LightFog => "Light Fog",
            PrecipitationKind::Mist => "Mist",
            PrecipitationKind::Drizzle => "Drizzle",
            PrecipitationKind::LightRainstorm => "Light Rainstorm",
            PrecipitationKind::HeavyRainstorm => "Heavy Rainstorm",
            PrecipitationKind::Thunderstorm => "Thunderstorm",
            PrecipitationKind::TropicalStorm => "Tropical Storm",
            PrecipitationKind::Monsoon => "Monsoon",
            PrecipitationKind::Gale => "Gale",
            PrecipitationKind::Hurricane => "Hurricane or Typhoon",
        }
    }

    pub fn is_fog_or_mist(self) -> bool {
        matches!(
            self,
            PrecipitationKind::HeavyFog | PrecipitationKind::LightFog | PrecipitationKind::Mist
        )
    }
}

impl fmt::Display for PrecipitationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DurationUnit {
    Minutes,
    Hours,
    Days,
}

impl DurationUnit {
    pub fn label(self, amount: i32) -> &'static str {
        match (self, amount == 1) {
            (DurationUnit::Minutes, true) => "minute",
            (DurationUnit::Minutes, false) => "minutes",
            (DurationUnit::Hours, true) => "hour",
            (DurationUnit::Hours, false) => "hours",
            (DurationUnit::Days, true) => "day",
            (DurationUnit::Days, false) => "days",
        }
    }
}

/// Overland movement multiplier while the weather lasts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MovementRate {
    Uniform(f32),
    PerMode { foot: f32, horse: f32, cart: f32 },
}

impl fmt::Display for MovementRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MovementRate::Uniform(factor) => f.write_str(&factor_label(factor)),
            MovementRate::PerMode { foot, horse, cart } => write!(
                f,
                "foot {}, horse {}, cart {}",
                factor_label(foot),
                factor_label(horse),
                factor_label(cart)
            ),
        }
    }
}

/// `1.0` → "normal", `0.0` → "impossible", `0.25` → "x1/4".
fn factor_label(factor: f32) -> String {
    if factor <= 0.0 {
        return "impossible".to_string();
    }
    if (factor - 1.0).abs() < 1e-6 {
        return "normal".to_string();
    }
    for den in [2u32, 3, 4, 8] {
        let num = factor * den as f32;
        if (num - num.round()).abs() < 1e-4 {
            return format!("x{}/{den}", num.round() as u32);
        }
    }
    format!("x{factor:.2}")
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecipitationDetail {
    pub amount: &'static str,
    pub amount_unit: &'static str,
    pub duration: &'static str,
    pub duration_unit: DurationUnit,
    pub movement: MovementRate,
    pub vision: &'static str,
    pub tracking: &'static str,
    pub wind_speed: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecipitationEntry {
    pub kind: PrecipitationKind,
    /// Inclusive d100 range.
    pub low: u32,
    pub high: u32,
    /// The day's high must be at least this (°F).
    pub min_temperature: Option<i32>,
    /// The day's high must be at most this (°F).
    pub max_temperature: Option<i32>,
    pub continuation_chance: u32,
    pub rainbow_chance: u32,
    pub forbidden_in: &'static [Terrain],
    pub detail: PrecipitationDetail,
}

impl PrecipitationEntry {
    pub fn allows_terrain(&self, terrain: Terrain) -> bool {
        !self.forbidden_in.contains(&terrain)
    }

    pub fn allows_temperature(&self, high: i32) -> bool {
        self.min_temperature.map_or(true, |min| high >= min)
            && self.max_temperature.map_or(true, |max| high <= max)
    }
}

/// Result of looking a d100 roll up in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRoll {
    Row(usize),
    Special,
}

/// Map a d100 roll to a row index or the special route.
pub fn lookup(roll: u32) -> TableRoll {
    if roll >= SPECIAL_ROLL {
        return TableRoll::Special;
    }
    PRECIPITATION_TABLE
        .iter()
        .position(|e| (e.low..=e.high).contains(&roll))
        .map_or(TableRoll::Special, TableRoll::Row)
}

#[allow(clippy::too_many_arguments)]
const fn entry(
    kind: PrecipitationKind,
    range: (u32, u32),
    temperature: (Option<i32>, Option<i32>),
    continuation_chance: u32,
    rainbow_chance: u32,
    forbidden_in: &'static [Terrain],
    detail: PrecipitationDetail,
) -> PrecipitationEntry {
    PrecipitationEntry {
        kind,
        low: range.0,
        high: range.1,
        min_temperature: temperature.0,
        max_temperature: temperature.1,
        continuation_chance,
        rainbow_chance,
        forbidden_in,
        detail,
    }
}

#[allow(clippy::too_many_arguments)]
const fn detail(
    amount: &'static str,
    amount_unit: &'static str,
    duration: (&'static str, DurationUnit),
    movement: MovementRate,
    vision: &'static str,
    tracking: &'static str,
    wind_speed: &'static str,
) -> PrecipitationDetail {
    PrecipitationDetail {
        amount,
        amount_unit,
        duration: duration.0,
        duration_unit: duration.1,
        movement,
        vision,
        tracking,
        wind_speed,
    }
}

const NO_SNOW: &[Terrain] = &[T::Desert, T::Jungle, T::Dust];
const NO_FOG: &[Terrain] = &[T::Desert, T::Dust];
const NO_TROPICAL: &[Terrain] = &[T::Desert, T::Dust, T::Tundra, T::Glacier];

pub static PRECIPITATION_TABLE: [PrecipitationEntry; 17] = [
    entry(K::HeavyBlizzard, (1, 2), (None, Some(10)), 5, 1, NO_SNOW,
        detail("2d10+10", "in. of snow", ("3d8", Hours),
            PerMode { foot: 0.125, horse: 0.25, cart: 0.0 }, "2 ft radius", "impossible", "6d8+40")),
    entry(K::Blizzard, (3, 5), (None, Some(20)), 10, 1, NO_SNOW,
        detail("2d8+8", "in. of snow", ("4d6", Hours),
            PerMode { foot: 0.25, horse: 0.25, cart: 0.125 }, "10 ft radius", "-40%", "3d8+36")),
    entry(K::HeavySnowstorm, (6, 10), (None, Some(25)), 20, 1, NO_SNOW,
        detail("2d8+2", "in. of snow", ("4d6", Hours),
            Uniform(0.5), "50 ft radius", "-25%", "3d10")),
    entry(K::LightSnowstorm, (11, 20), (None, Some(35)), 25, 1, NO_SNOW,
        detail("2d6", "in. of snow", ("2d6", Hours),
            Uniform(0.75), "three-quarters normal", "-10%", "4d6")),
    entry(K::Sleetstorm, (21, 25), (None, Some(35)), 20, 1, &[T::Desert, T::Dust],
        detail("d2", "in. of sleet", ("d6", Hours),
            Uniform(0.75), "three-quarters normal", "-10%", "3d10")),
    entry(K::Hailstorm, (26, 27), (None, Some(65)), 10, 5, &[T::Desert, T::Dust],
        detail("d2", "in. hailstones", ("5d6", Minutes),
            Uniform(0.75), "normal", "-10%", "4d10")),
    entry(K::HeavyFog, (28, 30), (Some(20), Some(60)), 25, 1, NO_FOG,
        detail("None", "", ("d12", Hours),
            Uniform(0.25), "2 ft radius", "-60%", "d20")),
    entry(K::LightFog, (31, 38), (Some(30), Some(70)), 30, 3, NO_FOG,
        detail("None", "", ("2d4", Hours),
            Uniform(0.5), "one-quarter normal", "-30%", "d10")),
    entry(K::Mist, (39, 40), (Some(30), None), 15, 10, NO_FOG,
        detail("None", "", ("2d6", Hours),
            Uniform(1.0), "normal", "-5%", "d10")),
    entry(K::Drizzle, (41, 45), (Some(25), None), 20, 5, &[],
        detail("1/4d4", "in. of rain", ("d10", Hours),
            Uniform(1.0), "normal", "-1% per turn", "d20")),
    entry(K::LightRainstorm, (46, 60), (Some(25), None), 45, 15, &[],
        detail("d3", "in. of rain", ("d12", Hours),
            Uniform(1.0), "normal", "-10% per turn", "d20")),
    entry(K::HeavyRainstorm, (61, 70), (Some(25), None), 30, 20, &[T::Desert],
        detail("d4+2", "in. of rain", ("d12", Hours),
            PerMode { foot: 0.75, horse: 0.75, cart: 0.5 }, "three-quarters normal", "-10% per turn", "2d12")),
    entry(K::Thunderstorm, (71, 84), (Some(30), None), 15, 20, &[],
        detail("d3", "in. of rain", ("d4", Hours),
            PerMode { foot: 0.75, horse: 0.75, cart: 0.5 }, "three-quarters normal", "-10% per turn", "4d12")),
    entry(K::TropicalStorm, (85, 89), (Some(40), None), 20, 10, NO_TROPICAL,
        detail("d6", "in. of rain per day", ("d3", Days),
            PerMode { foot: 0.25, horse: 0.25, cart: 0.0 }, "one-quarter normal", "impossible", "3d12+30")),
    entry(K::Monsoon, (90, 94), (Some(55), None), 30, 5, &[T::Desert, T::Dust, T::Plains, T::Tundra, T::Glacier],
        detail("d8", "in. of rain per day", ("d6+6", Days),
            PerMode { foot: 0.25, horse: 0.25, cart: 0.0 }, "one-quarter normal", "impossible", "5d6")),
    entry(K::Gale, (95, 97), (Some(40), None), 15, 10, &[T::Desert, T::Dust],
        detail("d8", "in. of rain per day", ("d3", Days),
            Uniform(0.25), "one-quarter normal", "impossible", "6d8+40")),
    entry(K::Hurricane, (98, 99), (Some(55), None), 20, 5, &[T::Desert, T::Dust, T::Tundra, T::Glacier, T::Mountains],
        detail("d10", "in. of rain per day", ("d4", Days),
            PerMode { foot: 0.25, horse: 0.25, cart: 0.0 }, "one-quarter normal", "impossible", "7d10+70")),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_cover_1_to_99_in_order() {
        let mut next = 1;
        for e in PRECIPITATION_TABLE.iter() {
            assert_eq!(e.low, next, "{} starts at {}", e.kind, e.low);
            assert!(e.high >= e.low);
            next = e.high + 1;
        }
        assert_eq!(next, SPECIAL_ROLL);
    }

    #[test]
    fn lookup_maps_rolls() {
        assert_eq!(lookup(1), TableRoll::Row(0));
        assert_eq!(lookup(50), TableRoll::Row(10));
        assert_eq!(lookup(99), TableRoll::Row(16));
        assert_eq!(lookup(100), TableRoll::Special);
    }

    #[test]
    fn temperature_gates() {
        let blizzard = &PRECIPITATION_TABLE[0];
        assert!(blizzard.allows_temperature(10));
        assert!(!blizzard.allows_temperature(11));
        let fog = &PRECIPITATION_TABLE[6];
        assert!(!fog.allows_temperature(19));
        assert!(fog.allows_temperature(40));
        assert!(!fog.allows_temperature(61));
    }

    #[test]
    fn movement_labels() {
        assert_eq!(Uniform(0.5).to_string(), "x1/2");
        assert_eq!(Uniform(1.0).to_string(), "normal");
        assert_eq!(
            PerMode { foot: 0.125, horse: 0.25, cart: 0.0 }.to_string(),
            "foot x1/8, horse x1/4, cart impossible"
        );
    }
}
