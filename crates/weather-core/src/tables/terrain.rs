//! Terrain profiles: how each terrain shifts precipitation, temperature and
//! wind, and which special phenomena it can produce.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::special::SpecialEvent;
use crate::calendar::lookup_key;
use crate::error::WeatherError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    RoughOrHills,
    Forest,
    SylvanForest,
    Jungle,
    SwampOrMarsh,
    Dust,
    Plains,
    Desert,
    Mountains,
    Seacoast,
    AtSea,
    Tundra,
    Glacier,
    Volcanic,
}

impl Terrain {
    pub const ALL: [Terrain; 14] = [
        Terrain::RoughOrHills,
        Terrain::Forest,
        Terrain::SylvanForest,
        Terrain::Jungle,
        Terrain::SwampOrMarsh,
        Terrain::Dust,
        Terrain::Plains,
        Terrain::Desert,
        Terrain::Mountains,
        Terrain::Seacoast,
        Terrain::AtSea,
        Terrain::Tundra,
        Terrain::Glacier,
        Terrain::Volcanic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Terrain::RoughOrHills => "Rough or Hills",
            Terrain::Forest => "Forest",
            Terrain::SylvanForest => "Sylvan Forest",
            Terrain::Jungle => "Jungle",
            Terrain::SwampOrMarsh => "Swamp or Marsh",
            Terrain::Dust => "Dust",
            Terrain::Plains => "Plains",
            Terrain::Desert => "Desert",
            Terrain::Mountains => "Mountains",
            Terrain::Seacoast => "Seacoast",
            Terrain::AtSea => "At Sea",
            Terrain::Tundra => "Tundra",
            Terrain::Glacier => "Glacier",
            Terrain::Volcanic => "Volcanic",
        }
    }

    /// Short names accepted on top of the canonical ones.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Terrain::RoughOrHills => &["rough", "hills"],
            Terrain::SwampOrMarsh => &["swamp", "marsh"],
            Terrain::AtSea => &["sea", "ocean"],
            Terrain::Seacoast => &["coast"],
            _ => &[],
        }
    }

    pub fn profile(self) -> TerrainProfile {
        use SpecialEvent as E;
        use TemperatureAdjustment as T;
        use WindAdjustment as W;

        match self {
            Terrain::RoughOrHills => TerrainProfile {
                precipitation_adjustment: 0,
                temperature: T::Fixed { day: 0, night: 0 },
                wind: W::EitherOf(5, -5),
                special_events: &[
                    SpecialRange { low: 1, high: 80, event: E::FlashFlood },
                    SpecialRange { low: 81, high: 100, event: E::Earthquake },
                ],
                notes: &[],
            },
            Terrain::Forest => TerrainProfile {
                precipitation_adjustment: 0,
                temperature: T::Fixed { day: -5, night: -5 },
                wind: W::Fixed(-5),
                special_events: &[
                    SpecialRange { low: 1, high: 70, event: E::ForestFire },
                    SpecialRange { low: 71, high: 100, event: E::Windstorm },
                ],
                notes: &[],
            },
            Terrain::SylvanForest => TerrainProfile {
                precipitation_adjustment: 0,
                temperature: T::CanopyScaled,
                wind: W::Fixed(-10),
                special_events: &[
                    SpecialRange { low: 1, high: 60, event: E::FeyLights },
                    SpecialRange { low: 61, high: 100, event: E::SunShower },
                ],
                notes: &[TerrainNote::Remark("the canopy tempers daily temperature swings")],
            },
            Terrain::Jungle => TerrainProfile {
                precipitation_adjustment: 10,
                temperature: T::Fixed { day: 5, night: 5 },
                wind: W::Fixed(-10),
                special_events: &[
                    SpecialRange { low: 1, high: 5, event: E::Volcano },
                    SpecialRange { low: 6, high: 60, event: E::RainForestDownpour },
                    SpecialRange { low: 61, high: 80, event: E::Quicksand },
                    SpecialRange { low: 81, high: 100, event: E::Earthquake },
                ],
                notes: &[],
            },
            Terrain::SwampOrMarsh => TerrainProfile {
                precipitation_adjustment: 5,
                temperature: T::Fixed { day: 5, night: 5 },
                wind: W::Fixed(-5),
                special_events: &[
                    SpecialRange { low: 1, high: 25, event: E::Quicksand },
                    SpecialRange { low: 26, high: 80, event: E::SunShower },
                    SpecialRange { low: 81, high: 100, event: E::InsectCloud },
                ],
                notes: &[TerrainNote::FogDurationDoubled],
            },
            Terrain::Dust => TerrainProfile {
                precipitation_adjustment: -25,
                temperature: T::Fixed { day: 10, night: -10 },
                wind: W::Fixed(0),
                special_events: &[
                    SpecialRange { low: 1, high: 40, event: E::FlashFlood },
                    SpecialRange { low: 41, high: 70, event: E::DustStorm },
                    SpecialRange { low: 71, high: 100, event: E::Tornado },
                ],
                notes: &[],
            },
            Terrain::Plains => TerrainProfile {
                precipitation_adjustment: 0,
                temperature: T::Fixed { day: 0, night: 0 },
                wind: W::Fixed(5),
                special_events: &[
                    SpecialRange { low: 1, high: 50, event: E::Tornado },
                    SpecialRange { low: 51, high: 100, event: E::FlashFlood },
                ],
                notes: &[],
            },
            Terrain::Desert => TerrainProfile {
                precipitation_adjustment: -30,
                temperature: T::Fixed { day: 10, night: -10 },
                wind: W::Fixed(5),
                // 86-100: nothing out of the ordinary.
                special_events: &[
                    SpecialRange { low: 1, high: 25, event: E::FlashFlood },
                    SpecialRange { low: 26, high: 50, event: E::DustStorm },
                    SpecialRange { low: 51, high: 65, event: E::Mirage },
                    SpecialRange { low: 66, high: 85, event: E::Sandstorm },
                ],
                notes: &[],
            },
            Terrain::Mountains => TerrainProfile {
                precipitation_adjustment: 0,
                temperature: T::PerThousandFeet { day: -1, night: -2 },
                wind: W::ElevationScaled,
                special_events: &[
                    SpecialRange { low: 1, high: 20, event: E::Avalanche },
                    SpecialRange { low: 21, high: 50, event: E::Windstorm },
                    SpecialRange { low: 51, high: 85, event: E::Rockslide },
                    SpecialRange { low: 86, high: 100, event: E::Volcano },
                ],
                notes: &[],
            },
            Terrain::Seacoast => TerrainProfile {
                precipitation_adjustment: 5,
                temperature: T::Fixed { day: -5, night: 5 },
                wind: W::EitherOf(5, -5),
                special_events: &[
                    SpecialRange { low: 1, high: 80, event: E::Earthquake },
                    SpecialRange { low: 81, high: 94, event: E::Tsunami },
                    SpecialRange { low: 95, high: 100, event: E::UnderseaVolcano },
                ],
                notes: &[TerrainNote::FogDurationDoubled],
            },
            Terrain::AtSea => TerrainProfile {
                precipitation_adjustment: 15,
                temperature: T::Fixed { day: -5, night: 5 },
                wind: W::Fixed(10),
                special_events: &[
                    SpecialRange { low: 1, high: 20, event: E::Maelstrom },
                    SpecialRange { low: 21, high: 40, event: E::StElmosFire },
                    SpecialRange { low: 41, high: 80, event: E::Waterspout },
                    SpecialRange { low: 81, high: 100, event: E::Tsunami },
                ],
                notes: &[],
            },
            Terrain::Tundra => TerrainProfile {
                precipitation_adjustment: -10,
                temperature: T::Fixed { day: -10, night: -10 },
                wind: W::Fixed(5),
                special_events: &[
                    SpecialRange { low: 1, high: 60, event: E::Whiteout },
                    SpecialRange { low: 61, high: 100, event: E::IceStorm },
                ],
                notes: &[],
            },
            Terrain::Glacier => TerrainProfile {
                precipitation_adjustment: -15,
                temperature: T::Fixed { day: -20, night: -20 },
                wind: W::Fixed(10),
                special_events: &[
                    SpecialRange { low: 1, high: 50, event: E::Avalanche },
                    SpecialRange { low: 51, high: 100, event: E::Whiteout },
                ],
                notes: &[],
            },
            Terrain::Volcanic => TerrainProfile {
                precipitation_adjustment: -5,
                temperature: T::Fixed { day: 10, night: 5 },
                wind: W::EitherOf(5, -5),
                special_events: &[
                    SpecialRange { low: 1, high: 60, event: E::Volcano },
                    SpecialRange { low: 61, high: 100, event: E::Earthquake },
                ],
                notes: &[TerrainNote::Remark("ash haze dims the sun on most days")],
            },
        }
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Terrain {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = lookup_key(s);
        Terrain::ALL
            .into_iter()
            .find(|t| {
                lookup_key(t.name()) == key || t.aliases().iter().any(|a| lookup_key(a) == key)
            })
            .ok_or_else(|| WeatherError::config(format!("unknown terrain `{s}`")))
    }
}

/// How a terrain moves the daily high (`day`) and low (`night`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureAdjustment {
    Fixed { day: i32, night: i32 },
    /// Degrees per full 1,000 ft of elevation.
    PerThousandFeet { day: i32, night: i32 },
    /// No flat offset: the month's dice spread itself is scaled by season.
    CanopyScaled,
}

/// How a terrain moves the wind speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindAdjustment {
    Fixed(i32),
    /// One of the two values, picked uniformly.
    EitherOf(i32, i32),
    /// Grows with elevation; see `wind::terrain_adjustment`.
    ElevationScaled,
}

/// Inclusive d100 range selecting a special event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialRange {
    pub low: u32,
    pub high: u32,
    pub event: SpecialEvent,
}

impl SpecialRange {
    pub fn contains(&self, roll: u32) -> bool {
        (self.low..=self.high).contains(&roll)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainNote {
    FogDurationDoubled,
    Remark(&'static str),
}

impl fmt::Display for TerrainNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainNote::FogDurationDoubled => f.write_str("duration of fog and mist is doubled"),
            TerrainNote::Remark(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainProfile {
    /// Added to the month's base precipitation chance.
    pub precipitation_adjustment: i32,
    pub temperature: TemperatureAdjustment,
    pub wind: WindAdjustment,
    /// Ordered, first match wins.
    pub special_events: &'static [SpecialRange],
    pub notes: &'static [TerrainNote],
}

impl TerrainProfile {
    pub fn doubles_fog(&self) -> bool {
        self.notes.contains(&TerrainNote::FogDurationDoubled)
    }
}
