//! Prevailing wind directions, wind chill and high-wind effects.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calendar::WindSeason;

/// Wind on a dry day: 0–19 mph.
pub const CALM_WIND: &str = "d20-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassDirection {
    pub const ALL: [CompassDirection; 8] = [
        CompassDirection::North,
        CompassDirection::NorthEast,
        CompassDirection::East,
        CompassDirection::SouthEast,
        CompassDirection::South,
        CompassDirection::SouthWest,
        CompassDirection::West,
        CompassDirection::NorthWest,
    ];

    pub fn abbreviation(self) -> &'static str {
        match self {
            CompassDirection::North => "N",
            CompassDirection::NorthEast => "NE",
            CompassDirection::East => "E",
            CompassDirection::SouthEast => "SE",
            CompassDirection::South => "S",
            CompassDirection::SouthWest => "SW",
            CompassDirection::West => "W",
            CompassDirection::NorthWest => "NW",
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Cumulative d20 upper bounds, one per entry of [`CompassDirection::ALL`].
pub fn direction_thresholds(season: WindSeason) -> [u32; 8] {
    match season {
        //                      N  NE  E  SE   S  SW   W  NW
        WindSeason::Winter => [5, 8, 9, 10, 11, 13, 16, 20],
        WindSeason::Spring => [3, 6, 8, 10, 12, 14, 17, 20],
        WindSeason::Summer => [2, 3, 5, 8, 12, 16, 19, 20],
        WindSeason::Autumn => [3, 5, 6, 8, 10, 13, 17, 20],
    }
}

/// Row keys of [`WIND_CHILL`], mph.
pub const WIND_CHILL_SPEEDS: [i32; 12] = [5, 10, 15, 20, 25, 30, 35, 40, 45, 50, 55, 60];

/// Column keys of [`WIND_CHILL`], °F.
pub const WIND_CHILL_TEMPERATURES: [i32; 12] = [35, 30, 25, 20, 15, 10, 5, 0, -5, -10, -15, -20];

/// Felt temperature by (wind speed row, air temperature column).
pub const WIND_CHILL: [[i32; 12]; 12] = [
    [33, 27, 21, 16, 12, 7, 0, -5, -10, -15, -21, -26],
    [21, 16, 9, 2, -2, -9, -15, -22, -27, -31, -38, -45],
    [16, 11, 1, -6, -11, -18, -25, -33, -40, -45, -51, -60],
    [12, 3, -4, -9, -17, -24, -32, -40, -46, -52, -60, -68],
    [7, 0, -7, -15, -22, -29, -37, -45, -52, -58, -67, -75],
    [5, -2, -11, -18, -26, -33, -41, -49, -56, -63, -70, -78],
    [3, -4, -13, -20, -27, -35, -43, -52, -60, -67, -72, -83],
    [1, -4, -15, -22, -29, -36, -45, -54, -62, -69, -76, -87],
    [1, -6, -17, -24, -31, -38, -46, -54, -63, -70, -78, -87],
    [0, -7, -17, -24, -31, -38, -47, -56, -63, -70, -79, -88],
    [-1, -8, -19, -25, -33, -40, -48, -57, -65, -72, -80, -89],
    [-3, -10, -21, -27, -34, -42, -50, -58, -67, -75, -83, -91],
];

/// Wind chill applies only below this low temperature (°F).
pub const WIND_CHILL_THRESHOLD: i32 = 35;

/// One severity band of the high-wind table, with effects per domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindBand {
    pub min_speed: i32,
    pub max_speed: i32,
    pub name: &'static str,
    pub land: &'static str,
    pub sea: &'static str,
    pub air: &'static str,
    pub battle: &'static str,
}

pub const WIND_BANDS: [WindBand; 5] = [
    WindBand {
        min_speed: 0,
        max_speed: 31,
        name: "Calm to Strong Breeze",
        land: "no effect",
        sea: "no effect",
        air: "no effect",
        battle: "no effect",
    },
    WindBand {
        min_speed: 32,
        max_speed: 54,
        name: "Gale",
        land: "small trees sway, loose objects are blown about, travel on foot is slowed",
        sea: "heavy seas; small craft should seek shelter",
        air: "flyers lose one maneuverability class; small flyers are grounded",
        battle: "missile fire at -1 to hit and half range",
    },
    WindBand {
        min_speed: 55,
        max_speed: 72,
        name: "Storm",
        land: "minor structural damage, trees uprooted, movement halved",
        sea: "ships in danger; small craft are swamped",
        air: "flight impossible below man-size; others lose two maneuverability classes",
        battle: "missile fire impossible; -2 to hit in melee",
    },
    WindBand {
        min_speed: 73,
        max_speed: 136,
        name: "Hurricane",
        land: "major structural damage; unsecured creatures are knocked prone",
        sea: "ships capsize or are driven ashore",
        air: "all flight is impossible",
        battle: "combat impossible for unsecured creatures",
    },
    WindBand {
        min_speed: 137,
        max_speed: 500,
        name: "Tornado",
        land: "total destruction along the path; creatures caught are hurled aloft",
        sea: "waterspouts form; vessels caught are destroyed",
        air: "flyers caught are torn apart",
        battle: "battle is impossible",
    },
];
