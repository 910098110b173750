//! Wind speed, prevailing direction, wind chill and high-wind effects.

use serde::{Deserialize, Serialize};

use crate::calendar::Season;
use crate::dice::{DiceExpr, DiceRoller};
use crate::error::Result;
use crate::settings::WindEffectScope;
use crate::tables::wind::{
    direction_thresholds, CALM_WIND, WIND_BANDS, WIND_CHILL, WIND_CHILL_SPEEDS,
    WIND_CHILL_TEMPERATURES, WIND_CHILL_THRESHOLD,
};
use crate::tables::{CompassDirection, Terrain, WindAdjustment, WindBand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindDomain {
    Land,
    Sea,
    Air,
    Battle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindEffect {
    pub domain: WindDomain,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindOutcome {
    /// mph, never negative.
    pub speed: i32,
    pub direction: CompassDirection,
    pub severity: String,
    pub effects: Vec<WindEffect>,
}

/// Terrain's contribution to wind speed.
///
/// Mountains grow windier with height: `10 + 0.5` mph per 1,000 ft with
/// realistic wind, otherwise a flat 5 mph per 1,000 ft.
pub fn terrain_adjustment(
    adjustment: WindAdjustment,
    elevation_feet: u32,
    use_realistic_wind: bool,
    roller: &mut dyn DiceRoller,
) -> f64 {
    match adjustment {
        WindAdjustment::Fixed(v) => f64::from(v),
        WindAdjustment::EitherOf(a, b) => f64::from(if roller.roll(2) == 1 { a } else { b }),
        WindAdjustment::ElevationScaled => {
            let thousands = f64::from(elevation_feet / 1000);
            if use_realistic_wind {
                10.0 + 0.5 * thousands
            } else {
                5.0 * thousands
            }
        }
    }
}

/// Season-weighted d20 pick among the eight compass points.
pub fn prevailing_direction(season: Season, roller: &mut dyn DiceRoller) -> CompassDirection {
    let roll = roller.roll(20);
    let thresholds = direction_thresholds(season.wind_bucket());
    thresholds
        .iter()
        .position(|&t| roll <= t)
        .map_or(CompassDirection::NorthWest, |i| CompassDirection::ALL[i])
}

/// Nearest-neighbour wind chill lookup. `None` when the low is 35°F or above.
///
/// Ties go to the first candidate in table order (slower row, warmer column).
pub fn wind_chill(speed: i32, low: i32) -> Option<i32> {
    if low >= WIND_CHILL_THRESHOLD {
        return None;
    }
    let row = nearest_index(&WIND_CHILL_SPEEDS, speed);
    let col = nearest_index(&WIND_CHILL_TEMPERATURES, low);
    Some(WIND_CHILL[row][col])
}

fn nearest_index(keys: &[i32], value: i32) -> usize {
    keys.iter()
        .enumerate()
        .min_by_key(|(_, &k)| (k - value).abs())
        .map_or(0, |(i, _)| i)
}

/// Severity band for a wind speed. Speeds past the table use the last band.
pub fn wind_band(speed: i32) -> &'static WindBand {
    WIND_BANDS
        .iter()
        .find(|b| (b.min_speed..=b.max_speed).contains(&speed))
        .unwrap_or(&WIND_BANDS[WIND_BANDS.len() - 1])
}

/// Effect texts for the domains the caller cares about.
pub fn effects_for(speed: i32, scope: &WindEffectScope) -> Vec<WindEffect> {
    let band = wind_band(speed);
    [
        (scope.on_land, WindDomain::Land, band.land),
        (scope.at_sea, WindDomain::Sea, band.sea),
        (scope.in_air, WindDomain::Air, band.air),
        (scope.in_battle, WindDomain::Battle, band.battle),
    ]
    .into_iter()
    .filter(|(wanted, _, _)| *wanted)
    .map(|(_, domain, text)| WindEffect { domain, text: text.to_string() })
    .collect()
}

/// Full wind computation for the day.
///
/// `weather_wind` is the wind-speed dice of today's precipitation or special
/// event; `None` on a dry day.
pub fn compute_wind(
    weather_wind: Option<&str>,
    terrain: Terrain,
    elevation_feet: u32,
    use_realistic_wind: bool,
    season: Season,
    scope: &WindEffectScope,
    roller: &mut dyn DiceRoller,
) -> Result<WindOutcome> {
    let dice = DiceExpr::parse(weather_wind.unwrap_or(CALM_WIND))?;
    let base = f64::from(dice.sample(roller));
    let adjustment = terrain_adjustment(terrain.profile().wind, elevation_feet, use_realistic_wind, roller);
    let speed = (base + adjustment).round().max(0.0) as i32;
    let direction = prevailing_direction(season, roller);

    Ok(WindOutcome {
        speed,
        direction,
        severity: wind_band(speed).name.to_string(),
        effects: effects_for(speed, scope),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{RandomRoller, ScriptedRoller};
    use crate::tables::PRECIPITATION_TABLE;

    #[test]
    fn wind_never_negative() {
        let mut roller = RandomRoller::seeded(3);
        let seasons = [Season::Winter, Season::Spring, Season::LowSummer, Season::HighSummer, Season::Autumn];
        for i in 0..1000u32 {
            let terrain = Terrain::ALL[(roller.roll(14) - 1) as usize];
            let elevation = roller.roll(20_000) - 1;
            let season = seasons[(roller.roll(5) - 1) as usize];
            let dice = match roller.roll(3) {
                1 => None,
                _ => Some(PRECIPITATION_TABLE[(roller.roll(17) - 1) as usize].detail.wind_speed),
            };
            let w = compute_wind(dice, terrain, elevation, i % 2 == 0, season, &WindEffectScope::default(), &mut roller).unwrap();
            assert!(w.speed >= 0, "{terrain} at {elevation} ft: {}", w.speed);
        }
    }

    #[test]
    fn calm_forest_day_clamps_at_zero() {
        // d20-1 → 0, forest -5.
        let mut roller = ScriptedRoller::new([1, 10], 0);
        let w = compute_wind(None, Terrain::Forest, 0, false, Season::Spring, &WindEffectScope::default(), &mut roller).unwrap();
        assert_eq!(w.speed, 0);
    }

    #[test]
    fn mountain_wind_scales_with_elevation() {
        let mut r = RandomRoller::seeded(0);
        assert_eq!(terrain_adjustment(WindAdjustment::ElevationScaled, 8500, false, &mut r), 40.0);
        assert_eq!(terrain_adjustment(WindAdjustment::ElevationScaled, 8500, true, &mut r), 14.0);
        assert_eq!(terrain_adjustment(WindAdjustment::ElevationScaled, 999, false, &mut r), 0.0);
    }

    #[test]
    fn either_of_picks_one_side() {
        let mut r = ScriptedRoller::new([1, 2], 0);
        assert_eq!(terrain_adjustment(WindAdjustment::EitherOf(5, -5), 0, false, &mut r), 5.0);
        assert_eq!(terrain_adjustment(WindAdjustment::EitherOf(5, -5), 0, false, &mut r), -5.0);
    }

    #[test]
    fn direction_follows_season_thresholds() {
        let mut r = ScriptedRoller::new([1, 5, 6, 20, 12], 0);
        assert_eq!(prevailing_direction(Season::Winter, &mut r), CompassDirection::North);
        assert_eq!(prevailing_direction(Season::Winter, &mut r), CompassDirection::North);
        assert_eq!(prevailing_direction(Season::Winter, &mut r), CompassDirection::NorthEast);
        assert_eq!(prevailing_direction(Season::Winter, &mut r), CompassDirection::NorthWest);
        // Low and High Summer share the summer column: 12 → S.
        assert_eq!(prevailing_direction(Season::HighSummer, &mut r), CompassDirection::South);
    }

    #[test]
    fn wind_chill_nearest_neighbour() {
        assert_eq!(wind_chill(10, 40), None);
        assert_eq!(wind_chill(10, 35), None);
        assert_eq!(wind_chill(10, 34), Some(21));
        // 0 mph → nearest row is 5 mph; 1°F → nearest column 0°F.
        assert_eq!(wind_chill(0, 1), Some(-5));
        // Far past the table edges.
        assert_eq!(wind_chill(90, -60), Some(-91));
        // 22 mph → 20 row; 12°F → 10 column.
        assert_eq!(wind_chill(22, 12), Some(-24));
    }

    #[test]
    fn bands_and_scoped_effects() {
        assert_eq!(wind_band(0).name, "Calm to Strong Breeze");
        assert_eq!(wind_band(31).name, "Calm to Strong Breeze");
        assert_eq!(wind_band(32).name, "Gale");
        assert_eq!(wind_band(136).name, "Hurricane");
        assert_eq!(wind_band(900).name, "Tornado");

        let land_only = effects_for(60, &WindEffectScope::default());
        assert_eq!(land_only.len(), 1);
        assert_eq!(land_only[0].domain, WindDomain::Land);

        let all = WindEffectScope { on_land: true, at_sea: true, in_air: true, in_battle: true };
        let effects = effects_for(60, &all);
        assert_eq!(
            effects.iter().map(|e| e.domain).collect::<Vec<_>>(),
            vec![WindDomain::Land, WindDomain::Sea, WindDomain::Air, WindDomain::Battle]
        );

        let none = WindEffectScope { on_land: false, ..WindEffectScope::default() };
        assert!(effects_for(60, &none).is_empty());
    }
}
