//! Static lookup tables. Typed data only; the behaviour lives in the
//! component modules.
//!
//! Dice columns are kept as notation strings so the tables read like the
//! printed tables. [`validate`] parses every one of them and is run when
//! a [`crate::generator::WeatherGenerator`] is built.

pub mod months;
pub mod moons;
pub mod precipitation;
pub mod special;
pub mod terrain;
pub mod wind;

use tracing::debug;

use crate::calendar::Month;
use crate::dice::{DiceExpr, DiceParseError};

pub use months::{climate, ClockTime, MonthClimate, SkyOdds};
pub use moons::{Moon, Phase};
pub use precipitation::{
    DurationUnit, MovementRate, PrecipitationDetail, PrecipitationEntry, PrecipitationKind,
    PRECIPITATION_TABLE,
};
pub use special::{SpecialCause, SpecialEvent, SpecialEventDetail};
pub use terrain::{
    SpecialRange, TemperatureAdjustment, Terrain, TerrainNote, TerrainProfile, WindAdjustment,
};
pub use wind::{CompassDirection, WindBand};

/// Parse every dice string in every table.
pub fn validate() -> Result<(), DiceParseError> {
    let mut checked = 0usize;
    let mut check = |s: &str| -> Result<(), DiceParseError> {
        DiceExpr::parse(s)?;
        checked += 1;
        Ok(())
    };

    for month in Month::ALL {
        let c = climate(month);
        check(c.high_adjustment)?;
        check(c.low_adjustment)?;
    }
    for entry in PRECIPITATION_TABLE.iter() {
        let d = &entry.detail;
        check(d.amount)?;
        check(d.duration)?;
        check(d.wind_speed)?;
    }
    for event in SpecialEvent::ALL {
        let d = event.detail();
        check(d.duration)?;
        check(d.wind_speed)?;
    }
    check(wind::CALM_WIND)?;

    debug!(checked, "lookup tables validated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_dice_string_parses() {
        validate().expect("tables must be well formed");
    }
}
