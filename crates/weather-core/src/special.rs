//! Terrain-specific special phenomena, rolled when the precipitation d100
//! comes up 100.

use tracing::debug;

use crate::dice::{DiceExpr, DiceRoller};
use crate::error::Result;
use crate::tables::{DurationUnit, SpecialCause, SpecialEvent, Terrain};

/// Percent chance that a special event has someone or something behind it.
pub const CAUSE_CHANCE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialOutcome {
    pub event: SpecialEvent,
    pub duration: i32,
    pub duration_unit: DurationUnit,
    pub wind_speed: &'static str,
    pub effect: &'static str,
    pub cause: Option<SpecialCause>,
}

/// d100 against the terrain's ranges. First match wins; no match is `None`.
pub fn determine(terrain: Terrain, roller: &mut dyn DiceRoller) -> Option<SpecialEvent> {
    let roll = roller.percentile();
    let event = terrain
        .profile()
        .special_events
        .iter()
        .find(|r| r.contains(roll))
        .map(|r| r.event);
    if event.is_none() {
        debug!(%terrain, roll, "no special event in range");
    }
    event
}

/// d100 on the cause table.
pub fn determine_cause(roller: &mut dyn DiceRoller) -> SpecialCause {
    let roll = roller.percentile();
    SpecialCause::TABLE
        .iter()
        .find(|(bound, _)| roll <= *bound)
        .map_or(SpecialCause::DeityConflict, |(_, cause)| *cause)
}

/// Roll the event's duration and, one time in ten, its cause.
pub fn narrate(event: SpecialEvent, roller: &mut dyn DiceRoller) -> Result<SpecialOutcome> {
    let detail = event.detail();
    let duration = DiceExpr::parse(detail.duration)?.sample(roller).max(1);
    let cause = (roller.percentile() <= CAUSE_CHANCE).then(|| determine_cause(roller));
    Ok(SpecialOutcome {
        event,
        duration,
        duration_unit: detail.duration_unit,
        wind_speed: detail.wind_speed,
        effect: detail.effect,
        cause,
    })
}
