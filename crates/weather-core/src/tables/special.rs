//! Special weather phenomena and the table of supernatural causes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::precipitation::DurationUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialEvent {
    FlashFlood,
    Earthquake,
    ForestFire,
    Windstorm,
    FeyLights,
    SunShower,
    Volcano,
    RainForestDownpour,
    Quicksand,
    InsectCloud,
    DustStorm,
    Tornado,
    Mirage,
    Sandstorm,
    Avalanche,
    Rockslide,
    Tsunami,
    UnderseaVolcano,
    Maelstrom,
    StElmosFire,
    Waterspout,
    Whiteout,
    IceStorm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialEventDetail {
    pub duration: &'static str,
    pub duration_unit: DurationUnit,
    pub wind_speed: &'static str,
    pub effect: &'static str,
}

const fn detail(
    duration: &'static str,
    duration_unit: DurationUnit,
    wind_speed: &'static str,
    effect: &'static str,
) -> SpecialEventDetail {
    SpecialEventDetail { duration, duration_unit, wind_speed, effect }
}

impl SpecialEvent {
    pub const ALL: [SpecialEvent; 23] = [
        SpecialEvent::FlashFlood,
        SpecialEvent::Earthquake,
        SpecialEvent::ForestFire,
        SpecialEvent::Windstorm,
        SpecialEvent::FeyLights,
        SpecialEvent::SunShower,
        SpecialEvent::Volcano,
        SpecialEvent::RainForestDownpour,
        SpecialEvent::Quicksand,
        SpecialEvent::InsectCloud,
        SpecialEvent::DustStorm,
        SpecialEvent::Tornado,
        SpecialEvent::Mirage,
        SpecialEvent::Sandstorm,
        SpecialEvent::Avalanche,
        SpecialEvent::Rockslide,
        SpecialEvent::Tsunami,
        SpecialEvent::UnderseaVolcano,
        SpecialEvent::Maelstrom,
        SpecialEvent::StElmosFire,
        SpecialEvent::Waterspout,
        SpecialEvent::Whiteout,
        SpecialEvent::IceStorm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SpecialEvent::FlashFlood => "Flash Flood",
            SpecialEvent::Earthquake => "Earthquake",
            SpecialEvent::ForestFire => "Forest Fire",
            SpecialEvent::Windstorm => "Windstorm",
            SpecialEvent::FeyLights => "Fey Lights",
            SpecialEvent::SunShower => "Sun Shower",
            SpecialEvent::Volcano => "Volcanic Eruption",
            SpecialEvent::RainForestDownpour => "Rain Forest Downpour",
            SpecialEvent::Quicksand => "Quicksand",
            SpecialEvent::InsectCloud => "Insect Cloud",
            SpecialEvent::DustStorm => "Dust Storm",
            SpecialEvent::Tornado => "Tornado",
            SpecialEvent::Mirage => "Mirage",
            SpecialEvent::Sandstorm => "Sandstorm",
            SpecialEvent::Avalanche => "Avalanche",
            SpecialEvent::Rockslide => "Rockslide",
            SpecialEvent::Tsunami => "Tsunami",
            SpecialEvent::UnderseaVolcano => "Undersea Volcano",
            SpecialEvent::Maelstrom => "Maelstrom",
            SpecialEvent::StElmosFire => "St. Elmo's Fire",
            SpecialEvent::Waterspout => "Waterspout",
            SpecialEvent::Whiteout => "Whiteout",
            SpecialEvent::IceStorm => "Ice Storm",
        }
    }

    pub fn detail(self) -> SpecialEventDetail {
        use DurationUnit::{Days, Hours, Minutes};
        match self {
            SpecialEvent::FlashFlood => detail("d6", Hours, "d20",
                "dry washes and streams overflow; low ground is impassable"),
            SpecialEvent::Earthquake => detail("d10", Minutes, "d10",
                "structures shaken; d6 fissures open nearby"),
            SpecialEvent::ForestFire => detail("2d4", Days, "2d10",
                "the fire front advances downwind"),
            SpecialEvent::Windstorm => detail("d6", Hours, "4d12+20",
                "loose objects and small creatures are blown about"),
            SpecialEvent::FeyLights => detail("d6", Hours, "d6",
                "drifting lights lure travellers from the path"),
            SpecialEvent::SunShower => detail("d4", Hours, "d10",
                "light rain from a clear sky; a rainbow is likely"),
            SpecialEvent::Volcano => detail("d8", Days, "3d10",
                "ash fall for miles; lava flows near the vent"),
            SpecialEvent::RainForestDownpour => detail("d3", Hours, "d10",
                "torrential rain; trails turn to mud"),
            SpecialEvent::Quicksand => detail("d6", Days, "d20-1",
                "sinkholes of quicksand hide along low ground"),
            SpecialEvent::InsectCloud => detail("d6", Hours, "d6",
                "biting swarms; concentration is difficult"),
            SpecialEvent::DustStorm => detail("d4", Hours, "4d10",
                "vision 10 ft; movement halved"),
            SpecialEvent::Tornado => detail("d10", Minutes, "d100+200",
                "a funnel cloud cuts a path of destruction"),
            SpecialEvent::Mirage => detail("d6", Hours, "d10",
                "false water and distant cities shimmer on the horizon"),
            SpecialEvent::Sandstorm => detail("2d4", Hours, "5d10",
                "blinding sand; exposed skin is scoured"),
            SpecialEvent::Avalanche => detail("d10", Minutes, "d20",
                "snow and ice bury the slopes below"),
            SpecialEvent::Rockslide => detail("d6", Minutes, "d20",
                "falling rock blocks passes and trails"),
            SpecialEvent::Tsunami => detail("d2", Hours, "2d20",
                "a great wave floods the shore"),
            SpecialEvent::UnderseaVolcano => detail("d10", Days, "2d10",
                "boiling seas and floating pumice offshore"),
            SpecialEvent::Maelstrom => detail("d4", Hours, "3d12",
                "a whirlpool drags vessels toward its centre"),
            SpecialEvent::StElmosFire => detail("2d4", Hours, "d20",
                "ghostly flame dances on masts and spear points"),
            SpecialEvent::Waterspout => detail("d20", Minutes, "d100+120",
                "a spinning column of water threatens nearby ships"),
            SpecialEvent::Whiteout => detail("d12", Hours, "3d10+10",
                "snow and sky merge; direction is lost"),
            SpecialEvent::IceStorm => detail("d8", Hours, "2d12",
                "freezing rain glazes everything in ice"),
        }
    }
}

impl fmt::Display for SpecialEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Who or what is behind a special phenomenon, when anyone is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialCause {
    Elementals,
    ControlledElementals,
    NpcOrMonster,
    PlanarCreature,
    Deity,
    DeityConflict,
}

impl SpecialCause {
    /// d100 → cause, inclusive upper bounds.
    pub const TABLE: [(u32, SpecialCause); 6] = [
        (30, SpecialCause::Elementals),
        (50, SpecialCause::ControlledElementals),
        (75, SpecialCause::NpcOrMonster),
        (90, SpecialCause::PlanarCreature),
        (98, SpecialCause::Deity),
        (100, SpecialCause::DeityConflict),
    ];

    pub fn description(self) -> &'static str {
        match self {
            SpecialCause::Elementals => "free-willed elemental(s)",
            SpecialCause::ControlledElementals => "elemental(s) under someone's control",
            SpecialCause::NpcOrMonster => "a spellcasting NPC or monster",
            SpecialCause::PlanarCreature => "a creature from another plane",
            SpecialCause::Deity => "the will of a deity",
            SpecialCause::DeityConflict => "a conflict between deities",
        }
    }
}

impl fmt::Display for SpecialCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cause_table_ends_at_100() {
        let bounds: Vec<u32> = SpecialCause::TABLE.iter().map(|(b, _)| *b).collect();
        assert!(bounds.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*bounds.last().unwrap(), 100);
    }

    #[test]
    fn all_lists_every_event_once() {
        let mut names: Vec<&str> = SpecialEvent::ALL.iter().map(|e| e.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SpecialEvent::ALL.len());
    }
}
