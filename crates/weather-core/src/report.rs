//! The day's weather as a plain value: serialisable for hosts, renderable
//! as text for people.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarDate, Season};
use crate::moon::MoonReport;
use crate::precipitation::{PrecipitationOutcome, Rainbow};
use crate::settings::LocationConfig;
use crate::special::SpecialOutcome;
use crate::tables::{ClockTime, PrecipitationKind, SpecialCause, SpecialEvent, TerrainNote};
use crate::temperature::{DailyTemperatures, ExtremeKind};
use crate::wind::WindOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkyCondition {
    Clear,
    PartlyCloudy,
    Cloudy,
    /// Any precipitation or special event.
    Overcast,
}

impl SkyCondition {
    pub fn name(self) -> &'static str {
        match self {
            SkyCondition::Clear => "clear",
            SkyCondition::PartlyCloudy => "partly cloudy",
            SkyCondition::Cloudy => "cloudy",
            SkyCondition::Overcast => "overcast",
        }
    }
}

impl fmt::Display for SkyCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtremeReport {
    pub kind: ExtremeKind,
    /// Days still to come after today.
    pub days_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureReport {
    pub high: i32,
    pub low: i32,
    pub wind_chill: Option<i32>,
    pub extreme: Option<ExtremeReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecipitationReport {
    pub kind: PrecipitationKind,
    pub amount: Option<String>,
    pub duration: String,
    pub movement: String,
    pub vision: String,
    pub tracking: String,
    /// Carried over from yesterday.
    pub continuing: bool,
    /// Seen as the weather clears.
    pub rainbow: Option<Rainbow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialReport {
    pub event: SpecialEvent,
    pub duration: String,
    pub effect: String,
    pub cause: Option<SpecialCause>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub date: CalendarDate,
    pub season: Season,
    pub location: LocationConfig,
    pub temperature: TemperatureReport,
    pub sky: SkyCondition,
    pub precipitation: Option<PrecipitationReport>,
    pub special: Option<SpecialReport>,
    pub wind: WindOutcome,
    pub moons: MoonReport,
    pub sunrise: ClockTime,
    pub sunset: ClockTime,
    pub notes: Vec<String>,
}

/// Everything the pipeline produced for one day.
#[derive(Debug, Clone)]
pub struct ReportParts {
    pub date: CalendarDate,
    pub location: LocationConfig,
    pub temperatures: DailyTemperatures,
    pub wind_chill: Option<i32>,
    pub sky: SkyCondition,
    pub precipitation: Option<PrecipitationOutcome>,
    pub rainbow: Option<Rainbow>,
    pub special: Option<SpecialOutcome>,
    pub wind: WindOutcome,
    pub moons: MoonReport,
    pub sunrise: ClockTime,
    pub sunset: ClockTime,
}

pub fn compile(parts: ReportParts) -> WeatherReport {
    let extreme = parts.temperatures.extreme_today;
    let temperature = TemperatureReport {
        high: parts.temperatures.high,
        low: parts.temperatures.low,
        wind_chill: parts.wind_chill,
        extreme: extreme.is_active().then(|| ExtremeReport {
            kind: extreme.kind,
            days_remaining: parts.temperatures.next_extreme.remaining_days,
        }),
    };

    let precipitation = parts.precipitation.map(|p| PrecipitationReport {
        kind: p.kind,
        amount: p.amount.map(|a| format!("{a} {}", p.amount_unit)),
        duration: format!("{} {}", p.duration, p.duration_unit.label(p.duration)),
        movement: p.movement.to_string(),
        vision: p.vision.to_string(),
        tracking: p.tracking.to_string(),
        continuing: p.continuing,
        rainbow: parts.rainbow,
    });

    let special = parts.special.map(|s| SpecialReport {
        event: s.event,
        duration: format!("{} {}", s.duration, s.duration_unit.label(s.duration)),
        effect: s.effect.to_string(),
        cause: s.cause,
    });

    let profile = parts.location.terrain.profile();
    let fog = parts.precipitation.is_some_and(|p| p.kind.is_fog_or_mist());
    let notes = profile
        .notes
        .iter()
        .filter(|n| **n != TerrainNote::FogDurationDoubled || fog)
        .map(|n| n.to_string())
        .collect();

    WeatherReport {
        date: parts.date,
        season: parts.date.season(),
        location: parts.location,
        temperature,
        sky: parts.sky,
        precipitation,
        special,
        wind: parts.wind,
        moons: parts.moons,
        sunrise: parts.sunrise,
        sunset: parts.sunset,
        notes,
    }
}

impl WeatherReport {
    pub fn render_text(&self) -> String {
        self.to_string()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc = &self.location;
        writeln!(f, "Weather for {} ({})", self.date, self.season)?;
        writeln!(
            f,
            "Location: {}, latitude {}°, elevation {} ft",
            loc.terrain, loc.latitude, loc.elevation_feet
        )?;

        let t = &self.temperature;
        writeln!(f, "Temperature: high {}°F, low {}°F", t.high, t.low)?;
        if let Some(chill) = t.wind_chill {
            writeln!(f, "  Wind chill: {chill}°F")?;
        }
        if let Some(e) = t.extreme {
            match e.days_remaining {
                0 => writeln!(f, "  {} (last day)", capitalised(e.kind.name()))?,
                n => writeln!(f, "  {} ({n} more days)", capitalised(e.kind.name()))?,
            }
        }

        writeln!(f, "Sky: {}", capitalised(self.sky.name()))?;

        match &self.precipitation {
            Some(p) => {
                let continuing = if p.continuing { " (continuing)" } else { "" };
                writeln!(f, "Precipitation: {}{continuing}", p.kind)?;
                if let Some(amount) = &p.amount {
                    writeln!(f, "  Amount: {amount}")?;
                }
                writeln!(f, "  Duration: {}", p.duration)?;
                writeln!(f, "  Movement: {}", p.movement)?;
                writeln!(f, "  Vision: {}", p.vision)?;
                writeln!(f, "  Tracking: {}", p.tracking)?;
                if let Some(rainbow) = p.rainbow {
                    writeln!(f, "  Afterwards: {rainbow}")?;
                }
            }
            None if self.special.is_none() => writeln!(f, "Precipitation: none")?,
            None => {}
        }

        if let Some(s) = &self.special {
            writeln!(f, "Special: {} for {}: {}", s.event, s.duration, s.effect)?;
            if let Some(cause) = s.cause {
                writeln!(f, "  Cause: {cause}")?;
            }
        }

        let w = &self.wind;
        writeln!(f, "Wind: {} mph from the {} ({})", w.speed, w.direction, w.severity)?;
        for effect in &w.effects {
            writeln!(f, "  {:?}: {}", effect.domain, effect.text)?;
        }

        writeln!(f, "Sunrise {}, sunset {}", self.sunrise, self.sunset)?;
        let m = &self.moons;
        writeln!(
            f,
            "Luna: {}; Celene: {}; lycanthrope activity: {}",
            m.luna, m.celene, m.lycanthrope_activity
        )?;

        if !self.notes.is_empty() {
            writeln!(f, "Notes:")?;
            for note in &self.notes {
                writeln!(f, "  - {note}")?;
            }
        }
        Ok(())
    }
}

fn capitalised(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
