//! Pipeline orchestrator: runs every stage of one day's weather in order.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dice::DiceRoller;
use crate::error::{Result, WeatherError};
use crate::moon::moons_on;
use crate::precipitation::{self, Determination, PrecipitationState};
use crate::report::{compile, ReportParts, SkyCondition, WeatherReport};
use crate::settings::{GenerationRequest, SettingsSource};
use crate::special;
use crate::tables::{self, climate, SkyOdds};
use crate::temperature::{compute_daily_temperatures, ExtremeState};
use crate::wind;

// ── Public structs ────────────────────────────────────────────────────────────

/// Everything that carries from one day to the next. Owned by the caller and
/// threaded through [`WeatherGenerator::generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuityState {
    pub extreme: ExtremeState,
    pub precipitation: PrecipitationState,
}

/// Result of [`WeatherGenerator::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Generated(Box<WeatherReport>, ContinuityState),
    /// The settings source was dismissed; no dice were rolled.
    Cancelled,
}

impl RunOutcome {
    /// `Err(WeatherError::Cancelled)` for a dismissed prompt.
    pub fn into_result(self) -> Result<(WeatherReport, ContinuityState)> {
        match self {
            RunOutcome::Generated(report, state) => Ok((*report, state)),
            RunOutcome::Cancelled => Err(WeatherError::Cancelled),
        }
    }
}

/// Sky for a day without precipitation: d100 against the month's odds.
pub fn roll_sky(odds: &SkyOdds, roller: &mut dyn DiceRoller) -> SkyCondition {
    let roll = roller.percentile();
    if roll <= odds.clear_max {
        SkyCondition::Clear
    } else if roll <= odds.partly_cloudy_max {
        SkyCondition::PartlyCloudy
    } else {
        SkyCondition::Cloudy
    }
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// The main pipeline orchestrator.
#[derive(Debug, Clone)]
pub struct WeatherGenerator {
    _private: (),
}

impl WeatherGenerator {
    /// Parses every dice string in the lookup tables, so a malformed table
    /// fails here rather than mid-generation.
    pub fn new() -> Result<Self> {
        tables::validate()?;
        Ok(Self { _private: () })
    }

    /// Generate one day of weather.
    ///
    /// Pipeline order (the roll sequence is fixed, so a seeded roller
    /// reproduces the report exactly):
    ///   1. Temperature (record roll, high, low)
    ///   2. Precipitation type, or a special event
    ///   3. Wind speed and direction, wind chill
    ///   4. Continuation and rainbow
    ///   5. Sky condition
    ///   6. Moons
    pub fn generate(
        &self,
        request: &GenerationRequest,
        state: &ContinuityState,
        roller: &mut dyn DiceRoller,
    ) -> Result<(WeatherReport, ContinuityState)> {
        request.validate()?;
        state.precipitation.validate()?;

        let date = request.date;
        let location = request.location;
        let terrain = location.terrain;
        let month = climate(date.month);

        // ── 1. Temperature ──────────────────────────────────────────────────
        let temperatures = compute_daily_temperatures(
            &date,
            &location,
            state.extreme,
            request.flags.use_record_temperatures,
            roller,
        )?;

        // ── 2. Precipitation or special event ───────────────────────────────
        let determination = precipitation::determine_type(
            &state.precipitation,
            month.precipitation_chance,
            terrain,
            temperatures.high,
            request.flags.enable_special_weather,
            roller,
        );
        let (today, special) = match determination {
            Determination::Dry => (None, None),
            Determination::Row { index, continuing } => {
                let outcome =
                    precipitation::sample_outcome(index, continuing, &state.precipitation, terrain, roller)?;
                (Some(outcome), None)
            }
            Determination::Special => match special::determine(terrain, roller) {
                Some(event) => (None, Some(special::narrate(event, roller)?)),
                None => (None, None),
            },
        };

        // ── 3. Wind ─────────────────────────────────────────────────────────
        let weather_wind = today
            .map(|p| p.wind_speed)
            .or(special.map(|s| s.wind_speed));
        let wind = wind::compute_wind(
            weather_wind,
            terrain,
            location.elevation_feet,
            request.flags.use_realistic_wind,
            date.season(),
            &request.scope,
            roller,
        )?;
        let wind_chill = wind::wind_chill(wind.speed, temperatures.low);

        // ── 4. Continuation ─────────────────────────────────────────────────
        // Special events never carry over.
        let (next_precipitation, rainbow) = match today {
            Some(p) => {
                let c = precipitation::continue_or_end(p.index, p.chance_continuing, terrain, roller)?;
                (c.next, c.rainbow)
            }
            None => (PrecipitationState::None, None),
        };

        // ── 5. Sky ──────────────────────────────────────────────────────────
        let sky = if today.is_some() || special.is_some() {
            SkyCondition::Overcast
        } else {
            roll_sky(&month.sky, roller)
        };

        // ── 6. Moons ────────────────────────────────────────────────────────
        let moons = moons_on(&date);

        let next = ContinuityState {
            extreme: temperatures.next_extreme,
            precipitation: next_precipitation,
        };
        debug!(?next, "continuity for tomorrow");

        let report = compile(ReportParts {
            date,
            location,
            temperatures,
            wind_chill,
            sky,
            precipitation: today,
            rainbow,
            special,
            wind,
            moons,
            sunrise: month.sunrise,
            sunset: month.sunset,
        });

        info!(
            %date,
            high = report.temperature.high,
            low = report.temperature.low,
            precipitation = ?report.precipitation.as_ref().map(|p| p.kind),
            special = ?report.special.as_ref().map(|s| s.event),
            wind_mph = report.wind.speed,
            "weather generated"
        );
        Ok((report, next))
    }

    /// Gather settings, then generate. A dismissed source yields
    /// [`RunOutcome::Cancelled`] before any roll is made.
    pub fn run(
        &self,
        source: &mut dyn SettingsSource,
        state: &ContinuityState,
        roller: &mut dyn DiceRoller,
    ) -> Result<RunOutcome> {
        let Some(request) = source.gather()? else {
            info!("generation cancelled");
            return Ok(RunOutcome::Cancelled);
        };
        let (report, next) = self.generate(&request, state, roller)?;
        Ok(RunOutcome::Generated(Box::new(report), next))
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
