//! Generation inputs and the settings collaborator contract.
//!
//! Everything here is immutable for the duration of one `generate` call.
//! Session state that must survive between days lives in
//! [`crate::generator::ContinuityState`] instead.

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::error::{Result, WeatherError};
use crate::tables::Terrain;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Degrees, -90 to +90.
    pub latitude: i32,
    /// Feet above sea level.
    pub elevation_feet: u32,
    pub terrain: Terrain,
}

impl LocationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(-90..=90).contains(&self.latitude) {
            return Err(WeatherError::config(format!(
                "latitude {} is outside -90..=90",
                self.latitude
            )));
        }
        Ok(())
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            latitude: 35,
            elevation_feet: 0,
            terrain: Terrain::Plains,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationFlags {
    /// Allow rare multi-day record highs and lows.
    pub use_record_temperatures: bool,
    /// Gentler elevation scaling of mountain wind.
    pub use_realistic_wind: bool,
    /// Allow the d100 = 100 precipitation result to raise a special event.
    pub enable_special_weather: bool,
}

impl Default for GenerationFlags {
    fn default() -> Self {
        Self {
            use_record_temperatures: true,
            use_realistic_wind: false,
            enable_special_weather: true,
        }
    }
}

/// Which high-wind effect domains the report should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindEffectScope {
    pub on_land: bool,
    pub at_sea: bool,
    pub in_air: bool,
    pub in_battle: bool,
}

impl Default for WindEffectScope {
    fn default() -> Self {
        Self { on_land: true, at_sea: false, in_air: false, in_battle: false }
    }
}

/// User-configurable defaults a host may persist between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub location: LocationConfig,
    pub flags: GenerationFlags,
    pub scope: WindEffectScope,
}

impl GeneratorSettings {
    pub fn request_for(&self, date: CalendarDate) -> GenerationRequest {
        GenerationRequest {
            location: self.location,
            date,
            flags: self.flags,
            scope: self.scope,
        }
    }
}

/// Everything one `generate` call needs besides the continuity state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub location: LocationConfig,
    pub date: CalendarDate,
    #[serde(default)]
    pub flags: GenerationFlags,
    #[serde(default)]
    pub scope: WindEffectScope,
}

impl GenerationRequest {
    pub fn validate(&self) -> Result<()> {
        self.location.validate()?;
        self.date.validate()
    }
}

/// The settings collaborator: an interactive form, command-line flags, a
/// saved profile. Gathering completes before any dice are rolled.
pub trait SettingsSource {
    /// `Ok(None)` means the user dismissed the prompt.
    fn gather(&mut self) -> Result<Option<GenerationRequest>>;
}

/// A source that always yields the same request.
#[derive(Debug, Clone, Copy)]
pub struct FixedSettings(pub GenerationRequest);

impl SettingsSource for FixedSettings {
    fn gather(&mut self) -> Result<Option<GenerationRequest>> {
        Ok(Some(self.0))
    }
}
