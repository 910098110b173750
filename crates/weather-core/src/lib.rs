//! Daily weather generation for a World of Greyhawk campaign calendar.
//!
//! The entry point is [`generator::WeatherGenerator`]: it takes a location,
//! a calendar date and the previous day's [`generator::ContinuityState`], and
//! returns a [`report::WeatherReport`] together with the state for tomorrow.
//! All randomness is drawn from a caller-supplied [`dice::DiceRoller`], so a
//! fixed seed reproduces a whole report.

pub mod calendar;
pub mod dice;
pub mod error;
pub mod generator;
pub mod moon;
pub mod precipitation;
pub mod report;
pub mod settings;
pub mod special;
pub mod tables;
pub mod temperature;
pub mod wind;

pub use error::{Result, WeatherError};
