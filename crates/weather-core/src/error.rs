use thiserror::Error;

use crate::dice::DiceParseError;

/// Errors surfaced by the generation pipeline.
///
/// Soft outcomes (a precipitation roll that exhausts its retries, index
/// clamping during continuation) are not errors and never reach this type.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// A dice string in a lookup table could not be parsed.
    #[error("invalid dice expression: {0}")]
    Parse(#[from] DiceParseError),

    /// Unknown key or out-of-range input (month, terrain, day, latitude).
    #[error("configuration error: {0}")]
    Config(String),

    /// The settings collaborator was dismissed before generation started.
    #[error("generation cancelled")]
    Cancelled,
}

impl WeatherError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;
