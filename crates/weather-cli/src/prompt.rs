//! Interactive settings prompt. Every question shows its default in
//! brackets; an empty answer keeps it and `q` dismisses the whole prompt.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use weather_core::calendar::{CalendarDate, Month};
use weather_core::settings::{
    GenerationFlags, GenerationRequest, GeneratorSettings, LocationConfig, SettingsSource,
};
use weather_core::tables::Terrain;
use weather_core::WeatherError;

/// Why collection stopped early.
enum Stop {
    Dismissed,
    Io(io::Error),
}

impl From<io::Error> for Stop {
    fn from(e: io::Error) -> Self {
        Stop::Io(e)
    }
}

/// `y`/`n` answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct YesNo(bool);

impl FromStr for YesNo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "y" | "yes" => Ok(YesNo(true)),
            "n" | "no" => Ok(YesNo(false)),
            other => Err(format!("expected y or n, got `{other}`")),
        }
    }
}

impl Display for YesNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.0 { "y" } else { "n" })
    }
}

pub struct PromptSource<R, W> {
    input: R,
    output: W,
    defaults: GeneratorSettings,
    date: CalendarDate,
}

impl<R: BufRead, W: Write> PromptSource<R, W> {
    pub fn new(input: R, output: W, defaults: GeneratorSettings, date: CalendarDate) -> Self {
        Self { input, output, defaults, date }
    }

    fn ask<T>(&mut self, label: &str, default: T) -> Result<T, Stop>
    where
        T: FromStr + Display,
        T::Err: Display,
    {
        loop {
            write!(self.output, "{label} [{default}]: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(Stop::Dismissed);
            }
            let answer = line.trim();
            if answer.eq_ignore_ascii_case("q") {
                return Err(Stop::Dismissed);
            }
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse() {
                Ok(value) => return Ok(value),
                Err(e) => writeln!(self.output, "  {e}")?,
            }
        }
    }

    fn collect(&mut self) -> Result<GenerationRequest, Stop> {
        let d = self.defaults;
        let month: Month = self.ask("Month", self.date.month)?;
        let day: u8 = self.ask("Day", self.date.day.min(month.length()))?;
        let year: i32 = self.ask("Year (CY)", self.date.year)?;
        let latitude: i32 = self.ask("Latitude", d.location.latitude)?;
        let elevation_feet: u32 = self.ask("Elevation (ft)", d.location.elevation_feet)?;
        let terrain: Terrain = self.ask("Terrain", d.location.terrain)?;
        let records = self.ask("Record temperatures", YesNo(d.flags.use_record_temperatures))?;
        let realistic = self.ask("Realistic mountain wind", YesNo(d.flags.use_realistic_wind))?;
        let special = self.ask("Special weather", YesNo(d.flags.enable_special_weather))?;

        Ok(GenerationRequest {
            location: LocationConfig { latitude, elevation_feet, terrain },
            date: CalendarDate { month, day, year },
            flags: GenerationFlags {
                use_record_temperatures: records.0,
                use_realistic_wind: realistic.0,
                enable_special_weather: special.0,
            },
            scope: d.scope,
        })
    }
}

impl<R: BufRead, W: Write> SettingsSource for PromptSource<R, W> {
    fn gather(&mut self) -> weather_core::Result<Option<GenerationRequest>> {
        match self.collect() {
            Ok(request) => Ok(Some(request)),
            Err(Stop::Dismissed) => Ok(None),
            Err(Stop::Io(e)) => Err(WeatherError::config(format!("settings prompt failed: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn source(input: &str) -> PromptSource<Cursor<Vec<u8>>, Vec<u8>> {
        let date = CalendarDate::new(Month::Coldeven, 1, 591).unwrap();
        PromptSource::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), GeneratorSettings::default(), date)
    }

    #[test]
    fn empty_answers_keep_defaults() {
        let mut s = source(&"\n".repeat(9));
        let request = s.gather().unwrap().unwrap();
        assert_eq!(request.date, CalendarDate::new(Month::Coldeven, 1, 591).unwrap());
        assert_eq!(request.location, LocationConfig::default());
        assert_eq!(request.flags, GenerationFlags::default());
    }

    #[test]
    fn answers_override_defaults() {
        let mut s = source("wealsun\n12\n\n20\n3000\nsylvan forest\nn\ny\n\n");
        let request = s.gather().unwrap().unwrap();
        assert_eq!(request.date.month, Month::Wealsun);
        assert_eq!(request.date.day, 12);
        assert_eq!(request.location.terrain, Terrain::SylvanForest);
        assert_eq!(request.location.elevation_feet, 3000);
        assert!(!request.flags.use_record_temperatures);
        assert!(request.flags.use_realistic_wind);
    }

    #[test]
    fn bad_answers_are_asked_again() {
        let mut s = source("Mudmonth\nFireseek\n\n\n\n\nswampy\nswamp\n\n\n\n");
        let request = s.gather().unwrap().unwrap();
        assert_eq!(request.date.month, Month::Fireseek);
        assert_eq!(request.location.terrain, Terrain::SwampOrMarsh);
        let shown = String::from_utf8(s.output).unwrap();
        assert!(shown.contains("unknown month"), "{shown}");
    }

    #[test]
    fn q_or_end_of_input_dismisses() {
        assert_eq!(source("Coldeven\nq\n").gather().unwrap(), None);
        assert_eq!(source("Coldeven\n1\n").gather().unwrap(), None);
    }
}
