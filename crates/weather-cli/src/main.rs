//! `greyhawk-weather`: generate daily weather for a Greyhawk campaign.
//!
//! Settings come from flags (over an optional defaults file) or from an
//! interactive prompt. Continuity between sessions is kept in a JSON state
//! file; each generated day can be appended to a JSON-lines notes file.

mod prompt;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weather_core::calendar::{CalendarDate, CalendarOracle, GreyhawkCalendar, Month};
use weather_core::dice::RandomRoller;
use weather_core::generator::{ContinuityState, RunOutcome, WeatherGenerator};
use weather_core::report::WeatherReport;
use weather_core::settings::{FixedSettings, GenerationRequest, GeneratorSettings, SettingsSource};
use weather_core::tables::Terrain;

use crate::prompt::PromptSource;

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "greyhawk-weather", about = "Daily weather for the World of Greyhawk calendar")]
struct Args {
    /// Month name, e.g. Coldeven or "Ready'reat"
    #[arg(short, long)]
    month: Option<Month>,

    /// Day of the month (1-28, festivals 1-7)
    #[arg(short, long, default_value = "1")]
    day: u8,

    /// Common Year
    #[arg(short, long, default_value = "591")]
    year: i32,

    /// Latitude in degrees (overrides the defaults file)
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<i32>,

    /// Elevation in feet (overrides the defaults file)
    #[arg(long)]
    elev: Option<u32>,

    /// Terrain, e.g. plains, "sylvan forest", swamp (overrides the defaults file)
    #[arg(short, long)]
    terrain: Option<Terrain>,

    /// Disable multi-day record temperatures
    #[arg(long)]
    no_records: bool,

    /// Gentler elevation scaling of mountain wind
    #[arg(long)]
    realistic_wind: bool,

    /// Disable special weather phenomena
    #[arg(long)]
    no_special: bool,

    /// Also report high-wind effects at sea, in the air and in battle
    #[arg(long)]
    all_wind_effects: bool,

    /// Seed for reproducible weather (omit for a random day)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of consecutive days to generate
    #[arg(long, default_value = "1")]
    days: u32,

    /// Continuity state file, read if present and rewritten after the run
    #[arg(long)]
    state: Option<PathBuf>,

    /// GeneratorSettings JSON used as defaults
    #[arg(long)]
    defaults: Option<PathBuf>,

    /// Append each day's report to this JSON-lines notes file
    #[arg(long)]
    notes: Option<PathBuf>,

    /// Print reports as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Ask for the settings interactively (`q` cancels)
    #[arg(short, long)]
    interactive: bool,
}

/// One line of the notes file.
#[derive(Serialize)]
struct DayNote<'a> {
    date: String,
    text: String,
    report: &'a WeatherReport,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let settings = settings_from(&args)?;
    let mut state = match &args.state {
        Some(path) if path.exists() => read_json::<ContinuityState>(path)?,
        _ => ContinuityState::default(),
    };

    let generator = WeatherGenerator::new().context("lookup tables failed validation")?;
    let mut roller = match args.seed {
        Some(seed) => RandomRoller::seeded(seed),
        None => RandomRoller::from_entropy(),
    };

    let mut source: Box<dyn SettingsSource> = if args.interactive {
        let date = CalendarDate::new(args.month.unwrap_or(Month::Needfest), args.day, args.year)
            .unwrap_or(CalendarDate { month: Month::Needfest, day: 1, year: args.year });
        Box::new(PromptSource::new(io::stdin().lock(), io::stderr(), settings, date))
    } else {
        let Some(month) = args.month else {
            bail!("--month is required unless --interactive is given");
        };
        let date = CalendarDate::new(month, args.day, args.year).context("invalid --day")?;
        Box::new(FixedSettings(settings.request_for(date)))
    };

    let mut remembered = Remembered { inner: source.as_mut(), request: None };
    let (report, next) = match generator.run(&mut remembered, &state, &mut roller)? {
        RunOutcome::Generated(report, next) => (*report, next),
        RunOutcome::Cancelled => {
            eprintln!("generation cancelled");
            return Ok(());
        }
    };
    deliver(&args, &report)?;
    state = next;

    let Some(mut request) = remembered.request else {
        bail!("settings source produced a report without a request");
    };
    let mut calendar = GreyhawkCalendar::new(request.date);
    for _ in 1..args.days {
        calendar.advance();
        request.date = calendar.current_date();
        let (report, next) = generator.generate(&request, &state, &mut roller)?;
        deliver(&args, &report)?;
        state = next;
    }

    if let Some(path) = &args.state {
        let json = serde_json::to_string_pretty(&state)?;
        fs::write(path, json).with_context(|| format!("Write failed: {}", path.display()))?;
        info!(path = %path.display(), "continuity state saved");
    }
    Ok(())
}

/// Defaults file, then flag overrides.
fn settings_from(args: &Args) -> Result<GeneratorSettings> {
    let mut settings = match &args.defaults {
        Some(path) => read_json::<GeneratorSettings>(path)?,
        None => GeneratorSettings::default(),
    };
    if let Some(lat) = args.lat {
        settings.location.latitude = lat;
    }
    if let Some(elev) = args.elev {
        settings.location.elevation_feet = elev;
    }
    if let Some(terrain) = args.terrain {
        settings.location.terrain = terrain;
    }
    if args.no_records {
        settings.flags.use_record_temperatures = false;
    }
    if args.realistic_wind {
        settings.flags.use_realistic_wind = true;
    }
    if args.no_special {
        settings.flags.enable_special_weather = false;
    }
    if args.all_wind_effects {
        settings.scope.at_sea = true;
        settings.scope.in_air = true;
        settings.scope.in_battle = true;
    }
    Ok(settings)
}

/// Keeps the first day's request so later days reuse the same settings.
struct Remembered<'a> {
    inner: &'a mut dyn SettingsSource,
    request: Option<GenerationRequest>,
}

impl SettingsSource for Remembered<'_> {
    fn gather(&mut self) -> weather_core::Result<Option<GenerationRequest>> {
        let request = self.inner.gather()?;
        self.request = request;
        Ok(request)
    }
}

fn deliver(args: &Args, report: &WeatherReport) -> Result<()> {
    let text = report.render_text();
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{text}");
    }

    if let Some(path) = &args.notes {
        let note = DayNote { date: report.date.to_string(), text, report };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Cannot open {}", path.display()))?;
        writeln!(file, "{}", serde_json::to_string(&note)?)
            .with_context(|| format!("Write failed: {}", path.display()))?;
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
