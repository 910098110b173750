use weather_core::calendar::{CalendarDate, Month};
use weather_core::dice::{RandomRoller, ScriptedRoller};
use weather_core::generator::{ContinuityState, RunOutcome, WeatherGenerator};
use weather_core::settings::{
    FixedSettings, GenerationRequest, GeneratorSettings, LocationConfig, SettingsSource,
};
use weather_core::tables::Terrain;
use weather_core::temperature::{ExtremeKind, ExtremeState};
use weather_core::{Result, WeatherError};

fn coldeven_plains() -> GenerationRequest {
    let settings = GeneratorSettings {
        location: LocationConfig { latitude: 35, elevation_feet: 0, terrain: Terrain::Plains },
        ..GeneratorSettings::default()
    };
    settings.request_for(CalendarDate::new(Month::Coldeven, 1, 591).unwrap())
}

fn report_json(seed: u64) -> String {
    let gen = WeatherGenerator::new().unwrap();
    let mut roller = RandomRoller::seeded(seed);
    let (report, _) = gen.generate(&coldeven_plains(), &ContinuityState::default(), &mut roller).unwrap();
    report.to_json().unwrap()
}

#[test]
fn same_seed_gives_identical_report() {
    let first = report_json(42);
    let second = report_json(42);
    assert_eq!(first, second);
}

#[test]
fn different_seeds_give_different_reports() {
    let reference = report_json(42);
    let differing = (1..=8).filter(|&seed| report_json(seed) != reference).count();
    assert!(differing >= 7, "only {differing} of 8 seeds differ from seed 42");
}

#[test]
fn extreme_low_shifts_both_temperatures_and_runs_its_course() {
    let gen = WeatherGenerator::new().unwrap();
    let request = coldeven_plains();
    let start = ContinuityState::default();

    // Record roll 50 (none), then d8 = 5 and d10 = 5 for the spread.
    let mut baseline_roller = ScriptedRoller::new([50, 5, 5], 7);
    let (baseline, _) = gen.generate(&request, &start, &mut baseline_roller).unwrap();

    // Record roll 1 (extreme low), d20 = 20 (7 days), same spread.
    let mut roller = ScriptedRoller::new([1, 20, 5, 5], 7);
    let (report, mut state) = gen.generate(&request, &start, &mut roller).unwrap();

    // Coldeven's low dice are d10+4, so the extreme low is 3 × 14.
    assert_eq!(report.temperature.high - baseline.temperature.high, -42);
    assert_eq!(report.temperature.low - baseline.temperature.low, -42);
    assert_eq!(state.extreme, ExtremeState { kind: ExtremeKind::ExtremeLow, remaining_days: 6 });

    let mut date = request.date;
    let mut days = 1;
    while state.extreme.is_active() {
        date = date.next_day();
        let next_request = GenerationRequest { date, ..request };
        let (report, next) = gen.generate(&next_request, &state, &mut roller).unwrap();
        assert_eq!(report.temperature.extreme.map(|e| e.kind), Some(ExtremeKind::ExtremeLow));
        state = next;
        days += 1;
        assert!(days <= 7, "extreme outlived its duration");
    }
    assert_eq!(days, 7);
    assert_eq!(state.extreme, ExtremeState::NONE);
}

#[test]
fn timeline_threads_state_through_a_year() {
    let gen = WeatherGenerator::new().unwrap();
    let mut roller = RandomRoller::seeded(2024);
    let mut request = coldeven_plains();
    request.location.terrain = Terrain::Seacoast;
    let mut state = ContinuityState::default();

    for _ in 0..364 {
        let (report, next) = gen.generate(&request, &state, &mut roller).unwrap();
        assert!(report.temperature.high >= report.temperature.low);
        assert!(report.wind.speed >= 0);
        state = next;
        request.date = request.date.next_day();
    }
    assert_eq!(request.date, CalendarDate::new(Month::Coldeven, 1, 592).unwrap());
}

struct Dismissed;

impl SettingsSource for Dismissed {
    fn gather(&mut self) -> Result<Option<GenerationRequest>> {
        Ok(None)
    }
}

#[test]
fn cancelled_settings_roll_nothing() {
    let gen = WeatherGenerator::new().unwrap();
    let mut roller = ScriptedRoller::new([1, 2, 3], 0);
    let outcome = gen.run(&mut Dismissed, &ContinuityState::default(), &mut roller).unwrap();
    assert_eq!(outcome, RunOutcome::Cancelled);
    assert_eq!(roller.remaining(), 3);
    assert!(matches!(outcome.into_result(), Err(WeatherError::Cancelled)));
}

#[test]
fn fixed_settings_run_generates() {
    let gen = WeatherGenerator::new().unwrap();
    let mut roller = RandomRoller::seeded(9);
    let mut source = FixedSettings(coldeven_plains());
    let outcome = gen.run(&mut source, &ContinuityState::default(), &mut roller).unwrap();
    let (report, _) = outcome.into_result().unwrap();
    assert_eq!(report.date.month, Month::Coldeven);
    assert_eq!(report.moons.luna.to_string(), "Waxing Crescent");
}
