//! Browser bindings. Requests, continuity state and reports cross the
//! boundary as JSON strings; the host keeps the state between calls.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use weather_core::dice::RandomRoller;
use weather_core::generator::{ContinuityState, WeatherGenerator};
use weather_core::report::WeatherReport;
use weather_core::settings::{GenerationRequest, GeneratorSettings};

/// What `generate` hands back to the host.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub report: WeatherReport,
    pub text: String,
    /// Pass this back as `state_json` for the following day.
    pub state: ContinuityState,
}

/// Generate one day. An empty `state_json` starts a fresh timeline; a
/// missing `seed` draws from the browser's entropy source.
#[wasm_bindgen]
pub fn generate(request_json: &str, state_json: &str, seed: Option<u64>) -> Result<String, JsValue> {
    generate_json(request_json, state_json, seed).map_err(|e| JsValue::from_str(&e))
}

/// Default `GeneratorSettings` as JSON, for pre-filling a settings form.
#[wasm_bindgen]
pub fn default_settings() -> String {
    serde_json::to_string(&GeneratorSettings::default()).unwrap_or_default()
}

fn generate_json(request_json: &str, state_json: &str, seed: Option<u64>) -> Result<String, String> {
    let request: GenerationRequest =
        serde_json::from_str(request_json).map_err(|e| format!("Invalid request: {e}"))?;
    let state: ContinuityState = if state_json.trim().is_empty() {
        ContinuityState::default()
    } else {
        serde_json::from_str(state_json).map_err(|e| format!("Invalid state: {e}"))?
    };

    let generator = WeatherGenerator::new().map_err(|e| e.to_string())?;
    let mut roller = match seed {
        Some(seed) => RandomRoller::seeded(seed),
        None => RandomRoller::from_entropy(),
    };
    let (report, state) = generator
        .generate(&request, &state, &mut roller)
        .map_err(|e| e.to_string())?;

    let response = GenerateResponse { text: report.render_text(), report, state };
    serde_json::to_string(&response).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = r#"{
        "location": { "latitude": 35, "elevation_feet": 0, "terrain": "Plains" },
        "date": { "month": "Coldeven", "day": 1, "year": 591 }
    }"#;

    #[test]
    fn seeded_generation_is_repeatable() {
        let a = generate_json(REQUEST, "", Some(42)).unwrap();
        let b = generate_json(REQUEST, "", Some(42)).unwrap();
        assert_eq!(a, b);

        let response: GenerateResponse = serde_json::from_str(&a).unwrap();
        assert!(response.text.starts_with("Weather for Coldeven 1, 591 CY"));
    }

    #[test]
    fn state_threads_through() {
        let first: GenerateResponse = serde_json::from_str(&generate_json(REQUEST, "", Some(1)).unwrap()).unwrap();
        let state = serde_json::to_string(&first.state).unwrap();
        assert!(generate_json(REQUEST, &state, Some(2)).is_ok());
    }

    #[test]
    fn bad_input_is_reported() {
        let err = generate_json("{}", "", Some(1)).unwrap_err();
        assert!(err.starts_with("Invalid request"), "{err}");

        let bad_day = REQUEST.replace(r#""day": 1"#, r#""day": 29"#);
        let err = generate_json(&bad_day, "", Some(1)).unwrap_err();
        assert!(err.contains("configuration error"), "{err}");
    }

    #[test]
    fn defaults_parse_back() {
        let settings: GeneratorSettings = serde_json::from_str(&default_settings()).unwrap();
        assert_eq!(settings, GeneratorSettings::default());
    }
}
