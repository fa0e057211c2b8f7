use schemars::schema_for;
use serde::{Deserialize, Serialize};

use crate::engine::config::{PlayTuning, SimOptions};
use crate::engine::context::{Environment, SideContext};
use crate::engine::play_sim::resolve_play;
use crate::engine::rng::SimRng;
use crate::error::SimError;
use crate::models::{GameResult, PlayCall, Situation, Team};
use schemars::JsonSchema;

pub const API_SCHEMA_VERSION: u8 = 1;

pub mod error_codes {
    pub const INVALID_JSON: &str = "E_JSON";
    pub const SCHEMA_VERSION: &str = "E_SCHEMA_VERSION";
    pub const UNKNOWN_SCHEMA: &str = "E_UNKNOWN_SCHEMA";
}

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn sim_err(err: SimError) -> String {
    err_code(err.code(), err)
}

fn check_version(version: u8) -> Result<(), String> {
    if version == API_SCHEMA_VERSION {
        Ok(())
    } else {
        Err(err_code(
            error_codes::SCHEMA_VERSION,
            format!("unsupported schema version {version}, expected {API_SCHEMA_VERSION}"),
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GameRequest {
    pub schema_version: u8,
    pub home: Team,
    pub away: Team,
    #[serde(default)]
    pub options: SimOptions,
}

/// One snap against fixed rosters. Form offsets are zero.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlayRequest {
    pub schema_version: u8,
    pub seed: u32,
    #[serde(default)]
    pub situation: Situation,
    /// `run`, `run_outside`, `pass_deep`, `pass_short:8`, `punt`, `field_goal`, ...
    pub call: String,
    pub offense: Team,
    pub defense: Team,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub tuning: PlayTuning,
}

/// Simulate one game from a JSON request; returns the `GameResult` as JSON.
pub fn simulate_game_json(request_json: &str) -> Result<String, String> {
    let request: GameRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_JSON, format!("invalid request: {e}")))?;
    check_version(request.schema_version)?;

    let result = crate::simulate_game(&request.home, &request.away, &request.options)
        .map_err(sim_err)?;
    serde_json::to_string(&result)
        .map_err(|e| err_code(error_codes::INVALID_JSON, format!("failed to serialize result: {e}")))
}

/// Resolve a single play; returns the `PlayOutcome` as JSON.
pub fn resolve_play_json(request_json: &str) -> Result<String, String> {
    let request: PlayRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_JSON, format!("invalid request: {e}")))?;
    check_version(request.schema_version)?;

    let call: PlayCall = request.call.parse().map_err(sim_err)?;
    let offense = request.offense.prepared();
    let defense = request.defense.prepared();
    let mut sit = request.situation;
    sit.yardline = sit.yardline.clamp(1, 99);
    sit.down = sit.down.clamp(1, 4);
    sit.distance = sit.distance.max(1);

    let mut rng = SimRng::new(request.seed);
    let outcome = resolve_play(
        &sit,
        &call,
        &SideContext::neutral(&offense),
        &SideContext::neutral(&defense),
        &request.environment,
        &request.tuning,
        &mut rng,
    )
    .map_err(sim_err)?;
    serde_json::to_string(&outcome)
        .map_err(|e| err_code(error_codes::INVALID_JSON, format!("failed to serialize outcome: {e}")))
}

/// JSON schema for one of the public shapes: `options`, `team`, `result`,
/// `request` or `play_request`.
pub fn schema_json(name: &str) -> Result<String, String> {
    let schema = match name.trim().to_lowercase().as_str() {
        "options" | "sim_options" => schema_for!(SimOptions),
        "team" => schema_for!(Team),
        "result" | "game_result" => schema_for!(GameResult),
        "request" | "game_request" => schema_for!(GameRequest),
        "play_request" => schema_for!(PlayRequest),
        other => {
            return Err(err_code(
                error_codes::UNKNOWN_SCHEMA,
                format!("no schema named '{other}'"),
            ))
        }
    };
    serde_json::to_string_pretty(&schema)
        .map_err(|e| err_code(error_codes::INVALID_JSON, format!("failed to serialize schema: {e}")))
}
