pub mod batch;
pub mod json_api;

pub use batch::{simulate_batch, simulate_seeds, Matchup};
pub use json_api::{
    resolve_play_json, schema_json, simulate_game_json, GameRequest, PlayRequest,
    API_SCHEMA_VERSION,
};
