//! Simulation engine
//!
//! - `config`: rules, tuning and run options
//! - `rng`: the seeded stream and its forks
//! - `probability`: shared curves (logistic, caps, rate models)
//! - `units`: roster → team unit profiles
//! - `context`: per-game read-only side context and weather
//! - `play_sim`: one snap → [`PlayOutcome`](crate::models::PlayOutcome)
//! - `game_sim`: the macro loop and its state machine
//! - `stats`: post-game aggregation

pub mod config;
pub mod context;
pub mod game_sim;
pub mod play_sim;
pub mod probability;
pub mod rng;
pub mod stats;
pub mod units;

pub use config::{PlayTuning, RuleConfig, SimOptions};
pub use context::{Environment, Precipitation, SideContext};
pub use game_sim::{simulate, GameEngine};
pub use play_sim::resolve_play;
pub use rng::SimRng;
pub use stats::StatsCalculator;
pub use units::aggregate_units;
