//! # gridiron_core - Deterministic American Football Game Simulation Engine
//!
//! Simulates one game between two rosters and returns a play-by-play log,
//! drive summaries and team/player statistics.
//!
//! ## Features
//! - Same seed, same teams, same options → byte-identical [`GameResult`]
//! - Layered play model: pressure, separation, placement, catch point, YAC
//! - Quarter/overtime state machine with a field-goal shootout tiebreak
//! - JSON API and a parallel batch entry point

// Play-model functions take the situation, both sides, weather, tuning and a stream.
#![allow(clippy::too_many_arguments)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]

pub mod api;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod models;
pub mod player;

pub use api::{resolve_play_json, simulate_batch, simulate_game_json, GameRequest, Matchup};
pub use engine::{PlayTuning, RuleConfig, SimOptions, SimRng};
pub use error::{Result, SimError};
pub use models::{
    GameResult, PlayCall, PlayOutcome, Player, Position, SeedMode, Side, Situation, Team,
    TeamUnits,
};

/// Simulate one game.
///
/// Teams without unit profiles are prepared on a private copy; the caller's
/// teams are never mutated. The rule config is validated before kickoff.
pub fn simulate_game(home: &Team, away: &Team, options: &SimOptions) -> Result<GameResult> {
    engine::game_sim::simulate(home, away, options)
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_game_is_deterministic() {
        let (home, away) = fixtures::demo_pair(7);
        let options = SimOptions::seeded(42);
        let a = simulate_game(&home, &away, &options).unwrap();
        let b = simulate_game(&home, &away, &options).unwrap();
        assert_eq!(a.digest().unwrap(), b.digest().unwrap());
        assert_eq!(a.seed, 42);
        assert_eq!(a.seed_mode, SeedMode::Seeded);
    }

    #[test]
    fn test_unprepared_teams_are_left_untouched() {
        let (home, away) = fixtures::demo_pair(7);
        let raw_home = Team {
            units: None,
            ..home.clone()
        };
        let result = simulate_game(&raw_home, &away, &SimOptions::seeded(3)).unwrap();
        assert!(raw_home.units.is_none());
        assert_eq!(result.home.id, home.id);

        // preparing on the fly matches a pre-prepared roster
        let prepared = simulate_game(&home, &away, &SimOptions::seeded(3)).unwrap();
        assert_eq!(result.digest().unwrap(), prepared.digest().unwrap());
    }

    #[test]
    fn test_different_seeds_diverge() {
        let (home, away) = fixtures::demo_pair(7);
        let a = simulate_game(&home, &away, &SimOptions::seeded(1)).unwrap();
        let b = simulate_game(&home, &away, &SimOptions::seeded(2)).unwrap();
        assert_ne!(a.plays, b.plays);
    }
}
