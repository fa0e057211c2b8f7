//! Parallel batch simulation.
//!
//! Games share nothing: each matchup gets its own options, seed and state,
//! so running them on the rayon pool yields exactly what a sequential loop
//! would, in input order.

use crate::engine::config::{RuleConfig, SimOptions};
use crate::error::SimError;
use crate::models::{GameResult, Team};
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Below this many games the pool overhead is not worth it.
const PARALLEL_THRESHOLD: usize = 4;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Matchup {
    pub home: Team,
    pub away: Team,
    #[serde(default)]
    pub options: SimOptions,
}

/// Simulate every matchup. One result per matchup, in input order.
pub fn simulate_batch(matchups: &[Matchup]) -> Vec<Result<GameResult, SimError>> {
    let run = |m: &Matchup| crate::simulate_game(&m.home, &m.away, &m.options);
    if matchups.len() >= PARALLEL_THRESHOLD {
        matchups.par_iter().map(run).collect()
    } else {
        matchups.iter().map(run).collect()
    }
}

/// The same matchup once per seed. Teams are prepared once up front.
pub fn simulate_seeds(
    home: &Team,
    away: &Team,
    rules: &RuleConfig,
    seeds: &[u32],
) -> Vec<Result<GameResult, SimError>> {
    let home = prepare_once(home);
    let away = prepare_once(away);
    seeds
        .par_iter()
        .map(|&seed| {
            let options = SimOptions::seeded(seed).with_rules(rules.clone());
            crate::simulate_game(&home, &away, &options)
        })
        .collect()
}

fn prepare_once(team: &Team) -> Team {
    if team.is_prepared() {
        team.clone()
    } else {
        team.prepared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn matchups() -> Vec<Matchup> {
        let (home, away) = fixtures::demo_pair(12);
        (1..=8)
            .map(|seed| Matchup {
                home: home.clone(),
                away: away.clone(),
                options: SimOptions::seeded(seed),
            })
            .collect()
    }

    #[test]
    fn test_batch_matches_sequential() {
        let games = matchups();
        let batch = simulate_batch(&games);
        assert_eq!(batch.len(), games.len());
        for (m, parallel) in games.iter().zip(batch) {
            let sequential = crate::simulate_game(&m.home, &m.away, &m.options).unwrap();
            assert_eq!(parallel.unwrap().digest().unwrap(), sequential.digest().unwrap());
        }
    }

    #[test]
    fn test_seed_sweep_keeps_order() {
        let (home, away) = fixtures::demo_pair(12);
        let seeds = [9, 3, 27, 3];
        let results = simulate_seeds(&home, &away, &RuleConfig::default(), &seeds);
        let got: Vec<u32> = results.iter().map(|r| r.as_ref().unwrap().seed).collect();
        assert_eq!(got, seeds);
        assert_eq!(
            results[1].as_ref().unwrap().plays,
            results[3].as_ref().unwrap().plays
        );
    }

    #[test]
    fn test_bad_rules_fail_per_game() {
        let mut games = matchups();
        games[2].options.rules.num_quarters = 0;
        let results = simulate_batch(&games);
        assert!(results[2].is_err());
        assert!(results.iter().enumerate().all(|(i, r)| i == 2 || r.is_ok()));
    }
}
