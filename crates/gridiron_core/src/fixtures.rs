//! Synthetic rosters
//!
//! Builds complete, prepared teams from a base rating and a seed. Used by
//! the demo command, the benches and most tests.
//!
//! ```rust
//! use gridiron_core::fixtures::{self, RosterTemplate};
//!
//! let team = fixtures::team(&RosterTemplate::new("hawks", "Hawks").with_base_rating(72.0), 7);
//! assert!(team.is_prepared());
//! ```

use crate::engine::rng::SimRng;
use crate::models::{Player, Position, Team};
use crate::player::latent_deriver::{ATHLETIC, COGNITIVE, PSYCHE, TECHNICAL, VARIANCE};
use std::collections::BTreeSet;

/// Position counts for a full synthetic roster.
const ROSTER: [(Position, u32); 14] = [
    (Position::QB, 2),
    (Position::RB, 2),
    (Position::WR, 4),
    (Position::TE, 2),
    (Position::OT, 2),
    (Position::OG, 2),
    (Position::C, 1),
    (Position::DE, 2),
    (Position::DT, 2),
    (Position::LB, 3),
    (Position::CB, 3),
    (Position::S, 2),
    (Position::K, 1),
    (Position::P, 1),
];

#[derive(Debug, Clone)]
pub struct RosterTemplate {
    pub id: String,
    pub name: String,
    /// Mean raw rating (0-100) for every input.
    pub base_rating: f64,
    /// Half-width of the uniform noise around the base.
    pub spread: f64,
}

impl RosterTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_rating: 65.0,
            spread: 10.0,
        }
    }

    pub fn with_base_rating(mut self, base: f64) -> Self {
        self.base_rating = base;
        self
    }

    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }
}

/// Every raw input key the latent deriver reads.
pub fn raw_keys() -> Vec<&'static str> {
    let keys: BTreeSet<&'static str> = [ATHLETIC, COGNITIVE, TECHNICAL, PSYCHE, VARIANCE]
        .into_iter()
        .flat_map(|group| group.iter())
        .flat_map(|(_, inputs)| inputs.iter().map(|(key, _)| *key))
        .collect();
    keys.into_iter().collect()
}

/// Prepared team; same template and seed give the same roster.
pub fn team(template: &RosterTemplate, seed: u32) -> Team {
    let mut rng = SimRng::new(seed).fork(&template.id);
    let keys = raw_keys();
    let mut roster = Vec::new();

    for (position, count) in ROSTER {
        for slot in 1..=count {
            let id = format!("{}-{}{}", template.id, position.code().to_ascii_lowercase(), slot);
            let name = format!("{} {}{}", template.name, position, slot);
            // backups a notch below the starters
            let base = template.base_rating - 4.0 * (slot - 1) as f64;
            let mut player = Player::new(id, name, position).with_depth(slot);
            for key in &keys {
                let value = base + rng.range(-template.spread, template.spread);
                player = player.with_factor(key, value.clamp(1.0, 99.0).round());
            }
            roster.push(player.with_ratings(base, base));
        }
    }

    Team::new(template.id.clone(), template.name.clone(), roster).prepared()
}

/// Two evenly matched demo teams.
pub fn demo_pair(seed: u32) -> (Team, Team) {
    (
        team(&RosterTemplate::new("hawks", "Harbor Hawks").with_base_rating(68.0), seed),
        team(&RosterTemplate::new("miners", "Ridge Miners").with_base_rating(66.0), seed),
    )
}
