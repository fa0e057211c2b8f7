//! The immutable record a simulated game produces.
//!
//! This is the whole contract surface for downstream consumers. Every map is
//! a `BTreeMap` so serialization is byte-identical across runs, which is what
//! [`GameResult::digest`] relies on.

use super::events::{DriveSummary, GameEvent, PlayLogEntry};
use super::player::PlayerId;
use super::side::Side;
use crate::engine::config::RuleConfig;
use crate::engine::context::Environment;
use crate::error::SimError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub const RESULT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SeedMode {
    /// Caller supplied the seed.
    Seeded,
    /// Seed drawn from host entropy; still recorded for replay.
    Unseeded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TeamRef {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TeamStats {
    pub plays: u32,
    pub total_yards: i32,
    pub rush_attempts: u32,
    pub rush_yards: i32,
    pub pass_attempts: u32,
    pub completions: u32,
    /// Net of sack yardage.
    pub pass_yards: i32,
    pub sacks_taken: u32,
    pub sack_yards_lost: i32,
    pub interceptions_thrown: u32,
    pub fumbles: u32,
    pub fumbles_lost: u32,
    pub turnovers: u32,
    pub first_downs: u32,
    pub third_down_attempts: u32,
    pub third_down_conversions: u32,
    pub fourth_down_attempts: u32,
    pub fourth_down_conversions: u32,
    pub penalties: u32,
    pub penalty_yards: u32,
    pub punts: u32,
    pub punt_yards: i32,
    pub field_goal_attempts: u32,
    pub field_goals_made: u32,
    pub touchdowns: u32,
    pub time_of_possession_sec: u32,
    pub yards_per_play: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PassingLine {
    pub attempts: u32,
    pub completions: u32,
    pub yards: i32,
    pub touchdowns: u32,
    pub interceptions: u32,
    pub sacks: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RushingLine {
    pub attempts: u32,
    pub yards: i32,
    pub touchdowns: u32,
    pub long: i32,
    pub fumbles_lost: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReceivingLine {
    pub targets: u32,
    pub receptions: u32,
    pub yards: i32,
    pub yac: i32,
    pub touchdowns: u32,
    pub long: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DefenseLine {
    pub tackles: u32,
    pub sacks: u32,
    pub interceptions: u32,
    pub forced_fumbles: u32,
    pub passes_defended: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KickingLine {
    pub field_goal_attempts: u32,
    pub field_goals_made: u32,
    pub long: u32,
    pub punts: u32,
    pub punt_yards: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerGameStats {
    pub team: Side,
    pub passing: PassingLine,
    pub rushing: RushingLine,
    pub receiving: ReceivingLine,
    pub defense: DefenseLine,
    pub kicking: KickingLine,
    pub penalties: u32,
}

impl PlayerGameStats {
    pub fn new(team: Side) -> Self {
        Self {
            team,
            passing: PassingLine::default(),
            rushing: RushingLine::default(),
            receiving: ReceivingLine::default(),
            defense: DefenseLine::default(),
            kicking: KickingLine::default(),
            penalties: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShootoutKick {
    pub round: u32,
    pub side: Side,
    pub kicker: Option<PlayerId>,
    pub made: bool,
}

/// Field-goal tiebreak. Never changes the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShootoutResult {
    pub made_home: u32,
    pub made_away: u32,
    pub rounds: u32,
    pub winner: Side,
    /// Rounds ran out level and a coin flip decided it.
    pub decided_by_coin_flip: bool,
    #[serde(default)]
    pub kicks: Vec<ShootoutKick>,
}

/// Where the state machine stood when the game went final.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FinalSnapshot {
    pub quarter: u32,
    pub clock_sec: u32,
    pub possession: Side,
    pub yardline: u32,
    pub down: u8,
    pub distance: u32,
    pub total_plays: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GameResult {
    pub schema_version: u32,
    pub home: TeamRef,
    pub away: TeamRef,
    pub home_score: u32,
    pub away_score: u32,
    /// `None` for a tie.
    pub winner: Option<Side>,
    pub quarters_played: u32,
    pub overtime_quarters: u32,
    pub seed: u32,
    pub seed_mode: SeedMode,
    pub rules: RuleConfig,
    pub environment: Environment,
    pub final_snapshot: FinalSnapshot,
    pub home_stats: TeamStats,
    pub away_stats: TeamStats,
    pub player_stats: BTreeMap<PlayerId, PlayerGameStats>,
    pub drives: Vec<DriveSummary>,
    pub plays: Vec<PlayLogEntry>,
    pub events: Vec<GameEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shootout: Option<ShootoutResult>,
}

impl GameResult {
    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_score,
            Side::Away => self.away_score,
        }
    }

    pub fn stats(&self, side: Side) -> &TeamStats {
        match side {
            Side::Home => &self.home_stats,
            Side::Away => &self.away_stats,
        }
    }

    pub fn team(&self, side: Side) -> &TeamRef {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn is_tie(&self) -> bool {
        self.winner.is_none()
    }

    pub fn winner_id(&self) -> Option<&str> {
        self.winner.map(|side| self.team(side).id.as_str())
    }

    /// SHA-256 of the canonical JSON form, lowercase hex.
    pub fn digest(&self) -> Result<String, SimError> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }
}
