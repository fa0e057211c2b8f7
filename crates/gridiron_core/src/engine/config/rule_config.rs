//! Game rules: clock, overtime policy and the tuning bundle.
//!
//! ## Presets
//!
//! | Preset | Ties | OT quarters | Tuning |
//! |--------|------|-------------|--------|
//! | `regular_season` (default) | allowed | 1 | calibrated |
//! | `playoff` | never | 4 | calibrated |
//! | `arcade` | allowed | 1 | high variance |
//!
//! ## Environment Variables
//!
//! - `GRIDIRON_RULE_PROFILE`: select a preset (`playoff`, `arcade`, anything else = default)

use super::tuning_config::PlayTuning;
use crate::error::SimError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::env;

/// Upper bound on quarter length; keeps the play cap finite and small.
const MAX_QUARTER_LENGTH_SEC: u32 = 3_600;
const MAX_QUARTERS: u32 = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RuleConfig {
    pub quarter_length_sec: u32,
    pub num_quarters: u32,
    pub max_overtime_quarters: u32,
    /// Terminal policy once the overtime cap is exhausted still level.
    /// `false` settles the game with a field-goal shootout.
    pub allow_ties: bool,
    /// First score in an overtime quarter ends the game.
    pub overtime_sudden_death: bool,
    /// Inside this many seconds of a half, an in-range offense kicks on any down.
    pub end_of_half_fg_clock_sec: u32,
    /// Log a two-minute warning event in the last quarter of each half.
    pub two_minute_warning: bool,
    /// Shootout rounds before falling back to a coin flip.
    pub shootout_rounds: u32,
    /// Shootout kicks are taken from this many yards to the goal line.
    pub shootout_yards_to_goal: u32,
    pub tuning: PlayTuning,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            quarter_length_sec: 900,
            num_quarters: 4,
            max_overtime_quarters: 1,
            allow_ties: true,
            overtime_sudden_death: true,
            end_of_half_fg_clock_sec: 10,
            two_minute_warning: true,
            shootout_rounds: 5,
            shootout_yards_to_goal: 20,
            tuning: PlayTuning::default(),
        }
    }
}

impl RuleConfig {
    pub fn regular_season() -> Self {
        Self::default()
    }

    /// Somebody has to win.
    pub fn playoff() -> Self {
        Self {
            allow_ties: false,
            max_overtime_quarters: 4,
            ..Self::default()
        }
    }

    pub fn arcade() -> Self {
        Self {
            tuning: PlayTuning::arcade(),
            ..Self::default()
        }
    }

    /// Load the preset named by `GRIDIRON_RULE_PROFILE`, or the default.
    pub fn from_env_or_default() -> Self {
        Self::from_profile(&env::var("GRIDIRON_RULE_PROFILE").unwrap_or_default())
    }

    pub fn from_profile(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "playoff" | "playoffs" => Self::playoff(),
            "arcade" => Self::arcade(),
            _ => Self::regular_season(),
        }
    }

    /// Overtime quarters run half a regulation quarter.
    pub fn overtime_length_sec(&self) -> u32 {
        (self.quarter_length_sec / 2).max(1)
    }

    /// Last quarter of the first half. 0 for a single-quarter game.
    pub fn first_half_end(&self) -> u32 {
        self.num_quarters / 2
    }

    /// Quarters that end a half (the first half and regulation).
    pub fn is_half_end(&self, quarter: u32) -> bool {
        quarter == self.num_quarters || (quarter != 0 && quarter == self.first_half_end())
    }

    /// Hard cap on plays. Every play consumes at least one second, so a valid
    /// config can never reach it.
    pub fn play_cap(&self) -> u32 {
        let regulation = self.quarter_length_sec * self.num_quarters;
        let overtime = self.overtime_length_sec() * self.max_overtime_quarters;
        regulation + overtime + 64
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.quarter_length_sec == 0 || self.quarter_length_sec > MAX_QUARTER_LENGTH_SEC {
            return Err(SimError::InvalidConfig(format!(
                "quarter_length_sec must be in 1..={}, got {}",
                MAX_QUARTER_LENGTH_SEC, self.quarter_length_sec
            )));
        }
        if self.num_quarters == 0 || self.num_quarters > MAX_QUARTERS {
            return Err(SimError::InvalidConfig(format!(
                "num_quarters must be in 1..={}, got {}",
                MAX_QUARTERS, self.num_quarters
            )));
        }
        if self.max_overtime_quarters > MAX_QUARTERS {
            return Err(SimError::InvalidConfig(format!(
                "max_overtime_quarters must be at most {}, got {}",
                MAX_QUARTERS, self.max_overtime_quarters
            )));
        }
        if self.shootout_yards_to_goal == 0 || self.shootout_yards_to_goal > 99 {
            return Err(SimError::InvalidConfig(format!(
                "shootout_yards_to_goal must be in 1..=99, got {}",
                self.shootout_yards_to_goal
            )));
        }
        for (name, p) in self.tuning.probabilities() {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::InvalidConfig(format!(
                    "tuning.{} must be a probability in [0, 1], got {}",
                    name, p
                )));
            }
        }
        for (name, v) in self.tuning.magnitudes() {
            if !v.is_finite() || v < 0.0 {
                return Err(SimError::InvalidConfig(format!(
                    "tuning.{} must be finite and non-negative, got {}",
                    name, v
                )));
            }
        }
        for (name, v) in [
            ("catch_logit_base", self.tuning.catch_logit_base),
            ("interception_logit_base", self.tuning.interception_logit_base),
        ] {
            if !v.is_finite() {
                return Err(SimError::InvalidConfig(format!(
                    "tuning.{} must be finite, got {}",
                    name, v
                )));
            }
        }
        Ok(())
    }
}
