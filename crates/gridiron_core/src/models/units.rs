//! Team unit profiles
//!
//! Scores are integers in [0, 100]; sliders are floats in [0, 1].
//! `Default` is a perfectly average unit (50 / 0.5).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct OffenseUnit {
    pub pass: u8,
    pub run: u8,
    pub pass_protection: u8,
    pub run_blocking: u8,
    pub qb_accuracy: u8,
    pub receiver_separation: u8,
    pub ball_security: u8,
    pub discipline: u8,
    pub aggression: u8,
    /// How much the offense leans on its quarterback (0 = balanced, 1 = QB-centric).
    pub qb_reliance: f64,
    /// Pace preference; scales elapsed time between snaps.
    pub tempo: f64,
}

impl Default for OffenseUnit {
    fn default() -> Self {
        Self {
            pass: 50,
            run: 50,
            pass_protection: 50,
            run_blocking: 50,
            qb_accuracy: 50,
            receiver_separation: 50,
            ball_security: 50,
            discipline: 50,
            aggression: 50,
            qb_reliance: 0.5,
            tempo: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct DefenseUnit {
    pub pass_rush: u8,
    pub coverage: u8,
    pub run_defense: u8,
    pub tackling: u8,
    pub ball_hawk: u8,
    pub discipline: u8,
    pub aggression: u8,
    pub blitz_aggression: f64,
    /// Propensity to create turnovers and broken plays.
    pub chaos_rate: f64,
}

impl Default for DefenseUnit {
    fn default() -> Self {
        Self {
            pass_rush: 50,
            coverage: 50,
            run_defense: 50,
            tackling: 50,
            ball_hawk: 50,
            discipline: 50,
            aggression: 50,
            blitz_aggression: 0.5,
            chaos_rate: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct SpecialTeamsUnit {
    pub kicking: u8,
    pub punting: u8,
    pub coverage: u8,
    /// Return game danger; eats into net punt distance.
    pub return_threat: f64,
}

impl Default for SpecialTeamsUnit {
    fn default() -> Self {
        Self {
            kicking: 50,
            punting: 50,
            coverage: 50,
            return_threat: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct TeamUnits {
    #[serde(default)]
    pub offense: OffenseUnit,
    #[serde(default)]
    pub defense: DefenseUnit,
    #[serde(default)]
    pub special: SpecialTeamsUnit,
}

/// Unit score (0-100) → [0, 1].
#[inline]
pub fn norm(score: u8) -> f64 {
    score.min(100) as f64 / 100.0
}

/// [0, 1] composite → rounded unit score.
#[inline]
pub fn to_score(value: f64) -> u8 {
    if !value.is_finite() {
        return 50;
    }
    (value * 100.0).round().clamp(0.0, 100.0) as u8
}
