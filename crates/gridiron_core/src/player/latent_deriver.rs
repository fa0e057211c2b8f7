//! Latent Attribute Deriver
//!
//! Raw factor/trait map → [`LatentProfile`]. Every component is a weighted
//! average of named raw inputs. An absent input reads as [`NEUTRAL`] and keeps
//! its full weight, so sparse data pulls a component toward 0.5.
//!
//! The formula tables below are the single source of truth for component
//! names. Downstream code reads components by these names and relies on the
//! profile's neutral fallback, never on a raw key.

use super::scale::normalize_raw;
use crate::models::latent::{LatentGroup, LatentProfile, NEUTRAL};
use crate::models::Player;

/// (component, [(raw input, weight)])
type Formula = (&'static str, &'static [(&'static str, f64)]);

pub const ATHLETIC: &[Formula] = &[
    ("speed", &[("speed", 1.0)]),
    ("acceleration", &[("acceleration", 0.7), ("speed", 0.3)]),
    ("agility", &[("change_of_direction", 0.5), ("short_area_quickness", 0.5)]),
    ("strength", &[("strength", 1.0)]),
    ("explosiveness", &[("explosiveness", 0.6), ("jumping", 0.2), ("acceleration", 0.2)]),
    ("power", &[("strength", 0.5), ("explosiveness", 0.5)]),
    ("endurance", &[("stamina", 0.7), ("toughness", 0.3)]),
    ("jumping", &[("jumping", 1.0)]),
];

pub const COGNITIVE: &[Formula] = &[
    ("awareness", &[("awareness", 1.0)]),
    ("processing", &[("decision_making", 0.5), ("awareness", 0.25), ("football_iq", 0.25)]),
    ("play_recognition", &[("play_recognition", 0.7), ("football_iq", 0.3)]),
    ("discipline", &[("discipline", 0.8), ("football_iq", 0.2)]),
    ("vision", &[("vision", 0.7), ("awareness", 0.3)]),
];

pub const TECHNICAL: &[Formula] = &[
    (
        "throw_accuracy",
        &[("short_accuracy", 0.4), ("medium_accuracy", 0.35), ("deep_accuracy", 0.25)],
    ),
    ("throw_power", &[("throw_power", 1.0)]),
    ("release", &[("release", 0.6), ("decision_making", 0.4)]),
    ("route_running", &[("route_running", 0.8), ("change_of_direction", 0.2)]),
    ("hands", &[("catching", 0.7), ("catch_in_traffic", 0.3)]),
    ("ball_security", &[("carrying", 0.7), ("ball_security", 0.3)]),
    ("pass_block", &[("pass_block", 0.8), ("footwork", 0.2)]),
    ("run_block", &[("run_block", 0.8), ("footwork", 0.2)]),
    ("pass_rush", &[("power_moves", 0.5), ("finesse_moves", 0.5)]),
    ("block_shedding", &[("block_shedding", 1.0)]),
    ("tackling", &[("tackle", 0.6), ("hit_power", 0.2), ("pursuit", 0.2)]),
    ("man_coverage", &[("man_coverage", 1.0)]),
    ("zone_coverage", &[("zone_coverage", 1.0)]),
    ("ball_skills", &[("ball_skills", 0.6), ("catching", 0.4)]),
    ("kick_power", &[("kick_power", 1.0)]),
    ("kick_accuracy", &[("kick_accuracy", 1.0)]),
    ("punt_power", &[("punt_power", 0.7), ("kick_power", 0.3)]),
];

pub const PSYCHE: &[Formula] = &[
    ("composure", &[("composure", 0.7), ("poise", 0.3)]),
    ("aggression", &[("aggression", 1.0)]),
    ("emotional_stability", &[("emotional_stability", 0.7), ("composure", 0.3)]),
    ("risk_tolerance", &[("risk_tolerance", 1.0)]),
    ("competitiveness", &[("competitiveness", 0.6), ("work_ethic", 0.4)]),
];

pub const VARIANCE: &[Formula] = &[
    ("consistency", &[("consistency", 1.0)]),
    ("volatility", &[("volatility", 1.0)]),
    ("clutch", &[("clutch", 1.0)]),
    ("chaos", &[("chaos", 0.5), ("strip_ability", 0.25), ("big_play", 0.25)]),
];

/// Derive a fresh profile from the player's raw inputs.
///
/// Pure: the caller assigns the result, replacing any previous profile.
pub fn derive_latent(player: &Player) -> LatentProfile {
    let lookup = |key: &str| player.raw_input(key).and_then(normalize_raw);
    LatentProfile {
        athletic: derive_group(ATHLETIC, &lookup),
        cognitive: derive_group(COGNITIVE, &lookup),
        technical: derive_group(TECHNICAL, &lookup),
        psyche: derive_group(PSYCHE, &lookup),
        variance: derive_group(VARIANCE, &lookup),
    }
}

/// Derive and attach in one step.
pub fn attach_latent(player: &mut Player) {
    player.latent = derive_latent(player);
}

fn derive_group(formulas: &[Formula], lookup: &dyn Fn(&str) -> Option<f64>) -> LatentGroup {
    LatentGroup::from_pairs(
        formulas
            .iter()
            .map(|(name, inputs)| (*name, weighted_mean(inputs, lookup))),
    )
}

fn weighted_mean(inputs: &[(&str, f64)], lookup: &dyn Fn(&str) -> Option<f64>) -> f64 {
    let (sum, weight) = inputs
        .iter()
        .map(|(key, w)| (lookup(key).unwrap_or(NEUTRAL) * w, *w))
        .fold((0.0, 0.0), |(s, tw), (v, w)| (s + v, tw + w));
    if weight > 0.0 {
        (sum / weight).clamp(0.0, 1.0)
    } else {
        NEUTRAL
    }
}
