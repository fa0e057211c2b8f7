//! Situational play calling
//!
//! Pure functions of the situation and both sides' units; all randomness
//! comes from the play stream passed in.

use super::game_state::TWO_MINUTES_SEC;
use crate::engine::config::RuleConfig;
use crate::engine::context::SideContext;
use crate::engine::probability::logistic;
use crate::engine::rng::SimRng;
use crate::models::{PassConcept, PlayCall, RunDirection, Situation};

/// Field goals are attempted from this many yards to goal or closer.
pub const FIELD_GOAL_RANGE_TO_GOAL: u32 = 37;
/// Past this yard line a short 4th down is cheaper to go for than to punt.
pub const NO_PUNT_YARDLINE: u32 = 58;
/// "Late" for comeback logic: five minutes left.
const LATE_CLOCK_SEC: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FourthDownDecision {
    GoForIt,
    FieldGoal,
    Punt,
}

pub fn in_field_goal_range(sit: &Situation) -> bool {
    sit.yards_to_goal() <= FIELD_GOAL_RANGE_TO_GOAL
}

/// Last regulation quarter or any overtime quarter.
fn is_final_quarter(sit: &Situation, rules: &RuleConfig) -> bool {
    sit.quarter >= rules.num_quarters
}

pub fn fourth_down_decision(sit: &Situation, rules: &RuleConfig) -> FourthDownDecision {
    let trailing = sit.score_diff < 0;
    let in_range = in_field_goal_range(sit);

    if trailing && is_final_quarter(sit, rules) {
        if in_range && sit.score_diff >= -3 {
            return FourthDownDecision::FieldGoal;
        }
        if sit.clock_sec <= TWO_MINUTES_SEC {
            return FourthDownDecision::GoForIt;
        }
        if sit.clock_sec <= LATE_CLOCK_SEC && sit.distance <= 5 {
            return FourthDownDecision::GoForIt;
        }
    }
    if sit.distance <= 1 && sit.yardline > 50 && !in_range {
        return FourthDownDecision::GoForIt;
    }
    if in_range {
        return FourthDownDecision::FieldGoal;
    }
    if sit.yardline >= NO_PUNT_YARDLINE && sit.distance <= 4 {
        return FourthDownDecision::GoForIt;
    }
    FourthDownDecision::Punt
}

/// Kick before the half or game runs out.
fn end_of_half_kick(sit: &Situation, rules: &RuleConfig) -> bool {
    let closing = sit.quarter > rules.num_quarters || rules.is_half_end(sit.quarter);
    closing
        && sit.clock_sec <= rules.end_of_half_fg_clock_sec
        && in_field_goal_range(sit)
        && (sit.quarter <= rules.first_half_end() || sit.score_diff >= -3)
}

/// Probability the offense throws.
pub fn pass_probability(
    sit: &Situation,
    offense: &SideContext,
    defense: &SideContext,
    rules: &RuleConfig,
) -> f64 {
    let off = &offense.units.offense;
    let edge = (off.pass as f64 - defense.units.defense.coverage as f64) / 15.0;
    let mut p = logistic(rules.tuning.pass_call_bias + edge + 0.8 * (off.qb_reliance - 0.5));

    if sit.down == 1 {
        p *= 0.9;
    }
    if sit.distance <= 2 {
        p = p.min(0.35);
    }
    if (sit.down == 3 && sit.distance >= 6) || (sit.down == 4 && sit.distance >= 3) {
        p = p.max(0.85);
    }
    let late = is_final_quarter(sit, rules);
    if late && sit.score_diff > 0 && sit.clock_sec <= LATE_CLOCK_SEC {
        p = p.min(0.3);
    }
    if late && sit.score_diff < 0 && sit.clock_sec <= TWO_MINUTES_SEC {
        p = p.max(0.9);
    }
    p.clamp(0.02, 0.98)
}

fn choose_concept(sit: &Situation, rng: &mut SimRng) -> PassConcept {
    const CONCEPTS: [PassConcept; 5] = [
        PassConcept::Screen,
        PassConcept::Short,
        PassConcept::Intermediate,
        PassConcept::Deep,
        PassConcept::PlayAction,
    ];
    let long = sit.distance >= 7;
    let very_long = sit.distance >= 12 || sit.hurry_up;
    let weights = [
        1.0,
        if long { 2.0 } else { 3.5 },
        if long { 3.5 } else { 2.0 },
        if very_long { 3.0 } else { 1.0 },
        if sit.down <= 2 && !sit.hurry_up { 1.2 } else { 0.2 },
    ];
    CONCEPTS[rng.pick_weighted(&weights)]
}

/// Pick this snap's call.
pub fn choose_play(
    sit: &Situation,
    offense: &SideContext,
    defense: &SideContext,
    rules: &RuleConfig,
    rng: &mut SimRng,
) -> PlayCall {
    if end_of_half_kick(sit, rules) {
        return PlayCall::FieldGoal;
    }
    if sit.down >= 4 {
        match fourth_down_decision(sit, rules) {
            FourthDownDecision::FieldGoal => return PlayCall::FieldGoal,
            FourthDownDecision::Punt => return PlayCall::Punt,
            FourthDownDecision::GoForIt => {}
        }
    }

    if rng.chance(pass_probability(sit, offense, defense, rules)) {
        let concept = choose_concept(sit, rng);
        // the end zone is ten yards deep
        let depth = concept.default_depth().min(sit.yards_to_goal() as f64 + 5.0);
        PlayCall::Pass {
            concept,
            target_depth: depth,
        }
    } else {
        let direction = if rng.chance(0.35) {
            RunDirection::Outside
        } else {
            RunDirection::Inside
        };
        PlayCall::run(direction)
    }
}
