//! Play Micro-Simulator
//!
//! `(situation, call, offense, defense, rng) → PlayOutcome`. The single entry
//! point is [`resolve_play`]; the game loop never samples yardage itself.
//!
//! ## Pipeline
//!
//! ```text
//! penalty draw ──► pre-snap foul? ──► NoPlay (short-circuit)
//!                      │
//!                      ▼
//!        run.rs / pass.rs / kicking.rs   (core play)
//!                      │
//!                      ▼
//!   live-ball foul kept unless the ball changed hands
//!                      │
//!                      ▼
//!                elapsed clock
//! ```

pub mod ball_carrier;
pub mod kicking;
pub mod pass;
pub mod penalty;
pub mod run;

#[cfg(test)]
mod play_sim_test;

use super::config::PlayTuning;
use super::context::{Environment, SideContext};
use super::rng::SimRng;
use crate::error::SimError;
use crate::models::{PassOutcome, PlayCall, PlayOutcome, PlayResult, Situation};
use tracing::trace;

/// Resolve one snap.
///
/// Missing personnel never fails (default ratings stand in); only an invalid
/// call is an error.
pub fn resolve_play(
    sit: &Situation,
    call: &PlayCall,
    offense: &SideContext,
    defense: &SideContext,
    env: &Environment,
    tuning: &PlayTuning,
    rng: &mut SimRng,
) -> Result<PlayOutcome, SimError> {
    call.validate()?;

    let penalty = penalty::draw_penalty(call, offense, defense, tuning, rng);
    if let Some(pen) = penalty.as_ref().filter(|p| p.pre_snap) {
        let elapsed = elapsed_seconds(&PlayResult::NoPlay, sit, offense, tuning, rng);
        trace!(foul = ?pen.foul, "pre-snap penalty");
        return Ok(PlayOutcome::no_play(pen.clone(), elapsed));
    }

    let result = match *call {
        PlayCall::Run { direction } => PlayResult::Run(run::resolve_run(
            sit, direction, offense, defense, env, tuning, rng,
        )),
        PlayCall::Pass {
            concept,
            target_depth,
        } => PlayResult::Pass(pass::resolve_pass(
            sit,
            concept,
            target_depth,
            offense,
            defense,
            env,
            tuning,
            rng,
        )),
        PlayCall::Punt => {
            PlayResult::Punt(kicking::resolve_punt(sit, offense, defense, env, tuning, rng))
        }
        PlayCall::FieldGoal => {
            PlayResult::FieldGoal(kicking::resolve_field_goal(sit, offense, env, tuning, rng))
        }
    };

    let elapsed_sec = elapsed_seconds(&result, sit, offense, tuning, rng);
    let mut outcome = PlayOutcome {
        result,
        elapsed_sec,
        penalty,
    };
    // a change of possession wipes a live-ball flag
    if outcome.is_turnover() {
        outcome.penalty = None;
    }
    Ok(outcome)
}

/// Seconds the play takes off the clock. Always at least one.
///
/// Running plays, completions and sacks keep the clock moving; incompletions
/// and pre-snap fouls stop it. Hurry-up shortens everything.
pub fn elapsed_seconds(
    result: &PlayResult,
    sit: &Situation,
    offense: &SideContext,
    tuning: &PlayTuning,
    rng: &mut SimRng,
) -> u32 {
    let (mean, sigma) = match result {
        PlayResult::Run(_) => (tuning.run_clock_sec, 6.0),
        PlayResult::Pass(pass) => match pass.outcome {
            PassOutcome::Complete { .. } => (tuning.completion_clock_sec, 6.0),
            PassOutcome::Sack { .. } => (tuning.run_clock_sec - 2.0, 6.0),
            PassOutcome::Interception { .. } => (tuning.incompletion_clock_sec + 5.0, 2.0),
            PassOutcome::Incomplete { .. } => (tuning.incompletion_clock_sec, 2.0),
        },
        PlayResult::Punt(_) => (tuning.kick_clock_sec + 4.0, 2.0),
        PlayResult::FieldGoal(_) => (tuning.kick_clock_sec, 1.5),
        PlayResult::NoPlay => (2.0, 0.5),
    };
    // quicker tempo shaves the huddle
    let tempo = 1.1 - 0.2 * offense.units.offense.tempo;
    let pace = if sit.hurry_up {
        tuning.hurry_up_factor
    } else {
        1.0
    };
    let secs = rng.normal(mean * tempo * pace, sigma);
    if secs.is_finite() {
        secs.round().clamp(1.0, 60.0) as u32
    } else {
        1
    }
}
