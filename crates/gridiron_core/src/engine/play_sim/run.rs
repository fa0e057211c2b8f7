//! Run yardage model: one normal draw with a breakaway tail, then the
//! shared fumble check.

use super::ball_carrier::{check_fumble, pick_tackler};
use crate::engine::config::PlayTuning;
use crate::engine::context::{id_of, Environment, SideContext};
use crate::engine::probability::bounded;
use crate::engine::rng::SimRng;
use crate::models::units::norm;
use crate::models::{RunDirection, RunResult, Situation};
use crate::player::Composite;

pub fn resolve_run(
    sit: &Situation,
    direction: RunDirection,
    offense: &SideContext,
    defense: &SideContext,
    env: &Environment,
    tuning: &PlayTuning,
    rng: &mut SimRng,
) -> RunResult {
    let rusher = offense.rusher();
    let back = offense.rating(rusher, Composite::BackSkill);
    let off = &offense.units.offense;
    let def = &defense.units.defense;

    // (run + blocking) vs (run fit + tackling), in [-1, 1]
    let edge = ((norm(off.run) + norm(off.run_blocking))
        - (norm(def.run_defense) + norm(def.tackling)))
        / 2.0;
    let (shift, sigma) = match direction {
        RunDirection::Inside => (0.0, tuning.run_sigma_inside),
        RunDirection::Outside => (-0.3, tuning.run_sigma_outside),
    };
    let mean = tuning.run_mean_yards + 4.0 * edge + 1.5 * (back - 0.5) + shift;
    let mut yards = rng.normal(mean, sigma * tuning.noise_scale);

    let breakaway_p = bounded(
        tuning.breakaway_rate * (1.0 + edge + (back - 0.5)),
        0.0,
        0.25,
        tuning.breakaway_rate,
    );
    if yards > 0.0 && rng.chance(breakaway_p) {
        yards += rng.log_normal(15f64.ln(), 0.6 * tuning.noise_scale);
    }

    let mut yards = bounded(yards, -8.0, 99.0, 0.0).round() as i32;
    let to_goal = sit.yards_to_goal() as i32;
    let touchdown = yards >= to_goal;
    if touchdown {
        yards = to_goal;
    }

    let (tackler, fumble) = if touchdown {
        (None, None)
    } else {
        let tackler = pick_tackler(defense, rng);
        let fumble = check_fumble(rusher, tackler, 1.0, offense, defense, env, tuning, rng);
        (tackler, fumble)
    };

    RunResult {
        direction,
        rusher: id_of(rusher),
        tackler: id_of(tackler),
        yards,
        fumble,
    }
}
