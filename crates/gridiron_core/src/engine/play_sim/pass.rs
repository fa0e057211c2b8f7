//! Pass play pipeline
//!
//! Sub-models run in causal order:
//!
//! 1. pressure: time-to-pressure from protection vs. rush, blitz and concept
//! 2. QB decision: time-to-throw vs. time-to-pressure gives pressure severity
//! 3. separation: receiver + team pass vs. defender + team coverage
//! 4. placement: radial error from accuracy, pocket poise, severity, depth, wind
//! 5. sack gate: pressure well before the throw and a badly placed ball
//! 6. catch point: one draw splits catch / interception / incompletion
//! 7. yards after catch, then the carrier fumble check
//!
//! Every draw up to the catch point is taken unconditionally, so two teams
//! facing the same stream see the same noise and differ only by rating.

use super::ball_carrier::{check_fumble, pick_tackler, yards_after_catch};
use crate::engine::config::PlayTuning;
use crate::engine::context::{id_of, Environment, SideContext};
use crate::engine::probability::{bounded, cap_pair, logistic};
use crate::engine::rng::SimRng;
use crate::models::units::norm;
use crate::models::{Fumble, PassConcept, PassOutcome, PassResult, Player, Position, Situation};
use crate::player::Composite;

/// Catch + interception never exceed this; the rest is incompletion.
const MAX_BALL_CAUGHT: f64 = 0.95;
/// Strip-sack fumble rate multiplier.
const STRIP_SACK_MULTIPLIER: f64 = 2.5;

/// Intermediate values from the pre-catch sub-models.
#[derive(Debug, Clone, Copy)]
pub struct PassRead {
    pub time_to_pressure: f64,
    pub time_to_throw: f64,
    pub pressure: f64,
    pub severity: f64,
    pub separation: f64,
    pub placement_error: f64,
}

#[allow(clippy::too_many_arguments)]
pub fn resolve_pass(
    sit: &Situation,
    concept: PassConcept,
    target_depth: f64,
    offense: &SideContext,
    defense: &SideContext,
    env: &Environment,
    tuning: &PlayTuning,
    rng: &mut SimRng,
) -> PassResult {
    let off = &offense.units.offense;
    let def = &defense.units.defense;
    let noise = tuning.noise_scale;
    let depth = target_depth.max(0.0);
    let qb = offense.qb();

    // 1. pressure
    let concept_adj = match concept {
        PassConcept::PlayAction => 0.35,
        PassConcept::Screen => -0.4,
        PassConcept::Short => -0.2,
        PassConcept::Intermediate | PassConcept::Deep => 0.0,
    };
    let blitz = def.blitz_aggression;
    let ttp_mean = 2.8 + 1.2 * (off.pass_protection as f64 - def.pass_rush as f64) / 100.0
        - 0.5 * blitz
        + concept_adj;
    let ttp = bounded(
        rng.normal(ttp_mean, (0.55 + 0.25 * blitz) * noise),
        0.8,
        6.0,
        2.8,
    );
    let pressure = bounded((3.2 - ttp) / 2.4, 0.0, 1.0, 0.0);

    // 2. QB decision
    let processing = offense.rating(qb, Composite::QbProcessing);
    let risk = offense.rating(qb, Composite::RiskTolerance);
    let tt_mean = 1.6 + 0.07 * depth - 0.5 * (processing - 0.5) + 0.35 * (risk - 0.5);
    let tt = bounded(rng.normal(tt_mean, 0.35 * noise), 0.6, 6.0, 2.0);
    let late = tt - ttp;
    let under_pressure = late > 0.0;
    let severity = if under_pressure {
        bounded(late / 1.5 + 0.25 * pressure, 0.0, 1.0, 0.0)
    } else {
        0.25 * pressure
    };

    // 3. target and separation
    let targets = offense.targets();
    let weights: Vec<f64> = targets
        .iter()
        .map(|p| target_weight(offense, p, concept))
        .collect();
    let target = targets.get(rng.pick_weighted(&weights)).copied();
    let defender = assigned_defender(offense, defense, target);

    let craft = offense.rating(target, Composite::ReceiverCraft);
    let cover = defense.rating(defender, Composite::Coverage);
    let screen_room = if concept == PassConcept::Screen { 1.0 } else { 0.0 };
    let sep_base = 2.2 * ((craft + norm(off.pass)) - (cover + norm(def.coverage))) + 1.2
        - 0.03 * depth
        + screen_room;
    let separation = bounded(sep_base + rng.normal(0.0, 1.1 * noise), -2.0, 5.0, 0.0);

    // 4. placement
    let accuracy = offense.rating(qb, Composite::QbAccuracy);
    let pocket = offense.rating(qb, Composite::PocketPresence);
    let err_base = (1.4 + 0.04 * depth
        - 1.6 * (accuracy - 0.5)
        - 0.6 * (pocket - 0.5)
        - 2.0 * (norm(off.pass) - 0.5)
        + 1.2 * severity * (1.5 - pocket)
        + env.placement_penalty(depth))
    .max(0.3);
    let placement_error = bounded(
        rng.log_normal(err_base.ln(), 0.45 * noise),
        0.0,
        8.0,
        err_base,
    );

    let read = PassRead {
        time_to_pressure: ttp,
        time_to_throw: tt,
        pressure,
        severity,
        separation,
        placement_error,
    };

    let sack_roll = rng.uniform();
    let catch_roll = rng.uniform();

    let passer = id_of(qb);
    let build = |outcome: PassOutcome, fumble: Option<Fumble>| PassResult {
        concept,
        target_depth,
        passer: passer.clone(),
        pressure,
        under_pressure,
        outcome,
        fumble,
    };

    // 5. sack gate
    if sack_gate_open(&read) && sack_roll < sack_probability(&read, pocket, tuning) {
        let sacker = pick_sacker(defense, rng);
        let yards_lost = bounded(rng.normal(6.5, 2.5 * noise), 1.0, 15.0, 6.0).round() as i32;
        let fumble = check_fumble(
            qb,
            sacker,
            STRIP_SACK_MULTIPLIER,
            offense,
            defense,
            env,
            tuning,
            rng,
        );
        return build(
            PassOutcome::Sack {
                sacker: id_of(sacker),
                yards_lost,
            },
            fumble,
        );
    }

    // 6. catch point
    let (p_catch, p_int) =
        catch_probabilities(&read, offense, defense, target, defender, depth, tuning);
    if catch_roll >= p_catch + p_int {
        return build(
            PassOutcome::Incomplete {
                target: id_of(target),
                defender: id_of(defender),
            },
            None,
        );
    }
    let to_goal = sit.yards_to_goal() as i32;
    let air_yards = (target_depth.round() as i32).clamp(1 - sit.yardline as i32, to_goal);

    if catch_roll >= p_catch {
        let return_yards =
            bounded(rng.normal(8.0, 8.0 * noise), 0.0, 60.0, 0.0).round() as i32;
        return build(
            PassOutcome::Interception {
                target: id_of(target),
                interceptor: id_of(defender),
                air_yards,
                return_yards,
            },
            None,
        );
    }

    // 7. yards after catch
    if air_yards >= to_goal {
        return build(
            PassOutcome::Complete {
                receiver: id_of(target),
                air_yards,
                yac: 0,
                tackler: None,
            },
            None,
        );
    }
    let yac = yards_after_catch(target, concept, offense, defense, tuning, rng)
        .min(to_goal - air_yards);
    if air_yards + yac >= to_goal {
        return build(
            PassOutcome::Complete {
                receiver: id_of(target),
                air_yards,
                yac,
                tackler: None,
            },
            None,
        );
    }
    let tackler = pick_tackler(defense, rng);
    let fumble = check_fumble(target, tackler, 1.0, offense, defense, env, tuning, rng);
    build(
        PassOutcome::Complete {
            receiver: id_of(target),
            air_yards,
            yac,
            tackler: id_of(tackler),
        },
        fumble,
    )
}

fn target_weight(offense: &SideContext, player: &Player, concept: PassConcept) -> f64 {
    let craft = offense.rating(Some(player), Composite::ReceiverCraft);
    let role = match (player.position, concept) {
        (Position::RB | Position::FB, PassConcept::Screen) => 2.5,
        (Position::RB | Position::FB, PassConcept::Deep) => 0.2,
        (Position::RB | Position::FB, _) => 0.5,
        (Position::TE, PassConcept::Deep) => 0.6,
        _ => 1.0,
    };
    role * (craft.powi(2) + 0.05)
}

/// Man-up rule: WRn draws CBn (a safety when the corners run out), tight
/// ends draw the first safety, backs draw the first linebacker.
fn assigned_defender<'d>(
    offense: &SideContext,
    defense: &SideContext<'d>,
    target: Option<&Player>,
) -> Option<&'d Player> {
    let target = target?;
    let ds = &defense.starters;
    let first_any = || ds.defense().first().copied();
    match target.position {
        Position::WR => {
            let idx = offense
                .starters
                .wr
                .iter()
                .position(|p| p.id == target.id)
                .unwrap_or(0);
            ds.cb
                .get(idx)
                .or_else(|| ds.s.get(idx.saturating_sub(ds.cb.len())))
                .or_else(|| ds.s.first())
                .copied()
                .or_else(first_any)
        }
        Position::TE => ds.s.first().or_else(|| ds.lb.first()).copied().or_else(first_any),
        _ => ds.lb.first().or_else(|| ds.s.first()).copied().or_else(first_any),
    }
}

fn pick_sacker<'a>(defense: &SideContext<'a>, rng: &mut SimRng) -> Option<&'a Player> {
    let rushers = defense.pass_rushers();
    let weights: Vec<f64> = rushers
        .iter()
        .map(|p| defense.rating(Some(*p), Composite::PassRush).powi(2) + 0.05)
        .collect();
    rushers.get(rng.pick_weighted(&weights)).copied()
}

/// Pressure arrived well before the throw and the ball is off target.
pub fn sack_gate_open(read: &PassRead) -> bool {
    read.time_to_pressure + 0.6 < read.time_to_throw && read.placement_error > 2.0
}

fn sack_probability(read: &PassRead, pocket: f64, tuning: &PlayTuning) -> f64 {
    bounded(
        tuning.sack_rate * (0.5 + read.pressure) * (1.0 - 0.8 * (pocket - 0.5)),
        0.0,
        0.9,
        tuning.sack_rate,
    )
}

/// (catch, interception) probabilities, capped to [`MAX_BALL_CAUGHT`] together.
fn catch_probabilities(
    read: &PassRead,
    offense: &SideContext,
    defense: &SideContext,
    target: Option<&Player>,
    defender: Option<&Player>,
    depth: f64,
    tuning: &PlayTuning,
) -> (f64, f64) {
    let effective = read.separation - 0.6 * read.placement_error;
    let hands = offense.component(target, |l| l.t("hands"));
    let security = offense.component(target, |l| l.t("ball_security"));
    let hawk = defense.rating(defender, Composite::BallHawk);
    let chaos = defense.units.defense.chaos_rate;
    let pass = norm(offense.units.offense.pass) - 0.5;

    let catch_logit = tuning.catch_logit_base + 0.9 * effective + 1.2 * (hands - 0.5)
        + 0.4 * (security - 0.5)
        - 0.8 * (hawk - 0.5)
        - 0.6 * (chaos - 0.5)
        + 2.5 * pass
        - 0.02 * depth;
    let int_logit = tuning.interception_logit_base - 0.7 * effective + 1.5 * (hawk - 0.5)
        + 1.0 * (chaos - 0.5)
        + 1.2 * read.severity
        - 1.0 * pass
        + 0.02 * depth;
    cap_pair(logistic(catch_logit), logistic(int_logit), MAX_BALL_CAUGHT)
}
