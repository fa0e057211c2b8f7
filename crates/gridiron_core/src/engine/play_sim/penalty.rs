//! Penalty model, evaluated before the core play.
//!
//! Flag rate scales with both teams' average aggression against their
//! average discipline. A flag then draws pre-snap vs. live-ball, the
//! offending side, and a foul from the table in [`Foul`].

use crate::engine::config::PlayTuning;
use crate::engine::context::{id_of, SideContext};
use crate::engine::probability::{bounded, penalty_probability};
use crate::engine::rng::SimRng;
use crate::models::{Foul, Offender, PenaltyCall, PlayCall, Player};

/// Draw this snap's flag, if any.
///
/// Punts and field goals draw from the pre-snap table only, at the full
/// flag rate.
pub fn draw_penalty(
    call: &PlayCall,
    offense: &SideContext,
    defense: &SideContext,
    tuning: &PlayTuning,
    rng: &mut SimRng,
) -> Option<PenaltyCall> {
    let off = &offense.units.offense;
    let def = &defense.units.defense;
    let aggression = (off.aggression as f64 + def.aggression as f64) / 2.0;
    let discipline = (off.discipline as f64 + def.discipline as f64) / 2.0;
    let p = penalty_probability(tuning.penalty_base_rate, aggression, discipline);

    let flag_roll = rng.uniform();
    if flag_roll >= p {
        return None;
    }

    let pre_snap = !call.is_scrimmage() || rng.chance(tuning.pre_snap_share);

    // The sloppier side draws more flags.
    let offense_share = bounded(
        0.5 + (def.discipline as f64 - off.discipline as f64) / 200.0
            + (off.aggression as f64 - def.aggression as f64) / 400.0,
        0.2,
        0.8,
        0.5,
    );
    let against = if rng.chance(offense_share) {
        Offender::Offense
    } else {
        Offender::Defense
    };

    let is_pass = matches!(call, PlayCall::Pass { .. });
    let candidates: Vec<Foul> = Foul::ALL
        .into_iter()
        .filter(|f| f.is_pre_snap() == pre_snap && f.offender() == against)
        .filter(|f| is_pass || !f.pass_only())
        .collect();
    let weights: Vec<f64> = candidates.iter().map(|f| foul_weight(*f)).collect();
    let foul = *candidates.get(rng.pick_weighted(&weights))?;

    let culprit = culprit(foul, offense, defense, rng);
    Some(PenaltyCall::new(foul, id_of(culprit)))
}

/// Relative frequency within a (timing, side) bucket.
fn foul_weight(foul: Foul) -> f64 {
    match foul {
        Foul::FalseStart => 4.0,
        Foul::DelayOfGame => 1.0,
        Foul::Offside => 2.0,
        Foul::Encroachment => 1.0,
        Foul::NeutralZoneInfraction => 1.0,
        Foul::OffensiveHolding => 5.0,
        Foul::OffensivePassInterference => 1.0,
        Foul::DefensiveHolding => 3.0,
        Foul::DefensivePassInterference => 2.0,
        Foul::RoughingThePasser => 1.0,
        Foul::FaceMask => 1.0,
        Foul::UnnecessaryRoughness => 1.0,
    }
}

/// Player flagged: drawn from the position group that commits the foul.
fn culprit<'a>(
    foul: Foul,
    offense: &SideContext<'a>,
    defense: &SideContext<'a>,
    rng: &mut SimRng,
) -> Option<&'a Player> {
    let group: Vec<&'a Player> = match foul {
        Foul::FalseStart | Foul::OffensiveHolding => offense.starters.ol.clone(),
        Foul::DelayOfGame => offense.starters.qb.clone(),
        Foul::OffensivePassInterference => offense.starters.receivers(),
        Foul::Offside | Foul::Encroachment | Foul::NeutralZoneInfraction => {
            defense.starters.dl.clone()
        }
        Foul::RoughingThePasser => defense.pass_rushers(),
        Foul::DefensiveHolding | Foul::DefensivePassInterference => defense
            .starters
            .cb
            .iter()
            .chain(defense.starters.s.iter())
            .copied()
            .collect(),
        Foul::FaceMask | Foul::UnnecessaryRoughness => defense.tacklers(),
    };
    if group.is_empty() {
        return None;
    }
    group.get(rng.int(group.len() as u32) as usize).copied()
}
