//! Ball-carrier sub-models shared by runs and completions: tackler choice,
//! yards after catch, and fumbles.

use crate::engine::config::PlayTuning;
use crate::engine::context::{id_of, Environment, SideContext};
use crate::engine::probability::{bounded, fumble_probability};
use crate::engine::rng::SimRng;
use crate::models::units::norm;
use crate::models::{Fumble, PassConcept, Player};
use crate::player::Composite;

/// Defender credited with the tackle, weighted by tackling skill.
pub fn pick_tackler<'a>(defense: &SideContext<'a>, rng: &mut SimRng) -> Option<&'a Player> {
    let tacklers = defense.tacklers();
    if tacklers.is_empty() {
        return None;
    }
    let weights: Vec<f64> = tacklers
        .iter()
        .map(|p| defense.rating(Some(*p), Composite::Tackling).powi(2) + 0.05)
        .collect();
    tacklers.get(rng.pick_weighted(&weights)).copied()
}

/// Log-normal YAC from receiver elusiveness vs. tackling and chaos, with an
/// immediate-tackle truncation. Result in [0, 80].
pub fn yards_after_catch(
    receiver: Option<&Player>,
    concept: PassConcept,
    offense: &SideContext,
    defense: &SideContext,
    tuning: &PlayTuning,
    rng: &mut SimRng,
) -> i32 {
    let elusiveness = offense.rating(receiver, Composite::YacAbility);
    let tackling = norm(defense.units.defense.tackling);
    let chaos = defense.units.defense.chaos_rate;

    let immediate = bounded(
        tuning.yac_immediate_tackle * (1.0 + (tackling - 0.5)) - 0.3 * (elusiveness - 0.5),
        0.05,
        0.8,
        tuning.yac_immediate_tackle,
    );
    let tackle_roll = rng.uniform();
    let yac = if tackle_roll < immediate {
        rng.range(0.0, 1.5)
    } else {
        let screen_bonus = if concept == PassConcept::Screen { 0.3 } else { 0.0 };
        let mu = 3.5f64.ln() + 0.8 * (elusiveness - 0.5) - 0.6 * (tackling - 0.5)
            - 0.3 * (chaos - 0.5)
            + screen_bonus;
        rng.log_normal(mu, 0.8 * tuning.noise_scale)
    };
    bounded(yac, 0.0, 80.0, 0.0).round() as i32
}

/// Independent fumble check on the carrier. A hit draws recovery and the
/// yardage swing; `multiplier` scales the base rate (strip sacks).
#[allow(clippy::too_many_arguments)]
pub fn check_fumble(
    carrier: Option<&Player>,
    forced_by: Option<&Player>,
    multiplier: f64,
    offense: &SideContext,
    defense: &SideContext,
    env: &Environment,
    tuning: &PlayTuning,
    rng: &mut SimRng,
) -> Option<Fumble> {
    let security = offense.component(carrier, |l| l.t("ball_security"));
    let stability = offense.component(carrier, |l| l.p("emotional_stability"));
    let chaos = defense.units.defense.chaos_rate;
    let tackling = norm(defense.units.defense.tackling);

    let p = fumble_probability(
        tuning.fumble_base_rate * multiplier,
        security,
        stability,
        chaos,
        tackling,
        env.fumble_multiplier(),
    );
    if !rng.chance(p) {
        return None;
    }

    let lost = rng.chance(bounded(
        tuning.fumble_lost_share + 0.2 * (chaos - 0.5),
        0.0,
        1.0,
        tuning.fumble_lost_share,
    ));
    let swing = if lost {
        bounded(rng.normal(3.0, 4.0 * tuning.noise_scale), 0.0, 30.0, 0.0)
    } else {
        bounded(rng.normal(1.0, 1.5), 0.0, 5.0, 0.0)
    };
    Some(Fumble {
        carrier: id_of(carrier),
        forced_by: id_of(forced_by),
        lost,
        swing_yards: swing.round() as i32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, RosterTemplate};

    #[test]
    fn test_yac_bounds() {
        let team = fixtures::team(&RosterTemplate::new("t", "T"), 1);
        let ctx = SideContext::neutral(&team);
        let tuning = PlayTuning::default();
        let mut rng = SimRng::new(21);
        let wr = ctx.starters.wr.first().copied();
        for _ in 0..2_000 {
            let yac = yards_after_catch(wr, PassConcept::Short, &ctx, &ctx, &tuning, &mut rng);
            assert!((0..=80).contains(&yac));
        }
    }

    #[test]
    fn test_fumbles_are_rare_and_well_formed() {
        let team = fixtures::team(&RosterTemplate::new("t", "T"), 2);
        let ctx = SideContext::neutral(&team);
        let tuning = PlayTuning::default();
        let env = Environment::calm();
        let mut rng = SimRng::new(5);
        let rb = ctx.rusher();
        let mut count = 0;
        for _ in 0..5_000 {
            if let Some(f) = check_fumble(rb, None, 1.0, &ctx, &ctx, &env, &tuning, &mut rng) {
                count += 1;
                assert!((0..=30).contains(&f.swing_yards));
                assert_eq!(f.carrier, rb.map(|p| p.id.clone()));
            }
        }
        // base rate 1.2%, clamped to [0.2%, 6%]
        assert!(count > 0 && count < 300, "fumbles: {}", count);
    }
}
