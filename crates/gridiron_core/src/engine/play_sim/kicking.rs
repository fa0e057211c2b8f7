//! Special teams: punts and field goals.

use crate::engine::config::PlayTuning;
use crate::engine::context::{id_of, Environment, SideContext};
use crate::engine::probability::{bounded, field_goal_probability};
use crate::engine::rng::SimRng;
use crate::models::units::norm;
use crate::models::{FieldGoalResult, PuntResult, Situation};
use crate::player::Composite;

/// Receiving team's yard line after a touchback.
pub const TOUCHBACK_YARDLINE: u32 = 20;
/// Receiving team never starts inside its own 10 after a return.
pub const MIN_RETURN_YARDLINE: u32 = 10;

pub fn resolve_punt(
    sit: &Situation,
    offense: &SideContext,
    defense: &SideContext,
    env: &Environment,
    tuning: &PlayTuning,
    rng: &mut SimRng,
) -> PuntResult {
    let punter = offense.punter();
    let leg = offense.rating(punter, Composite::Punting);
    let mean = tuning.punt_mean_yards + 14.0 * (leg - 0.5) - env.punt_penalty();
    let gross = bounded(rng.normal(mean, 6.0 * tuning.noise_scale), 15.0, 75.0, mean).round() as i32;

    let landing = sit.yardline as i32 + gross;
    if landing >= 100 {
        return PuntResult {
            punter: id_of(punter),
            gross_yards: gross,
            return_yards: 0,
            touchback: true,
        };
    }

    let threat = defense.units.special.return_threat;
    let coverage = norm(offense.units.special.coverage);
    let return_mean = 4.0 + 10.0 * (threat - 0.5) - 6.0 * (coverage - 0.5);
    // returns stop short of the far end zone
    let max_return = (landing - 1).max(0) as f64;
    let return_yards = bounded(
        rng.normal(return_mean, 4.5 * tuning.noise_scale),
        0.0,
        max_return.min(40.0),
        0.0,
    )
    .round() as i32;

    PuntResult {
        punter: id_of(punter),
        gross_yards: gross,
        return_yards,
        touchback: false,
    }
}

/// Receiving team's offense-relative yard line after a punt.
pub fn punt_receiving_yardline(kicking_yardline: u32, punt: &PuntResult) -> u32 {
    if punt.touchback {
        return TOUCHBACK_YARDLINE;
    }
    let landing = kicking_yardline as i32 + punt.net_yards();
    (100 - landing).clamp(MIN_RETURN_YARDLINE as i32, 99) as u32
}

/// Kicker range in yards: leg strength against the wind.
pub fn kicker_range(offense: &SideContext, env: &Environment, tuning: &PlayTuning) -> f64 {
    let power = offense.component(offense.kicker(), |l| l.t("kick_power"));
    tuning.fg_range_yards + 14.0 * (power - 0.5) - env.kick_range_penalty()
}

pub fn field_goal_make_probability(
    distance: u32,
    offense: &SideContext,
    env: &Environment,
    tuning: &PlayTuning,
) -> f64 {
    let accuracy = offense.component(offense.kicker(), |l| l.t("kick_accuracy"));
    field_goal_probability(distance as f64, kicker_range(offense, env, tuning), accuracy)
}

pub fn resolve_field_goal(
    sit: &Situation,
    offense: &SideContext,
    env: &Environment,
    tuning: &PlayTuning,
    rng: &mut SimRng,
) -> FieldGoalResult {
    kick_from(sit.field_goal_distance(), offense, env, tuning, rng)
}

/// One kick at a fixed distance (also used by the shootout).
pub fn kick_from(
    distance: u32,
    offense: &SideContext,
    env: &Environment,
    tuning: &PlayTuning,
    rng: &mut SimRng,
) -> FieldGoalResult {
    let p = field_goal_make_probability(distance, offense, env, tuning);
    FieldGoalResult {
        kicker: id_of(offense.kicker()),
        distance,
        made: rng.chance(p),
    }
}

/// Defense's yard line after a miss: spot of the kick or its own 20,
/// whichever is farther from its goal.
pub fn missed_field_goal_yardline(kicking_yardline: u32) -> u32 {
    let spot = 100 - kicking_yardline.saturating_sub(7).max(1) as i32;
    spot.clamp(TOUCHBACK_YARDLINE as i32, 99) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, RosterTemplate};

    #[test]
    fn test_punt_placement() {
        let touchback = PuntResult {
            punter: None,
            gross_yards: 60,
            return_yards: 0,
            touchback: true,
        };
        assert_eq!(punt_receiving_yardline(50, &touchback), 20);

        let normal = PuntResult {
            punter: None,
            gross_yards: 45,
            return_yards: 5,
            touchback: false,
        };
        // lands at 75, returned to 70 → receiver at its own 30
        assert_eq!(punt_receiving_yardline(30, &normal), 30);

        let pinned = PuntResult {
            punter: None,
            gross_yards: 48,
            return_yards: 0,
            touchback: false,
        };
        assert_eq!(punt_receiving_yardline(45, &pinned), 10);
    }

    #[test]
    fn test_punts_stay_in_play() {
        let team = fixtures::team(&RosterTemplate::new("t", "T"), 1);
        let ctx = SideContext::neutral(&team);
        let tuning = PlayTuning::default();
        let env = Environment::calm();
        let mut rng = SimRng::new(12);
        for yardline in [5u32, 30, 60] {
            let sit = Situation { yardline, down: 4, ..Situation::default() };
            for _ in 0..500 {
                let punt = resolve_punt(&sit, &ctx, &ctx, &env, &tuning, &mut rng);
                assert!((15..=75).contains(&punt.gross_yards));
                let spot = punt_receiving_yardline(yardline, &punt);
                assert!((10..=99).contains(&spot));
            }
        }
    }

    #[test]
    fn test_missed_field_goal_spot() {
        // kick from the opponent 30 (yardline 70): spot is the 37, defense at its 37
        assert_eq!(missed_field_goal_yardline(70), 37);
        // kick from the opponent 5 (yardline 95): spot would be its 12, so the 20
        assert_eq!(missed_field_goal_yardline(95), 20);
    }

    #[test]
    fn test_field_goal_accuracy_falls_with_distance_and_wind() {
        let team = fixtures::team(&RosterTemplate::new("t", "T"), 1);
        let ctx = SideContext::neutral(&team);
        let tuning = PlayTuning::default();
        let calm = Environment::calm();
        let windy = Environment {
            wind_mph: 25.0,
            ..Environment::calm()
        };
        let short = field_goal_make_probability(25, &ctx, &calm, &tuning);
        let long = field_goal_make_probability(55, &ctx, &calm, &tuning);
        let long_windy = field_goal_make_probability(55, &ctx, &windy, &tuning);
        assert!(short > long);
        assert!(long > long_windy);
    }
}
