//! Outcome → state transitions
//!
//! [`apply_outcome`] is the only place field position, down and distance,
//! score and possession change because of a snap. It never touches the
//! clock; the engine runs the clock after the play is logged.

use super::game_state::{
    GameState, DRIVE_START_YARDLINE, FIRST_DOWN_DISTANCE, SAFETY_FREE_KICK_YARDLINE,
};
use crate::engine::play_sim::kicking::{
    missed_field_goal_yardline, punt_receiving_yardline, TOUCHBACK_YARDLINE,
};
use crate::models::{DriveResult, PassOutcome, PlayOutcome, PlayResult, Side};

pub const TOUCHDOWN_POINTS: u32 = 6;
pub const FIELD_GOAL_POINTS: u32 = 3;
pub const SAFETY_POINTS: u32 = 2;

/// How a drive ended and who has the ball next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveEnd {
    pub result: DriveResult,
    /// Offense-relative spot where the drive stopped.
    pub end_yardline: u32,
    pub next_offense: Side,
    pub next_yardline: u32,
}

/// What one snap did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayEffect {
    /// Net offense-relative yards, penalties included.
    pub yards_gained: i32,
    pub first_down: bool,
    pub touchdown: bool,
    pub safety: bool,
    /// Interception or lost fumble.
    pub turnover: bool,
    pub points: Option<(Side, u32)>,
    pub drive_end: Option<DriveEnd>,
}

impl PlayEffect {
    pub fn end_of_drive(&self) -> bool {
        self.drive_end.is_some()
    }
}

/// Apply a resolved play to `state` and report what happened.
pub fn apply_outcome(state: &mut GameState, outcome: &PlayOutcome) -> PlayEffect {
    let offense = state.possession;
    let defense = offense.other();
    let yardline = state.yardline;

    let effect = match &outcome.result {
        PlayResult::NoPlay => apply_pre_snap_penalty(state, outcome),
        PlayResult::Punt(punt) => PlayEffect {
            drive_end: Some(DriveEnd {
                result: DriveResult::Punt,
                end_yardline: yardline,
                next_offense: defense,
                next_yardline: punt_receiving_yardline(yardline, punt),
            }),
            ..PlayEffect::default()
        },
        PlayResult::FieldGoal(kick) if kick.made => {
            state.add_score(offense, FIELD_GOAL_POINTS);
            PlayEffect {
                points: Some((offense, FIELD_GOAL_POINTS)),
                drive_end: Some(DriveEnd {
                    result: DriveResult::FieldGoal,
                    end_yardline: yardline,
                    next_offense: defense,
                    next_yardline: DRIVE_START_YARDLINE,
                }),
                ..PlayEffect::default()
            }
        }
        PlayResult::FieldGoal(_) => PlayEffect {
            drive_end: Some(DriveEnd {
                result: DriveResult::MissedFieldGoal,
                end_yardline: yardline,
                next_offense: defense,
                next_yardline: missed_field_goal_yardline(yardline),
            }),
            ..PlayEffect::default()
        },
        PlayResult::Run(_) | PlayResult::Pass(_) => apply_scrimmage(state, outcome),
    };

    if let Some(drive) = state.drive.as_mut() {
        drive.plays += 1;
        drive.net_yards += effect.yards_gained;
    }
    effect
}

/// Pre-snap foul: no snap, same down, spot and distance move by the
/// enforced yardage.
fn apply_pre_snap_penalty(state: &mut GameState, outcome: &PlayOutcome) -> PlayEffect {
    let Some(penalty) = outcome.penalty.as_ref() else {
        return PlayEffect::default();
    };
    let before = state.yardline as i32;
    let moved = half_distance(before, penalty.signed_yards());
    let after = before + moved;
    state.yardline = after as u32;

    let remaining = state.distance as i32 - moved;
    let first_down = penalty.automatic_first_down || remaining <= 0;
    if first_down {
        state.down = 1;
        state.distance = FIRST_DOWN_DISTANCE;
    } else {
        state.distance = remaining.max(1) as u32;
    }
    PlayEffect {
        yards_gained: moved,
        first_down,
        ..PlayEffect::default()
    }
}

/// Enforced yardage for a foul spotted at `yardline`: never more than half
/// the distance to the goal line it moves toward.
pub fn half_distance(yardline: i32, signed_yards: i32) -> i32 {
    if signed_yards < 0 {
        signed_yards.max(-(yardline / 2))
    } else {
        signed_yards.min((100 - yardline) / 2)
    }
}

fn apply_scrimmage(state: &mut GameState, outcome: &PlayOutcome) -> PlayEffect {
    let offense = state.possession;
    let defense = offense.other();
    let yardline = state.yardline as i32;

    if let PlayResult::Pass(pass) = &outcome.result {
        if let PassOutcome::Interception {
            air_yards,
            return_yards,
            ..
        } = pass.outcome
        {
            let landing = yardline + air_yards - return_yards;
            // caught in the end zone and downed there
            let next_yardline = if landing >= 100 {
                TOUCHBACK_YARDLINE
            } else {
                (100 - landing.clamp(1, 99)) as u32
            };
            return PlayEffect {
                turnover: true,
                drive_end: Some(DriveEnd {
                    result: DriveResult::Interception,
                    end_yardline: state.yardline,
                    next_offense: defense,
                    next_yardline,
                }),
                ..PlayEffect::default()
            };
        }
    }

    if outcome.is_fumble_lost() {
        let end = yardline + outcome.scrimmage_yards();
        let spot = end.clamp(1, 99);
        // recovered in the defense's own end zone
        let next_yardline = if end >= 100 {
            TOUCHBACK_YARDLINE
        } else {
            (100 - spot) as u32
        };
        return PlayEffect {
            yards_gained: spot - yardline,
            turnover: true,
            drive_end: Some(DriveEnd {
                result: DriveResult::FumbleLost,
                end_yardline: spot as u32,
                next_offense: defense,
                next_yardline,
            }),
            ..PlayEffect::default()
        };
    }

    // live-ball flags add to the play before the goal lines are checked
    let end = yardline + outcome.scrimmage_yards() + outcome.penalty_yards();

    if end >= 100 {
        state.add_score(offense, TOUCHDOWN_POINTS);
        return PlayEffect {
            yards_gained: 100 - yardline,
            touchdown: true,
            points: Some((offense, TOUCHDOWN_POINTS)),
            drive_end: Some(DriveEnd {
                result: DriveResult::Touchdown,
                end_yardline: 100,
                next_offense: defense,
                next_yardline: DRIVE_START_YARDLINE,
            }),
            ..PlayEffect::default()
        };
    }

    if end <= 0 {
        state.add_score(defense, SAFETY_POINTS);
        return PlayEffect {
            yards_gained: -yardline,
            safety: true,
            points: Some((defense, SAFETY_POINTS)),
            drive_end: Some(DriveEnd {
                result: DriveResult::Safety,
                end_yardline: 0,
                next_offense: defense,
                next_yardline: SAFETY_FREE_KICK_YARDLINE,
            }),
            ..PlayEffect::default()
        };
    }

    let spot = end.clamp(1, 99);
    let gained = spot - yardline;
    let automatic = outcome
        .penalty
        .as_ref()
        .map(|p| p.automatic_first_down)
        .unwrap_or(false);
    state.yardline = spot as u32;

    if automatic || gained >= state.distance as i32 {
        state.down = 1;
        state.distance = FIRST_DOWN_DISTANCE;
        return PlayEffect {
            yards_gained: gained,
            first_down: true,
            ..PlayEffect::default()
        };
    }

    if state.down >= 4 {
        return PlayEffect {
            yards_gained: gained,
            drive_end: Some(DriveEnd {
                result: DriveResult::TurnoverOnDowns,
                end_yardline: spot as u32,
                next_offense: defense,
                next_yardline: (100 - spot) as u32,
            }),
            ..PlayEffect::default()
        };
    }

    state.down += 1;
    state.distance = (state.distance as i32 - gained).max(1) as u32;
    PlayEffect {
        yards_gained: gained,
        ..PlayEffect::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::RuleConfig;
    use crate::models::{
        FieldGoalResult, Foul, Fumble, PassConcept, PassResult, PenaltyCall, RunDirection,
        RunResult,
    };

    fn state_at(yardline: u32, down: u8, distance: u32) -> GameState {
        let mut state = GameState::new(&RuleConfig::default(), Side::Home);
        state.yardline = yardline;
        state.down = down;
        state.distance = distance;
        state
    }

    fn run(yards: i32) -> PlayOutcome {
        PlayOutcome {
            result: PlayResult::Run(RunResult {
                direction: RunDirection::Inside,
                rusher: None,
                tackler: None,
                yards,
                fumble: None,
            }),
            elapsed_sec: 30,
            penalty: None,
        }
    }

    #[test]
    fn test_run_into_end_zone_scores_touchdown() {
        let mut state = state_at(95, 2, 5);
        let effect = apply_outcome(&mut state, &run(5));
        assert!(effect.touchdown);
        assert!(effect.end_of_drive());
        assert_eq!(state.home_score, 6);
        assert_eq!(effect.points, Some((Side::Home, 6)));
        let end = effect.drive_end.unwrap();
        assert_eq!(end.next_offense, Side::Away);
        assert_eq!(end.next_yardline, 25);
    }

    #[test]
    fn test_loss_behind_goal_line_is_safety() {
        let mut state = state_at(2, 1, 10);
        let effect = apply_outcome(&mut state, &run(-4));
        assert!(effect.safety);
        assert_eq!(state.away_score, 2);
        let end = effect.drive_end.unwrap();
        assert_eq!((end.next_offense, end.next_yardline), (Side::Away, 35));
    }

    #[test]
    fn test_first_down_resets_distance() {
        let mut state = state_at(40, 3, 4);
        let effect = apply_outcome(&mut state, &run(4));
        assert!(effect.first_down);
        assert_eq!((state.down, state.distance, state.yardline), (1, 10, 44));

        let mut state = state_at(40, 2, 7);
        let effect = apply_outcome(&mut state, &run(3));
        assert!(!effect.first_down);
        assert_eq!((state.down, state.distance), (3, 4));
    }

    #[test]
    fn test_fourth_down_failure_flips_possession_mirrored() {
        let mut state = state_at(60, 4, 3);
        let effect = apply_outcome(&mut state, &run(1));
        let end = effect.drive_end.unwrap();
        assert_eq!(end.result, DriveResult::TurnoverOnDowns);
        assert_eq!(end.next_offense, Side::Away);
        assert_eq!(end.next_yardline, 39);
    }

    #[test]
    fn test_lost_fumble_spot() {
        let mut state = state_at(30, 1, 10);
        let mut outcome = run(6);
        if let PlayResult::Run(r) = &mut outcome.result {
            r.fumble = Some(Fumble {
                carrier: None,
                forced_by: None,
                lost: true,
                swing_yards: 2,
            });
        }
        let effect = apply_outcome(&mut state, &outcome);
        assert!(effect.turnover);
        let end = effect.drive_end.unwrap();
        assert_eq!(end.next_yardline, 66);
    }

    #[test]
    fn test_interception_in_end_zone_is_touchback() {
        let mut state = state_at(70, 2, 10);
        let outcome = PlayOutcome {
            result: PlayResult::Pass(PassResult {
                concept: PassConcept::Deep,
                target_depth: 30.0,
                passer: None,
                pressure: 0.2,
                under_pressure: false,
                outcome: PassOutcome::Interception {
                    target: None,
                    interceptor: None,
                    air_yards: 30,
                    return_yards: 0,
                },
                fumble: None,
            }),
            elapsed_sec: 10,
            penalty: None,
        };
        let end = apply_outcome(&mut state, &outcome).drive_end.unwrap();
        assert_eq!(end.result, DriveResult::Interception);
        assert_eq!(end.next_yardline, 20);
    }

    #[test]
    fn test_penalties_move_the_chains() {
        // offside on 3rd-and-4: same down, distance shrinks by five → first down
        let mut state = state_at(50, 3, 4);
        let offside = PlayOutcome::no_play(PenaltyCall::new(Foul::Offside, None), 2);
        let effect = apply_outcome(&mut state, &offside);
        assert!(effect.first_down);
        assert_eq!((state.down, state.yardline), (1, 55));

        // false start on 2nd-and-6: 2nd-and-11
        let mut state = state_at(50, 2, 6);
        let false_start = PlayOutcome::no_play(PenaltyCall::new(Foul::FalseStart, None), 2);
        apply_outcome(&mut state, &false_start);
        assert_eq!((state.down, state.distance, state.yardline), (2, 11, 45));

        // holding on a 3-yard run: net -7, next down
        let mut state = state_at(50, 1, 10);
        let mut outcome = run(3);
        outcome.penalty = Some(PenaltyCall::new(Foul::OffensiveHolding, None));
        let effect = apply_outcome(&mut state, &outcome);
        assert_eq!(effect.yards_gained, -7);
        assert_eq!((state.down, state.distance), (2, 17));

        // face mask on a 1-yard run: automatic first down
        let mut state = state_at(50, 3, 9);
        let mut outcome = run(1);
        outcome.penalty = Some(PenaltyCall::new(Foul::FaceMask, None));
        assert!(apply_outcome(&mut state, &outcome).first_down);
        assert_eq!(state.yardline, 66);
    }

    #[test]
    fn test_goal_line_flags_count_before_scoring() {
        // holding wipes out a 5-yard score from the 97
        let mut state = state_at(97, 1, 3);
        let mut outcome = run(5);
        outcome.penalty = Some(PenaltyCall::new(Foul::OffensiveHolding, None));
        let effect = apply_outcome(&mut state, &outcome);
        assert!(!effect.touchdown);
        assert_eq!(effect.points, None);
        assert_eq!(effect.yards_gained, -5);
        assert_eq!((state.yardline, state.down, state.distance), (92, 2, 8));
        assert_eq!(state.home_score, 0);

        // a face mask carries a 2-yard run from the 90 into the end zone
        let mut state = state_at(90, 2, 8);
        let mut outcome = run(2);
        outcome.penalty = Some(PenaltyCall::new(Foul::FaceMask, None));
        let effect = apply_outcome(&mut state, &outcome);
        assert!(effect.touchdown);
        assert_eq!(state.home_score, 6);

        // holding in the own end zone is a safety
        let mut state = state_at(4, 1, 10);
        let mut outcome = run(1);
        outcome.penalty = Some(PenaltyCall::new(Foul::OffensiveHolding, None));
        assert!(apply_outcome(&mut state, &outcome).safety);
        assert_eq!(state.away_score, 2);
    }

    #[test]
    fn test_pre_snap_fouls_use_half_distance() {
        let mut state = state_at(6, 2, 8);
        let false_start = PlayOutcome::no_play(PenaltyCall::new(Foul::FalseStart, None), 2);
        let effect = apply_outcome(&mut state, &false_start);
        assert_eq!(effect.yards_gained, -3);
        assert_eq!((state.yardline, state.distance), (3, 11));

        let mut state = state_at(96, 3, 4);
        let offside = PlayOutcome::no_play(PenaltyCall::new(Foul::Offside, None), 2);
        apply_outcome(&mut state, &offside);
        assert_eq!((state.yardline, state.down, state.distance), (98, 3, 2));

        assert_eq!(half_distance(50, -10), -10);
        assert_eq!(half_distance(90, 15), 5);
    }

    #[test]
    fn test_fumble_recovered_in_end_zone_is_touchback() {
        let mut state = state_at(95, 1, 5);
        let mut outcome = run(8);
        if let PlayResult::Run(r) = &mut outcome.result {
            r.fumble = Some(Fumble {
                carrier: None,
                forced_by: None,
                lost: true,
                swing_yards: 0,
            });
        }
        let effect = apply_outcome(&mut state, &outcome);
        assert!(effect.turnover);
        assert!(!effect.touchdown);
        let end = effect.drive_end.unwrap();
        assert_eq!(end.result, DriveResult::FumbleLost);
        assert_eq!((end.next_offense, end.next_yardline), (Side::Away, 20));
    }

    #[test]
    fn test_field_goals() {
        let mut state = state_at(75, 4, 6);
        let made = PlayOutcome {
            result: PlayResult::FieldGoal(FieldGoalResult {
                kicker: None,
                distance: 42,
                made: true,
            }),
            elapsed_sec: 8,
            penalty: None,
        };
        let effect = apply_outcome(&mut state, &made);
        assert_eq!(state.home_score, 3);
        assert_eq!(effect.drive_end.unwrap().result, DriveResult::FieldGoal);

        let mut state = state_at(75, 4, 6);
        let mut missed = made.clone();
        if let PlayResult::FieldGoal(k) = &mut missed.result {
            k.made = false;
        }
        let end = apply_outcome(&mut state, &missed).drive_end.unwrap();
        assert_eq!(end.result, DriveResult::MissedFieldGoal);
        assert_eq!(end.next_yardline, 32);
        assert_eq!(state.home_score, 0);
    }
}
