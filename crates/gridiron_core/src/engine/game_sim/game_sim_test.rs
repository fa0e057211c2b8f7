use super::*;
use crate::fixtures;
use crate::models::{DriveResult, PlayResult};
use proptest::prelude::*;

fn play(seed: u32) -> GameResult {
    let (home, away) = fixtures::demo_pair(1);
    simulate(&home, &away, &SimOptions::seeded(seed)).expect("game completes")
}

fn no_flag(entry: &PlayLogEntry) -> bool {
    entry.outcome.penalty.is_none()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_same_seed_same_digest(seed in any::<u32>()) {
        let a = play(seed);
        let b = play(seed);
        prop_assert_eq!(a.digest().unwrap(), b.digest().unwrap());
    }

    #[test]
    fn prop_scores_move_in_legal_steps(seed in any::<u32>()) {
        let result = play(seed);
        let (mut home, mut away) = (0u32, 0u32);
        for entry in &result.plays {
            prop_assert!(entry.home_score >= home && entry.away_score >= away);
            let dh = entry.home_score - home;
            let da = entry.away_score - away;
            prop_assert!(dh == 0 || da == 0, "both sides scored on play {}", entry.play_id);
            let delta = dh + da;
            prop_assert!([0, 2, 3, 6].contains(&delta), "delta {}", delta);
            home = entry.home_score;
            away = entry.away_score;
        }
        prop_assert_eq!((home, away), (result.home_score, result.away_score));
    }

    #[test]
    fn prop_clock_and_quarter_only_run_forward(seed in any::<u32>()) {
        let result = play(seed);
        for pair in result.plays.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            prop_assert!(next.quarter >= prev.quarter);
            if next.quarter == prev.quarter {
                prop_assert!(next.clock_sec <= prev.clock_sec);
            }
            prop_assert!(next.play_id == prev.play_id + 1);
        }
        prop_assert!(result.quarters_played >= result.rules.num_quarters);
        prop_assert!(matches!(result.events.last().map(|e| e.kind), Some(EventKind::GameEnd)));
    }

    #[test]
    fn prop_ball_stays_on_the_field(seed in any::<u32>()) {
        let result = play(seed);
        for entry in &result.plays {
            prop_assert!((1..=99).contains(&entry.yardline), "yardline {}", entry.yardline);
            prop_assert!((1..=4).contains(&entry.down));
            prop_assert!(entry.distance >= 1);
        }
        prop_assert!((1..=99).contains(&result.final_snapshot.yardline));
    }

    #[test]
    fn prop_downs_progress(seed in any::<u32>()) {
        let result = play(seed);
        for pair in result.plays.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let same_series = prev.drive_id == next.drive_id && prev.quarter == next.quarter;
            if !same_series || !no_flag(prev) || prev.end_of_drive {
                continue;
            }
            if prev.first_down {
                prop_assert_eq!(next.down, 1);
            } else {
                prop_assert_eq!(next.down, prev.down + 1);
            }
        }
    }

    #[test]
    fn prop_failed_fourth_down_flips_possession(seed in any::<u32>()) {
        let result = play(seed);
        for pair in result.plays.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let scrimmage = matches!(prev.outcome.result, PlayResult::Run(_) | PlayResult::Pass(_));
            let failed = prev.down == 4
                && scrimmage
                && no_flag(prev)
                && !prev.first_down
                && !prev.touchdown
                && !prev.safety;
            if failed && next.quarter == prev.quarter {
                prop_assert!(prev.end_of_drive);
                prop_assert_eq!(next.offense, prev.offense.other());
            }
        }
    }
}

#[test]
fn test_team_stats_reconcile_with_log() {
    let result = play(2024);
    let plays_run = result.home_stats.plays + result.away_stats.plays;
    let scrimmage = result
        .plays
        .iter()
        .filter(|p| matches!(p.outcome.result, PlayResult::Run(_) | PlayResult::Pass(_)))
        .count() as u32;
    assert_eq!(plays_run, scrimmage);

    let drive_plays: u32 = result.drives.iter().map(|d| d.plays).sum();
    assert_eq!(drive_plays as usize, result.plays.len());

    let scores = result
        .events
        .iter()
        .filter(|e| e.kind == EventKind::Score)
        .count();
    let scoring_plays = result
        .plays
        .iter()
        .enumerate()
        .filter(|(i, p)| {
            let (h, a) = match i.checked_sub(1) {
                Some(j) => (result.plays[j].home_score, result.plays[j].away_score),
                None => (0, 0),
            };
            p.home_score != h || p.away_score != a
        })
        .count();
    assert_eq!(scores, scoring_plays);
}

#[test]
fn test_drive_results_match_scores() {
    let result = play(77);
    for drive in &result.drives {
        let (h0, a0) = drive.start_score;
        let (h1, a1) = drive.end_score;
        let gained = (h1 - h0) + (a1 - a0);
        match drive.result {
            DriveResult::Touchdown => assert_eq!(gained, 6),
            DriveResult::FieldGoal => assert_eq!(gained, 3),
            DriveResult::Safety => assert_eq!(gained, 2),
            _ => {}
        }
    }
}

#[test]
fn test_one_play_quarters_reach_overtime_and_shootout() {
    let rules = RuleConfig {
        quarter_length_sec: 1,
        allow_ties: false,
        max_overtime_quarters: 1,
        ..RuleConfig::default()
    };
    let (home, away) = fixtures::demo_pair(3);
    let mut went_to_overtime = 0;
    for seed in 1..50 {
        let options = SimOptions::seeded(seed).with_rules(rules.clone());
        let result = simulate(&home, &away, &options).unwrap();
        assert!(result.winner.is_some(), "seed {} ended without a winner", seed);

        if result.overtime_quarters > 0 {
            went_to_overtime += 1;
            assert_eq!(result.overtime_quarters, 1);
            assert_eq!(result.quarters_played, 5);
        } else {
            assert_eq!(result.quarters_played, 4);
            assert!(result.shootout.is_none());
        }

        if result.home_score == result.away_score {
            let shootout = result.shootout.as_ref().expect("tie broken by shootout");
            assert_eq!(result.winner, Some(shootout.winner));
            assert!(result.events.iter().any(|e| e.kind == EventKind::Shootout));
        }
    }
    assert!(went_to_overtime > 0);
}

#[test]
fn test_ties_stand_when_allowed() {
    let rules = RuleConfig {
        quarter_length_sec: 1,
        max_overtime_quarters: 0,
        allow_ties: true,
        ..RuleConfig::default()
    };
    let (home, away) = fixtures::demo_pair(3);
    for seed in 1..30 {
        let options = SimOptions::seeded(seed).with_rules(rules.clone());
        let result = simulate(&home, &away, &options).unwrap();
        assert!(result.shootout.is_none());
        assert_eq!(result.overtime_quarters, 0);
        assert_eq!(result.is_tie(), result.home_score == result.away_score);
    }
}

#[test]
fn test_zero_base_rates_switch_off_flags_and_fumbles() {
    let mut rules = RuleConfig::default();
    rules.tuning.penalty_base_rate = 0.0;
    rules.tuning.fumble_base_rate = 0.0;
    rules.validate().unwrap();
    let (home, away) = fixtures::demo_pair(4);
    for seed in [1, 17, 404] {
        let options = SimOptions::seeded(seed).with_rules(rules.clone());
        let result = simulate(&home, &away, &options).unwrap();
        assert!(result.events.iter().all(|e| e.kind != EventKind::Penalty));
        assert!(result.plays.iter().all(no_flag));
        assert_eq!(result.home_stats.penalties + result.away_stats.penalties, 0);
        assert_eq!(result.home_stats.fumbles + result.away_stats.fumbles, 0);
    }
}

#[test]
fn test_unseeded_game_records_a_replayable_seed() {
    let (home, away) = fixtures::demo_pair(9);
    let first = simulate(&home, &away, &SimOptions::unseeded()).unwrap();
    assert_eq!(first.seed_mode, SeedMode::Unseeded);

    let replay = simulate(&home, &away, &SimOptions::seeded(first.seed)).unwrap();
    assert_eq!(replay.seed_mode, SeedMode::Seeded);
    assert_eq!(replay.plays, first.plays);
    assert_eq!(
        (replay.home_score, replay.away_score),
        (first.home_score, first.away_score)
    );
}

#[test]
fn test_invalid_rules_rejected_before_kickoff() {
    let (home, away) = fixtures::demo_pair(1);
    let options = SimOptions::seeded(1).with_rules(RuleConfig {
        quarter_length_sec: 0,
        ..RuleConfig::default()
    });
    let err = simulate(&home, &away, &options).unwrap_err();
    assert!(matches!(err, SimError::InvalidConfig(_)));
}

#[test]
fn test_engine_steps_keep_state_legal() {
    let (home, away) = fixtures::demo_pair(4);
    let rules = RuleConfig::default();
    let mut engine = GameEngine::new(&home, &away, &rules, 31);
    let mut steps = 0;
    while !engine.state().phase.is_final() {
        engine.step().unwrap();
        let state = engine.state();
        assert!((1..=99).contains(&state.yardline));
        assert!((1..=4).contains(&state.down));
        steps += 1;
        assert!(steps < rules.play_cap());
    }
    let result = engine.into_result(SeedMode::Seeded);
    assert_eq!(result.final_snapshot.total_plays, steps);
}
