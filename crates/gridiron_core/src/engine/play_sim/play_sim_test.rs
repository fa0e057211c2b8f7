use super::*;
use crate::error::SimError;
use crate::fixtures::{self, RosterTemplate};
use crate::models::{PassConcept, RunDirection, Team};

fn fixture(id: &str) -> Team {
    fixtures::team(&RosterTemplate::new(id, id), 5)
}

fn completion_rate(offense: &SideContext, defense: &SideContext) -> f64 {
    let sit = Situation::default();
    let call = PlayCall::pass(PassConcept::Short);
    let tuning = PlayTuning::default();
    let env = Environment::calm();
    let mut completions = 0;
    for i in 0..100 {
        let mut rng = SimRng::new(42).fork(&format!("play{}", i));
        let outcome = resolve_play(&sit, &call, offense, defense, &env, &tuning, &mut rng)
            .expect("valid call");
        if outcome.is_completion() {
            completions += 1;
        }
    }
    completions as f64 / 100.0
}

#[test]
fn test_better_pass_unit_completes_more() {
    let a = fixture("a");
    let b = fixture("b");

    // A throws with 80 into coverage 50; B throws with 50 into coverage 80.
    let mut a_off = SideContext::neutral(&a);
    a_off.units.offense.pass = 80;
    let mut a_def = SideContext::neutral(&b);
    a_def.units.defense.coverage = 50;

    let mut b_off = SideContext::neutral(&b);
    b_off.units.offense.pass = 50;
    let mut b_def = SideContext::neutral(&a);
    b_def.units.defense.coverage = 80;

    let rate_a = completion_rate(&a_off, &a_def);
    let rate_b = completion_rate(&b_off, &b_def);
    assert!(rate_a > rate_b, "A {} vs B {}", rate_a, rate_b);
}

#[test]
fn test_invalid_call_is_rejected() {
    let team = fixture("t");
    let ctx = SideContext::neutral(&team);
    let call = PlayCall::Pass {
        concept: PassConcept::Deep,
        target_depth: 90.0,
    };
    let err = resolve_play(
        &Situation::default(),
        &call,
        &ctx,
        &ctx,
        &Environment::calm(),
        &PlayTuning::default(),
        &mut SimRng::new(1),
    )
    .unwrap_err();
    assert!(matches!(err, SimError::InvalidPlayCall(_)));
}

#[test]
fn test_pre_snap_foul_is_no_play() {
    let team = fixture("t");
    let ctx = SideContext::neutral(&team);
    let tuning = PlayTuning {
        penalty_base_rate: 1.0,
        pre_snap_share: 1.0,
        ..PlayTuning::default()
    };
    let mut rng = SimRng::new(19);
    let call = PlayCall::run(RunDirection::Inside);

    let mut seen = 0;
    for _ in 0..500 {
        let outcome = resolve_play(
            &Situation::default(),
            &call,
            &ctx,
            &ctx,
            &Environment::calm(),
            &tuning,
            &mut rng,
        )
        .unwrap();
        if let Some(pen) = outcome.penalty.as_ref() {
            assert!(pen.pre_snap);
            assert!(outcome.is_pre_snap_penalty());
            assert_eq!(outcome.scrimmage_yards(), 0);
            seen += 1;
        } else {
            assert!(outcome.is_rush());
        }
    }
    assert!(seen > 0);
}

#[test]
fn test_every_play_takes_time() {
    let team = fixture("t");
    let ctx = SideContext::neutral(&team);
    let tuning = PlayTuning::default();
    let mut rng = SimRng::new(5);
    let hurry = Situation {
        hurry_up: true,
        clock_sec: 30,
        ..Situation::default()
    };
    let calls = [
        PlayCall::run(RunDirection::Outside),
        PlayCall::pass(PassConcept::Screen),
        PlayCall::pass(PassConcept::Deep),
        PlayCall::Punt,
        PlayCall::FieldGoal,
    ];
    for sit in [Situation::default(), hurry] {
        for call in &calls {
            for _ in 0..50 {
                let outcome = resolve_play(&sit, call, &ctx, &ctx, &Environment::calm(), &tuning, &mut rng)
                    .unwrap();
                assert!((1..=60).contains(&outcome.elapsed_sec));
            }
        }
    }
}

#[test]
fn test_live_flag_dropped_on_turnover() {
    let team = fixture("t");
    let ctx = SideContext::neutral(&team);
    let tuning = PlayTuning {
        penalty_base_rate: 1.0,
        pre_snap_share: 0.0,
        interception_logit_base: 4.0,
        ..PlayTuning::default()
    };
    let mut rng = SimRng::new(23);
    let call = PlayCall::pass(PassConcept::Deep);
    for _ in 0..500 {
        let outcome = resolve_play(
            &Situation::default(),
            &call,
            &ctx,
            &ctx,
            &Environment::calm(),
            &tuning,
            &mut rng,
        )
        .unwrap();
        if outcome.is_turnover() {
            assert!(outcome.penalty.is_none());
        }
    }
}
