use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use gridiron_core::api::{simulate_batch, Matchup};
use gridiron_core::engine::context::{Environment, SideContext};
use gridiron_core::engine::play_sim::resolve_play;
use gridiron_core::models::{PassConcept, PlayCall, Situation};
use gridiron_core::{fixtures, simulate_game, PlayTuning, SimOptions, SimRng};

fn bench_full_game(c: &mut Criterion) {
    let (home, away) = fixtures::demo_pair(1);
    let options = SimOptions::seeded(42);
    c.bench_function("full_game", |b| {
        b.iter(|| {
            let result = simulate_game(black_box(&home), black_box(&away), &options).unwrap();
            black_box(result.home_score + result.away_score);
        })
    });
}

fn bench_single_pass_play(c: &mut Criterion) {
    let (home, away) = fixtures::demo_pair(1);
    let offense = SideContext::neutral(&home);
    let defense = SideContext::neutral(&away);
    let call = PlayCall::pass(PassConcept::Intermediate);
    let sit = Situation::default();
    let env = Environment::calm();
    let tuning = PlayTuning::default();
    let mut rng = SimRng::new(7);
    c.bench_function("pass_play", |b| {
        b.iter(|| {
            let outcome =
                resolve_play(&sit, black_box(&call), &offense, &defense, &env, &tuning, &mut rng)
                    .unwrap();
            black_box(outcome.elapsed_sec);
        })
    });
}

fn bench_batch_of_sixteen(c: &mut Criterion) {
    let (home, away) = fixtures::demo_pair(1);
    let matchups: Vec<Matchup> = (1..=16)
        .map(|seed| Matchup {
            home: home.clone(),
            away: away.clone(),
            options: SimOptions::seeded(seed),
        })
        .collect();
    let mut group = c.benchmark_group("batch");
    group.sample_size(20);
    group.bench_function("sixteen_games", |b| {
        b.iter(|| black_box(simulate_batch(black_box(&matchups)).len()))
    });
    group.finish();
}

criterion_group!(benches, bench_full_game, bench_single_pass_play, bench_batch_of_sixteen);
criterion_main!(benches);
