//! Game Macro Loop
//!
//! Sequences plays for one game: picks a call, hands it to the play
//! micro-simulator, applies the outcome, runs the clock, and walks the
//! quarter/overtime state machine until the game is final.
//!
//! ## Randomness
//! One root [`SimRng`] per game, forked into three streams at kickoff:
//! - `"form"`: per-player form offsets
//! - `"play"`: play calling and play outcomes
//! - `"env"`: weather and coin tosses
//!
//! ## Module layout
//! - `game_state`: the mutable aggregate and drive bookkeeping
//! - `transitions`: outcome → field position / score / possession
//! - `decision`: situational play calling
//! - `overtime`: quarter breaks, overtime and the shootout

pub mod decision;
pub mod game_state;
pub mod overtime;
pub mod transitions;

#[cfg(test)]
mod game_sim_test;

use self::game_state::{GameState, TWO_MINUTES_SEC};
use self::transitions::PlayEffect;
use super::config::{RuleConfig, SimOptions};
use super::context::{Environment, SideContext};
use super::play_sim;
use super::rng::{stream, SimRng};
use super::stats::StatsCalculator;
use crate::error::SimError;
use crate::models::{
    EventKind, FinalSnapshot, GameResult, Offender, PlayCall, PlayLogEntry, PlayOutcome,
    SeedMode, ShootoutResult, Side, Situation, Team, TeamRef, TeamStats, RESULT_SCHEMA_VERSION,
};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{debug, info, trace, warn};

/// Simulate one game.
///
/// Teams without unit profiles are prepared on a private copy. With
/// `options.seed` set the result is a pure function of the inputs.
pub fn simulate(home: &Team, away: &Team, options: &SimOptions) -> Result<GameResult, SimError> {
    options.rules.validate()?;

    let (seed, seed_mode) = match options.seed {
        Some(seed) => (seed, SeedMode::Seeded),
        None => {
            let seed = SimRng::entropy_seed();
            warn!(seed, "no seed supplied; drew one from host entropy");
            (seed, SeedMode::Unseeded)
        }
    };

    let home = prepared(home);
    let away = prepared(away);
    let mut engine = GameEngine::new(&home, &away, &options.rules, seed);
    info!(
        home = %home.id,
        away = %away.id,
        seed = engine.seed,
        wind_mph = engine.env.wind_mph,
        "kickoff"
    );

    engine.run()?;
    let result = engine.into_result(seed_mode);
    info!(
        home = %result.home.id,
        away = %result.away.id,
        home_score = result.home_score,
        away_score = result.away_score,
        winner = ?result.winner,
        plays = result.plays.len(),
        "final"
    );
    Ok(result)
}

fn prepared(team: &Team) -> Cow<'_, Team> {
    if team.is_prepared() {
        Cow::Borrowed(team)
    } else {
        Cow::Owned(team.prepared())
    }
}

/// Exclusive owner of one game's state and streams.
pub struct GameEngine<'a> {
    pub(crate) rules: &'a RuleConfig,
    pub(crate) env: Environment,
    pub(crate) home: SideContext<'a>,
    pub(crate) away: SideContext<'a>,
    pub(crate) play_rng: SimRng,
    pub(crate) env_rng: SimRng,
    pub(crate) state: GameState,
    pub(crate) shootout: Option<ShootoutResult>,
    seed: u32,
}

impl<'a> GameEngine<'a> {
    /// Fork the streams, draw the weather and form, toss the coin.
    pub fn new(home: &'a Team, away: &'a Team, rules: &'a RuleConfig, seed: u32) -> Self {
        let mut root = SimRng::new(seed);
        let seed = root.seed();
        let mut form_rng = root.fork(stream::FORM);
        let play_rng = root.fork(stream::PLAY);
        let mut env_rng = root.fork(stream::ENV);

        let env = Environment::draw(&mut env_rng);
        let home_ctx = SideContext::new(home, &mut form_rng, rules.tuning.form_sigma);
        let away_ctx = SideContext::new(away, &mut form_rng, rules.tuning.form_sigma);
        let receiver = coin_flip(&mut env_rng);

        let mut state = GameState::new(rules, receiver);
        state.push_event(
            EventKind::CoinToss,
            Some(receiver),
            None,
            format!("{} receives", receiver),
        );
        state.push_event(EventKind::QuarterStart, None, None, "quarter 1");

        Self {
            rules,
            env,
            home: home_ctx,
            away: away_ctx,
            play_rng,
            env_rng,
            state,
            shootout: None,
            seed,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Play until final, or fail on the play-cap safety valve.
    pub fn run(&mut self) -> Result<(), SimError> {
        let cap = self.rules.play_cap();
        while !self.state.phase.is_final() {
            if self.state.play_id >= cap {
                return Err(SimError::LoopOverrun { limit: cap });
            }
            self.step()?;
        }
        Ok(())
    }

    /// One snap: call, resolve, apply, log, clock, boundaries.
    pub fn step(&mut self) -> Result<(), SimError> {
        let offense = self.state.possession;
        let sit = self.state.situation(self.rules);
        let (off, def) = match offense {
            Side::Home => (&self.home, &self.away),
            Side::Away => (&self.away, &self.home),
        };
        let call = decision::choose_play(&sit, off, def, self.rules, &mut self.play_rng);
        let outcome = play_sim::resolve_play(
            &sit,
            &call,
            off,
            def,
            &self.env,
            &self.rules.tuning,
            &mut self.play_rng,
        )?;

        let effect = transitions::apply_outcome(&mut self.state, &outcome);
        let consumed = outcome.elapsed_sec.min(self.state.clock_sec);
        if let Some(drive) = self.state.drive.as_mut() {
            drive.elapsed_sec += consumed;
        }
        self.run_clock(outcome.elapsed_sec);
        self.record_play(offense, &sit, call, outcome, &effect);

        if let Some(end) = effect.drive_end {
            self.state.close_drive(end.result, end.end_yardline);
            debug!(
                drive = self.state.drive_id,
                offense = %offense,
                result = ?end.result,
                home = self.state.home_score,
                away = self.state.away_score,
                "drive over"
            );
        }

        if self.state.phase.is_overtime()
            && self.rules.overtime_sudden_death
            && effect.points.is_some()
        {
            self.finish_game();
            return Ok(());
        }

        if self.state.clock_sec == 0 {
            self.end_quarter(effect.drive_end);
        } else if let Some(end) = effect.drive_end {
            self.state.start_drive(end.next_offense, end.next_yardline);
        }
        Ok(())
    }

    fn run_clock(&mut self, elapsed: u32) {
        let before = self.state.clock_sec;
        self.state.clock_sec = before.saturating_sub(elapsed);
        let after = self.state.clock_sec;
        if self.rules.two_minute_warning
            && !self.state.phase.is_overtime()
            && self.rules.is_half_end(self.state.quarter)
            && before > TWO_MINUTES_SEC
            && after <= TWO_MINUTES_SEC
            && after > 0
        {
            self.state
                .push_event(EventKind::TwoMinuteWarning, None, None, "two-minute warning");
        }
    }

    fn record_play(
        &mut self,
        offense: Side,
        sit: &Situation,
        call: PlayCall,
        outcome: PlayOutcome,
        effect: &PlayEffect,
    ) {
        self.state.play_id += 1;
        let play_id = self.state.play_id;
        trace!(
            play = play_id,
            offense = %offense,
            down = sit.down,
            distance = sit.distance,
            yardline = sit.yardline,
            call = %call,
            yards = effect.yards_gained,
            "play"
        );

        if let Some(penalty) = outcome.penalty.as_ref() {
            let flagged = match penalty.against {
                Offender::Offense => offense,
                Offender::Defense => offense.other(),
            };
            self.state.push_event(
                EventKind::Penalty,
                Some(flagged),
                Some(play_id),
                format!("{:?}, {} yards", penalty.foul, penalty.yards),
            );
        }
        if effect.turnover {
            let detail = if outcome.is_interception() {
                "interception"
            } else {
                "fumble lost"
            };
            self.state
                .push_event(EventKind::Turnover, Some(offense.other()), Some(play_id), detail);
        }
        if let Some((side, points)) = effect.points {
            let detail = match points {
                transitions::TOUCHDOWN_POINTS => "touchdown",
                transitions::FIELD_GOAL_POINTS => "field goal",
                _ => "safety",
            };
            self.state
                .push_event(EventKind::Score, Some(side), Some(play_id), detail);
        }

        let entry = PlayLogEntry {
            play_id,
            drive_id: self.state.drive_id,
            offense,
            quarter: sit.quarter,
            clock_sec: sit.clock_sec,
            down: sit.down,
            distance: sit.distance,
            yardline: sit.yardline,
            call,
            outcome,
            yards_gained: effect.yards_gained,
            first_down: effect.first_down,
            touchdown: effect.touchdown,
            safety: effect.safety,
            turnover: effect.turnover,
            end_of_drive: effect.end_of_drive(),
            home_score: self.state.home_score,
            away_score: self.state.away_score,
        };
        self.state.plays.push(entry);
    }

    /// Freeze the finished game into its result record.
    pub fn into_result(self, seed_mode: SeedMode) -> GameResult {
        let state = self.state;
        let winner = state
            .leader()
            .or_else(|| self.shootout.as_ref().map(|s| s.winner));
        let team_ref = |team: &Team| TeamRef {
            id: team.id.clone(),
            name: team.name.clone(),
            abbreviation: team.abbreviation.clone(),
        };

        let mut result = GameResult {
            schema_version: RESULT_SCHEMA_VERSION,
            home: team_ref(self.home.team),
            away: team_ref(self.away.team),
            home_score: state.home_score,
            away_score: state.away_score,
            winner,
            quarters_played: state.quarter,
            overtime_quarters: state.overtime_quarters,
            seed: self.seed,
            seed_mode,
            rules: self.rules.clone(),
            environment: self.env,
            final_snapshot: FinalSnapshot {
                quarter: state.quarter,
                clock_sec: state.clock_sec,
                possession: state.possession,
                yardline: state.yardline,
                down: state.down,
                distance: state.distance,
                total_plays: state.play_id,
            },
            home_stats: TeamStats::default(),
            away_stats: TeamStats::default(),
            player_stats: BTreeMap::new(),
            drives: state.drives,
            plays: state.plays,
            events: state.events,
            shootout: self.shootout,
        };
        StatsCalculator::new().finalize(&mut result);
        result
    }
}

pub(crate) fn coin_flip(rng: &mut SimRng) -> Side {
    if rng.chance(0.5) {
        Side::Home
    } else {
        Side::Away
    }
}
