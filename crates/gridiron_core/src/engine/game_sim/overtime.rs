//! Quarter breaks, overtime and the shootout tiebreak.
//!
//! Regulation ends tied → overtime quarters (half length, coin toss each)
//! up to `max_overtime_quarters` → still tied: a tie if the rules allow one,
//! otherwise a field-goal shootout that picks a winner without touching the
//! score.

use super::game_state::{GamePhase, DRIVE_START_YARDLINE};
use super::transitions::DriveEnd;
use super::{coin_flip, GameEngine};
use crate::engine::play_sim::kicking::kick_from;
use crate::models::{DriveResult, EventKind, ShootoutKick, ShootoutResult, Side};
use std::cmp::Ordering;
use tracing::debug;

impl GameEngine<'_> {
    /// The clock hit zero. `pending` is the drive end of the final play, if
    /// that play ended a drive.
    pub(super) fn end_quarter(&mut self, pending: Option<DriveEnd>) {
        let quarter = self.state.quarter;
        self.state.push_event(
            EventKind::QuarterEnd,
            None,
            None,
            format!("end of quarter {}", quarter),
        );

        let phase = self.state.phase;
        match phase {
            GamePhase::Regulation { quarter } if quarter < self.rules.num_quarters => {
                if quarter == self.rules.first_half_end() {
                    self.halftime();
                } else {
                    self.next_regulation_quarter(pending);
                }
            }
            GamePhase::Regulation { .. } => self.end_regulation(),
            GamePhase::Overtime { period } => self.end_overtime_period(period),
            GamePhase::Final => {}
        }
    }

    fn begin_quarter(&mut self, phase: GamePhase, clock_sec: u32) {
        self.state.quarter += 1;
        self.state.clock_sec = clock_sec;
        self.state.phase = phase;
        let quarter = self.state.quarter;
        self.state
            .push_event(EventKind::QuarterStart, None, None, format!("quarter {}", quarter));
    }

    /// A drive still open at a break inside a half carries over.
    fn next_regulation_quarter(&mut self, pending: Option<DriveEnd>) {
        let yardline = self.state.yardline;
        self.state.close_drive(DriveResult::EndOfQuarter, yardline);
        let next = self.state.quarter + 1;
        self.begin_quarter(
            GamePhase::Regulation { quarter: next },
            self.rules.quarter_length_sec,
        );
        match pending {
            Some(end) => self.state.start_drive(end.next_offense, end.next_yardline),
            None => self.state.continue_drive(),
        }
    }

    fn halftime(&mut self) {
        let yardline = self.state.yardline;
        self.state.close_drive(DriveResult::EndOfHalf, yardline);
        self.state.push_event(EventKind::Halftime, None, None, "halftime");
        let next = self.state.quarter + 1;
        self.begin_quarter(
            GamePhase::Regulation { quarter: next },
            self.rules.quarter_length_sec,
        );
        let receiver = self.state.opening_receiver.other();
        self.state.start_drive(receiver, DRIVE_START_YARDLINE);
    }

    fn end_regulation(&mut self) {
        if !self.state.is_tied() {
            self.finish_game();
            return;
        }
        let yardline = self.state.yardline;
        self.state.close_drive(DriveResult::EndOfHalf, yardline);
        if self.rules.max_overtime_quarters > 0 {
            self.start_overtime_period(1);
        } else {
            self.break_tie();
        }
    }

    fn start_overtime_period(&mut self, period: u32) {
        self.state.overtime_quarters = period;
        self.begin_quarter(
            GamePhase::Overtime { period },
            self.rules.overtime_length_sec(),
        );
        self.state.push_event(
            EventKind::OvertimeStart,
            None,
            None,
            format!("overtime {}", period),
        );
        let receiver = coin_flip(&mut self.env_rng);
        self.state.push_event(
            EventKind::CoinToss,
            Some(receiver),
            None,
            format!("{} receives", receiver),
        );
        self.state.start_drive(receiver, DRIVE_START_YARDLINE);
        debug!(period, receiver = %receiver, "overtime");
    }

    fn end_overtime_period(&mut self, period: u32) {
        if !self.state.is_tied() {
            self.finish_game();
            return;
        }
        let yardline = self.state.yardline;
        self.state.close_drive(DriveResult::EndOfQuarter, yardline);
        if period < self.rules.max_overtime_quarters {
            self.start_overtime_period(period + 1);
        } else {
            self.break_tie();
        }
    }

    /// Overtime cap reached, still level.
    fn break_tie(&mut self) {
        if !self.rules.allow_ties {
            let shootout = self.run_shootout();
            self.state.push_event(
                EventKind::Shootout,
                Some(shootout.winner),
                None,
                format!(
                    "shootout {}-{} after {} rounds",
                    shootout.made_home, shootout.made_away, shootout.rounds
                ),
            );
            self.shootout = Some(shootout);
        }
        self.finish_game();
    }

    /// Alternating kicks from a fixed spot; a level score after every round
    /// goes to a coin flip.
    pub(super) fn run_shootout(&mut self) -> ShootoutResult {
        let distance = self.rules.shootout_yards_to_goal + 17;
        let first = coin_flip(&mut self.env_rng);
        let mut kicks = Vec::new();
        let (mut made_home, mut made_away) = (0u32, 0u32);
        let mut rounds = 0;

        for round in 1..=self.rules.shootout_rounds {
            rounds = round;
            for side in [first, first.other()] {
                let ctx = match side {
                    Side::Home => &self.home,
                    Side::Away => &self.away,
                };
                let kick = kick_from(
                    distance,
                    ctx,
                    &self.env,
                    &self.rules.tuning,
                    &mut self.play_rng,
                );
                if kick.made {
                    match side {
                        Side::Home => made_home += 1,
                        Side::Away => made_away += 1,
                    }
                }
                kicks.push(ShootoutKick {
                    round,
                    side,
                    kicker: kick.kicker,
                    made: kick.made,
                });
            }
            if made_home != made_away {
                break;
            }
        }

        let (winner, decided_by_coin_flip) = match made_home.cmp(&made_away) {
            Ordering::Greater => (Side::Home, false),
            Ordering::Less => (Side::Away, false),
            Ordering::Equal => (coin_flip(&mut self.env_rng), true),
        };
        ShootoutResult {
            made_home,
            made_away,
            rounds,
            winner,
            decided_by_coin_flip,
            kicks,
        }
    }

    pub(super) fn finish_game(&mut self) {
        let yardline = self.state.yardline;
        self.state.close_drive(DriveResult::EndOfGame, yardline);
        self.state.phase = GamePhase::Final;
        let detail = format!("final {}-{}", self.state.home_score, self.state.away_score);
        self.state.push_event(EventKind::GameEnd, None, None, detail);
    }
}
