//! Game State Machine
//!
//! The single mutable aggregate for one game. Owned by the game engine and
//! mutated only through the transition functions in this module tree.
//!
//! ```text
//! Regulation(1..=num_quarters) ──► Overtime(1..=max) ──► Final
//!            │                                          ▲
//!            └──────────────── not tied ────────────────┘
//! ```

use crate::engine::config::RuleConfig;
use crate::models::{
    DriveResult, DriveSummary, EventKind, GameEvent, PlayLogEntry, Side, Situation,
};

/// Yard line for every fresh possession after a score or at a half start.
pub const DRIVE_START_YARDLINE: u32 = 25;
/// Yard line the scoring team takes over at after a safety.
pub const SAFETY_FREE_KICK_YARDLINE: u32 = 35;
/// Distance reset on every first down.
pub const FIRST_DOWN_DISTANCE: u32 = 10;
/// Two-minute offense threshold.
pub const TWO_MINUTES_SEC: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Regulation { quarter: u32 },
    /// `period` counts overtime quarters from 1.
    Overtime { period: u32 },
    Final,
}

impl GamePhase {
    pub fn is_final(self) -> bool {
        self == GamePhase::Final
    }

    pub fn is_overtime(self) -> bool {
        matches!(self, GamePhase::Overtime { .. })
    }
}

/// Counters for the drive in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveTracker {
    pub offense: Side,
    pub start_quarter: u32,
    pub start_clock_sec: u32,
    pub start_yardline: u32,
    pub start_score: (u32, u32),
    pub plays: u32,
    pub net_yards: i32,
    pub elapsed_sec: u32,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    /// Running quarter number; overtime continues past `num_quarters`.
    pub quarter: u32,
    pub clock_sec: u32,
    pub home_score: u32,
    pub away_score: u32,
    pub possession: Side,
    /// Offense-relative, 1..=99 between plays.
    pub yardline: u32,
    pub down: u8,
    pub distance: u32,
    pub drive_id: u32,
    pub play_id: u32,
    /// `None` between a drive's close and the next one's start.
    pub drive: Option<DriveTracker>,
    pub opening_receiver: Side,
    pub overtime_quarters: u32,
    pub drives: Vec<DriveSummary>,
    pub plays: Vec<PlayLogEntry>,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Kickoff state: quarter 1, full clock, `receiver` at its own 25.
    pub fn new(rules: &RuleConfig, receiver: Side) -> Self {
        let mut state = Self {
            phase: GamePhase::Regulation { quarter: 1 },
            quarter: 1,
            clock_sec: rules.quarter_length_sec,
            home_score: 0,
            away_score: 0,
            possession: receiver,
            yardline: DRIVE_START_YARDLINE,
            down: 1,
            distance: FIRST_DOWN_DISTANCE,
            drive_id: 0,
            play_id: 0,
            drive: None,
            opening_receiver: receiver,
            overtime_quarters: 0,
            drives: Vec::new(),
            plays: Vec::new(),
            events: Vec::new(),
        };
        state.start_drive(receiver, DRIVE_START_YARDLINE);
        state
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_score,
            Side::Away => self.away_score,
        }
    }

    pub fn add_score(&mut self, side: Side, points: u32) {
        match side {
            Side::Home => self.home_score += points,
            Side::Away => self.away_score += points,
        }
    }

    /// `side`'s score minus the opponent's.
    pub fn score_diff(&self, side: Side) -> i32 {
        self.score(side) as i32 - self.score(side.other()) as i32
    }

    pub fn is_tied(&self) -> bool {
        self.home_score == self.away_score
    }

    pub fn leader(&self) -> Option<Side> {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Quarter closes a half, regulation, or is an overtime period.
    pub fn in_closing_quarter(&self, rules: &RuleConfig) -> bool {
        self.phase.is_overtime() || rules.is_half_end(self.quarter)
    }

    /// Situation from the offense's point of view.
    pub fn situation(&self, rules: &RuleConfig) -> Situation {
        let score_diff = self.score_diff(self.possession);
        Situation {
            down: self.down,
            distance: self.distance,
            yardline: self.yardline,
            quarter: self.quarter,
            clock_sec: self.clock_sec,
            score_diff,
            hurry_up: score_diff < 0
                && self.clock_sec <= TWO_MINUTES_SEC
                && self.in_closing_quarter(rules),
        }
    }

    /// Open a new drive for `offense`: 1st and 10 at `yardline`.
    pub fn start_drive(&mut self, offense: Side, yardline: u32) {
        self.possession = offense;
        self.yardline = yardline.clamp(1, 99);
        self.down = 1;
        self.distance = FIRST_DOWN_DISTANCE;
        self.open_drive();
    }

    /// Open a new drive that keeps the current offense, spot, down and
    /// distance (a drive cut by a quarter break inside a half).
    pub fn continue_drive(&mut self) {
        self.open_drive();
    }

    fn open_drive(&mut self) {
        self.drive_id += 1;
        self.drive = Some(DriveTracker {
            offense: self.possession,
            start_quarter: self.quarter,
            start_clock_sec: self.clock_sec,
            start_yardline: self.yardline,
            start_score: (self.home_score, self.away_score),
            plays: 0,
            net_yards: 0,
            elapsed_sec: 0,
        });
    }

    /// Finalize the open drive, if any, and append its summary.
    pub fn close_drive(&mut self, result: DriveResult, end_yardline: u32) {
        let Some(drive) = self.drive.take() else {
            return;
        };
        self.drives.push(DriveSummary {
            drive_id: self.drive_id,
            offense: drive.offense,
            result,
            plays: drive.plays,
            net_yards: drive.net_yards,
            duration_sec: drive.elapsed_sec,
            start_quarter: drive.start_quarter,
            start_clock_sec: drive.start_clock_sec,
            start_yardline: drive.start_yardline,
            end_yardline,
            start_score: drive.start_score,
            end_score: (self.home_score, self.away_score),
        });
    }

    pub fn push_event(
        &mut self,
        kind: EventKind,
        side: Option<Side>,
        play_id: Option<u32>,
        detail: impl Into<String>,
    ) {
        self.events.push(GameEvent {
            kind,
            quarter: self.quarter,
            clock_sec: self.clock_sec,
            side,
            play_id,
            detail: detail.into(),
            home_score: self.home_score,
            away_score: self.away_score,
        });
    }
}
