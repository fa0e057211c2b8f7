//! Game logs: plays, drives and discrete events.

use super::play::{PlayCall, PlayOutcome};
use super::side::Side;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One snap, with the state before it and the flags it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayLogEntry {
    pub play_id: u32,
    pub drive_id: u32,
    pub offense: Side,
    pub quarter: u32,
    /// Clock at the snap.
    pub clock_sec: u32,
    pub down: u8,
    pub distance: u32,
    pub yardline: u32,
    pub call: PlayCall,
    pub outcome: PlayOutcome,
    /// Net offense-relative yards including penalties.
    pub yards_gained: i32,
    pub first_down: bool,
    pub touchdown: bool,
    pub safety: bool,
    pub turnover: bool,
    pub end_of_drive: bool,
    pub home_score: u32,
    pub away_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DriveResult {
    Touchdown,
    FieldGoal,
    MissedFieldGoal,
    Punt,
    Interception,
    FumbleLost,
    TurnoverOnDowns,
    Safety,
    EndOfQuarter,
    EndOfHalf,
    EndOfGame,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DriveSummary {
    pub drive_id: u32,
    pub offense: Side,
    pub result: DriveResult,
    pub plays: u32,
    pub net_yards: i32,
    pub duration_sec: u32,
    pub start_quarter: u32,
    pub start_clock_sec: u32,
    pub start_yardline: u32,
    pub end_yardline: u32,
    /// (home, away) when the drive began.
    pub start_score: (u32, u32),
    pub end_score: (u32, u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    CoinToss,
    QuarterStart,
    QuarterEnd,
    Halftime,
    TwoMinuteWarning,
    OvertimeStart,
    Score,
    Turnover,
    Penalty,
    Shootout,
    GameEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GameEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub quarter: u32,
    pub clock_sec: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_id: Option<u32>,
    pub detail: String,
    pub home_score: u32,
    pub away_score: u32,
}
