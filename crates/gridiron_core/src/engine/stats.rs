//! Result Aggregator
//!
//! Folds the finished play and drive logs into team and player statistics.
//! Runs once, after the game is final.

use crate::models::{
    DriveSummary, GameResult, Offender, PassOutcome, PlayLogEntry, PlayResult, PlayerGameStats,
    PlayerId, Side, TeamStats,
};
use std::collections::BTreeMap;

pub struct StatsCalculator;

impl StatsCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Fill team and player stats from the logs already on `result`.
    pub fn finalize(&self, result: &mut GameResult) {
        result.home_stats = self.team_stats(&result.plays, &result.drives, Side::Home);
        result.away_stats = self.team_stats(&result.plays, &result.drives, Side::Away);
        result.player_stats = self.player_stats(&result.plays);
    }

    pub fn team_stats(&self, plays: &[PlayLogEntry], drives: &[DriveSummary], side: Side) -> TeamStats {
        let mut stats = TeamStats::default();

        for entry in plays {
            if let Some(penalty) = entry.outcome.penalty.as_ref() {
                let flagged = match penalty.against {
                    Offender::Offense => entry.offense,
                    Offender::Defense => entry.offense.other(),
                };
                if flagged == side {
                    stats.penalties += 1;
                    stats.penalty_yards += penalty.yards;
                }
            }
            if entry.offense != side {
                continue;
            }

            let scrimmage = matches!(entry.outcome.result, PlayResult::Run(_) | PlayResult::Pass(_));
            if scrimmage {
                stats.plays += 1;
                let converted = entry.first_down || entry.touchdown;
                match entry.down {
                    3 => {
                        stats.third_down_attempts += 1;
                        stats.third_down_conversions += converted as u32;
                    }
                    4 => {
                        stats.fourth_down_attempts += 1;
                        stats.fourth_down_conversions += converted as u32;
                    }
                    _ => {}
                }
            }
            if entry.first_down && scrimmage {
                stats.first_downs += 1;
            }
            if entry.touchdown {
                stats.touchdowns += 1;
            }

            match &entry.outcome.result {
                PlayResult::Run(run) => {
                    stats.rush_attempts += 1;
                    stats.rush_yards += run.yards;
                }
                PlayResult::Pass(pass) => match &pass.outcome {
                    PassOutcome::Complete { air_yards, yac, .. } => {
                        stats.pass_attempts += 1;
                        stats.completions += 1;
                        stats.pass_yards += air_yards + yac;
                    }
                    PassOutcome::Incomplete { .. } => stats.pass_attempts += 1,
                    PassOutcome::Interception { .. } => {
                        stats.pass_attempts += 1;
                        stats.interceptions_thrown += 1;
                    }
                    PassOutcome::Sack { yards_lost, .. } => {
                        stats.sacks_taken += 1;
                        stats.sack_yards_lost += yards_lost;
                        stats.pass_yards -= yards_lost;
                    }
                },
                PlayResult::Punt(punt) => {
                    stats.punts += 1;
                    stats.punt_yards += punt.gross_yards;
                }
                PlayResult::FieldGoal(kick) => {
                    stats.field_goal_attempts += 1;
                    stats.field_goals_made += kick.made as u32;
                }
                PlayResult::NoPlay => {}
            }

            if let Some(fumble) = entry.outcome.fumble() {
                stats.fumbles += 1;
                stats.fumbles_lost += fumble.lost as u32;
            }
        }

        stats.turnovers = stats.interceptions_thrown + stats.fumbles_lost;
        stats.total_yards = stats.rush_yards + stats.pass_yards;
        stats.time_of_possession_sec = drives
            .iter()
            .filter(|d| d.offense == side)
            .map(|d| d.duration_sec)
            .sum();
        stats.yards_per_play = if stats.plays > 0 {
            stats.total_yards as f64 / stats.plays as f64
        } else {
            0.0
        };
        stats
    }

    pub fn player_stats(&self, plays: &[PlayLogEntry]) -> BTreeMap<PlayerId, PlayerGameStats> {
        let mut lines: BTreeMap<PlayerId, PlayerGameStats> = BTreeMap::new();

        for entry in plays {
            let offense = entry.offense;
            let defense = offense.other();

            if let Some(penalty) = entry.outcome.penalty.as_ref() {
                let flagged = match penalty.against {
                    Offender::Offense => offense,
                    Offender::Defense => defense,
                };
                if let Some(p) = line(&mut lines, &penalty.player, flagged) {
                    p.penalties += 1;
                }
            }

            if let Some(fumble) = entry.outcome.fumble() {
                if let Some(p) = line(&mut lines, &fumble.forced_by, defense) {
                    p.defense.forced_fumbles += 1;
                }
            }

            match &entry.outcome.result {
                PlayResult::Run(run) => {
                    let lost = run.fumble.as_ref().map(|f| f.lost).unwrap_or(false);
                    if let Some(p) = line(&mut lines, &run.rusher, offense) {
                        let r = &mut p.rushing;
                        r.attempts += 1;
                        r.yards += run.yards;
                        r.long = r.long.max(run.yards);
                        r.touchdowns += entry.touchdown as u32;
                        r.fumbles_lost += lost as u32;
                    }
                    if let Some(p) = line(&mut lines, &run.tackler, defense) {
                        p.defense.tackles += 1;
                    }
                }
                PlayResult::Pass(pass) => match &pass.outcome {
                    PassOutcome::Complete {
                        receiver,
                        air_yards,
                        yac,
                        tackler,
                    } => {
                        let yards = air_yards + yac;
                        if let Some(p) = line(&mut lines, &pass.passer, offense) {
                            p.passing.attempts += 1;
                            p.passing.completions += 1;
                            p.passing.yards += yards;
                            p.passing.touchdowns += entry.touchdown as u32;
                        }
                        if let Some(p) = line(&mut lines, receiver, offense) {
                            let r = &mut p.receiving;
                            r.targets += 1;
                            r.receptions += 1;
                            r.yards += yards;
                            r.yac += yac;
                            r.long = r.long.max(yards);
                            r.touchdowns += entry.touchdown as u32;
                        }
                        if let Some(p) = line(&mut lines, tackler, defense) {
                            p.defense.tackles += 1;
                        }
                    }
                    PassOutcome::Incomplete { target, defender } => {
                        if let Some(p) = line(&mut lines, &pass.passer, offense) {
                            p.passing.attempts += 1;
                        }
                        if let Some(p) = line(&mut lines, target, offense) {
                            p.receiving.targets += 1;
                        }
                        if let Some(p) = line(&mut lines, defender, defense) {
                            p.defense.passes_defended += 1;
                        }
                    }
                    PassOutcome::Interception {
                        target,
                        interceptor,
                        ..
                    } => {
                        if let Some(p) = line(&mut lines, &pass.passer, offense) {
                            p.passing.attempts += 1;
                            p.passing.interceptions += 1;
                        }
                        if let Some(p) = line(&mut lines, target, offense) {
                            p.receiving.targets += 1;
                        }
                        if let Some(p) = line(&mut lines, interceptor, defense) {
                            p.defense.interceptions += 1;
                            p.defense.passes_defended += 1;
                        }
                    }
                    PassOutcome::Sack { sacker, .. } => {
                        if let Some(p) = line(&mut lines, &pass.passer, offense) {
                            p.passing.sacks += 1;
                        }
                        if let Some(p) = line(&mut lines, sacker, defense) {
                            p.defense.sacks += 1;
                            p.defense.tackles += 1;
                        }
                    }
                },
                PlayResult::Punt(punt) => {
                    if let Some(p) = line(&mut lines, &punt.punter, offense) {
                        p.kicking.punts += 1;
                        p.kicking.punt_yards += punt.gross_yards;
                    }
                }
                PlayResult::FieldGoal(kick) => {
                    if let Some(p) = line(&mut lines, &kick.kicker, offense) {
                        let k = &mut p.kicking;
                        k.field_goal_attempts += 1;
                        if kick.made {
                            k.field_goals_made += 1;
                            k.long = k.long.max(kick.distance);
                        }
                    }
                }
                PlayResult::NoPlay => {}
            }
        }
        lines
    }
}

/// The stat line for `id`, opened on first touch.
fn line<'m>(
    lines: &'m mut BTreeMap<PlayerId, PlayerGameStats>,
    id: &Option<PlayerId>,
    side: Side,
) -> Option<&'m mut PlayerGameStats> {
    let id = id.as_ref()?;
    Some(
        lines
            .entry(id.clone())
            .or_insert_with(|| PlayerGameStats::new(side)),
    )
}

impl Default for StatsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayCall, PlayOutcome, RunDirection, RunResult};

    fn run_entry(play_id: u32, offense: Side, down: u8, yards: i32, first_down: bool) -> PlayLogEntry {
        PlayLogEntry {
            play_id,
            drive_id: 1,
            offense,
            quarter: 1,
            clock_sec: 800,
            down,
            distance: 3,
            yardline: 40,
            call: PlayCall::run(RunDirection::Inside),
            outcome: PlayOutcome {
                result: PlayResult::Run(RunResult {
                    direction: RunDirection::Inside,
                    rusher: Some("rb1".into()),
                    tackler: Some("lb1".into()),
                    yards,
                    fumble: None,
                }),
                elapsed_sec: 30,
                penalty: None,
            },
            yards_gained: yards,
            first_down,
            touchdown: false,
            safety: false,
            turnover: false,
            end_of_drive: false,
            home_score: 0,
            away_score: 0,
        }
    }

    #[test]
    fn test_team_stats_fold() {
        let plays = vec![
            run_entry(1, Side::Home, 1, 4, false),
            run_entry(2, Side::Home, 3, 8, true),
            run_entry(3, Side::Away, 1, -2, false),
        ];
        let calc = StatsCalculator::new();
        let home = calc.team_stats(&plays, &[], Side::Home);
        assert_eq!(home.plays, 2);
        assert_eq!(home.rush_yards, 12);
        assert_eq!(home.total_yards, 12);
        assert_eq!(home.third_down_attempts, 1);
        assert_eq!(home.third_down_conversions, 1);
        assert_eq!(home.first_downs, 1);
        assert!((home.yards_per_play - 6.0).abs() < 1e-9);

        let away = calc.team_stats(&plays, &[], Side::Away);
        assert_eq!(away.rush_yards, -2);
    }

    #[test]
    fn test_player_lines_follow_participants() {
        let plays = vec![run_entry(1, Side::Home, 1, 7, false), run_entry(2, Side::Home, 2, 12, true)];
        let lines = StatsCalculator::new().player_stats(&plays);
        let rb = &lines["rb1"];
        assert_eq!(rb.team, Side::Home);
        assert_eq!(rb.rushing.attempts, 2);
        assert_eq!(rb.rushing.yards, 19);
        assert_eq!(rb.rushing.long, 12);
        assert_eq!(lines["lb1"].defense.tackles, 2);
        assert_eq!(lines["lb1"].team, Side::Away);
    }
}
