//! Play-level types: the situation handed to the micro-simulator, the call,
//! and the closed outcome union it returns.
//!
//! All yardages are offense-relative: positive moves the ball toward the
//! opponent's goal line. Yard lines run 0 (own goal) to 100 (opponent goal).

use super::player::PlayerId;
use crate::error::SimError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Valid pass target depth range, in yards past the line of scrimmage.
pub const TARGET_DEPTH_RANGE: (f64, f64) = (-5.0, 60.0);

/// Down, distance, field position, clock and score as seen by the offense.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Situation {
    pub down: u8,
    pub distance: u32,
    /// Offense-relative, 1..=99.
    pub yardline: u32,
    pub quarter: u32,
    pub clock_sec: u32,
    /// Offense score minus defense score.
    pub score_diff: i32,
    /// Offense is running its two-minute offense.
    pub hurry_up: bool,
}

impl Default for Situation {
    fn default() -> Self {
        Self {
            down: 1,
            distance: 10,
            yardline: 25,
            quarter: 1,
            clock_sec: 900,
            score_diff: 0,
            hurry_up: false,
        }
    }
}

impl Situation {
    pub fn yards_to_goal(&self) -> u32 {
        100u32.saturating_sub(self.yardline)
    }

    /// Field-goal distance: yards to goal + 17 (end zone + snap).
    pub fn field_goal_distance(&self) -> u32 {
        self.yards_to_goal() + 17
    }
}

// ============================================================================
// Play calls
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RunDirection {
    #[default]
    Inside,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PassConcept {
    Screen,
    Short,
    Intermediate,
    Deep,
    PlayAction,
}

impl PassConcept {
    /// Typical target depth for the concept.
    pub fn default_depth(self) -> f64 {
        match self {
            PassConcept::Screen => -2.0,
            PassConcept::Short => 6.0,
            PassConcept::Intermediate => 13.0,
            PassConcept::Deep => 28.0,
            PassConcept::PlayAction => 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayCall {
    Run {
        #[serde(default)]
        direction: RunDirection,
    },
    Pass {
        concept: PassConcept,
        target_depth: f64,
    },
    Punt,
    FieldGoal,
}

impl PlayCall {
    pub fn pass(concept: PassConcept) -> Self {
        PlayCall::Pass {
            concept,
            target_depth: concept.default_depth(),
        }
    }

    pub fn run(direction: RunDirection) -> Self {
        PlayCall::Run { direction }
    }

    pub fn is_scrimmage(&self) -> bool {
        matches!(self, PlayCall::Run { .. } | PlayCall::Pass { .. })
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if let PlayCall::Pass { target_depth, .. } = self {
            let (lo, hi) = TARGET_DEPTH_RANGE;
            if !target_depth.is_finite() || *target_depth < lo || *target_depth > hi {
                return Err(SimError::InvalidPlayCall(format!(
                    "pass target depth {} outside [{}, {}]",
                    target_depth, lo, hi
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for PlayCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayCall::Run { direction: RunDirection::Inside } => write!(f, "run_inside"),
            PlayCall::Run { direction: RunDirection::Outside } => write!(f, "run_outside"),
            PlayCall::Pass { concept, target_depth } => {
                let name = match concept {
                    PassConcept::Screen => "screen",
                    PassConcept::Short => "pass_short",
                    PassConcept::Intermediate => "pass_intermediate",
                    PassConcept::Deep => "pass_deep",
                    PassConcept::PlayAction => "play_action",
                };
                write!(f, "{}:{}", name, target_depth)
            }
            PlayCall::Punt => write!(f, "punt"),
            PlayCall::FieldGoal => write!(f, "field_goal"),
        }
    }
}

/// Parses `run`, `run_outside`, `pass`, `pass_deep`, `screen`, `play_action`,
/// `punt`, `field_goal` and friends. Pass calls accept an explicit depth
/// suffix: `pass_deep:35`.
impl FromStr for PlayCall {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_lowercase();
        let (name, depth) = match raw.split_once(':') {
            Some((name, depth)) => (name.trim().to_string(), Some(depth.trim().to_string())),
            None => (raw.clone(), None),
        };

        let call = match name.as_str() {
            "run" | "run_inside" | "inside_run" | "dive" => PlayCall::run(RunDirection::Inside),
            "run_outside" | "outside_run" | "sweep" | "toss" => {
                PlayCall::run(RunDirection::Outside)
            }
            "pass" | "pass_short" | "short" => PlayCall::pass(PassConcept::Short),
            "pass_intermediate" | "intermediate" => PlayCall::pass(PassConcept::Intermediate),
            "pass_deep" | "deep" | "bomb" => PlayCall::pass(PassConcept::Deep),
            "screen" | "pass_screen" => PlayCall::pass(PassConcept::Screen),
            "play_action" | "pa" | "playaction" => PlayCall::pass(PassConcept::PlayAction),
            "punt" => PlayCall::Punt,
            "field_goal" | "fg" | "fieldgoal" => PlayCall::FieldGoal,
            "" => return Err(SimError::InvalidPlayCall("empty play call".to_string())),
            other => {
                return Err(SimError::InvalidPlayCall(format!(
                    "unknown play call '{}'",
                    other
                )))
            }
        };

        let call = match (call, depth) {
            (call, None) => call,
            (PlayCall::Pass { concept, .. }, Some(depth)) => {
                let target_depth = depth.parse::<f64>().map_err(|_| {
                    SimError::InvalidPlayCall(format!("bad target depth '{}'", depth))
                })?;
                PlayCall::Pass {
                    concept,
                    target_depth,
                }
            }
            (_, Some(_)) => {
                return Err(SimError::InvalidPlayCall(format!(
                    "'{}' does not take a target depth",
                    name
                )))
            }
        };
        call.validate()?;
        Ok(call)
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// One resolved play. Exactly one `result` variant; an optional flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayOutcome {
    pub result: PlayResult,
    pub elapsed_sec: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub penalty: Option<PenaltyCall>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayResult {
    Run(RunResult),
    Pass(PassResult),
    Punt(PuntResult),
    FieldGoal(FieldGoalResult),
    /// Pre-snap foul: no snap, no yardage beyond the penalty.
    NoPlay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunResult {
    pub direction: RunDirection,
    pub rusher: Option<PlayerId>,
    pub tackler: Option<PlayerId>,
    /// Yards at the end of the run, before any fumble swing.
    pub yards: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fumble: Option<Fumble>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PassResult {
    pub concept: PassConcept,
    pub target_depth: f64,
    pub passer: Option<PlayerId>,
    /// Pressure intensity in [0, 1].
    pub pressure: f64,
    pub under_pressure: bool,
    pub outcome: PassOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fumble: Option<Fumble>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PassOutcome {
    Complete {
        receiver: Option<PlayerId>,
        air_yards: i32,
        yac: i32,
        tackler: Option<PlayerId>,
    },
    Incomplete {
        target: Option<PlayerId>,
        defender: Option<PlayerId>,
    },
    Interception {
        target: Option<PlayerId>,
        interceptor: Option<PlayerId>,
        air_yards: i32,
        return_yards: i32,
    },
    Sack {
        sacker: Option<PlayerId>,
        yards_lost: i32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PuntResult {
    pub punter: Option<PlayerId>,
    pub gross_yards: i32,
    pub return_yards: i32,
    pub touchback: bool,
}

impl PuntResult {
    pub fn net_yards(&self) -> i32 {
        self.gross_yards - self.return_yards
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldGoalResult {
    pub kicker: Option<PlayerId>,
    pub distance: u32,
    pub made: bool,
}

/// A fumble by the ball carrier. `swing_yards` moves the ball back toward the
/// offense's goal: the defensive return when lost, the scramble when retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Fumble {
    pub carrier: Option<PlayerId>,
    pub forced_by: Option<PlayerId>,
    pub lost: bool,
    pub swing_yards: i32,
}

// ============================================================================
// Penalties
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Offender {
    Offense,
    Defense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Foul {
    FalseStart,
    DelayOfGame,
    Offside,
    Encroachment,
    NeutralZoneInfraction,
    OffensiveHolding,
    OffensivePassInterference,
    DefensiveHolding,
    DefensivePassInterference,
    RoughingThePasser,
    FaceMask,
    UnnecessaryRoughness,
}

impl Foul {
    pub const ALL: [Foul; 12] = [
        Foul::FalseStart,
        Foul::DelayOfGame,
        Foul::Offside,
        Foul::Encroachment,
        Foul::NeutralZoneInfraction,
        Foul::OffensiveHolding,
        Foul::OffensivePassInterference,
        Foul::DefensiveHolding,
        Foul::DefensivePassInterference,
        Foul::RoughingThePasser,
        Foul::FaceMask,
        Foul::UnnecessaryRoughness,
    ];

    pub fn offender(self) -> Offender {
        match self {
            Foul::FalseStart
            | Foul::DelayOfGame
            | Foul::OffensiveHolding
            | Foul::OffensivePassInterference => Offender::Offense,
            _ => Offender::Defense,
        }
    }

    pub fn is_pre_snap(self) -> bool {
        matches!(
            self,
            Foul::FalseStart
                | Foul::DelayOfGame
                | Foul::Offside
                | Foul::Encroachment
                | Foul::NeutralZoneInfraction
        )
    }

    /// Only possible on pass plays.
    pub fn pass_only(self) -> bool {
        matches!(
            self,
            Foul::OffensivePassInterference
                | Foul::DefensivePassInterference
                | Foul::RoughingThePasser
        )
    }

    pub fn yards(self) -> u32 {
        match self {
            Foul::FalseStart
            | Foul::DelayOfGame
            | Foul::Offside
            | Foul::Encroachment
            | Foul::NeutralZoneInfraction
            | Foul::DefensiveHolding => 5,
            Foul::OffensiveHolding | Foul::OffensivePassInterference => 10,
            Foul::DefensivePassInterference
            | Foul::RoughingThePasser
            | Foul::FaceMask
            | Foul::UnnecessaryRoughness => 15,
        }
    }

    pub fn automatic_first_down(self) -> bool {
        matches!(
            self,
            Foul::DefensiveHolding
                | Foul::DefensivePassInterference
                | Foul::RoughingThePasser
                | Foul::FaceMask
                | Foul::UnnecessaryRoughness
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PenaltyCall {
    pub foul: Foul,
    pub against: Offender,
    pub yards: u32,
    pub automatic_first_down: bool,
    pub pre_snap: bool,
    pub player: Option<PlayerId>,
}

impl PenaltyCall {
    pub fn new(foul: Foul, player: Option<PlayerId>) -> Self {
        Self {
            foul,
            against: foul.offender(),
            yards: foul.yards(),
            automatic_first_down: foul.automatic_first_down(),
            pre_snap: foul.is_pre_snap(),
            player,
        }
    }

    /// Offense-relative yardage: negative when the offense fouled.
    pub fn signed_yards(&self) -> i32 {
        match self.against {
            Offender::Offense => -(self.yards as i32),
            Offender::Defense => self.yards as i32,
        }
    }
}

// ============================================================================
// Outcome queries
// ============================================================================

impl PlayOutcome {
    pub fn no_play(penalty: PenaltyCall, elapsed_sec: u32) -> Self {
        Self {
            result: PlayResult::NoPlay,
            elapsed_sec,
            penalty: Some(penalty),
        }
    }

    pub fn fumble(&self) -> Option<&Fumble> {
        match &self.result {
            PlayResult::Run(run) => run.fumble.as_ref(),
            PlayResult::Pass(pass) => pass.fumble.as_ref(),
            _ => None,
        }
    }

    pub fn is_interception(&self) -> bool {
        matches!(
            &self.result,
            PlayResult::Pass(PassResult {
                outcome: PassOutcome::Interception { .. },
                ..
            })
        )
    }

    pub fn is_fumble_lost(&self) -> bool {
        self.fumble().map(|f| f.lost).unwrap_or(false)
    }

    pub fn is_turnover(&self) -> bool {
        self.is_interception() || self.is_fumble_lost()
    }

    pub fn is_sack(&self) -> bool {
        matches!(
            &self.result,
            PlayResult::Pass(PassResult {
                outcome: PassOutcome::Sack { .. },
                ..
            })
        )
    }

    pub fn is_pre_snap_penalty(&self) -> bool {
        matches!(self.result, PlayResult::NoPlay)
    }

    /// Offense-relative yards from the snap to where the offense still holds
    /// the ball, penalties excluded. For a turnover this is where the
    /// defense ends up with it.
    pub fn scrimmage_yards(&self) -> i32 {
        let swing = self.fumble().map(|f| f.swing_yards).unwrap_or(0);
        match &self.result {
            PlayResult::Run(run) => run.yards - swing,
            PlayResult::Pass(pass) => match &pass.outcome {
                PassOutcome::Complete { air_yards, yac, .. } => air_yards + yac - swing,
                PassOutcome::Sack { yards_lost, .. } => -yards_lost - swing,
                PassOutcome::Interception {
                    air_yards,
                    return_yards,
                    ..
                } => air_yards - return_yards,
                PassOutcome::Incomplete { .. } => 0,
            },
            PlayResult::Punt(_) | PlayResult::FieldGoal(_) | PlayResult::NoPlay => 0,
        }
    }

    pub fn penalty_yards(&self) -> i32 {
        self.penalty.as_ref().map(PenaltyCall::signed_yards).unwrap_or(0)
    }

    pub fn is_rush(&self) -> bool {
        matches!(self.result, PlayResult::Run(_))
    }

    /// Pass attempt for stats: any dropback that was not a sack.
    pub fn is_pass_attempt(&self) -> bool {
        matches!(&self.result, PlayResult::Pass(p) if !matches!(p.outcome, PassOutcome::Sack { .. }))
    }

    pub fn is_completion(&self) -> bool {
        matches!(
            &self.result,
            PlayResult::Pass(PassResult {
                outcome: PassOutcome::Complete { .. },
                ..
            })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_play_calls() {
        assert_eq!("run".parse::<PlayCall>().unwrap(), PlayCall::run(RunDirection::Inside));
        assert_eq!(
            "RUN_OUTSIDE".parse::<PlayCall>().unwrap(),
            PlayCall::run(RunDirection::Outside)
        );
        assert_eq!("fg".parse::<PlayCall>().unwrap(), PlayCall::FieldGoal);
        assert_eq!(
            "pass_deep:35".parse::<PlayCall>().unwrap(),
            PlayCall::Pass {
                concept: PassConcept::Deep,
                target_depth: 35.0
            }
        );
        assert_eq!(
            "screen".parse::<PlayCall>().unwrap(),
            PlayCall::pass(PassConcept::Screen)
        );
    }

    #[test]
    fn test_invalid_play_calls() {
        for bad in ["", "  ", "hail_mary_lateral", "pass:abc", "pass:NaN", "pass_deep:75", "punt:10"] {
            let err = bad.parse::<PlayCall>().unwrap_err();
            assert!(matches!(err, SimError::InvalidPlayCall(_)), "{:?}", bad);
        }
        let call = PlayCall::Pass {
            concept: PassConcept::Short,
            target_depth: f64::INFINITY,
        };
        assert!(call.validate().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for call in [
            PlayCall::run(RunDirection::Outside),
            PlayCall::pass(PassConcept::PlayAction),
            PlayCall::Punt,
        ] {
            assert_eq!(call.to_string().parse::<PlayCall>().unwrap(), call);
        }
    }

    #[test]
    fn test_foul_table() {
        for foul in Foul::ALL {
            let call = PenaltyCall::new(foul, None);
            assert!(call.yards == 5 || call.yards == 10 || call.yards == 15);
            if call.automatic_first_down {
                assert_eq!(call.against, Offender::Defense);
            }
            if call.pre_snap {
                assert_eq!(call.yards, 5);
            }
        }
        assert_eq!(PenaltyCall::new(Foul::OffensiveHolding, None).signed_yards(), -10);
        assert_eq!(PenaltyCall::new(Foul::FaceMask, None).signed_yards(), 15);
    }

    #[test]
    fn test_scrimmage_yards() {
        let outcome = PlayOutcome {
            result: PlayResult::Run(RunResult {
                direction: RunDirection::Inside,
                rusher: None,
                tackler: None,
                yards: 7,
                fumble: Some(Fumble {
                    carrier: None,
                    forced_by: None,
                    lost: true,
                    swing_yards: 3,
                }),
            }),
            elapsed_sec: 30,
            penalty: None,
        };
        assert_eq!(outcome.scrimmage_yards(), 4);
        assert!(outcome.is_turnover());
        assert!(outcome.is_rush());
        assert!(!outcome.is_pass_attempt());
    }

    #[test]
    fn test_situation_helpers() {
        let sit = Situation {
            yardline: 70,
            ..Situation::default()
        };
        assert_eq!(sit.yards_to_goal(), 30);
        assert_eq!(sit.field_goal_distance(), 47);
    }
}
