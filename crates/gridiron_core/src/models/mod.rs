pub mod events;
pub mod game_result;
pub mod latent;
pub mod play;
pub mod player;
pub mod side;
pub mod team;
pub mod units;

pub use events::{DriveResult, DriveSummary, EventKind, GameEvent, PlayLogEntry};
pub use game_result::{
    DefenseLine, FinalSnapshot, GameResult, KickingLine, PassingLine, PlayerGameStats,
    ReceivingLine, RushingLine, SeedMode, ShootoutKick, ShootoutResult, TeamRef, TeamStats,
    RESULT_SCHEMA_VERSION,
};
pub use latent::{LatentGroup, LatentProfile};
pub use play::{
    FieldGoalResult, Foul, Fumble, Offender, PassConcept, PassOutcome, PassResult, PenaltyCall,
    PlayCall, PlayOutcome, PlayResult, PuntResult, RunDirection, RunResult, Situation,
    TARGET_DEPTH_RANGE,
};
pub use player::{Player, PlayerId, Position, SideOfBall};
pub use side::Side;
pub use team::{DepthChart, Team};
pub use units::{DefenseUnit, OffenseUnit, SpecialTeamsUnit, TeamUnits};
