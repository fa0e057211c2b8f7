use super::latent::LatentProfile;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub type PlayerId = String;

/// Player data for the simulation engine.
///
/// # Boundary Contract
/// - Produced by a roster-loading collaborator (see `roster_loader`)
/// - `factors`/`traits` carry raw values as supplied (0-100 or 0-10000
///   scale); normalization happens in the latent deriver
/// - `latent` is derived, never supplied: recomputed by `Team::prepare()`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub team_id: String,
    /// Explicit depth-chart slot (1 = starter). `None` sorts after any explicit slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(default = "default_rating")]
    pub rating_overall: f64,
    #[serde(default = "default_rating")]
    pub rating_pos: f64,
    #[serde(default)]
    pub factors: BTreeMap<String, f64>,
    #[serde(default)]
    pub traits: BTreeMap<String, f64>,
    #[serde(default)]
    pub latent: LatentProfile,
}

fn default_rating() -> f64 {
    50.0
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            team_id: String::new(),
            depth: None,
            rating_overall: default_rating(),
            rating_pos: default_rating(),
            factors: BTreeMap::new(),
            traits: BTreeMap::new(),
            latent: LatentProfile::default(),
        }
    }

    pub fn with_factor(mut self, key: &str, value: f64) -> Self {
        self.factors.insert(key.to_string(), value);
        self
    }

    pub fn with_trait(mut self, key: &str, value: f64) -> Self {
        self.traits.insert(key.to_string(), value);
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_ratings(mut self, overall: f64, pos: f64) -> Self {
        self.rating_overall = overall;
        self.rating_pos = pos;
        self
    }

    pub fn side_of_ball(&self) -> SideOfBall {
        self.position.side_of_ball()
    }

    /// Raw input lookup: factors first, then traits.
    pub fn raw_input(&self, key: &str) -> Option<f64> {
        self.factors.get(key).or_else(|| self.traits.get(key)).copied()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    QB,
    RB,
    FB,
    WR,
    TE,
    OT,
    OG,
    C,
    DE,
    DT,
    LB,
    CB,
    S,
    K,
    P,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SideOfBall {
    Offense,
    Defense,
    SpecialTeams,
}

impl Position {
    pub const ALL: [Position; 15] = [
        Position::QB,
        Position::RB,
        Position::FB,
        Position::WR,
        Position::TE,
        Position::OT,
        Position::OG,
        Position::C,
        Position::DE,
        Position::DT,
        Position::LB,
        Position::CB,
        Position::S,
        Position::K,
        Position::P,
    ];

    /// Fixed side-of-ball lookup table.
    pub fn side_of_ball(&self) -> SideOfBall {
        match self {
            Position::QB
            | Position::RB
            | Position::FB
            | Position::WR
            | Position::TE
            | Position::OT
            | Position::OG
            | Position::C => SideOfBall::Offense,
            Position::DE | Position::DT | Position::LB | Position::CB | Position::S => {
                SideOfBall::Defense
            }
            Position::K | Position::P => SideOfBall::SpecialTeams,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::FB => "FB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::OT => "OT",
            Position::OG => "OG",
            Position::C => "C",
            Position::DE => "DE",
            Position::DT => "DT",
            Position::LB => "LB",
            Position::CB => "CB",
            Position::S => "S",
            Position::K => "K",
            Position::P => "P",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Position {
    type Err = String;

    /// Case-insensitive, accepts common roster aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let pos = match upper.as_str() {
            "QB" => Position::QB,
            "RB" | "HB" => Position::RB,
            "FB" => Position::FB,
            "WR" => Position::WR,
            "TE" => Position::TE,
            "OT" | "T" | "LT" | "RT" => Position::OT,
            "OG" | "G" | "LG" | "RG" | "OL" => Position::OG,
            "C" => Position::C,
            "DE" | "EDGE" => Position::DE,
            "DT" | "NT" | "DL" => Position::DT,
            "LB" | "ILB" | "OLB" | "MLB" => Position::LB,
            "CB" => Position::CB,
            "S" | "FS" | "SS" => Position::S,
            "K" | "PK" => Position::K,
            "P" => Position::P,
            _ => return Err(format!("Unknown position: {}", s)),
        };
        Ok(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_of_ball_lookup() {
        assert_eq!(Position::QB.side_of_ball(), SideOfBall::Offense);
        assert_eq!(Position::C.side_of_ball(), SideOfBall::Offense);
        assert_eq!(Position::S.side_of_ball(), SideOfBall::Defense);
        assert_eq!(Position::K.side_of_ball(), SideOfBall::SpecialTeams);
        let offense = Position::ALL
            .iter()
            .filter(|p| p.side_of_ball() == SideOfBall::Offense)
            .count();
        assert_eq!(offense, 8);
    }

    #[test]
    fn test_position_aliases() {
        assert_eq!("hb".parse::<Position>().unwrap(), Position::RB);
        assert_eq!(" EDGE ".parse::<Position>().unwrap(), Position::DE);
        assert_eq!("mlb".parse::<Position>().unwrap(), Position::LB);
        assert_eq!("FS".parse::<Position>().unwrap(), Position::S);
        assert!("QBX".parse::<Position>().is_err());
    }

    #[test]
    fn test_raw_input_prefers_factors() {
        let p = Player::new("p1", "Test", Position::WR)
            .with_factor("speed", 90.0)
            .with_trait("speed", 10.0)
            .with_trait("clutch", 70.0);
        assert_eq!(p.raw_input("speed"), Some(90.0));
        assert_eq!(p.raw_input("clutch"), Some(70.0));
        assert_eq!(p.raw_input("missing"), None);
    }

    #[test]
    fn test_player_deserializes_with_defaults() {
        let json = r#"{"id":"p9","name":"Nine","position":"QB"}"#;
        let p: Player = serde_json::from_str(json).unwrap();
        assert_eq!(p.rating_overall, 50.0);
        assert!(p.factors.is_empty());
        assert_eq!(p.latent.athletic.get("speed"), 0.5);
    }
}
