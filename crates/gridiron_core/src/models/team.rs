use super::player::{Player, PlayerId, Position};
use super::units::TeamUnits;
use crate::engine::units::aggregate_units;
use crate::player::latent_deriver::derive_latent;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
    pub roster: Vec<Player>,
    #[serde(default)]
    pub depth_chart: DepthChart,
    /// Filled by [`Team::prepare`]; the engine computes it on a copy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<TeamUnits>,
}

/// Position → player ids, best first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(transparent)]
pub struct DepthChart(BTreeMap<Position, Vec<PlayerId>>);

impl DepthChart {
    /// Order every position group by explicit depth, then rating descending.
    pub fn build(roster: &[Player]) -> Self {
        let mut by_pos: BTreeMap<Position, Vec<&Player>> = BTreeMap::new();
        for player in roster {
            by_pos.entry(player.position).or_default().push(player);
        }

        let chart = by_pos
            .into_iter()
            .map(|(pos, mut players)| {
                players.sort_by(|a, b| depth_order(a, b));
                (pos, players.into_iter().map(|p| p.id.clone()).collect())
            })
            .collect();
        Self(chart)
    }

    pub fn at(&self, position: Position) -> &[PlayerId] {
        self.0.get(&position).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Top-`n` ids at `position` (fewer when the group is short).
    pub fn starters(&self, position: Position, n: usize) -> &[PlayerId] {
        let ids = self.at(position);
        &ids[..n.min(ids.len())]
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

/// Explicit depth ascending (unset last), then position rating descending,
/// then overall rating descending, then id for a total order.
pub fn depth_order(a: &Player, b: &Player) -> Ordering {
    let da = a.depth.unwrap_or(u32::MAX);
    let db = b.depth.unwrap_or(u32::MAX);
    da.cmp(&db)
        .then_with(|| b.rating_pos.total_cmp(&a.rating_pos))
        .then_with(|| b.rating_overall.total_cmp(&a.rating_overall))
        .then_with(|| a.id.cmp(&b.id))
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>, roster: Vec<Player>) -> Self {
        let id = id.into();
        let roster = roster
            .into_iter()
            .map(|mut p| {
                if p.team_id.is_empty() {
                    p.team_id = id.clone();
                }
                p
            })
            .collect::<Vec<_>>();
        let depth_chart = DepthChart::build(&roster);
        Self {
            abbreviation: id.chars().take(3).collect::<String>().to_ascii_uppercase(),
            id,
            name: name.into(),
            roster,
            depth_chart,
            units: None,
        }
    }

    /// Derive every latent profile, rebuild the depth chart, compute units.
    ///
    /// Idempotent: a second call replaces the previous derivation.
    pub fn prepare(&mut self) {
        for player in &mut self.roster {
            player.latent = derive_latent(player);
        }
        self.depth_chart = DepthChart::build(&self.roster);
        self.units = Some(aggregate_units(self));
    }

    /// Prepared copy; `self` is left untouched.
    pub fn prepared(&self) -> Team {
        let mut team = self.clone();
        team.prepare();
        team
    }

    pub fn is_prepared(&self) -> bool {
        self.units.is_some()
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.roster.iter().find(|p| p.id == id)
    }

    /// Depth-chart query: top-`n` players at `position`.
    pub fn starters(&self, position: Position, n: usize) -> Vec<&Player> {
        let ids = self.depth_chart.starters(position, n);
        if ids.is_empty() && !self.roster.iter().any(|p| p.position == position) {
            return Vec::new();
        }
        if ids.is_empty() {
            // Depth chart not built yet: fall back to a roster scan.
            let mut players: Vec<&Player> =
                self.roster.iter().filter(|p| p.position == position).collect();
            players.sort_by(|a, b| depth_order(a, b));
            players.truncate(n);
            return players;
        }
        ids.iter().filter_map(|id| self.player(id)).collect()
    }

    /// Top-`n` across several positions pooled together (e.g. the offensive line).
    pub fn pooled_starters(&self, positions: &[Position], n: usize) -> Vec<&Player> {
        let mut players: Vec<&Player> = positions
            .iter()
            .flat_map(|pos| self.starters(*pos, n))
            .collect();
        players.sort_by(|a, b| depth_order(a, b));
        players.truncate(n);
        players
    }

    /// Positions with nobody on the roster among those the engine needs.
    pub fn missing_starters(&self) -> Vec<Position> {
        [Position::QB, Position::RB, Position::WR, Position::K, Position::P]
            .into_iter()
            .filter(|pos| !self.roster.iter().any(|p| p.position == *pos))
            .collect()
    }
}
