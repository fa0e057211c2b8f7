//! Roster CSV → `Team` values.
//!
//! One row per player. Fixed leading columns:
//!
//! | column | required | notes |
//! |--------|----------|-------|
//! | `team_id` | yes | groups rows into teams |
//! | `team_name` | no | first non-empty value per team wins |
//! | `player_id` | yes | unique within a team |
//! | `name` | yes | |
//! | `position` | yes | case-insensitive, aliases accepted (`HB`, `EDGE`, `FS`, ...) |
//! | `depth` | no | explicit depth-chart slot |
//! | `rating_overall`, `rating_pos` | no | 0-100 |
//!
//! Every other column is a numeric raw input. Columns prefixed `trait_` go to
//! the trait map with the prefix stripped; the rest are factors. Empty cells
//! are absent inputs, not zeros.
//!
//! A row that cannot be read is skipped, counted in [`ParseStats`] and logged.

use anyhow::{bail, Context, Result};
use gridiron_core::models::{Player, Position, Team};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::warn;

const TRAIT_PREFIX: &str = "trait_";
const FIXED_COLUMNS: [&str; 8] = [
    "team_id",
    "team_name",
    "player_id",
    "name",
    "position",
    "depth",
    "rating_overall",
    "rating_pos",
];
const REQUIRED_COLUMNS: [&str; 4] = ["team_id", "player_id", "name", "position"];

/// CSV parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
    pub failed: u32,
    pub duplicates: u32,
    pub teams: u32,
}

/// Where each column lives in a record.
#[derive(Debug)]
struct ColumnMap {
    fixed: FxHashMap<&'static str, usize>,
    factors: Vec<(usize, String)>,
    traits: Vec<(usize, String)>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let mut fixed = FxHashMap::default();
        let mut factors = Vec::new();
        let mut traits = Vec::new();

        for (idx, raw) in headers.iter().enumerate() {
            let name = raw.trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            if let Some(col) = FIXED_COLUMNS.iter().find(|c| **c == name) {
                fixed.insert(*col, idx);
            } else if let Some(key) = name.strip_prefix(TRAIT_PREFIX) {
                traits.push((idx, key.to_string()));
            } else {
                factors.push((idx, name));
            }
        }

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|c| !fixed.contains_key(c))
            .collect();
        if !missing.is_empty() {
            bail!("Roster CSV is missing required columns: {}", missing.join(", "));
        }
        Ok(Self {
            fixed,
            factors,
            traits,
        })
    }

    fn cell<'r>(&self, record: &'r csv::StringRecord, column: &str) -> Option<&'r str> {
        let idx = *self.fixed.get(column)?;
        record.get(idx).map(str::trim).filter(|s| !s.is_empty())
    }
}

/// One parsed row.
struct Row {
    team_id: String,
    team_name: Option<String>,
    player: Player,
}

fn parse_number(value: &str, column: &str) -> Result<f64> {
    let v: f64 = value
        .parse()
        .with_context(|| format!("Invalid {} value: '{}'", column, value))?;
    if !v.is_finite() {
        bail!("Non-finite {} value: '{}'", column, value);
    }
    Ok(v)
}

fn parse_row(columns: &ColumnMap, record: &csv::StringRecord) -> Result<Row> {
    let required = |column: &str| {
        columns
            .cell(record, column)
            .with_context(|| format!("Empty {} cell", column))
    };
    let team_id = required("team_id")?.to_string();
    let player_id = required("player_id")?;
    let name = required("name")?;
    let position: Position = required("position")?
        .parse()
        .map_err(anyhow::Error::msg)?;

    let mut player = Player::new(player_id, name, position);
    player.team_id = team_id.clone();

    if let Some(depth) = columns.cell(record, "depth") {
        let depth: u32 = depth
            .parse()
            .with_context(|| format!("Invalid depth value: '{}'", depth))?;
        player.depth = Some(depth);
    }
    if let Some(v) = columns.cell(record, "rating_overall") {
        player.rating_overall = parse_number(v, "rating_overall")?;
    }
    if let Some(v) = columns.cell(record, "rating_pos") {
        player.rating_pos = parse_number(v, "rating_pos")?;
    }

    for (idx, key) in &columns.factors {
        if let Some(v) = record.get(*idx).map(str::trim).filter(|s| !s.is_empty()) {
            player.factors.insert(key.clone(), parse_number(v, key)?);
        }
    }
    for (idx, key) in &columns.traits {
        if let Some(v) = record.get(*idx).map(str::trim).filter(|s| !s.is_empty()) {
            player.traits.insert(key.clone(), parse_number(v, key)?);
        }
    }

    Ok(Row {
        team_id,
        team_name: columns.cell(record, "team_name").map(str::to_string),
        player,
    })
}

#[derive(Default)]
struct TeamAccumulator {
    name: Option<String>,
    roster: Vec<Player>,
    seen: FxHashSet<String>,
}

/// Parse roster CSV from any reader. Teams come back sorted by id.
pub fn parse_roster_reader<R: Read>(reader: R) -> Result<(Vec<Team>, ParseStats)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut stats = ParseStats::default();
    let mut teams: FxHashMap<String, TeamAccumulator> = FxHashMap::default();

    for (i, record) in reader.records().enumerate() {
        // header is line 1
        let line = i + 2;
        stats.total_rows += 1;

        let record = match record {
            Ok(r) => r,
            Err(e) => {
                stats.failed += 1;
                warn!(line, error = %e, "unreadable CSV row; skipped");
                continue;
            }
        };
        let row = match parse_row(&columns, &record) {
            Ok(row) => row,
            Err(e) => {
                stats.failed += 1;
                warn!(line, error = %e, "bad roster row; skipped");
                continue;
            }
        };

        let team = teams.entry(row.team_id).or_default();
        if !team.seen.insert(row.player.id.clone()) {
            stats.duplicates += 1;
            warn!(line, player = %row.player.id, "duplicate player id; skipped");
            continue;
        }
        if team.name.is_none() {
            team.name = row.team_name;
        }
        team.roster.push(row.player);
        stats.parsed += 1;
    }

    let mut out: Vec<Team> = teams
        .into_iter()
        .map(|(id, acc)| {
            let name = acc.name.unwrap_or_else(|| id.clone());
            Team::new(id, name, acc.roster)
        })
        .collect();
    out.sort_by(|a, b| a.id.cmp(&b.id));
    stats.teams = out.len() as u32;
    Ok((out, stats))
}

/// Parse a roster CSV file.
pub fn parse_roster_csv(csv_path: &Path) -> Result<(Vec<Team>, ParseStats)> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file: {}", csv_path.display()))?;
    parse_roster_reader(file)
        .with_context(|| format!("Failed to parse roster CSV: {}", csv_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
team_id,team_name,player_id,name,position,depth,rating_overall,rating_pos,speed,arm_strength,trait_composure
hawks,Harbor Hawks,h1,Ada Quinn,QB,1,78,81,,88,70
hawks,,h2,Bo Reyes,HB,1,72,74,90,,
miners,Ridge Miners,m1,Cy Dale,edge,,69,70,84,,55
miners,Ridge Miners,m2,Di Ford,XX,1,60,60,70,,
hawks,Harbor Hawks,h1,Dup Quinn,QB,2,50,50,,,
miners,Ridge Miners,m3,Ed Moss,CB,1,abc,60,,,
";

    #[test]
    fn test_parse_sample() {
        let (teams, stats) = parse_roster_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(stats.total_rows, 6);
        assert_eq!(stats.parsed, 3);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.teams, 2);

        let ids: Vec<&str> = teams.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["hawks", "miners"]);

        let hawks = &teams[0];
        assert_eq!(hawks.name, "Harbor Hawks");
        let qb = hawks.player("h1").unwrap();
        assert_eq!(qb.position, Position::QB);
        assert_eq!(qb.depth, Some(1));
        assert_eq!(qb.factors.get("arm_strength"), Some(&88.0));
        // empty cell is absent, not zero
        assert!(!qb.factors.contains_key("speed"));
        assert_eq!(qb.traits.get("composure"), Some(&70.0));

        let rb = hawks.player("h2").unwrap();
        assert_eq!(rb.position, Position::RB);
        assert!(rb.traits.is_empty());

        let edge = teams[1].player("m1").unwrap();
        assert_eq!(edge.position, Position::DE);
        assert_eq!(edge.depth, None);
        assert_eq!(edge.team_id, "miners");
    }

    #[test]
    fn test_missing_required_column_fails() {
        let csv = "team_id,name,position\nhawks,Ada,QB\n";
        let err = parse_roster_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("player_id"));
    }

    #[test]
    fn test_team_name_falls_back_to_id() {
        let csv = "team_id,player_id,name,position\nbears,b1,Fay,K\n";
        let (teams, _) = parse_roster_reader(csv.as_bytes()).unwrap();
        assert_eq!(teams[0].name, "bears");
        assert_eq!(teams[0].abbreviation, "BEA");
    }
}
