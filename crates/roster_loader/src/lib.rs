//! Roster Loader Library
//!
//! Roster CSV → `Team` values → one JSON file per team.
//! The engine only ever sees the `Team`/`Player` data contract.

pub mod roster_csv;

use anyhow::{Context, Result};
use gridiron_core::models::Team;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub use roster_csv::{parse_roster_csv, parse_roster_reader, ParseStats};

/// What a roster build wrote.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub stats: ParseStats,
    pub files: Vec<PathBuf>,
}

/// Write `team` as pretty JSON to `<dir>/<team id>.json`.
pub fn write_team_json(team: &Team, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let path = dir.join(format!("{}.json", team.id));
    let json = serde_json::to_string_pretty(team)
        .with_context(|| format!("Failed to serialize team {}", team.id))?;
    fs::write(&path, json)
        .with_context(|| format!("Failed to write team file: {}", path.display()))?;
    Ok(path)
}

/// Read a team JSON file.
pub fn load_team_json(path: &Path) -> Result<Team> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read team file: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse team file: {}", path.display()))
}

/// Parse `csv_path` and write every team it contains into `out_dir`.
pub fn build_rosters(csv_path: &Path, out_dir: &Path) -> Result<BuildReport> {
    let (teams, stats) = parse_roster_csv(csv_path)?;
    let files = teams
        .iter()
        .map(|team| write_team_json(team, out_dir))
        .collect::<Result<Vec<_>>>()?;
    info!(
        teams = stats.teams,
        players = stats.parsed,
        failed = stats.failed,
        duplicates = stats.duplicates,
        out_dir = %out_dir.display(),
        "rosters written"
    );
    Ok(BuildReport { stats, files })
}
