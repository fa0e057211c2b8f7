//! Gridiron CLI
//!
//! Simulate games from team JSON, sweep seeds in parallel, generate demo
//! rosters, convert roster CSV and print JSON schemas.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gridiron_core::api::{schema_json, simulate_seeds};
use gridiron_core::models::{GameResult, Side};
use gridiron_core::{fixtures, simulate_game, RuleConfig, SimOptions};
use roster_loader::{build_rosters, load_team_json, write_team_json};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gridiron")]
#[command(about = "Deterministic American-football game simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one game
    Simulate {
        /// Home team JSON file
        #[arg(long)]
        home: PathBuf,

        /// Away team JSON file
        #[arg(long)]
        away: PathBuf,

        /// RNG seed; omit for an unseeded (entropy) game
        #[arg(long)]
        seed: Option<u32>,

        /// Rule config JSON file; defaults to GRIDIRON_RULE_PROFILE or the regular season rules
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the full result JSON here
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Simulate the same matchup over a range of seeds, in parallel
    Batch {
        #[arg(long)]
        home: PathBuf,

        #[arg(long)]
        away: PathBuf,

        /// `1..100` (half-open), `1..=100`, or `3,7,42`
        #[arg(long, default_value = "1..101")]
        seeds: String,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Write one result JSON per line here
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Simulate a game between two generated rosters
    Demo {
        #[arg(long, default_value_t = 42)]
        seed: u32,

        /// Also write the generated rosters to this directory
        #[arg(long)]
        rosters_out: Option<PathBuf>,
    },

    /// Convert a roster CSV into one team JSON file per team
    Roster {
        #[arg(long)]
        csv: PathBuf,

        #[arg(long)]
        out_dir: PathBuf,
    },

    /// Print a JSON schema: options, team, result, request or play_request
    Schema { name: String },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Commands::Simulate {
            home,
            away,
            seed,
            config,
            out,
        } => {
            let home = load_team_json(&home)?;
            let away = load_team_json(&away)?;
            let options = SimOptions {
                seed,
                rules: load_rules(config.as_deref())?,
            };
            let result = simulate_game(&home, &away, &options)?;
            print_summary(&result);
            if let Some(path) = out {
                write_json(&path, &result)?;
            }
        }

        Commands::Batch {
            home,
            away,
            seeds,
            config,
            out,
        } => {
            let home = load_team_json(&home)?;
            let away = load_team_json(&away)?;
            let rules = load_rules(config.as_deref())?;
            let seeds = parse_seeds(&seeds)?;
            info!(games = seeds.len(), "batch start");

            let results = simulate_seeds(&home, &away, &rules, &seeds)
                .into_iter()
                .collect::<Result<Vec<_>, _>>()?;
            print_batch_summary(&results);

            if let Some(path) = out {
                let mut lines = String::new();
                for result in &results {
                    lines.push_str(&serde_json::to_string(result)?);
                    lines.push('\n');
                }
                fs::write(&path, lines)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }

        Commands::Demo { seed, rosters_out } => {
            let (home, away) = fixtures::demo_pair(seed);
            if let Some(dir) = rosters_out {
                for team in [&home, &away] {
                    let path = write_team_json(team, &dir)?;
                    println!("wrote {}", path.display());
                }
            }
            let result = simulate_game(&home, &away, &SimOptions::seeded(seed))?;
            print_summary(&result);
        }

        Commands::Roster { csv, out_dir } => {
            let report = build_rosters(&csv, &out_dir)?;
            println!(
                "{} teams, {} players ({} rows failed, {} duplicates)",
                report.stats.teams, report.stats.parsed, report.stats.failed, report.stats.duplicates
            );
            for file in &report.files {
                println!("  {}", file.display());
            }
        }

        Commands::Schema { name } => {
            let schema = schema_json(&name).map_err(anyhow::Error::msg)?;
            println!("{}", schema);
        }
    }

    Ok(())
}

fn load_rules(path: Option<&Path>) -> Result<RuleConfig> {
    let Some(path) = path else {
        return Ok(RuleConfig::from_env_or_default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule config: {}", path.display()))?;
    let rules: RuleConfig = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse rule config: {}", path.display()))?;
    rules.validate()?;
    Ok(rules)
}

fn write_json(path: &Path, result: &GameResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("result written to {}", path.display());
    Ok(())
}

fn parse_seeds(range: &str) -> Result<Vec<u32>> {
    let range = range.trim();
    let parse = |s: &str| -> Result<u32> {
        s.trim()
            .parse()
            .with_context(|| format!("Invalid seed '{}'", s.trim()))
    };

    let seeds: Vec<u32> = if let Some((lo, hi)) = range.split_once("..=") {
        (parse(lo)?..=parse(hi)?).collect()
    } else if let Some((lo, hi)) = range.split_once("..") {
        (parse(lo)?..parse(hi)?).collect()
    } else {
        range.split(',').map(parse).collect::<Result<_>>()?
    };
    if seeds.is_empty() {
        bail!("Seed range '{}' selects no seeds", range);
    }
    Ok(seeds)
}

fn side_label(result: &GameResult, side: Side) -> String {
    let team = result.team(side);
    if team.name.is_empty() {
        team.id.clone()
    } else {
        team.name.clone()
    }
}

fn print_summary(result: &GameResult) {
    let home = side_label(result, Side::Home);
    let away = side_label(result, Side::Away);
    let ot = if result.overtime_quarters > 0 {
        format!(" ({}OT)", result.overtime_quarters)
    } else {
        String::new()
    };
    println!(
        "\n{} {} - {} {}{}",
        home, result.home_score, result.away_score, away, ot
    );
    match (result.winner, &result.shootout) {
        (Some(side), Some(s)) => println!(
            "   {} win the shootout {}-{}",
            side_label(result, side),
            s.made_home.max(s.made_away),
            s.made_home.min(s.made_away)
        ),
        (Some(side), None) => println!("   {} win", side_label(result, side)),
        (None, _) => println!("   tie"),
    }
    println!(
        "   seed {} ({:?}), {} plays, {} drives",
        result.seed,
        result.seed_mode,
        result.plays.len(),
        result.drives.len()
    );

    println!("\n   {:<22}{:>10}{:>10}", "", "home", "away");
    let (h, a) = (&result.home_stats, &result.away_stats);
    let rows: [(&str, String, String); 7] = [
        ("total yards", h.total_yards.to_string(), a.total_yards.to_string()),
        (
            "rushing",
            format!("{}-{}", h.rush_attempts, h.rush_yards),
            format!("{}-{}", a.rush_attempts, a.rush_yards),
        ),
        (
            "passing",
            format!("{}/{} {}", h.completions, h.pass_attempts, h.pass_yards),
            format!("{}/{} {}", a.completions, a.pass_attempts, a.pass_yards),
        ),
        ("first downs", h.first_downs.to_string(), a.first_downs.to_string()),
        (
            "3rd down",
            format!("{}/{}", h.third_down_conversions, h.third_down_attempts),
            format!("{}/{}", a.third_down_conversions, a.third_down_attempts),
        ),
        ("turnovers", h.turnovers.to_string(), a.turnovers.to_string()),
        (
            "possession",
            format_clock(h.time_of_possession_sec),
            format_clock(a.time_of_possession_sec),
        ),
    ];
    for (label, home, away) in rows {
        println!("   {:<22}{:>10}{:>10}", label, home, away);
    }
}

fn format_clock(sec: u32) -> String {
    format!("{}:{:02}", sec / 60, sec % 60)
}

fn print_batch_summary(results: &[GameResult]) {
    let Some(first) = results.first() else {
        return;
    };
    let n = results.len() as f64;
    let wins = |side: Side| results.iter().filter(|r| r.winner == Some(side)).count();
    let ties = results.iter().filter(|r| r.is_tie()).count();
    let avg = |f: fn(&GameResult) -> u32| results.iter().map(|r| f(r) as f64).sum::<f64>() / n;
    let overtime = results.iter().filter(|r| r.overtime_quarters > 0).count();

    println!("\n{} games", results.len());
    println!(
        "   {:<20} wins {:>5}  avg pts {:>5.1}",
        side_label(first, Side::Home),
        wins(Side::Home),
        avg(|r| r.home_score)
    );
    println!(
        "   {:<20} wins {:>5}  avg pts {:>5.1}",
        side_label(first, Side::Away),
        wins(Side::Away),
        avg(|r| r.away_score)
    );
    println!("   ties {}, overtime games {}", ties, overtime);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seeds() {
        assert_eq!(parse_seeds("1..4").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_seeds("1..=3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_seeds(" 7, 42 ,3").unwrap(), vec![7, 42, 3]);
        assert!(parse_seeds("5..5").is_err());
        assert!(parse_seeds("a..b").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "gridiron", "batch", "--home", "h.json", "--away", "a.json", "--seeds", "1..=10",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Batch { .. }));
        let cli = Cli::try_parse_from(["gridiron", "--json-logs", "schema", "team"]).unwrap();
        assert!(cli.json_logs);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(1805), "30:05");
    }
}
