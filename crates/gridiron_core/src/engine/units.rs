//! Team Unit Aggregator
//!
//! Starters' latent composites → Offense / Defense / Special-Teams profiles.
//! An empty position group reads every composite as 0.5, so a thin roster
//! degrades ratings instead of failing.

use crate::models::latent::NEUTRAL;
use crate::models::units::{to_score, DefenseUnit, OffenseUnit, SpecialTeamsUnit, TeamUnits};
use crate::models::{Player, Position, Team};
use crate::player::Composite;

/// Starters per position group.
pub mod starters {
    pub const QB: usize = 1;
    pub const RB: usize = 1;
    pub const WR: usize = 3;
    pub const TE: usize = 1;
    pub const OL: usize = 5;
    pub const DL: usize = 4;
    pub const LB: usize = 3;
    pub const CB: usize = 2;
    pub const S: usize = 2;
    pub const K: usize = 1;
    pub const P: usize = 1;
}

pub const OFFENSIVE_LINE: [Position; 3] = [Position::OT, Position::OG, Position::C];
pub const DEFENSIVE_LINE: [Position; 2] = [Position::DE, Position::DT];

/// Starting lineup resolved from the depth chart.
#[derive(Debug, Clone, Default)]
pub struct Starters<'a> {
    pub qb: Vec<&'a Player>,
    pub rb: Vec<&'a Player>,
    pub wr: Vec<&'a Player>,
    pub te: Vec<&'a Player>,
    pub ol: Vec<&'a Player>,
    pub dl: Vec<&'a Player>,
    pub lb: Vec<&'a Player>,
    pub cb: Vec<&'a Player>,
    pub s: Vec<&'a Player>,
    pub k: Vec<&'a Player>,
    pub p: Vec<&'a Player>,
}

impl<'a> Starters<'a> {
    pub fn resolve(team: &'a Team) -> Self {
        Self {
            qb: team.starters(Position::QB, starters::QB),
            rb: team.pooled_starters(&[Position::RB, Position::FB], starters::RB),
            wr: team.starters(Position::WR, starters::WR),
            te: team.starters(Position::TE, starters::TE),
            ol: team.pooled_starters(&OFFENSIVE_LINE, starters::OL),
            dl: team.pooled_starters(&DEFENSIVE_LINE, starters::DL),
            lb: team.starters(Position::LB, starters::LB),
            cb: team.starters(Position::CB, starters::CB),
            s: team.starters(Position::S, starters::S),
            k: team.starters(Position::K, starters::K),
            p: team.starters(Position::P, starters::P),
        }
    }

    /// WR + TE: the primary pass catchers.
    pub fn receivers(&self) -> Vec<&'a Player> {
        self.wr.iter().chain(self.te.iter()).copied().collect()
    }

    pub fn offense(&self) -> Vec<&'a Player> {
        [&self.qb, &self.rb, &self.wr, &self.te, &self.ol]
            .into_iter()
            .flat_map(|g| g.iter().copied())
            .collect()
    }

    pub fn defense(&self) -> Vec<&'a Player> {
        [&self.dl, &self.lb, &self.cb, &self.s]
            .into_iter()
            .flat_map(|g| g.iter().copied())
            .collect()
    }
}

/// Mean composite over a group; [`NEUTRAL`] for an empty group.
pub fn group_mean(players: &[&Player], composite: Composite) -> f64 {
    group_mean_by(players, |p| composite.eval(&p.latent))
}

fn group_mean_by(players: &[&Player], f: impl Fn(&Player) -> f64) -> f64 {
    if players.is_empty() {
        return NEUTRAL;
    }
    let sum: f64 = players.iter().map(|p| f(*p)).sum();
    let mean = sum / players.len() as f64;
    if mean.is_finite() {
        mean
    } else {
        NEUTRAL
    }
}

pub fn aggregate_units(team: &Team) -> TeamUnits {
    let s = Starters::resolve(team);
    TeamUnits {
        offense: offense_unit(&s),
        defense: defense_unit(&s),
        special: special_unit(&s),
    }
}

pub fn offense_unit(s: &Starters) -> OffenseUnit {
    let receivers = s.receivers();
    let offense = s.offense();

    let qb_processing = group_mean(&s.qb, Composite::QbProcessing);
    let receiver_craft = group_mean(&receivers, Composite::ReceiverCraft);
    let pass_protection = group_mean(&s.ol, Composite::PassProtection);
    let run_blocking = group_mean(&s.ol, Composite::RunBlocking);
    let te_blocking = group_mean(&s.te, Composite::RunBlocking);
    let back_skill = group_mean(&s.rb, Composite::BackSkill);

    let pass = 0.55 * qb_processing + 0.30 * receiver_craft + 0.15 * pass_protection;
    let run = 0.45 * run_blocking + 0.40 * back_skill + 0.15 * te_blocking;
    let separation =
        0.7 * receiver_craft + 0.3 * group_mean(&receivers, Composite::YacAbility);

    let qb_reliance = 0.5 + (qb_processing - 0.5 * (receiver_craft + back_skill));
    let tempo = group_mean_by(&offense, |p| p.latent.a("endurance"));

    OffenseUnit {
        pass: to_score(pass),
        run: to_score(run),
        pass_protection: to_score(pass_protection),
        run_blocking: to_score(run_blocking),
        qb_accuracy: to_score(group_mean(&s.qb, Composite::QbAccuracy)),
        receiver_separation: to_score(separation),
        ball_security: to_score(group_mean(&offense, Composite::BallSecurity)),
        discipline: to_score(group_mean(&offense, Composite::Discipline)),
        aggression: to_score(group_mean(&offense, Composite::Aggression)),
        qb_reliance: slider(qb_reliance),
        tempo: slider(tempo),
    }
}

pub fn defense_unit(s: &Starters) -> DefenseUnit {
    let defense = s.defense();

    let pass_rush =
        0.7 * group_mean(&s.dl, Composite::PassRush) + 0.3 * group_mean(&s.lb, Composite::PassRush);
    let coverage = 0.45 * group_mean(&s.cb, Composite::Coverage)
        + 0.35 * group_mean(&s.s, Composite::Coverage)
        + 0.20 * group_mean(&s.lb, Composite::Coverage);
    let tackling = 0.40 * group_mean(&s.lb, Composite::Tackling)
        + 0.30 * group_mean(&s.s, Composite::Tackling)
        + 0.15 * group_mean(&s.cb, Composite::Tackling)
        + 0.15 * group_mean(&s.dl, Composite::Tackling);
    let run_defense = 0.45 * group_mean(&s.dl, Composite::RunFit)
        + 0.35 * group_mean(&s.lb, Composite::RunFit)
        + 0.20 * tackling;
    let ball_hawk = 0.40 * group_mean(&s.cb, Composite::BallHawk)
        + 0.40 * group_mean(&s.s, Composite::BallHawk)
        + 0.20 * group_mean(&s.lb, Composite::BallHawk);
    let aggression = group_mean(&defense, Composite::Aggression);

    let blitz = 0.5 * aggression + 0.5 * group_mean(&s.lb, Composite::PassRush);
    let chaos = 0.6 * group_mean(&defense, Composite::Chaos) + 0.4 * ball_hawk;

    DefenseUnit {
        pass_rush: to_score(pass_rush),
        coverage: to_score(coverage),
        run_defense: to_score(run_defense),
        tackling: to_score(tackling),
        ball_hawk: to_score(ball_hawk),
        discipline: to_score(group_mean(&defense, Composite::Discipline)),
        aggression: to_score(aggression),
        blitz_aggression: slider(blitz),
        chaos_rate: slider(chaos),
    }
}

pub fn special_unit(s: &Starters) -> SpecialTeamsUnit {
    let cover_men: Vec<&Player> = s.lb.iter().chain(s.s.iter()).copied().collect();
    let returners: Vec<&Player> = s.rb.iter().chain(s.wr.iter()).copied().collect();
    let coverage = 0.6 * group_mean(&cover_men, Composite::Tackling)
        + 0.4 * group_mean_by(&cover_men, |p| p.latent.a("speed"));

    SpecialTeamsUnit {
        kicking: to_score(group_mean(&s.k, Composite::Kicking)),
        punting: to_score(group_mean(&s.p, Composite::Punting)),
        coverage: to_score(coverage),
        return_threat: slider(group_mean(&returners, Composite::YacAbility)),
    }
}

fn slider(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        NEUTRAL
    }
}
