//! Role composites: fixed weighted blends of latent components.
//!
//! The unit aggregator averages these over starters; the play simulator reads
//! them per player (with that player's game-day form applied).

use crate::models::latent::LatentProfile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Composite {
    QbProcessing,
    QbAccuracy,
    PocketPresence,
    ReceiverCraft,
    PassProtection,
    RunBlocking,
    BackSkill,
    YacAbility,
    BallSecurity,
    PassRush,
    RunFit,
    Tackling,
    Coverage,
    BallHawk,
    Kicking,
    Punting,
    Discipline,
    Aggression,
    Chaos,
    RiskTolerance,
}

impl Composite {
    pub fn eval(self, l: &LatentProfile) -> f64 {
        let v = match self {
            Composite::QbProcessing => {
                0.35 * l.c("processing")
                    + 0.20 * l.c("awareness")
                    + 0.25 * l.t("throw_accuracy")
                    + 0.10 * l.t("release")
                    + 0.10 * l.p("composure")
            }
            Composite::QbAccuracy => {
                0.60 * l.t("throw_accuracy") + 0.15 * l.t("release") + 0.25 * l.p("composure")
            }
            Composite::PocketPresence => {
                0.40 * l.p("composure") + 0.30 * l.c("awareness") + 0.30 * l.a("agility")
            }
            Composite::ReceiverCraft => {
                0.35 * l.t("route_running")
                    + 0.30 * l.t("hands")
                    + 0.20 * l.a("speed")
                    + 0.15 * l.a("agility")
            }
            Composite::PassProtection => {
                0.60 * l.t("pass_block") + 0.25 * l.a("strength") + 0.15 * l.c("awareness")
            }
            Composite::RunBlocking => {
                0.60 * l.t("run_block") + 0.30 * l.a("power") + 0.10 * l.c("awareness")
            }
            Composite::BackSkill => {
                0.25 * l.a("agility")
                    + 0.25 * l.a("speed")
                    + 0.20 * l.a("power")
                    + 0.20 * l.c("vision")
                    + 0.10 * l.t("ball_security")
            }
            Composite::YacAbility => {
                0.40 * l.a("agility") + 0.30 * l.a("power") + 0.30 * l.a("speed")
            }
            Composite::BallSecurity => {
                0.70 * l.t("ball_security") + 0.30 * l.p("emotional_stability")
            }
            Composite::PassRush => {
                0.50 * l.t("pass_rush") + 0.25 * l.a("acceleration") + 0.25 * l.a("power")
            }
            Composite::RunFit => {
                0.40 * l.t("block_shedding")
                    + 0.35 * l.c("play_recognition")
                    + 0.25 * l.a("strength")
            }
            Composite::Tackling => {
                0.65 * l.t("tackling") + 0.20 * l.a("power") + 0.15 * l.c("play_recognition")
            }
            Composite::Coverage => {
                0.35 * l.t("man_coverage")
                    + 0.30 * l.t("zone_coverage")
                    + 0.20 * l.a("speed")
                    + 0.15 * l.c("play_recognition")
            }
            Composite::BallHawk => {
                0.60 * l.t("ball_skills") + 0.20 * l.c("play_recognition") + 0.20 * l.v("chaos")
            }
            Composite::Kicking => 0.50 * l.t("kick_power") + 0.50 * l.t("kick_accuracy"),
            Composite::Punting => 0.70 * l.t("punt_power") + 0.30 * l.t("kick_accuracy"),
            Composite::Discipline => l.c("discipline"),
            Composite::Aggression => l.p("aggression"),
            Composite::Chaos => l.v("chaos"),
            Composite::RiskTolerance => l.p("risk_tolerance"),
        };
        v.clamp(0.0, 1.0)
    }
}
