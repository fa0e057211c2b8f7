//! Play-model tuning constants.
//!
//! Probabilities are in [0, 1]; yardages in yards; times in seconds.
//! `noise_scale` multiplies every outcome sigma (1.0 = calibrated).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PlayTuning {
    /// Sigma multiplier for every sampled outcome.
    pub noise_scale: f64,
    /// Per-game player form offset sigma (composite units).
    pub form_sigma: f64,

    // Play calling
    /// Base pass-call logit before situational adjustments.
    pub pass_call_bias: f64,

    // Penalties
    /// Per-snap flag rate for two average teams.
    pub penalty_base_rate: f64,
    /// Share of flags thrown before the snap.
    pub pre_snap_share: f64,

    // Passing
    pub catch_logit_base: f64,
    pub interception_logit_base: f64,
    /// Sack probability once the pressure/placement gate is open.
    pub sack_rate: f64,
    pub yac_immediate_tackle: f64,

    // Ball security
    pub fumble_base_rate: f64,
    /// Chance the defense recovers a fumble.
    pub fumble_lost_share: f64,

    // Running
    pub run_mean_yards: f64,
    pub run_sigma_inside: f64,
    pub run_sigma_outside: f64,
    pub breakaway_rate: f64,

    // Kicking
    pub punt_mean_yards: f64,
    /// Distance (yards) at which an average kicker converts half the time.
    pub fg_range_yards: f64,

    // Clock (mean seconds per play)
    pub run_clock_sec: f64,
    pub completion_clock_sec: f64,
    pub incompletion_clock_sec: f64,
    pub kick_clock_sec: f64,
    /// Multiplier applied to elapsed time in hurry-up.
    pub hurry_up_factor: f64,
}

impl Default for PlayTuning {
    fn default() -> Self {
        Self {
            noise_scale: 1.0,
            form_sigma: 0.04,
            pass_call_bias: 0.25,
            penalty_base_rate: 0.065,
            pre_snap_share: 0.45,
            catch_logit_base: 0.4,
            interception_logit_base: -3.6,
            sack_rate: 0.45,
            yac_immediate_tackle: 0.30,
            fumble_base_rate: 0.012,
            fumble_lost_share: 0.5,
            run_mean_yards: 3.8,
            run_sigma_inside: 2.6,
            run_sigma_outside: 4.5,
            breakaway_rate: 0.03,
            punt_mean_yards: 45.0,
            fg_range_yards: 53.0,
            run_clock_sec: 38.0,
            completion_clock_sec: 34.0,
            incompletion_clock_sec: 7.0,
            kick_clock_sec: 8.0,
            hurry_up_factor: 0.55,
        }
    }
}

impl PlayTuning {
    /// Wider outcome spread, more big plays, fewer flags.
    pub fn arcade() -> Self {
        Self {
            noise_scale: 1.3,
            form_sigma: 0.07,
            penalty_base_rate: 0.035,
            breakaway_rate: 0.06,
            yac_immediate_tackle: 0.22,
            fg_range_yards: 56.0,
            ..Self::default()
        }
    }

    /// (name, value) for every field that must be a probability.
    pub(crate) fn probabilities(&self) -> [(&'static str, f64); 7] {
        [
            ("penalty_base_rate", self.penalty_base_rate),
            ("pre_snap_share", self.pre_snap_share),
            ("sack_rate", self.sack_rate),
            ("yac_immediate_tackle", self.yac_immediate_tackle),
            ("fumble_base_rate", self.fumble_base_rate),
            ("fumble_lost_share", self.fumble_lost_share),
            ("breakaway_rate", self.breakaway_rate),
        ]
    }

    /// (name, value) for every field that must be finite and non-negative.
    pub(crate) fn magnitudes(&self) -> [(&'static str, f64); 13] {
        [
            ("noise_scale", self.noise_scale),
            ("form_sigma", self.form_sigma),
            ("run_sigma_inside", self.run_sigma_inside),
            ("run_sigma_outside", self.run_sigma_outside),
            ("run_mean_yards", self.run_mean_yards),
            ("punt_mean_yards", self.punt_mean_yards),
            ("fg_range_yards", self.fg_range_yards),
            ("run_clock_sec", self.run_clock_sec),
            ("completion_clock_sec", self.completion_clock_sec),
            ("incompletion_clock_sec", self.incompletion_clock_sec),
            ("kick_clock_sec", self.kick_clock_sec),
            ("hurry_up_factor", self.hurry_up_factor),
            ("pass_call_bias", self.pass_call_bias.abs()),
        ]
    }
}
