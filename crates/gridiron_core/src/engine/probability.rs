//! Probability helpers for the play models
//!
//! All functions are pure - they take ratings as input and return
//! probabilities, so each sub-model is testable without a game.

/// Standard logistic.
#[inline]
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Clamp to [lo, hi], mapping non-finite input to `fallback`.
#[inline]
pub fn bounded(v: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v.clamp(lo, hi)
    } else {
        fallback
    }
}

/// Scale a (catch, interception) pair so the two never exceed `cap` together.
pub fn cap_pair(catch: f64, interception: f64, cap: f64) -> (f64, f64) {
    let total = catch + interception;
    if total > cap && total > 0.0 {
        let k = cap / total;
        (catch * k, interception * k)
    } else {
        (catch, interception)
    }
}

/// Per-snap penalty probability from both teams' average aggression and
/// discipline (0-100 scores). A zero base rate stays zero.
pub fn penalty_probability(base: f64, aggression: f64, discipline: f64) -> f64 {
    let agg = aggression / 100.0 - 0.5;
    let disc = discipline / 100.0 - 0.5;
    bounded(base * (1.0 + 1.2 * agg - 1.2 * disc), base.min(0.01), 0.2, base)
}

/// Fumble probability for one carry or catch.
///
/// Ball security and emotional stability (carrier, 0-1) cut it; defensive
/// chaos (0-1 slider) and tackling (0-1) raise it. A zero base rate stays
/// zero.
pub fn fumble_probability(
    base: f64,
    ball_security: f64,
    stability: f64,
    chaos: f64,
    tackling: f64,
    weather: f64,
) -> f64 {
    let p = base
        * (1.0 - 1.2 * (ball_security - 0.5))
        * (1.0 - 0.4 * (stability - 0.5))
        * (1.0 + (chaos - 0.5))
        * (1.0 + 0.6 * (tackling - 0.5))
        * weather;
    bounded(p, base.min(0.002), 0.06, base)
}

/// Field-goal make probability at `distance` yards against a kicker range.
pub fn field_goal_probability(distance: f64, range: f64, accuracy: f64) -> f64 {
    let sharpness = 0.22 + 0.16 * (accuracy - 0.5);
    bounded(logistic((range - distance) * sharpness), 0.01, 0.99, 0.5)
}
