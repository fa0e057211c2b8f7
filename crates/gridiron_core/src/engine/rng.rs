//! Deterministic random number streams
//!
//! Every random decision in a game flows through a [`SimRng`]. A game owns
//! one root stream and forks named sub-streams from it (`"form"`, `"play"`,
//! `"env"`), so adding draws to one domain never shifts the others.
//!
//! Same seed ⇒ same sequence. The generator is ChaCha8 (portable, no host
//! entropy); float draws use only the top 53 bits of a `u64`.

use rand::{Error as RandError, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use std::f64::consts::TAU;

/// Substituted for a zero seed so the stream is never degenerate.
pub const DEFAULT_SEED: u32 = 0x9E37_79B9;

/// Sub-stream tags used by the game loop.
pub mod stream {
    /// Per-game player form offsets, drawn once at kickoff.
    pub const FORM: &str = "form";
    /// Play calling and per-play outcome noise.
    pub const PLAY: &str = "play";
    /// Weather, coin tosses and other environmental events.
    pub const ENV: &str = "env";
}

#[derive(Debug, Clone)]
pub struct SimRng {
    seed: u32,
    inner: ChaCha8Rng,
}

impl SimRng {
    pub fn new(seed: u32) -> Self {
        let seed = if seed == 0 { DEFAULT_SEED } else { seed };
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed as u64),
        }
    }

    /// Draw a fresh seed from host entropy.
    ///
    /// This is the only place the engine touches non-deterministic input.
    /// The drawn seed is returned so the caller can record it for replay.
    pub fn entropy_seed() -> u32 {
        let seed = rand::thread_rng().next_u32();
        if seed == 0 {
            DEFAULT_SEED
        } else {
            seed
        }
    }

    /// Seed actually in use (after zero substitution).
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Raw 32-bit output.
    pub fn next_raw(&mut self) -> u32 {
        self.inner.next_u32()
    }

    /// Uniform draw in [0, 1).
    pub fn uniform(&mut self) -> f64 {
        (self.inner.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Integer draw in [0, max). Returns 0 when `max` is 0.
    pub fn int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        ((self.uniform() * max as f64) as u32).min(max - 1)
    }

    /// Uniform draw in [lo, hi).
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.uniform()
    }

    /// Normal draw via Box–Muller. Consumes two uniforms per call.
    pub fn normal(&mut self, mu: f64, sigma: f64) -> f64 {
        // u1 in (0, 1] keeps ln() finite
        let u1 = 1.0 - self.uniform();
        let u2 = self.uniform();
        let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
        mu + sigma * z
    }

    /// Log-normal draw: `exp(mu + sigma * z)` with `z` standard normal.
    ///
    /// Uses the ziggurat sampler, so the number of raw draws consumed depends
    /// only on the stream state, never on `mu` or `sigma`.
    pub fn log_normal(&mut self, mu: f64, sigma: f64) -> f64 {
        let z: f64 = StandardNormal.sample(self);
        (mu + sigma * z).exp()
    }

    /// Bernoulli trial with probability `p` (clamped to [0, 1]).
    pub fn chance(&mut self, p: f64) -> bool {
        self.uniform() < p.clamp(0.0, 1.0)
    }

    /// Index drawn proportionally to `weights`. Non-positive and non-finite
    /// weights never win; an all-zero slice yields index 0.
    pub fn pick_weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
        if total <= 0.0 {
            return 0;
        }
        let mut roll = self.uniform() * total;
        for (idx, w) in weights.iter().enumerate() {
            if !w.is_finite() || *w <= 0.0 {
                continue;
            }
            if roll < *w {
                return idx;
            }
            roll -= w;
        }
        weights
            .iter()
            .rposition(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(0)
    }

    /// Independent child stream: parent's next raw output XOR hash(tag).
    pub fn fork(&mut self, tag: &str) -> SimRng {
        let raw = self.next_raw();
        SimRng::new(raw ^ fxhash::hash32(tag))
    }
}

// Lets `rand_distr` distributions sample from a SimRng.
impl RngCore for SimRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
        self.inner.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SimRng::new(42);
        let mut b = SimRng::new(42);
        for _ in 0..200 {
            assert_eq!(a.next_raw(), b.next_raw());
        }
        assert_eq!(a.uniform(), b.uniform());
        assert_eq!(a.normal(3.0, 2.0), b.normal(3.0, 2.0));
    }

    #[test]
    fn test_zero_seed_maps_to_default() {
        let mut zero = SimRng::new(0);
        let mut default = SimRng::new(DEFAULT_SEED);
        assert_eq!(zero.seed(), DEFAULT_SEED);
        assert_eq!(zero.next_raw(), default.next_raw());
    }

    #[test]
    fn test_uniform_and_int_bounds() {
        let mut rng = SimRng::new(7);
        for _ in 0..10_000 {
            let u = rng.uniform();
            assert!((0.0..1.0).contains(&u));
            assert!(rng.int(5) < 5);
            let r = rng.range(-3.0, 4.0);
            assert!((-3.0..4.0).contains(&r));
        }
        assert_eq!(rng.int(0), 0);
    }

    #[test]
    fn test_normal_moments() {
        let mut rng = SimRng::new(1234);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| rng.normal(5.0, 2.0)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 5.0).abs() < 0.1, "mean was {}", mean);
        assert!((var.sqrt() - 2.0).abs() < 0.1, "sd was {}", var.sqrt());
        assert!(samples.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_log_normal_is_positive_and_monotone_in_mu() {
        let mut a = SimRng::new(11);
        let mut b = SimRng::new(11);
        for _ in 0..1_000 {
            let lo = a.log_normal(0.0, 0.5);
            let hi = b.log_normal(0.4, 0.5);
            assert!(lo > 0.0);
            assert!(hi > lo);
        }
    }

    #[test]
    fn test_fork_is_deterministic_and_tag_sensitive() {
        let mut p1 = SimRng::new(99);
        let mut p2 = SimRng::new(99);
        let mut c1 = p1.fork(stream::PLAY);
        let mut c2 = p2.fork(stream::PLAY);
        assert_eq!(c1.next_raw(), c2.next_raw());

        let mut p3 = SimRng::new(99);
        let mut other = p3.fork(stream::ENV);
        let mut p4 = SimRng::new(99);
        let mut play = p4.fork(stream::PLAY);
        let a: Vec<u32> = (0..8).map(|_| other.next_raw()).collect();
        let b: Vec<u32> = (0..8).map(|_| play.next_raw()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_fork_advances_parent() {
        let mut parent = SimRng::new(5);
        let mut untouched = SimRng::new(5);
        let _child = parent.fork("x");
        untouched.next_raw();
        assert_eq!(parent.next_raw(), untouched.next_raw());
    }

    #[test]
    fn test_pick_weighted_respects_zero_weights() {
        let mut rng = SimRng::new(3);
        for _ in 0..500 {
            let idx = rng.pick_weighted(&[0.0, 2.0, f64::NAN, 1.0]);
            assert!(idx == 1 || idx == 3);
        }
        assert_eq!(rng.pick_weighted(&[0.0, 0.0]), 0);
    }
}
