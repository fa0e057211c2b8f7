//! # Simulation Configuration
//!
//! Every tunable lives here with exactly one documented default, resolved
//! once when the options are built. Partial JSON works everywhere because
//! every struct is `#[serde(default)]`.
//!
//! ## Usage
//! ```rust
//! use gridiron_core::engine::config::{RuleConfig, SimOptions};
//!
//! let options = SimOptions::seeded(42);
//! let playoff = SimOptions::seeded(7).with_rules(RuleConfig::playoff());
//! assert!(!playoff.rules.allow_ties);
//! # let _ = options;
//! ```

mod rule_config;
mod tuning_config;

pub use rule_config::RuleConfig;
pub use tuning_config::PlayTuning;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Options for one `simulate_game` call.
///
/// `seed: None` selects unseeded mode: a seed is drawn from host entropy,
/// logged and recorded in the result, so even an unseeded game can be
/// replayed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SimOptions {
    pub seed: Option<u32>,
    #[serde(alias = "rule_config")]
    pub rules: RuleConfig,
}

impl SimOptions {
    pub fn seeded(seed: u32) -> Self {
        Self {
            seed: Some(seed),
            rules: RuleConfig::default(),
        }
    }

    pub fn unseeded() -> Self {
        Self::default()
    }

    pub fn with_rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SimOptions::default();
        assert_eq!(options.seed, None);
        assert_eq!(options.rules.quarter_length_sec, 900);
        assert_eq!(options.rules.num_quarters, 4);
        assert_eq!(options.rules.max_overtime_quarters, 1);
        assert!(options.rules.allow_ties);
    }

    #[test]
    fn test_partial_json() {
        let options: SimOptions =
            serde_json::from_str(r#"{"seed": 9, "rule_config": {"allow_ties": false}}"#).unwrap();
        assert_eq!(options.seed, Some(9));
        assert!(!options.rules.allow_ties);
        assert_eq!(options.rules.quarter_length_sec, 900);

        let empty: SimOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, SimOptions::default());
    }
}
