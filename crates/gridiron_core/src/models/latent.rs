//! Latent ability profile
//!
//! Five named groups (Athletic, Cognitive, Technical, Psyche, Variance), each
//! a component-name → [0,1] map. Lookups never fail: an absent component
//! reads as [`NEUTRAL`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fallback for any absent component.
pub const NEUTRAL: f64 = 0.5;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(transparent)]
pub struct LatentGroup(BTreeMap<String, f64>);

impl LatentGroup {
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), sanitize(v)))
                .collect(),
        )
    }

    /// Component value, or [`NEUTRAL`] when absent.
    pub fn get(&self, name: &str) -> f64 {
        self.0.get(name).copied().unwrap_or(NEUTRAL)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        NEUTRAL
    }
}

/// Derived ability vectors owned by one player.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct LatentProfile {
    #[serde(default)]
    pub athletic: LatentGroup,
    #[serde(default)]
    pub cognitive: LatentGroup,
    #[serde(default)]
    pub technical: LatentGroup,
    #[serde(default)]
    pub psyche: LatentGroup,
    #[serde(default)]
    pub variance: LatentGroup,
}

impl LatentProfile {
    /// Shorthand accessors, named after the group initials (A, C, T, P, V).
    pub fn a(&self, name: &str) -> f64 {
        self.athletic.get(name)
    }

    pub fn c(&self, name: &str) -> f64 {
        self.cognitive.get(name)
    }

    pub fn t(&self, name: &str) -> f64 {
        self.technical.get(name)
    }

    pub fn p(&self, name: &str) -> f64 {
        self.psyche.get(name)
    }

    pub fn v(&self, name: &str) -> f64 {
        self.variance.get(name)
    }

    /// True when nothing has been derived yet.
    pub fn is_empty(&self) -> bool {
        self.athletic.is_empty()
            && self.cognitive.is_empty()
            && self.technical.is_empty()
            && self.psyche.is_empty()
            && self.variance.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_component_reads_neutral() {
        let profile = LatentProfile::default();
        assert_eq!(profile.a("speed"), NEUTRAL);
        assert_eq!(profile.v("anything"), NEUTRAL);
        assert!(profile.is_empty());
    }

    #[test]
    fn test_group_sanitizes_values() {
        let g = LatentGroup::from_pairs([("hi", 1.7), ("lo", -0.2), ("nan", f64::NAN)]);
        assert_eq!(g.get("hi"), 1.0);
        assert_eq!(g.get("lo"), 0.0);
        assert_eq!(g.get("nan"), NEUTRAL);
        assert_eq!(g.len(), 3);
    }
}
