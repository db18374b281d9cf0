//! Resolution result types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{AssetReference, Tier};

/// The cascade step that produced a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// A rule in one of the seven rule tiers matched.
    Rule(Tier),
    /// Nothing matched; the shape heuristic picked the reference.
    LastResort,
}

impl MatchTier {
    /// Stable snake_case name, used in logs and metric labels.
    pub const fn as_str(self) -> &'static str {
        match self {
            MatchTier::Rule(tier) => tier.as_str(),
            MatchTier::LastResort => "last_resort",
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A resolved reference together with how it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// The resolved reference. Never has an empty location.
    pub reference: AssetReference,
    /// Cascade step that produced it.
    pub tier: MatchTier,
    /// Pattern of the matching rule, if a rule matched.
    pub pattern: Option<String>,
}
