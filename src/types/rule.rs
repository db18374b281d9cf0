//! Rule and tier types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::AssetReference;

/// A rule tier. Tiers are scanned in declaration order; see
/// [`matcher`](crate::matcher) for how each tier is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Verbatim name rules.
    Exact,
    /// Name rules compared after lowercasing.
    CaseInsensitive,
    /// Name rules compared after full normalization.
    Normalized,
    /// Name rules matched on individual words.
    PartialWord,
    /// Keyword rules matched against the expanded keyword set.
    Keyword,
    /// Category (culture) rules matched against the category hint.
    CategoryFallback,
    /// Domain keywords searched for inside the name.
    CategoryKeyword,
}

impl Tier {
    /// All tiers in cascade order.
    pub const ALL: [Tier; 7] = [
        Tier::Exact,
        Tier::CaseInsensitive,
        Tier::Normalized,
        Tier::PartialWord,
        Tier::Keyword,
        Tier::CategoryFallback,
        Tier::CategoryKeyword,
    ];

    /// Name tiers, consulted by the partial-word and keyword steps.
    pub const NAME: [Tier; 4] = [
        Tier::Exact,
        Tier::CaseInsensitive,
        Tier::Normalized,
        Tier::PartialWord,
    ];

    /// Position of this tier in [`Tier::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable snake_case name, used in logs and metric labels.
    pub const fn as_str(self) -> &'static str {
        match self {
            Tier::Exact => "exact",
            Tier::CaseInsensitive => "case_insensitive",
            Tier::Normalized => "normalized",
            Tier::PartialWord => "partial_word",
            Tier::Keyword => "keyword",
            Tier::CategoryFallback => "category_fallback",
            Tier::CategoryKeyword => "category_keyword",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single `pattern → reference` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Name, keyword, or category pattern.
    pub pattern: String,
    /// Reference returned when the rule matches.
    pub reference: AssetReference,
    /// Tier the rule belongs to.
    pub tier: Tier,
}

impl Rule {
    /// Create a rule.
    pub fn new(tier: Tier, pattern: impl Into<String>, reference: AssetReference) -> Self {
        Self {
            pattern: pattern.into(),
            reference,
            tier,
        }
    }
}
