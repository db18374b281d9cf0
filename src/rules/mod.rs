//! Rule tables: ordered, tiered `pattern → reference` configuration.
//!
//! A [`RuleTable`] holds one ordered list per [`Tier`]. Order within a tier
//! is part of the matching contract (first match wins), so tiers are
//! stored as `Vec`s, never maps. Each rule's case-folded and normalized
//! forms are computed once at insertion.
//!
//! Tables are supplied by the surrounding application:
//! 1. **Embedded seed**: compiled-in JSON, always available
//! 2. **Rule file**: loaded with [`loader::load_file`]
//!
//! The table is read-only once handed to a resolver; share it with `Arc`.

pub mod lexicon;
pub mod loader;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::normalize::normalize;
use crate::types::{AssetReference, Rule, Tier};
use crate::{Result, SigilError};

/// A rule together with its precomputed comparison forms.
#[derive(Debug, Clone)]
pub(crate) struct IndexedRule {
    pub rule: Rule,
    /// `pattern.to_lowercase()`
    pub folded: String,
    /// `normalize(pattern)`
    pub canonical: String,
}

/// References used when no rule matches, chosen by the shape of the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastResort {
    /// Used for names of at most `short_name_max_chars` characters.
    pub short_name: AssetReference,
    /// Used for names of two or more words.
    pub multi_word: AssetReference,
    /// Used for everything else, including empty names.
    pub default: AssetReference,
    /// Length threshold for `short_name`. Default: 3.
    #[serde(default = "default_short_name_max_chars")]
    pub short_name_max_chars: usize,
}

fn default_short_name_max_chars() -> usize {
    3
}

impl Default for LastResort {
    fn default() -> Self {
        Self {
            short_name: AssetReference::local("/assets/symbols/glyph.svg"),
            multi_word: AssetReference::local("/assets/symbols/emblem.svg"),
            default: AssetReference::local("/assets/symbols/default.svg"),
            short_name_max_chars: default_short_name_max_chars(),
        }
    }
}

impl LastResort {
    fn validate(&self) -> Result<()> {
        for (slot, reference) in [
            ("short_name", &self.short_name),
            ("multi_word", &self.multi_word),
            ("default", &self.default),
        ] {
            if reference.location.trim().is_empty() {
                return Err(SigilError::InvalidRule(format!(
                    "last-resort reference '{slot}' has an empty location"
                )));
            }
        }
        Ok(())
    }
}

/// Ordered, tiered rule table.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    tiers: [Vec<IndexedRule>; Tier::ALL.len()],
    last_resort: LastResort,
}

impl RuleTable {
    /// Create an empty table with the built-in last-resort references.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from rules, preserving their order within each tier.
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Result<Self> {
        let mut table = Self::new();
        for rule in rules {
            table.push(rule)?;
        }
        Ok(table)
    }

    /// Append a rule to the end of its tier.
    ///
    /// Rejects rules whose pattern or location is blank.
    pub fn push(&mut self, rule: Rule) -> Result<()> {
        if rule.pattern.trim().is_empty() {
            return Err(SigilError::InvalidRule(format!(
                "empty pattern in {} tier",
                rule.tier
            )));
        }
        if rule.reference.location.trim().is_empty() {
            return Err(SigilError::InvalidRule(format!(
                "rule '{}' has an empty location",
                rule.pattern
            )));
        }
        let canonical = normalize(&rule.pattern);
        if canonical.is_empty() {
            warn!(
                pattern = %rule.pattern,
                tier = %rule.tier,
                "rule pattern normalizes to nothing; it can only match verbatim"
            );
        }
        let indexed = IndexedRule {
            folded: rule.pattern.to_lowercase(),
            canonical,
            rule,
        };
        self.tiers[indexed.rule.tier.index()].push(indexed);
        Ok(())
    }

    /// Builder-style [`push`](Self::push).
    pub fn with_rule(mut self, tier: Tier, pattern: &str, reference: AssetReference) -> Result<Self> {
        self.push(Rule::new(tier, pattern, reference))?;
        Ok(self)
    }

    /// Replace the last-resort references.
    pub fn set_last_resort(&mut self, last_resort: LastResort) -> Result<()> {
        last_resort.validate()?;
        self.last_resort = last_resort;
        Ok(())
    }

    /// Last-resort references.
    pub fn last_resort(&self) -> &LastResort {
        &self.last_resort
    }

    /// Rules of one tier, in declared order.
    pub fn rules(&self, tier: Tier) -> impl Iterator<Item = &Rule> {
        self.tiers[tier.index()].iter().map(|r| &r.rule)
    }

    pub(crate) fn indexed(&self, tier: Tier) -> &[IndexedRule] {
        &self.tiers[tier.index()]
    }

    /// Indexed rules across several tiers, tier-major.
    pub(crate) fn indexed_in<'a>(&'a self, tiers: &[Tier]) -> impl Iterator<Item = &'a IndexedRule> {
        tiers.iter().flat_map(move |t| self.indexed(*t).iter())
    }

    /// Number of rules in one tier.
    pub fn tier_len(&self, tier: Tier) -> usize {
        self.tiers[tier.index()].len()
    }

    /// Total number of rules.
    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    /// Whether the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a table pre-populated with the embedded seed data.
    ///
    /// The seed is a small curated set of well-known symbols. It's always
    /// available as a fallback when no rule file is configured.
    pub fn with_embedded_seed() -> Self {
        match loader::parse_rules(EMBEDDED_SEED) {
            Ok(table) => table,
            Err(e) => {
                // Seed is compiled in and tested; an empty table still resolves.
                warn!(error = %e, "failed to parse embedded rule seed");
                Self::new()
            }
        }
    }
}

/// Raw JSON seed data compiled into the binary.
const EMBEDDED_SEED: &str = include_str!("seed.json");
