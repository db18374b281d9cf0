//! Rule file loading.
//!
//! Rule files are JSON. The versioned format is preferred:
//!
//! ```json
//! {
//!   "version": 1,
//!   "rules": [
//!     { "pattern": "Ankh", "tier": "exact", "reference": "/assets/symbols/ankh.svg" }
//!   ],
//!   "last_resort": {
//!     "short_name": "/assets/symbols/glyph.svg",
//!     "multi_word": "/assets/symbols/emblem.svg",
//!     "default": "/assets/symbols/default.svg"
//!   }
//! }
//! ```
//!
//! A bare array of rules is accepted too and keeps the built-in
//! last-resort references.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{LastResort, RuleTable};
use crate::types::{Rule, Tier};
use crate::{Result, SigilError};

/// Maximum supported rule file format version.
const MAX_SUPPORTED_VERSION: u32 = 1;

/// Versioned payload wrapper for rule files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    /// Format version (currently 1).
    pub version: u32,
    /// Rules in declared order.
    pub rules: Vec<Rule>,
    /// Optional replacement for the built-in last-resort references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_resort: Option<LastResort>,
}

/// Accept both versioned and bare-array formats.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPayload {
    Versioned(RuleSet),
    Legacy(Vec<Rule>),
}

/// Parse a rule file payload into a table.
///
/// Fails on malformed JSON, an unsupported version, or an invalid rule.
pub fn parse_rules(json: &str) -> Result<RuleTable> {
    let payload: RawPayload = serde_json::from_str(json).map_err(|e| {
        SigilError::Configuration(format!("failed to parse rule JSON: {e}"))
    })?;
    let set = match payload {
        RawPayload::Versioned(set) => {
            if set.version > MAX_SUPPORTED_VERSION {
                return Err(SigilError::Configuration(format!(
                    "unsupported rule file version {} (max supported: {MAX_SUPPORTED_VERSION})",
                    set.version
                )));
            }
            set
        }
        RawPayload::Legacy(rules) => RuleSet {
            version: MAX_SUPPORTED_VERSION,
            rules,
            last_resort: None,
        },
    };

    let mut table = RuleTable::from_rules(set.rules)?;
    if let Some(last_resort) = set.last_resort {
        table.set_last_resort(last_resort)?;
    }
    Ok(table)
}

/// Load a rule table from a JSON file.
pub fn load_file(path: &Path) -> Result<RuleTable> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SigilError::Configuration(format!("failed to read rule file {}: {e}", path.display()))
    })?;
    let table = parse_rules(&content)
        .inspect_err(|e| warn!(path = %path.display(), error = %e, "rejected rule file"))?;
    info!(
        path = %path.display(),
        rules = table.len(),
        "loaded rule table"
    );
    Ok(table)
}

/// Serialize a table back to the versioned format.
///
/// Rules are written tier by tier, keeping their order within each tier.
pub fn to_json(table: &RuleTable) -> Result<String> {
    let set = RuleSet {
        version: MAX_SUPPORTED_VERSION,
        rules: Tier::ALL
            .iter()
            .flat_map(|t| table.rules(*t).cloned())
            .collect(),
        last_resort: Some(table.last_resort().clone()),
    };
    Ok(serde_json::to_string_pretty(&set)?)
}
