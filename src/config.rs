//! Configuration loading.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (explicit path; must exist)
//! 2. `~/.sigil/config.toml` (user)
//! 3. `/etc/sigil/config.toml` (system)
//! 4. Built-in defaults
//!
//! ```toml
//! [rules]
//! path = "/etc/sigil/rules.json"
//!
//! [cache]
//! ttl_secs = 1800
//! max_entries = 10000
//! prune_interval_secs = 300
//!
//! [probe]
//! max_attempts = 3
//! attempt_timeout_secs = 8
//! backoff_base_ms = 1000
//! max_backoff_secs = 60
//! user_agent = "sigil/0.1"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::probe::ProbeConfig;
use crate::{Result, SigilError};

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesSection,
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub probe: ProbeSection,
}

/// Rule table source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesSection {
    /// Rule file to load. The embedded seed is used when absent.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Verification cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Entry time-to-live in seconds (default: 1800).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Maximum stored entries (default: 10000).
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    /// Interval of the periodic prune sweep in seconds; 0 disables it (default: 0).
    #[serde(default)]
    pub prune_interval_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
            prune_interval_secs: 0,
        }
    }
}

impl CacheSection {
    /// Prune interval, or `None` if periodic pruning is disabled.
    pub fn prune_interval(&self) -> Option<Duration> {
        (self.prune_interval_secs > 0).then(|| Duration::from_secs(self.prune_interval_secs))
    }
}

fn default_ttl_secs() -> u64 {
    30 * 60
}

fn default_max_entries() -> u64 {
    10_000
}

/// Prober settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeSection {
    /// Attempts per verification, including the first (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Per-attempt timeout in seconds (default: 8).
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,
    /// Delay after the first failed attempt in milliseconds (default: 1000).
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Cap on any backoff delay in seconds (default: 60).
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,
    /// User agent for HTTP checks.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for ProbeSection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            attempt_timeout_secs: default_attempt_timeout_secs(),
            backoff_base_ms: default_backoff_base_ms(),
            max_backoff_secs: default_max_backoff_secs(),
            user_agent: None,
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_attempt_timeout_secs() -> u64 {
    8
}

fn default_backoff_base_ms() -> u64 {
    1000
}

fn default_max_backoff_secs() -> u64 {
    60
}

impl From<&CacheSection> for CacheConfig {
    fn from(section: &CacheSection) -> Self {
        CacheConfig::new()
            .ttl(Duration::from_secs(section.ttl_secs))
            .max_entries(section.max_entries)
    }
}

impl From<&ProbeSection> for ProbeConfig {
    fn from(section: &ProbeSection) -> Self {
        ProbeConfig::new()
            .max_attempts(section.max_attempts)
            .attempt_timeout(Duration::from_secs(section.attempt_timeout_secs))
            .backoff_base(Duration::from_millis(section.backoff_base_ms))
            .max_backoff(Duration::from_secs(section.max_backoff_secs))
    }
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist. Without one, the first existing
    /// standard file is used, and defaults apply if there is none.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a configuration file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SigilError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            SigilError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(SigilError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".sigil").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/sigil/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }
}
