//! Builder for configuring resolver instances

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::{AssetResolver, Rehoster};
use crate::Result;
use crate::cache::{CacheConfig, VerificationCache};
use crate::config::Config;
use crate::probe::{HttpReachability, ProbeConfig, Prober, ReachabilityCheck};
use crate::rules::{RuleTable, loader};

/// Main entry point for creating resolver instances.
pub struct Sigil;

impl Sigil {
    /// Create a new builder for configuring the resolver.
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }
}

/// Builder for configuring resolver instances.
///
/// Everything is optional: the default resolver uses the embedded seed
/// rules, a fresh 30-minute cache and HTTP probing.
#[derive(Default)]
pub struct ResolverBuilder {
    rules: Option<RuleTable>,
    rules_file: Option<PathBuf>,
    cache: Option<Arc<VerificationCache>>,
    cache_config: CacheConfig,
    probe_config: ProbeConfig,
    checker: Option<Arc<dyn ReachabilityCheck>>,
    user_agent: Option<String>,
    rehoster: Option<Arc<dyn Rehoster>>,
    prune_interval: Option<Duration>,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the builder from a loaded [`Config`].
    pub fn config(mut self, config: &Config) -> Self {
        self.rules_file = config.rules.path.clone();
        self.cache_config = CacheConfig::from(&config.cache);
        self.probe_config = ProbeConfig::from(&config.probe);
        self.user_agent = config.probe.user_agent.clone();
        self.prune_interval = config.cache.prune_interval();
        self
    }

    /// Use an in-memory rule table. Takes precedence over a rule file.
    pub fn rules(mut self, rules: RuleTable) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Load rules from a JSON file at build time.
    pub fn rules_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules_file = Some(path.into());
        self
    }

    /// Configure the verification cache created at build time.
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Share an existing verification cache instead of creating one.
    pub fn cache(mut self, cache: Arc<VerificationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Configure retry, backoff and timeout for probing.
    pub fn probe_config(mut self, config: ProbeConfig) -> Self {
        self.probe_config = config;
        self
    }

    /// Replace the default HTTP reachability check.
    pub fn checker(mut self, checker: Arc<dyn ReachabilityCheck>) -> Self {
        self.checker = Some(checker);
        self
    }

    /// Set the user agent of the default HTTP check.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Hand confirmed-unreachable references to a re-host pipeline.
    pub fn rehoster(mut self, rehoster: Arc<dyn Rehoster>) -> Self {
        self.rehoster = Some(rehoster);
        self
    }

    /// Sweep expired cache entries every `interval` for the resolver's
    /// lifetime. Needs a tokio runtime at build time. A zero interval
    /// disables the sweep.
    pub fn prune_interval(mut self, interval: Duration) -> Self {
        self.prune_interval = (!interval.is_zero()).then_some(interval);
        self
    }

    /// Build the resolver.
    ///
    /// Fails only if a configured rule file can't be loaded or the HTTP
    /// client can't be built.
    pub fn build(self) -> Result<AssetResolver> {
        let rules = match (self.rules, self.rules_file) {
            (Some(rules), _) => rules,
            (None, Some(path)) => loader::load_file(&path)?,
            (None, None) => RuleTable::with_embedded_seed(),
        };

        let checker: Arc<dyn ReachabilityCheck> = match self.checker {
            Some(checker) => checker,
            None => match self.user_agent.as_deref() {
                Some(ua) => Arc::new(HttpReachability::with_user_agent(ua)?),
                None => Arc::new(HttpReachability::new()?),
            },
        };

        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(VerificationCache::new(&self.cache_config)));

        info!(
            rules = rules.len(),
            check = checker.name(),
            ttl_secs = cache.ttl().as_secs(),
            max_attempts = self.probe_config.max_attempts,
            "asset resolver ready"
        );

        let pruner = self.prune_interval.and_then(|interval| {
            if tokio::runtime::Handle::try_current().is_err() {
                warn!("no tokio runtime at build time; periodic cache pruning disabled");
                return None;
            }
            Arc::clone(&cache)
                .spawn_pruner(interval)
                .inspect_err(|e| warn!(error = %e, "periodic cache pruning disabled"))
                .ok()
        });

        let prober = Prober::new(cache, checker, self.probe_config);
        Ok(AssetResolver::new(
            Arc::new(rules),
            prober,
            self.rehoster,
            pruner,
        ))
    }
}
