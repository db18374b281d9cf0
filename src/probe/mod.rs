//! Reachability probing with bounded retry.
//!
//! [`Prober::verify`] answers "is this reference usable right now?":
//!
//! 1. Local references are always valid; no cache, no network.
//! 2. A live [`VerificationCache`] entry answers immediately.
//! 3. Otherwise up to [`ProbeConfig::max_attempts`] attempts are made, each
//!    bounded by [`ProbeConfig::attempt_timeout`], with exponential backoff
//!    between them. Timeouts and transport errors are failed attempts, not
//!    errors.
//! 4. The terminal result is written to the cache before returning.
//!
//! ```text
//! Pending ──ok──▶ Succeeded
//!    │
//!    └─err──▶ Retry ──(backoff)──▶ Pending …  ──(last attempt err)──▶ Failed
//! ```

pub mod http;
pub mod traits;

pub use http::HttpReachability;
pub use traits::ReachabilityCheck;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tracing::{debug, warn};

use crate::cache::VerificationCache;
use crate::telemetry;
use crate::types::AssetReference;
use crate::{Result, SigilError};

/// Configuration for probing.
///
/// ```rust
/// # use sigil::ProbeConfig;
/// # use std::time::Duration;
/// let config = ProbeConfig::new()
///     .max_attempts(5)
///     .attempt_timeout(Duration::from_secs(3))
///     .backoff_base(Duration::from_millis(250));
/// assert_eq!(config.delay_for_attempt(2), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Maximum number of attempts, including the first. Default: 3.
    pub max_attempts: u32,
    /// Timeout applied to each attempt independently. Default: 8s.
    pub attempt_timeout: Duration,
    /// Delay after the first failed attempt; doubles each retry. Default: 1s.
    pub backoff_base: Duration,
    /// Upper bound on any single backoff delay. Default: 60s.
    pub max_backoff: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(8),
            backoff_base: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl ProbeConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum attempts (including the first). Values below 1 act as 1.
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the per-attempt timeout.
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Set the delay after the first failed attempt.
    pub fn backoff_base(mut self, delay: Duration) -> Self {
        self.backoff_base = delay;
        self
    }

    /// Set the maximum backoff delay.
    pub fn max_backoff(mut self, delay: Duration) -> Self {
        self.max_backoff = delay;
        self
    }

    /// Delay after failed attempt `attempt` (0-indexed):
    /// `backoff_base * 2^attempt`, capped at `max_backoff`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .backoff_base
            .saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.max_backoff)
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// How a verification call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Local reference; nothing was checked.
    Local,
    /// Answered from a live cache entry.
    Cached { is_valid: bool },
    /// Reached on attempt number `attempts`.
    Succeeded { attempts: u32 },
    /// All `attempts` failed.
    Failed { attempts: u32 },
    /// Cancelled after `attempts` failed attempts; nothing was cached.
    Cancelled { attempts: u32 },
}

impl ProbeOutcome {
    /// Whether the reference should be treated as usable.
    pub fn is_valid(self) -> bool {
        match self {
            ProbeOutcome::Local | ProbeOutcome::Succeeded { .. } => true,
            ProbeOutcome::Cached { is_valid } => is_valid,
            ProbeOutcome::Failed { .. } | ProbeOutcome::Cancelled { .. } => false,
        }
    }

    /// Network attempts made by this call.
    pub fn attempts(self) -> u32 {
        match self {
            ProbeOutcome::Local | ProbeOutcome::Cached { .. } => 0,
            ProbeOutcome::Succeeded { attempts }
            | ProbeOutcome::Failed { attempts }
            | ProbeOutcome::Cancelled { attempts } => attempts,
        }
    }

    /// Metric label.
    pub fn as_str(self) -> &'static str {
        match self {
            ProbeOutcome::Local => "local",
            ProbeOutcome::Cached { .. } => "cached",
            ProbeOutcome::Succeeded { .. } => "reachable",
            ProbeOutcome::Failed { .. } => "unreachable",
            ProbeOutcome::Cancelled { .. } => "cancelled",
        }
    }
}

/// Verifies remote references, caching the verdicts.
pub struct Prober {
    cache: Arc<VerificationCache>,
    checker: Arc<dyn ReachabilityCheck>,
    config: ProbeConfig,
}

impl Prober {
    /// Create a prober writing into `cache`.
    pub fn new(
        cache: Arc<VerificationCache>,
        checker: Arc<dyn ReachabilityCheck>,
        config: ProbeConfig,
    ) -> Self {
        Self {
            cache,
            checker,
            config,
        }
    }

    /// The cache this prober reads and writes.
    pub fn cache(&self) -> &Arc<VerificationCache> {
        &self.cache
    }

    /// Probe configuration.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Whether `reference` is usable. Never fails.
    pub async fn verify(&self, reference: &AssetReference) -> bool {
        self.probe(reference).await.is_valid()
    }

    /// Verify and report how the verdict was reached.
    pub async fn probe(&self, reference: &AssetReference) -> ProbeOutcome {
        self.probe_until(reference, std::future::pending()).await
    }

    /// Verify, stopping early once `cancel` completes.
    ///
    /// Cancellation is observed between attempts: an attempt in flight
    /// always finishes, and a success is still cached. Once cancelled, no
    /// further attempt starts and no failure verdict is written.
    pub async fn probe_until<F>(&self, reference: &AssetReference, cancel: F) -> ProbeOutcome
    where
        F: Future<Output = ()>,
    {
        let outcome = self.run(reference, cancel).await;
        metrics::counter!(telemetry::PROBES_TOTAL, "outcome" => outcome.as_str()).increment(1);
        outcome
    }

    async fn run<F>(&self, reference: &AssetReference, cancel: F) -> ProbeOutcome
    where
        F: Future<Output = ()>,
    {
        if reference.is_local {
            return ProbeOutcome::Local;
        }
        let key = reference.location.as_str();
        if let Some(entry) = self.cache.lookup(key) {
            return ProbeOutcome::Cached {
                is_valid: entry.is_valid,
            };
        }

        let mut cancel = std::pin::pin!(cancel);
        let max_attempts = self.config.attempts();
        for attempt in 0..max_attempts {
            let err = match self.attempt(key).await {
                Ok(()) => {
                    self.cache.record(key, reference.clone(), true, attempt);
                    debug!(location = key, attempts = attempt + 1, "remote asset reachable");
                    return ProbeOutcome::Succeeded {
                        attempts: attempt + 1,
                    };
                }
                Err(e) => e,
            };

            let attempts = attempt + 1;
            if attempts == max_attempts {
                warn!(
                    check = self.checker.name(),
                    location = key,
                    attempts,
                    error = %err,
                    "remote asset unreachable"
                );
                break;
            }
            if cancel.as_mut().now_or_never().is_some() {
                return ProbeOutcome::Cancelled { attempts };
            }

            let delay = self.config.delay_for_attempt(attempt);
            warn!(
                check = self.checker.name(),
                location = key,
                attempt = attempts,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "retrying reachability check"
            );
            tokio::select! {
                biased;
                _ = cancel.as_mut() => return ProbeOutcome::Cancelled { attempts },
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.cache
            .record(key, reference.clone(), false, max_attempts - 1);
        ProbeOutcome::Failed {
            attempts: max_attempts,
        }
    }

    /// One attempt, bounded by the per-attempt timeout.
    async fn attempt(&self, location: &str) -> Result<()> {
        let timeout = self.config.attempt_timeout;
        let result = match tokio::time::timeout(timeout, self.checker.check(location)).await {
            Ok(result) => result,
            Err(_) => Err(SigilError::Timeout(timeout)),
        };
        let label = match &result {
            Ok(()) => "ok",
            Err(SigilError::Timeout(_)) => "timeout",
            Err(_) => "error",
        };
        metrics::counter!(telemetry::PROBE_ATTEMPTS_TOTAL, "outcome" => label).increment(1);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_is_one_then_two_seconds() {
        let config = ProbeConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.attempt_timeout, Duration::from_secs(8));
        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));
    }

    #[test]
    fn delay_is_capped() {
        let config = ProbeConfig::new().max_backoff(Duration::from_secs(5));
        assert_eq!(config.delay_for_attempt(10), Duration::from_secs(5));
        assert_eq!(config.delay_for_attempt(u32::MAX), Duration::from_secs(5));
    }

    #[test]
    fn zero_attempts_acts_as_one() {
        assert_eq!(ProbeConfig::new().max_attempts(0).attempts(), 1);
    }

    #[test]
    fn outcome_validity() {
        assert!(ProbeOutcome::Local.is_valid());
        assert!(ProbeOutcome::Succeeded { attempts: 2 }.is_valid());
        assert!(ProbeOutcome::Cached { is_valid: true }.is_valid());
        assert!(!ProbeOutcome::Cached { is_valid: false }.is_valid());
        assert!(!ProbeOutcome::Failed { attempts: 3 }.is_valid());
        assert!(!ProbeOutcome::Cancelled { attempts: 1 }.is_valid());
        assert_eq!(ProbeOutcome::Failed { attempts: 3 }.attempts(), 3);
        assert_eq!(ProbeOutcome::Cached { is_valid: true }.attempts(), 0);
    }
}
