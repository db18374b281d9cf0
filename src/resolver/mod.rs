//! Resolver facade.
//!
//! [`AssetResolver`] ties a [`RuleTable`], the [`matcher`](crate::matcher)
//! and a [`Prober`] together:
//!
//! - [`resolve`](AssetResolver::resolve) is synchronous and never touches
//!   the network.
//! - [`verify`](AssetResolver::verify) is the only operation doing I/O.
//! - [`resolve_verified`](AssetResolver::resolve_verified) chains both and
//!   hands unreachable remote references to an optional [`Rehoster`].

mod builder;
mod rehost;

pub use builder::{ResolverBuilder, Sigil};
pub use rehost::Rehoster;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::Result;
use crate::cache::VerificationCache;
use crate::matcher;
use crate::probe::{ProbeOutcome, Prober};
use crate::rules::RuleTable;
use crate::types::{AssetReference, MatchRequest, Resolution};

/// Reachability verdict for a resolved reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Local reference; always usable.
    Local,
    /// Remote reference confirmed (or cached as) reachable.
    Reachable,
    /// Remote reference unreachable and no replacement was produced.
    Unreachable,
    /// Remote reference unreachable; the re-host pipeline replaced it.
    Rehosted(AssetReference),
}

/// A resolution plus its reachability verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified {
    /// What the matcher produced.
    pub resolution: Resolution,
    /// Whether it is usable.
    pub verdict: Verdict,
}

impl Verified {
    /// The reference callers should display: the replacement if one was
    /// produced, otherwise the resolved reference.
    pub fn reference(&self) -> &AssetReference {
        match &self.verdict {
            Verdict::Rehosted(replacement) => replacement,
            _ => &self.resolution.reference,
        }
    }
}

/// Resolution engine: rules, matcher, verification cache and prober.
pub struct AssetResolver {
    rules: Arc<RuleTable>,
    prober: Prober,
    rehoster: Option<Arc<dyn Rehoster>>,
    pruner: Option<JoinHandle<()>>,
}

impl AssetResolver {
    pub(crate) fn new(
        rules: Arc<RuleTable>,
        prober: Prober,
        rehoster: Option<Arc<dyn Rehoster>>,
        pruner: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            rules,
            prober,
            rehoster,
            pruner,
        }
    }

    /// The rule table in use.
    pub fn rules(&self) -> &Arc<RuleTable> {
        &self.rules
    }

    /// The verification cache in use.
    pub fn cache(&self) -> &Arc<VerificationCache> {
        self.prober.cache()
    }

    /// Resolve a request to a reference. Synchronous, never fails.
    pub fn resolve(&self, request: &MatchRequest) -> AssetReference {
        matcher::resolve(request, &self.rules)
    }

    /// Resolve and report which cascade step matched.
    pub fn explain(&self, request: &MatchRequest) -> Resolution {
        matcher::explain(request, &self.rules)
    }

    /// Whether `reference` is usable right now.
    pub async fn verify(&self, reference: &AssetReference) -> bool {
        self.prober.verify(reference).await
    }

    /// Verify and report how the verdict was reached.
    pub async fn probe(&self, reference: &AssetReference) -> ProbeOutcome {
        self.prober.probe(reference).await
    }

    /// Verify with cooperative cancellation; see [`Prober::probe_until`].
    pub async fn probe_until<F>(&self, reference: &AssetReference, cancel: F) -> ProbeOutcome
    where
        F: Future<Output = ()>,
    {
        self.prober.probe_until(reference, cancel).await
    }

    /// Verify several references concurrently, preserving input order.
    pub async fn verify_all(&self, references: &[AssetReference]) -> Vec<bool> {
        join_all(references.iter().map(|r| self.prober.verify(r))).await
    }

    /// Resolve, verify, and re-host if the reference turned out unreachable.
    pub async fn resolve_verified(&self, request: &MatchRequest) -> Verified {
        let resolution = self.explain(request);
        let outcome = self.prober.probe(&resolution.reference).await;

        let verdict = match outcome {
            ProbeOutcome::Local => Verdict::Local,
            o if o.is_valid() => Verdict::Reachable,
            _ => self.rehost(request, &resolution.reference).await,
        };
        Verified {
            resolution,
            verdict,
        }
    }

    async fn rehost(&self, request: &MatchRequest, unreachable: &AssetReference) -> Verdict {
        let Some(rehoster) = &self.rehoster else {
            return Verdict::Unreachable;
        };
        match rehoster.rehost(request, unreachable).await {
            Ok(replacement) if !replacement.location.trim().is_empty() => {
                info!(
                    pipeline = rehoster.name(),
                    from = %unreachable.location,
                    to = %replacement.location,
                    "re-hosted unreachable asset"
                );
                Verdict::Rehosted(replacement)
            }
            Ok(_) => {
                warn!(
                    pipeline = rehoster.name(),
                    location = %unreachable.location,
                    "re-host pipeline returned an empty location"
                );
                Verdict::Unreachable
            }
            Err(e) => {
                warn!(
                    pipeline = rehoster.name(),
                    location = %unreachable.location,
                    error = %e,
                    "re-host pipeline failed"
                );
                Verdict::Unreachable
            }
        }
    }

    /// Start a periodic sweep of expired cache entries.
    ///
    /// Abort the returned handle to stop it. A sweep configured on the
    /// builder is owned by the resolver instead and stops on drop. Fails
    /// with [`SigilError::Configuration`](crate::SigilError::Configuration)
    /// for a zero `interval`.
    pub fn spawn_pruner(&self, interval: Duration) -> Result<JoinHandle<()>> {
        Arc::clone(self.cache()).spawn_pruner(interval)
    }
}

impl Drop for AssetResolver {
    fn drop(&mut self) {
        if let Some(pruner) = self.pruner.take() {
            pruner.abort();
        }
    }
}
