//! Downstream re-host hook.

use async_trait::async_trait;

use crate::Result;
use crate::types::{AssetReference, MatchRequest};

/// Pipeline that can produce a replacement for an unreachable remote
/// reference (e.g. by fetching a mirror, re-optimizing and re-hosting it).
///
/// The resolver only calls this after the prober has confirmed the
/// reference unreachable. How the replacement is produced is up to the
/// implementation.
#[async_trait]
pub trait Rehoster: Send + Sync {
    /// Pipeline name for logging/debugging.
    fn name(&self) -> &str;

    /// Produce a replacement reference for `unreachable`.
    async fn rehost(
        &self,
        request: &MatchRequest,
        unreachable: &AssetReference,
    ) -> Result<AssetReference>;
}
