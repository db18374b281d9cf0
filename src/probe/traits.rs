//! Reachability check trait.
//!
//! The [`Prober`](super::Prober) owns retry, backoff, timeout and caching;
//! a [`ReachabilityCheck`] only performs one attempt. This keeps the
//! transport swappable (HTTP by default, mocks in tests).
//!
//! # Example
//!
//! ```ignore
//! #[async_trait]
//! impl ReachabilityCheck for ObjectStoreCheck {
//!     fn name(&self) -> &str { "object-store" }
//!
//!     async fn check(&self, location: &str) -> Result<()> {
//!         self.client.head_object(location).await.map(|_| ()).map_err(Into::into)
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::Result;

/// A single reachability attempt against a remote location.
#[async_trait]
pub trait ReachabilityCheck: Send + Sync {
    /// Check name for logging/debugging.
    fn name(&self) -> &str;

    /// Attempt to reach `location` once.
    ///
    /// `Ok(())` means reachable. Any error counts as one failed attempt;
    /// the prober decides whether to retry.
    async fn check(&self, location: &str) -> Result<()>;
}
