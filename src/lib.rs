//! Sigil - deterministic asset reference resolution
//!
//! Given a free-form symbol name and an optional category hint, sigil
//! always produces a usable visual-asset reference by falling through an
//! ordered cascade of matching strategies over a configurable rule table.
//! Separately, it verifies whether remote references are still reachable,
//! with bounded retry and a TTL-bounded verification cache.
//!
//! # Example
//!
//! ```rust,no_run
//! use sigil::{MatchRequest, Sigil};
//!
//! #[tokio::main]
//! async fn main() -> sigil::Result<()> {
//!     let resolver = Sigil::builder().build()?;
//!
//!     let request = MatchRequest::new("Triskèle celtique").category("Celtique");
//!     let reference = resolver.resolve(&request);
//!
//!     if !resolver.verify(&reference).await {
//!         eprintln!("{reference} is unreachable");
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod probe;
pub mod resolver;
pub mod rules;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheEntry, VerificationCache};
pub use error::{Result, SigilError};
pub use normalize::normalize;
pub use probe::{HttpReachability, ProbeConfig, ProbeOutcome, Prober, ReachabilityCheck};
pub use resolver::{AssetResolver, Rehoster, ResolverBuilder, Sigil, Verdict, Verified};
pub use rules::{LastResort, RuleTable};
pub use types::{AssetReference, MatchRequest, MatchTier, Resolution, Rule, Tier};
