//! Telemetry metric name constants.
//!
//! Centralised metric names for sigil operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `sigil_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `tier`: matching step that produced a reference (e.g. "exact", "last_resort")
//! - `outcome`: probe result: "local", "cached", "reachable", "unreachable", "cancelled"

/// Total resolutions performed by the matcher.
///
/// Labels: `tier`.
pub const RESOLUTIONS_TOTAL: &str = "sigil_resolutions_total";

/// Total verification calls.
///
/// Labels: `outcome`.
pub const PROBES_TOTAL: &str = "sigil_probes_total";

/// Total individual reachability attempts (network checks).
///
/// Labels: `outcome` ("ok" | "error" | "timeout").
pub const PROBE_ATTEMPTS_TOTAL: &str = "sigil_probe_attempts_total";

/// Total verification cache hits (live entries only).
pub const CACHE_HITS_TOTAL: &str = "sigil_cache_hits_total";

/// Total verification cache misses (absent or expired).
pub const CACHE_MISSES_TOTAL: &str = "sigil_cache_misses_total";
