//! Public types for the Sigil API.

mod reference;
mod request;
mod resolution;
mod rule;

pub use reference::AssetReference;
pub use request::MatchRequest;
pub use resolution::{MatchTier, Resolution};
pub use rule::{Rule, Tier};
