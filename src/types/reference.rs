//! Asset reference type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A resolved visual-asset reference.
///
/// `location` is either a local path (always valid, never probed) or a
/// remote URL that the [`Prober`](crate::probe::Prober) can verify.
///
/// In rule files a reference may be written as a bare string, in which
/// case locality is inferred with [`AssetReference::infer`]:
///
/// ```rust
/// # use sigil::AssetReference;
/// let r: AssetReference = serde_json::from_str(r#""https://cdn.example.org/ankh.png""#).unwrap();
/// assert!(!r.is_local);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawReference")]
pub struct AssetReference {
    /// Local path or remote URL.
    pub location: String,
    /// Whether the reference is local (never needs verification).
    pub is_local: bool,
}

impl AssetReference {
    /// A local reference.
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            location: path.into(),
            is_local: true,
        }
    }

    /// A remote reference, subject to probing.
    pub fn remote(url: impl Into<String>) -> Self {
        Self {
            location: url.into(),
            is_local: false,
        }
    }

    /// Classify a location: `http://` and `https://` URLs are remote,
    /// anything else is a local path.
    pub fn infer(location: impl Into<String>) -> Self {
        let location = location.into();
        let is_local = !is_remote_location(&location);
        Self { location, is_local }
    }

    /// Whether the reference is remote.
    pub fn is_remote(&self) -> bool {
        !self.is_local
    }
}

impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location)
    }
}

fn is_remote_location(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Accept both `"location"` and `{ "location": ..., "is_local": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawReference {
    Bare(String),
    Full {
        location: String,
        #[serde(default)]
        is_local: Option<bool>,
    },
}

impl From<RawReference> for AssetReference {
    fn from(raw: RawReference) -> Self {
        match raw {
            RawReference::Bare(location) => AssetReference::infer(location),
            RawReference::Full {
                location,
                is_local: Some(is_local),
            } => AssetReference { location, is_local },
            RawReference::Full {
                location,
                is_local: None,
            } => AssetReference::infer(location),
        }
    }
}
