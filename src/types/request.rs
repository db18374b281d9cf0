//! Resolution request type.

use serde::{Deserialize, Serialize};

/// A single resolution request: a free-form entity name plus an optional
/// category hint (e.g. a culture or tradition such as "Celtique").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    /// Entity name as it appears in the upstream content record.
    pub name: String,
    /// Optional category or culture hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_hint: Option<String>,
}

impl MatchRequest {
    /// Create a request with no category hint.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category_hint: None,
        }
    }

    /// Attach a category hint.
    pub fn category(mut self, hint: impl Into<String>) -> Self {
        self.category_hint = Some(hint.into());
        self
    }
}

impl From<&str> for MatchRequest {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_hint() {
        let req = MatchRequest::new("Ankh").category("Egyptienne");
        assert_eq!(req.name, "Ankh");
        assert_eq!(req.category_hint.as_deref(), Some("Egyptienne"));
    }

    #[test]
    fn hint_is_optional_in_json() {
        let req: MatchRequest = serde_json::from_str(r#"{"name": "Triskele"}"#).unwrap();
        assert_eq!(req, MatchRequest::new("Triskele"));
    }
}
