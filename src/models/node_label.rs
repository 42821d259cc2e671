use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sanitizer::LabelSanitizer;

/// Graph node label (type tag) assigned to an uploaded ontology class.
///
/// Wraps a sanitized string so that only valid identifiers ever reach a
/// graph backend, where labels are interpolated into queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeLabel(String);

impl NodeLabel {
    /// Creates a node label by sanitizing a raw display label.
    pub fn from_raw(raw: &str) -> Self {
        Self(LabelSanitizer::sanitize(raw))
    }

    /// Returns the sanitized label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_sanitizes_input() {
        let label = NodeLabel::from_raw("Red Wine");
        assert_eq!(label.as_str(), "Red_Wine");
    }

    #[test]
    fn from_raw_falls_back_to_unknown() {
        assert_eq!(NodeLabel::from_raw("???").as_str(), "Unknown");
    }

    #[test]
    fn display_formats_label() {
        let label = NodeLabel::from_raw("Animal");
        assert_eq!(format!("{}", label), "Animal");
    }

    #[test]
    fn serializes_transparently() {
        let label = NodeLabel::from_raw("Mammal");
        let json = serde_json::to_string(&label).unwrap();
        assert_eq!(json, r#""Mammal""#);
    }

    #[test]
    fn equal_raw_labels_produce_equal_node_labels() {
        assert_eq!(NodeLabel::from_raw("a b"), NodeLabel::from_raw("a-b"));
    }
}
