use serde::{Deserialize, Serialize};

/// One class in an ontology tree.
///
/// Serializes to the `{id, label, children}` document shape returned by preview
/// mode and accepted back by the `upload` command. When read back, `id` is
/// required and unknown keys are rejected; a missing `label` defaults to the
/// id and a missing `children` to no children.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "NodeDocument")]
pub struct OntologyNode {
    /// Original URI of the class.
    pub id: String,
    /// Display label, unsanitized.
    pub label: String,
    /// Direct subclasses in hierarchy order.
    pub children: Vec<OntologyNode>,
}

/// Wire form of [`OntologyNode`] as found in tree documents.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeDocument {
    id: String,
    label: Option<String>,
    #[serde(default)]
    children: Vec<OntologyNode>,
}

impl From<NodeDocument> for OntologyNode {
    fn from(document: NodeDocument) -> Self {
        let label = document.label.unwrap_or_else(|| document.id.clone());
        Self {
            id: document.id,
            label,
            children: document.children,
        }
    }
}

impl OntologyNode {
    /// Creates a leaf node.
    ///
    /// # Examples
    ///
    /// ```
    /// use ontograph::OntologyNode;
    ///
    /// let node = OntologyNode::new("http://example.org/zoo#Cat", "Cat");
    /// assert_eq!(node.label, "Cat");
    /// assert!(node.children.is_empty());
    /// ```
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Adds a child node, returning the updated node.
    pub fn with_child(mut self, child: OntologyNode) -> Self {
        self.children.push(child);
        self
    }

    /// Counts this node and all of its descendants.
    ///
    /// # Examples
    ///
    /// ```
    /// use ontograph::OntologyNode;
    ///
    /// let tree = OntologyNode::new("C", "Animal")
    ///     .with_child(OntologyNode::new("B", "Mammal").with_child(OntologyNode::new("A", "Cat")));
    /// assert_eq!(tree.node_count(), 3);
    /// ```
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(OntologyNode::node_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_node_counts_itself() {
        assert_eq!(OntologyNode::new("x", "X").node_count(), 1);
    }

    #[test]
    fn node_count_includes_every_branch() {
        let tree = OntologyNode::new("root", "Root")
            .with_child(OntologyNode::new("a", "A").with_child(OntologyNode::new("a1", "A1")))
            .with_child(OntologyNode::new("b", "B"));
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn serializes_with_expected_field_names() {
        let tree = OntologyNode::new("http://ex.org/C", "Animal")
            .with_child(OntologyNode::new("http://ex.org/B", "Mammal"));

        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["id"], "http://ex.org/C");
        assert_eq!(json["label"], "Animal");
        assert_eq!(json["children"][0]["label"], "Mammal");
        assert!(json["children"][0]["children"].as_array().unwrap().is_empty());
    }

    #[test]
    fn deserializes_without_children() {
        let node: OntologyNode =
            serde_json::from_str(r#"{"id": "urn:orphan", "label": "Orphan"}"#).unwrap();
        assert_eq!(node.label, "Orphan");
        assert!(node.children.is_empty());
    }

    #[test]
    fn missing_label_defaults_to_id() {
        let node: OntologyNode = serde_json::from_str(r#"{"id": "http://ex.org/X"}"#).unwrap();
        assert_eq!(node.label, "http://ex.org/X");
    }

    #[test]
    fn explicit_empty_label_is_kept() {
        let node: OntologyNode =
            serde_json::from_str(r#"{"id": "http://ex.org/X", "label": ""}"#).unwrap();
        assert_eq!(node.label, "");
    }

    #[test]
    fn missing_id_is_rejected() {
        let result = serde_json::from_str::<OntologyNode>(r#"{"label": "Orphan"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<OntologyNode>(
            r#"{"id": "urn:x", "label": "X", "status": "success"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn nested_children_use_the_same_rules() {
        let node: OntologyNode = serde_json::from_str(
            r#"{"id": "urn:a", "label": "A", "children": [{"id": "urn:b"}]}"#,
        )
        .unwrap();
        assert_eq!(node.children[0].label, "urn:b");
    }
}
