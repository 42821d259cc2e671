pub mod graph;
pub mod models;
pub mod ontology;
pub mod sanitizer;
pub mod service;
pub mod utils;

pub use graph::{GraphError, GraphStore, GraphTransaction, Neo4jClient, SqliteGraph};
pub use models::{ConversionOutcome, NodeLabel, OntologyNode};
pub use ontology::OntologyError;
pub use sanitizer::LabelSanitizer;
pub use service::{
    ConversionError, ConversionRequest, ConversionService, build_trees, parse_tree_document,
    preview,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_accessible_from_crate_root() {
        let graph = SqliteGraph::in_memory();
        assert!(graph.is_ok());
    }

    #[test]
    fn types_accessible_from_crate_root() {
        let node = OntologyNode::new("urn:x", "X");
        assert_eq!(node.node_count(), 1);

        let label = NodeLabel::from_raw("my label");
        assert_eq!(label.as_str(), "my_label");

        assert_eq!(LabelSanitizer::sanitize("1"), "L_1");

        let request = ConversionRequest::new("x.ttl");
        assert!(!request.preview);
    }
}
