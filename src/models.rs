mod node_label;
mod ontology_node;
mod outcome;

pub use node_label::NodeLabel;
pub use ontology_node::OntologyNode;
pub use outcome::ConversionOutcome;
