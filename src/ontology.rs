//! Ontology reading and subclass tree construction.
//!
//! This module turns an RDF document into the ordered sequence of class trees
//! that preview mode returns and the graph uploader persists.
//!
//! # Examples
//!
//! ```
//! use ontograph::ontology::{HierarchyIndex, SourceFormat, TreeBuilder, parse_str, resolve_roots};
//!
//! # fn example() -> Result<(), ontograph::ontology::OntologyError> {
//! let turtle = r#"
//!     @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
//!     @prefix ex: <http://example.org/zoo#> .
//!     ex:A rdfs:subClassOf ex:B ; rdfs:label "Cat" .
//!     ex:B rdfs:subClassOf ex:C ; rdfs:label "Mammal" .
//!     ex:C rdfs:label "Animal" .
//! "#;
//!
//! let triples = parse_str(turtle, SourceFormat::Turtle)?;
//! let index = HierarchyIndex::from_triples(&triples);
//! let roots = resolve_roots(&index, None)?;
//! let trees = TreeBuilder::new(&index).build_all(&roots)?;
//!
//! assert_eq!(trees[0].label, "Animal");
//! assert_eq!(trees[0].children[0].children[0].label, "Cat");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod error;
mod extractor;
mod roots;
mod source;
mod tree;

pub use error::OntologyError;
pub use extractor::{HierarchyIndex, extract_fragment};
pub use roots::{find_by_label, resolve_roots};
pub use source::{SourceFormat, normalize_to_turtle, parse_str, read_triples, write_turtle};
pub use tree::TreeBuilder;

use std::path::Path;

use crate::models::OntologyNode;

/// Reads the document at `path` and builds its class trees.
///
/// Runs extraction, root resolution and tree building in order; any failure
/// aborts before a tree is returned.
pub fn load_trees(
    path: &Path,
    root_label: Option<&str>,
) -> Result<Vec<OntologyNode>, OntologyError> {
    let triples = read_triples(path)?;
    let index = HierarchyIndex::from_triples(&triples);
    let roots = resolve_roots(&index, root_label)?;
    TreeBuilder::new(&index).build_all(&roots)
}
