//! Graph database write protocol, backends, and the tree uploader.
//!
//! Trees are persisted through the [`GraphStore`] trait: one destructive
//! reset per run, then one [`GraphTransaction`] per tree. Two backends are
//! provided: [`Neo4jClient`] speaks the Neo4j HTTP API and [`SqliteGraph`]
//! keeps an embedded property graph.
//!
//! # Examples
//!
//! ```
//! use ontograph::OntologyNode;
//! use ontograph::graph::{GraphStore, SqliteGraph, upload_tree};
//!
//! # fn example() -> Result<(), ontograph::graph::GraphError> {
//! let tree = OntologyNode::new("urn:animal", "Animal")
//!     .with_child(OntologyNode::new("urn:mammal", "Mammal"));
//!
//! let mut graph = SqliteGraph::in_memory()?;
//! let mut tx = graph.begin()?;
//! upload_tree(tx.as_mut(), &tree)?;
//! tx.commit()?;
//!
//! assert_eq!(graph.node_count()?, 2);
//! assert_eq!(graph.parents_of("urn:mammal")?, vec!["urn:animal"]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

mod error;
#[cfg(test)]
pub(crate) mod mock;
mod neo4j;
mod sqlite;
mod store;
mod uploader;

pub use error::GraphError;
pub use neo4j::{Neo4jClient, Neo4jClientBuilder};
pub use sqlite::SqliteGraph;
pub use store::{GraphStore, GraphTransaction, SUBCLASS_OF};
pub use uploader::upload_tree;
