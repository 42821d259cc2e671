use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading an ontology and turning it into trees.
///
/// All of these abort a conversion before the graph store is touched.
#[derive(Debug, Error)]
pub enum OntologyError {
    /// The source document could not be opened
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The RDF parser rejected the document
    #[error("Failed to parse RDF document: {0}")]
    Parse(#[source] oxrdfio::RdfParseError),

    /// The file extension does not map to a known RDF serialization
    #[error("Unsupported ontology format: {0}")]
    UnsupportedFormat(String),

    /// An explicitly requested root label matched no entity
    #[error("Root label '{label}' not found in ontology")]
    RootNotFound { label: String },

    /// The subClassOf hierarchy loops back on itself
    #[error("Cycle detected in subClassOf hierarchy: {}", .cycle.join(" -> "))]
    CycleDetected { cycle: Vec<String> },

    /// Turtle output could not be written
    #[error("Failed to write Turtle output: {0}")]
    Serialize(#[source] io::Error),
}

impl OntologyError {
    /// Returns true for errors caused by the input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat(_) | Self::RootNotFound { .. } | Self::CycleDetected { .. }
        )
    }
}
