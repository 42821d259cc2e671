use serde::{Deserialize, Serialize};

use super::OntologyNode;

/// Result of a conversion run.
///
/// Serializes with a `status` discriminator so callers can tell a preview
/// document from an upload summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ConversionOutcome {
    /// Trees were built but nothing was written.
    Preview {
        #[serde(rename = "json_data")]
        trees: Vec<OntologyNode>,
    },
    /// Trees were uploaded to the graph store.
    #[serde(rename = "success")]
    Committed {
        nodes_uploaded: usize,
        trees_uploaded: usize,
    },
}

impl ConversionOutcome {
    /// Returns the previewed trees, if this is a preview outcome.
    pub fn trees(&self) -> Option<&[OntologyNode]> {
        match self {
            Self::Preview { trees } => Some(trees),
            Self::Committed { .. } => None,
        }
    }

    /// Returns the number of uploaded nodes, if this is a commit outcome.
    pub fn nodes_uploaded(&self) -> Option<usize> {
        match self {
            Self::Preview { .. } => None,
            Self::Committed { nodes_uploaded, .. } => Some(*nodes_uploaded),
        }
    }
}
