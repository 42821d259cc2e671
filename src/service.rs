use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::graph::{GraphError, GraphStore, upload_tree};
use crate::models::{ConversionOutcome, OntologyNode};
use crate::ontology::{self, OntologyError};

/// Errors returned by [`ConversionService`].
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error(transparent)]
    Ontology(#[from] OntologyError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A tree document could not be read as trees
    #[error("Invalid tree document: {0}")]
    TreeDocument(#[source] serde_json::Error),

    /// There was nothing to upload
    #[error("Tree document contains no trees")]
    NoTrees,

    /// A tree node has an empty id
    #[error("Tree node '{label}' has an empty id")]
    MissingNodeId { label: String },

    /// A tree failed to upload. Its transaction was rolled back; trees
    /// committed before it remain in the graph.
    #[error(
        "Upload of tree '{failed_root}' failed after {committed_trees} committed tree(s) with {nodes_committed} node(s): {source}"
    )]
    PartialUpload {
        committed_trees: usize,
        nodes_committed: usize,
        failed_root: String,
        #[source]
        source: GraphError,
    },
}

impl ConversionError {
    /// Returns true for errors caused by the input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::Ontology(e) => e.is_user_error(),
            Self::TreeDocument(_) | Self::NoTrees | Self::MissingNodeId { .. } => true,
            Self::Graph(_) | Self::PartialUpload { .. } => false,
        }
    }
}

/// Parameters of one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub source: PathBuf,
    pub root_label: Option<String>,
    pub preview: bool,
}

impl ConversionRequest {
    /// Creates a commit-mode request for all implicit roots of `source`.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            root_label: None,
            preview: false,
        }
    }

    /// Restricts the run to the class with this label.
    pub fn root_label(mut self, label: Option<impl Into<String>>) -> Self {
        self.root_label = label.map(Into::into);
        self
    }

    /// Switches between preview (no writes) and commit mode.
    pub fn preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }
}

/// Builds the trees for a request without touching any graph store.
///
/// # Examples
///
/// ```no_run
/// use ontograph::{ConversionRequest, preview};
///
/// # fn main() -> Result<(), ontograph::ConversionError> {
/// let request = ConversionRequest::new("zoo.ttl").preview(true);
/// let outcome = preview(&request)?;
/// for tree in outcome.trees().unwrap_or_default() {
///     println!("{} ({} nodes)", tree.label, tree.node_count());
/// }
/// # Ok(())
/// # }
/// ```
pub fn preview(request: &ConversionRequest) -> Result<ConversionOutcome, ConversionError> {
    let trees = build_trees(&request.source, request.root_label.as_deref())?;
    tracing::info!(trees = trees.len(), "built preview");
    Ok(ConversionOutcome::Preview { trees })
}

/// Parses, extracts, resolves roots and builds trees for a source document.
pub fn build_trees(
    source: &Path,
    root_label: Option<&str>,
) -> Result<Vec<OntologyNode>, ConversionError> {
    Ok(ontology::load_trees(source, root_label)?)
}

/// Service layer sequencing a conversion from ontology file to graph.
///
/// ConversionService owns a [`GraphStore`] and is independent of the CLI, so
/// other front ends can drive conversions the same way.
///
/// # Examples
///
/// ```
/// use ontograph::{ConversionService, OntologyNode};
/// use ontograph::graph::SqliteGraph;
///
/// # fn main() -> Result<(), ontograph::ConversionError> {
/// let graph = SqliteGraph::in_memory()?;
/// let mut service = ConversionService::new(graph);
///
/// let tree = OntologyNode::new("urn:animal", "Animal")
///     .with_child(OntologyNode::new("urn:cat", "Cat"));
/// let outcome = service.upload_trees(&[tree])?;
///
/// assert_eq!(outcome.nodes_uploaded(), Some(2));
/// assert_eq!(service.store().edge_count()?, 1);
/// # Ok(())
/// # }
/// ```
pub struct ConversionService<S: GraphStore> {
    store: S,
}

impl<S: GraphStore> ConversionService<S> {
    /// Creates a new ConversionService writing to `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the service, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs a conversion.
    ///
    /// Preview requests return the trees without calling the store at all.
    /// Commit requests reset the store and upload every tree, each in its own
    /// transaction.
    ///
    /// # Errors
    ///
    /// Reading and tree-building errors are returned before the store is
    /// touched. Upload failures are reported as
    /// [`ConversionError::PartialUpload`].
    pub fn convert(
        &mut self,
        request: &ConversionRequest,
    ) -> Result<ConversionOutcome, ConversionError> {
        if request.preview {
            return preview(request);
        }

        let trees = build_trees(&request.source, request.root_label.as_deref())?;
        self.commit_trees(&trees)
    }

    /// Resets the store and uploads prebuilt trees, one transaction per tree.
    ///
    /// The reported node count is computed from the trees before upload.
    ///
    /// # Errors
    ///
    /// An empty forest, or any node with an empty id, is rejected with
    /// [`ConversionError::NoTrees`] or [`ConversionError::MissingNodeId`]
    /// before the store is reset.
    pub fn upload_trees(
        &mut self,
        trees: &[OntologyNode],
    ) -> Result<ConversionOutcome, ConversionError> {
        if trees.is_empty() {
            return Err(ConversionError::NoTrees);
        }
        if let Some(node) = trees.iter().find_map(find_node_without_id) {
            return Err(ConversionError::MissingNodeId {
                label: node.label.clone(),
            });
        }

        self.commit_trees(trees)
    }

    fn commit_trees(
        &mut self,
        trees: &[OntologyNode],
    ) -> Result<ConversionOutcome, ConversionError> {
        self.store.reset()?;

        let nodes_uploaded: usize = trees.iter().map(OntologyNode::node_count).sum();
        let mut committed_trees = 0;
        let mut nodes_committed = 0;

        for tree in trees {
            match self.upload_one(tree) {
                Ok(uploaded) => {
                    committed_trees += 1;
                    nodes_committed += uploaded;
                }
                Err(source) => {
                    tracing::error!(root = %tree.id, committed_trees, error = %source, "tree upload failed");
                    return Err(ConversionError::PartialUpload {
                        committed_trees,
                        nodes_committed,
                        failed_root: tree.id.clone(),
                        source,
                    });
                }
            }
        }

        tracing::info!(trees = committed_trees, nodes = nodes_uploaded, "upload complete");
        Ok(ConversionOutcome::Committed {
            nodes_uploaded,
            trees_uploaded: committed_trees,
        })
    }

    fn upload_one(&mut self, tree: &OntologyNode) -> Result<usize, GraphError> {
        let mut tx = self.store.begin()?;
        let uploaded = upload_tree(tx.as_mut(), tree)?;
        tx.commit()?;
        Ok(uploaded)
    }
}

/// Shapes accepted by [`parse_tree_document`].
#[derive(Deserialize)]
#[serde(untagged)]
enum TreeDocument {
    Preview { json_data: Vec<OntologyNode> },
    Forest(Vec<OntologyNode>),
    Tree(OntologyNode),
}

/// Returns the first node, depth-first, whose id is empty.
fn find_node_without_id(node: &OntologyNode) -> Option<&OntologyNode> {
    if node.id.is_empty() {
        return Some(node);
    }
    node.children.iter().find_map(find_node_without_id)
}

/// Reads trees from JSON: a preview outcome, an array of trees, or one tree.
///
/// Every node needs an `id`, and keys other than `id`, `label` and
/// `children` are rejected, so a commit summary or an unrelated JSON file
/// does not parse as a tree. Nesting is bounded by `serde_json`'s recursion
/// limit, which allows roughly 60 tree levels; deeper hierarchies should be
/// uploaded with `convert` directly.
///
/// # Examples
///
/// ```
/// use ontograph::parse_tree_document;
///
/// let trees = parse_tree_document(r#"[{"id": "urn:a", "label": "A", "children": []}]"#).unwrap();
/// assert_eq!(trees[0].label, "A");
///
/// assert!(parse_tree_document(r#"{"status": "success", "nodes_uploaded": 2}"#).is_err());
/// ```
pub fn parse_tree_document(json: &str) -> Result<Vec<OntologyNode>, ConversionError> {
    let document: TreeDocument =
        serde_json::from_str(json).map_err(ConversionError::TreeDocument)?;
    let trees = match document {
        TreeDocument::Preview { json_data } => json_data,
        TreeDocument::Forest(trees) => trees,
        TreeDocument::Tree(tree) => vec![tree],
    };

    if trees.is_empty() {
        return Err(ConversionError::NoTrees);
    }
    Ok(trees)
}
