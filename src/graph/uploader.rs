//! Depth-first upload of ontology trees.

use super::{GraphError, GraphTransaction};
use crate::models::{NodeLabel, OntologyNode};

/// Depth up to which nodes keep their own label; deeper nodes inherit.
const OWN_LABEL_MAX_DEPTH: usize = 1;

/// Uploads one tree through an open transaction, returning the nodes written.
///
/// Traversal is depth-first and pre-order: a node is upserted, its edge to the
/// parent is merged, then its children follow in tree order. The root (depth 0)
/// and its direct children (depth 1) are labelled with their own sanitized
/// label; every deeper node inherits its parent's label, so a whole subtree
/// shares the label of its second-level category.
///
/// Nodes with an empty id are skipped together with their subtrees.
pub fn upload_tree<T>(tx: &mut T, root: &OntologyNode) -> Result<usize, GraphError>
where
    T: GraphTransaction + ?Sized,
{
    let mut uploaded = 0;
    upload_node(tx, root, None, 0, &mut uploaded)?;
    tracing::debug!(root = %root.id, uploaded, "uploaded tree");
    Ok(uploaded)
}

fn upload_node<T>(
    tx: &mut T,
    node: &OntologyNode,
    parent: Option<(&str, &NodeLabel)>,
    depth: usize,
    uploaded: &mut usize,
) -> Result<(), GraphError>
where
    T: GraphTransaction + ?Sized,
{
    if node.id.is_empty() {
        tracing::warn!(label = %node.label, depth, "skipping node without id");
        return Ok(());
    }

    let name = node.label.as_str();
    let label = match parent {
        Some((_, parent_label)) if depth > OWN_LABEL_MAX_DEPTH => parent_label.clone(),
        _ => NodeLabel::from_raw(name),
    };

    tx.upsert_node(&node.id, name, &label)?;
    if let Some((parent_id, _)) = parent {
        tx.merge_edge(parent_id, &node.id)?;
    }
    *uploaded += 1;

    for child in &node.children {
        upload_node(tx, child, Some((&node.id, &label)), depth + 1, uploaded)?;
    }

    Ok(())
}
