//! Tree materialization from a hierarchy index.

use indexmap::IndexSet;

use super::{HierarchyIndex, OntologyError, extract_fragment};
use crate::models::OntologyNode;

/// Builds `{id, label, children}` trees from a [`HierarchyIndex`].
///
/// The builder keeps the current root-to-node path and refuses to descend
/// into an entity already on it, so cyclic `subClassOf` chains fail with
/// [`OntologyError::CycleDetected`]. A class reachable through two parents is
/// not a cycle and appears under each of them.
pub struct TreeBuilder<'a> {
    index: &'a HierarchyIndex,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(index: &'a HierarchyIndex) -> Self {
        Self { index }
    }

    /// Builds one tree per root, in order.
    pub fn build_all(&self, roots: &[String]) -> Result<Vec<OntologyNode>, OntologyError> {
        roots.iter().map(|root| self.build(root)).collect()
    }

    /// Builds the tree rooted at `root`.
    pub fn build(&self, root: &str) -> Result<OntologyNode, OntologyError> {
        let mut path = IndexSet::new();
        self.build_node(root, &mut path)
    }

    fn build_node(
        &self,
        id: &str,
        path: &mut IndexSet<String>,
    ) -> Result<OntologyNode, OntologyError> {
        if let Some(start) = path.get_index_of(id) {
            let mut cycle: Vec<String> = path.iter().skip(start).cloned().collect();
            cycle.push(id.to_string());
            return Err(OntologyError::CycleDetected { cycle });
        }

        path.insert(id.to_string());
        let children = self
            .index
            .children_of(id)
            .map(|child| self.build_node(child, path))
            .collect::<Result<Vec<_>, _>>()?;
        path.pop();

        let label = self
            .index
            .label_of(id)
            .unwrap_or_else(|| extract_fragment(id));

        Ok(OntologyNode {
            id: id.to_string(),
            label: label.to_string(),
            children,
        })
    }
}
