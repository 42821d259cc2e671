use super::GraphError;
use crate::models::NodeLabel;

/// Relationship type written between a class and its superclass.
pub const SUBCLASS_OF: &str = "SUBCLASS_OF";

/// A graph database that ontology trees can be written into.
///
/// The write protocol is a destructive reset plus write transactions that
/// upsert nodes and merge edges. Implementations are
/// injected into [`crate::ConversionService`], which owns them for the
/// duration of a run.
pub trait GraphStore {
    /// Deletes every node and edge in the target graph.
    fn reset(&mut self) -> Result<(), GraphError>;

    /// Opens a write transaction.
    ///
    /// Dropping the returned transaction without calling
    /// [`GraphTransaction::commit`] rolls it back.
    fn begin(&mut self) -> Result<Box<dyn GraphTransaction + '_>, GraphError>;
}

/// An open write transaction against a [`GraphStore`].
pub trait GraphTransaction {
    /// Ensures a node keyed by `id` exists, sets its `name`, and tags it with `label`.
    ///
    /// Repeated calls with the same `id` never create a second node.
    fn upsert_node(&mut self, id: &str, name: &str, label: &NodeLabel) -> Result<(), GraphError>;

    /// Ensures exactly one `SUBCLASS_OF` edge runs from `child_id` to `parent_id`.
    ///
    /// Does nothing when either endpoint does not exist.
    fn merge_edge(&mut self, parent_id: &str, child_id: &str) -> Result<(), GraphError>;

    /// Commits every write made through this transaction.
    fn commit(self: Box<Self>) -> Result<(), GraphError>;
}

impl<S: GraphStore + ?Sized> GraphStore for Box<S> {
    fn reset(&mut self) -> Result<(), GraphError> {
        (**self).reset()
    }

    fn begin(&mut self) -> Result<Box<dyn GraphTransaction + '_>, GraphError> {
        (**self).begin()
    }
}
