//! Recording graph store for protocol assertions in unit tests.

use super::{GraphError, GraphStore, GraphTransaction};
use crate::models::NodeLabel;

/// One call observed by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Reset,
    Begin,
    Upsert {
        id: String,
        name: String,
        label: String,
    },
    Edge {
        parent_id: String,
        child_id: String,
    },
    Commit,
    Rollback,
}

/// Store that records every call instead of writing anywhere.
///
/// Writes inside a transaction only reach `ops` when it commits; a dropped
/// transaction records `Rollback` and discards its writes.
#[derive(Debug, Default)]
pub struct RecordingStore {
    pub ops: Vec<Op>,
    /// Upserting this id fails with an HTTP 503.
    pub fail_on_upsert: Option<String>,
}

impl RecordingStore {
    pub fn failing_on(id: &str) -> Self {
        Self {
            ops: Vec::new(),
            fail_on_upsert: Some(id.to_string()),
        }
    }

    /// Committed `(id, label)` pairs in upload order.
    pub fn upserted_labels(&self) -> Vec<(String, String)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Upsert { id, label, .. } => Some((id.clone(), label.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Op) -> usize {
        self.ops.iter().filter(|op| *op == wanted).count()
    }
}

impl GraphStore for RecordingStore {
    fn reset(&mut self) -> Result<(), GraphError> {
        self.ops.push(Op::Reset);
        Ok(())
    }

    fn begin(&mut self) -> Result<Box<dyn GraphTransaction + '_>, GraphError> {
        self.ops.push(Op::Begin);
        Ok(Box::new(RecordingTransaction {
            ops: &mut self.ops,
            fail_on_upsert: self.fail_on_upsert.as_deref(),
            pending: Vec::new(),
            committed: false,
        }))
    }
}

struct RecordingTransaction<'a> {
    ops: &'a mut Vec<Op>,
    fail_on_upsert: Option<&'a str>,
    pending: Vec<Op>,
    committed: bool,
}

impl GraphTransaction for RecordingTransaction<'_> {
    fn upsert_node(&mut self, id: &str, name: &str, label: &NodeLabel) -> Result<(), GraphError> {
        if self.fail_on_upsert == Some(id) {
            return Err(GraphError::Http { status: 503 });
        }
        self.pending.push(Op::Upsert {
            id: id.to_string(),
            name: name.to_string(),
            label: label.to_string(),
        });
        Ok(())
    }

    fn merge_edge(&mut self, parent_id: &str, child_id: &str) -> Result<(), GraphError> {
        self.pending.push(Op::Edge {
            parent_id: parent_id.to_string(),
            child_id: child_id.to_string(),
        });
        Ok(())
    }

    fn commit(mut self: Box<Self>) -> Result<(), GraphError> {
        let pending = std::mem::take(&mut self.pending);
        self.ops.extend(pending);
        self.ops.push(Op::Commit);
        self.committed = true;
        Ok(())
    }
}

impl Drop for RecordingTransaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.ops.push(Op::Rollback);
        }
    }
}
