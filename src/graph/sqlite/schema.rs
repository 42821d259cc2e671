/// Property-graph schema for the embedded store.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS for idempotent execution.
/// A node may carry several labels when it is reached under different
/// top-level categories, so labels live in their own table.
pub const GRAPH_SCHEMA: &str = r#"
-- Nodes keyed by the class URI
CREATE TABLE IF NOT EXISTS graph_nodes (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

-- Type tags assigned to nodes (many per node)
CREATE TABLE IF NOT EXISTS graph_node_labels (
    node_id TEXT NOT NULL,
    label TEXT NOT NULL,
    PRIMARY KEY (node_id, label),
    FOREIGN KEY (node_id) REFERENCES graph_nodes(id) ON DELETE CASCADE
);

-- Directed relationships, child -> parent for SUBCLASS_OF
CREATE TABLE IF NOT EXISTS graph_edges (
    child_id TEXT NOT NULL,
    parent_id TEXT NOT NULL,
    rel_type TEXT NOT NULL,
    PRIMARY KEY (child_id, parent_id, rel_type),
    FOREIGN KEY (child_id) REFERENCES graph_nodes(id) ON DELETE CASCADE,
    FOREIGN KEY (parent_id) REFERENCES graph_nodes(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_graph_node_labels_label ON graph_node_labels(label);
CREATE INDEX IF NOT EXISTS idx_graph_edges_parent ON graph_edges(parent_id);
"#;
