mod schema;

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use super::{GraphError, GraphStore, GraphTransaction, SUBCLASS_OF};
use crate::models::NodeLabel;

use schema::GRAPH_SCHEMA;

/// Embedded property graph backed by SQLite.
///
/// Implements the same write protocol as the Neo4j backend, which makes it
/// usable for local conversions without a server and as the store in tests.
pub struct SqliteGraph {
    conn: Connection,
}

impl SqliteGraph {
    /// Opens an in-memory graph.
    ///
    /// Automatically initializes the schema on connection open.
    pub fn in_memory() -> Result<Self, GraphError> {
        let conn = Connection::open_in_memory()?;
        let graph = Self { conn };
        graph.initialize_schema()?;
        Ok(graph)
    }

    /// Opens a file-based graph at the given path.
    ///
    /// Creates the database file if it does not exist.
    /// Automatically initializes the schema on connection open.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let conn = Connection::open(path)?;
        let graph = Self { conn };
        graph.initialize_schema()?;
        Ok(graph)
    }

    fn initialize_schema(&self) -> Result<(), GraphError> {
        self.conn.execute("PRAGMA foreign_keys = ON", [])?;
        self.conn.execute_batch(GRAPH_SCHEMA)?;
        Ok(())
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> Result<usize, GraphError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM graph_nodes", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of edges in the graph.
    pub fn edge_count(&self) -> Result<usize, GraphError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM graph_edges", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// The `name` property of a node, or `None` if it does not exist.
    pub fn node_name(&self, id: &str) -> Result<Option<String>, GraphError> {
        let name = self
            .conn
            .query_row("SELECT name FROM graph_nodes WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(name)
    }

    /// Labels carried by a node, sorted alphabetically.
    pub fn labels_of(&self, id: &str) -> Result<Vec<String>, GraphError> {
        self.query_strings(
            "SELECT label FROM graph_node_labels WHERE node_id = ?1 ORDER BY label",
            id,
        )
    }

    /// Ids of the nodes `id` has a `SUBCLASS_OF` edge to, sorted.
    pub fn parents_of(&self, id: &str) -> Result<Vec<String>, GraphError> {
        self.query_strings(
            "SELECT parent_id FROM graph_edges WHERE child_id = ?1 ORDER BY parent_id",
            id,
        )
    }

    fn query_strings(&self, sql: &str, param: &str) -> Result<Vec<String>, GraphError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([param], |row| row.get::<_, String>(0))?;

        let mut values = Vec::new();
        for row in rows {
            values.push(row?);
        }
        Ok(values)
    }
}

impl GraphStore for SqliteGraph {
    fn reset(&mut self) -> Result<(), GraphError> {
        self.conn.execute_batch(
            "DELETE FROM graph_edges;
             DELETE FROM graph_node_labels;
             DELETE FROM graph_nodes;",
        )?;
        tracing::debug!("reset sqlite graph");
        Ok(())
    }

    fn begin(&mut self) -> Result<Box<dyn GraphTransaction + '_>, GraphError> {
        let tx = self.conn.transaction()?;
        Ok(Box::new(SqliteTransaction { tx }))
    }
}

/// Write transaction over the embedded store; rolls back when dropped.
struct SqliteTransaction<'conn> {
    tx: rusqlite::Transaction<'conn>,
}

impl GraphTransaction for SqliteTransaction<'_> {
    fn upsert_node(&mut self, id: &str, name: &str, label: &NodeLabel) -> Result<(), GraphError> {
        self.tx.execute(
            "INSERT INTO graph_nodes (id, name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = excluded.name",
            (id, name),
        )?;
        self.tx.execute(
            "INSERT OR IGNORE INTO graph_node_labels (node_id, label) VALUES (?1, ?2)",
            (id, label.as_str()),
        )?;
        Ok(())
    }

    fn merge_edge(&mut self, parent_id: &str, child_id: &str) -> Result<(), GraphError> {
        self.tx.execute(
            "INSERT OR IGNORE INTO graph_edges (child_id, parent_id, rel_type)
             SELECT ?1, ?2, ?3
             WHERE EXISTS (SELECT 1 FROM graph_nodes WHERE id = ?1)
               AND EXISTS (SELECT 1 FROM graph_nodes WHERE id = ?2)",
            (child_id, parent_id, SUBCLASS_OF),
        )?;
        Ok(())
    }

    fn commit(self: Box<Self>) -> Result<(), GraphError> {
        self.tx.commit()?;
        Ok(())
    }
}
