//! Neo4j backend over the HTTP transactional Cypher API.
//!
//! This module provides `Neo4jClient` for writing ontology trees to a Neo4j server
//! with blocking HTTP requests, along with a builder reading connection settings
//! from the environment.
use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::RequestBuilder;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{GraphError, GraphStore, GraphTransaction, SUBCLASS_OF};
use crate::models::NodeLabel;

const DEFAULT_URI: &str = "http://localhost:7474";
const DEFAULT_USER: &str = "neo4j";
const DEFAULT_DATABASE: &str = "neo4j";

/// Statements buffered in an open transaction before they are sent.
const FLUSH_THRESHOLD: usize = 500;

const RESET_CYPHER: &str = "MATCH (n) DETACH DELETE n";

/// Builder for constructing `Neo4jClient` instances.
///
/// # Examples
///
/// ```
/// use ontograph::graph::Neo4jClientBuilder;
///
/// let client = Neo4jClientBuilder::new()
///     .uri("http://localhost:7474")
///     .user("neo4j")
///     .password("secret")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.database(), "neo4j");
/// ```
#[derive(Debug, Default)]
pub struct Neo4jClientBuilder {
    uri: Option<String>,
    user: Option<String>,
    password: Option<String>,
    database: Option<String>,
}

impl Neo4jClientBuilder {
    /// Creates a new `Neo4jClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP endpoint of the Neo4j server (e.g., "http://localhost:7474").
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Sets the user name for basic authentication.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Sets the password for basic authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the target database name.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Builds the `Neo4jClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// Settings not given to the builder are read from `NEO4J_URI`,
    /// `NEO4J_USER`, `NEO4J_PASSWORD` and `NEO4J_DATABASE`. Without them the
    /// client targets `http://localhost:7474`, user `neo4j`, database `neo4j`,
    /// and sends no credentials.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::InvalidUrl` for unparseable URIs and for non-HTTP
    /// schemes such as `bolt://`.
    pub fn build(self) -> Result<Neo4jClient, GraphError> {
        let uri = self
            .uri
            .or_else(|| std::env::var("NEO4J_URI").ok())
            .unwrap_or_else(|| DEFAULT_URI.to_string());
        let user = self
            .user
            .or_else(|| std::env::var("NEO4J_USER").ok())
            .unwrap_or_else(|| DEFAULT_USER.to_string());
        let password = self
            .password
            .or_else(|| std::env::var("NEO4J_PASSWORD").ok());
        let database = self
            .database
            .or_else(|| std::env::var("NEO4J_DATABASE").ok())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let url = reqwest::Url::parse(&uri)
            .map_err(|e| GraphError::InvalidUrl(format!("{}: {}", uri, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GraphError::InvalidUrl(format!(
                "{}: only the HTTP API is supported, try {}",
                uri,
                http_equivalent(&url)
            )));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(GraphError::Network)?;

        Ok(Neo4jClient {
            client,
            base_url: uri.trim_end_matches('/').to_string(),
            user,
            password,
            database,
        })
    }
}

/// Blocking client for the Neo4j HTTP transactional API.
///
/// It should be constructed using `Neo4jClientBuilder`.
pub struct Neo4jClient {
    client: reqwest::blocking::Client,
    base_url: String,
    user: String,
    password: Option<String>,
    database: String,
}

impl Neo4jClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the target database name.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Returns the user name sent with requests.
    pub fn user(&self) -> &str {
        &self.user
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/db/{}/{}", self.base_url, self.database, path)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let request = self.client.request(method, url);
        match &self.password {
            Some(password) => request.basic_auth(&self.user, Some(password)),
            None => request,
        }
    }

    /// Posts statements to a transaction endpoint and checks the response.
    fn post(&self, url: &str, statements: &[Statement]) -> Result<TxResponse, GraphError> {
        let response = self
            .request(Method::POST, url)
            .json(&json!({ "statements": statements }))
            .send()
            .map_err(GraphError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GraphError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(GraphError::Network)?;
        parse_response(&body)
    }
}

impl GraphStore for Neo4jClient {
    fn reset(&mut self) -> Result<(), GraphError> {
        let statement = Statement::new(RESET_CYPHER, json!({}));
        self.post(&self.endpoint("tx/commit"), &[statement])?;
        tracing::info!(database = %self.database, "reset neo4j database");
        Ok(())
    }

    fn begin(&mut self) -> Result<Box<dyn GraphTransaction + '_>, GraphError> {
        let response = self.post(&self.endpoint("tx"), &[])?;
        let commit_url = response
            .commit
            .ok_or_else(|| GraphError::UnexpectedResponse {
                message: "transaction response has no commit URL".to_string(),
            })?;
        let tx_url = commit_url.trim_end_matches("/commit").to_string();
        tracing::debug!(%tx_url, "opened neo4j transaction");

        Ok(Box::new(Neo4jTransaction {
            client: self,
            tx_url,
            commit_url,
            pending: Vec::new(),
            finished: false,
        }))
    }
}

/// Open Neo4j transaction; statements are buffered and sent in batches.
struct Neo4jTransaction<'a> {
    client: &'a Neo4jClient,
    tx_url: String,
    commit_url: String,
    pending: Vec<Statement>,
    finished: bool,
}

impl Neo4jTransaction<'_> {
    fn push(&mut self, statement: Statement) -> Result<(), GraphError> {
        self.pending.push(statement);
        if self.pending.len() >= FLUSH_THRESHOLD {
            let batch = std::mem::take(&mut self.pending);
            self.client.post(&self.tx_url, &batch)?;
        }
        Ok(())
    }
}

impl GraphTransaction for Neo4jTransaction<'_> {
    fn upsert_node(&mut self, id: &str, name: &str, label: &NodeLabel) -> Result<(), GraphError> {
        self.push(upsert_node_statement(id, name, label))
    }

    fn merge_edge(&mut self, parent_id: &str, child_id: &str) -> Result<(), GraphError> {
        self.push(merge_edge_statement(parent_id, child_id))
    }

    fn commit(mut self: Box<Self>) -> Result<(), GraphError> {
        let batch = std::mem::take(&mut self.pending);
        self.client.post(&self.commit_url, &batch)?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for Neo4jTransaction<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        // Neo4j also expires abandoned transactions; this just frees them sooner.
        match self.client.request(Method::DELETE, &self.tx_url).send() {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(tx_url = %self.tx_url, "rolled back neo4j transaction")
            }
            Ok(response) => tracing::warn!(
                tx_url = %self.tx_url,
                status = response.status().as_u16(),
                "neo4j rejected transaction rollback"
            ),
            Err(e) => tracing::warn!(tx_url = %self.tx_url, error = %e, "failed to roll back neo4j transaction"),
        }
    }
}

/// HTTP endpoint on the same host as `url`, at Neo4j's default HTTP port.
fn http_equivalent(url: &reqwest::Url) -> String {
    let host = url.host_str().unwrap_or("localhost");
    format!("http://{host}:7474")
}

/// One Cypher statement with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct Statement {
    statement: String,
    parameters: serde_json::Value,
}

impl Statement {
    fn new(statement: impl Into<String>, parameters: serde_json::Value) -> Self {
        Self {
            statement: statement.into(),
            parameters,
        }
    }
}

/// Cypher for a node upsert.
///
/// Labels cannot be query parameters, so the sanitized label is interpolated.
fn upsert_node_statement(id: &str, name: &str, label: &NodeLabel) -> Statement {
    Statement::new(
        format!("MERGE (n {{id: $id}}) SET n:`{label}`, n.name = $name"),
        json!({ "id": id, "name": name }),
    )
}

fn merge_edge_statement(parent_id: &str, child_id: &str) -> Statement {
    Statement::new(
        format!(
            "MATCH (p {{id: $parent_id}}) MATCH (c {{id: $child_id}}) MERGE (c)-[:{SUBCLASS_OF}]->(p)"
        ),
        json!({ "parent_id": parent_id, "child_id": child_id }),
    )
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    commit: Option<String>,
    #[serde(default)]
    errors: Vec<TxErrorBody>,
}

#[derive(Debug, Deserialize)]
struct TxErrorBody {
    code: String,
    message: String,
}

/// Parses a transaction response, turning the first reported error into a `GraphError`.
fn parse_response(body: &str) -> Result<TxResponse, GraphError> {
    let mut response: TxResponse =
        serde_json::from_str(body).map_err(GraphError::Serialization)?;

    if !response.errors.is_empty() {
        let error = response.errors.swap_remove(0);
        return Err(GraphError::Neo4j {
            code: error.code,
            message: error.message,
        });
    }

    Ok(response)
}
