use thiserror::Error;

/// Errors that can occur when writing to a graph backend.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Embedded SQLite store failures
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Network-related errors (connection failures, DNS resolution, timeouts)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// Errors reported by Neo4j in a response body
    #[error("Neo4j error {code}: {message}")]
    Neo4j { code: String, message: String },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A response was well-formed but missing something the protocol needs
    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn http_error_includes_status_code() {
        let error = GraphError::Http { status: 401 };
        assert_eq!(error.to_string(), "HTTP error: status 401");
    }

    #[test]
    fn neo4j_error_includes_code_and_message() {
        let error = GraphError::Neo4j {
            code: "Neo.ClientError.Security.Unauthorized".to_string(),
            message: "Invalid username or password.".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("Neo.ClientError.Security.Unauthorized"));
        assert!(message.contains("Invalid username or password."));
    }

    #[test]
    fn serialization_error_chains_source() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = GraphError::Serialization(json_error);
        assert!(error.source().is_some());
    }

    #[test]
    fn sqlite_error_converts_with_question_mark() {
        fn failing() -> Result<(), GraphError> {
            let conn = rusqlite::Connection::open_in_memory()?;
            conn.execute("NOT VALID SQL", [])?;
            Ok(())
        }

        assert!(matches!(failing(), Err(GraphError::Sqlite(_))));
    }
}
