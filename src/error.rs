//! Error handling for nodeport-rs
//!
//! The connectivity engine itself never fails: rule checks fall back to
//! `false` or an empty collection. This error type covers the trust
//! boundaries around it (direction assertions, configuration files and
//! graph documents loaded by the inspection tool).

use crate::ports::PortDirection;
use thiserror::Error;

/// Main error type for nodeport-rs operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// A port did not have the direction the caller asserted
    #[error("Port {node_id}:{port_id} is an {actual} port, expected {expected}")]
    PortDirection {
        node_id: String,
        port_id: String,
        expected: PortDirection,
        actual: PortDirection,
    },

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to graph documents and node-type catalogs
    #[error("Document error: {0}")]
    Document(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EngineError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for nodeport-rs operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::Config("missing layout table".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing layout table");
    }

    #[test]
    fn test_error_with_context() {
        let err = EngineError::Document("bad node".to_string());
        let with_ctx = err.with_context("Failed to load graph.json");
        assert!(with_ctx.to_string().contains("Failed to load graph.json"));
        assert!(with_ctx.to_string().contains("bad node"));
    }

    #[test]
    fn test_port_direction_error() {
        let err = EngineError::PortDirection {
            node_id: "mixer".to_string(),
            port_id: "out".to_string(),
            expected: PortDirection::Input,
            actual: PortDirection::Output,
        };
        let msg = err.to_string();
        assert!(msg.contains("mixer:out"));
        assert!(msg.contains("expected input"));
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<()> = Err(EngineError::Config("x".to_string()));
        let err = result.context("loading").unwrap_err();
        assert!(matches!(err, EngineError::WithContext { .. }));
    }
}
