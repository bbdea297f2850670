use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterBridgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Duplicate node: {0}")]
    DuplicateNode(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Malformed cluster annotation on node {node}: {reason}")]
    MalformedAnnotation { node: String, reason: String },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl ClusterBridgeError {
    pub fn malformed(node: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedAnnotation {
            node: node.into(),
            reason: reason.into(),
        }
    }
}

impl From<::config::ConfigError> for ClusterBridgeError {
    fn from(err: ::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClusterBridgeError>;
