use thiserror::Error;

/// Unified error type for semantic-branch operations
#[derive(Error, Debug)]
pub enum SemanticBranchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid pattern '{pattern}' in '{category}' rules: {source}")]
    Pattern {
        category: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

/// Convenience type alias for Results in semantic-branch
pub type Result<T> = std::result::Result<T, SemanticBranchError>;

impl SemanticBranchError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SemanticBranchError::Config(msg.into())
    }

    /// Create an input error with context
    pub fn input(msg: impl Into<String>) -> Self {
        SemanticBranchError::Input(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        SemanticBranchError::Version(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        SemanticBranchError::Manifest(msg.into())
    }
}
