use thiserror::Error;

/// Unified error type for gitlab-autotag operations
#[derive(Error, Debug)]
pub enum AutotagError {
    #[error("No tag matching '{0}' is reachable from HEAD")]
    TagNotFound(String),

    #[error("Tag '{0}' does not follow semantic versioning (https://semver.org)")]
    MalformedTag(String),

    #[error("Merge request lookup failed: {0}")]
    Lookup(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Invalid configuration file: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in gitlab-autotag
pub type Result<T> = std::result::Result<T, AutotagError>;

impl From<reqwest::Error> for AutotagError {
    fn from(err: reqwest::Error) -> Self {
        AutotagError::Lookup(err.to_string())
    }
}

impl AutotagError {
    /// Create a configuration error with context
    pub fn configuration(msg: impl Into<String>) -> Self {
        AutotagError::Configuration(msg.into())
    }

    /// Create a lookup error with context
    pub fn lookup(msg: impl Into<String>) -> Self {
        AutotagError::Lookup(msg.into())
    }

    /// Create a malformed tag error
    pub fn malformed_tag(tag: impl Into<String>) -> Self {
        AutotagError::MalformedTag(tag.into())
    }

    /// Create a tag-not-found error for a describe pattern
    pub fn tag_not_found(pattern: impl Into<String>) -> Self {
        AutotagError::TagNotFound(pattern.into())
    }
}
