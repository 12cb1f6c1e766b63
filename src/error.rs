//! Application error types.

use thiserror::Error;

/// Application-level errors for Repograph.
///
/// Only loading, scanning, and configuration can fail. The layout engine
/// absorbs malformed input instead of returning errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Graph has no nodes")]
    EmptyGraph,

    // Git errors
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Git error: {message}")]
    GitMessage { message: String },

    #[error("Repository not found at: {0}")]
    RepoNotFound(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
