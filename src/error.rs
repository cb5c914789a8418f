//! Error types for lazydav.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the WebDAV client and the command layer.
#[derive(Debug, Error)]
pub enum DavError {
    /// The verb given with `-X` has no command.
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Wrong number of positional path arguments.
    #[error("Unsupported arguments")]
    UnsupportedArguments,

    /// The server kept rejecting credentials after the single retry.
    #[error("authorization failed: {status}")]
    Unauthorized { status: StatusCode },

    /// Any other non-success response.
    #[error("{op} {path}: {status}")]
    Status {
        op: &'static str,
        path: String,
        status: StatusCode,
    },

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed multistatus response: {0}")]
    Xml(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path: '{}' is a directory", .0.display())]
    IsDirectory(PathBuf),
}

/// Result alias using [`DavError`].
pub type Result<T> = std::result::Result<T, DavError>;
