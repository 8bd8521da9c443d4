//! Core error taxonomy.
//!
//! Every fallible core operation returns [`Result`] with [`StoreError`].
//! The wire layer maps variants to HTTP statuses via [`StoreError::http_status`]:
//! - InvalidPath / BranchExists / ReservedName -> 400
//! - UnsupportedMethod -> 405
//! - NotFound / Io -> 500 (missing files surface as server errors on the wire)
//!
//! Primitive I/O failures keep their original `io::Error` inside `Io`,
//! prefixed with an operation description ("open <path>" etc). No retries
//! anywhere; callers log once at the point of detection.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed logical path: bad wildcard placement, `.`/`..` segments,
    /// illegal characters in a ref name.
    #[error("{0}")]
    InvalidPath(String),

    /// Referenced file, branch or commit does not exist.
    #[error("{what} not found: {name}")]
    NotFound { what: &'static str, name: String },

    /// Branch creation targeting a name that is already taken.
    #[error("branch already exists: {0}")]
    BranchExists(String),

    /// Branch name that collides with the commit-id shape or the internal
    /// dot-prefixed namespace.
    #[error("reserved branch name: {0}")]
    ReservedName(String),

    /// Known endpoint, verb it does not serve.
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Primitive failure with the failing operation kept for context.
    #[error("{op}: {source}")]
    Io { op: String, source: io::Error },
}

impl StoreError {
    pub fn io(op: impl Into<String>, source: io::Error) -> Self {
        StoreError::Io {
            op: op.into(),
            source,
        }
    }

    /// HTTP status for the wire surface.
    pub fn http_status(&self) -> u16 {
        match self {
            StoreError::InvalidPath(_)
            | StoreError::BranchExists(_)
            | StoreError::ReservedName(_) => 400,
            StoreError::UnsupportedMethod(_) => 405,
            StoreError::NotFound { .. } | StoreError::Io { .. } => 500,
        }
    }

    /// True when the underlying cause is a missing filesystem entry.
    pub fn is_missing(&self) -> bool {
        match self {
            StoreError::NotFound { .. } => true,
            StoreError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
