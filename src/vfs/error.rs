//! File layer error types.

use std::io;
use thiserror::Error;

use super::RelativePath;

// ============================================================================
// VfsError
// ============================================================================

/// Errors surfaced by [`VirtualFileLayer`](super::VirtualFileLayer).
///
/// Every variant is recoverable by the caller: the build pipeline decides
/// whether to skip the document, try another root, or abort.
#[derive(Debug, Error)]
pub enum VfsError {
    /// No content root contains the logical path.
    #[error("file `{0}` not found in any content root")]
    NotFound(RelativePath),

    /// A write-family operation on a layer without a writer.
    #[error("file layer has no output writer")]
    NotWritable,

    /// Any operation after `dispose()`.
    #[error("file layer has been disposed")]
    Disposed,

    #[error(transparent)]
    InvalidPath(#[from] PathError),

    #[error("IO error on `{path}`")]
    Io {
        path: RelativePath,
        #[source]
        source: io::Error,
    },
}

impl VfsError {
    pub(crate) fn io(path: &RelativePath, source: io::Error) -> Self {
        Self::Io {
            path: path.clone(),
            source,
        }
    }
}

// ============================================================================
// PathError
// ============================================================================

/// A logical path that cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid logical path `{path}`: {reason}")]
pub struct PathError {
    pub path: String,
    pub reason: &'static str,
}

impl PathError {
    pub(crate) fn new(path: &str, reason: &'static str) -> Self {
        Self {
            path: path.to_string(),
            reason,
        }
    }
}

pub type Result<T, E = VfsError> = std::result::Result<T, E>;
