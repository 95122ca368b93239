//! Navigator errors

use inode_table::{CodecError, NameError, TableError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during namespace operations
///
/// Everything except [`NamespaceError::CorruptNamespace`] is recoverable:
/// the operation is abandoned and the namespace is left as it was.
#[derive(Debug, Error)]
pub enum NamespaceError {
    #[error("Max inodes reached ({capacity})")]
    CapacityExceeded { capacity: usize },

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    #[error("Corrupt namespace: {0}")]
    CorruptNamespace(String),

    #[error("I/O failure on {}: {source}", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Inode table error: {0}")]
    Table(TableError),
}

impl From<TableError> for NamespaceError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::CapacityExceeded { capacity } => {
                NamespaceError::CapacityExceeded { capacity }
            }
            TableError::AlreadyExists(name) => NamespaceError::AlreadyExists(name),
            other => NamespaceError::Table(other),
        }
    }
}

impl From<CodecError> for NamespaceError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Io { path, source } => NamespaceError::IoFailure { path, source },
            CodecError::CorruptNamespace(detail) => NamespaceError::CorruptNamespace(detail),
        }
    }
}

impl NamespaceError {
    /// True only for errors that leave no usable namespace behind
    pub fn is_fatal(&self) -> bool {
        matches!(self, NamespaceError::CorruptNamespace(_))
    }
}
