//! Error types for the file store

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while reading or writing the backing file.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt content in {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode collection: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Whether the error happened on the load side (`Read` or `Decode`).
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Decode { .. })
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
