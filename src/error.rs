use std::{io, path::PathBuf};

use thiserror::Error;

/// Every way a conversion run can fail. None of these are recovered from
/// locally; the first one aborts the run before any output is committed.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{}: expected an 8x8 image, found {width}x{height}", path.display())]
    InvalidDimensions {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    #[error("sprite '{name}' uses at least {count} distinct colors (limit {limit})")]
    TooManyColors {
        name: String,
        count: usize,
        limit: usize,
    },

    #[error("sprite '{name}' needs a new palette but the palette table is full (limit {limit})")]
    TooManyPalettes { name: String, limit: usize },

    #[error("sprite '{name}' does not fit in the tile table (limit {limit})")]
    TooManyTiles { name: String, limit: usize },

    #[error("{}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: corrupt chunk: {reason}", path.display())]
    CorruptChunk { path: PathBuf, reason: String },

    #[error("{}: '{name}' is not a valid resource name", path.display())]
    InvalidResourceName { path: PathBuf, name: String },

    #[error("{}: resource '{name}' is already defined by another file", path.display())]
    DuplicateResource { path: PathBuf, name: String },

    #[error("{}: invalid config", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ConvertError::CorruptChunk {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
