// File: src/error.rs
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RomanizerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("prop_typical must lie strictly between 0 and 1, got {0}")]
    InvalidPropTypical(f64),

    #[error("unknown text encoding: {0:?}")]
    UnknownEncoding(String),

    #[error("malformed key line {line_no}: {line:?}")]
    MalformedLine { line_no: usize, line: String },

    #[error("snapshot error: {0}")]
    Snapshot(bincode::Error),

    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
}

impl From<bincode::Error> for RomanizerError {
    fn from(e: bincode::Error) -> Self {
        RomanizerError::Snapshot(e)
    }
}

pub type Result<T> = std::result::Result<T, RomanizerError>;
