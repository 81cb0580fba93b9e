use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading geometry or scene files.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OBJ error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected exactly one mesh in {}, found {count}", path.display())]
    MeshCount { path: PathBuf, count: usize },

    #[error("Index count {0} is not a multiple of 3")]
    MalformedIndices(usize),

    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    #[error("Degenerate triangle at index {0}")]
    DegenerateTriangle(usize),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;
