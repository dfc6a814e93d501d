use thiserror::Error;

/// Error kinds surfaced by the engine. Runtime (per-call) failures other than
/// OOM never reach this type — the segmenter degrades to an UNK token instead.
#[derive(Debug, Error)]
pub enum G2pError {
    #[error("required argument was null or empty")]
    NullInput,

    #[error("allocation failed")]
    OutOfMemory,

    #[error("dictionary file not found: {0}")]
    FileNotFound(String),

    #[error("read error loading {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid UTF-8 at byte offset {0}")]
    InvalidUtf8(usize),

    #[error("invalid format in {file} at line {line}")]
    InvalidFormat { file: String, line: usize },

    #[error("not found")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, G2pError>;
