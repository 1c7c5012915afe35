// src/error.rs
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RtxError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tag: expected {expected}, found {found}")]
    InvalidTag { expected: String, found: String },

    #[error("header terminator not found within a {chunk_size} byte chunk; increase the chunk size and retry")]
    HeaderTooLarge { chunk_size: usize },

    #[error("missing required header field `{0}`")]
    MissingHeaderField(String),

    #[error("malformed value {value:?} for header field `{key}`: expected {expected}")]
    MalformedHeaderValue {
        key: String,
        value: String,
        expected: String,
    },

    #[error("invalid UTF-8 in header text")]
    InvalidUtf8,

    #[error("EOF marker found in chunk {chunk_index} before the end of the sample data")]
    PrematureEof { chunk_index: usize },

    #[error("sample data ended at byte {offset} without a valid EOF marker")]
    TruncatedStream { offset: u64 },

    #[error("chunk size {0} is not a positive multiple of the 8-byte sample size")]
    InvalidChunkSize(usize),

    #[error("unknown reduction mode {0:?}, expected \"mean\" or \"drop\"")]
    InvalidReductionMode(String),

    #[error("not an RTX recording: {}", .0.display())]
    UnsupportedFileKind(PathBuf),

    #[error("writer misuse: {0}")]
    WriterMisuse(&'static str),
}

pub type Result<T> = std::result::Result<T, RtxError>;
