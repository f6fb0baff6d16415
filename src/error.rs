//! @ai:module:intent Define error types for submission parsing, validation and scoring
//! @ai:module:layer domain
//! @ai:module:public_api Error, FormatError, FormatErrorKind, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all triage-eval operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("Unknown task `{name}` (known tasks: {})", .known.join(", "))]
    UnknownTask { name: String, known: Vec<String> },

    #[error("Gold standard contains no records, metrics are undefined")]
    EmptyGold,

    #[error("Gold file {path} repeats identifier `{id}` on lines {lines:?}")]
    DuplicateGold {
        path: PathBuf,
        id: String,
        lines: Vec<usize>,
    },

    #[error("Invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// @ai:intent A malformed line, located by its 1-based line number
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line} ({content}): {kind}")]
pub struct FormatError {
    pub line: usize,
    pub content: String,
    pub kind: FormatErrorKind,
}

/// @ai:intent Reason a line was rejected by the record parser
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatErrorKind {
    #[error("expected 2 tab-separated fields, found {0}")]
    FieldCount(usize),

    #[error("invalid label `{0}` (expected crisis, red, amber or green)")]
    UnknownLabel(String),

    #[error("empty message identifier")]
    EmptyIdentifier,

    #[error("invalid UTF-8")]
    InvalidEncoding,
}

pub type Result<T> = std::result::Result<T, Error>;
