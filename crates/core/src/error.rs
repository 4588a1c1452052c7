//! Unified error types for the price enricher.
//!
//! Error codes:
//! - CONN_001: Persistence backend unreachable
//! - DECODE_001: Event notification could not be decoded
//! - DOWNLOAD_001-002: Object store failures
//! - INPUT_001-002: Tabular input failures
//! - PERSIST_001: Final write failed
//! - CONFIG_001: Invalid configuration

use thiserror::Error;

use crate::key::CompositeKey;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the price enricher.
///
/// Every variant is fatal for the invocation that produced it.
#[derive(Debug, Error)]
pub enum Error {
    /// The persistence backend could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// The event notification or its object key could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Reading from the object store failed.
    #[error("download error: {0}")]
    Download(String),

    /// Listing found no object with the expected suffix.
    #[error("no {suffix} file found in s3://{bucket}/{prefix}")]
    NoCandidateFile {
        bucket: String,
        prefix: String,
        suffix: String,
    },

    /// Header unreadable, or a row structurally unreadable.
    #[error("malformed input at line {line}: {message}")]
    MalformedInput { line: u64, message: String },

    /// A detail row has no baseline entry.
    #[error("no price average found for key {key}")]
    MissingBaseline { key: CompositeKey },

    /// Writing the enriched records failed.
    #[error("persist error: {0}")]
    Persist(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }

    pub fn malformed(line: u64, msg: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            message: msg.into(),
        }
    }

    pub fn persist(msg: impl Into<String>) -> Self {
        Self::Persist(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Connection(_) => "CONN_001",
            Self::Decode(_) => "DECODE_001",
            Self::Download(_) => "DOWNLOAD_001",
            Self::NoCandidateFile { .. } => "DOWNLOAD_002",
            Self::MalformedInput { .. } => "INPUT_001",
            Self::MissingBaseline { .. } => "INPUT_002",
            Self::Persist(_) => "PERSIST_001",
            Self::Config(_) => "CONFIG_001",
        }
    }

    /// True for every failure raised while reading from the object store.
    pub fn is_download(&self) -> bool {
        matches!(self, Self::Download(_) | Self::NoCandidateFile { .. })
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        Self::MalformedInput {
            line,
            message: err.to_string(),
        }
    }
}
