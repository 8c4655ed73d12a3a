//! Error type shared by the index, the ingestion reader and the catalog.

use thiserror::Error;

/// Result type alias for kdsearch operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Node or snapshot storage for a build could not be allocated.
    #[error("resource exhausted: could not allocate storage for {requested} points")]
    ResourceExhausted { requested: usize },

    /// A point's vector length differs from the index dimension.
    #[error("invalid dimension for point {id}: expected {expected}, found {found}")]
    InvalidDimension { id: usize, expected: usize, found: usize },

    /// A point has a NaN or infinite coordinate.
    #[error("non-finite coordinate in point {id} at axis {axis}")]
    NonFiniteCoordinate { id: usize, axis: usize },

    /// Invalid setting, e.g. a zero dimension.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Malformed row in a vector dump; `line` is 1-based.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Reading a file failed.
    #[error("IO error: {message}")]
    Io { message: String, source: std::io::Error },

    /// A response could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Query id outside the range served by the catalog.
    #[error("invalid id {id}: expected a value in 0..{len}")]
    InvalidId { id: usize, len: usize },

    /// Query id in range but not present in the batch.
    #[error("query id {id} not found")]
    UnknownId { id: usize },

    /// The index holds no point other than the query itself.
    #[error("no neighbour found for id {id}")]
    NoMatch { id: usize },
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse { line, message: message.into() }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config { message: message.into() }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io { message: err.to_string(), source: err }
    }
}
