//! Error type shared by every pipeline stage

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The dataset could not be fetched (connection, status, or body read)
    #[error("failed to fetch {url}: {message}")]
    Network { url: String, message: String },

    /// The dataset was fetched but is not well-formed CSV
    #[error("malformed dataset: {0}")]
    Parse(String),

    /// A column the pipeline needs is missing or holds unusable values
    #[error("column '{column}': {message}")]
    Validation { column: String, message: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize chart: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn validation(column: &str, message: impl Into<String>) -> Self {
        Error::Validation {
            column: column.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Parse(e.to_string())
    }
}
