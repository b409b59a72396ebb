use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the fallible edges of a review run.
///
/// The threading and discussion core never fails on data quality; these
/// variants cover configuration and archive access only.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("invalid month `{0}`, expected YYYY-MM")]
    InvalidEpoch(String),
    #[error("invalid release pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("release policy has no entries")]
    EmptyPolicy,
    #[error("archive file name `{0}` does not carry a YYYY-MM month")]
    ArchiveName(PathBuf),
    #[error("failed to read archive {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReviewError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReviewError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type ReviewResult<T> = Result<T, ReviewError>;
