// Error types for the selector core
//
// Three kinds cover every failure the core can surface:
// - NotFound: a required directory or file is absent
// - ConfigFormat: a structured file exists but cannot be used as-is
// - Persistence: the filesystem refused a read or write
//
// The interactive layer decides what to do with these (status line message,
// stderr, exit code) - the core never recovers or retries on its own.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("config format error in {}: {}", .path.display(), .message)]
    ConfigFormat { path: PathBuf, message: String },

    #[error("persistence error for {}: {}", .path.display(), .source)]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Map an I/O error for `path`, folding the missing-file case into NotFound.
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(path.to_path_buf())
        } else {
            Error::Persistence {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn config_format(path: &std::path::Path, message: impl Into<String>) -> Self {
        Error::ConfigFormat {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}
