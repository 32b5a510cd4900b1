//! Errors from reading and writing data directories.

use std::path::{Path, PathBuf};

use curdata_core::CurrencyError;

/// A filesystem or data error, tagged with the file it concerns.
#[derive(Debug)]
pub enum StoreError {
    /// Reading, writing, or listing `path` failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// `path` was read but its contents are not valid currency data.
    Data {
        path: PathBuf,
        source: CurrencyError,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn data(path: &Path, source: CurrencyError) -> Self {
        Self::Data {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The file the error concerns.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Data { path, .. } => path,
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Data { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Data { source, .. } => Some(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
