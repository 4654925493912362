use kgg::{CipherError, HeaderError};
use kgm_infra::status;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Why a single file was not decrypted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    BadHeader,
    UnsupportedMode,
    BadHashLength,
    KeyNotFound,
    InvalidKey,
    OutputExists,
    CannotOpenOutput,
    Io,
}

/// Per-file failure. The run carries on with the remaining files.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error("ekey not found")]
    KeyNotFound,

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error("output file already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("failed to open output file {}: {source}", path.display())]
    CannotOpenOutput { path: PathBuf, source: io::Error },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl TaskError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Header(HeaderError::InvalidHeader) => FailureKind::BadHeader,
            Self::Header(HeaderError::UnsupportedMode { .. }) => FailureKind::UnsupportedMode,
            Self::Header(HeaderError::InvalidHashLength { .. }) => FailureKind::BadHashLength,
            Self::Header(HeaderError::Io(_)) | Self::Io(_) => FailureKind::Io,
            Self::KeyNotFound => FailureKind::KeyNotFound,
            Self::Cipher(_) => FailureKind::InvalidKey,
            Self::OutputExists(_) => FailureKind::OutputExists,
            Self::CannotOpenOutput { .. } => FailureKind::CannotOpenOutput,
        }
    }

    /// An existing output is skipped, not treated as a failure.
    pub fn is_skip(&self) -> bool {
        self.kind() == FailureKind::OutputExists
    }
}

/// Failures which abort the run before any file is decrypted.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("infra library not found: {}", .0.display())]
    LibraryNotFound(PathBuf),

    #[error("key database not found: {}", .0.display())]
    DatabaseNotFound(PathBuf),

    #[error("db init error, is the infra library ok? {0}")]
    Bind(#[source] kgm_infra::Error),

    #[error("db init error: {0}")]
    Open(#[source] kgm_infra::Error),

    #[error("dump ekey failed {} ({})", .0.code(), status::describe(.0.code()))]
    DumpKeys(#[source] kgm_infra::Error),

    #[error("cannot spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
}
