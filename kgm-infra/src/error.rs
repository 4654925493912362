use crate::status;
use core::ffi::c_int;
use std::path::PathBuf;
use thiserror::Error;

/// The error type returned by binding and database operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot load {}: {source}", path.display())]
    LoadLibrary {
        path: PathBuf,
        source: libloading::Error,
    },

    #[error("required symbol `{0}` is missing from the infra library")]
    MissingSymbol(&'static str),

    #[error("infra library is not loaded")]
    NotReady,

    #[error("database path is not valid utf-8 or contains a nul byte: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("cannot open database {} ({})", path.display(), status::describe(*code))]
    Open { path: PathBuf, code: c_int },

    #[error("database key rejected ({})", status::describe(*code))]
    Key { code: c_int },

    #[error("database is not open")]
    NotOpen,

    #[error("cannot prepare key query ({})", status::describe(*code))]
    Prepare { code: c_int },

    #[error("key query stopped after {rows} rows ({})", status::describe(*code))]
    Query { code: c_int, rows: usize },
}

impl Error {
    /// Status code reported by the library, or [`status::ERROR`] when the
    /// failure happened before any call into it.
    pub fn code(&self) -> c_int {
        match self {
            Self::Open { code, .. }
            | Self::Key { code }
            | Self::Prepare { code }
            | Self::Query { code, .. } => *code,
            _ => status::ERROR,
        }
    }
}
