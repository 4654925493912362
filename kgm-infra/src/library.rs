use crate::{Error, Result};
use core::ffi::{c_char, c_int, c_uchar, c_void};
use libloading::Library;
use std::path::Path;

/// Opaque `sqlite3` connection handle.
#[repr(C)]
pub struct Sqlite3 {
    _private: [u8; 0],
}

/// Opaque `sqlite3_stmt` prepared statement handle.
#[repr(C)]
pub struct Sqlite3Stmt {
    _private: [u8; 0],
}

pub type OpenV2Fn =
    unsafe extern "C" fn(*const c_char, *mut *mut Sqlite3, c_int, *const c_char) -> c_int;
pub type KeyFn = unsafe extern "C" fn(*mut Sqlite3, *const c_void, c_int) -> c_int;
pub type PrepareV2Fn = unsafe extern "C" fn(
    *mut Sqlite3,
    *const c_char,
    c_int,
    *mut *mut Sqlite3Stmt,
    *mut *const c_char,
) -> c_int;
pub type StepFn = unsafe extern "C" fn(*mut Sqlite3Stmt) -> c_int;
pub type ColumnTextFn = unsafe extern "C" fn(*mut Sqlite3Stmt, c_int) -> *const c_uchar;
pub type FinalizeFn = unsafe extern "C" fn(*mut Sqlite3Stmt) -> c_int;
pub type CloseV2Fn = unsafe extern "C" fn(*mut Sqlite3) -> c_int;

/// Entry points resolved from the infra library.
///
/// Every field is required, so a value of this type is always a complete
/// binding.
#[derive(Clone, Copy, Debug)]
pub struct SqliteFns {
    pub open_v2: OpenV2Fn,
    pub key: KeyFn,
    pub prepare_v2: PrepareV2Fn,
    pub step: StepFn,
    pub column_text: ColumnTextFn,
    pub finalize: FinalizeFn,
    pub close_v2: CloseV2Fn,
}

fn symbol<T: Copy>(lib: &Library, name: &'static str) -> Result<T> {
    // SAFETY: callers pair each name with the type alias of its C prototype.
    unsafe { lib.get::<T>(name.as_bytes()) }
        .map(|x| *x)
        .map_err(|_| Error::MissingSymbol(name))
}

impl SqliteFns {
    fn resolve(lib: &Library) -> Result<Self> {
        Ok(Self {
            open_v2: symbol(lib, "sqlite3_open_v2")?,
            key: symbol(lib, "sqlite3_key")?,
            prepare_v2: symbol(lib, "sqlite3_prepare_v2")?,
            step: symbol(lib, "sqlite3_step")?,
            column_text: symbol(lib, "sqlite3_column_text")?,
            finalize: symbol(lib, "sqlite3_finalize")?,
            close_v2: symbol(lib, "sqlite3_close_v2")?,
        })
    }
}

/// Runtime binding to the vendor infra library (`infra.dll`), which bundles an
/// encryption capable sqlite build.
///
/// A value is either fully bound or released; a partially resolved symbol set
/// is never exposed.
///
/// # Example
///
/// ```no_run
/// use kgm_infra::InfraLibrary;
///
/// let mut lib = InfraLibrary::load("infra.dll")?;
/// assert!(lib.is_ready());
/// lib.release();
/// lib.release();
/// assert!(!lib.is_ready());
/// # Ok::<(), kgm_infra::Error>(())
/// ```
#[derive(Debug)]
pub struct InfraLibrary {
    fns: Option<SqliteFns>,
    library: Option<Library>,
}

impl InfraLibrary {
    /// Load the library at `path` and resolve all required entry points.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // SAFETY: loading runs the library initialisers, nothing else is
        // executed until the resolved entry points are called.
        let library = unsafe { Library::new(path) }.map_err(|source| Error::LoadLibrary {
            path: path.to_owned(),
            source,
        })?;

        // An error here drops `library`, unloading it again.
        let fns = SqliteFns::resolve(&library)?;

        Ok(Self {
            fns: Some(fns),
            library: Some(library),
        })
    }

    /// Bind an already linked function table.
    pub fn from_fns(fns: SqliteFns) -> Self {
        Self {
            fns: Some(fns),
            library: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.fns.is_some()
    }

    /// Resolved entry points, or [`Error::NotReady`] after [`release`](Self::release).
    pub fn fns(&self) -> Result<&SqliteFns> {
        self.fns.as_ref().ok_or(Error::NotReady)
    }

    /// Clear the entry points and unload the library. Calling it again is a no-op.
    pub fn release(&mut self) {
        self.fns = None;
        drop(self.library.take());
    }
}

impl Drop for InfraLibrary {
    fn drop(&mut self) {
        self.release();
    }
}
