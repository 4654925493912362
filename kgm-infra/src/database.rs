use crate::{
    Error, InfraLibrary, KeyTable, Result,
    library::{Sqlite3, Sqlite3Stmt, SqliteFns},
    status,
};
use core::ffi::{CStr, c_char, c_int};
use std::{ffi::CString, path::Path, ptr};

/// Query selecting every `(content hash, key)` pair with a non empty key.
pub const KEY_QUERY: &CStr =
    c"select EncryptionKeyId, EncryptionKey from ShareFileItems where EncryptionKey != ''";

/// Read-only connection to the encrypted key database.
///
/// The connection borrows the [`InfraLibrary`] it was opened through, so the
/// library cannot be released while the connection is alive.
///
/// # Example
///
/// ```no_run
/// use kgm_infra::{InfraLibrary, KeyDatabase};
///
/// let lib = InfraLibrary::load("infra.dll")?;
/// let mut db = KeyDatabase::open(&lib, "KGMusicV3.db", "passphrase")?;
/// let keys = db.dump_keys()?;
/// db.close();
/// println!("{} keys", keys.len());
/// # Ok::<(), kgm_infra::Error>(())
/// ```
pub struct KeyDatabase<'a> {
    fns: &'a SqliteFns,
    db: *mut Sqlite3,
}

impl<'a> KeyDatabase<'a> {
    /// Open `path` read-only and apply `passphrase` when it is not empty.
    pub fn open<P: AsRef<Path>>(lib: &'a InfraLibrary, path: P, passphrase: &str) -> Result<Self> {
        let fns = lib.fns()?;
        let path = path.as_ref();
        let c_path = path
            .to_str()
            .and_then(|x| CString::new(x).ok())
            .ok_or_else(|| Error::InvalidPath(path.to_owned()))?;

        let mut this = Self {
            fns,
            db: ptr::null_mut(),
        };

        // sqlite may hand back a handle even when opening fails, `this` closes it on drop.
        // SAFETY: `c_path` is nul terminated and outlives the call, `this.db` is a
        // valid out pointer.
        let code = unsafe {
            (fns.open_v2)(
                c_path.as_ptr(),
                &mut this.db,
                status::OPEN_READONLY,
                ptr::null(),
            )
        };

        if code != status::OK {
            return Err(Error::Open {
                path: path.to_owned(),
                code,
            });
        }

        if !passphrase.is_empty() {
            let len = c_int::try_from(passphrase.len()).map_err(|_| Error::Key {
                code: status::ERROR,
            })?;
            // SAFETY: `this.db` is an open handle and `len` is the exact passphrase length.
            let code = unsafe { (fns.key)(this.db, passphrase.as_ptr().cast(), len) };

            if code != status::OK {
                return Err(Error::Key { code });
            }
        }

        Ok(this)
    }

    pub fn is_open(&self) -> bool {
        !self.db.is_null()
    }

    /// Run [`KEY_QUERY`] and collect every row into a [`KeyTable`].
    ///
    /// The table is only returned when the result set was drained completely,
    /// a statement which stops with anything but `SQLITE_DONE` yields
    /// [`Error::Query`].
    pub fn dump_keys(&self) -> Result<KeyTable> {
        if !self.is_open() {
            return Err(Error::NotOpen);
        }

        let mut raw = ptr::null_mut();
        // SAFETY: the handle is open and `KEY_QUERY` is nul terminated, hence the -1 length.
        let code = unsafe {
            (self.fns.prepare_v2)(
                self.db,
                KEY_QUERY.as_ptr(),
                -1,
                &mut raw,
                ptr::null_mut(),
            )
        };
        let stmt = Statement {
            fns: self.fns,
            raw,
        };

        if code != status::OK {
            return Err(Error::Prepare { code });
        }

        let mut keys = KeyTable::new();
        let mut rows = 0;

        let code = loop {
            let code = stmt.step();

            if code != status::ROW {
                break code;
            }

            rows += 1;

            if let (Some(hash), Some(key)) = (stmt.column_text(0), stmt.column_text(1)) {
                keys.insert(hash, key);
            }
        };

        drop(stmt);

        if code != status::DONE {
            return Err(Error::Query { code, rows });
        }

        Ok(keys)
    }

    /// Close the connection. Calling it again is a no-op.
    pub fn close(&mut self) {
        if !self.db.is_null() {
            // SAFETY: the handle is non-null and nulled right after, so it is closed once.
            unsafe { (self.fns.close_v2)(self.db) };
            self.db = ptr::null_mut();
        }
    }
}

impl Drop for KeyDatabase<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Prepared statement, finalized on drop.
struct Statement<'a> {
    fns: &'a SqliteFns,
    raw: *mut Sqlite3Stmt,
}

impl Statement<'_> {
    fn step(&self) -> c_int {
        // SAFETY: only built after a successful prepare, so `raw` is a live statement.
        unsafe { (self.fns.step)(self.raw) }
    }

    fn column_text(&self, column: c_int) -> Option<String> {
        // SAFETY: `raw` is a live statement positioned on a row.
        let text = unsafe { (self.fns.column_text)(self.raw, column) };

        if text.is_null() {
            return None;
        }

        // SAFETY: sqlite returns a nul terminated string valid until the next step.
        let text = unsafe { CStr::from_ptr(text.cast::<c_char>()) };
        Some(text.to_string_lossy().into_owned())
    }
}

impl Drop for Statement<'_> {
    fn drop(&mut self) {
        if !self.raw.is_null() {
            // SAFETY: `raw` came from prepare and is finalized only here.
            unsafe { (self.fns.finalize)(self.raw) };
        }
    }
}
