//! In-process stand-in for the infra library, selected per test by database file name.

use crate::{
    library::{Sqlite3, Sqlite3Stmt, SqliteFns},
    status,
};
use core::ffi::{CStr, c_char, c_int, c_uchar, c_void};
use std::{
    ffi::CString,
    path::Path,
    ptr,
    sync::atomic::{AtomicUsize, Ordering},
};

pub const FAKE_PASSPHRASE: &str = "fake-passphrase";

const SCENARIOS: usize = 8;

static CLOSED: [AtomicUsize; SCENARIOS] = [const { AtomicUsize::new(0) }; SCENARIOS];
static FINALIZED: [AtomicUsize; SCENARIOS] = [const { AtomicUsize::new(0) }; SCENARIOS];
static KEYED: [AtomicUsize; SCENARIOS] = [const { AtomicUsize::new(0) }; SCENARIOS];

#[derive(Clone, Copy, Debug)]
pub enum Scenario {
    Keys,
    Corrupt,
    Locked,
    Plain,
    CantOpen,
    NoPrepare,
    Nulls,
    Closing,
}

impl Scenario {
    pub const HASH_A: &'static str = "a0a1a2a3a4a5a6a7a8a9aaabacadaeaf";
    pub const HASH_B: &'static str = "b0b1b2b3b4b5b6b7b8b9babbbcbdbebf";

    fn from_path(path: &CStr) -> Self {
        let path = path.to_string_lossy();
        let stem = Path::new(&*path)
            .file_stem()
            .and_then(|x| x.to_str())
            .unwrap_or_default()
            .to_owned();

        match stem.as_str() {
            "corrupt" => Self::Corrupt,
            "locked" => Self::Locked,
            "plain" => Self::Plain,
            "cantopen" => Self::CantOpen,
            "noprepare" => Self::NoPrepare,
            "nulls" => Self::Nulls,
            "closing" => Self::Closing,
            _ => Self::Keys,
        }
    }

    pub fn closed(self) -> usize {
        CLOSED[self as usize].load(Ordering::SeqCst)
    }

    pub fn finalized(self) -> usize {
        FINALIZED[self as usize].load(Ordering::SeqCst)
    }

    pub fn keyed(self) -> usize {
        KEYED[self as usize].load(Ordering::SeqCst)
    }

    fn rows(self) -> Vec<(Option<CString>, Option<CString>)> {
        let text = |x: &str| Some(CString::new(x).unwrap());

        match self {
            Self::Nulls => vec![
                (text(Self::HASH_A), None),
                (None, text("orphan")),
                (text(Self::HASH_B), text("key-b")),
            ],
            _ => vec![
                (text(Self::HASH_A), text("key-a")),
                (text(Self::HASH_B), text("key-b")),
            ],
        }
    }
}

struct FakeDb {
    scenario: Scenario,
}

struct FakeStmt {
    scenario: Scenario,
    rows: Vec<(Option<CString>, Option<CString>)>,
    cursor: usize,
}

unsafe extern "C" fn open_v2(
    filename: *const c_char,
    db: *mut *mut Sqlite3,
    _flags: c_int,
    _vfs: *const c_char,
) -> c_int {
    // SAFETY: the reader passes a nul terminated path and a valid out pointer.
    let scenario = Scenario::from_path(unsafe { CStr::from_ptr(filename) });
    let handle = Box::into_raw(Box::new(FakeDb { scenario }));
    unsafe { *db = handle.cast() };

    match scenario {
        Scenario::CantOpen => 14,
        _ => status::OK,
    }
}

unsafe extern "C" fn key(db: *mut Sqlite3, key: *const c_void, len: c_int) -> c_int {
    // SAFETY: `db` was boxed by `open_v2` and `key` points to `len` bytes.
    let db = unsafe { &*db.cast::<FakeDb>() };
    KEYED[db.scenario as usize].fetch_add(1, Ordering::SeqCst);

    let key = unsafe { std::slice::from_raw_parts(key.cast::<u8>(), len as usize) };

    if key == FAKE_PASSPHRASE.as_bytes() {
        status::OK
    } else {
        26
    }
}

unsafe extern "C" fn prepare_v2(
    db: *mut Sqlite3,
    _sql: *const c_char,
    _len: c_int,
    stmt: *mut *mut Sqlite3Stmt,
    _tail: *mut *const c_char,
) -> c_int {
    // SAFETY: `db` was boxed by `open_v2` and `stmt` is a valid out pointer.
    let db = unsafe { &*db.cast::<FakeDb>() };

    if let Scenario::NoPrepare = db.scenario {
        unsafe { *stmt = ptr::null_mut() };
        return status::ERROR;
    }

    let handle = Box::into_raw(Box::new(FakeStmt {
        scenario: db.scenario,
        rows: db.scenario.rows(),
        cursor: 0,
    }));
    unsafe { *stmt = handle.cast() };
    status::OK
}

unsafe extern "C" fn step(stmt: *mut Sqlite3Stmt) -> c_int {
    // SAFETY: `stmt` was boxed by `prepare_v2` and is not finalized yet.
    let stmt = unsafe { &mut *stmt.cast::<FakeStmt>() };

    if stmt.cursor < stmt.rows.len() {
        stmt.cursor += 1;
        return status::ROW;
    }

    match stmt.scenario {
        Scenario::Corrupt => 11,
        _ => status::DONE,
    }
}

unsafe extern "C" fn column_text(stmt: *mut Sqlite3Stmt, column: c_int) -> *const c_uchar {
    // SAFETY: `stmt` was boxed by `prepare_v2` and is not finalized yet.
    let stmt = unsafe { &*stmt.cast::<FakeStmt>() };
    let (hash, key) = &stmt.rows[stmt.cursor - 1];
    let text = if column == 0 { hash } else { key };

    text.as_ref()
        .map(|x| x.as_ptr().cast())
        .unwrap_or(ptr::null())
}

unsafe extern "C" fn finalize(stmt: *mut Sqlite3Stmt) -> c_int {
    // SAFETY: finalize is called once per statement boxed by `prepare_v2`.
    let stmt = unsafe { Box::from_raw(stmt.cast::<FakeStmt>()) };
    FINALIZED[stmt.scenario as usize].fetch_add(1, Ordering::SeqCst);
    status::OK
}

unsafe extern "C" fn close_v2(db: *mut Sqlite3) -> c_int {
    // SAFETY: close is called once per handle boxed by `open_v2`.
    let db = unsafe { Box::from_raw(db.cast::<FakeDb>()) };
    CLOSED[db.scenario as usize].fetch_add(1, Ordering::SeqCst);
    status::OK
}

pub fn fake_fns() -> SqliteFns {
    SqliteFns {
        open_v2,
        key,
        prepare_v2,
        step,
        column_text,
        finalize,
        close_v2,
    }
}
