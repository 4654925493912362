//! Status codes returned by the bound sqlite entry points.

use core::ffi::c_int;

pub const OK: c_int = 0;
pub const ERROR: c_int = 1;
pub const ROW: c_int = 100;
pub const DONE: c_int = 101;

/// Flag passed to `sqlite3_open_v2`.
pub const OPEN_READONLY: c_int = 0x0000_0001;

/// Human readable description of a status code, used when reporting failures.
///
/// ```
/// assert_eq!(kgm_infra::status::describe(11), "SQLITE_CORRUPT: The database disk image is malformed");
/// assert_eq!(kgm_infra::status::describe(-1), "<unknown>");
/// ```
pub fn describe(code: c_int) -> &'static str {
    match code {
        1 => "SQLITE_ERROR: Generic error",
        2 => "SQLITE_INTERNAL: Internal logic error in SQLite",
        3 => "SQLITE_PERM: Access permission denied",
        4 => "SQLITE_ABORT: Callback routine requested an abort",
        5 => "SQLITE_BUSY: The database file is locked",
        6 => "SQLITE_LOCKED: A table in the database is locked",
        7 => "SQLITE_NOMEM: A malloc() failed",
        8 => "SQLITE_READONLY: Attempt to write a readonly database",
        9 => "SQLITE_INTERRUPT: Operation terminated by sqlite3_interrupt()",
        10 => "SQLITE_IOERR: Some kind of disk I/O error occurred",
        11 => "SQLITE_CORRUPT: The database disk image is malformed",
        12 => "SQLITE_NOTFOUND: Unknown opcode in sqlite3_file_control()",
        13 => "SQLITE_FULL: Insertion failed because database is full",
        14 => "SQLITE_CANTOPEN: Unable to open the database file",
        15 => "SQLITE_PROTOCOL: Database lock protocol error",
        16 => "SQLITE_EMPTY: Internal use only",
        17 => "SQLITE_SCHEMA: The database schema changed",
        18 => "SQLITE_TOOBIG: String or BLOB exceeds size limit",
        19 => "SQLITE_CONSTRAINT: Abort due to constraint violation",
        20 => "SQLITE_MISMATCH: Data type mismatch",
        21 => "SQLITE_MISUSE: Library used incorrectly",
        22 => "SQLITE_NOLFS: Uses OS features not supported on host",
        23 => "SQLITE_AUTH: Authorization denied",
        24 => "SQLITE_FORMAT: Not used",
        25 => "SQLITE_RANGE: 2nd parameter to sqlite3_bind out of range",
        26 => "SQLITE_NOTADB: File opened that is not a database file",
        27 => "SQLITE_NOTICE: Notifications from sqlite3_log()",
        28 => "SQLITE_WARNING: Warnings from sqlite3_log()",
        ROW => "SQLITE_ROW: sqlite3_step() has another row ready",
        DONE => "SQLITE_DONE: sqlite3_step() has finished executing",
        _ => "<unknown>",
    }
}
