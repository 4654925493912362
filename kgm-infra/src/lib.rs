//! This crate binds the sqlite entry points exported by the vendor `infra.dll`
//! at runtime and dumps the kgg decryption keys stored in `KGMusicV3.db`.
//!
//! The library is loaded with [libloading](https://docs.rs/libloading) and
//! every required symbol must resolve, otherwise nothing is bound at all.
//! Statuses follow the sqlite C API, see [`status`].
//!
//! # Example
//!
//! ```no_run
//! use kgm_infra::{InfraLibrary, KeyDatabase};
//!
//! let mut lib = InfraLibrary::load("infra.dll")?;
//! let keys = {
//!     let db = KeyDatabase::open(&lib, "KGMusicV3.db", "passphrase")?;
//!     db.dump_keys()?
//! };
//! lib.release();
//!
//! for (hash, key) in &keys {
//!     println!("{} --> {}", hash, key);
//! }
//! # Ok::<(), kgm_infra::Error>(())
//! ```

mod database;
mod error;
mod key_table;
mod library;

#[cfg(test)]
mod fake;

pub mod status;

pub use database::{KEY_QUERY, KeyDatabase};
pub use error::Error;
pub use key_table::KeyTable;
pub use library::{
    CloseV2Fn, ColumnTextFn, FinalizeFn, InfraLibrary, KeyFn, OpenV2Fn, PrepareV2Fn, Sqlite3,
    Sqlite3Stmt, SqliteFns, StepFn,
};

/// A `Result` alias where the `Err` case is `kgm_infra::Error`.
pub type Result<T> = std::result::Result<T, Error>;
