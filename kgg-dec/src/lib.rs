//! Batch decryption of Kugou kgg files.
//!
//! Keys are dumped once from the encrypted `KGMusicV3.db` through the sqlite
//! functions exported by the infra library, then a [`WorkerPool`] decrypts
//! every discovered file with a cipher built by the caller's
//! [`CipherFactory`](kgg::CipherFactory).
//!
//! A frontend binary only has to supply the cipher:
//!
//! ```no_run
//! use kgg::{CipherError, CipherSession};
//! use std::process::ExitCode;
//!
//! struct Qmc2;
//!
//! impl CipherSession for Qmc2 {
//!     fn decrypt(&mut self, buf: &mut [u8], offset: u64) {
//!         // ...
//!     }
//! }
//!
//! fn main() -> ExitCode {
//!     kgg_dec::main_with(|key: &str| {
//!         if key.is_empty() {
//!             return Err(CipherError::InvalidKey(key.to_owned()));
//!         }
//!         Ok(Qmc2)
//!     })
//! }
//! ```

mod args;
mod driver;
mod error;
mod logger;
mod pool;
mod task;
mod walk;

pub use args::{Args, DEFAULT_PASSPHRASE};
pub use driver::{
    Config, DEFAULT_LIBRARY, Summary, decrypt_all, default_threads, load_keys, run,
};
pub use error::{FailureKind, StartupError, TaskError};
pub use logger::Logger;
pub use pool::WorkerPool;
pub use task::{CHUNK_SIZE, DecryptionTask, OUTPUT_SUFFIX, TaskState};
pub use walk::{KGG_EXTENSION, expand_inputs, is_kgg, walk};

use clap::{ColorChoice, Parser};
use colored::Colorize;
use kgg::CipherFactory;
use log::info;
use std::{
    io::{IsTerminal, stderr},
    process::ExitCode,
};

/// Parse the command line, run and turn the outcome into an exit code.
///
/// Per-file failures are only logged. A non-zero code means the run could not
/// start at all.
pub fn main_with<F: CipherFactory + 'static>(factory: F) -> ExitCode {
    let args = Args::parse();

    colored::control::set_override(match args.color {
        ColorChoice::Always => true,
        ColorChoice::Auto => stderr().is_terminal(),
        ColorChoice::Never => false,
    });
    Logger::init(args.level_filter());

    info!(
        "{} v{}",
        env!("CARGO_PKG_NAME").bold(),
        env!("CARGO_PKG_VERSION")
    );

    match args.execute(factory) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "error".bold().red(), e);
            ExitCode::FAILURE
        }
    }
}
