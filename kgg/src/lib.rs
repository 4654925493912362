//! This crate parses the kgg audio container and defines the contract a
//! keyed cipher has to fulfil to decrypt its payload.
//!
//! A kgg file is a fixed [`HEADER_SIZE`] byte header followed by the encrypted
//! audio stream at [`KggHeader::payload_offset`]. The header names the track
//! by its [`ContentHash`], which is looked up in the key database to obtain the
//! key for a [`CipherFactory`].
//!
//! # Example
//!
//! ```no_run
//! use kgg::{AudioFormat, CipherFactory, CipherSession, KggHeader, SNIFF_LEN};
//! use std::{fs::File, io::{Read, Seek, SeekFrom}};
//!
//! fn sniff<F: CipherFactory>(factory: &F, key: &str) -> Result<AudioFormat, Box<dyn std::error::Error>> {
//!     let mut file = File::open("song.kgg")?;
//!     let header = KggHeader::read(&mut file)?;
//!     let mut session = factory.session(key)?;
//!
//!     let mut magic = [0; SNIFF_LEN];
//!     file.seek(SeekFrom::Start(header.payload_offset as u64))?;
//!     file.read_exact(&mut magic)?;
//!     session.decrypt(&mut magic, 0);
//!     Ok(AudioFormat::sniff(&magic))
//! }
//! ```

mod cipher;
mod error;
mod format;
mod header;
mod reader;

pub use cipher::{CipherFactory, CipherSession};
pub use error::{CipherError, HeaderError};
pub use format::{AudioFormat, SNIFF_LEN};
pub use header::{ContentHash, Field, HASH_LEN, HEADER_SIZE, KggHeader, MAGIC, SUPPORTED_MODE, field};
pub use reader::{Endianness, Reader};
