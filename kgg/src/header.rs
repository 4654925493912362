//! Layout of the fixed 256 byte block at the start of every kgg file.
//!
//! | offset | width | field            | accepted value      |
//! |--------|-------|------------------|---------------------|
//! | `0x00` | 16    | magic            | [`MAGIC`]           |
//! | `0x10` | 4     | payload offset   | any                 |
//! | `0x14` | 4     | cipher mode      | [`SUPPORTED_MODE`]  |
//! | `0x44` | 4     | hash length      | [`HASH_LEN`]        |
//! | `0x48` | 32    | content hash     | any                 |
//!
//! Integers are little endian.

use crate::{
    error::HeaderError,
    reader::{Endianness, Reader},
};
use std::{
    fmt,
    io::{self, ErrorKind, Read},
};

pub const HEADER_SIZE: usize = 0x100;
pub const SUPPORTED_MODE: u32 = 5;
pub const HASH_LEN: u32 = 0x20;
pub const ENDIANNESS: Endianness = Endianness::Little;

pub const MAGIC: [u8; 16] = [
    0x7C, 0xD5, 0x32, 0xEB, 0x86, 0x02, 0x7F, 0x4B, 0xA8, 0xAF, 0xA6, 0x8E, 0x0F, 0xFF, 0x99, 0x14,
];

/// Position and width of one header field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: u64,
    pub width: usize,
}

impl Field {
    const fn new(name: &'static str, offset: u64, width: usize) -> Self {
        Self {
            name,
            offset,
            width,
        }
    }

    fn read_u32(&self, reader: &mut Reader) -> io::Result<u32> {
        debug_assert_eq!(self.width, 4);
        reader.seek(self.offset)?;
        reader.read_u32()
    }

    fn read_bytes<'a>(&self, reader: &mut Reader<'a>) -> io::Result<&'a [u8]> {
        reader.seek(self.offset)?;
        reader.read_bytes(self.width)
    }
}

pub mod field {
    use super::{Field, HASH_LEN};

    pub const MAGIC: Field = Field::new("magic", 0x00, 16);
    pub const PAYLOAD_OFFSET: Field = Field::new("payload_offset", 0x10, 4);
    pub const CIPHER_MODE: Field = Field::new("cipher_mode", 0x14, 4);
    pub const HASH_LENGTH: Field = Field::new("hash_length", 0x44, 4);
    pub const HASH: Field = Field::new("hash", 0x48, HASH_LEN as usize);
}

/// Identifier of the track, used to look up its decryption key.
///
/// Kept as raw bytes exactly as stored in the header.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; HASH_LEN as usize]);

impl ContentHash {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self)
    }
}

/// Validated kgg header.
///
/// # Example
///
/// ```
/// use kgg::{HEADER_SIZE, HeaderError, KggHeader};
///
/// let block = [0u8; HEADER_SIZE];
/// assert!(matches!(KggHeader::parse(&block), Err(HeaderError::InvalidHeader)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KggHeader {
    pub payload_offset: u32,
    pub cipher_mode: u32,
    pub hash: ContentHash,
}

impl KggHeader {
    /// Validate magic, cipher mode and hash length, in that order.
    pub fn parse(block: &[u8; HEADER_SIZE]) -> Result<Self, HeaderError> {
        let mut reader = Reader::new(block, ENDIANNESS);

        if field::MAGIC.read_bytes(&mut reader)? != MAGIC {
            return Err(HeaderError::InvalidHeader);
        }

        let cipher_mode = field::CIPHER_MODE.read_u32(&mut reader)?;
        if cipher_mode != SUPPORTED_MODE {
            return Err(HeaderError::UnsupportedMode {
                expected: SUPPORTED_MODE,
                actual: cipher_mode,
            });
        }

        let hash_len = field::HASH_LENGTH.read_u32(&mut reader)?;
        if hash_len != HASH_LEN {
            return Err(HeaderError::InvalidHashLength {
                expected: HASH_LEN,
                actual: hash_len,
            });
        }

        let payload_offset = field::PAYLOAD_OFFSET.read_u32(&mut reader)?;
        let mut hash = [0; HASH_LEN as usize];
        hash.copy_from_slice(field::HASH.read_bytes(&mut reader)?);

        Ok(Self {
            payload_offset,
            cipher_mode,
            hash: ContentHash(hash),
        })
    }

    /// Read the header block from the start of `reader` and parse it.
    /// A stream shorter than [`HEADER_SIZE`] is an invalid header.
    pub fn read<R: Read>(mut reader: R) -> Result<Self, HeaderError> {
        let mut block = [0; HEADER_SIZE];

        match reader.read_exact(&mut block) {
            Ok(()) => Self::parse(&block),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(HeaderError::InvalidHeader),
            Err(e) => Err(e.into()),
        }
    }
}
