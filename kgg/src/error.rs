use thiserror::Error;

/// Reasons a kgg header is rejected. Validation stops at the first mismatch.
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("invalid header")]
    InvalidHeader,

    #[error("unsupported encryption mode (expected={expected:#04x}, got={actual:#04x})")]
    UnsupportedMode { expected: u32, actual: u32 },

    #[error("invalid hash length (expected={expected:#04x}, got={actual:#04x})")]
    InvalidHashLength { expected: u32, actual: u32 },

    #[error("cannot read header: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a [`CipherFactory`](crate::CipherFactory).
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("invalid decryption key: {0}")]
    InvalidKey(String),
}
