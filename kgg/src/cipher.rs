use crate::error::CipherError;

/// Keyed transform over the payload of one kgg file.
///
/// `offset` is the position of `buf[0]` relative to the first payload byte.
/// Output must depend only on the key and the absolute position of each byte,
/// so a range gives the same result however the caller splits it into calls.
pub trait CipherSession {
    fn decrypt(&mut self, buf: &mut [u8], offset: u64);
}

/// Creates a fresh [`CipherSession`] for every file.
///
/// Shared by all workers, hence `Send + Sync`. Closures returning a session
/// implement it directly.
///
/// ```
/// use kgg::{CipherError, CipherFactory, CipherSession};
///
/// struct Plain;
///
/// impl CipherSession for Plain {
///     fn decrypt(&mut self, _: &mut [u8], _: u64) {}
/// }
///
/// let factory = |key: &str| {
///     if key.is_empty() {
///         Err(CipherError::InvalidKey("empty".to_owned()))
///     } else {
///         Ok(Plain)
///     }
/// };
///
/// assert!(factory.session("ekey").is_ok());
/// assert!(factory.session("").is_err());
/// ```
pub trait CipherFactory: Send + Sync {
    type Session: CipherSession;

    fn session(&self, key: &str) -> Result<Self::Session, CipherError>;
}

impl<F, S> CipherFactory for F
where
    F: Fn(&str) -> Result<S, CipherError> + Send + Sync,
    S: CipherSession,
{
    type Session = S;

    fn session(&self, key: &str) -> Result<S, CipherError> {
        self(key)
    }
}
