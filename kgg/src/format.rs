/// Number of decrypted payload bytes needed by [`AudioFormat::sniff`].
pub const SNIFF_LEN: usize = 4;

/// Audio format of a decrypted payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AudioFormat {
    Flac,
    Ogg,
    #[default]
    Mp3,
}

impl AudioFormat {
    /// Detect the format from the leading bytes of the decrypted payload.
    /// Anything unrecognised, including a payload shorter than [`SNIFF_LEN`], is mp3.
    pub fn sniff(magic: &[u8]) -> Self {
        match magic.get(..SNIFF_LEN) {
            Some(b"fLaC") => Self::Flac,
            Some(b"OggS") => Self::Ogg,
            _ => Self::Mp3,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Flac => "flac",
            Self::Ogg => "ogg",
            Self::Mp3 => "mp3",
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
