use crate::error::{FailureKind, TaskError};
use kgg::{AudioFormat, CipherFactory, CipherSession, KggHeader, SNIFF_LEN};
use kgm_infra::KeyTable;
use log::{info, warn};
use std::{
    borrow::Cow,
    fs::{File, OpenOptions},
    io::{self, ErrorKind, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

/// Size of the buffer each worker streams payloads through.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Appended to the source stem to name the decrypted file.
pub const OUTPUT_SUFFIX: &str = "_dec";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskState {
    Start,
    HeaderValidated,
    KeyResolved,
    TypeDetected(AudioFormat),
    Streaming,
    Done,
    Failed(FailureKind),
}

/// Decryption of one kgg file, owned by the worker executing it.
#[derive(Debug)]
pub struct DecryptionTask {
    source: PathBuf,
    out_dir: PathBuf,
    state: TaskState,
}

impl DecryptionTask {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(source: P, out_dir: Q) -> Self {
        Self {
            source: source.into(),
            out_dir: out_dir.into(),
            state: TaskState::Start,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    /// `<out_dir>/<stem>_dec.<ext>`
    pub fn output_path(&self, format: AudioFormat) -> PathBuf {
        let mut name = self.source.file_stem().unwrap_or_default().to_os_string();
        name.push(OUTPUT_SUFFIX);
        name.push(".");
        name.push(format.extension());
        self.out_dir.join(name)
    }

    fn file_name(&self) -> Cow<'_, str> {
        self.source
            .file_name()
            .unwrap_or(self.source.as_os_str())
            .to_string_lossy()
    }

    /// Decrypt the source file into [`output_path`](Self::output_path).
    ///
    /// `buf` is the chunk the payload is streamed through and must not be
    /// empty. An existing output file is never overwritten. When reading or
    /// writing fails mid-stream the partially written output is left in place.
    pub fn execute<F: CipherFactory>(
        &mut self,
        keys: &KeyTable,
        factory: &F,
        buf: &mut [u8],
    ) -> Result<PathBuf, TaskError> {
        debug_assert!(!buf.is_empty());

        let result = self.decrypt(keys, factory, buf);
        self.state = match &result {
            Ok(_) => TaskState::Done,
            Err(e) => TaskState::Failed(e.kind()),
        };
        result
    }

    fn decrypt<F: CipherFactory>(
        &mut self,
        keys: &KeyTable,
        factory: &F,
        buf: &mut [u8],
    ) -> Result<PathBuf, TaskError> {
        let mut input = File::open(&self.source)?;
        let header = KggHeader::read(&mut input)?;
        self.state = TaskState::HeaderValidated;

        let key = keys
            .get(header.hash.as_bytes())
            .ok_or(TaskError::KeyNotFound)?;
        self.state = TaskState::KeyResolved;

        let mut session = factory.session(key)?;
        let payload_offset = u64::from(header.payload_offset);

        let mut magic = [0; SNIFF_LEN];
        input.seek(SeekFrom::Start(payload_offset))?;
        let len = read_full(&mut input, &mut magic)?;
        session.decrypt(&mut magic[..len], 0);

        let format = AudioFormat::sniff(&magic[..len]);
        let output_path = self.output_path(format);
        self.state = TaskState::TypeDetected(format);

        if output_path.exists() {
            return Err(TaskError::OutputExists(output_path));
        }

        input.seek(SeekFrom::Start(payload_offset))?;
        let mut output = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&output_path)
        {
            Ok(x) => x,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(TaskError::OutputExists(output_path));
            }
            Err(source) => {
                return Err(TaskError::CannotOpenOutput {
                    path: output_path,
                    source,
                });
            }
        };
        self.state = TaskState::Streaming;

        stream(&mut input, &mut output, &mut session, buf)?;
        Ok(output_path)
    }

    /// Log the outcome of [`execute`](Self::execute), naming the source file.
    pub fn report(&self, result: &Result<PathBuf, TaskError>) {
        match result {
            Ok(output) => info!(
                "** OK **  -> {} ({})",
                output.file_name().unwrap_or_default().to_string_lossy(),
                self.file_name()
            ),
            Err(TaskError::OutputExists(output)) => warn!(
                "output file already exists: {} ({})",
                output.file_name().unwrap_or_default().to_string_lossy(),
                self.file_name()
            ),
            Err(e) => warn!("{} ({})", e, self.file_name()),
        }
    }
}

/// Decrypt everything left in `input` into `output`, one `buf` sized chunk at
/// a time. Chunks written before a failure stay written.
fn stream<R, W, S>(
    input: &mut R,
    output: &mut W,
    session: &mut S,
    buf: &mut [u8],
) -> io::Result<u64>
where
    R: Read,
    W: Write,
    S: CipherSession,
{
    let mut offset = 0;

    loop {
        let len = read_full(input, buf)?;

        if len == 0 {
            break;
        }

        session.decrypt(&mut buf[..len], offset);
        output.write_all(&buf[..len])?;
        offset += len as u64;
    }

    output.flush()?;
    Ok(offset)
}

/// Fill `buf` unless the reader runs dry first. Returns the number of bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}
