use crate::{
    error::{StartupError, TaskError},
    pool::WorkerPool,
    task::{CHUNK_SIZE, DecryptionTask},
    walk,
};
use kgg::CipherFactory;
use kgm_infra::{InfraLibrary, KeyDatabase, KeyTable};
use log::{debug, error, info};
use std::{
    panic::{self, AssertUnwindSafe},
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

pub const DEFAULT_LIBRARY: &str = "infra.dll";

/// Options of a single run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Files, directories or glob patterns to scan.
    pub inputs: Vec<PathBuf>,
    /// Shared library exporting the sqlite entry points.
    pub library: PathBuf,
    /// Encrypted key database.
    pub database: PathBuf,
    /// Passphrase of the key database, not applied when empty.
    pub passphrase: String,
    /// Decrypt every file found instead of only `.kgg` files.
    pub scan_all: bool,
    /// Destination of decrypted files, next to the source when `None`.
    pub output_dir: Option<PathBuf>,
    pub threads: usize,
    pub chunk_size: usize,
}

impl Config {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(library: P, database: Q) -> Self {
        Self {
            inputs: vec![PathBuf::from(".")],
            library: library.into(),
            database: database.into(),
            passphrase: String::new(),
            scan_all: false,
            output_dir: None,
            threads: default_threads(),
            chunk_size: CHUNK_SIZE,
        }
    }

    fn out_dir(&self, source: &Path) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            source
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
        })
    }
}

/// Two less than the available cores, but at least two.
pub fn default_threads() -> usize {
    thread::available_parallelism()
        .map(|x| x.get())
        .unwrap_or(2)
        .saturating_sub(2)
        .max(2)
}

/// Outcome counts of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub decrypted: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Default)]
struct Counters {
    decrypted: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

impl Counters {
    fn record(&self, result: &Result<PathBuf, TaskError>) {
        let counter = match result {
            Ok(_) => &self.decrypted,
            Err(e) if e.is_skip() => &self.skipped,
            Err(_) => &self.failed,
        };

        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn summary(&self) -> Summary {
        Summary {
            decrypted: self.decrypted.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Load the infra library, dump every key from the database and release both
/// again. Runs on the calling thread before any worker exists.
pub fn load_keys(config: &Config) -> Result<KeyTable, StartupError> {
    let library_path =
        std::path::absolute(&config.library).unwrap_or_else(|_| config.library.clone());

    if !library_path.exists() {
        return Err(StartupError::LibraryNotFound(library_path));
    }

    if !config.database.exists() {
        return Err(StartupError::DatabaseNotFound(config.database.clone()));
    }

    let mut library = InfraLibrary::load(&library_path).map_err(StartupError::Bind)?;
    let keys = {
        let mut db = KeyDatabase::open(&library, &config.database, &config.passphrase)
            .map_err(StartupError::Open)?;
        let keys = db.dump_keys().map_err(StartupError::DumpKeys)?;
        db.close();
        keys
    };
    library.release();

    info!("Loaded {} keys from {}", keys.len(), config.database.display());
    for (hash, key) in &keys {
        debug!("{} --> {}", hash, key);
    }

    Ok(keys)
}

/// Decrypt every file found below `config.inputs` with a pool of
/// `config.threads` workers sharing `keys` read-only.
pub fn decrypt_all<F>(
    config: &Config,
    keys: Arc<KeyTable>,
    factory: Arc<F>,
) -> Result<Summary, StartupError>
where
    F: CipherFactory + 'static,
{
    let counters = Arc::new(Counters::default());
    let mut pool = WorkerPool::new();

    for _ in 0..config.threads.max(1) {
        let keys = Arc::clone(&keys);
        let factory = Arc::clone(&factory);
        let counters = Arc::clone(&counters);
        let mut buf = vec![0; config.chunk_size.max(1)];

        pool.add_worker(move |mut task: DecryptionTask| {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                task.execute(&keys, factory.as_ref(), &mut buf)
            }));

            match result {
                Ok(result) => {
                    task.report(&result);
                    counters.record(&result);
                }
                Err(_) => {
                    error!("decryption panicked ({})", task.source().display());
                    counters.failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        })?;
    }

    debug!("Started {} worker threads", pool.workers());

    for input in walk::expand_inputs(&config.inputs) {
        walk::walk(&input, config.scan_all, |source| {
            let out_dir = config.out_dir(&source);
            pool.push(DecryptionTask::new(source, out_dir));
        });
    }

    pool.join();

    let summary = counters.summary();
    info!(
        "Decrypted {} files ({} skipped, {} failed)",
        summary.decrypted, summary.skipped, summary.failed
    );
    Ok(summary)
}

/// Load the keys, then decrypt all inputs with ciphers built by `factory`.
pub fn run<F>(config: &Config, factory: F) -> Result<Summary, StartupError>
where
    F: CipherFactory + 'static,
{
    let keys = load_keys(config)?;
    decrypt_all(config, Arc::new(keys), Arc::new(factory))
}
