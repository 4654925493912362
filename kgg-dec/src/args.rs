use crate::driver::{self, Config, DEFAULT_LIBRARY, Summary};
use anyhow::Result;
use clap::{ArgAction, ColorChoice, Parser};
use kgg::CipherFactory;
use log::LevelFilter;
use std::path::PathBuf;

/// Passphrase KGMusicV3.db is encrypted with.
pub const DEFAULT_PASSPHRASE: &str = "7777B48756BA491BB4CEE771A3E2727E";

/// Decrypt kgg files with keys dumped from the Kugou key database.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Args {
    /// Files, directories or glob patterns e.g. *.kgg to decrypt.
    #[arg(default_value = ".")]
    pub inputs: Vec<PathBuf>,

    /// Path of the infra library exporting the sqlite functions.
    #[arg(long, default_value = DEFAULT_LIBRARY)]
    pub infra_dll: PathBuf,

    /// Path of KGMusicV3.db holding the decryption keys.
    #[arg(long, required = true)]
    pub db: PathBuf,

    /// Passphrase of the key database. An empty value opens it without a key.
    #[arg(
        long,
        env = "KGG_DB_KEY",
        default_value = DEFAULT_PASSPHRASE,
        hide_default_value = true,
        hide_env_values = true
    )]
    pub db_key: String,

    /// Decrypt every file found instead of only files with the .kgg extension.
    #[arg(long)]
    pub scan_all_file_ext: bool,

    /// Directory for decrypted files. Defaults to the directory of each source file.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Number of worker threads [default: number of cores - 2, at least 2]
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub threads: Option<u16>,

    /// Increase verbosity, -vv shows the dumped keys.
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only print warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// When to output colored text.
    #[arg(long, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

impl Args {
    pub fn level_filter(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Warn;
        }

        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn into_config(self) -> Config {
        let mut config = Config::new(self.infra_dll, self.db);
        config.inputs = self.inputs;
        config.passphrase = self.db_key;
        config.scan_all = self.scan_all_file_ext;
        config.output_dir = self.output_dir;

        if let Some(threads) = self.threads {
            config.threads = threads as usize;
        }

        config
    }

    pub fn execute<F: CipherFactory + 'static>(self, factory: F) -> Result<Summary> {
        let config = self.into_config();
        Ok(driver::run(&config, factory)?)
    }
}
