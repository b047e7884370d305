//! jsonkv - command-line front end
//!
//! Runs a single create, read or delete against a storage file and reports
//! the outcome. Retrieved values go to stdout as JSON; everything else is
//! logged to stderr.

use anyhow::Context;
use clap::{Parser, Subcommand};
use jsonkv::{Outcome, StorageConfig, StorageEngine, StorageError, Ttl};
use serde_json::Value;
use std::io;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// A file-backed JSON key-value store with per-entry time-to-live
#[derive(Debug, Parser)]
#[command(name = "jsonkv", version = jsonkv::VERSION, about)]
struct Cli {
    /// Storage file location
    #[arg(short, long, env = "JSONKV_PATH", default_value = jsonkv::DEFAULT_PATH)]
    path: String,

    /// Write indented JSON
    #[arg(long)]
    pretty: bool,

    /// Drop expired entries whenever the file is rewritten
    #[arg(long)]
    prune_expired: bool,

    /// Overwrite the file in place instead of writing and renaming
    #[arg(long)]
    in_place: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store a JSON object under a new key
    Create {
        /// Key, 1 to 32 characters
        key: String,
        /// JSON object, e.g. '{"name":"Ann"}'
        value: String,
        /// Seconds until the entry expires (0 = never)
        #[arg(short, long, default_value = "0")]
        ttl: Ttl,
    },
    /// Print the value stored under a key
    Read {
        /// Key to look up
        key: String,
    },
    /// Remove a key
    Delete {
        /// Key to remove
        key: String,
    },
}

impl Cli {
    fn config(&self) -> StorageConfig {
        StorageConfig::default()
            .with_path(&self.path)
            .with_pretty(self.pretty)
            .with_prune_expired(self.prune_expired)
            .with_atomic_writes(!self.in_place)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Set up logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    debug!(version = jsonkv::VERSION, path = %cli.path, "Starting jsonkv");
    let engine = StorageEngine::with_config(cli.config())?;

    let result = match cli.command {
        Command::Create { key, value, ttl } => {
            let value: Value = serde_json::from_str(&value)
                .with_context(|| format!("value for '{key}' is not valid JSON"))?;
            engine.create(&key, value, ttl)
        }
        Command::Read { key } => engine.read(&key),
        Command::Delete { key } => engine.delete(&key),
    };

    if report(result)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Prints an outcome and returns whether the operation succeeded. Rule
/// violations are logged; I/O errors are returned untouched.
fn report(result: Result<Outcome, StorageError>) -> anyhow::Result<bool> {
    match result {
        Ok(outcome) => {
            if let Some(value) = &outcome.value {
                println!("{}", serde_json::to_string_pretty(value)?);
            }
            info!("{}", outcome.message);
            Ok(true)
        }
        Err(e @ StorageError::Io(_)) => Err(e.into()),
        Err(e) => {
            error!("{e}");
            Ok(false)
        }
    }
}
