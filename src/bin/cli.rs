//! skipkv CLI
//!
//! Command-line interface over a snapshot file. Each run loads the
//! snapshot, applies one command, and writes the snapshot back if the
//! command changed anything.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use skipkv::{Config, DeleteOutcome, InsertOutcome, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// skipkv CLI
#[derive(Parser, Debug)]
#[command(name = "skipkv-cli")]
#[command(about = "CLI for the skipkv ordered key-value store")]
#[command(version)]
struct Args {
    /// Snapshot file to load and save
    #[arg(short, long, default_value = "store/dumpFile")]
    snapshot: PathBuf,

    /// Maximum skip list level
    #[arg(short, long, default_value = "16")]
    max_level: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Insert a key-value pair (existing keys are left unchanged)
    Put {
        /// The key to insert
        key: String,

        /// The value to insert
        value: String,
    },

    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Print every entry in key order
    List,

    /// Print every level of the skip list
    Show,

    /// Print the number of entries
    Count,
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> skipkv::Result<()> {
    let config = Config::builder()
        .max_level(args.max_level)
        .snapshot_path(&args.snapshot)
        .build();
    let store: Store<String, String> = Store::new(config)?;

    if args.snapshot.exists() {
        store.import()?;
    } else {
        tracing::info!("No snapshot at {}, starting empty", args.snapshot.display());
    }

    match args.command {
        Commands::Put { key, value } => match store.insert(key.clone(), value) {
            InsertOutcome::Inserted => {
                store.export()?;
                println!("OK");
            }
            InsertOutcome::AlreadyExists => println!("key {} exists", key),
        },
        Commands::Get { key } => match store.search(&key) {
            Some(value) => println!("{}", value),
            None => println!("(not found)"),
        },
        Commands::Del { key } => match store.delete(&key) {
            DeleteOutcome::Deleted => {
                store.export()?;
                println!("OK");
            }
            DeleteOutcome::NotFound => println!("(not found)"),
        },
        Commands::List => print!("{}", render_list(&store)),
        Commands::Show => print!("{}", store),
        Commands::Count => println!("{}", store.size()),
    }

    Ok(())
}

/// One `key<delimiter>value` line per entry, as in the snapshot file
fn render_list(store: &Store<String, String>) -> String {
    let delimiter = store.delimiter();
    store
        .enumerate()
        .map(|(key, value)| format!("{}{}{}\n", key, delimiter, value))
        .collect()
}
