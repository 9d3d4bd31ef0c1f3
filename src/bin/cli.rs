//! lsmkv CLI Client
//!
//! Command-line interface for a running lsmkv server, plus a local
//! append-only log database for comparison.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lsmkv::network::Client;
use lsmkv::storage::AppendLog;

/// lsmkv CLI
#[derive(Parser, Debug)]
#[command(name = "lsmkv-cli")]
#[command(about = "CLI for the lsmkv key-value store")]
struct Args {
    /// Server host
    #[arg(short = 'H', long, default_value = "localhost", global = true)]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "8080", global = true)]
    port: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Ping the server
    Ping,

    /// Use a local append-only log file instead of the server
    Db {
        /// Path to the database file
        #[arg(short = 'P', long, default_value = "./database.txt")]
        db_path: PathBuf,

        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommands {
    /// Get the last value written for a key
    Get { key: String },

    /// Append a key-value pair
    Set { key: String, value: String },
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> lsmkv::Result<()> {
    match args.command {
        Commands::Db { db_path, command } => run_db(&db_path, command),
        Commands::Set { key, value } => {
            connect(&args.host, args.port)?.set(&key, &value)?;
            println!("Set {}={}", key, value);
            Ok(())
        }
        Commands::Get { key } => match connect(&args.host, args.port)?.get(&key)? {
            Some(value) => {
                println!("{}={}", key, value);
                Ok(())
            }
            None => Err(not_found()),
        },
        Commands::Ping => {
            connect(&args.host, args.port)?.ping()?;
            println!("PONG");
            Ok(())
        }
    }
}

fn run_db(db_path: &Path, command: DbCommands) -> lsmkv::Result<()> {
    let log = AppendLog::new(db_path);
    match command {
        DbCommands::Set { key, value } => {
            log.set(&key, &value)?;
            println!("Set {}={} in {}", key, value, db_path.display());
            Ok(())
        }
        DbCommands::Get { key } => match log.get(&key)? {
            Some(value) => {
                println!("{}={} in {}", key, value, db_path.display());
                Ok(())
            }
            None => Err(not_found()),
        },
    }
}

fn connect(host: &str, port: u16) -> lsmkv::Result<Client> {
    Client::connect((host, port))
}

fn not_found() -> lsmkv::LsmError {
    lsmkv::LsmError::Storage("key not found".to_string())
}
