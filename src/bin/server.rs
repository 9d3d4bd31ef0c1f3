//! lsmkv Server Binary
//!
//! Opens the engine and serves it over TCP.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use lsmkv::network::Server;
use lsmkv::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// lsmkv Server
#[derive(Parser, Debug)]
#[command(name = "lsmkv-server")]
#[command(about = "Log-structured key-value store server")]
#[command(version)]
struct Args {
    /// Directory holding the WAL and SSTables
    #[arg(short, long, default_value = "./sstable")]
    data_dir: PathBuf,

    /// File name prefix for SSTables
    #[arg(short = 'P', long, default_value = "sstable")]
    sstable_prefix: String,

    /// Maximum entries in the memtable before flush
    #[arg(short = 'm', long, default_value = "1000")]
    max_memtable_size: usize,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Connection worker threads
    #[arg(short, long, default_value = "8")]
    workers: usize,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lsmkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("lsmkv server v{}", lsmkv::VERSION);

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .sstable_prefix(&args.sstable_prefix)
        .max_memtable_size(args.max_memtable_size)
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .build();

    let engine = match Engine::open(config.clone()) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config, Arc::clone(&engine)) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = engine.sync() {
        tracing::error!("Failed to sync WAL: {}", e);
    }
}
