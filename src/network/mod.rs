//! Network Module
//!
//! TCP server, connection handling and a blocking client.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Fixed worker thread pool fed through a bounded channel
//! - Commands validated, then routed through Engine

mod server;
mod connection;
mod client;

pub use server::Server;
pub use connection::Connection;
pub use client::Client;
