//! TCP Server
//!
//! Accepts connections and dispatches them to worker threads.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, SendTimeoutError, Sender};

use crate::config::Config;
use crate::engine::Engine;
use crate::error::{LsmError, Result};

use super::Connection;

/// How long the accept loop sleeps when no client is waiting
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// TCP server for lsmkv
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: TcpListener,
    shutdown: AtomicBool,
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, engine: Arc<Engine>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            LsmError::Network(format!("Failed to bind {}: {}", config.listen_addr, e))
        })?;
        // Non-blocking so the loop can notice shutdown requests
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            engine,
            listener,
            shutdown: AtomicBool::new(false),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the accept loop until `shutdown` is called (blocking)
    pub fn run(&self) -> Result<()> {
        let workers = self.config.worker_threads.max(1);
        let (sender, receiver) = channel::bounded::<TcpStream>(workers * 4);

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let receiver = receiver.clone();
            let engine = Arc::clone(&self.engine);
            let config = self.config.clone();
            let handle = thread::Builder::new()
                .name(format!("lsmkv-worker-{}", id))
                .spawn(move || worker_loop(receiver, engine, config))?;
            handles.push(handle);
        }
        drop(receiver);

        tracing::info!(
            addr = %self.local_addr()?,
            workers,
            "Server listening"
        );

        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    tracing::debug!(%peer, "Accepted connection");
                    // Accepted sockets inherit non-blocking mode on some platforms
                    stream.set_nonblocking(false)?;
                    if !self.dispatch(&sender, stream) {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Accept failed");
                }
            }
        }

        // Closing the channel lets idle workers exit
        drop(sender);
        for handle in handles {
            let _ = handle.join();
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Queue a connection for the workers
    ///
    /// Waits while the queue is full, but gives up (dropping the connection)
    /// once shutdown is requested. Returns false when the loop should stop.
    fn dispatch(&self, sender: &Sender<TcpStream>, mut stream: TcpStream) -> bool {
        loop {
            match sender.send_timeout(stream, ACCEPT_POLL_INTERVAL) {
                Ok(()) => return true,
                Err(SendTimeoutError::Timeout(returned)) => {
                    if self.shutdown.load(Ordering::Relaxed) {
                        tracing::debug!("Shutting down with a full worker queue, dropping connection");
                        return false;
                    }
                    stream = returned;
                }
                Err(SendTimeoutError::Disconnected(_)) => return false,
            }
        }
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

fn worker_loop(receiver: Receiver<TcpStream>, engine: Arc<Engine>, config: Config) {
    for stream in receiver {
        let mut connection = match Connection::new(stream, Arc::clone(&engine)) {
            Ok(connection) => connection,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to set up connection");
                continue;
            }
        };

        if let Err(e) = connection.set_timeouts(config.read_timeout_ms, config.write_timeout_ms) {
            tracing::warn!(peer = connection.peer_addr(), error = %e, "Failed to set timeouts");
        }

        if let Err(e) = connection.handle() {
            tracing::warn!(peer = connection.peer_addr(), error = %e, "Connection closed with error");
        }
    }
}
