//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::Engine;
use crate::error::{LsmError, Result};
use crate::protocol::{read_command, validate_command, write_response, Command, Response};

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Reference to the storage engine
    engine: Arc<Engine>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, engine: Arc<Engine>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
            engine,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 leaves a direction unbounded)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads commands in a loop and sends responses.
    /// Returns when the client disconnects or an error occurs.
    pub fn handle(&mut self) -> Result<()> {
        loop {
            let command = match read_command(&mut self.reader) {
                Ok(cmd) => cmd,
                Err(LsmError::Io(ref e)) if is_disconnect(e.kind()) => {
                    tracing::debug!(peer = %self.peer_addr, kind = ?e.kind(), "Client disconnected");
                    return Ok(());
                }
                Err(LsmError::Io(ref e))
                    if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                {
                    tracing::debug!(peer = %self.peer_addr, "Read timeout");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(peer = %self.peer_addr, error = %e, "Bad frame");
                    let _ = self.send_response(Response::bad_request(&e.to_string()));
                    return Err(e);
                }
            };

            tracing::trace!(peer = %self.peer_addr, ?command, "Received command");

            let response = self.execute_command(command);

            if let Err(e) = self.send_response(response) {
                if let LsmError::Io(ref io_err) = e {
                    if is_disconnect(io_err.kind()) || io_err.kind() == ErrorKind::BrokenPipe {
                        tracing::debug!(
                            peer = %self.peer_addr,
                            "Client disconnected before response could be sent"
                        );
                        return Ok(());
                    }
                }
                return Err(e);
            }
        }
    }

    /// Validate, execute, and map the outcome to a response status
    fn execute_command(&self, command: Command) -> Response {
        if let Err(e) = validate_command(&command) {
            return Response::bad_request(&e.to_string());
        }

        let is_get = matches!(command, Command::Get { .. });
        match self.engine.execute(command) {
            Ok(None) if is_get => Response::not_found(),
            Ok(payload) => Response::ok(payload),
            Err(LsmError::InvalidRequest(message)) => Response::bad_request(&message),
            Err(e) => {
                tracing::error!(peer = %self.peer_addr, error = %e, "Command failed");
                Response::error(&e.to_string())
            }
        }
    }

    /// Send a response to the client
    fn send_response(&mut self, response: Response) -> Result<()> {
        write_response(&mut self.writer, &response)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::UnexpectedEof | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted
    )
}
