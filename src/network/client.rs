//! Blocking client
//!
//! Speaks the wire protocol to a running server, one request at a time.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::{LsmError, Result};
use crate::protocol::{read_response, write_command, Command, Response, Status};

/// A connection to an lsmkv server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| LsmError::Network(format!("Failed to connect: {}", e)))?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Send one command and wait for its response
    pub fn request(&mut self, command: &Command) -> Result<Response> {
        write_command(&mut self.writer, command)?;
        read_response(&mut self.reader)
    }

    /// Store a key-value pair
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let response = self.request(&Command::Set {
            key: key.to_string(),
            value: value.to_string(),
        })?;

        match response.status {
            Status::Ok => Ok(()),
            _ => Err(Self::into_error(response)),
        }
    }

    /// Fetch a value; `Ok(None)` when the key does not exist
    pub fn get(&mut self, key: &str) -> Result<Option<String>> {
        let response = self.request(&Command::Get {
            key: key.to_string(),
        })?;

        match response.status {
            Status::Ok => Ok(Some(response.payload.unwrap_or_default())),
            Status::NotFound => Ok(None),
            _ => Err(Self::into_error(response)),
        }
    }

    /// Health check
    pub fn ping(&mut self) -> Result<()> {
        let response = self.request(&Command::Ping)?;
        match response.status {
            Status::Ok => Ok(()),
            _ => Err(Self::into_error(response)),
        }
    }

    fn into_error(response: Response) -> LsmError {
        let message = response.payload.unwrap_or_default();
        match response.status {
            Status::BadRequest => LsmError::InvalidRequest(message),
            Status::NotFound => LsmError::Protocol("unexpected NOT_FOUND".to_string()),
            _ => LsmError::Network(format!("server error: {}", message)),
        }
    }
}
