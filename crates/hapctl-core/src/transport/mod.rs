//! Socket transport for the stats socket protocol.
//!
//! Each call to [`Transport::send`] is one complete exchange: connect, write a
//! single newline-terminated command, read until the peer closes the stream,
//! then drop the connection. The load balancer closes its side after answering
//! a non-interactive command, so end-of-stream is the only response delimiter.
//!
//! The write and read discipline lives in [`exchange`], which is generic over
//! any `Read + Write` stream so tests can drive it with in-memory doubles.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use hapctl_config::{Config, SocketEndpoint};
use tracing::debug;

#[cfg(unix)]
use std::os::unix::net::UnixStream;

#[cfg(unix)]
use socket2::{Domain, SockAddr, Socket, Type};

use crate::error::AdminError;

/// Tracing target for transport events.
pub const TRANSPORT_TARGET: &str = "hapctl_core::transport";

/// Maximum number of bytes requested per receive call.
pub const READ_CHUNK_SIZE: usize = 2048;

/// Sends one command and returns the peer's complete response.
pub trait Transport {
    /// Performs a single request/response exchange.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Connection`], [`AdminError::Write`], or
    /// [`AdminError::Read`] for the stage of the exchange that failed.
    fn send(&self, command: &str) -> Result<Vec<u8>, AdminError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, command: &str) -> Result<Vec<u8>, AdminError> {
        (**self).send(command)
    }
}

/// Transport that opens a fresh socket connection for every command.
#[derive(Debug, Clone)]
pub struct SocketTransport {
    endpoint: SocketEndpoint,
    timeout: Option<Duration>,
}

impl SocketTransport {
    /// Creates a transport for the given endpoint.
    ///
    /// `timeout` bounds connect, read, and write individually; `None` blocks
    /// indefinitely.
    #[must_use]
    pub const fn new(endpoint: SocketEndpoint, timeout: Option<Duration>) -> Self {
        Self { endpoint, timeout }
    }

    /// Creates a transport from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.stats_socket().clone(), config.io_timeout())
    }

    /// Endpoint this transport connects to.
    #[must_use]
    pub const fn endpoint(&self) -> &SocketEndpoint {
        &self.endpoint
    }
}

impl Transport for SocketTransport {
    fn send(&self, command: &str) -> Result<Vec<u8>, AdminError> {
        debug!(target: TRANSPORT_TARGET, endpoint = %self.endpoint, "connecting to stats socket");
        let mut connection = connect(&self.endpoint, self.timeout)?;
        exchange(&mut connection, command)
    }
}

/// Writes `command` plus a newline, then reads the response to end-of-stream.
///
/// The returned bytes have leading and trailing ASCII whitespace removed.
///
/// # Errors
///
/// Returns [`AdminError::Write`] if the command cannot be written and flushed,
/// or [`AdminError::Read`] if any receive fails.
pub fn exchange<S: Read + Write>(stream: &mut S, command: &str) -> Result<Vec<u8>, AdminError> {
    write_command(stream, command).map_err(|source| AdminError::Write { source })?;
    debug!(
        target: TRANSPORT_TARGET,
        bytes = command.len() + 1,
        "command written"
    );

    let response = read_until_close(stream).map_err(|source| AdminError::Read { source })?;
    debug!(target: TRANSPORT_TARGET, bytes = response.len(), "response received");
    Ok(response.trim_ascii().to_vec())
}

fn write_command<W: Write>(writer: &mut W, command: &str) -> io::Result<()> {
    writer.write_all(command.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Reads `READ_CHUNK_SIZE` bytes at a time until a read returns zero.
///
/// Interrupted reads are retried; any other error aborts the loop.
///
/// # Errors
///
/// Returns the first non-interrupt I/O error reported by the reader.
pub fn read_until_close<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut response = Vec::new();
    let mut chunk = [0_u8; READ_CHUNK_SIZE];
    loop {
        let received = match reader.read(&mut chunk) {
            Ok(0) => return Ok(response),
            Ok(count) => count,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        };
        if let Some(bytes) = chunk.get(..received) {
            response.extend_from_slice(bytes);
        }
    }
}

enum Connection {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Connection {
    fn set_timeouts(&self, timeout: Option<Duration>) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => {
                stream.set_read_timeout(timeout)?;
                stream.set_write_timeout(timeout)
            }
            #[cfg(unix)]
            Self::Unix(stream) => {
                stream.set_read_timeout(timeout)?;
                stream.set_write_timeout(timeout)
            }
        }
    }
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            Self::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            Self::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            Self::Unix(stream) => stream.flush(),
        }
    }
}

fn connect(endpoint: &SocketEndpoint, timeout: Option<Duration>) -> Result<Connection, AdminError> {
    let connection_error = |source| AdminError::Connection {
        endpoint: endpoint.to_string(),
        source,
    };

    let connection = match endpoint {
        SocketEndpoint::Tcp { host, port } => {
            connect_tcp(host, *port, timeout).map_err(connection_error)?
        }
        SocketEndpoint::Unix { path } => {
            #[cfg(unix)]
            {
                connect_unix(path.as_str(), timeout).map_err(connection_error)?
            }

            #[cfg(not(unix))]
            {
                let _ = path;
                return Err(AdminError::UnsupportedUnixTransport {
                    endpoint: endpoint.to_string(),
                });
            }
        }
    };

    connection
        .set_timeouts(timeout)
        .map_err(connection_error)?;
    Ok(connection)
}

fn connect_tcp(host: &str, port: u16, timeout: Option<Duration>) -> io::Result<Connection> {
    let address = resolve_tcp_address(host, port)?;
    let stream = match timeout {
        Some(limit) => TcpStream::connect_timeout(&address, limit)?,
        None => TcpStream::connect(address)?,
    };
    Ok(Connection::Tcp(stream))
}

fn resolve_tcp_address(host: &str, port: u16) -> io::Result<SocketAddr> {
    let mut addrs = (host, port).to_socket_addrs()?;
    addrs
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
}

#[cfg(unix)]
fn connect_unix(path: &str, timeout: Option<Duration>) -> io::Result<Connection> {
    let socket = Socket::new(Domain::UNIX, Type::STREAM, None)?;
    let address = SockAddr::unix(path)?;
    match timeout {
        Some(limit) => socket.connect_timeout(&address, limit)?,
        None => socket.connect(&address)?,
    }
    let stream = UnixStream::from(std::os::fd::OwnedFd::from(socket));
    Ok(Connection::Unix(stream))
}
