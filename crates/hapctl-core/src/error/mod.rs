//! Domain errors raised by the stats socket client.
//!
//! Every failure is terminal for the single call that produced it; nothing in
//! the core retries. Callers decide whether to re-issue a command, and must be
//! careful doing so for mutating actions.

use std::io;

use thiserror::Error;

use crate::command::Action;

/// Errors arising from dispatching commands to the load balancer.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The stats socket could not be reached.
    #[error("failed to connect to stats socket at {endpoint}: {source}")]
    Connection {
        /// Display form of the endpoint.
        endpoint: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The command line could not be written in full.
    #[error("failed to send command to stats socket: {source}")]
    Write {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A receive call failed before the peer closed the stream.
    #[error("failed to read response from stats socket: {source}")]
    Read {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The peer's output or the requested action violated the protocol.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A mutating action was requested while read-only mode is active.
    #[error("'{action}' is not permitted in read-only mode")]
    Permission {
        /// The rejected action.
        action: Action,
    },

    /// An argument supplied with the action was malformed.
    #[error("invalid argument: {message}")]
    Validation {
        /// Description of the rejected input.
        message: String,
    },

    /// Unix sockets are unavailable on this platform.
    #[cfg(not(unix))]
    #[error("platform does not support Unix sockets: {endpoint}")]
    UnsupportedUnixTransport {
        /// Display form of the endpoint.
        endpoint: String,
    },
}

/// Protocol-level failures: malformed statistics or unknown actions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A statistics row did not carry one value per header column.
    #[error("stats line {line} has {found} fields but the header has {expected}")]
    FieldCountMismatch {
        /// One-based line number within the response.
        line: u64,
        /// Number of header columns.
        expected: usize,
        /// Number of fields found on the row.
        found: usize,
    },

    /// The statistics response was not readable CSV text.
    #[error("malformed stats response: {message}")]
    MalformedStats {
        /// Parser diagnostic.
        message: String,
    },

    /// An action name did not match any supported action.
    #[error("unknown action '{name}'")]
    UnknownAction {
        /// The rejected name.
        name: String,
    },
}

impl AdminError {
    /// Returns the process exit status for this error.
    ///
    /// Caller faults (protocol, permission, validation) return 1. Transport
    /// failures return 2.
    #[must_use]
    pub const fn exit_status(&self) -> u8 {
        match self {
            Self::Protocol(_) | Self::Permission { .. } | Self::Validation { .. } => 1,
            Self::Connection { .. } | Self::Write { .. } | Self::Read { .. } => 2,
            #[cfg(not(unix))]
            Self::UnsupportedUnixTransport { .. } => 2,
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an unknown action error.
    pub fn unknown_action(name: impl Into<String>) -> Self {
        Self::Protocol(ProtocolError::UnknownAction { name: name.into() })
    }

    /// Creates a malformed statistics error.
    pub fn malformed_stats(message: impl Into<String>) -> Self {
        Self::Protocol(ProtocolError::MalformedStats {
            message: message.into(),
        })
    }
}
