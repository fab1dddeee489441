//! Client for the HAProxy stats socket.
//!
//! `hapctl-core` speaks the text protocol exposed on the load balancer's
//! administrative socket: it renders commands, sends each over a fresh
//! connection, parses the CSV statistics table, and classifies servers from
//! the parsed fields.
//!
//! # Architecture
//!
//! ```text
//! ActionDispatcher -> command builders -> Transport -> raw bytes
//!                                         Transport -> parse_stats -> ServerRecord
//! ```
//!
//! The [`Transport`] trait is the seam for tests: the dispatcher is generic
//! over it, and [`SocketTransport`] is the production implementation.
//!
//! # Example
//!
//! ```rust,no_run
//! use hapctl_config::Config;
//! use hapctl_core::{ActionDispatcher, ReadOnlyPolicy, SocketTransport};
//!
//! let config = Config::default();
//! let dispatcher = ActionDispatcher::new(
//!     SocketTransport::from_config(&config),
//!     ReadOnlyPolicy::new(config.read_only()),
//! );
//! for record in dispatcher.fetch_stats()? {
//!     println!("{}/{} {}", record.proxy_name(), record.service_name(), record.state());
//! }
//! # Ok::<(), hapctl_core::AdminError>(())
//! ```

pub mod command;
pub mod dispatch;
pub mod error;
pub mod record;
pub mod stats;
pub mod transport;

#[cfg(test)]
mod tests;

pub use self::command::{Action, AdminState, AgentState, HealthState, ServerTarget, Toggle};
pub use self::dispatch::{
    ActionDispatcher, DispatchOutcome, ReadOnlyPolicy, resolve_action,
};
pub use self::error::{AdminError, ProtocolError};
pub use self::record::{ProxyGroup, ServerRecord, ServerState, WeightBand, group_by_proxy};
pub use self::stats::{StatHeader, StatRow, parse_stats};
pub use self::transport::{SocketTransport, Transport};
