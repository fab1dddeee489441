//! Shared configuration for the `hapctl` toolchain.
//!
//! Configuration is layered by `ortho_config`: built-in defaults, then a
//! `.hapctl.toml` file (or the file named by `--config-path` /
//! `HAPCTL_CONFIG_PATH`), then `HAPCTL_*` environment variables, then CLI
//! flags. The resulting [`Config`] is built once at startup and handed to the
//! core constructors; nothing below the CLI reads the environment.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod logging;
mod socket;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_SOCKET_PATH, default_log_filter_string, default_log_format,
    default_socket_endpoint,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use socket::{SocketEndpoint, SocketParseError};

/// Runtime configuration for the stats socket client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "HAPCTL")]
pub struct Config {
    /// Stats socket of the load balancer (path, `unix://` or `tcp://` URL).
    #[ortho_config(default = default_socket_endpoint())]
    pub stats_socket: SocketEndpoint,
    /// Rejects every command except statistics reads.
    #[ortho_config(default = false)]
    pub read_only: bool,
    /// `tracing` filter directive applied to log output.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log line format written to stderr.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Connect, read, and write timeout in milliseconds.
    pub io_timeout_ms: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stats_socket: default_socket_endpoint(),
            read_only: false,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            io_timeout_ms: None,
        }
    }
}

impl Config {
    /// Endpoint of the stats socket.
    #[must_use]
    pub const fn stats_socket(&self) -> &SocketEndpoint {
        &self.stats_socket
    }

    /// Whether mutating commands are disabled.
    #[must_use]
    pub const fn read_only(&self) -> bool {
        self.read_only
    }

    /// Log filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Socket I/O timeout; `None` blocks indefinitely.
    ///
    /// A configured value of zero is treated as "no timeout" because the
    /// standard library rejects zero-length socket timeouts.
    #[must_use]
    pub fn io_timeout(&self) -> Option<Duration> {
        self.io_timeout_ms
            .filter(|millis| *millis > 0)
            .map(Duration::from_millis)
    }
}
