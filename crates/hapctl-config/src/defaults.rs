use crate::logging::LogFormat;
use crate::socket::SocketEndpoint;

/// Path of the admin socket shipped by the common HAProxy packages.
pub const DEFAULT_SOCKET_PATH: &str = "/run/haproxy/admin.sock";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Computes the default stats socket endpoint.
pub fn default_socket_endpoint() -> SocketEndpoint {
    SocketEndpoint::unix(DEFAULT_SOCKET_PATH)
}
