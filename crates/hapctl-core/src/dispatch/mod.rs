//! Entry point that turns a requested action into a stats socket exchange.
//!
//! [`ActionDispatcher`] checks the [`ReadOnlyPolicy`], validates the target and
//! argument, renders the command through the builders in
//! [`crate::command`], and hands it to a [`Transport`]. Checks run in that
//! order so a rejected request never reaches the socket.

use tracing::{debug, info, warn};

use crate::command::{self, Action, ServerTarget};
use crate::error::AdminError;
use crate::record::ServerRecord;
use crate::stats::parse_stats;
use crate::transport::Transport;

/// Tracing target for dispatcher events.
pub const DISPATCH_TARGET: &str = "hapctl_core::dispatch";

/// Whether mutating actions are refused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOnlyPolicy {
    read_only: bool,
}

impl ReadOnlyPolicy {
    /// Policy that refuses every mutating action.
    pub const READ_ONLY: Self = Self { read_only: true };
    /// Policy that permits every action.
    pub const READ_WRITE: Self = Self { read_only: false };

    /// Builds a policy from a flag.
    #[must_use]
    pub const fn new(read_only: bool) -> Self {
        Self { read_only }
    }

    /// Whether read-only mode is active.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        self.read_only
    }

    /// Whether `action` may run under this policy.
    #[must_use]
    pub const fn permits(self, action: Action) -> bool {
        !(self.read_only && action.is_mutating())
    }
}

/// Result of a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Parsed statistics.
    Stats(Vec<ServerRecord>),
    /// Raw, trimmed response text of a mutating command.
    Response(Vec<u8>),
}

/// Validates requested actions and sends them over a transport.
#[derive(Debug)]
pub struct ActionDispatcher<T> {
    transport: T,
    policy: ReadOnlyPolicy,
}

impl<T> ActionDispatcher<T> {
    /// Creates a dispatcher.
    #[must_use]
    pub const fn new(transport: T, policy: ReadOnlyPolicy) -> Self {
        Self { transport, policy }
    }
}

impl<T: Transport> ActionDispatcher<T> {
    /// Dispatches `action` against `proxy`/`service`.
    ///
    /// `proxy` and `service` are ignored for [`Action::ShowStat`].
    /// `argument` is required for [`Action::SetWeight`] and ignored otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Permission`] when the policy refuses the action,
    /// [`AdminError::Validation`] for bad names or a non-integer weight, and
    /// any transport or parse error from the exchange itself.
    pub fn dispatch(
        &self,
        action: Action,
        proxy: &str,
        service: &str,
        argument: Option<&str>,
    ) -> Result<DispatchOutcome, AdminError> {
        if !self.policy.permits(action) {
            warn!(target: DISPATCH_TARGET, %action, "action refused in read-only mode");
            return Err(AdminError::Permission { action });
        }

        if !action.targets_server() {
            return self.fetch_stats().map(DispatchOutcome::Stats);
        }

        let target = ServerTarget::new(proxy, service)?;
        let line = build_command(action, &target, argument)?;
        info!(target: DISPATCH_TARGET, %action, server = %target, "sending command");
        self.transport.send(&line).map(DispatchOutcome::Response)
    }

    /// Resolves `name` to an [`Action`] and dispatches it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ProtocolError::UnknownAction`] for unrecognised names,
    /// otherwise the errors of [`Self::dispatch`].
    pub fn dispatch_named(
        &self,
        name: &str,
        proxy: &str,
        service: &str,
        argument: Option<&str>,
    ) -> Result<DispatchOutcome, AdminError> {
        let action = resolve_action(name)?;
        self.dispatch(action, proxy, service, argument)
    }

    /// Fetches and parses the statistics table.
    ///
    /// Permitted under every policy.
    ///
    /// # Errors
    ///
    /// Returns transport errors or a protocol error for a malformed table.
    pub fn fetch_stats(&self) -> Result<Vec<ServerRecord>, AdminError> {
        let response = self.transport.send(&command::show_stat())?;
        let records: Vec<ServerRecord> = parse_stats(&response)?
            .into_iter()
            .map(ServerRecord::new)
            .collect();
        debug!(target: DISPATCH_TARGET, records = records.len(), "statistics parsed");
        Ok(records)
    }
}

/// Parses an action name.
///
/// # Errors
///
/// Returns [`crate::ProtocolError::UnknownAction`] when the name matches no
/// action.
pub fn resolve_action(name: &str) -> Result<Action, AdminError> {
    name.parse::<Action>()
        .map_err(|_| AdminError::unknown_action(name))
}

fn build_command(
    action: Action,
    target: &ServerTarget,
    argument: Option<&str>,
) -> Result<String, AdminError> {
    if action.takes_argument() {
        let weight = parse_weight(argument)?;
        return Ok(command::set_weight(target, weight));
    }
    command::server_command(action, target)
        .ok_or_else(|| AdminError::validation(format!("'{action}' does not target a server")))
}

fn parse_weight(argument: Option<&str>) -> Result<i64, AdminError> {
    let raw = argument.ok_or_else(|| AdminError::validation("weight is required"))?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AdminError::validation(format!("weight '{raw}' is not an integer")))
}
