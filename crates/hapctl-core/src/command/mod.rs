//! Administrative actions and the command lines that carry them.
//!
//! [`Action`] is the closed set of operations the dispatcher understands.
//! Every action that targets a server renders through a [`ServerTarget`], which
//! guarantees the proxy and service names cannot break the single-line framing
//! of the stats socket protocol. The builder functions are pure: they allocate
//! the command text and nothing else.

use std::fmt;

use strum::{Display, EnumIter, EnumString};

use crate::error::AdminError;

/// Operations accepted by the stats socket client.
///
/// Names parse from the kebab-case form (`set-state-drain`) or from the
/// camelCase names used by the legacy web form (`setStateDrain`,
/// `changeWeight`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Action {
    /// Fetch the statistics table.
    #[strum(to_string = "show-stat", serialize = "showStat")]
    ShowStat,
    /// Change a server's weight.
    #[strum(to_string = "set-weight", serialize = "changeWeight")]
    SetWeight,
    /// Return a server to the ready state.
    #[strum(to_string = "set-state-ready", serialize = "setStateReady")]
    SetStateReady,
    /// Drain a server.
    #[strum(to_string = "set-state-drain", serialize = "setStateDrain")]
    SetStateDrain,
    /// Put a server into maintenance.
    #[strum(to_string = "set-state-maint", serialize = "setStateMaint")]
    SetStateMaint,
    /// Enable active health checks.
    #[strum(to_string = "enable-health-check", serialize = "enableHealthCheck")]
    EnableHealthCheck,
    /// Disable active health checks.
    #[strum(to_string = "disable-health-check", serialize = "disableHealthCheck")]
    DisableHealthCheck,
    /// Force the health state to up.
    #[strum(to_string = "set-health-up", serialize = "setHealthUp")]
    SetHealthUp,
    /// Force the health state to stopping.
    #[strum(to_string = "set-health-stopping", serialize = "setHealthStopping")]
    SetHealthStopping,
    /// Force the health state to down.
    #[strum(to_string = "set-health-down", serialize = "setHealthDown")]
    SetHealthDown,
    /// Enable agent checks.
    #[strum(to_string = "enable-agent-check", serialize = "enableAgentCheck")]
    EnableAgentCheck,
    /// Disable agent checks.
    #[strum(to_string = "disable-agent-check", serialize = "disableAgentCheck")]
    DisableAgentCheck,
    /// Force the agent state to up.
    #[strum(to_string = "set-agent-up", serialize = "setAgentUp")]
    SetAgentUp,
    /// Force the agent state to down.
    #[strum(to_string = "set-agent-down", serialize = "setAgentDown")]
    SetAgentDown,
}

impl Action {
    /// Whether the action changes load balancer state.
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        !matches!(self, Self::ShowStat)
    }

    /// Whether the action needs a proxy and service.
    #[must_use]
    pub const fn targets_server(self) -> bool {
        !matches!(self, Self::ShowStat)
    }

    /// Whether the action carries an argument.
    #[must_use]
    pub const fn takes_argument(self) -> bool {
        matches!(self, Self::SetWeight)
    }

    /// The enable or disable action for active health checks.
    #[must_use]
    pub const fn health_check_toggle(toggle: Toggle) -> Self {
        match toggle {
            Toggle::Enable => Self::EnableHealthCheck,
            Toggle::Disable => Self::DisableHealthCheck,
        }
    }

    /// The enable or disable action for agent checks.
    #[must_use]
    pub const fn agent_check_toggle(toggle: Toggle) -> Self {
        match toggle {
            Toggle::Enable => Self::EnableAgentCheck,
            Toggle::Disable => Self::DisableAgentCheck,
        }
    }
}

impl From<AdminState> for Action {
    fn from(state: AdminState) -> Self {
        match state {
            AdminState::Ready => Self::SetStateReady,
            AdminState::Drain => Self::SetStateDrain,
            AdminState::Maint => Self::SetStateMaint,
        }
    }
}

impl From<HealthState> for Action {
    fn from(state: HealthState) -> Self {
        match state {
            HealthState::Up => Self::SetHealthUp,
            HealthState::Stopping => Self::SetHealthStopping,
            HealthState::Down => Self::SetHealthDown,
        }
    }
}

impl From<AgentState> for Action {
    fn from(state: AgentState) -> Self {
        match state {
            AgentState::Up => Self::SetAgentUp,
            AgentState::Down => Self::SetAgentDown,
        }
    }
}

/// Administrative state of a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum AdminState {
    /// Accepting traffic.
    Ready,
    /// Finishing existing sessions only.
    Drain,
    /// Out of rotation.
    Maint,
}

/// Forced health check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum HealthState {
    /// Server passes checks.
    Up,
    /// Server is shutting down.
    Stopping,
    /// Server fails checks.
    Down,
}

/// Forced agent check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum AgentState {
    /// Agent reports the server up.
    Up,
    /// Agent reports the server down.
    Down,
}

/// Enables or disables a check mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Toggle {
    /// Turn the check on.
    Enable,
    /// Turn the check off.
    Disable,
}

/// A validated `proxy/service` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerTarget {
    proxy: String,
    service: String,
}

impl ServerTarget {
    /// Validates and builds a target.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Validation`] when either name is empty or
    /// contains whitespace, `/`, or a control character.
    pub fn new(
        proxy_name: impl Into<String>,
        service_name: impl Into<String>,
    ) -> Result<Self, AdminError> {
        let proxy = proxy_name.into();
        let service = service_name.into();
        validate_name("proxy", &proxy)?;
        validate_name("service", &service)?;
        Ok(Self { proxy, service })
    }

    /// Proxy name.
    #[must_use]
    pub fn proxy(&self) -> &str {
        &self.proxy
    }

    /// Service name.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl fmt::Display for ServerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.proxy, self.service)
    }
}

fn validate_name(kind: &str, value: &str) -> Result<(), AdminError> {
    if value.is_empty() {
        return Err(AdminError::validation(format!("{kind} name must not be empty")));
    }
    if let Some(bad) = value
        .chars()
        .find(|ch| ch.is_whitespace() || ch.is_control() || *ch == '/')
    {
        return Err(AdminError::validation(format!(
            "{kind} name '{}' contains forbidden character {bad:?}",
            value.escape_debug()
        )));
    }
    Ok(())
}

/// `show stat`
#[must_use]
pub fn show_stat() -> String {
    String::from("show stat")
}

/// `set server P/S weight W`
#[must_use]
pub fn set_weight(target: &ServerTarget, weight: i64) -> String {
    format!("set server {target} weight {weight}")
}

/// `set server P/S state ready|drain|maint`
#[must_use]
pub fn set_state(target: &ServerTarget, state: AdminState) -> String {
    format!("set server {target} state {state}")
}

/// `set server P/S health up|stopping|down`
#[must_use]
pub fn set_health(target: &ServerTarget, state: HealthState) -> String {
    format!("set server {target} health {state}")
}

/// `set server P/S agent up|down`
#[must_use]
pub fn set_agent(target: &ServerTarget, state: AgentState) -> String {
    format!("set server {target} agent {state}")
}

/// `enable|disable health P/S`
#[must_use]
pub fn health_check(target: &ServerTarget, toggle: Toggle) -> String {
    format!("{toggle} health {target}")
}

/// `enable|disable agent P/S`
#[must_use]
pub fn agent_check(target: &ServerTarget, toggle: Toggle) -> String {
    format!("{toggle} agent {target}")
}

/// Renders a server-targeting action other than [`Action::SetWeight`].
///
/// Returns `None` for actions that need an argument or no target.
#[must_use]
pub fn server_command(action: Action, target: &ServerTarget) -> Option<String> {
    let command = match action {
        Action::ShowStat | Action::SetWeight => return None,
        Action::SetStateReady => set_state(target, AdminState::Ready),
        Action::SetStateDrain => set_state(target, AdminState::Drain),
        Action::SetStateMaint => set_state(target, AdminState::Maint),
        Action::EnableHealthCheck => health_check(target, Toggle::Enable),
        Action::DisableHealthCheck => health_check(target, Toggle::Disable),
        Action::SetHealthUp => set_health(target, HealthState::Up),
        Action::SetHealthStopping => set_health(target, HealthState::Stopping),
        Action::SetHealthDown => set_health(target, HealthState::Down),
        Action::EnableAgentCheck => agent_check(target, Toggle::Enable),
        Action::DisableAgentCheck => agent_check(target, Toggle::Disable),
        Action::SetAgentUp => set_agent(target, AgentState::Up),
        Action::SetAgentDown => set_agent(target, AgentState::Down),
    };
    Some(command)
}
