//! Translation from parsed CLI commands into dispatcher calls.

use hapctl_core::{
    Action, ActionDispatcher, AdminError, AdminState, AgentState, DispatchOutcome, HealthState,
    Transport,
};

use crate::cli::CliCommand;

/// How the requested action was named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RequestedAction {
    /// Chosen through a dedicated subcommand.
    Known(Action),
    /// Supplied as free text to `action`.
    Named(String),
}

/// A CLI command reduced to what the dispatcher needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandInvocation {
    pub(crate) action: RequestedAction,
    pub(crate) proxy: String,
    pub(crate) service: String,
    pub(crate) argument: Option<String>,
    pub(crate) listeners_only: bool,
}

impl CommandInvocation {
    fn server(action: Action, proxy: String, service: String) -> Self {
        Self {
            action: RequestedAction::Known(action),
            proxy,
            service,
            argument: None,
            listeners_only: false,
        }
    }

    /// Runs the invocation through `dispatcher`.
    pub(crate) fn dispatch<T: Transport>(
        &self,
        dispatcher: &ActionDispatcher<T>,
    ) -> Result<DispatchOutcome, AdminError> {
        let argument = self.argument.as_deref();
        match &self.action {
            RequestedAction::Known(action) => {
                dispatcher.dispatch(*action, &self.proxy, &self.service, argument)
            }
            RequestedAction::Named(name) => {
                dispatcher.dispatch_named(name, &self.proxy, &self.service, argument)
            }
        }
    }
}

impl From<CliCommand> for CommandInvocation {
    fn from(command: CliCommand) -> Self {
        match command {
            CliCommand::Stats { listeners_only } => Self {
                action: RequestedAction::Known(Action::ShowStat),
                proxy: String::new(),
                service: String::new(),
                argument: None,
                listeners_only,
            },
            CliCommand::Weight {
                proxy,
                server,
                weight,
            } => Self {
                argument: Some(weight),
                ..Self::server(Action::SetWeight, proxy, server)
            },
            CliCommand::State {
                proxy,
                server,
                state,
            } => Self::server(Action::from(AdminState::from(state)), proxy, server),
            CliCommand::Health {
                proxy,
                server,
                state,
            } => Self::server(Action::from(HealthState::from(state)), proxy, server),
            CliCommand::HealthCheck {
                proxy,
                server,
                toggle,
            } => Self::server(Action::health_check_toggle(toggle.into()), proxy, server),
            CliCommand::Agent {
                proxy,
                server,
                state,
            } => Self::server(Action::from(AgentState::from(state)), proxy, server),
            CliCommand::AgentCheck {
                proxy,
                server,
                toggle,
            } => Self::server(Action::agent_check_toggle(toggle.into()), proxy, server),
            CliCommand::Action {
                name,
                proxy,
                server,
                argument,
            } => Self {
                action: RequestedAction::Named(name),
                proxy: proxy.unwrap_or_default(),
                service: server.unwrap_or_default(),
                argument,
                listeners_only: false,
            },
        }
    }
}
