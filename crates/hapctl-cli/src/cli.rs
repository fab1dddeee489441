//! CLI argument definitions for `hapctl`.

use clap::{Parser, Subcommand, ValueEnum};
use hapctl_core::{AdminState, AgentState, HealthState, Toggle};

use crate::output::OutputFormat;

/// Command-line interface for the HAProxy stats socket client.
///
/// Configuration flags (`--stats-socket`, `--read-only`, ...) are split off
/// before this parser runs and must precede everything else.
#[derive(Parser, Debug)]
#[command(name = "hapctl", disable_help_subcommand = true, version)]
pub(crate) struct Cli {
    /// Controls how statistics are rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto)]
    pub(crate) output: OutputFormat,
    /// The operation to perform.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Operations supported by `hapctl`.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Prints the statistics table grouped by proxy.
    Stats {
        /// Hides FRONTEND and BACKEND aggregate rows.
        #[arg(long)]
        listeners_only: bool,
    },
    /// Changes a server's weight.
    Weight {
        /// Proxy (backend) name.
        proxy: String,
        /// Server name.
        server: String,
        /// New weight, conventionally 0 to 100.
        #[arg(allow_hyphen_values = true)]
        weight: String,
    },
    /// Sets a server's administrative state.
    State {
        /// Proxy (backend) name.
        proxy: String,
        /// Server name.
        server: String,
        /// Target state.
        #[arg(value_enum)]
        state: StateArg,
    },
    /// Forces a server's health check result.
    Health {
        /// Proxy (backend) name.
        proxy: String,
        /// Server name.
        server: String,
        /// Forced result.
        #[arg(value_enum)]
        state: HealthArg,
    },
    /// Enables or disables active health checks.
    HealthCheck {
        /// Proxy (backend) name.
        proxy: String,
        /// Server name.
        server: String,
        /// Whether checks run.
        #[arg(value_enum)]
        toggle: ToggleArg,
    },
    /// Forces a server's agent check result.
    Agent {
        /// Proxy (backend) name.
        proxy: String,
        /// Server name.
        server: String,
        /// Forced result.
        #[arg(value_enum)]
        state: AgentArg,
    },
    /// Enables or disables agent checks.
    AgentCheck {
        /// Proxy (backend) name.
        proxy: String,
        /// Server name.
        server: String,
        /// Whether checks run.
        #[arg(value_enum)]
        toggle: ToggleArg,
    },
    /// Runs an action by name (for example `set-state-drain` or `changeWeight`).
    Action {
        /// Action name.
        name: String,
        /// Proxy (backend) name.
        proxy: Option<String>,
        /// Server name.
        server: Option<String>,
        /// Action argument, such as the weight.
        #[arg(allow_hyphen_values = true)]
        argument: Option<String>,
    },
}

/// Administrative states accepted by `state`, mirroring [`AdminState`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum StateArg {
    /// Accept traffic.
    Ready,
    /// Finish existing sessions only.
    Drain,
    /// Take out of rotation.
    Maint,
}

/// Health results accepted by `health`, mirroring [`HealthState`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum HealthArg {
    /// Passing.
    Up,
    /// Shutting down.
    Stopping,
    /// Failing.
    Down,
}

/// Agent results accepted by `agent`, mirroring [`AgentState`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum AgentArg {
    /// Passing.
    Up,
    /// Failing.
    Down,
}

/// Check toggles accepted by `health-check` and `agent-check`, mirroring
/// [`Toggle`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum ToggleArg {
    /// Turn on.
    Enable,
    /// Turn off.
    Disable,
}

impl From<StateArg> for AdminState {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Ready => Self::Ready,
            StateArg::Drain => Self::Drain,
            StateArg::Maint => Self::Maint,
        }
    }
}

impl From<HealthArg> for HealthState {
    fn from(state: HealthArg) -> Self {
        match state {
            HealthArg::Up => Self::Up,
            HealthArg::Stopping => Self::Stopping,
            HealthArg::Down => Self::Down,
        }
    }
}

impl From<AgentArg> for AgentState {
    fn from(state: AgentArg) -> Self {
        match state {
            AgentArg::Up => Self::Up,
            AgentArg::Down => Self::Down,
        }
    }
}

impl From<ToggleArg> for Toggle {
    fn from(toggle: ToggleArg) -> Self {
        match toggle {
            ToggleArg::Enable => Self::Enable,
            ToggleArg::Disable => Self::Disable,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::ValueEnum;

    use super::*;

    fn cli_name<T: ValueEnum>(value: &T) -> String {
        value
            .to_possible_value()
            .map(|possible| possible.get_name().to_owned())
            .unwrap_or_default()
    }

    #[test]
    fn cli_values_spell_like_the_wire_values() {
        for state in StateArg::value_variants() {
            assert_eq!(cli_name(state), AdminState::from(*state).to_string());
        }
        for state in HealthArg::value_variants() {
            assert_eq!(cli_name(state), HealthState::from(*state).to_string());
        }
        for state in AgentArg::value_variants() {
            assert_eq!(cli_name(state), AgentState::from(*state).to_string());
        }
        for toggle in ToggleArg::value_variants() {
            assert_eq!(cli_name(toggle), Toggle::from(*toggle).to_string());
        }
    }
}
