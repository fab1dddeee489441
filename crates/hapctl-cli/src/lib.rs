//! Command-line interface runtime for `hapctl`.
//!
//! The module owns argument parsing, configuration bootstrapping, logging
//! setup, and rendering. It is exercised both from the binary entrypoint and
//! from tests, where the configuration loader and IO streams are substituted.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use hapctl_config::Config;
use hapctl_core::{ActionDispatcher, ReadOnlyPolicy, SocketTransport};

mod cli;
mod command;
mod config;
mod errors;
pub mod output;
mod telemetry;

#[cfg(all(test, unix))]
mod tests;

use cli::Cli;
use command::CommandInvocation;
use config::{ConfigArgumentSplit, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::AppError;
pub use output::{OutputFormat, ResolvedOutputFormat, format_downtime};

/// CLI flags recognised by the configuration loader, with whether each one
/// consumes a following value.
///
/// MAINTENANCE: keep in sync with the fields of `hapctl_config::Config`.
const CONFIG_CLI_FLAGS: &[(&str, bool)] = &[
    ("--config-path", true),
    ("--stats-socket", true),
    ("--read-only", false),
    ("--log-filter", true),
    ("--log-format", true),
    ("--io-timeout-ms", true),
];

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
    stdout_is_terminal: bool,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(
        stdout: &'a mut W,
        stderr: &'a mut E,
        stdout_is_terminal: bool,
    ) -> Self {
        Self {
            stdout,
            stderr,
            stdout_is_terminal,
        }
    }

    pub(crate) const fn stdout_is_terminal(&self) -> bool {
        self.stdout_is_terminal
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    const fn new(io: &'a mut IoStreams<'a, W, E>, loader: &'a L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let arguments: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&arguments);
        let cli_arguments = prepare_cli_arguments(&arguments, &split);

        let cli = match Cli::try_parse_from(cli_arguments) {
            Ok(cli) => cli,
            Err(error) => return self.report_usage(error),
        };

        match self.execute(cli, &split) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                tracing::debug!(%error, "command failed");
                if writeln!(self.io.stderr, "hapctl: {error}").is_err() {
                    return ExitCode::FAILURE;
                }
                error.exit_code()
            }
        }
    }

    fn execute(&mut self, cli: Cli, split: &ConfigArgumentSplit) -> Result<(), AppError> {
        let config = self.loader.load(&split.config_arguments)?;
        telemetry::initialise(&config)?;

        let format = cli.output.resolve(self.io.stdout_is_terminal());
        let invocation = CommandInvocation::from(cli.command);
        let dispatcher = build_dispatcher(&config);
        let outcome = invocation.dispatch(&dispatcher)?;
        output::write_outcome(&mut *self.io.stdout, outcome, format, invocation.listeners_only)
    }

    // Help and version requests are successful output on stdout.
    fn report_usage(&mut self, error: clap::Error) -> ExitCode {
        let informational = matches!(
            error.kind(),
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
        );
        let rendered = error.render().to_string();
        let written = if informational {
            write!(self.io.stdout, "{rendered}")
        } else {
            write!(self.io.stderr, "{}", AppError::CliUsage(error))
        };
        if informational && written.is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

fn build_dispatcher(config: &Config) -> ActionDispatcher<SocketTransport> {
    ActionDispatcher::new(
        SocketTransport::from_config(config),
        ReadOnlyPolicy::new(config.read_only()),
    )
}

fn prepare_cli_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    let mut cli_arguments: Vec<OsString> = Vec::new();
    if let Some(first) = args.first() {
        cli_arguments.push(first.clone());
    }
    if let Some(rest) = args.get(split.command_start..) {
        cli_arguments.extend(rest.iter().cloned());
    }
    cli_arguments
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    stdout_is_terminal: bool,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr, stdout_is_terminal);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
#[must_use]
pub(crate) fn run_with_loader<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}
