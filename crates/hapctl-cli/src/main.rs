//! CLI entrypoint for the HAProxy stats socket client.
//!
//! The binary delegates to [`hapctl_cli::run`], which loads configuration,
//! parses the command, dispatches it over the stats socket, and renders the
//! result.

use std::io::{self, IsTerminal, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let stdout_is_terminal = io::stdout().is_terminal();
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    hapctl_cli::run(
        std::env::args_os(),
        &mut stdout,
        &mut stderr,
        stdout_is_terminal,
    )
}
