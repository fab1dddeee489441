//! Rendering of dispatcher outcomes.
//!
//! Statistics are grouped by proxy and rendered either as aligned tables for
//! humans or as JSON with columns in header order. Responses to mutating
//! commands are echoed verbatim.

mod render;

use std::io::Write;

use clap::ValueEnum;
use hapctl_core::{DispatchOutcome, ProxyGroup, ServerRecord, group_by_proxy};

use crate::AppError;

pub use render::format_downtime;

/// Output format selection for statistics.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Selects `human` for terminal output and `json` for redirected output.
    #[default]
    Auto,
    /// Always render tables.
    Human,
    /// Always emit JSON.
    Json,
}

/// Output format after resolving `auto` based on TTY detection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvedOutputFormat {
    /// One aligned table per proxy.
    Human,
    /// JSON array of proxy groups.
    Json,
}

impl OutputFormat {
    /// Resolves the output format based on whether stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, stdout_is_terminal: bool) -> ResolvedOutputFormat {
        match self {
            Self::Auto => {
                if stdout_is_terminal {
                    ResolvedOutputFormat::Human
                } else {
                    ResolvedOutputFormat::Json
                }
            }
            Self::Human => ResolvedOutputFormat::Human,
            Self::Json => ResolvedOutputFormat::Json,
        }
    }
}

/// Writes a dispatch outcome to `stdout`.
pub(crate) fn write_outcome<W: Write>(
    stdout: &mut W,
    outcome: DispatchOutcome,
    format: ResolvedOutputFormat,
    listeners_only: bool,
) -> Result<(), AppError> {
    match outcome {
        DispatchOutcome::Stats(records) => {
            let groups = group_records(records, listeners_only);
            match format {
                ResolvedOutputFormat::Human => {
                    render::write_tables(stdout, &groups).map_err(AppError::WriteOutput)?;
                }
                ResolvedOutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut *stdout, &groups)
                        .map_err(AppError::SerialiseStats)?;
                    stdout.write_all(b"\n").map_err(AppError::WriteOutput)?;
                }
            }
        }
        DispatchOutcome::Response(bytes) => {
            if !bytes.is_empty() {
                stdout.write_all(&bytes).map_err(AppError::WriteOutput)?;
                stdout.write_all(b"\n").map_err(AppError::WriteOutput)?;
            }
        }
    }
    stdout.flush().map_err(AppError::WriteOutput)
}

fn group_records(records: Vec<ServerRecord>, listeners_only: bool) -> Vec<ProxyGroup> {
    if listeners_only {
        group_by_proxy(records.into_iter().filter(ServerRecord::is_listener).collect())
    } else {
        group_by_proxy(records)
    }
}

#[cfg(test)]
mod tests;
