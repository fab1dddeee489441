//! Error types for the CLI runtime.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use hapctl_core::AdminError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Admin(#[from] AdminError),
    #[error("failed to serialise statistics: {0}")]
    SerialiseStats(serde_json::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] io::Error),
}

impl AppError {
    /// Exit status reported for this error.
    ///
    /// Core failures keep the dispatcher's classification; everything else
    /// is a usage or local fault.
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::Admin(error) => ExitCode::from(error.exit_status()),
            Self::LoadConfiguration(_)
            | Self::CliUsage(_)
            | Self::Telemetry(_)
            | Self::SerialiseStats(_)
            | Self::WriteOutput(_) => ExitCode::FAILURE,
        }
    }
}
