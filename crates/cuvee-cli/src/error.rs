use crate::telemetry::TelemetryError;
use cuvee_core::error::CuveeError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CuveeError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    /// A single evaluation failed; carries the message shown to the user.
    #[error("{0}")]
    Analysis(String),
}
