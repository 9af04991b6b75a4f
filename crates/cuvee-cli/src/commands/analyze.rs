use crate::error::CliError;
use crate::output;
use crate::{MeasurementArgs, SourceArgs};
use cuvee_core::evaluate::user_message;
use cuvee_core::{Evaluation, Evaluator};
use std::path::{Path, PathBuf};

pub fn run(
    input: Option<PathBuf>,
    measurements: &MeasurementArgs,
    sources: &SourceArgs,
    output_format: &str,
    verbose: bool,
) -> Result<(), CliError> {
    // Model and tables first: a missing model is fatal before any input work.
    let evaluator = super::load_evaluator(sources)?;
    let evaluation = evaluate(&evaluator, input.as_deref(), measurements)?;

    match output_format {
        "json" => output::json::print(&evaluation)?,
        _ => output::table::print(&evaluation, verbose),
    }

    Ok(())
}

/// Read the record and evaluate it. Failures are per-request and carry the
/// same message the interactive prompt shows.
fn evaluate(
    evaluator: &Evaluator,
    input: Option<&Path>,
    measurements: &MeasurementArgs,
) -> Result<Evaluation, CliError> {
    super::record_from_args(input, measurements)
        .and_then(|record| evaluator.evaluate(&record))
        .map_err(|e| {
            tracing::warn!(error = %e, "evaluation failed");
            CliError::Analysis(user_message(&e))
        })
}
