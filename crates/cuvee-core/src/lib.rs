pub mod classify;
pub mod deviation;
pub mod error;
pub mod evaluate;
pub mod model;
pub mod predict;
pub mod rules;

pub use classify::classify;
pub use deviation::analyze_deviation;
pub use evaluate::{Evaluation, Evaluator, Session};

use error::CuveeError;
use model::MeasurementRecord;
use predict::{Prediction, PredictionGateway};
use std::path::Path;

/// Main API entry point: load a model artifact and evaluate one record with
/// the embedded reference table and advisor rules.
pub fn evaluate_with_model(
    model_path: &Path,
    record: &MeasurementRecord,
) -> Result<Evaluation, CuveeError> {
    let gateway = PredictionGateway::open(model_path)?;
    Evaluator::with_builtin_tables(gateway)?.evaluate(record)
}

/// Score a record through a gateway.
pub fn predict(gateway: &PredictionGateway, record: &MeasurementRecord) -> Result<Prediction, CuveeError> {
    gateway.predict(record)
}
