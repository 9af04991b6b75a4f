use crate::classify;
use crate::classify::outcome::ClassificationResult;
use crate::deviation::{self, DeviationResult};
use crate::error::CuveeError;
use crate::model::MeasurementRecord;
use crate::predict::{Prediction, PredictionGateway};
use crate::rules::builtin;
use crate::rules::schema::{AdvisorRules, ReferenceTable};
use serde::Serialize;

/// The outcome of one "Analyze" action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub record: MeasurementRecord,
    pub prediction: Prediction,
    pub classification: ClassificationResult,
    pub deviations: Vec<DeviationResult>,
}

impl Evaluation {
    pub fn significant_deviations(&self) -> Vec<&DeviationResult> {
        deviation::significant_deviations(&self.deviations)
    }
}

/// Loaded-once collaborators for evaluating records.
#[derive(Debug)]
pub struct Evaluator {
    gateway: PredictionGateway,
    reference: ReferenceTable,
    rules: AdvisorRules,
}

impl Evaluator {
    pub fn new(gateway: PredictionGateway, reference: ReferenceTable, rules: AdvisorRules) -> Self {
        Self {
            gateway,
            reference,
            rules,
        }
    }

    /// Evaluator with the embedded reference table and advisor rules.
    pub fn with_builtin_tables(gateway: PredictionGateway) -> Result<Self, CuveeError> {
        Ok(Self::new(
            gateway,
            builtin::reference_table()?,
            builtin::advisor_rules()?,
        ))
    }

    pub fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    pub fn rules(&self) -> &AdvisorRules {
        &self.rules
    }

    pub fn gateway(&self) -> &PredictionGateway {
        &self.gateway
    }

    /// Run one full evaluation: validate, predict, classify, analyze.
    ///
    /// Returns either a complete `Evaluation` or the first error.
    pub fn evaluate(&self, record: &MeasurementRecord) -> Result<Evaluation, CuveeError> {
        classify::check_record(record, &self.reference)?;
        let prediction = self.gateway.predict(record)?;
        let classification = classify::classify(record, &self.reference, &self.rules)?;
        let deviations = deviation::analyze_deviation(record, &self.reference)?;

        tracing::info!(
            score = prediction.score,
            advisories = classification.advisories.len(),
            significant = deviations.iter().filter(|d| d.significant).count(),
            "evaluation complete"
        );

        Ok(Evaluation {
            record: *record,
            prediction,
            classification,
            deviations,
        })
    }
}

/// A single user's sequence of evaluations.
///
/// Holds the last successful evaluation; a failed one leaves it untouched.
#[derive(Debug)]
pub struct Session {
    evaluator: Evaluator,
    last: Option<Evaluation>,
}

impl Session {
    pub fn new(evaluator: Evaluator) -> Self {
        Self {
            evaluator,
            last: None,
        }
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// The evaluation currently on display, if any.
    pub fn last(&self) -> Option<&Evaluation> {
        self.last.as_ref()
    }

    /// Evaluate a record and make it the displayed result.
    ///
    /// On failure the displayed result is kept and a user-facing message is
    /// returned instead.
    pub fn analyze(&mut self, record: &MeasurementRecord) -> Result<&Evaluation, String> {
        match self.evaluator.evaluate(record) {
            Ok(evaluation) => Ok(&*self.last.insert(evaluation)),
            Err(e) => {
                tracing::warn!(error = %e, "evaluation failed");
                Err(user_message(&e))
            }
        }
    }
}

/// Turn a per-request error into the inline message shown to the user.
pub fn user_message(err: &CuveeError) -> String {
    match err {
        CuveeError::InvalidInput(msg) => format!("Please check the inputs: {msg}"),
        CuveeError::Prediction(msg) => format!("An error occurred during analysis: {msg}"),
        other => format!("An error occurred during analysis: {other}"),
    }
}
