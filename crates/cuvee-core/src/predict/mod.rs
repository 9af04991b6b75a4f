pub mod linear;
pub mod schema;

use crate::error::CuveeError;
use crate::model::MeasurementRecord;
use linear::LinearModel;
use schema::FeatureSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Lowest score the quality scale allows.
pub const SCORE_MIN: f64 = 0.0;
/// Highest score the quality scale allows.
pub const SCORE_MAX: f64 = 10.0;

/// Trait for externally trained quality models.
pub trait QualityModel: Send + Sync {
    /// Input column names, in the order `predict` expects them.
    fn feature_names(&self) -> &[String];

    /// Name of the feature schema the model was trained against, if known.
    fn schema(&self) -> Option<&str> {
        None
    }

    /// Score one ordered feature vector.
    fn predict(&self, features: &[f64]) -> Result<f64, CuveeError>;

    /// Name of this model (for diagnostics).
    fn model_name(&self) -> &str;
}

/// Quality band on the 0-10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBand {
    /// 7 to 10.
    Excellent,
    /// 5 up to 7.
    Good,
    /// Below 5.
    NeedsImprovement,
}

impl QualityBand {
    pub fn from_score(score: f64) -> QualityBand {
        if score >= 7.0 {
            QualityBand::Excellent
        } else if score >= 5.0 {
            QualityBand::Good
        } else {
            QualityBand::NeedsImprovement
        }
    }

    pub fn range(self) -> &'static str {
        match self {
            QualityBand::Excellent => "7-10",
            QualityBand::Good => "5-6",
            QualityBand::NeedsImprovement => "under 5",
        }
    }

    /// What a wine in this band typically looks like.
    pub fn criteria(self) -> &'static [&'static str] {
        match self {
            QualityBand::Excellent => &[
                "Well balanced across all components",
                "Optimal acid balance",
                "Ideal alcohol level",
                "Correct preservation level",
                "Stable pH",
            ],
            QualityBand::Good => &[
                "Good balance with room for improvement",
                "Acceptable levels of all components",
                "Safe to drink",
                "Typical of commercial wines",
            ],
            QualityBand::NeedsImprovement => &[
                "One or more components out of balance",
                "Possible problems with acidity, alcohol level or pH",
            ],
        }
    }

    pub const ALL: [QualityBand; 3] = [
        QualityBand::Excellent,
        QualityBand::Good,
        QualityBand::NeedsImprovement,
    ];
}

impl fmt::Display for QualityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityBand::Excellent => write!(f, "excellent quality"),
            QualityBand::Good => write!(f, "good quality"),
            QualityBand::NeedsImprovement => write!(f, "needs improvement"),
        }
    }
}

/// How a raw score should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    Rated(QualityBand),
    /// The score is outside 0-10; show a warning instead of a quality label.
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub score: f64,
    pub assessment: Assessment,
}

impl Prediction {
    pub fn from_score(score: f64) -> Self {
        let assessment = if (SCORE_MIN..=SCORE_MAX).contains(&score) {
            Assessment::Rated(QualityBand::from_score(score))
        } else {
            Assessment::OutOfRange
        };
        Self { score, assessment }
    }

    pub fn is_out_of_range(&self) -> bool {
        self.assessment == Assessment::OutOfRange
    }

    /// User-facing summary line.
    pub fn message(&self) -> String {
        match self.assessment {
            Assessment::Rated(band) => format!("{:.1}/10 ({band})", self.score),
            Assessment::OutOfRange => format!(
                "predicted score {:.1} is outside {SCORE_MIN}-{SCORE_MAX}; the prediction looks unreliable, check the input values",
                self.score
            ),
        }
    }
}

/// The boundary around the trained model.
///
/// Owns the model and the feature schema; holds no per-request state.
pub struct PredictionGateway {
    model: Box<dyn QualityModel>,
    schema: FeatureSchema,
}

impl fmt::Debug for PredictionGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionGateway")
            .field("model", &self.model.model_name())
            .field("schema", &self.schema.id())
            .finish()
    }
}

impl PredictionGateway {
    /// Wrap a model, checking its input columns against the schema.
    pub fn new(model: Box<dyn QualityModel>, schema: FeatureSchema) -> Result<Self, CuveeError> {
        if let Some(trained_on) = model.schema() {
            if trained_on != schema.name {
                return Err(CuveeError::SchemaMismatch {
                    schema: schema.id(),
                    reason: format!("model was trained against schema '{trained_on}'"),
                });
            }
        }
        schema.validate_names(model.feature_names())?;
        tracing::debug!(
            model = model.model_name(),
            schema = %schema.id(),
            "feature schema validated"
        );
        Ok(Self { model, schema })
    }

    /// Load a linear model artifact and wrap it with the wine quality schema.
    pub fn open(path: &Path) -> Result<Self, CuveeError> {
        let model = LinearModel::load(path)?;
        Self::new(Box::new(model), FeatureSchema::wine_quality())
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Score a record.
    ///
    /// Model failures and non-finite scores are `Prediction` errors. A finite
    /// score outside 0-10 is returned with `Assessment::OutOfRange`.
    pub fn predict(&self, record: &MeasurementRecord) -> Result<Prediction, CuveeError> {
        let features = self.schema.vectorize(record)?;
        let score = self.model.predict(&features).map_err(|e| match e {
            CuveeError::Prediction(msg) => CuveeError::Prediction(msg),
            other => CuveeError::Prediction(other.to_string()),
        })?;
        if !score.is_finite() {
            return Err(CuveeError::Prediction(format!(
                "model '{}' returned a non-finite score",
                self.model.model_name()
            )));
        }

        let prediction = Prediction::from_score(score);
        if prediction.is_out_of_range() {
            tracing::warn!(score, "prediction outside the quality scale");
        }
        Ok(prediction)
    }
}
