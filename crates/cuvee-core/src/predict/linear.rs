use crate::error::CuveeError;
use crate::predict::QualityModel;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A linear regression model stored as a JSON artifact.
///
/// ```json
/// { "name": "...", "version": "1", "schema": "wine-quality",
///   "feature_names": ["fixed acidity", ...],
///   "intercept": 21.97, "coefficients": [0.025, ...] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub name: String,
    pub version: String,
    /// Feature schema the model was trained against, if recorded.
    #[serde(default)]
    pub schema: Option<String>,
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    /// Load and check a model artifact from disk.
    pub fn load(path: &Path) -> Result<Self, CuveeError> {
        let content = std::fs::read_to_string(path).map_err(|e| CuveeError::ModelLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&content, path)
    }

    /// Parse a model artifact; `source` is only used in error messages.
    pub fn from_json_str(json: &str, source: &Path) -> Result<Self, CuveeError> {
        let load_err = |reason: String| CuveeError::ModelLoad {
            path: source.to_path_buf(),
            reason,
        };

        let model: LinearModel = serde_json::from_str(json).map_err(|e| load_err(e.to_string()))?;

        if model.coefficients.len() != model.feature_names.len() {
            return Err(load_err(format!(
                "{} coefficients for {} features",
                model.coefficients.len(),
                model.feature_names.len()
            )));
        }
        if !model.intercept.is_finite() || model.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(load_err("model parameters must be finite".into()));
        }

        tracing::info!(
            model = %model.name,
            version = %model.version,
            features = model.feature_names.len(),
            "loaded linear model from {}",
            source.display()
        );
        Ok(model)
    }
}

impl QualityModel for LinearModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    fn predict(&self, features: &[f64]) -> Result<f64, CuveeError> {
        if features.len() != self.coefficients.len() {
            return Err(CuveeError::Prediction(format!(
                "expected {} features, got {}",
                self.coefficients.len(),
                features.len()
            )));
        }
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();
        Ok(self.intercept + dot)
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}
