use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CuveeError {
    #[error("could not load model from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    #[error("model does not match feature schema '{schema}': {reason}")]
    SchemaMismatch { schema: String, reason: String },

    #[error("prediction failed: {0}")]
    Prediction(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to load reference table from {path}: {reason}")]
    ReferenceLoad { path: PathBuf, reason: String },

    #[error("invalid reference table: {0}")]
    ReferenceInvalid(String),

    #[error("failed to load advisor rules from {path}: {reason}")]
    RulesLoad { path: PathBuf, reason: String },

    #[error("invalid advisor rules: {0}")]
    RulesInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CuveeError {
    /// Startup failures: the model or the tables could not be brought up.
    /// Everything else is scoped to a single evaluation.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CuveeError::ModelLoad { .. }
                | CuveeError::SchemaMismatch { .. }
                | CuveeError::ReferenceLoad { .. }
                | CuveeError::ReferenceInvalid(_)
                | CuveeError::RulesLoad { .. }
                | CuveeError::RulesInvalid(_)
        )
    }
}
