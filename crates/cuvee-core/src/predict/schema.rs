use crate::error::CuveeError;
use crate::model::{Attribute, MeasurementRecord};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

pub const WINE_QUALITY_SCHEMA: &str = "wine-quality";
pub const WINE_QUALITY_SCHEMA_VERSION: &str = "1";

/// Named, versioned mapping from model input columns to record attributes.
///
/// Column `i` of the feature vector carries `columns[i].attribute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub name: String,
    pub version: String,
    pub columns: Vec<FeatureColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureColumn {
    /// Column name as seen by the model at training time.
    pub name: String,
    pub attribute: Attribute,
}

impl FeatureSchema {
    /// The column layout of the wine quality training set.
    pub fn wine_quality() -> Self {
        let columns = Attribute::ALL
            .into_iter()
            .map(|attribute| FeatureColumn {
                name: training_column(attribute).to_string(),
                attribute,
            })
            .collect();
        Self {
            name: WINE_QUALITY_SCHEMA.to_string(),
            version: WINE_QUALITY_SCHEMA_VERSION.to_string(),
            columns,
        }
    }

    pub fn id(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Check a model's declared input columns against this schema.
    pub fn validate_names(&self, model_features: &[String]) -> Result<(), CuveeError> {
        if model_features.len() != self.width() {
            return Err(CuveeError::SchemaMismatch {
                schema: self.id(),
                reason: format!(
                    "model expects {} features, schema has {}",
                    model_features.len(),
                    self.width()
                ),
            });
        }
        for (i, (column, got)) in self.columns.iter().zip(model_features).enumerate() {
            if column.name != *got {
                return Err(CuveeError::SchemaMismatch {
                    schema: self.id(),
                    reason: format!(
                        "feature {} is '{}' in the model but '{}' in the schema",
                        i, got, column.name
                    ),
                });
            }
        }
        Ok(())
    }

    /// Build the ordered feature vector for a record.
    pub fn vectorize(&self, record: &MeasurementRecord) -> Result<Vec<f64>, CuveeError> {
        self.columns
            .iter()
            .map(|column| {
                let value = record.get(column.attribute);
                value.to_f64().ok_or_else(|| {
                    CuveeError::InvalidInput(format!(
                        "{} value {} cannot be represented as a model input",
                        column.attribute.label(),
                        value
                    ))
                })
            })
            .collect()
    }
}

fn training_column(attribute: Attribute) -> &'static str {
    match attribute {
        Attribute::FixedAcidity => "fixed acidity",
        Attribute::VolatileAcidity => "volatile acidity",
        Attribute::CitricAcid => "citric acid",
        Attribute::ResidualSugar => "residual sugar",
        Attribute::Chlorides => "chlorides",
        Attribute::FreeSulfurDioxide => "free sulfur dioxide",
        Attribute::TotalSulfurDioxide => "total sulfur dioxide",
        Attribute::Density => "density",
        Attribute::Ph => "pH",
        Attribute::Sulphates => "sulphates",
        Attribute::Alcohol => "alcohol",
    }
}
