pub mod analyze;
pub mod interactive;
pub mod tables;

use crate::{MeasurementArgs, SourceArgs};
use cuvee_core::error::CuveeError;
use cuvee_core::model::{parse_decimal, Attribute, MeasurementRecord};
use cuvee_core::predict::PredictionGateway;
use cuvee_core::rules;
use cuvee_core::Evaluator;
use std::path::Path;

/// Load the model and tables once, at startup.
pub fn load_evaluator(sources: &SourceArgs) -> Result<Evaluator, CuveeError> {
    let gateway = PredictionGateway::open(&sources.model)?;

    let reference = match &sources.reference {
        Some(path) => rules::load_reference(path)?,
        None => rules::builtin::reference_table()?,
    };
    let advisor = match &sources.rules {
        Some(path) => rules::load_rules(path)?,
        None => rules::builtin::advisor_rules()?,
    };

    tracing::info!(
        model = gateway.model_name(),
        reference = %reference.name,
        rules = %advisor.name,
        "evaluator ready"
    );
    Ok(Evaluator::new(gateway, reference, advisor))
}

/// Build a record from an optional JSON file, overridden by flags.
pub fn record_from_args(
    input: Option<&Path>,
    args: &MeasurementArgs,
) -> Result<MeasurementRecord, CuveeError> {
    let mut record = match input {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            MeasurementRecord::from_json_str(&json)?
        }
        None => MeasurementRecord::default(),
    };

    for attribute in Attribute::ALL {
        if let Some(raw) = flag_value(args, attribute) {
            record = record.with(attribute, parse_decimal(raw)?);
        }
    }
    Ok(record)
}

fn flag_value(args: &MeasurementArgs, attribute: Attribute) -> Option<&str> {
    let value = match attribute {
        Attribute::FixedAcidity => &args.fixed_acidity,
        Attribute::VolatileAcidity => &args.volatile_acidity,
        Attribute::CitricAcid => &args.citric_acid,
        Attribute::ResidualSugar => &args.residual_sugar,
        Attribute::Chlorides => &args.chlorides,
        Attribute::FreeSulfurDioxide => &args.free_sulfur_dioxide,
        Attribute::TotalSulfurDioxide => &args.total_sulfur_dioxide,
        Attribute::Density => &args.density,
        Attribute::Ph => &args.ph,
        Attribute::Sulphates => &args.sulphates,
        Attribute::Alcohol => &args.alcohol,
    };
    value.as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "fixed_acidity": 8.1, "volatile_acidity": 0.42, "citric_acid": 0.28,
        "residual_sugar": 2.1, "chlorides": 0.071, "free_sulfur_dioxide": 14,
        "total_sulfur_dioxide": 48, "density": 0.9968, "ph": 3.31,
        "sulphates": 0.62, "alcohol": 10.4
    }"#;

    fn sample_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_flags_override_input_file() {
        let file = sample_file();
        let args = MeasurementArgs {
            fixed_acidity: Some("7,5".into()),
            alcohol: Some("12.5".into()),
            ..Default::default()
        };
        let record = record_from_args(Some(file.path()), &args).unwrap();

        assert_eq!(record.fixed_acidity, dec!(7.5));
        assert_eq!(record.volatile_acidity, dec!(0.42));
        assert_eq!(record.citric_acid, dec!(0.28));
        assert_eq!(record.residual_sugar, dec!(2.1));
        assert_eq!(record.chlorides, dec!(0.071));
        assert_eq!(record.free_sulfur_dioxide, dec!(14));
        assert_eq!(record.total_sulfur_dioxide, dec!(48));
        assert_eq!(record.density, dec!(0.9968));
        assert_eq!(record.ph, dec!(3.31));
        assert_eq!(record.sulphates, dec!(0.62));
        assert_eq!(record.alcohol, dec!(12.5));
    }

    #[test]
    fn test_each_flag_sets_its_own_field() {
        let args = MeasurementArgs {
            fixed_acidity: Some("1".into()),
            volatile_acidity: Some("2".into()),
            citric_acid: Some("3".into()),
            residual_sugar: Some("4".into()),
            chlorides: Some("5".into()),
            free_sulfur_dioxide: Some("6".into()),
            total_sulfur_dioxide: Some("7".into()),
            density: Some("8".into()),
            ph: Some("9".into()),
            sulphates: Some("10".into()),
            alcohol: Some("11".into()),
        };
        let record = record_from_args(None, &args).unwrap();
        for (attribute, value) in record.values() {
            assert_eq!(value, Decimal::from(attribute.index() + 1), "{attribute}");
        }
    }

    #[test]
    fn test_no_input_uses_defaults() {
        let record = record_from_args(None, &MeasurementArgs::default()).unwrap();
        assert_eq!(record, MeasurementRecord::default());
    }

    #[test]
    fn test_bad_flag_value_is_invalid_input() {
        let args = MeasurementArgs {
            ph: Some("acidic".into()),
            ..Default::default()
        };
        let err = record_from_args(None, &args).unwrap_err();
        assert!(matches!(err, CuveeError::InvalidInput(_)));
    }
}
