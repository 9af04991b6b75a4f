use crate::classify::outcome::{Advisory, ClassificationResult, Judgment};
use crate::error::CuveeError;
use crate::model::MeasurementRecord;
use crate::rules::schema::{AdvisorRules, DisplayPart, GroupRule, ReferenceTable};
use rust_decimal::{Decimal, RoundingStrategy};

/// Check that every value lies inside its reference range and that the
/// sulfur dioxide values are whole numbers.
pub fn check_record(
    record: &MeasurementRecord,
    reference: &ReferenceTable,
) -> Result<(), CuveeError> {
    for (attribute, value) in record.values() {
        let entry = reference.entry(attribute).ok_or_else(|| {
            CuveeError::ReferenceInvalid(format!("no reference entry for '{attribute}'"))
        })?;
        if !entry.contains(value) {
            return Err(CuveeError::InvalidInput(format!(
                "{} {} {} is outside the valid range [{}, {}]",
                attribute.label(),
                value,
                entry.unit,
                entry.min,
                entry.max
            )));
        }
        if attribute.is_integral() && !value.fract().is_zero() {
            return Err(CuveeError::InvalidInput(format!(
                "{} must be a whole number of {}, got {}",
                attribute.label(),
                entry.unit,
                value
            )));
        }
    }
    Ok(())
}

/// Classify a record against advisor rules.
///
/// The record is checked against the reference table first; a record outside
/// the valid ranges yields `InvalidInput` and no judgments.
pub fn classify(
    record: &MeasurementRecord,
    reference: &ReferenceTable,
    rules: &AdvisorRules,
) -> Result<ClassificationResult, CuveeError> {
    check_record(record, reference)?;

    let judgments: Vec<Judgment> = rules
        .groups
        .iter()
        .map(|group| judge_group(record, group))
        .collect();

    let mut flagged: Vec<(&GroupRule, &Judgment)> = rules
        .groups
        .iter()
        .zip(&judgments)
        .filter(|(_, j)| !j.is_positive())
        .collect();
    // Stable sort: groups sharing a first field keep rule order.
    flagged.sort_by_key(|(group, _)| first_field_index(group));

    let advisories = flagged
        .into_iter()
        .map(|(_, j)| Advisory {
            group: j.group.clone(),
            label: j.label.clone(),
            recommendation: format!("Adjust {} for better balance", j.label.to_lowercase()),
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        rules = %rules.name,
        judgments = judgments.len(),
        advisories = advisories.len(),
        "classified record"
    );

    Ok(ClassificationResult {
        rules_name: rules.name.clone(),
        rules_version: rules.version.clone(),
        judgments,
        advisories,
    })
}

fn judge_group(record: &MeasurementRecord, group: &GroupRule) -> Judgment {
    let failed_conditions: Vec<String> = group
        .conditions
        .iter()
        .filter_map(|cond| {
            let value = record.get(cond.attribute);
            if cond.holds(value) {
                None
            } else {
                Some(format!(
                    "{} {} not in [{}, {}]",
                    cond.attribute.label(),
                    value,
                    cond.min,
                    cond.max
                ))
            }
        })
        .collect();

    let status = if failed_conditions.is_empty() {
        group.positive_status
    } else {
        group.negative_status
    };

    Judgment {
        group: group.id.clone(),
        label: group.label.clone(),
        status,
        explanation: group.explanation.clone(),
        value: display_value(record, &group.display),
        failed_conditions,
    }
}

fn first_field_index(group: &GroupRule) -> usize {
    group
        .conditions
        .iter()
        .map(|c| c.attribute.index())
        .min()
        .unwrap_or(usize::MAX)
}

fn display_value(record: &MeasurementRecord, parts: &[DisplayPart]) -> String {
    parts
        .iter()
        .map(|part| {
            let precision = part.precision.unwrap_or_else(|| part.attribute.precision());
            let value = format_fixed(record.get(part.attribute), precision);
            let suffix = part.suffix.as_deref().unwrap_or("");
            match &part.label {
                Some(label) => format!("{label}: {value}{suffix}"),
                None => format!("{value}{suffix}"),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format with exactly `precision` decimals, rounding half away from zero.
pub(crate) fn format_fixed(value: Decimal, precision: u32) -> String {
    let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", precision as usize, rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Attribute;
    use crate::rules::builtin;
    use crate::rules::schema::Status;
    use rust_decimal_macros::dec;

    fn ideal_record() -> MeasurementRecord {
        MeasurementRecord {
            fixed_acidity: dec!(7.5),
            volatile_acidity: dec!(0.3),
            citric_acid: dec!(0.35),
            residual_sugar: dec!(2.5),
            chlorides: dec!(0.06),
            free_sulfur_dioxide: dec!(30),
            total_sulfur_dioxide: dec!(120),
            density: dec!(0.996),
            ph: dec!(3.4),
            sulphates: dec!(0.65),
            alcohol: dec!(12.0),
        }
    }

    fn run(record: &MeasurementRecord) -> ClassificationResult {
        let reference = builtin::reference_table().unwrap();
        let rules = builtin::advisor_rules().unwrap();
        classify(record, &reference, &rules).unwrap()
    }

    #[test]
    fn test_ideal_record_all_positive() {
        let result = run(&ideal_record());
        assert_eq!(result.judgments.len(), 5);
        assert!(result.judgments.iter().all(|j| j.is_positive()));
        assert!(result.all_positive());
        assert_eq!(result.judgment("acid_balance").unwrap().status, Status::Good);
        assert_eq!(result.judgment("sugar").unwrap().status, Status::Balanced);
        assert_eq!(result.judgment("ph").unwrap().status, Status::Optimal);
    }

    #[test]
    fn test_display_values() {
        let result = run(&ideal_record());
        assert_eq!(
            result.judgment("acid_balance").unwrap().value,
            "Fixed acidity: 7.5, Volatile acidity: 0.30"
        );
        assert_eq!(result.judgment("sugar").unwrap().value, "2.5 g/L");
        assert_eq!(result.judgment("alcohol").unwrap().value, "12.0%");
        assert_eq!(result.judgment("preservation").unwrap().value, "Free SO2: 30 mg/L");
        assert_eq!(result.judgment("ph").unwrap().value, "3.40");
    }

    #[test]
    fn test_low_alcohol_not_optimal() {
        let record = ideal_record().with(Attribute::Alcohol, dec!(8.4));
        let result = run(&record);
        let alcohol = result.judgment("alcohol").unwrap();
        assert_eq!(alcohol.status, Status::NotOptimal);
        assert_eq!(alcohol.failed_conditions.len(), 1);
        assert_eq!(result.advisories.len(), 1);
        assert_eq!(
            result.advisories[0].recommendation,
            "Adjust alcohol level for better balance"
        );
    }

    #[test]
    fn test_thresholds_inclusive() {
        let record = ideal_record()
            .with(Attribute::FixedAcidity, dec!(8.5))
            .with(Attribute::VolatileAcidity, dec!(0.2))
            .with(Attribute::ResidualSugar, dec!(15))
            .with(Attribute::Alcohol, dec!(11))
            .with(Attribute::FreeSulfurDioxide, dec!(60))
            .with(Attribute::Ph, dec!(3.0));
        assert!(run(&record).all_positive());
    }

    #[test]
    fn test_acid_balance_needs_both_conditions() {
        let record = ideal_record().with(Attribute::VolatileAcidity, dec!(0.41));
        let result = run(&record);
        let acid = result.judgment("acid_balance").unwrap();
        assert_eq!(acid.status, Status::NeedsAdjustment);
        assert!(acid.failed_conditions[0].contains("Volatile acidity"));
    }

    #[test]
    fn test_advisories_follow_record_field_order() {
        // Rule order is acid, sugar, alcohol, preservation, ph; record order
        // puts alcohol (field 11) after ph (field 9).
        let record = ideal_record()
            .with(Attribute::Alcohol, dec!(9))
            .with(Attribute::Ph, dec!(3.8))
            .with(Attribute::FreeSulfurDioxide, dec!(10))
            .with(Attribute::ResidualSugar, dec!(20))
            .with(Attribute::FixedAcidity, dec!(10));
        let result = run(&record);
        let order: Vec<&str> = result.advisories.iter().map(|a| a.group.as_str()).collect();
        assert_eq!(order, vec!["acid_balance", "sugar", "preservation", "ph", "alcohol"]);

        let judged: Vec<&str> = result.judgments.iter().map(|j| j.group.as_str()).collect();
        assert_eq!(judged, vec!["acid_balance", "sugar", "alcohol", "preservation", "ph"]);
    }

    #[test]
    fn test_out_of_range_is_invalid_input() {
        let reference = builtin::reference_table().unwrap();
        let rules = builtin::advisor_rules().unwrap();
        let record = ideal_record().with(Attribute::Alcohol, dec!(20));
        let err = classify(&record, &reference, &rules).unwrap_err();
        assert!(matches!(err, CuveeError::InvalidInput(_)));
        assert!(err.to_string().contains("Alcohol"));
    }

    #[test]
    fn test_fractional_sulfur_dioxide_rejected() {
        let reference = builtin::reference_table().unwrap();
        let record = ideal_record().with(Attribute::TotalSulfurDioxide, dec!(120.5));
        assert!(matches!(
            check_record(&record, &reference),
            Err(CuveeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_idempotent() {
        let record = ideal_record().with(Attribute::Ph, dec!(3.9));
        assert_eq!(run(&record), run(&record));
    }

    #[test]
    fn test_format_fixed_rounds_and_pads() {
        assert_eq!(format_fixed(dec!(0.3), 2), "0.30");
        assert_eq!(format_fixed(dec!(2.25), 1), "2.3");
        assert_eq!(format_fixed(dec!(30), 0), "30");
        assert_eq!(format_fixed(dec!(0.99671), 5), "0.99671");
    }
}
