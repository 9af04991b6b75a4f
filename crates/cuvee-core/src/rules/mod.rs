pub mod builtin;
pub mod schema;

use crate::error::CuveeError;
use crate::model::Attribute;
use rust_decimal::Decimal;
use schema::{AdvisorRules, ReferenceTable};
use std::collections::HashSet;
use std::path::Path;

/// Load a reference table from a JSON file.
pub fn load_reference(path: &Path) -> Result<ReferenceTable, CuveeError> {
    let content = std::fs::read_to_string(path).map_err(|e| CuveeError::ReferenceLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let table: ReferenceTable =
        serde_json::from_str(&content).map_err(|e| CuveeError::ReferenceLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    finish_reference(table)
}

/// Parse a reference table from a JSON string (no file path context).
pub fn parse_reference_str(json: &str) -> Result<ReferenceTable, CuveeError> {
    let table: ReferenceTable = serde_json::from_str(json).map_err(CuveeError::Json)?;
    finish_reference(table)
}

fn finish_reference(mut table: ReferenceTable) -> Result<ReferenceTable, CuveeError> {
    validate_reference(&table)?;
    table.entries.sort_by_key(|e| e.attribute.index());
    Ok(table)
}

/// Validate that a reference table covers every attribute exactly once and
/// that each entry satisfies min <= ideal <= max.
pub fn validate_reference(table: &ReferenceTable) -> Result<(), CuveeError> {
    if table.significance_factor <= Decimal::ZERO {
        return Err(CuveeError::ReferenceInvalid(format!(
            "significance_factor must be positive, got {}",
            table.significance_factor
        )));
    }

    let mut seen = HashSet::new();
    for entry in &table.entries {
        if !seen.insert(entry.attribute) {
            return Err(CuveeError::ReferenceInvalid(format!(
                "attribute '{}' listed more than once",
                entry.attribute
            )));
        }
        if entry.min > entry.max {
            return Err(CuveeError::ReferenceInvalid(format!(
                "attribute '{}' has min {} above max {}",
                entry.attribute, entry.min, entry.max
            )));
        }
        if !entry.contains(entry.ideal) {
            return Err(CuveeError::ReferenceInvalid(format!(
                "attribute '{}' has ideal {} outside [{}, {}]",
                entry.attribute, entry.ideal, entry.min, entry.max
            )));
        }
        if entry
            .span()
            .and_then(|span| span.checked_mul(table.significance_factor))
            .is_none()
        {
            return Err(CuveeError::ReferenceInvalid(format!(
                "attribute '{}': significance_factor {} times range [{}, {}] overflows",
                entry.attribute, table.significance_factor, entry.min, entry.max
            )));
        }
    }

    let missing: Vec<&str> = Attribute::ALL
        .iter()
        .filter(|a| !seen.contains(*a))
        .map(|a| a.key())
        .collect();
    if !missing.is_empty() {
        return Err(CuveeError::ReferenceInvalid(format!(
            "missing attribute(s): {}",
            missing.join(", ")
        )));
    }

    Ok(())
}

/// Load advisor rules from a JSON file.
pub fn load_rules(path: &Path) -> Result<AdvisorRules, CuveeError> {
    let content = std::fs::read_to_string(path).map_err(|e| CuveeError::RulesLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let rules: AdvisorRules =
        serde_json::from_str(&content).map_err(|e| CuveeError::RulesLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_rules(&rules)?;
    Ok(rules)
}

/// Parse advisor rules from a JSON string (no file path context).
pub fn parse_rules_str(json: &str) -> Result<AdvisorRules, CuveeError> {
    let rules: AdvisorRules = serde_json::from_str(json).map_err(CuveeError::Json)?;
    validate_rules(&rules)?;
    Ok(rules)
}

/// Validate that advisor rules are well-formed.
pub fn validate_rules(rules: &AdvisorRules) -> Result<(), CuveeError> {
    if rules.groups.is_empty() {
        return Err(CuveeError::RulesInvalid("groups must not be empty".into()));
    }

    let mut ids = HashSet::new();
    for group in &rules.groups {
        if group.id.trim().is_empty() {
            return Err(CuveeError::RulesInvalid("group id must not be empty".into()));
        }
        if !ids.insert(group.id.as_str()) {
            return Err(CuveeError::RulesInvalid(format!(
                "group '{}' defined more than once",
                group.id
            )));
        }
        if group.conditions.is_empty() {
            return Err(CuveeError::RulesInvalid(format!(
                "group '{}' has no conditions",
                group.id
            )));
        }
        if group.display.is_empty() {
            return Err(CuveeError::RulesInvalid(format!(
                "group '{}' has nothing to display",
                group.id
            )));
        }
        if group.positive_status == group.negative_status {
            return Err(CuveeError::RulesInvalid(format!(
                "group '{}' uses '{}' for both outcomes",
                group.id, group.positive_status
            )));
        }
        if !group.positive_status.is_positive() {
            return Err(CuveeError::RulesInvalid(format!(
                "group '{}' has positive_status '{}', expected good, optimal or balanced",
                group.id, group.positive_status
            )));
        }
        if group.negative_status.is_positive() {
            return Err(CuveeError::RulesInvalid(format!(
                "group '{}' has negative_status '{}', expected needs adjustment, not optimal or unbalanced",
                group.id, group.negative_status
            )));
        }
        for cond in &group.conditions {
            if cond.min > cond.max {
                return Err(CuveeError::RulesInvalid(format!(
                    "group '{}' has min {} above max {} for '{}'",
                    group.id, cond.min, cond.max, cond.attribute
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_json(entries: &[&str]) -> String {
        format!(
            r#"{{ "name": "Test", "version": "1.0", "entries": [{}] }}"#,
            entries.join(",")
        )
    }

    fn full_entries() -> Vec<String> {
        Attribute::ALL
            .iter()
            .map(|a| {
                format!(
                    r#"{{ "attribute": "{}", "min": "0.5", "max": "2", "ideal": "1", "unit": "u" }}"#,
                    a.key()
                )
            })
            .collect()
    }

    #[test]
    fn test_parse_valid_reference_defaults_factor() {
        let entries = full_entries();
        let refs: Vec<&str> = entries.iter().map(|s| s.as_str()).collect();
        let table = parse_reference_str(&reference_json(&refs)).unwrap();
        assert_eq!(table.entries.len(), 11);
        assert_eq!(table.significance_factor, Decimal::new(1, 1));
    }

    #[test]
    fn test_reference_sorted_into_canonical_order() {
        let mut entries = full_entries();
        entries.reverse();
        let refs: Vec<&str> = entries.iter().map(|s| s.as_str()).collect();
        let table = parse_reference_str(&reference_json(&refs)).unwrap();
        let order: Vec<Attribute> = table.entries.iter().map(|e| e.attribute).collect();
        assert_eq!(order, Attribute::ALL.to_vec());
    }

    #[test]
    fn test_reference_missing_attribute_rejected() {
        let entries = full_entries();
        let refs: Vec<&str> = entries.iter().skip(1).map(|s| s.as_str()).collect();
        let err = parse_reference_str(&reference_json(&refs)).unwrap_err();
        assert!(err.to_string().contains("fixed_acidity"));
    }

    #[test]
    fn test_reference_duplicate_rejected() {
        let mut entries = full_entries();
        entries.push(entries[0].clone());
        let refs: Vec<&str> = entries.iter().map(|s| s.as_str()).collect();
        assert!(parse_reference_str(&reference_json(&refs)).is_err());
    }

    #[test]
    fn test_reference_ideal_outside_range_rejected() {
        let mut entries = full_entries();
        entries[10] =
            r#"{ "attribute": "alcohol", "min": "8.4", "max": "14.9", "ideal": "15", "unit": "%" }"#
                .into();
        let refs: Vec<&str> = entries.iter().map(|s| s.as_str()).collect();
        assert!(matches!(
            parse_reference_str(&reference_json(&refs)),
            Err(CuveeError::ReferenceInvalid(_))
        ));
    }

    #[test]
    fn test_reference_unknown_attribute_rejected() {
        let mut entries = full_entries();
        entries.push(
            r#"{ "attribute": "tannin", "min": "0", "max": "1", "ideal": "0.5", "unit": "g/L" }"#
                .into(),
        );
        let refs: Vec<&str> = entries.iter().map(|s| s.as_str()).collect();
        assert!(parse_reference_str(&reference_json(&refs)).is_err());
    }

    #[test]
    fn test_reference_non_positive_factor_rejected() {
        let entries = full_entries();
        let json = format!(
            r#"{{ "name": "T", "version": "1", "significance_factor": "0", "entries": [{}] }}"#,
            entries.join(",")
        );
        assert!(parse_reference_str(&json).is_err());
    }

    #[test]
    fn test_reference_overflowing_factor_rejected() {
        let entries = full_entries();
        let json = format!(
            r#"{{ "name": "T", "version": "1", "significance_factor": "79228162514264337593543950335", "entries": [{}] }}"#,
            entries.join(",")
        );
        assert!(matches!(
            parse_reference_str(&json),
            Err(CuveeError::ReferenceInvalid(_))
        ));
    }

    #[test]
    fn test_reference_overflowing_range_rejected() {
        let mut entries = full_entries();
        entries[10] = r#"{ "attribute": "alcohol", "min": "-79000000000000000000000000000", "max": "79000000000000000000000000000", "ideal": "12", "unit": "%" }"#
            .into();
        let refs: Vec<&str> = entries.iter().map(|s| s.as_str()).collect();
        let err = parse_reference_str(&reference_json(&refs)).unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    fn rules_json(groups: &str) -> String {
        format!(r#"{{ "name": "Test", "version": "1.0", "groups": [{groups}] }}"#)
    }

    const SUGAR_GROUP: &str = r#"{
        "id": "sugar", "label": "Sugar content",
        "positive_status": "balanced", "negative_status": "unbalanced",
        "explanation": "Sweetness",
        "conditions": [ { "attribute": "residual_sugar", "min": "2", "max": "15" } ],
        "display": [ { "attribute": "residual_sugar", "suffix": " g/L" } ]
    }"#;

    #[test]
    fn test_parse_valid_rules() {
        let rules = parse_rules_str(&rules_json(SUGAR_GROUP)).unwrap();
        assert_eq!(rules.groups.len(), 1);
        assert_eq!(rules.groups[0].id, "sugar");
    }

    #[test]
    fn test_empty_groups_rejected() {
        assert!(parse_rules_str(&rules_json("")).is_err());
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let json = rules_json(&format!("{SUGAR_GROUP},{SUGAR_GROUP}"));
        assert!(matches!(
            parse_rules_str(&json),
            Err(CuveeError::RulesInvalid(_))
        ));
    }

    #[test]
    fn test_inverted_condition_rejected() {
        let group = SUGAR_GROUP.replace(r#""min": "2", "max": "15""#, r#""min": "15", "max": "2""#);
        assert!(parse_rules_str(&rules_json(&group)).is_err());
    }

    #[test]
    fn test_swapped_statuses_rejected() {
        let group = SUGAR_GROUP
            .replace(r#""positive_status": "balanced""#, r#""positive_status": "unbalanced""#)
            .replace(r#""negative_status": "unbalanced""#, r#""negative_status": "balanced""#);
        assert!(parse_rules_str(&rules_json(&group)).is_err());
    }

    #[test]
    fn test_unknown_status_rejected() {
        let group = SUGAR_GROUP.replace("\"balanced\"", "\"splendid\"");
        assert!(parse_rules_str(&rules_json(&group)).is_err());
    }

    #[test]
    fn test_load_rules_missing_file() {
        let err = load_rules(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert!(matches!(err, CuveeError::RulesLoad { .. }));
    }
}
