use cuvee_core::error::CuveeError;
use cuvee_core::model::Attribute;
use cuvee_core::predict::QualityBand;
use cuvee_core::rules::schema::{AdvisorRules, ReferenceTable};
use cuvee_core::rules::{self, builtin};
use std::path::Path;

pub fn show_reference() -> Result<(), CuveeError> {
    let table = builtin::reference_table()?;
    print_reference(&table);
    Ok(())
}

pub fn validate_reference(file: &Path) -> Result<(), CuveeError> {
    let table = rules::load_reference(file)?;
    println!("Reference table '{}' (v{}) is valid.", table.name, table.version);
    println!("  Significance factor: {}", table.significance_factor);

    // Warn when a form default would be rejected by this table.
    let mut warnings = Vec::new();
    for attribute in Attribute::ALL {
        if let Some(entry) = table.entry(attribute) {
            let default = attribute.default_value();
            if !entry.contains(default) {
                warnings.push(format!(
                    "default {} for '{}' lies outside [{}, {}]",
                    default, attribute, entry.min, entry.max
                ));
            }
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }
    Ok(())
}

fn print_reference(table: &ReferenceTable) {
    println!("{} (version {})\n", table.name, table.version);
    if let Some(ref desc) = table.description {
        println!("{}\n", desc);
    }
    println!(
        "A deviation from the ideal is significant when it exceeds {} of the attribute's range.\n",
        table.significance_factor
    );

    let max_name_len = table
        .entries
        .iter()
        .map(|e| e.attribute.label().len())
        .max()
        .unwrap_or(20);

    println!(
        "  {:<width$}  {:<10}  {:<10}  {:<10}  Unit",
        "Attribute",
        "Min",
        "Ideal",
        "Max",
        width = max_name_len
    );
    println!("  {}", "-".repeat(max_name_len + 2 + 3 * 12 + 6));
    for e in &table.entries {
        println!(
            "  {:<width$}  {:<10}  {:<10}  {:<10}  {}",
            e.attribute.label(),
            e.min.to_string(),
            e.ideal.to_string(),
            e.max.to_string(),
            e.unit,
            width = max_name_len
        );
    }
    println!();
}

pub fn show_rules() -> Result<(), CuveeError> {
    let advisor = builtin::advisor_rules()?;
    print_rules(&advisor);
    Ok(())
}

pub fn validate_rules(file: &Path) -> Result<(), CuveeError> {
    let advisor = rules::load_rules(file)?;
    println!("Advisor rules '{}' (v{}) are valid.", advisor.name, advisor.version);
    println!("  Groups: {}", advisor.groups.len());
    Ok(())
}

fn print_rules(advisor: &AdvisorRules) {
    println!("{} (version {})\n", advisor.name, advisor.version);
    if let Some(ref desc) = advisor.description {
        println!("{}\n", desc);
    }

    for group in &advisor.groups {
        println!(
            "  {} -- {} when all hold, otherwise {}",
            group.label, group.positive_status, group.negative_status
        );
        for cond in &group.conditions {
            println!(
                "    {} <= {} <= {}",
                cond.min,
                cond.attribute.label(),
                cond.max
            );
        }
        println!("    {}", group.explanation);
        println!();
    }
}

pub fn scale() -> Result<(), CuveeError> {
    println!("Wine quality (0-10) is assessed on the following criteria:\n");
    for band in QualityBand::ALL {
        println!("  {}: {}", band.range(), band);
        for line in band.criteria() {
            println!("    - {}", line);
        }
        println!();
    }
    println!("Scores outside 0-10 are reported as unreliable predictions.");
    Ok(())
}
