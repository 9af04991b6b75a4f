//! Deviation of each measurement from its ideal reference value.

use crate::error::CuveeError;
use crate::model::{Attribute, MeasurementRecord};
use crate::rules::schema::ReferenceTable;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Deviation of one attribute from its ideal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviationResult {
    pub attribute: Attribute,
    pub current: Decimal,
    pub ideal: Decimal,
    pub unit: String,
    /// `(current - ideal) / ideal * 100`; `None` when the ideal is zero.
    pub percent_deviation: Option<f64>,
    /// `|current - ideal| > significance_factor * (max - min)`.
    pub significant: bool,
}

impl DeviationResult {
    /// One-line summary for the significant-deviation list.
    pub fn describe(&self) -> String {
        match self.percent_deviation {
            Some(pct) => format!(
                "{}: {:+.1}% from ideal ({} vs {} {})",
                self.attribute.label(),
                pct,
                self.current,
                self.ideal,
                self.unit
            ),
            None => format!(
                "{}: {} vs ideal {} {}",
                self.attribute.label(),
                self.current,
                self.ideal,
                self.unit
            ),
        }
    }
}

/// Compute the deviation of every attribute, in the table's canonical order.
///
/// Fails with `InvalidInput` when a value is so far from its ideal that the
/// difference does not fit in a `Decimal`, and with `ReferenceInvalid` when
/// the table's significance threshold overflows.
pub fn analyze_deviation(
    record: &MeasurementRecord,
    reference: &ReferenceTable,
) -> Result<Vec<DeviationResult>, CuveeError> {
    let threshold_factor = reference.significance_factor;

    reference
        .entries
        .iter()
        .map(|entry| {
            let current = record.get(entry.attribute);
            let diff = current.checked_sub(entry.ideal).ok_or_else(|| {
                CuveeError::InvalidInput(format!(
                    "{} value {} is too far from the ideal {}",
                    entry.attribute.label(),
                    current,
                    entry.ideal
                ))
            })?;
            let threshold = entry
                .span()
                .and_then(|span| span.checked_mul(threshold_factor))
                .ok_or_else(|| {
                    CuveeError::ReferenceInvalid(format!(
                        "significance threshold for '{}' overflows",
                        entry.attribute
                    ))
                })?;

            let percent_deviation = diff
                .checked_div(entry.ideal)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .and_then(|pct| pct.to_f64());
            if percent_deviation.is_none() {
                tracing::debug!(attribute = %entry.attribute, "percent deviation undefined");
            }

            Ok(DeviationResult {
                attribute: entry.attribute,
                current,
                ideal: entry.ideal,
                unit: entry.unit.clone(),
                percent_deviation,
                significant: diff.abs() > threshold,
            })
        })
        .collect()
}

/// The significant deviations, in canonical order.
pub fn significant_deviations(results: &[DeviationResult]) -> Vec<&DeviationResult> {
    results.iter().filter(|r| r.significant).collect()
}

/// `(label, percent)` pairs for a comparison chart. Attributes with an
/// undefined percentage are left out.
pub fn chart_points(results: &[DeviationResult]) -> Vec<(&'static str, f64)> {
    results
        .iter()
        .filter_map(|r| r.percent_deviation.map(|pct| (r.attribute.label(), pct)))
        .collect()
}
