use crate::error::CuveeError;
use crate::rules::schema::{AdvisorRules, ReferenceTable};

const REFERENCE_TABLE_JSON: &str = include_str!("../../../../rules/reference-table.json");
const ADVISOR_RULES_JSON: &str = include_str!("../../../../rules/advisor-rules.json");

/// The canonical reference table shipped with the crate.
pub fn reference_table() -> Result<ReferenceTable, CuveeError> {
    super::parse_reference_str(REFERENCE_TABLE_JSON)
}

/// The canonical advisor rules shipped with the crate.
pub fn advisor_rules() -> Result<AdvisorRules, CuveeError> {
    super::parse_rules_str(ADVISOR_RULES_JSON)
}
