use crate::rules::schema::Status;
use serde::{Deserialize, Serialize};

/// Qualitative judgment for one group of related attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    /// Group id from the advisor rules (e.g., "acid_balance").
    pub group: String,
    /// Display name of the group (e.g., "Acid balance").
    pub label: String,
    pub status: Status,
    /// Human-readable explanation of what the group affects.
    pub explanation: String,
    /// Display-ready measured value(s), e.g. "12.0%".
    pub value: String,
    /// Conditions that failed, empty when the status is positive.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_conditions: Vec<String>,
}

impl Judgment {
    pub fn is_positive(&self) -> bool {
        self.status.is_positive()
    }
}

/// A group that needs attention, with the suggested action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub group: String,
    pub label: String,
    pub recommendation: String,
}

/// Everything the classifier produces for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Name and version of the advisor rules that were applied.
    pub rules_name: String,
    pub rules_version: String,
    /// One judgment per group, in rule order.
    pub judgments: Vec<Judgment>,
    /// Groups whose status is not positive, in record field order.
    pub advisories: Vec<Advisory>,
}

impl ClassificationResult {
    pub fn judgment(&self, group: &str) -> Option<&Judgment> {
        self.judgments.iter().find(|j| j.group == group)
    }

    /// True when no group needs adjustment.
    pub fn all_positive(&self) -> bool {
        self.advisories.is_empty()
    }
}
