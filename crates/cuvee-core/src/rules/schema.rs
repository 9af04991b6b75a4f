use crate::model::Attribute;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_significance_factor() -> Decimal {
    Decimal::new(1, 1)
}

/// Reference values per attribute: valid range and ideal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceTable {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Fraction of an attribute's range beyond which a deviation from the
    /// ideal counts as significant.
    #[serde(default = "default_significance_factor")]
    pub significance_factor: Decimal,
    /// One entry per attribute, in canonical order once validated.
    pub entries: Vec<ReferenceEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub attribute: Attribute,
    pub min: Decimal,
    pub max: Decimal,
    pub ideal: Decimal,
    pub unit: String,
}

impl ReferenceTable {
    /// Look up the entry for an attribute.
    pub fn entry(&self, attribute: Attribute) -> Option<&ReferenceEntry> {
        self.entries.iter().find(|e| e.attribute == attribute)
    }
}

impl ReferenceEntry {
    pub fn contains(&self, value: Decimal) -> bool {
        self.min <= value && value <= self.max
    }

    /// `max - min`, or `None` if it does not fit in a `Decimal`.
    pub fn span(&self) -> Option<Decimal> {
        self.max.checked_sub(self.min)
    }
}

/// Named, versioned threshold table for the qualitative judgments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorRules {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Evaluated and reported in this order.
    pub groups: Vec<GroupRule>,
}

/// One judgment group, e.g. acid balance over fixed and volatile acidity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRule {
    pub id: String,
    pub label: String,
    /// Status reported when every condition holds.
    pub positive_status: Status,
    /// Status reported otherwise.
    pub negative_status: Status,
    pub explanation: String,
    pub conditions: Vec<RangeCondition>,
    /// Parts joined with ", " to form the displayed value.
    pub display: Vec<DisplayPart>,
}

/// Inclusive range over a single attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeCondition {
    pub attribute: Attribute,
    pub min: Decimal,
    pub max: Decimal,
}

impl RangeCondition {
    pub fn holds(&self, value: Decimal) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayPart {
    pub attribute: Attribute,
    /// Rendered as "<label>: <value>" when present.
    #[serde(default)]
    pub label: Option<String>,
    /// Decimals shown; defaults to the attribute's own precision.
    #[serde(default)]
    pub precision: Option<u32>,
    /// Appended right after the value, e.g. " g/L" or "%".
    #[serde(default)]
    pub suffix: Option<String>,
}

/// Qualitative status of a judgment group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Good,
    NeedsAdjustment,
    Optimal,
    NotOptimal,
    Balanced,
    Unbalanced,
}

impl Status {
    /// Good, optimal and balanced need no follow-up.
    pub fn is_positive(self) -> bool {
        matches!(self, Status::Good | Status::Optimal | Status::Balanced)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Status::Good => "good",
            Status::NeedsAdjustment => "needs adjustment",
            Status::Optimal => "optimal",
            Status::NotOptimal => "not optimal",
            Status::Balanced => "balanced",
            Status::Unbalanced => "unbalanced",
        };
        write!(f, "{text}")
    }
}
