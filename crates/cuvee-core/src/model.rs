use crate::error::CuveeError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One of the eleven physicochemical measurements of a wine sample.
///
/// Variants are declared in canonical record order; `Attribute::ALL` and
/// `index()` follow the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    FixedAcidity,
    VolatileAcidity,
    CitricAcid,
    ResidualSugar,
    Chlorides,
    FreeSulfurDioxide,
    TotalSulfurDioxide,
    Density,
    Ph,
    Sulphates,
    Alcohol,
}

impl Attribute {
    pub const ALL: [Attribute; 11] = [
        Attribute::FixedAcidity,
        Attribute::VolatileAcidity,
        Attribute::CitricAcid,
        Attribute::ResidualSugar,
        Attribute::Chlorides,
        Attribute::FreeSulfurDioxide,
        Attribute::TotalSulfurDioxide,
        Attribute::Density,
        Attribute::Ph,
        Attribute::Sulphates,
        Attribute::Alcohol,
    ];

    /// Position in canonical record order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Machine key, as used in JSON records and rule files.
    pub fn key(self) -> &'static str {
        match self {
            Attribute::FixedAcidity => "fixed_acidity",
            Attribute::VolatileAcidity => "volatile_acidity",
            Attribute::CitricAcid => "citric_acid",
            Attribute::ResidualSugar => "residual_sugar",
            Attribute::Chlorides => "chlorides",
            Attribute::FreeSulfurDioxide => "free_sulfur_dioxide",
            Attribute::TotalSulfurDioxide => "total_sulfur_dioxide",
            Attribute::Density => "density",
            Attribute::Ph => "ph",
            Attribute::Sulphates => "sulphates",
            Attribute::Alcohol => "alcohol",
        }
    }

    /// Human-readable label for tables and prompts.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::FixedAcidity => "Fixed acidity",
            Attribute::VolatileAcidity => "Volatile acidity",
            Attribute::CitricAcid => "Citric acid",
            Attribute::ResidualSugar => "Residual sugar",
            Attribute::Chlorides => "Chlorides",
            Attribute::FreeSulfurDioxide => "Free sulfur dioxide",
            Attribute::TotalSulfurDioxide => "Total sulfur dioxide",
            Attribute::Density => "Density",
            Attribute::Ph => "pH",
            Attribute::Sulphates => "Sulphates",
            Attribute::Alcohol => "Alcohol",
        }
    }

    /// Form default for a fresh sample.
    pub fn default_value(self) -> Decimal {
        match self {
            Attribute::FixedAcidity => Decimal::new(70, 1),
            Attribute::VolatileAcidity => Decimal::new(27, 2),
            Attribute::CitricAcid => Decimal::new(36, 2),
            Attribute::ResidualSugar => Decimal::new(20, 1),
            Attribute::Chlorides => Decimal::new(45, 3),
            Attribute::FreeSulfurDioxide => Decimal::new(30, 0),
            Attribute::TotalSulfurDioxide => Decimal::new(100, 0),
            Attribute::Density => Decimal::new(9967, 4),
            Attribute::Ph => Decimal::new(32, 1),
            Attribute::Sulphates => Decimal::new(45, 2),
            Attribute::Alcohol => Decimal::new(110, 1),
        }
    }

    /// Input step size; also fixes the number of decimals shown.
    pub fn step(self) -> Decimal {
        Decimal::new(1, self.precision())
    }

    /// Decimals used when displaying a value of this attribute.
    pub fn precision(self) -> u32 {
        match self {
            Attribute::FixedAcidity | Attribute::ResidualSugar | Attribute::Alcohol => 1,
            Attribute::VolatileAcidity
            | Attribute::CitricAcid
            | Attribute::Ph
            | Attribute::Sulphates => 2,
            Attribute::Chlorides => 3,
            Attribute::FreeSulfurDioxide | Attribute::TotalSulfurDioxide => 0,
            Attribute::Density => 5,
        }
    }

    /// Sulfur dioxide is measured in whole mg/L.
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Attribute::FreeSulfurDioxide | Attribute::TotalSulfurDioxide
        )
    }

    /// Parse a key loosely: case, spaces, dashes and underscores are ignored,
    /// so "Fixed Acidity", "fixed-acidity" and "fixed_acidity" all match.
    pub fn from_str_loose(s: &str) -> Option<Attribute> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Attribute::ALL.into_iter().find(|a| {
            let key: String = a.key().chars().filter(|c| *c != '_').collect();
            key == wanted
        })
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Attribute {
    type Err = CuveeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::from_str_loose(s)
            .ok_or_else(|| CuveeError::InvalidInput(format!("unknown attribute '{}'", s.trim())))
    }
}

/// The eleven measurements describing one wine sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub fixed_acidity: Decimal,
    pub volatile_acidity: Decimal,
    pub citric_acid: Decimal,
    pub residual_sugar: Decimal,
    pub chlorides: Decimal,
    pub free_sulfur_dioxide: Decimal,
    pub total_sulfur_dioxide: Decimal,
    pub density: Decimal,
    pub ph: Decimal,
    pub sulphates: Decimal,
    pub alcohol: Decimal,
}

impl Default for MeasurementRecord {
    fn default() -> Self {
        Self::from_fn(Attribute::default_value)
    }
}

impl MeasurementRecord {
    /// Build a record by asking `f` for every attribute in canonical order.
    pub fn from_fn(mut f: impl FnMut(Attribute) -> Decimal) -> Self {
        Self {
            fixed_acidity: f(Attribute::FixedAcidity),
            volatile_acidity: f(Attribute::VolatileAcidity),
            citric_acid: f(Attribute::CitricAcid),
            residual_sugar: f(Attribute::ResidualSugar),
            chlorides: f(Attribute::Chlorides),
            free_sulfur_dioxide: f(Attribute::FreeSulfurDioxide),
            total_sulfur_dioxide: f(Attribute::TotalSulfurDioxide),
            density: f(Attribute::Density),
            ph: f(Attribute::Ph),
            sulphates: f(Attribute::Sulphates),
            alcohol: f(Attribute::Alcohol),
        }
    }

    pub fn get(&self, attribute: Attribute) -> Decimal {
        match attribute {
            Attribute::FixedAcidity => self.fixed_acidity,
            Attribute::VolatileAcidity => self.volatile_acidity,
            Attribute::CitricAcid => self.citric_acid,
            Attribute::ResidualSugar => self.residual_sugar,
            Attribute::Chlorides => self.chlorides,
            Attribute::FreeSulfurDioxide => self.free_sulfur_dioxide,
            Attribute::TotalSulfurDioxide => self.total_sulfur_dioxide,
            Attribute::Density => self.density,
            Attribute::Ph => self.ph,
            Attribute::Sulphates => self.sulphates,
            Attribute::Alcohol => self.alcohol,
        }
    }

    /// Return a copy with one attribute replaced.
    pub fn with(mut self, attribute: Attribute, value: Decimal) -> Self {
        let slot = match attribute {
            Attribute::FixedAcidity => &mut self.fixed_acidity,
            Attribute::VolatileAcidity => &mut self.volatile_acidity,
            Attribute::CitricAcid => &mut self.citric_acid,
            Attribute::ResidualSugar => &mut self.residual_sugar,
            Attribute::Chlorides => &mut self.chlorides,
            Attribute::FreeSulfurDioxide => &mut self.free_sulfur_dioxide,
            Attribute::TotalSulfurDioxide => &mut self.total_sulfur_dioxide,
            Attribute::Density => &mut self.density,
            Attribute::Ph => &mut self.ph,
            Attribute::Sulphates => &mut self.sulphates,
            Attribute::Alcohol => &mut self.alcohol,
        };
        *slot = value;
        self
    }

    /// Iterate `(attribute, value)` pairs in canonical order.
    pub fn values(&self) -> impl Iterator<Item = (Attribute, Decimal)> + '_ {
        Attribute::ALL.into_iter().map(move |a| (a, self.get(a)))
    }

    /// Parse a JSON object into a record.
    ///
    /// Every attribute must be present. Values may be JSON numbers or numeric
    /// strings (a decimal comma is accepted). Unknown keys are rejected.
    pub fn from_json_str(json: &str) -> Result<Self, CuveeError> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)
            .map_err(|e| CuveeError::InvalidInput(format!("record is not a JSON object: {e}")))?;

        let mut values: BTreeMap<Attribute, Decimal> = BTreeMap::new();
        for (key, value) in &raw {
            let attribute = Attribute::from_str_loose(key)
                .ok_or_else(|| CuveeError::InvalidInput(format!("unknown attribute '{key}'")))?;
            let decimal = match value {
                serde_json::Value::Number(n) => parse_decimal(&n.to_string()),
                serde_json::Value::String(s) => parse_decimal(s),
                other => Err(CuveeError::InvalidInput(format!(
                    "'{key}' must be numeric, got {other}"
                ))),
            }?;
            if values.insert(attribute, decimal).is_some() {
                return Err(CuveeError::InvalidInput(format!(
                    "attribute '{}' given more than once",
                    attribute.key()
                )));
            }
        }

        let missing: Vec<&str> = Attribute::ALL
            .iter()
            .filter(|a| !values.contains_key(a))
            .map(|a| a.key())
            .collect();
        if !missing.is_empty() {
            return Err(CuveeError::InvalidInput(format!(
                "missing attribute(s): {}",
                missing.join(", ")
            )));
        }

        Ok(Self::from_fn(|a| values[&a]))
    }
}

/// Parse a decimal value typed by a user, accepting a decimal comma.
pub fn parse_decimal(s: &str) -> Result<Decimal, CuveeError> {
    let s = s.trim();
    let normalized = s.replace(',', ".");
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|e| CuveeError::InvalidInput(format!("invalid number '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_canonical_order() {
        for (i, a) in Attribute::ALL.iter().enumerate() {
            assert_eq!(a.index(), i);
        }
        assert_eq!(Attribute::ALL[0], Attribute::FixedAcidity);
        assert_eq!(Attribute::ALL[10], Attribute::Alcohol);
    }

    #[test]
    fn test_defaults() {
        let r = MeasurementRecord::default();
        assert_eq!(r.fixed_acidity, dec!(7.0));
        assert_eq!(r.chlorides, dec!(0.045));
        assert_eq!(r.free_sulfur_dioxide, dec!(30));
        assert_eq!(r.density, dec!(0.9967));
        assert_eq!(r.alcohol, dec!(11.0));
    }

    #[test]
    fn test_loose_attribute_names() {
        assert_eq!(
            Attribute::from_str_loose("Fixed Acidity"),
            Some(Attribute::FixedAcidity)
        );
        assert_eq!(
            Attribute::from_str_loose("free-sulfur-dioxide"),
            Some(Attribute::FreeSulfurDioxide)
        );
        assert_eq!(Attribute::from_str_loose("pH"), Some(Attribute::Ph));
        assert_eq!(Attribute::from_str_loose("tannin"), None);
    }

    #[test]
    fn test_with_replaces_single_field() {
        let r = MeasurementRecord::default().with(Attribute::Alcohol, dec!(13.5));
        assert_eq!(r.alcohol, dec!(13.5));
        assert_eq!(r.ph, dec!(3.2));
    }

    #[test]
    fn test_step_matches_precision() {
        assert_eq!(Attribute::Density.step(), dec!(0.00001));
        assert_eq!(Attribute::TotalSulfurDioxide.step(), dec!(1));
        assert_eq!(Attribute::Chlorides.step(), dec!(0.001));
    }

    #[test]
    fn test_from_json_accepts_numbers_and_strings() {
        let json = r#"{
            "fixed_acidity": 7.5, "volatile_acidity": "0.3", "citric_acid": "0,35",
            "residual_sugar": 2.5, "chlorides": 0.06, "free_sulfur_dioxide": 30,
            "total_sulfur_dioxide": 120, "density": 0.996, "ph": 3.4,
            "sulphates": 0.65, "alcohol": 12
        }"#;
        let r = MeasurementRecord::from_json_str(json).unwrap();
        assert_eq!(r.fixed_acidity, dec!(7.5));
        assert_eq!(r.citric_acid, dec!(0.35));
        assert_eq!(r.alcohol, dec!(12));
    }

    #[test]
    fn test_from_json_missing_field() {
        let json = r#"{ "fixed_acidity": 7.5 }"#;
        let err = MeasurementRecord::from_json_str(json).unwrap_err();
        assert!(matches!(err, CuveeError::InvalidInput(_)));
        assert!(err.to_string().contains("alcohol"));
    }

    #[test]
    fn test_from_json_non_numeric() {
        let mut fields: Vec<String> = Attribute::ALL
            .iter()
            .map(|a| format!("\"{}\": 1", a.key()))
            .collect();
        fields[0] = "\"fixed_acidity\": \"sour\"".into();
        let json = format!("{{{}}}", fields.join(","));
        assert!(matches!(
            MeasurementRecord::from_json_str(&json),
            Err(CuveeError::InvalidInput(_))
        ));

        fields[0] = "\"fixed_acidity\": null".into();
        let json = format!("{{{}}}", fields.join(","));
        assert!(matches!(
            MeasurementRecord::from_json_str(&json),
            Err(CuveeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_json_same_attribute_twice() {
        let mut fields: Vec<String> = Attribute::ALL
            .iter()
            .map(|a| format!("\"{}\": 11", a.key()))
            .collect();
        fields.push("\"Alcohol\": 13".into());
        let json = format!("{{{}}}", fields.join(","));
        let err = MeasurementRecord::from_json_str(&json).unwrap_err();
        assert!(matches!(err, CuveeError::InvalidInput(_)));
        assert!(err.to_string().contains("'alcohol' given more than once"));
    }

    #[test]
    fn test_parse_decimal_comma() {
        assert_eq!(parse_decimal("7,5").unwrap(), dec!(7.5));
        assert_eq!(parse_decimal(" 0.045 ").unwrap(), dec!(0.045));
        assert!(parse_decimal("abc").is_err());
    }
}
