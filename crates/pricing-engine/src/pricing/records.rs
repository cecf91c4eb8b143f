use serde::{Deserialize, Serialize};

/// Base premium for a duration tier, bounded above by `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRateRecord {
    #[serde(default)]
    pub label: String,
    pub time: i64,
    pub rate: f64,
}

/// Driver age factor applying up to and including `age`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverAgeFactorRecord {
    #[serde(default)]
    pub label: String,
    pub age: i64,
    #[serde(rename = "is-eligible", default)]
    pub is_eligible: bool,
    pub factor: f64,
}

/// Insurance group factor; `group` is a `"A-B"` or `"A"` range token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceGroupFactorRecord {
    #[serde(default)]
    pub label: String,
    pub group: String,
    #[serde(rename = "is-eligible", default)]
    pub is_eligible: bool,
    pub factor: f64,
}

/// Licence tenure factor; `length` is a `"A-B"` or `"A"` range token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenceValidityFactorRecord {
    pub length: String,
    pub factor: f64,
}
