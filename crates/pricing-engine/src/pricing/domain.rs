use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency symbol attached to every quote.
pub const QUOTE_CURRENCY: &str = "£";

/// Message returned alongside a fully priced request.
pub const SUCCESS_MESSAGE: &str = "Success";

/// The four rate tables the engine prices against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateCategory {
    BaseRate,
    DriverAge,
    InsuranceGroup,
    LicenceValidity,
}

impl RateCategory {
    /// Load order used by the rate cache.
    pub const ALL: [RateCategory; 4] = [
        RateCategory::BaseRate,
        RateCategory::DriverAge,
        RateCategory::InsuranceGroup,
        RateCategory::LicenceValidity,
    ];

    /// File backing the category inside the rate table directory.
    pub fn file_name(self) -> &'static str {
        match self {
            RateCategory::BaseRate => "base-rate.json",
            RateCategory::DriverAge => "driver-age-factor.json",
            RateCategory::InsuranceGroup => "insurance-group-factor.json",
            RateCategory::LicenceValidity => "licence-validity-factor.json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RateCategory::BaseRate => "base rate",
            RateCategory::DriverAge => "driver age factor",
            RateCategory::InsuranceGroup => "insurance group factor",
            RateCategory::LicenceValidity => "licence validity factor",
        }
    }
}

impl fmt::Display for RateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Canonical rate table entry covering the interval `(start, end]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub start: i64,
    pub end: i64,
    pub value: f64,
    pub label: String,
    pub is_eligible: bool,
}

impl Range {
    /// Upper bound used for open-ended tiers.
    pub const UNBOUNDED: i64 = i64::MAX;

    /// Half-open on the low side, inclusive on the high side.
    pub fn contains(&self, value: i64) -> bool {
        self.start < value && value <= self.end
    }
}

/// Read-only view of every normalized table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRanges {
    pub base_rate: Vec<Range>,
    pub driver_age: Vec<Range>,
    pub insurance_group: Vec<Range>,
    pub licence_validity: Vec<Range>,
}

impl NormalizedRanges {
    pub fn category(&self, category: RateCategory) -> &[Range] {
        match category {
            RateCategory::BaseRate => &self.base_rate,
            RateCategory::DriverAge => &self.driver_age,
            RateCategory::InsuranceGroup => &self.insurance_group,
            RateCategory::LicenceValidity => &self.licence_validity,
        }
    }
}

/// Applicant attributes submitted for pricing.
///
/// Every field is optional on the wire so that missing values are reported by
/// request validation rather than by the JSON decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRequest {
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub insurance_group: i64,
    #[serde(default)]
    pub license_held_since: String,
}

/// One premium computed for one base-rate tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub premium: f64,
    pub currency: String,
    pub fare_group: String,
}

impl Quote {
    pub(crate) fn from_base(base: &Range) -> Self {
        Self {
            premium: base.value,
            currency: QUOTE_CURRENCY.to_string(),
            fare_group: base.label.clone(),
        }
    }

    /// Multiplies in one factor, truncating the premium to three decimals.
    pub(crate) fn apply(self, factor: &Range) -> Self {
        Self {
            premium: (self.premium * factor.value * 1000.0).floor() / 1000.0,
            currency: self.currency,
            fare_group: format!("{}, {}", self.fare_group, factor.label),
        }
    }
}

/// Outcome of a pricing request. Quotes are only present when eligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub is_eligible: bool,
    pub message: String,
    #[serde(rename = "pricing")]
    pub quotes: Vec<Quote>,
}

impl PricingResult {
    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            is_eligible: false,
            message: message.into(),
            quotes: Vec::new(),
        }
    }

    pub fn priced(quotes: Vec<Quote>) -> Self {
        Self {
            is_eligible: true,
            message: SUCCESS_MESSAGE.to_string(),
            quotes,
        }
    }
}
