use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

use super::domain::{RateCategory, Range};

/// Hours in the 30-day-month, 12-month year used for age and tenure.
const HOURS_PER_PRICING_YEAR: f64 = 24.0 * 30.0 * 12.0;

/// Request date fields that are converted into whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    DateOfBirth,
    LicenseHeldSince,
}

impl DateField {
    pub fn name(self) -> &'static str {
        match self {
            DateField::DateOfBirth => "DateOfBirth",
            DateField::LicenseHeldSince => "LicenseHeldSince",
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reasons a factor lookup does not yield a usable range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("{}", not_found_message(.0))]
    NotFound(RateCategory),
    /// The matched range is authoritative for the decline reason.
    #[error("Declined due to: {}", .range.label)]
    Declined { range: Range },
    #[error("Error while Parsing {field} date. Error: {diagnostic}")]
    InvalidDate {
        field: DateField,
        diagnostic: String,
    },
}

fn not_found_message(category: &RateCategory) -> &'static str {
    match category {
        RateCategory::BaseRate => "MatchingBaseRate not found!",
        RateCategory::DriverAge => "MatchingDriverAgeFactor not found!",
        RateCategory::InsuranceGroup => "MatchingInsuranceGroupFactor not found!",
        RateCategory::LicenceValidity => "MatchingLicenceValidityFactor not found!",
    }
}

/// Returns the first range with `start < value <= end`.
pub fn resolve(
    category: RateCategory,
    ranges: &[Range],
    value: i64,
) -> Result<&Range, ResolveError> {
    let range = ranges
        .iter()
        .find(|range| range.contains(value))
        .ok_or(ResolveError::NotFound(category))?;

    if range.is_eligible {
        Ok(range)
    } else {
        Err(ResolveError::Declined {
            range: range.clone(),
        })
    }
}

/// Whole pricing years elapsed between a `YYYY-MM-DD` date and `now`.
pub fn elapsed_years(
    field: DateField,
    raw: &str,
    now: DateTime<Utc>,
) -> Result<i64, ResolveError> {
    let invalid = |reason: &dyn fmt::Display| ResolveError::InvalidDate {
        field,
        diagnostic: format!("parsing '{raw}' as YYYY-MM-DD: {reason}"),
    };
    if !has_iso_date_shape(raw) {
        return Err(invalid(&"expected four-digit year, two-digit month and day"));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|err| invalid(&err))?;

    let reference = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let hours = (now - reference).num_seconds() as f64 / 3600.0;
    Ok((hours / HOURS_PER_PRICING_YEAR) as i64)
}

/// `dddd-dd-dd`; chrono alone also accepts signed, short and unpadded fields.
fn has_iso_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}
