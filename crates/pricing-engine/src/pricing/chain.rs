use chrono::{DateTime, Utc};
use tracing::debug;

use super::domain::{
    NormalizedRanges, PricingRequest, PricingResult, Quote, RateCategory, Range,
};
use super::resolver::{elapsed_years, resolve, DateField, ResolveError};

/// Request fields rejected before any rate table is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("DateOfBirth cannot be empty")]
    MissingDateOfBirth,
    #[error("InsuranceGroup should be a Positive number")]
    NonPositiveInsuranceGroup,
    #[error("LicenseHeldSince Date cannot be empty")]
    MissingLicenseHeldSince,
}

/// Every request-path failure; each one becomes a declined result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RejectionReason {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Resolution(#[from] ResolveError),
}

pub fn validate(request: &PricingRequest) -> Result<(), ValidationError> {
    if request.date_of_birth.trim().is_empty() {
        return Err(ValidationError::MissingDateOfBirth);
    }
    if request.insurance_group <= 0 {
        return Err(ValidationError::NonPositiveInsuranceGroup);
    }
    if request.license_held_since.trim().is_empty() {
        return Err(ValidationError::MissingLicenseHeldSince);
    }
    Ok(())
}

/// Resolves the three factors in application order: age, group, licence.
pub fn resolve_factors<'a>(
    request: &PricingRequest,
    ranges: &'a NormalizedRanges,
    now: DateTime<Utc>,
) -> Result<[&'a Range; 3], ResolveError> {
    let age = elapsed_years(DateField::DateOfBirth, request.date_of_birth.trim(), now)?;
    let driver_age = resolve(RateCategory::DriverAge, &ranges.driver_age, age)?;

    let insurance_group = resolve(
        RateCategory::InsuranceGroup,
        &ranges.insurance_group,
        request.insurance_group,
    )?;

    let tenure = elapsed_years(
        DateField::LicenseHeldSince,
        request.license_held_since.trim(),
        now,
    )?;
    let licence_validity = resolve(
        RateCategory::LicenceValidity,
        &ranges.licence_validity,
        tenure,
    )?;

    Ok([driver_age, insurance_group, licence_validity])
}

/// One quote per base-rate tier, each folded through the factors in order.
pub fn compose_quotes(base_rates: &[Range], factors: &[&Range]) -> Vec<Quote> {
    base_rates
        .iter()
        .map(|base| {
            factors
                .iter()
                .fold(Quote::from_base(base), |quote, factor| quote.apply(factor))
        })
        .collect()
}

/// Validates, resolves, and prices a request against one snapshot of tables.
pub fn evaluate(
    request: &PricingRequest,
    ranges: &NormalizedRanges,
    now: DateTime<Utc>,
) -> Result<Vec<Quote>, RejectionReason> {
    validate(request)?;
    let factors = resolve_factors(request, ranges, now)?;
    Ok(compose_quotes(&ranges.base_rate, &factors))
}

/// Same as [`evaluate`] with failures folded into a declined result.
pub fn price(
    request: &PricingRequest,
    ranges: &NormalizedRanges,
    now: DateTime<Utc>,
) -> PricingResult {
    match evaluate(request, ranges, now) {
        Ok(quotes) => PricingResult::priced(quotes),
        Err(reason) => {
            debug!(%reason, "pricing request declined");
            PricingResult::declined(reason.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factor(label: &str, value: f64) -> Range {
        Range {
            start: 0,
            end: Range::UNBOUNDED,
            value,
            label: label.to_string(),
            is_eligible: true,
        }
    }

    fn base(label: &str, end: i64, value: f64) -> Range {
        Range {
            start: 0,
            end,
            value,
            label: label.to_string(),
            is_eligible: true,
        }
    }

    fn request() -> PricingRequest {
        PricingRequest {
            date_of_birth: "2001-01-02".to_string(),
            insurance_group: 7,
            license_held_since: "2006-01-02".to_string(),
        }
    }

    #[test]
    fn validation_runs_in_field_order() {
        let empty = PricingRequest::default();
        assert_eq!(validate(&empty), Err(ValidationError::MissingDateOfBirth));

        let mut partial = PricingRequest {
            date_of_birth: "2006-01-02".to_string(),
            insurance_group: -1,
            ..PricingRequest::default()
        };
        assert_eq!(validate(&partial), Err(ValidationError::NonPositiveInsuranceGroup));

        partial.insurance_group = 20;
        assert_eq!(validate(&partial), Err(ValidationError::MissingLicenseHeldSince));

        assert_eq!(validate(&request()), Ok(()));
    }

    #[test]
    fn blank_dates_count_as_missing() {
        let request = PricingRequest {
            date_of_birth: "   ".to_string(),
            ..request()
        };
        assert_eq!(validate(&request), Err(ValidationError::MissingDateOfBirth));
    }

    #[test]
    fn compose_quotes_truncates_after_every_factor() {
        let bases = [
            base("0.5 hours", 1800, 273.0),
            base("96 hours / 4 days", 345_600, 5204.0),
        ];
        let age = factor("Driver Age:16-26", 1.1);
        let group = factor("Insurance Group:1-8", 1.05);
        let licence = factor("Licence Validity:6", 0.9);

        let quotes = compose_quotes(&bases, &[&age, &group, &licence]);

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].premium, 283.783);
        assert_eq!(
            quotes[0].fare_group,
            "0.5 hours, Driver Age:16-26, Insurance Group:1-8, Licence Validity:6"
        );
        assert_eq!(quotes[1].premium, 5409.558);
        assert_eq!(quotes[1].currency, "£");
    }

    #[test]
    fn compose_quotes_records_labels_in_application_order() {
        let bases = [base("0.5 hours", 1800, 273.0)];
        let age = factor("age", 1.1);
        let licence = factor("licence", 0.9);

        let forward = compose_quotes(&bases, &[&age, &licence]);
        let reversed = compose_quotes(&bases, &[&licence, &age]);

        assert_eq!(forward[0].fare_group, "0.5 hours, age, licence");
        assert_eq!(reversed[0].fare_group, "0.5 hours, licence, age");
    }

    #[test]
    fn compose_quotes_without_base_rates_is_empty() {
        let age = factor("age", 1.1);
        assert!(compose_quotes(&[], &[&age]).is_empty());
    }
}
