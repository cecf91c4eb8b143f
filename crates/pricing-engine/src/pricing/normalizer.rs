use super::domain::{RateCategory, Range};
use super::records::{
    BaseRateRecord, DriverAgeFactorRecord, InsuranceGroupFactorRecord,
    LicenceValidityFactorRecord,
};
use super::source::RateLoadError;

/// Builds contiguous tiers from records that only carry an upper bound.
pub fn base_rate_ranges(mut records: Vec<BaseRateRecord>) -> Vec<Range> {
    records.sort_by_key(|record| record.time);

    let mut previous = 0;
    records
        .into_iter()
        .map(|record| {
            let range = Range {
                start: previous,
                end: record.time,
                value: record.rate,
                label: record.label,
                is_eligible: true,
            };
            previous = record.time;
            range
        })
        .collect()
}

/// Builds contiguous age tiers, then appends an always-eligible open tier
/// above the highest configured age that reuses the last factor.
pub fn driver_age_ranges(mut records: Vec<DriverAgeFactorRecord>) -> Vec<Range> {
    records.sort_by_key(|record| record.age);

    let mut ranges = Vec::with_capacity(records.len() + 1);
    let mut previous = 0;
    for record in &records {
        ranges.push(Range {
            start: previous,
            end: record.age,
            value: record.factor,
            label: format!("Driver Age:{}-{}", previous, record.age),
            is_eligible: record.is_eligible,
        });
        previous = record.age;
    }

    if let Some(last) = records.last() {
        ranges.push(Range {
            start: last.age,
            end: Range::UNBOUNDED,
            value: last.factor,
            label: format!("Driver Age >{}", last.age),
            is_eligible: true,
        });
    }

    ranges
}

pub fn insurance_group_ranges(
    records: Vec<InsuranceGroupFactorRecord>,
) -> Result<Vec<Range>, RateLoadError> {
    records
        .into_iter()
        .map(|record| {
            let (start, end) = parse_range_token(RateCategory::InsuranceGroup, &record.group)?;
            Ok(Range {
                start,
                end,
                value: record.factor,
                label: format!("Insurance Group:{}", record.group),
                is_eligible: record.is_eligible,
            })
        })
        .collect()
}

pub fn licence_validity_ranges(
    records: Vec<LicenceValidityFactorRecord>,
) -> Result<Vec<Range>, RateLoadError> {
    records
        .into_iter()
        .map(|record| {
            let (start, end) = parse_range_token(RateCategory::LicenceValidity, &record.length)?;
            Ok(Range {
                start,
                end,
                value: record.factor,
                label: format!("Licence Validity:{}", record.length),
                is_eligible: true,
            })
        })
        .collect()
}

/// Parses `"A-B"` into `(A, B)` and `"A"` into `(A, UNBOUNDED)`.
pub fn parse_range_token(
    category: RateCategory,
    token: &str,
) -> Result<(i64, i64), RateLoadError> {
    let invalid = || RateLoadError::InvalidRangeToken {
        category,
        token: token.to_string(),
    };
    let parse = |part: &str| part.trim().parse::<i64>().map_err(|_| invalid());

    let mut parts = token.split('-');
    let start = parse(parts.next().ok_or_else(invalid)?)?;
    let end = match parts.next() {
        Some(part) => parse(part)?,
        None => Range::UNBOUNDED,
    };

    if parts.next().is_some() {
        return Err(invalid());
    }

    Ok((start, end))
}
