//! Tiered premium pricing: rate table normalization, range resolution, and
//! the multiplicative factor chain, behind a TTL-refreshed rate cache.

pub mod cache;
pub mod chain;
pub mod domain;
pub mod normalizer;
pub mod records;
pub mod resolver;
pub mod router;
pub mod service;
pub mod source;

#[cfg(test)]
mod tests;

pub use cache::RateCache;
pub use chain::{RejectionReason, ValidationError};
pub use domain::{
    NormalizedRanges, PricingRequest, PricingResult, Quote, Range, RateCategory, QUOTE_CURRENCY,
    SUCCESS_MESSAGE,
};
pub use records::{
    BaseRateRecord, DriverAgeFactorRecord, InsuranceGroupFactorRecord,
    LicenceValidityFactorRecord,
};
pub use resolver::{DateField, ResolveError};
pub use router::{pricing_router, PricingResponse};
pub use service::PricingEngine;
pub use source::{FileRateSource, RateLoadError, RateSource};
