use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::cache::RateCache;
use super::chain;
use super::domain::{NormalizedRanges, PricingRequest, PricingResult};
use super::source::{FileRateSource, RateLoadError, RateSource};
use crate::config::RateTableConfig;

/// Service composing the rate cache with the pricing chain.
pub struct PricingEngine<S> {
    cache: RateCache<S>,
    ttl_seconds: u64,
}

impl PricingEngine<FileRateSource> {
    /// Engine reading rate tables from the configured directory.
    pub fn from_config(config: &RateTableConfig) -> Self {
        Self::new(FileRateSource::new(config.directory.clone()), config.ttl_seconds)
    }
}

impl<S: RateSource> PricingEngine<S> {
    pub fn new(source: S, ttl_seconds: u64) -> Self {
        Self {
            cache: RateCache::new(source),
            ttl_seconds,
        }
    }

    pub fn cache(&self) -> &RateCache<S> {
        &self.cache
    }

    /// Price a request against the current rate tables, refreshing them first
    /// if they have expired. Only rate table failures are returned as errors.
    pub fn compute_pricing(
        &self,
        request: &PricingRequest,
    ) -> Result<PricingResult, RateLoadError> {
        self.compute_pricing_at(request, Utc::now())
    }

    pub fn compute_pricing_at(
        &self,
        request: &PricingRequest,
        now: DateTime<Utc>,
    ) -> Result<PricingResult, RateLoadError> {
        self.cache.refresh_at(false, self.ttl_seconds, now)?;
        let ranges = self.cache.snapshot();
        Ok(chain::price(request, &ranges, now))
    }

    /// Snapshot of the four normalized tables, refreshed if expired.
    pub fn normalized_ranges(&self) -> Result<Arc<NormalizedRanges>, RateLoadError> {
        self.cache.refresh(false, self.ttl_seconds)?;
        Ok(self.cache.snapshot())
    }

    /// Forces a reload regardless of expiry.
    pub fn reload(&self) -> Result<(), RateLoadError> {
        self.cache.refresh(true, self.ttl_seconds).map(|_| ())
    }
}
