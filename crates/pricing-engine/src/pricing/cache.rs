use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use super::domain::{NormalizedRanges, RateCategory};
use super::normalizer;
use super::source::{RateLoadError, RateSource};

/// Normalized rate tables with an absolute expiry, reloaded from a source.
pub struct RateCache<S> {
    source: S,
    state: RwLock<CacheState>,
}

#[derive(Default)]
struct CacheState {
    ranges: Arc<NormalizedRanges>,
    expires_at: Option<DateTime<Utc>>,
}

impl<S: RateSource> RateCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: RwLock::new(CacheState::default()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Reloads all four tables when forced, never loaded, or expired.
    /// Returns whether a reload happened.
    pub fn refresh(&self, force: bool, ttl_seconds: u64) -> Result<bool, RateLoadError> {
        self.refresh_at(force, ttl_seconds, Utc::now())
    }

    pub fn refresh_at(
        &self,
        force: bool,
        ttl_seconds: u64,
        now: DateTime<Utc>,
    ) -> Result<bool, RateLoadError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        let stale = match state.expires_at {
            None => true,
            Some(expires_at) => now > expires_at,
        };
        if !force && !stale {
            return Ok(false);
        }

        let ranges = self.load().map_err(|err| {
            warn!(error = %err, "rate table reload failed; keeping previous tables");
            err
        })?;

        info!(
            force,
            ttl_seconds,
            base_rates = ranges.base_rate.len(),
            driver_age = ranges.driver_age.len(),
            insurance_group = ranges.insurance_group.len(),
            licence_validity = ranges.licence_validity.len(),
            "rate tables reloaded"
        );

        state.ranges = Arc::new(ranges);
        state.expires_at = Some(expiry(now, ttl_seconds));
        Ok(true)
    }

    /// The tables published by the last successful reload.
    pub fn snapshot(&self) -> Arc<NormalizedRanges> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&state.ranges)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.expires_at
    }

    fn load(&self) -> Result<NormalizedRanges, RateLoadError> {
        let base_rate = normalizer::base_rate_ranges(self.records(RateCategory::BaseRate)?);
        let driver_age = normalizer::driver_age_ranges(self.records(RateCategory::DriverAge)?);
        let insurance_group =
            normalizer::insurance_group_ranges(self.records(RateCategory::InsuranceGroup)?)?;
        let licence_validity =
            normalizer::licence_validity_ranges(self.records(RateCategory::LicenceValidity)?)?;

        Ok(NormalizedRanges {
            base_rate,
            driver_age,
            insurance_group,
            licence_validity,
        })
    }

    fn records<T: DeserializeOwned>(
        &self,
        category: RateCategory,
    ) -> Result<Vec<T>, RateLoadError> {
        let raw = self.source.fetch(category)?;
        serde_json::from_value(raw).map_err(|source| RateLoadError::Parse { category, source })
    }
}

fn expiry(now: DateTime<Utc>, ttl_seconds: u64) -> DateTime<Utc> {
    i64::try_from(ttl_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
