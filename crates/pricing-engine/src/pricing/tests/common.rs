use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread::ThreadId;

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use crate::pricing::{PricingEngine, PricingRequest, RateCategory, RateLoadError, RateSource};

pub(super) const TTL_SECONDS: u64 = 100_000;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0)
        .single()
        .expect("valid instant")
}

/// In-memory tables that tests can swap or withdraw between refreshes.
#[derive(Clone, Default)]
pub(super) struct MemorySource {
    tables: Arc<Mutex<HashMap<RateCategory, Value>>>,
    fetched: Arc<Mutex<Vec<RateCategory>>>,
    fetch_threads: Arc<Mutex<Vec<ThreadId>>>,
}

impl MemorySource {
    pub(super) fn shipped() -> Self {
        let source = Self::default();
        source.set(
            RateCategory::BaseRate,
            json!([
                { "label": "96 hours / 4 days", "time": 345600, "rate": 5204 },
                { "label": "0.5 hours", "time": 1800, "rate": 273 }
            ]),
        );
        source.set(
            RateCategory::DriverAge,
            json!([
                { "age": 16, "is-eligible": false, "factor": 1.0 },
                { "age": 26, "is-eligible": true, "factor": 1.1 },
                { "age": 65, "is-eligible": true, "factor": 0.95 },
                { "age": 80, "is-eligible": true, "factor": 1.3 }
            ]),
        );
        source.set(
            RateCategory::InsuranceGroup,
            json!([
                { "group": "1-8", "is-eligible": true, "factor": 1.05 },
                { "group": "8", "is-eligible": false, "factor": 1.0 }
            ]),
        );
        source.set(
            RateCategory::LicenceValidity,
            json!([
                { "length": "0-6", "factor": 1.0 },
                { "length": "6", "factor": 0.9 }
            ]),
        );
        source
    }

    pub(super) fn set(&self, category: RateCategory, table: Value) {
        self.tables.lock().expect("tables").insert(category, table);
    }

    pub(super) fn withdraw(&self, category: RateCategory) {
        self.tables.lock().expect("tables").remove(&category);
    }

    pub(super) fn fetched(&self) -> Vec<RateCategory> {
        self.fetched.lock().expect("fetch log").clone()
    }

    pub(super) fn fetch_threads(&self) -> Vec<ThreadId> {
        self.fetch_threads.lock().expect("thread log").clone()
    }
}

impl RateSource for MemorySource {
    fn fetch(&self, category: RateCategory) -> Result<Value, RateLoadError> {
        self.fetched.lock().expect("fetch log").push(category);
        self.fetch_threads
            .lock()
            .expect("thread log")
            .push(std::thread::current().id());
        self.tables
            .lock()
            .expect("tables")
            .get(&category)
            .cloned()
            .ok_or_else(|| RateLoadError::Unavailable(format!("{category} withdrawn")))
    }
}

pub(super) fn engine(source: MemorySource) -> PricingEngine<MemorySource> {
    PricingEngine::new(source, TTL_SECONDS)
}

/// Age 20, group 7, licence held 7 years at [`now`].
pub(super) fn request() -> PricingRequest {
    PricingRequest {
        date_of_birth: "2005-10-01".to_string(),
        insurance_group: 7,
        license_held_since: "2018-06-01".to_string(),
    }
}

pub(super) fn premiums(
    engine: &PricingEngine<MemorySource>,
    request: &PricingRequest,
) -> Vec<f64> {
    engine
        .compute_pricing_at(request, now())
        .expect("tables load")
        .quotes
        .iter()
        .map(|quote| quote.premium)
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
