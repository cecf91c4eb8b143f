use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use super::domain::{PricingRequest, PricingResult};
use super::service::PricingEngine;
use super::source::{RateLoadError, RateSource};

/// Pricing outcome echoed together with the request it was computed for.
#[derive(Debug, Clone, Serialize)]
pub struct PricingResponse {
    pub input: PricingRequest,
    #[serde(flatten)]
    pub result: PricingResult,
}

/// Router builder exposing the pricing and rate table endpoints.
pub fn pricing_router<S>(engine: Arc<PricingEngine<S>>) -> Router
where
    S: RateSource + 'static,
{
    Router::new()
        .route(
            "/generate_pricing",
            post(generate_pricing_handler::<S>).get(rate_tables_handler::<S>),
        )
        .route("/generate_pricing/reload", post(reload_handler::<S>))
        .with_state(engine)
}

pub(crate) async fn generate_pricing_handler<S>(
    State(engine): State<Arc<PricingEngine<S>>>,
    axum::Json(request): axum::Json<PricingRequest>,
) -> Response
where
    S: RateSource + 'static,
{
    let priced = run_blocking(engine, move |engine| {
        let result = engine.compute_pricing(&request)?;
        Ok(PricingResponse {
            input: request,
            result,
        })
    })
    .await;

    match priced {
        Ok(payload) => (StatusCode::OK, axum::Json(payload)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn rate_tables_handler<S>(
    State(engine): State<Arc<PricingEngine<S>>>,
) -> Response
where
    S: RateSource + 'static,
{
    match run_blocking(engine, |engine| engine.normalized_ranges()).await {
        Ok(ranges) => (StatusCode::OK, axum::Json(ranges.as_ref().clone())).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn reload_handler<S>(State(engine): State<Arc<PricingEngine<S>>>) -> Response
where
    S: RateSource + 'static,
{
    match run_blocking(engine, |engine| engine.reload()).await {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "status": "reloaded" }))).into_response(),
        Err(response) => response,
    }
}

/// Runs an engine call on the blocking pool; a refresh reads rate files while
/// holding the cache write lock.
async fn run_blocking<S, T, F>(engine: Arc<PricingEngine<S>>, job: F) -> Result<T, Response>
where
    S: RateSource + 'static,
    T: Send + 'static,
    F: FnOnce(&PricingEngine<S>) -> Result<T, RateLoadError> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || job(&engine)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(rate_tables_unavailable(err)),
        Err(err) => {
            error!(error = %err, "pricing task did not complete");
            let payload = json!({ "error": "pricing task did not complete" });
            Err((StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response())
        }
    }
}

fn rate_tables_unavailable(err: RateLoadError) -> Response {
    error!(error = %err, "rate tables unavailable");
    let payload = json!({
        "error": err.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
