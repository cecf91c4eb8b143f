use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use pricing_engine::config::{AppConfig, RateTableConfig};
use pricing_engine::error::AppError;
use pricing_engine::pricing::{FileRateSource, PricingEngine};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type FilePricingEngine = PricingEngine<FileRateSource>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) engine: Arc<FilePricingEngine>,
}

/// Environment configuration with the rate table directory optionally
/// replaced from the command line.
pub(crate) fn load_config(config_dir: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(directory) = config_dir {
        config.rates.directory = directory;
    }
    Ok(config)
}

pub(crate) fn file_engine(rates: &RateTableConfig) -> Arc<FilePricingEngine> {
    Arc::new(PricingEngine::from_config(rates))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates_only() {
        assert_eq!(
            parse_date(" 2025-10-01 "),
            Ok(NaiveDate::from_ymd_opt(2025, 10, 1).expect("valid date"))
        );
        assert!(parse_date("01/10/2025")
            .expect_err("not iso")
            .contains("YYYY-MM-DD"));
    }
}
