use crate::infra::{file_engine, load_config, parse_date};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::Args;
use pricing_engine::error::AppError;
use pricing_engine::pricing::{PricingRequest, PricingResponse, PricingResult};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Applicant date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) date_of_birth: String,
    /// Vehicle insurance group, a positive integer
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) insurance_group: i64,
    /// Date the driving licence was issued (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) license_held_since: String,
    /// Price as of this date (YYYY-MM-DD) instead of now
    #[arg(long, value_parser = parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Directory holding the rate table JSON files
    #[arg(long)]
    pub(crate) config_dir: Option<PathBuf>,
    /// Print the pricing response as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

impl QuoteArgs {
    fn request(&self) -> PricingRequest {
        PricingRequest {
            date_of_birth: self.date_of_birth.clone(),
            insurance_group: self.insurance_group,
            license_held_since: self.license_held_since.clone(),
        }
    }

    fn priced_at(&self) -> DateTime<Utc> {
        self.as_of
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
            .unwrap_or_else(Utc::now)
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct RangesArgs {
    /// Directory holding the rate table JSON files
    #[arg(long)]
    pub(crate) config_dir: Option<PathBuf>,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let config = load_config(args.config_dir.clone())?;
    let engine = file_engine(&config.rates);
    let request = args.request();
    let result = engine.compute_pricing_at(&request, args.priced_at())?;

    if args.json {
        let response = PricingResponse {
            input: request,
            result,
        };
        match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("pricing payload unavailable: {err}"),
        }
    } else {
        print!("{}", render_quote(&request, &result));
    }

    Ok(())
}

pub(crate) fn run_ranges(args: RangesArgs) -> Result<(), AppError> {
    let config = load_config(args.config_dir)?;
    let engine = file_engine(&config.rates);
    let ranges = engine.normalized_ranges()?;

    match serde_json::to_string_pretty(ranges.as_ref()) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("rate tables unavailable: {err}"),
    }
    Ok(())
}

pub(crate) fn render_quote(request: &PricingRequest, result: &PricingResult) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Applicant: born {}, insurance group {}, licence held since {}",
        request.date_of_birth, request.insurance_group, request.license_held_since
    );

    if !result.is_eligible {
        let _ = writeln!(output, "Eligible: no");
        let _ = writeln!(output, "Reason: {}", result.message);
        return output;
    }

    let _ = writeln!(output, "Eligible: yes ({})", result.message);
    if result.quotes.is_empty() {
        let _ = writeln!(output, "  No base rates configured");
    }
    for quote in &result.quotes {
        let _ = writeln!(
            output,
            "  {}{:.3}  {}",
            quote.currency, quote.premium, quote.fare_group
        );
    }
    output
}
