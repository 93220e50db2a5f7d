//! Node bindings for the amortization engine.
//!
//! Every function takes and returns JSON strings using the calculator's
//! camelCase wire names. Calculations share one process-wide schedule cache.

use napi::Result as NapiResult;
use napi_derive::napi;
use once_cell::sync::Lazy;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use amcalc_core::amortization::{
    self, AmortizationRequest, CacheConfig, LruScheduleCache, ScheduleCache,
};
use amcalc_core::{AmCalcError, ValidationError};

static SCHEDULE_CACHE: Lazy<LruScheduleCache> = Lazy::new(|| LruScheduleCache::new(CacheConfig::default()));

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_request(input_json: &str) -> NapiResult<AmortizationRequest> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationReport {
    is_valid: bool,
    errors: Vec<ValidationError>,
}

// ---------------------------------------------------------------------------
// Calculator
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_amortization(input_json: String) -> NapiResult<String> {
    let request = parse_request(&input_json)?;
    let result = amortization::calculate_amortization_cached(&request, &*SCHEDULE_CACHE)
        .map_err(to_napi_error)?;
    serde_json::to_string(result.as_ref()).map_err(to_napi_error)
}

#[napi]
pub fn amortization_report(input_json: String) -> NapiResult<String> {
    let request = parse_request(&input_json)?;
    let report = amortization::amortization_report(&request, &*SCHEDULE_CACHE).map_err(to_napi_error)?;
    serde_json::to_string(&report).map_err(to_napi_error)
}

#[napi]
pub fn validate_inputs(input_json: String) -> NapiResult<String> {
    let request = parse_request(&input_json)?;
    let errors = match amortization::validate(&request) {
        Ok(_) => Vec::new(),
        Err(errors) => errors,
    };
    let report = ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    };
    serde_json::to_string(&report).map_err(to_napi_error)
}

#[napi]
pub fn periodic_payment(input_json: String) -> NapiResult<String> {
    let request = parse_request(&input_json)?;
    let inputs = amortization::validate(&request)
        .map_err(|errors| to_napi_error(AmCalcError::ValidationFailed(errors)))?;
    let payment = amortization::periodic_payment(
        inputs.principal(),
        inputs.annual_rate_pct(),
        inputs.term_years(),
        inputs.frequency(),
    )
    .map_err(to_napi_error)?;
    let monthly = amortization::monthly_payment(&inputs).map_err(to_napi_error)?;

    let output = serde_json::json!({
        "paymentAmount": payment.to_f64(),
        "monthlyPayment": monthly.to_f64(),
        "numberOfPayments": inputs.number_of_payments(),
    });
    Ok(output.to_string())
}

// ---------------------------------------------------------------------------
// Cache management
// ---------------------------------------------------------------------------

#[napi]
pub fn clear_cache() {
    log::debug!("clearing schedule cache ({} entries)", SCHEDULE_CACHE.len());
    SCHEDULE_CACHE.clear();
}

#[napi]
pub fn cache_stats() -> NapiResult<String> {
    serde_json::to_string(&SCHEDULE_CACHE.stats()).map_err(to_napi_error)
}
