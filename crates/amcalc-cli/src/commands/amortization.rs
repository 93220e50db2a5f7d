use chrono::NaiveDate;
use clap::Args;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use amcalc_core::amortization::{self, to_cents, AmortizationRequest, NoCache, PaymentFrequency};

use crate::input;

/// Loan parameters shared by every amortization subcommand
#[derive(Args, Debug, Default)]
pub struct LoanArgs {
    /// Path to JSON request file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (3.5 = 3.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in whole years
    #[arg(long)]
    pub term_years: Option<Decimal>,

    /// Payment frequency (monthly, biweekly, weekly, semimonthly, quarterly, semiannually, annually)
    #[arg(long, value_parser = parse_frequency)]
    pub frequency: Option<PaymentFrequency>,

    /// Date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

fn parse_frequency(s: &str) -> Result<PaymentFrequency, String> {
    s.parse::<PaymentFrequency>().map_err(|e| e.to_string())
}

/// Build the request from --input, stdin, or flags, in that order.
/// Missing flags are left for validation to report.
fn resolve_request(args: LoanArgs) -> Result<AmortizationRequest, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(request) = input::stdin::read_stdin()? {
        return Ok(request);
    }
    Ok(request_from_flags(args))
}

fn request_from_flags(args: LoanArgs) -> AmortizationRequest {
    AmortizationRequest {
        principal: args.principal,
        interest_rate: args.rate,
        term_years: args.term_years,
        payment_frequency: args.frequency,
        start_date: args.start_date,
    }
}

pub fn run_amortize(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = resolve_request(args)?;
    let mut report = amortization::amortization_report(&request, &NoCache)?;
    let pct = report.result.interest_to_principal_pct();
    report.result = report.result.rounded();

    let mut value = serde_json::to_value(report)?;
    value["result"]["interestToPrincipalPct"] = json!(pct.round_dp(1).to_f64());
    Ok(value)
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = resolve_request(args)?;
    let result = amortization::calculate_amortization(&request)?;
    let rows: Vec<_> = result.schedule.iter().map(|row| row.rounded()).collect();
    Ok(serde_json::to_value(rows)?)
}

pub fn run_payment(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = resolve_request(args)?;
    let inputs = amortization::validate(&request)
        .map_err(amcalc_core::AmCalcError::ValidationFailed)?;
    let payment = amortization::periodic_payment(
        inputs.principal(),
        inputs.annual_rate_pct(),
        inputs.term_years(),
        inputs.frequency(),
    )?;
    let monthly = amortization::monthly_payment(&inputs)?;

    Ok(json!({
        "paymentAmount": to_cents(payment).to_f64(),
        "paymentFrequency": inputs.frequency(),
        "numberOfPayments": inputs.number_of_payments(),
        "monthlyEquivalent": to_cents(monthly).to_f64(),
    }))
}

pub fn run_validate(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = resolve_request(args)?;
    let errors = match amortization::validate(&request) {
        Ok(_) => Vec::new(),
        Err(errors) => errors,
    };
    Ok(json!({
        "valid": errors.is_empty(),
        "errors": errors,
    }))
}

pub fn run_frequencies() -> Result<Value, Box<dyn std::error::Error>> {
    let rows: Vec<Value> = PaymentFrequency::ALL
        .iter()
        .map(|f| {
            json!({
                "frequency": f.as_str(),
                "periodsPerYear": f.periods_per_year(),
            })
        })
        .collect();
    Ok(Value::Array(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flags(principal: Decimal, rate: Decimal, term: Decimal) -> LoanArgs {
        LoanArgs {
            principal: Some(principal),
            rate: Some(rate),
            term_years: Some(term),
            ..LoanArgs::default()
        }
    }

    #[test]
    fn test_flags_build_request() {
        let request = request_from_flags(LoanArgs {
            frequency: Some(PaymentFrequency::Weekly),
            ..flags(Decimal::from(200000), Decimal::new(35, 1), Decimal::from(30))
        });
        assert_eq!(request.payment_frequency, Some(PaymentFrequency::Weekly));
        assert_eq!(request.interest_rate, Some(Decimal::new(35, 1)));
    }

    #[test]
    fn test_parse_frequency_rejects_unknown() {
        assert_eq!(parse_frequency("Biweekly"), Ok(PaymentFrequency::Biweekly));
        assert!(parse_frequency("daily").unwrap_err().contains("daily"));
    }

    #[test]
    fn test_frequencies_listing() {
        let value = run_frequencies().unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0]["frequency"], "monthly");
        assert_eq!(rows[0]["periodsPerYear"], 12);
    }
}
