//! Fixed-payment amortization engine.
//!
//! Computes the level periodic payment with the standard annuity formula and
//! walks the loan period by period. All arithmetic is carried unrounded in
//! `rust_decimal::Decimal`; cents rounding only happens through the
//! `rounded()` presentation helpers.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use super::cache::{CacheKey, ScheduleCache};
use super::frequency::PaymentFrequency;
use super::validation::{validate, AmortizationInputs, AmortizationRequest};
use crate::error::AmCalcError;
use crate::time_value;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::AmCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const PERCENT: Decimal = dec!(100);
/// Decimal places used when a schedule is presented to a caller.
pub const PRESENTATION_DP: u32 = 2;

// ---------------------------------------------------------------------------
// Output Types
// ---------------------------------------------------------------------------

/// One period of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRow {
    pub payment_number: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub payment_amount: Money,
    #[serde(rename = "principalPayment", with = "rust_decimal::serde::float")]
    pub principal_portion: Money,
    #[serde(rename = "interestPayment", with = "rust_decimal::serde::float")]
    pub interest_portion: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_balance: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
}

impl PaymentRow {
    /// Copy of the row rounded to cents.
    pub fn rounded(&self) -> PaymentRow {
        PaymentRow {
            payment_amount: to_cents(self.payment_amount),
            principal_portion: to_cents(self.principal_portion),
            interest_portion: to_cents(self.interest_portion),
            remaining_balance: to_cents(self.remaining_balance),
            ..self.clone()
        }
    }
}

/// Echo of the validated inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub principal: Money,
    /// Annual rate in percent.
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
    pub term_years: u32,
    pub number_of_payments: u32,
    pub payment_frequency: PaymentFrequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationResult {
    #[serde(rename = "paymentAmount", with = "rust_decimal::serde::float")]
    pub periodic_payment: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_interest: Money,
    #[serde(rename = "totalPayments", with = "rust_decimal::serde::float")]
    pub total_paid: Money,
    pub schedule: Vec<PaymentRow>,
    pub summary: LoanSummary,
}

impl AmortizationResult {
    /// Copy of the result with every amount rounded to cents.
    pub fn rounded(&self) -> AmortizationResult {
        AmortizationResult {
            periodic_payment: to_cents(self.periodic_payment),
            total_interest: to_cents(self.total_interest),
            total_paid: to_cents(self.total_paid),
            schedule: self.schedule.iter().map(PaymentRow::rounded).collect(),
            summary: self.summary.clone(),
        }
    }

    /// Total interest as a percentage of the amount borrowed.
    pub fn interest_to_principal_pct(&self) -> Decimal {
        if self.summary.principal.is_zero() {
            return Decimal::ZERO;
        }
        self.total_interest / self.summary.principal * PERCENT
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Rate charged per payment period, as a decimal fraction.
pub fn period_rate(annual_rate_pct: Decimal, frequency: PaymentFrequency) -> Rate {
    annual_rate_pct / PERCENT / Decimal::from(frequency.periods_per_year())
}

/// Round an amount to cents, halves away from zero.
pub fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PRESENTATION_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Level payment that retires `principal` over `term_years` at the given
/// frequency. Unrounded.
pub fn periodic_payment(
    principal: Money,
    annual_rate_pct: Decimal,
    term_years: u32,
    frequency: PaymentFrequency,
) -> AmCalcResult<Money> {
    let rate = period_rate(annual_rate_pct, frequency);
    let n = term_years * frequency.periods_per_year();
    // pmt reports money paid out as negative
    let payment = -time_value::pmt(rate, n, principal, Decimal::ZERO)?;
    Ok(payment)
}

/// Payment for the same loan if it were repaid monthly.
pub fn monthly_payment(inputs: &AmortizationInputs) -> AmCalcResult<Money> {
    let monthly = inputs.as_monthly();
    periodic_payment(
        monthly.principal(),
        monthly.annual_rate_pct(),
        monthly.term_years(),
        monthly.frequency(),
    )
}

/// Walk the loan for `n` periods.
///
/// The last row always retires the exact outstanding balance, so its
/// `remaining_balance` is zero and its payment may differ from `payment`
/// by a sub-cent amount.
pub fn generate_schedule(principal: Money, period_rate: Rate, n: u32, payment: Money) -> Vec<PaymentRow> {
    let mut schedule = Vec::with_capacity(n as usize);
    let mut balance = principal;

    for payment_number in 1..=n {
        let interest_portion = balance * period_rate;
        let principal_portion = if payment_number == n {
            balance
        } else {
            (payment - interest_portion).min(balance)
        };
        balance = (balance - principal_portion).max(Decimal::ZERO);

        schedule.push(PaymentRow {
            payment_number,
            payment_amount: principal_portion + interest_portion,
            principal_portion,
            interest_portion,
            remaining_balance: balance,
            payment_date: None,
        });
    }

    schedule
}

/// Validate `request` and compute its full amortization.
pub fn calculate_amortization(request: &AmortizationRequest) -> AmCalcResult<AmortizationResult> {
    let inputs = validate_or_fail(request)?;
    amortize(&inputs)
}

/// As [`calculate_amortization`], reusing a previously computed result for
/// identical inputs when `cache` holds one.
pub fn calculate_amortization_cached(
    request: &AmortizationRequest,
    cache: &dyn ScheduleCache,
) -> AmCalcResult<Arc<AmortizationResult>> {
    let inputs = validate_or_fail(request)?;
    let (result, _) = amortize_with_cache(&inputs, cache)?;
    Ok(result)
}

/// Compute the amortization of already validated inputs.
pub fn amortize(inputs: &AmortizationInputs) -> AmCalcResult<AmortizationResult> {
    let frequency = inputs.frequency();
    let principal = inputs.principal();
    let rate = period_rate(inputs.annual_rate_pct(), frequency);
    let n = inputs.number_of_payments();

    let payment = periodic_payment(principal, inputs.annual_rate_pct(), inputs.term_years(), frequency)?;
    let mut schedule = generate_schedule(principal, rate, n, payment);

    if let Some(start) = inputs.start_date() {
        assign_payment_dates(&mut schedule, start, frequency)?;
    }

    let total_paid: Money = schedule.iter().map(|row| row.payment_amount).sum();
    let total_interest = total_paid - principal;

    log::debug!(
        "amortized {principal} at {}% over {} {frequency} payments: payment {payment}",
        inputs.annual_rate_pct(),
        n
    );

    Ok(AmortizationResult {
        periodic_payment: payment,
        total_interest,
        total_paid,
        schedule,
        summary: LoanSummary {
            principal,
            interest_rate: inputs.annual_rate_pct(),
            term_years: inputs.term_years(),
            number_of_payments: n,
            payment_frequency: frequency,
        },
    })
}

/// Full calculation wrapped in the standard computation envelope.
pub fn amortization_report(
    request: &AmortizationRequest,
    cache: &dyn ScheduleCache,
) -> AmCalcResult<ComputationOutput<AmortizationResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let inputs = validate_or_fail(request)?;
    let (result, cached) = amortize_with_cache(&inputs, cache)?;

    if result.total_interest > result.summary.principal {
        warnings.push(format!(
            "Total interest {} exceeds the principal borrowed",
            to_cents(result.total_interest)
        ));
    }
    if let Some(last) = result.schedule.last() {
        let adjustment = last.payment_amount - result.periodic_payment;
        if to_cents(adjustment.abs()) > Decimal::ZERO {
            warnings.push(format!(
                "Final payment adjusted by {} to retire the balance",
                to_cents(adjustment)
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-payment annuity amortization",
        &inputs,
        warnings,
        elapsed,
        cached,
        (*result).clone(),
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_or_fail(request: &AmortizationRequest) -> AmCalcResult<AmortizationInputs> {
    validate(request).map_err(|errors| {
        log::warn!("rejected amortization request with {} error(s)", errors.len());
        AmCalcError::ValidationFailed(errors)
    })
}

fn amortize_with_cache(
    inputs: &AmortizationInputs,
    cache: &dyn ScheduleCache,
) -> AmCalcResult<(Arc<AmortizationResult>, bool)> {
    let key = CacheKey::from_inputs(inputs);
    if let Some(hit) = cache.get(&key) {
        log::debug!("schedule cache hit for {key}");
        return Ok((hit, true));
    }

    let result = Arc::new(amortize(inputs)?);
    cache.insert(key, Arc::clone(&result));
    Ok((result, false))
}

fn assign_payment_dates(
    schedule: &mut [PaymentRow],
    start: NaiveDate,
    frequency: PaymentFrequency,
) -> AmCalcResult<()> {
    for row in schedule.iter_mut() {
        let date = frequency.advance(start, row.payment_number - 1).ok_or_else(|| {
            AmCalcError::InvalidInput {
                field: "startDate".into(),
                reason: format!("Payment {} falls outside the supported date range", row.payment_number),
            }
        })?;
        row.payment_date = Some(date);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
