//! Request validation for the amortization calculator.
//!
//! Every violated constraint is collected so a caller can report all of them
//! at once. Each logical constraint produces at most one message per field.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::frequency::PaymentFrequency;
use crate::error::ValidationError;
use crate::types::Money;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MIN_PRINCIPAL: Decimal = dec!(1000);
pub const MAX_PRINCIPAL: Decimal = dec!(10000000);
pub const MIN_RATE_PCT: Decimal = dec!(0.1);
pub const MAX_RATE_PCT: Decimal = dec!(25);
pub const MIN_TERM_YEARS: Decimal = dec!(1);
pub const MAX_TERM_YEARS: Decimal = dec!(50);

pub const FIELD_PRINCIPAL: &str = "principal";
pub const FIELD_INTEREST_RATE: &str = "interestRate";
pub const FIELD_TERM_YEARS: &str = "termYears";

// ---------------------------------------------------------------------------
// Input Types
// ---------------------------------------------------------------------------

/// Raw calculator request as received from a caller.
///
/// Numeric fields are optional so that a missing value is reported as a
/// validation error rather than a parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationRequest {
    #[serde(default)]
    pub principal: Option<Money>,
    /// Annual rate in percent (3.5 = 3.5%).
    #[serde(default)]
    pub interest_rate: Option<Decimal>,
    #[serde(default)]
    pub term_years: Option<Decimal>,
    #[serde(default)]
    pub payment_frequency: Option<PaymentFrequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl AmortizationRequest {
    pub fn new(principal: Money, interest_rate: Decimal, term_years: u32) -> Self {
        Self {
            principal: Some(principal),
            interest_rate: Some(interest_rate),
            term_years: Some(Decimal::from(term_years)),
            payment_frequency: None,
            start_date: None,
        }
    }

    pub fn with_frequency(mut self, frequency: PaymentFrequency) -> Self {
        self.payment_frequency = Some(frequency);
        self
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }
}

/// Loan parameters that passed every range check.
///
/// Only [`validate`] builds one, so the engine never sees partially valid input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationInputs {
    principal: Money,
    interest_rate: Decimal,
    term_years: u32,
    payment_frequency: PaymentFrequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_date: Option<NaiveDate>,
}

impl AmortizationInputs {
    pub fn principal(&self) -> Money {
        self.principal
    }

    /// Annual rate in percent.
    pub fn annual_rate_pct(&self) -> Decimal {
        self.interest_rate
    }

    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    pub fn frequency(&self) -> PaymentFrequency {
        self.payment_frequency
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn number_of_payments(&self) -> u32 {
        self.term_years * self.payment_frequency.periods_per_year()
    }

    /// Same loan, repaid monthly.
    pub fn as_monthly(&self) -> Self {
        Self {
            payment_frequency: PaymentFrequency::Monthly,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Check every field of `request` against its allowed range.
pub fn validate(request: &AmortizationRequest) -> Result<AmortizationInputs, Vec<ValidationError>> {
    let mut errors: Vec<ValidationError> = Vec::new();

    check_principal(request.principal, &mut errors);
    check_interest_rate(request.interest_rate, &mut errors);
    check_term_years(request.term_years, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    match (request.principal, request.interest_rate, request.term_years.and_then(|t| t.to_u32())) {
        (Some(principal), Some(interest_rate), Some(term_years)) => Ok(AmortizationInputs {
            principal,
            interest_rate,
            term_years,
            payment_frequency: request.payment_frequency.unwrap_or_default(),
            start_date: request.start_date,
        }),
        _ => Err(vec![ValidationError::new(
            FIELD_TERM_YEARS,
            "Term must be a whole number",
        )]),
    }
}

// ---------------------------------------------------------------------------
// Field checks
// ---------------------------------------------------------------------------

fn check_principal(value: Option<Money>, errors: &mut Vec<ValidationError>) {
    let Some(principal) = value else {
        errors.push(ValidationError::new(FIELD_PRINCIPAL, "Principal is required"));
        return;
    };
    if principal <= Decimal::ZERO {
        errors.push(ValidationError::new(
            FIELD_PRINCIPAL,
            "Principal must be a positive number",
        ));
    } else if principal < MIN_PRINCIPAL {
        errors.push(ValidationError::new(
            FIELD_PRINCIPAL,
            "Principal must be at least $1,000",
        ));
    } else if principal > MAX_PRINCIPAL {
        errors.push(ValidationError::new(
            FIELD_PRINCIPAL,
            "Principal cannot exceed $10,000,000",
        ));
    }
}

fn check_interest_rate(value: Option<Decimal>, errors: &mut Vec<ValidationError>) {
    let Some(rate) = value else {
        errors.push(ValidationError::new(
            FIELD_INTEREST_RATE,
            "Interest rate is required",
        ));
        return;
    };
    if rate <= Decimal::ZERO {
        errors.push(ValidationError::new(
            FIELD_INTEREST_RATE,
            "Interest rate must be a positive number",
        ));
    } else if rate < MIN_RATE_PCT {
        errors.push(ValidationError::new(
            FIELD_INTEREST_RATE,
            "Interest rate must be at least 0.1%",
        ));
    } else if rate > MAX_RATE_PCT {
        errors.push(ValidationError::new(
            FIELD_INTEREST_RATE,
            "Interest rate cannot exceed 25%",
        ));
    }
}

fn check_term_years(value: Option<Decimal>, errors: &mut Vec<ValidationError>) {
    let Some(term) = value else {
        errors.push(ValidationError::new(FIELD_TERM_YEARS, "Term is required"));
        return;
    };
    if !term.fract().is_zero() {
        errors.push(ValidationError::new(
            FIELD_TERM_YEARS,
            "Term must be a whole number",
        ));
    }
    if term <= Decimal::ZERO {
        errors.push(ValidationError::new(
            FIELD_TERM_YEARS,
            "Term must be a positive number",
        ));
    } else if term < MIN_TERM_YEARS {
        errors.push(ValidationError::new(
            FIELD_TERM_YEARS,
            "Term must be at least 1 year",
        ));
    } else if term > MAX_TERM_YEARS {
        errors.push(ValidationError::new(
            FIELD_TERM_YEARS,
            "Term cannot exceed 50 years",
        ));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
