use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::AmCalcError;
use crate::types::{Money, Rate};
use crate::AmCalcResult;

/// Compound growth factor `(1 + rate)^nper`.
pub fn growth_factor(rate: Rate, nper: u32) -> AmCalcResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powi(i64::from(nper))
        .ok_or_else(|| AmCalcError::InvalidInput {
            field: "nper".into(),
            reason: format!("Growth factor overflows at {nper} periods"),
        })
}

/// Payment (PMT), spreadsheet sign convention: a positive present value
/// yields a negative payment.
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> AmCalcResult<Money> {
    if nper == 0 {
        return Err(AmCalcError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(-(present_value + future_value) / Decimal::from(nper));
    }

    let factor = growth_factor(rate, nper)?;
    let annuity_factor = (factor - Decimal::ONE) / rate;

    if annuity_factor.is_zero() {
        return Err(AmCalcError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    Ok(-(present_value * factor + future_value) / annuity_factor)
}

/// Closed-form outstanding balance after `k` level payments of `payment`
/// on a loan of `principal` at `rate` per period.
pub fn remaining_balance(principal: Money, rate: Rate, payment: Money, k: u32) -> AmCalcResult<Money> {
    if rate.is_zero() {
        return Ok(principal - payment * Decimal::from(k));
    }
    let factor = growth_factor(rate, k)?;
    Ok(principal * factor - payment * (factor - Decimal::ONE) / rate)
}
