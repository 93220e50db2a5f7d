use amcalc_core::amortization::{
    calculate_amortization, calculate_amortization_cached, generate_schedule, period_rate,
    periodic_payment, AmortizationRequest, AmortizationResult, LruScheduleCache, NoCache,
    PaymentFrequency, ScheduleCache,
};
use amcalc_core::AmCalcError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn amortize(principal: Decimal, rate: Decimal, years: u32, frequency: PaymentFrequency) -> AmortizationResult {
    let request = AmortizationRequest::new(principal, rate, years).with_frequency(frequency);
    calculate_amortization(&request).unwrap()
}

/// A spread of loans across the valid input ranges.
fn sample_loans() -> Vec<(Decimal, Decimal, u32)> {
    vec![
        (dec!(1000), dec!(0.1), 1),
        (dec!(200000), dec!(3.5), 30),
        (dec!(100000), dec!(5), 10),
        (dec!(750000), dec!(7.25), 15),
        (dec!(10000000), dec!(25), 50),
        (dec!(42500.50), dec!(12.875), 7),
    ]
}

// ===========================================================================
// Known values
// ===========================================================================

#[test]
fn test_thirty_year_mortgage() {
    let result = amortize(dec!(200000), dec!(3.5), 30, PaymentFrequency::Monthly);
    let rounded = result.rounded();

    assert_eq!(rounded.periodic_payment, dec!(898.09));
    assert_eq!(result.schedule.len(), 360);
    assert_eq!(result.schedule.last().unwrap().remaining_balance, Decimal::ZERO);
    assert_eq!(result.summary.number_of_payments, 360);
}

#[test]
fn test_ten_year_loan_totals() {
    let result = amortize(dec!(100000), dec!(5), 10, PaymentFrequency::Monthly).rounded();

    assert_eq!(result.periodic_payment, dec!(1060.66));
    assert_eq!(result.total_interest, dec!(27278.62));
    assert_eq!(result.total_paid, dec!(127278.62));
    assert_eq!(result.schedule.len(), 120);
    assert_eq!(result.summary.principal, dec!(100000));
    assert_eq!(result.summary.interest_rate, dec!(5));
    assert_eq!(result.summary.term_years, 10);
}

#[test]
fn test_zero_rate_formula() {
    // Below the public 0.1% floor, so exercised through the formula directly
    let payment = periodic_payment(dec!(100000), Decimal::ZERO, 30, PaymentFrequency::Monthly).unwrap();
    assert_eq!(payment, dec!(100000) / dec!(360));
    assert!((payment - dec!(277.78)).abs() < dec!(0.005));
}

#[test]
fn test_principal_below_minimum_rejected() {
    let request = AmortizationRequest::new(dec!(500), dec!(3.5), 30);
    match calculate_amortization(&request) {
        Err(AmCalcError::ValidationFailed(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "principal");
            assert_eq!(errors[0].message, "Principal must be at least $1,000");
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn test_rate_above_maximum_rejected() {
    let request = AmortizationRequest::new(dec!(200000), dec!(30), 30);
    let err = calculate_amortization(&request).unwrap_err();
    let errors = err.validation_errors().unwrap();
    assert_eq!(errors[0].field, "interestRate");
    assert_eq!(errors[0].message, "Interest rate cannot exceed 25%");
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_final_balance_is_exactly_zero() {
    for (principal, rate, years) in sample_loans() {
        for frequency in PaymentFrequency::ALL {
            let result = amortize(principal, rate, years, frequency);
            let last = result.schedule.last().unwrap();
            assert_eq!(
                last.remaining_balance,
                Decimal::ZERO,
                "{principal} at {rate}% for {years}y {frequency}"
            );
        }
    }
}

#[test]
fn test_schedule_length_matches_frequency() {
    for frequency in PaymentFrequency::ALL {
        let result = amortize(dec!(250000), dec!(6), 20, frequency);
        assert_eq!(
            result.schedule.len() as u32,
            20 * frequency.periods_per_year(),
            "{frequency}"
        );
        let numbers: Vec<u32> = result.schedule.iter().map(|r| r.payment_number).collect();
        let expected: Vec<u32> = (1..=result.schedule.len() as u32).collect();
        assert_eq!(numbers, expected);
    }
}

#[test]
fn test_balance_never_increases() {
    for (principal, rate, years) in sample_loans() {
        for frequency in PaymentFrequency::ALL {
            let result = amortize(principal, rate, years, frequency);
            let mut previous = principal;
            for row in &result.schedule {
                assert!(
                    row.remaining_balance <= previous,
                    "payment {} raised the balance",
                    row.payment_number
                );
                assert!(row.remaining_balance >= Decimal::ZERO);
                previous = row.remaining_balance;
            }
        }
    }
}

#[test]
fn test_principal_is_conserved() {
    for (principal, rate, years) in sample_loans() {
        for frequency in PaymentFrequency::ALL {
            let result = amortize(principal, rate, years, frequency);
            let principal_sum: Decimal = result.schedule.iter().map(|r| r.principal_portion).sum();
            let interest_sum: Decimal = result.schedule.iter().map(|r| r.interest_portion).sum();
            let tolerance = dec!(0.01) * Decimal::from(result.schedule.len());

            assert!(
                (principal_sum - principal).abs() <= tolerance,
                "principal sum {principal_sum} vs {principal}"
            );
            // Decimal sums round in the 28th digit, so allow for that
            assert!((principal_sum + interest_sum - result.total_paid).abs() < dec!(0.000000000001));
            assert_eq!(result.total_paid - principal, result.total_interest);
        }
    }
}

#[test]
fn test_total_paid_matches_level_payments() {
    let result = amortize(dec!(200000), dec!(3.5), 30, PaymentFrequency::Monthly);
    let level_total = result.periodic_payment * Decimal::from(result.schedule.len());
    assert!((result.total_paid - level_total).abs() < dec!(0.0001));
}

#[test]
fn test_payment_constant_until_final_row() {
    let result = amortize(dec!(300000), dec!(4.75), 25, PaymentFrequency::Biweekly);
    let (last, rest) = result.schedule.split_last().unwrap();
    for row in rest {
        assert!((row.payment_amount - result.periodic_payment).abs() < dec!(0.000000000001));
    }
    assert!((last.payment_amount - result.periodic_payment).abs() < dec!(0.005));
}

#[test]
fn test_interest_share_shrinks_over_time() {
    let result = amortize(dec!(200000), dec!(3.5), 30, PaymentFrequency::Monthly);
    let first = &result.schedule[0];
    let last = result.schedule.last().unwrap();
    assert!(first.interest_portion > first.principal_portion);
    assert!(last.interest_portion < last.principal_portion);
}

#[test]
fn test_more_frequent_payments_cost_less_interest() {
    let monthly = amortize(dec!(200000), dec!(6), 30, PaymentFrequency::Monthly);
    let annual = amortize(dec!(200000), dec!(6), 30, PaymentFrequency::Annually);
    assert!(monthly.total_interest < annual.total_interest);
}

#[test]
fn test_generate_schedule_is_restartable() {
    let rate = period_rate(dec!(5), PaymentFrequency::Quarterly);
    let payment = periodic_payment(dec!(50000), dec!(5), 5, PaymentFrequency::Quarterly).unwrap();
    let first = generate_schedule(dec!(50000), rate, 20, payment);
    let second = generate_schedule(dec!(50000), rate, 20, payment);
    assert_eq!(first, second);
}

// ===========================================================================
// Idempotence
// ===========================================================================

#[test]
fn test_repeat_calculation_is_identical() {
    let request = AmortizationRequest::new(dec!(350000), dec!(6.5), 30)
        .with_frequency(PaymentFrequency::Semimonthly);
    let a = calculate_amortization(&request).unwrap();
    let b = calculate_amortization(&request).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_cache_does_not_change_output() {
    let request = AmortizationRequest::new(dec!(350000), dec!(6.5), 30);
    let cache = LruScheduleCache::default();

    let plain = calculate_amortization(&request).unwrap();
    let via_no_cache = calculate_amortization_cached(&request, &NoCache).unwrap();
    let miss = calculate_amortization_cached(&request, &cache).unwrap();
    let hit = calculate_amortization_cached(&request, &cache).unwrap();

    assert_eq!(plain, *via_no_cache);
    assert_eq!(plain, *miss);
    assert_eq!(plain, *hit);
    assert_eq!(cache.stats().hits, 1);
}

// ===========================================================================
// Wire format
// ===========================================================================

#[test]
fn test_request_defaults_to_monthly() {
    let request: AmortizationRequest =
        serde_json::from_str(r#"{"principal": 200000, "interestRate": 3.5, "termYears": 30}"#).unwrap();
    let result = calculate_amortization(&request).unwrap();
    assert_eq!(result.summary.payment_frequency, PaymentFrequency::Monthly);
    assert_eq!(result.schedule.len(), 360);
}

#[test]
fn test_missing_and_invalid_fields_reported_together() {
    let request: AmortizationRequest =
        serde_json::from_str(r#"{"interestRate": 40, "termYears": 2.5}"#).unwrap();
    let err = calculate_amortization(&request).unwrap_err();
    let fields: Vec<&str> = err
        .validation_errors()
        .unwrap()
        .iter()
        .map(|e| e.field.as_str())
        .collect();
    assert_eq!(fields, vec!["principal", "interestRate", "termYears"]);
}
