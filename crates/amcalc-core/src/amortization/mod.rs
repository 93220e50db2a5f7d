//! Loan amortization: validation, payment, schedule and memoization.

pub mod cache;
pub mod engine;
pub mod frequency;
pub mod validation;

pub use cache::{CacheKey, CacheStats, NoCache, ScheduleCache};
#[cfg(feature = "cache")]
pub use cache::{CacheConfig, LruScheduleCache};
pub use engine::{
    amortization_report, amortize, calculate_amortization, calculate_amortization_cached,
    generate_schedule, monthly_payment, period_rate, periodic_payment, to_cents, AmortizationResult,
    LoanSummary, PaymentRow,
};
pub use frequency::PaymentFrequency;
pub use validation::{validate, AmortizationInputs, AmortizationRequest};
