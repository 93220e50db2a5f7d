pub mod amortization;
pub mod error;
pub mod time_value;
pub mod types;

pub use error::{AmCalcError, ValidationError};
pub use types::*;

/// Standard result type for all amcalc operations
pub type AmCalcResult<T> = Result<T, AmCalcError>;
