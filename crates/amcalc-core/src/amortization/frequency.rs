//! Payment frequencies and their periods-per-year table.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AmCalcError;

/// How often a level payment falls due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    Biweekly,
    Weekly,
    Semimonthly,
    Quarterly,
    Semiannually,
    Annually,
}

impl PaymentFrequency {
    pub const ALL: [PaymentFrequency; 7] = [
        PaymentFrequency::Monthly,
        PaymentFrequency::Biweekly,
        PaymentFrequency::Weekly,
        PaymentFrequency::Semimonthly,
        PaymentFrequency::Quarterly,
        PaymentFrequency::Semiannually,
        PaymentFrequency::Annually,
    ];

    pub fn periods_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Biweekly => 26,
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::Semimonthly => 24,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Semiannually => 2,
            PaymentFrequency::Annually => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Biweekly => "biweekly",
            PaymentFrequency::Weekly => "weekly",
            PaymentFrequency::Semimonthly => "semimonthly",
            PaymentFrequency::Quarterly => "quarterly",
            PaymentFrequency::Semiannually => "semiannually",
            PaymentFrequency::Annually => "annually",
        }
    }

    /// Due date of the payment `periods` periods after `start`.
    ///
    /// Calendar-month frequencies clamp to the end of shorter months.
    /// Semimonthly payments fall on the start day and fifteen days later.
    pub fn advance(self, start: NaiveDate, periods: u32) -> Option<NaiveDate> {
        match self {
            PaymentFrequency::Weekly => start.checked_add_days(Days::new(7 * u64::from(periods))),
            PaymentFrequency::Biweekly => {
                start.checked_add_days(Days::new(14 * u64::from(periods)))
            }
            PaymentFrequency::Semimonthly => {
                let month_start = start.checked_add_months(Months::new(periods / 2))?;
                if periods % 2 == 0 {
                    Some(month_start)
                } else {
                    month_start.checked_add_days(Days::new(15))
                }
            }
            PaymentFrequency::Monthly => start.checked_add_months(Months::new(periods)),
            PaymentFrequency::Quarterly => start.checked_add_months(Months::new(3 * periods)),
            PaymentFrequency::Semiannually => start.checked_add_months(Months::new(6 * periods)),
            PaymentFrequency::Annually => start.checked_add_months(Months::new(12 * periods)),
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = AmCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        PaymentFrequency::ALL
            .into_iter()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| AmCalcError::InvalidFrequency(s.to_string()))
    }
}
