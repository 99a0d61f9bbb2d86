use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dates::{days_between, format_date, years_from_days};
use crate::decimal::{Money, Rate};
use crate::errors::{FinancingError, Result};

/// interest calculation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestCalculation {
    pub principal_base: Money,
    pub rate: Rate,
    pub days: i64,
    pub years: Decimal,
    /// `rate ^ years`
    pub factor: Decimal,
    pub interest_amount: Money,
}

/// interest on `principal_base` between `start` and `on`
///
/// elapsed time is measured in days over a fixed 365-day year, and the
/// result is `principal_base * rate ^ years`. The rate itself is raised to
/// the power (not `1 + rate`), so a zero rate yields the full base at zero
/// elapsed time and nothing afterwards.
pub fn calculate(
    principal_base: Money,
    rate: Rate,
    start: NaiveDate,
    on: NaiveDate,
) -> Result<InterestCalculation> {
    let days = days_between(start, on);
    if days < 0 {
        return Err(FinancingError::Computation {
            message: format!(
                "part date {} cannot be before facility start date {}",
                format_date(on),
                format_date(start)
            ),
        });
    }

    let years = years_from_days(days);
    let factor = rate.powf(years).ok_or_else(|| FinancingError::Computation {
        message: format!("cannot raise rate {} to the power {}", rate, years),
    })?;

    let interest_amount = principal_base
        .checked_mul(factor)
        .ok_or_else(|| FinancingError::Computation {
            message: format!("interest on {} at factor {} overflows", principal_base, factor),
        })?;

    Ok(InterestCalculation {
        principal_base,
        rate,
        days,
        years,
        factor,
        interest_amount,
    })
}
