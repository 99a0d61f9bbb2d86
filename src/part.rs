use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::{format_date, parse_date};
use crate::decimal::Money;
use crate::errors::ValidationError;

/// a single repayment recorded against a facility
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Part {
    amount: Money,
    date: NaiveDate,
}

impl Part {
    /// create a repayment; amount must be positive and date a real `YYYY-MM-DD` date
    pub fn new(amount: Money, date: &str) -> Result<Self, ValidationError> {
        if !amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount {
                field: "part amount",
                amount,
            });
        }

        let date = parse_date("part date", date)?;

        Ok(Self { amount, date })
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn date_string(&self) -> String {
        format_date(self.date)
    }
}
