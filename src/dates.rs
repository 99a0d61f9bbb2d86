//! ISO calendar date parsing and the elapsed-year measure used for interest.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// fixed year length used for elapsed time; leap days are not special-cased
pub const DAYS_PER_YEAR: i64 = 365;

/// parse a `YYYY-MM-DD` date
///
/// the shape is checked structurally first (length 10, separators at
/// positions 4 and 7, digits everywhere else) and then the value must be a
/// real calendar date.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = |message: &str| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
        message: message.to_string(),
    };

    if value.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }

    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid("date must be in YYYY-MM-DD format"));
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| invalid(&e.to_string()))
}

/// parse a start/end pair and require `end` strictly after `start`
pub fn parse_date_range(
    start_field: &'static str,
    end_field: &'static str,
    start: &str,
    end: &str,
) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    let start_date = parse_date(start_field, start)?;
    let end_date = parse_date(end_field, end)?;

    if end_date <= start_date {
        return Err(ValidationError::InvertedDateRange {
            field: end_field,
            start: format_date(start_date),
            end: format_date(end_date),
        });
    }

    Ok((start_date, end_date))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// signed number of days from `start` to `end`
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// fractional years for a day count over a 365-day year
pub fn years_from_days(days: i64) -> Decimal {
    Decimal::from(days) / Decimal::from(DAYS_PER_YEAR)
}
