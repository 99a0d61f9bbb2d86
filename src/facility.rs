use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::dates::{format_date, parse_date_range};
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ValidationError};
use crate::interest::{self, InterestCalculation};
use crate::parties::Lender;
use crate::part::Part;
use crate::types::FacilityId;

/// credit line drawn under a deal, with its repayment record
///
/// clones share the same `id`: a clone is a logical copy of the same facility,
/// but its parts evolve independently from the original afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facility {
    id: FacilityId,
    start_date: NaiveDate,
    end_date: NaiveDate,
    amount: Money,
    currency: String,
    lenders: Vec<Lender>,
    annual_interest_rate: Rate,
    parts: Vec<Part>,
}

impl Facility {
    /// create new facility
    ///
    /// checks, in order: amount, rate, date range, currency, lenders.
    pub fn new(
        start_date: &str,
        end_date: &str,
        amount: Money,
        currency: &str,
        lenders: Vec<Lender>,
        annual_interest_rate: Rate,
    ) -> std::result::Result<Self, ValidationError> {
        if !amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount {
                field: "facility amount",
                amount,
            });
        }

        if annual_interest_rate.is_negative() {
            return Err(ValidationError::NegativeInterestRate {
                rate: annual_interest_rate,
            });
        }

        let (start_date, end_date) = parse_date_range("start date", "end date", start_date, end_date)?;

        if currency.is_empty() {
            return Err(ValidationError::EmptyField { field: "currency" });
        }

        if lenders.is_empty() {
            return Err(ValidationError::EmptyLenderPool { field: "facility lenders" });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            start_date,
            end_date,
            amount,
            currency: currency.to_string(),
            lenders,
            annual_interest_rate,
            parts: Vec::new(),
        })
    }

    pub fn builder() -> FacilityBuilder {
        FacilityBuilder::new()
    }

    /// record a repayment; rejected when it exceeds the remaining amount
    pub fn add_part(&mut self, part: Part) -> std::result::Result<(), ValidationError> {
        let remaining = self.remaining_amount();
        if part.amount() > remaining {
            warn!(
                facility_id = %self.id,
                requested = %part.amount(),
                remaining = %remaining,
                "part rejected"
            );
            return Err(ValidationError::ExceedsRemainingAmount {
                remaining,
                requested: part.amount(),
            });
        }

        debug!(
            facility_id = %self.id,
            amount = %part.amount(),
            date = %part.date_string(),
            "part recorded"
        );
        self.parts.push(part);
        Ok(())
    }

    /// build a part from amount and date, then record it
    pub fn pay_part(&mut self, amount: Money, date: &str) -> std::result::Result<(), ValidationError> {
        let part = Part::new(amount, date)?;
        self.add_part(part)
    }

    /// principal minus every recorded repayment
    pub fn remaining_amount(&self) -> Money {
        // each accepted part is at most the balance left, so this stays in [0, amount]
        self.parts
            .iter()
            .fold(self.amount, |remaining, part| remaining - part.amount())
    }

    /// interest attributed to `part`: `remaining * rate ^ years since start`
    ///
    /// parts dated before the facility start are accepted by `add_part` and
    /// only fail here.
    pub fn calculate_interest(&self, part: &Part) -> Result<Money> {
        Ok(self.interest_breakdown(part)?.interest_amount)
    }

    /// full interest computation record for `part`
    pub fn interest_breakdown(&self, part: &Part) -> Result<InterestCalculation> {
        interest::calculate(
            self.remaining_amount(),
            self.annual_interest_rate,
            self.start_date,
            part.date(),
        )
    }

    pub fn id(&self) -> FacilityId {
        self.id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn start_date_string(&self) -> String {
        format_date(self.start_date)
    }

    pub fn end_date_string(&self) -> String {
        format_date(self.end_date)
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn lenders(&self) -> &[Lender] {
        &self.lenders
    }

    pub fn annual_interest_rate(&self) -> Rate {
        self.annual_interest_rate
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn parts_count(&self) -> usize {
        self.parts.len()
    }
}

/// builder for facilities
#[derive(Debug, Default)]
pub struct FacilityBuilder {
    start_date: Option<String>,
    end_date: Option<String>,
    amount: Option<Money>,
    currency: Option<String>,
    lenders: Vec<Lender>,
    rate: Option<Rate>,
}

impl FacilityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn lender(mut self, lender: Lender) -> Self {
        self.lenders.push(lender);
        self
    }

    pub fn lenders(mut self, lenders: impl IntoIterator<Item = Lender>) -> Self {
        self.lenders.extend(lenders);
        self
    }

    pub fn rate(mut self, rate: Rate) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn build(self) -> std::result::Result<Facility, ValidationError> {
        let amount = self.amount.ok_or(ValidationError::MissingField { field: "facility amount" })?;
        let rate = self.rate.ok_or(ValidationError::MissingField { field: "interest rate" })?;
        let start_date = self.start_date.ok_or(ValidationError::MissingField { field: "start date" })?;
        let end_date = self.end_date.ok_or(ValidationError::MissingField { field: "end date" })?;
        let currency = self.currency.ok_or(ValidationError::MissingField { field: "currency" })?;

        Facility::new(&start_date, &end_date, amount, &currency, self.lenders, rate)
    }
}
