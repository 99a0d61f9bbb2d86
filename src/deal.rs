use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::dates::{format_date, parse_date_range};
use crate::decimal::Money;
use crate::errors::ValidationError;
use crate::facility::Facility;
use crate::parties::{Borrower, Lender};
use crate::serialization::DealDetails;
use crate::types::{ContractNumber, CurrencyCode, DealStatus};

/// master financing contract between an agent, a lending pool and a borrower
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deal {
    contract_num: ContractNumber,
    agent: String,
    pool: Vec<Lender>,
    borrower: Borrower,
    project_amount: Money,
    currency: CurrencyCode,
    contract_sign_date: NaiveDate,
    contract_end_date: NaiveDate,
    status: DealStatus,
    facilities: Vec<Facility>,
}

impl Deal {
    /// create new deal
    ///
    /// checks, in order: contract number, agent, pool, project amount,
    /// currency, date range.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        contract_num: &str,
        agent: &str,
        pool: Vec<Lender>,
        borrower: Borrower,
        project_amount: Money,
        currency: &str,
        contract_sign_date: &str,
        contract_end_date: &str,
        status: DealStatus,
    ) -> Result<Self, ValidationError> {
        let contract_num = ContractNumber::parse(contract_num)?;
        validate_agent(agent)?;

        if pool.is_empty() {
            return Err(ValidationError::EmptyLenderPool { field: "pool" });
        }

        if !project_amount.is_positive() {
            return Err(ValidationError::NonPositiveAmount {
                field: "project amount",
                amount: project_amount,
            });
        }

        let currency = CurrencyCode::parse(currency)?;
        let (contract_sign_date, contract_end_date) = parse_date_range(
            "contract sign date",
            "contract end date",
            contract_sign_date,
            contract_end_date,
        )?;

        Ok(Self {
            contract_num,
            agent: agent.to_string(),
            pool,
            borrower,
            project_amount,
            currency,
            contract_sign_date,
            contract_end_date,
            status,
            facilities: Vec::new(),
        })
    }

    pub fn builder() -> DealBuilder {
        DealBuilder::new()
    }

    /// attach a facility, keeping the total within the project amount
    ///
    /// the facility is moved in; callers that keep their own copy must clone
    /// it first, and later changes to that copy are not seen by the deal.
    /// facilities in another currency than the deal are accepted.
    pub fn add_facility(&mut self, facility: Facility) -> Result<(), ValidationError> {
        // facilities never exceed the project amount, so this cannot go negative
        let available = self.project_amount - self.total_facilities_amount();
        if facility.amount() > available {
            warn!(
                contract = %self.contract_num,
                facility_amount = %facility.amount(),
                project_amount = %self.project_amount,
                "facility rejected"
            );
            return Err(ValidationError::ExceedsProjectAmount {
                project_amount: self.project_amount,
                available,
                requested: facility.amount(),
            });
        }

        debug!(
            contract = %self.contract_num,
            facility_id = %facility.id(),
            amount = %facility.amount(),
            "facility attached"
        );
        self.facilities.push(facility);
        Ok(())
    }

    /// change the lifecycle status
    ///
    /// a terminated deal cannot be reopened; setting the current status again
    /// is a no-op.
    pub fn set_status(&mut self, status: DealStatus) -> Result<(), ValidationError> {
        if self.status == DealStatus::Terminated && status == DealStatus::Closed {
            return Err(ValidationError::InvalidStatusTransition {
                from: self.status,
                to: status,
            });
        }

        if self.status != status {
            debug!(contract = %self.contract_num, from = %self.status, to = %status, "status changed");
        }
        self.status = status;
        Ok(())
    }

    /// shorthand for `set_status(DealStatus::Terminated)`
    pub fn terminate(&mut self) -> Result<(), ValidationError> {
        self.set_status(DealStatus::Terminated)
    }

    pub fn set_agent(&mut self, agent: &str) -> Result<(), ValidationError> {
        validate_agent(agent)?;
        self.agent = agent.to_string();
        Ok(())
    }

    pub fn total_facilities_amount(&self) -> Money {
        self.facilities.iter().map(Facility::amount).sum()
    }

    /// "closed" or "terminated"
    pub fn status_str(&self) -> &'static str {
        self.status.as_str()
    }

    pub fn is_completed(&self) -> bool {
        self.status == DealStatus::Terminated
    }

    /// snapshot of the deal's current state for display
    pub fn details(&self) -> DealDetails {
        DealDetails::from_deal(self)
    }

    pub fn contract_num(&self) -> &str {
        self.contract_num.as_str()
    }

    pub fn agent(&self) -> &str {
        &self.agent
    }

    pub fn pool(&self) -> &[Lender] {
        &self.pool
    }

    pub fn borrower(&self) -> &Borrower {
        &self.borrower
    }

    pub fn project_amount(&self) -> Money {
        self.project_amount
    }

    pub fn currency(&self) -> &str {
        self.currency.as_str()
    }

    pub fn contract_sign_date(&self) -> NaiveDate {
        self.contract_sign_date
    }

    pub fn contract_end_date(&self) -> NaiveDate {
        self.contract_end_date
    }

    pub fn contract_sign_date_string(&self) -> String {
        format_date(self.contract_sign_date)
    }

    pub fn contract_end_date_string(&self) -> String {
        format_date(self.contract_end_date)
    }

    pub fn status(&self) -> DealStatus {
        self.status
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn facilities_count(&self) -> usize {
        self.facilities.len()
    }
}

fn validate_agent(agent: &str) -> Result<(), ValidationError> {
    if agent.is_empty() {
        return Err(ValidationError::EmptyField { field: "agent name" });
    }
    Ok(())
}

/// builder for deals
#[derive(Debug, Default)]
pub struct DealBuilder {
    contract_num: Option<String>,
    agent: Option<String>,
    pool: Vec<Lender>,
    borrower: Option<Borrower>,
    project_amount: Option<Money>,
    currency: Option<String>,
    sign_date: Option<String>,
    end_date: Option<String>,
    status: DealStatus,
}

impl DealBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contract_num(mut self, contract_num: impl Into<String>) -> Self {
        self.contract_num = Some(contract_num.into());
        self
    }

    pub fn agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    pub fn lender(mut self, lender: Lender) -> Self {
        self.pool.push(lender);
        self
    }

    pub fn pool(mut self, pool: impl IntoIterator<Item = Lender>) -> Self {
        self.pool.extend(pool);
        self
    }

    pub fn borrower(mut self, borrower: Borrower) -> Self {
        self.borrower = Some(borrower);
        self
    }

    pub fn project_amount(mut self, amount: Money) -> Self {
        self.project_amount = Some(amount);
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn sign_date(mut self, date: impl Into<String>) -> Self {
        self.sign_date = Some(date.into());
        self
    }

    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    pub fn status(mut self, status: DealStatus) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> Result<Deal, ValidationError> {
        let contract_num = self
            .contract_num
            .ok_or(ValidationError::MissingField { field: "contract number" })?;
        let agent = self.agent.ok_or(ValidationError::MissingField { field: "agent name" })?;
        let borrower = self.borrower.ok_or(ValidationError::MissingField { field: "borrower" })?;
        let project_amount = self
            .project_amount
            .ok_or(ValidationError::MissingField { field: "project amount" })?;
        let currency = self.currency.ok_or(ValidationError::MissingField { field: "currency" })?;
        let sign_date = self
            .sign_date
            .ok_or(ValidationError::MissingField { field: "contract sign date" })?;
        let end_date = self
            .end_date
            .ok_or(ValidationError::MissingField { field: "contract end date" })?;

        Deal::new(
            &contract_num,
            &agent,
            self.pool,
            borrower,
            project_amount,
            &currency,
            &sign_date,
            &end_date,
            self.status,
        )
    }
}
