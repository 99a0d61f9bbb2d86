use thiserror::Error;

use crate::decimal::{Money, Rate};
use crate::types::DealStatus;

/// invalid input rejected at the point of construction or mutation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    EmptyField {
        field: &'static str,
    },

    #[error("{field} is required")]
    MissingField {
        field: &'static str,
    },

    #[error("{field} must be positive: {amount}")]
    NonPositiveAmount {
        field: &'static str,
        amount: Money,
    },

    #[error("interest rate cannot be negative: {rate}")]
    NegativeInterestRate {
        rate: Rate,
    },

    #[error("invalid date for {field} '{value}': {message}")]
    InvalidDate {
        field: &'static str,
        value: String,
        message: String,
    },

    #[error("{field} {end} must be after {start}")]
    InvertedDateRange {
        field: &'static str,
        start: String,
        end: String,
    },

    #[error("invalid contract number '{value}': {message}")]
    InvalidContractNumber {
        value: String,
        message: String,
    },

    #[error("invalid currency '{value}': {message}")]
    InvalidCurrency {
        value: String,
        message: String,
    },

    #[error("{field} must contain at least one lender")]
    EmptyLenderPool {
        field: &'static str,
    },

    #[error("part amount {requested} exceeds remaining facility amount {remaining}")]
    ExceedsRemainingAmount {
        remaining: Money,
        requested: Money,
    },

    #[error("facility amount {requested} exceeds the {available} left of project amount {project_amount}")]
    ExceedsProjectAmount {
        project_amount: Money,
        available: Money,
        requested: Money,
    },

    #[error("facility cannot be null")]
    MissingFacility,

    #[error("invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: DealStatus,
        to: DealStatus,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FinancingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("error calculating interest: {message}")]
    Computation {
        message: String,
    },
}

impl FinancingError {
    pub fn is_computation(&self) -> bool {
        matches!(self, FinancingError::Computation { .. })
    }
}

pub type Result<T> = std::result::Result<T, FinancingError>;

/// failures that end a console session or the binary
#[derive(Error, Debug)]
pub enum AppError {
    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(serde_json::Error),

    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),

    #[error("seed {kind} '{name}' is not a known {kind}")]
    UnknownSeedParty {
        kind: &'static str,
        name: String,
    },

    #[error("invalid seed data: {0}")]
    Seed(#[from] ValidationError),

    #[error(transparent)]
    Financing(#[from] FinancingError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
