use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::decimal::{Money, Rate};
use crate::errors::AppError;

/// seed data for a console session
///
/// every field is optional in json; missing fields fall back to an empty
/// value, not to the built-in seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub borrowers: Vec<String>,
    #[serde(default)]
    pub lenders: Vec<String>,
    /// lenders placed in the staging pool used for new deals
    #[serde(default)]
    pub pool: Vec<String>,
    #[serde(default)]
    pub deal: Option<DealSeed>,
    #[serde(default)]
    pub facility: Option<FacilitySeed>,
}

/// deal created at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealSeed {
    pub contract_num: String,
    pub agent: String,
    pub pool: Vec<String>,
    pub borrower: String,
    pub project_amount: Money,
    pub currency: String,
    pub sign_date: String,
    pub end_date: String,
}

/// facility created at startup, attached to the seed deal when there is one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilitySeed {
    pub start_date: String,
    pub end_date: String,
    pub amount: Money,
    pub currency: String,
    pub lenders: Vec<String>,
    pub rate: Rate,
    #[serde(default)]
    pub payments: Vec<PaymentSeed>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSeed {
    pub amount: Money,
    pub date: String,
}

impl SessionConfig {
    /// no parties, no deal, no facility
    pub fn empty() -> Self {
        Self {
            borrowers: Vec::new(),
            lenders: Vec::new(),
            pool: Vec::new(),
            deal: None,
            facility: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, AppError> {
        serde_json::from_str(json).map_err(AppError::ConfigParse)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for SessionConfig {
    /// two airlines/telecoms borrowing from BNP and SG under deal S1234
    fn default() -> Self {
        let banks = vec!["BNP".to_string(), "SG".to_string()];

        Self {
            borrowers: vec!["Air France".to_string(), "Orange".to_string()],
            lenders: banks.clone(),
            pool: banks.clone(),
            deal: Some(DealSeed {
                contract_num: "S1234".to_string(),
                agent: "BNP".to_string(),
                pool: banks.clone(),
                borrower: "Air France".to_string(),
                project_amount: Money::from_major(10_000_000),
                currency: "USD".to_string(),
                sign_date: "2025-06-26".to_string(),
                end_date: "2035-06-26".to_string(),
            }),
            facility: Some(FacilitySeed {
                start_date: "2025-06-26".to_string(),
                end_date: "2035-06-26".to_string(),
                amount: Money::from_major(5_000_000),
                currency: "USD".to_string(),
                lenders: banks,
                rate: Rate::from_decimal(dec!(0.05)),
                payments: vec![
                    PaymentSeed {
                        amount: Money::from_major(1_000_000),
                        date: "2027-06-25".to_string(),
                    },
                    PaymentSeed {
                        amount: Money::from_major(2_000_000),
                        date: "2030-06-25".to_string(),
                    },
                    PaymentSeed {
                        amount: Money::from_major(1_000_000),
                        date: "2032-06-25".to_string(),
                    },
                ],
            }),
        }
    }
}
