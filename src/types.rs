use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ValidationError;

/// unique identifier for a facility
pub type FacilityId = Uuid;

/// letters a contract number may start with
const CONTRACT_PREFIXES: [char; 3] = ['S', 'Z', 'B'];

/// deal lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    /// client management still in progress
    #[default]
    Closed,
    /// amount drawn and fully repaid
    Terminated,
}

impl DealStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::Closed => "closed",
            DealStatus::Terminated => "terminated",
        }
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// deal contract number: one of S/Z/B (any case) followed by four digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractNumber(String);

impl ContractNumber {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let invalid = |message: &str| ValidationError::InvalidContractNumber {
            value: value.to_string(),
            message: message.to_string(),
        };

        if value.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "contract number",
            });
        }

        let mut chars = value.chars();
        if value.chars().count() != 5 {
            return Err(invalid("must be 5 characters (1 letter + 4 digits)"));
        }

        let first = chars.next().map(|c| c.to_ascii_uppercase());
        if !first.is_some_and(|c| CONTRACT_PREFIXES.contains(&c)) {
            return Err(invalid("must start with S, Z, or B"));
        }

        if !chars.all(|c| c.is_ascii_digit()) {
            return Err(invalid("must have 4 digits after the letter"));
        }

        Ok(ContractNumber(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContractNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContractNumber::parse(s)
    }
}

impl TryFrom<String> for ContractNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ContractNumber::parse(&value)
    }
}

impl From<ContractNumber> for String {
    fn from(value: ContractNumber) -> Self {
        value.0
    }
}

/// deal currency: exactly three uppercase ascii letters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let invalid = |message: &str| ValidationError::InvalidCurrency {
            value: value.to_string(),
            message: message.to_string(),
        };

        if value.is_empty() {
            return Err(ValidationError::EmptyField { field: "currency" });
        }

        if value.chars().count() != 3 {
            return Err(invalid("must be 3 characters (e.g., EUR, USD)"));
        }

        if !value.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(invalid("must be uppercase letters"));
        }

        Ok(CurrencyCode(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurrencyCode::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CurrencyCode::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_number_accepts_valid_prefixes() {
        for value in ["S1234", "Z0000", "B9999", "s1234", "z4321", "b0001"] {
            assert!(ContractNumber::parse(value).is_ok(), "{} should be accepted", value);
        }
    }

    #[test]
    fn test_contract_number_keeps_original_case() {
        let number = ContractNumber::parse("s1234").unwrap();
        assert_eq!(number.as_str(), "s1234");
    }

    #[test]
    fn test_contract_number_rejections() {
        assert!(matches!(
            ContractNumber::parse(""),
            Err(ValidationError::EmptyField { .. })
        ));

        for value in ["X1234", "S123", "S12345", "S12A4", "INVALID", "1S234", "SS234", "S 234"] {
            assert!(
                matches!(
                    ContractNumber::parse(value),
                    Err(ValidationError::InvalidContractNumber { .. })
                ),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_contract_number_rejects_non_ascii_digits() {
        // arabic-indic digits are numeric but not ascii
        assert!(ContractNumber::parse("S١٢٣٤").is_err());
    }

    #[test]
    fn test_currency_code() {
        assert!(CurrencyCode::parse("EUR").is_ok());
        assert!(CurrencyCode::parse("USD").is_ok());

        assert!(matches!(
            CurrencyCode::parse(""),
            Err(ValidationError::EmptyField { .. })
        ));
        for value in ["eur", "Eur", "EU", "EURO", "E1R", "ÉUR"] {
            assert!(
                matches!(
                    CurrencyCode::parse(value),
                    Err(ValidationError::InvalidCurrency { .. })
                ),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_deal_status_strings() {
        assert_eq!(DealStatus::default(), DealStatus::Closed);
        assert_eq!(DealStatus::Closed.as_str(), "closed");
        assert_eq!(DealStatus::Terminated.to_string(), "terminated");
    }

    #[test]
    fn test_deal_status_serde() {
        let json = serde_json::to_string(&DealStatus::Terminated).unwrap();
        assert_eq!(json, "\"terminated\"");
    }
}
