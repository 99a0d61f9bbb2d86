use serde::Serialize;

use crate::errors::ValidationError;

/// name given to a borrower built with `Borrower::default()`
pub const DEFAULT_BORROWER_NAME: &str = "Air France";

/// lending institution; the name is fixed once created
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Lender {
    name: String,
}

impl Lender {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyField { field: "lender name" });
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// borrowing party
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Borrower {
    name: String,
}

impl Borrower {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_borrower_name(&name)?;
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// replace the name; an empty name leaves the borrower unchanged
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        validate_borrower_name(&name)?;
        self.name = name;
        Ok(())
    }
}

impl Default for Borrower {
    fn default() -> Self {
        Self {
            name: DEFAULT_BORROWER_NAME.to_string(),
        }
    }
}

fn validate_borrower_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyField { field: "borrower name" });
    }
    Ok(())
}
