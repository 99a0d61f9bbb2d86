pub mod config;
pub mod dates;
pub mod deal;
pub mod decimal;
pub mod errors;
pub mod facility;
pub mod interest;
pub mod part;
pub mod parties;
pub mod portfolio;
pub mod serialization;
pub mod session;
pub mod types;

// re-export key types
pub use config::{DealSeed, FacilitySeed, PaymentSeed, SessionConfig};
pub use deal::{Deal, DealBuilder};
pub use decimal::{Money, Rate};
pub use errors::{AppError, FinancingError, Result, ValidationError};
pub use facility::{Facility, FacilityBuilder};
pub use interest::InterestCalculation;
pub use part::Part;
pub use parties::{Borrower, Lender, DEFAULT_BORROWER_NAME};
pub use portfolio::Portfolio;
pub use serialization::{DealDetails, FacilityView, PartView, PortfolioSummary, SessionReport};
pub use session::{AppState, Session};
pub use types::{ContractNumber, CurrencyCode, DealStatus, FacilityId};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
