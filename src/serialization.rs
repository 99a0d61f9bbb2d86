/// serializable snapshots of deals, facilities and portfolios
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;

use crate::decimal::{Money, Rate};
use crate::deal::Deal;
use crate::errors::Result;
use crate::facility::Facility;
use crate::part::Part;
use crate::portfolio::Portfolio;
use crate::types::{DealStatus, FacilityId};

/// full snapshot of a deal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealDetails {
    pub contract_num: String,
    pub agent: String,
    pub pool: Vec<String>,
    pub borrower: String,
    pub project_amount: Money,
    pub currency: String,
    pub contract_sign_date: String,
    pub contract_end_date: String,
    pub status: DealStatus,
    pub facilities_count: usize,
    pub total_facilities_amount: Money,
}

impl DealDetails {
    pub fn from_deal(deal: &Deal) -> Self {
        DealDetails {
            contract_num: deal.contract_num().to_string(),
            agent: deal.agent().to_string(),
            pool: deal.pool().iter().map(|l| l.name().to_string()).collect(),
            borrower: deal.borrower().name().to_string(),
            project_amount: deal.project_amount(),
            currency: deal.currency().to_string(),
            contract_sign_date: deal.contract_sign_date_string(),
            contract_end_date: deal.contract_end_date_string(),
            status: deal.status(),
            facilities_count: deal.facilities_count(),
            total_facilities_amount: deal.total_facilities_amount(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for DealDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== DEAL DETAILS ===")?;
        writeln!(f, "Contract Number: {}", self.contract_num)?;
        writeln!(f, "Agent: {}", self.agent)?;
        writeln!(f, "Pool: {}", self.pool.join(" "))?;
        writeln!(f, "Borrower: {}", self.borrower)?;
        writeln!(f, "Project Amount: {} {}", self.project_amount, self.currency)?;
        writeln!(f, "Contract Sign Date: {}", self.contract_sign_date)?;
        writeln!(f, "Contract End Date: {}", self.contract_end_date)?;
        writeln!(f, "Status: {}", self.status)?;
        writeln!(f, "Facilities Count: {}", self.facilities_count)?;
        writeln!(f, "Total Facilities Amount: {} {}", self.total_facilities_amount, self.currency)?;
        write!(f, "===================")
    }
}

/// serializable view of a facility's state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityView {
    pub id: FacilityId,
    pub amount: Money,
    pub currency: String,
    pub remaining_amount: Money,
    pub annual_interest_rate: Rate,
    pub start_date: String,
    pub end_date: String,
    pub lenders: Vec<String>,
    pub parts: Vec<PartView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartView {
    pub amount: Money,
    pub date: String,
}

impl From<&Part> for PartView {
    fn from(part: &Part) -> Self {
        PartView {
            amount: part.amount(),
            date: part.date_string(),
        }
    }
}

impl FacilityView {
    pub fn from_facility(facility: &Facility) -> Self {
        FacilityView {
            id: facility.id(),
            amount: facility.amount(),
            currency: facility.currency().to_string(),
            remaining_amount: facility.remaining_amount(),
            annual_interest_rate: facility.annual_interest_rate(),
            start_date: facility.start_date_string(),
            end_date: facility.end_date_string(),
            lenders: facility.lenders().iter().map(|l| l.name().to_string()).collect(),
            parts: facility.parts().iter().map(PartView::from).collect(),
        }
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// portfolio aggregates at one point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub facility: FacilityView,
    pub number_of_parts: usize,
    pub total_amount: Money,
    pub total_interest: Money,
    pub total_remboursement: Money,
    pub remaining_amount: Money,
}

impl PortfolioSummary {
    pub fn from_portfolio(portfolio: &Portfolio<'_>) -> Result<Self> {
        let total_interest = portfolio.total_interest()?;
        let total_remboursement = portfolio.total_remboursement()?;

        Ok(PortfolioSummary {
            facility: FacilityView::from_facility(&portfolio.facility().borrow()),
            number_of_parts: portfolio.number_of_parts(),
            total_amount: portfolio.total_amount(),
            total_interest,
            total_remboursement,
            remaining_amount: portfolio.remaining_amount(),
        })
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for PortfolioSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The total interest accumulated is: {}", self.total_interest.round_dp(2))?;
        writeln!(f, "The total amount is: {}", self.total_amount)?;
        writeln!(f, "Amount should be repaid: {}", self.total_remboursement.round_dp(2))?;
        write!(f, "Remaining amount: {}", self.remaining_amount)
    }
}

/// every deal plus one portfolio per facility
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub deals: Vec<DealDetails>,
    pub portfolios: Vec<PortfolioSummary>,
}

impl SessionReport {
    pub fn build(deals: &[Deal], facilities: &[RefCell<Facility>]) -> Result<Self> {
        let portfolios = facilities
            .iter()
            .map(|facility| Portfolio::from(facility).summary())
            .collect::<Result<Vec<_>>>()?;

        Ok(SessionReport {
            deals: deals.iter().map(Deal::details).collect(),
            portfolios,
        })
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.deals.is_empty() {
            writeln!(f, "No deals.")?;
        }
        for details in &self.deals {
            writeln!(f, "{}", details)?;
        }

        if self.portfolios.is_empty() {
            writeln!(f, "No facilities.")?;
        }
        for (i, summary) in self.portfolios.iter().enumerate() {
            writeln!(
                f,
                "=== PORTFOLIO {} ({} {}) ===",
                i + 1,
                summary.facility.amount,
                summary.facility.currency
            )?;
            writeln!(f, "Parts: {}", summary.number_of_parts)?;
            writeln!(f, "{}", summary)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parties::{Borrower, Lender};
    use rust_decimal_macros::dec;
    use std::cell::RefCell;

    fn pool() -> Vec<Lender> {
        vec![Lender::new("BNP").unwrap(), Lender::new("SG").unwrap()]
    }

    fn deal() -> Deal {
        let mut deal = Deal::new(
            "S1234",
            "BNP Paribas",
            pool(),
            Borrower::new("Orange").unwrap(),
            Money::from_major(10_000_000),
            "EUR",
            "2024-01-01",
            "2025-01-01",
            DealStatus::Closed,
        )
        .unwrap();
        deal.add_facility(facility()).unwrap();
        deal
    }

    fn facility() -> Facility {
        Facility::new(
            "2024-01-01",
            "2025-01-01",
            Money::from_major(5_000_000),
            "EUR",
            pool(),
            Rate::from_decimal(dec!(0.03)),
        )
        .unwrap()
    }

    #[test]
    fn test_deal_details_snapshot() {
        let details = deal().details();

        assert_eq!(details.contract_num, "S1234");
        assert_eq!(details.pool, vec!["BNP".to_string(), "SG".to_string()]);
        assert_eq!(details.borrower, "Orange");
        assert_eq!(details.facilities_count, 1);
        assert_eq!(details.total_facilities_amount, Money::from_major(5_000_000));
        assert_eq!(details.status, DealStatus::Closed);
    }

    #[test]
    fn test_deal_details_text() {
        let text = deal().details().to_string();

        assert!(text.starts_with("=== DEAL DETAILS ==="));
        assert!(text.contains("Contract Number: S1234"));
        assert!(text.contains("Pool: BNP SG"));
        assert!(text.contains("Project Amount: 10000000 EUR"));
        assert!(text.contains("Status: closed"));
        assert!(text.contains("Facilities Count: 1"));
        assert!(text.contains("Total Facilities Amount: 5000000 EUR"));
    }

    #[test]
    fn test_deal_details_json() {
        let json = deal().details().to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["contract_num"], "S1234");
        assert_eq!(value["status"], "closed");
        assert_eq!(value["facilities_count"], 1);
    }

    #[test]
    fn test_facility_view() {
        let mut facility = facility();
        facility.pay_part(Money::from_major(1_000_000), "2024-03-01").unwrap();

        let view = FacilityView::from_facility(&facility);
        assert_eq!(view.remaining_amount, Money::from_major(4_000_000));
        assert_eq!(view.parts.len(), 1);
        assert_eq!(view.parts[0].date, "2024-03-01");
        assert_eq!(view.lenders.len(), 2);
    }

    #[test]
    fn test_portfolio_summary() {
        let cell = RefCell::new(facility());
        cell.borrow_mut()
            .pay_part(Money::from_major(1_000_000), "2024-01-01")
            .unwrap();

        let summary = Portfolio::from(&cell).summary().unwrap();
        assert_eq!(summary.number_of_parts, 1);
        assert_eq!(summary.total_interest, Money::from_major(4_000_000));
        assert_eq!(summary.total_remboursement, Money::from_major(9_000_000));
        assert_eq!(summary.remaining_amount, Money::from_major(4_000_000));
        assert!(summary.to_string().contains("Amount should be repaid: 9000000"));
    }

    #[test]
    fn test_session_report() {
        let deals = vec![deal()];
        let facilities = vec![RefCell::new(facility())];
        facilities[0]
            .borrow_mut()
            .pay_part(Money::from_major(1_000_000), "2024-01-01")
            .unwrap();

        let report = SessionReport::build(&deals, &facilities).unwrap();
        assert_eq!(report.deals.len(), 1);
        assert_eq!(report.portfolios.len(), 1);

        let text = report.to_string();
        assert!(text.contains("=== DEAL DETAILS ==="));
        assert!(text.contains("=== PORTFOLIO 1 (5000000 EUR) ==="));

        let value: serde_json::Value =
            serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["portfolios"][0]["number_of_parts"], 1);
    }

    #[test]
    fn test_empty_session_report() {
        let report = SessionReport::build(&[], &[]).unwrap();
        let text = report.to_string();
        assert!(text.contains("No deals."));
        assert!(text.contains("No facilities."));
    }
}
