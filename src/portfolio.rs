use std::cell::RefCell;

use crate::decimal::Money;
use crate::errors::{FinancingError, Result, ValidationError};
use crate::facility::Facility;
use crate::serialization::PortfolioSummary;

/// read-only aggregation over one facility
///
/// the portfolio borrows the facility, so the facility must outlive it. The
/// `RefCell` lets the owner keep recording payments while the portfolio is
/// alive; every query reads the facility's current parts.
#[derive(Debug, Clone, Copy)]
pub struct Portfolio<'a> {
    facility: &'a RefCell<Facility>,
}

impl<'a> Portfolio<'a> {
    /// fails when no facility is given
    pub fn new(facility: Option<&'a RefCell<Facility>>) -> std::result::Result<Self, ValidationError> {
        let facility = facility.ok_or(ValidationError::MissingFacility)?;
        Ok(Self { facility })
    }

    /// facility principal
    pub fn total_amount(&self) -> Money {
        self.facility.borrow().amount()
    }

    /// interest summed over every part currently on the facility
    pub fn total_interest(&self) -> Result<Money> {
        let facility = self.facility.borrow();
        let total = facility.parts().iter().try_fold(Money::ZERO, |total, part| {
            let interest = facility.calculate_interest(part)?;
            total.checked_add(interest).ok_or_else(|| overflow("total interest"))
        });
        total
    }

    /// principal plus total interest
    pub fn total_remboursement(&self) -> Result<Money> {
        self.total_amount()
            .checked_add(self.total_interest()?)
            .ok_or_else(|| overflow("total remboursement"))
    }

    pub fn number_of_parts(&self) -> usize {
        self.facility.borrow().parts_count()
    }

    pub fn remaining_amount(&self) -> Money {
        self.facility.borrow().remaining_amount()
    }

    pub fn summary(&self) -> Result<PortfolioSummary> {
        PortfolioSummary::from_portfolio(self)
    }

    pub(crate) fn facility(&self) -> &'a RefCell<Facility> {
        self.facility
    }
}

fn overflow(what: &str) -> FinancingError {
    FinancingError::Computation {
        message: format!("{} overflows", what),
    }
}

impl<'a> From<&'a RefCell<Facility>> for Portfolio<'a> {
    fn from(facility: &'a RefCell<Facility>) -> Self {
        Self { facility }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::parties::Lender;
    use rust_decimal_macros::dec;

    fn facility(amount: i64) -> RefCell<Facility> {
        RefCell::new(
            Facility::new(
                "2025-06-26",
                "2035-06-26",
                Money::from_major(amount),
                "USD",
                vec![Lender::new("BNP").unwrap(), Lender::new("SG").unwrap()],
                Rate::from_decimal(dec!(0.05)),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_missing_facility_rejected() {
        let err = Portfolio::new(None).unwrap_err();
        assert_eq!(err, ValidationError::MissingFacility);
    }

    #[test]
    fn test_empty_facility() {
        let cell = facility(30_000_000);
        let portfolio = Portfolio::new(Some(&cell)).unwrap();

        assert_eq!(portfolio.total_amount(), Money::from_major(30_000_000));
        assert_eq!(portfolio.total_interest().unwrap(), Money::ZERO);
        assert_eq!(portfolio.total_remboursement().unwrap(), Money::from_major(30_000_000));
        assert_eq!(portfolio.number_of_parts(), 0);
        assert_eq!(portfolio.remaining_amount(), Money::from_major(30_000_000));
    }

    #[test]
    fn test_reflects_live_state() {
        let cell = facility(30_000_000);
        let portfolio = Portfolio::from(&cell);

        cell.borrow_mut()
            .pay_part(Money::from_major(5_000_000), "2026-06-26")
            .unwrap();
        assert_eq!(portfolio.number_of_parts(), 1);
        assert_eq!(portfolio.remaining_amount(), Money::from_major(25_000_000));

        cell.borrow_mut()
            .pay_part(Money::from_major(10_000_000), "2028-06-25")
            .unwrap();
        assert_eq!(portfolio.number_of_parts(), 2);
        assert_eq!(portfolio.remaining_amount(), Money::from_major(15_000_000));
    }

    #[test]
    fn test_total_interest_sums_each_part() {
        let cell = facility(30_000_000);
        {
            let mut f = cell.borrow_mut();
            f.pay_part(Money::from_major(5_000_000), "2025-06-26").unwrap();
            f.pay_part(Money::from_major(5_000_000), "2025-06-26").unwrap();
        }
        let portfolio = Portfolio::from(&cell);

        // both parts sit on the start date: each contributes the full remaining amount
        assert_eq!(portfolio.total_interest().unwrap(), Money::from_major(40_000_000));
        assert_eq!(
            portfolio.total_remboursement().unwrap(),
            portfolio.total_amount() + portfolio.total_interest().unwrap()
        );
    }

    #[test]
    fn test_part_before_start_surfaces_computation_error() {
        let cell = facility(1_000_000);
        cell.borrow_mut()
            .pay_part(Money::from_major(1_000), "2020-01-01")
            .unwrap();

        let portfolio = Portfolio::from(&cell);
        assert!(portfolio.total_interest().unwrap_err().is_computation());
        assert!(portfolio.total_remboursement().is_err());
        assert_eq!(portfolio.number_of_parts(), 1);
    }

    #[test]
    fn test_sum_of_interests_overflow_is_a_computation_error() {
        // each part's interest fits on its own, their sum does not
        let huge = Money::from_str_exact("50000000000000000000000000000").unwrap();
        let cell = RefCell::new(
            Facility::new("2025-06-26", "2035-06-26", huge, "USD", vec![Lender::new("BNP").unwrap()], Rate::ZERO)
                .unwrap(),
        );
        cell.borrow_mut().pay_part(Money::from_major(1), "2025-06-26").unwrap();
        cell.borrow_mut().pay_part(Money::from_major(1), "2025-06-26").unwrap();

        let portfolio = Portfolio::from(&cell);
        assert!(portfolio.total_interest().unwrap_err().is_computation());
        assert!(portfolio.total_remboursement().unwrap_err().is_computation());
        assert!(portfolio.summary().is_err());
    }

    #[test]
    fn test_remboursement_overflow_is_a_computation_error() {
        let huge = Money::from_str_exact("50000000000000000000000000000").unwrap();
        let cell = RefCell::new(
            Facility::new("2025-06-26", "2035-06-26", huge, "USD", vec![Lender::new("BNP").unwrap()], Rate::ZERO)
                .unwrap(),
        );
        cell.borrow_mut().pay_part(Money::from_major(1), "2025-06-26").unwrap();

        let portfolio = Portfolio::from(&cell);
        assert!(portfolio.total_interest().is_ok());
        assert!(portfolio.total_remboursement().unwrap_err().is_computation());
    }
}
