use std::cell::RefCell;
use std::io::Cursor;

use rust_decimal_macros::dec;
use structured_financing_rs::{
    AppState, Borrower, Deal, DealStatus, Facility, Lender, Money, Part, Portfolio, Rate, Session,
    SessionConfig, ValidationError,
};

fn banks() -> Vec<Lender> {
    vec![Lender::new("BNP").unwrap(), Lender::new("SG").unwrap()]
}

fn facility(amount: i64) -> Facility {
    Facility::new(
        "2024-01-01",
        "2025-01-01",
        Money::from_major(amount),
        "EUR",
        banks(),
        Rate::from_decimal(dec!(0.03)),
    )
    .unwrap()
}

fn deal(contract_num: &str) -> Result<Deal, ValidationError> {
    Deal::new(
        contract_num,
        "BNP Paribas",
        banks(),
        Borrower::new("Air France").unwrap(),
        Money::from_major(10_000_000),
        "EUR",
        "2024-01-01",
        "2025-01-01",
        DealStatus::Closed,
    )
}

#[test]
fn facility_remaining_after_one_part() {
    let mut facility = facility(1_000_000);
    assert_eq!(facility.remaining_amount(), Money::from_major(1_000_000));

    facility
        .add_part(Part::new(Money::from_major(100_000), "2024-06-01").unwrap())
        .unwrap();
    assert_eq!(facility.remaining_amount(), Money::from_major(900_000));
}

#[test]
fn deal_ceiling_rejects_second_facility() {
    let mut deal = deal("S1234").unwrap();

    deal.add_facility(facility(5_000_000)).unwrap();
    assert_eq!(deal.total_facilities_amount(), Money::from_major(5_000_000));

    let err = deal.add_facility(facility(6_000_000)).unwrap_err();
    assert!(matches!(err, ValidationError::ExceedsProjectAmount { .. }));
    assert_eq!(deal.facilities_count(), 1);
    assert_eq!(deal.total_facilities_amount(), Money::from_major(5_000_000));
}

#[test]
fn bad_contract_numbers_rejected() {
    for contract_num in ["X1234", "S123", "S12A4", "S12345", "", "1S234"] {
        assert!(deal(contract_num).is_err(), "{} should be rejected", contract_num);
    }
    for contract_num in ["S1234", "Z0000", "B9999", "s1234", "z4321", "b0001"] {
        assert!(deal(contract_num).is_ok(), "{} should be accepted", contract_num);
    }
}

#[test]
fn portfolio_over_three_payments() {
    assert_eq!(Portfolio::new(None).unwrap_err(), ValidationError::MissingFacility);

    let cell = RefCell::new(
        Facility::new(
            "2025-06-26",
            "2035-06-26",
            Money::from_major(30_000_000),
            "USD",
            banks(),
            Rate::from_decimal(dec!(0.05)),
        )
        .unwrap(),
    );
    let portfolio = Portfolio::new(Some(&cell)).unwrap();

    cell.borrow_mut().pay_part(Money::from_major(5_000_000), "2027-06-25").unwrap();
    cell.borrow_mut().pay_part(Money::from_major(5_000_000), "2030-06-25").unwrap();
    cell.borrow_mut().pay_part(Money::from_major(5_000_000), "2032-06-25").unwrap();

    assert_eq!(portfolio.number_of_parts(), 3);
    assert_eq!(portfolio.remaining_amount(), Money::from_major(15_000_000));

    let total_interest = portfolio.total_interest().unwrap();
    assert!(total_interest.is_positive());
    assert_eq!(
        portfolio.total_remboursement().unwrap(),
        portfolio.total_amount() + total_interest
    );
}

#[test]
fn currency_rules() {
    let with_currency = |currency: &str| {
        Deal::new(
            "S1234",
            "BNP Paribas",
            banks(),
            Borrower::default(),
            Money::from_major(1_000),
            currency,
            "2024-01-01",
            "2025-01-01",
            DealStatus::Closed,
        )
    };

    assert!(with_currency("EUR").is_ok());
    assert!(with_currency("USD").is_ok());
    for currency in ["eur", "EURO", "EU", "", "E1R", "Eur"] {
        assert!(with_currency(currency).is_err(), "{} should be rejected", currency);
    }
}

#[test]
fn date_range_boundaries() {
    let with_end = |end: &str| {
        Facility::new(
            "2024-01-01",
            end,
            Money::from_major(1_000),
            "EUR",
            banks(),
            Rate::ZERO,
        )
    };

    assert!(with_end("2024-01-02").is_ok());
    assert!(matches!(
        with_end("2024-01-01"),
        Err(ValidationError::InvertedDateRange { .. })
    ));
    assert!(matches!(
        with_end("2023-12-31"),
        Err(ValidationError::InvertedDateRange { .. })
    ));
}

#[test]
fn remaining_amount_tracks_every_accepted_part() {
    let mut facility = facility(1_000_000);
    let attempts = [300_000, 800_000, 200_000, 500_000, 500_000, 1];
    let mut paid = Money::ZERO;

    for amount in attempts {
        let before = facility.clone();
        match facility.pay_part(Money::from_major(amount), "2024-06-01") {
            Ok(()) => paid += Money::from_major(amount),
            Err(ValidationError::ExceedsRemainingAmount { .. }) => assert_eq!(facility, before),
            Err(e) => panic!("unexpected error: {}", e),
        }
        assert_eq!(facility.remaining_amount(), facility.amount() - paid);
        assert!(!facility.remaining_amount().is_negative());
    }

    // 300k + 200k + 500k fill the facility exactly
    assert_eq!(facility.parts_count(), 3);
    assert_eq!(facility.remaining_amount(), Money::ZERO);
}

#[test]
fn part_before_start_fails_only_at_interest_time() {
    let cell = RefCell::new(facility(1_000_000));
    cell.borrow_mut().pay_part(Money::from_major(1_000), "2023-06-01").unwrap();

    let facility = cell.borrow();
    let err = facility.calculate_interest(&facility.parts()[0]).unwrap_err();
    assert!(err.is_computation());
    assert!(err.to_string().starts_with("error calculating interest"));
}

#[test]
fn console_session_end_to_end() {
    let state = AppState::from_config(&SessionConfig::empty()).unwrap();
    let input = "\
2 Orange
3 HSBC
4 HSBC
1 B0042 HSBC 8000000 EUR 2024-01-01 2030-01-01
5 4000000 EUR 0.04 1 HSBC
6 1 1000000 2026-01-01
8
10 B0042
0
";
    let mut output = Vec::new();
    let mut session = Session::new(state, Cursor::new(input), &mut output);
    session.run().unwrap();
    let state = session.into_state();
    let out = String::from_utf8(output).unwrap();

    assert!(out.contains("Deal created successfully!"));
    assert!(out.contains("Facility created successfully!"));
    assert!(out.contains("Payment successful!\nRemaining amount: 3000000"));
    assert!(out.contains("The total amount is: 4000000"));
    assert!(out.contains("Contract Number: B0042"));
    assert!(out.contains("Total Facilities Amount: 4000000 EUR"));
    assert!(out.ends_with("Goodbye!\n"));

    let deal = state.find_deal("B0042").unwrap();
    assert_eq!(deal.borrower().name(), "Orange");
    assert_eq!(deal.facilities()[0].parts_count(), 0);
    assert_eq!(state.facilities[0].borrow().parts_count(), 1);
}

#[test]
fn default_seed_report() {
    let state = AppState::from_config(&SessionConfig::default()).unwrap();
    let report = state.report().unwrap();

    assert_eq!(report.deals.len(), 1);
    assert_eq!(report.deals[0].contract_num, "S1234");
    assert_eq!(report.portfolios.len(), 1);
    assert_eq!(report.portfolios[0].remaining_amount, Money::from_major(1_000_000));
    assert_eq!(report.portfolios[0].number_of_parts, 3);
}
