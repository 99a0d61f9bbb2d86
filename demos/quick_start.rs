/// quick start - one deal, one facility, a few repayments
use std::cell::RefCell;

use rust_decimal_macros::dec;
use structured_financing_rs::{Borrower, Deal, Facility, Lender, Money, Portfolio, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let pool = vec![Lender::new("BNP")?, Lender::new("SG")?];

    // a 10M EUR project for Orange, agented by BNP
    let mut deal = Deal::builder()
        .contract_num("S1234")
        .agent("BNP")
        .pool(pool.clone())
        .borrower(Borrower::new("Orange")?)
        .project_amount(Money::from_major(10_000_000))
        .currency("EUR")
        .sign_date("2025-01-01")
        .end_date("2030-01-01")
        .build()?;

    let facility = Facility::builder()
        .start_date("2025-01-01")
        .end_date("2030-01-01")
        .amount(Money::from_major(4_000_000))
        .currency("EUR")
        .lenders(pool)
        .rate(Rate::from_decimal(dec!(0.05)))
        .build()?;
    deal.add_facility(facility.clone())?;

    // the portfolio follows payments made after it was opened
    let facility = RefCell::new(facility);
    let portfolio = Portfolio::new(Some(&facility))?;

    facility.borrow_mut().pay_part(Money::from_major(1_000_000), "2026-01-01")?;
    facility.borrow_mut().pay_part(Money::from_major(500_000), "2027-06-30")?;

    println!("{}", deal.details());
    println!("{}", portfolio.summary()?.to_json_pretty()?);

    Ok(())
}
