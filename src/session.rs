//! Interactive console session over an explicit application state.
//!
//! Input is read as whitespace-separated tokens, so one line may answer
//! several prompts and names cannot contain spaces.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::deal::Deal;
use crate::decimal::{Money, Rate};
use crate::errors::{AppError, ValidationError};
use crate::facility::Facility;
use crate::parties::{Borrower, Lender};
use crate::portfolio::Portfolio;
use crate::serialization::SessionReport;
use crate::types::DealStatus;

const MENU: &str = "\
---------------------------------------
Structured Financing Application
---------------------------------------
1. Create a new deal
2. Create a new borrower
3. Create a new lender
4. Add a lender to the pool
5. Create a new facility
6. Pay a part of a facility
7. Calculate interest
8. Manage portfolio
9. Terminate a deal
10. Display details of a deal
11. Display list of borrowers and lenders
12. Display the facilities
13. Display the parts
0. Exit
---------------------------------------
Enter your choice: ";

/// registries the session works on
#[derive(Debug, Default)]
pub struct AppState {
    pub lenders: Vec<Lender>,
    pub borrowers: Vec<Borrower>,
    /// lenders handed to every deal created from the menu
    pub pool: Vec<Lender>,
    pub facilities: Vec<RefCell<Facility>>,
    pub deals: Vec<Deal>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// build the registries from seed data
    ///
    /// the seed facility has its payments recorded before a copy of it is
    /// attached to the seed deal.
    pub fn from_config(config: &SessionConfig) -> Result<Self, AppError> {
        let mut state = Self::new();

        for name in &config.borrowers {
            state.borrowers.push(Borrower::new(name.as_str())?);
        }
        for name in &config.lenders {
            state.lenders.push(Lender::new(name.as_str())?);
        }
        state.pool = state.resolve_lenders(&config.pool)?;

        if let Some(seed) = &config.deal {
            let pool = state.resolve_lenders(&seed.pool)?;
            let borrower = state
                .find_borrower(&seed.borrower)
                .cloned()
                .ok_or_else(|| AppError::UnknownSeedParty {
                    kind: "borrower",
                    name: seed.borrower.clone(),
                })?;

            let deal = Deal::new(
                &seed.contract_num,
                &seed.agent,
                pool,
                borrower,
                seed.project_amount,
                &seed.currency,
                &seed.sign_date,
                &seed.end_date,
                DealStatus::Closed,
            )?;
            state.deals.push(deal);
        }

        if let Some(seed) = &config.facility {
            let lenders = state.resolve_lenders(&seed.lenders)?;
            let mut facility = Facility::new(
                &seed.start_date,
                &seed.end_date,
                seed.amount,
                &seed.currency,
                lenders,
                seed.rate,
            )?;
            for payment in &seed.payments {
                facility.pay_part(payment.amount, &payment.date)?;
            }

            if let Some(deal) = state.deals.last_mut() {
                deal.add_facility(facility.clone())?;
            }
            state.facilities.push(RefCell::new(facility));
        }

        info!(
            lenders = state.lenders.len(),
            borrowers = state.borrowers.len(),
            deals = state.deals.len(),
            facilities = state.facilities.len(),
            "session state seeded"
        );
        Ok(state)
    }

    pub fn find_lender(&self, name: &str) -> Option<&Lender> {
        self.lenders.iter().find(|l| l.name() == name)
    }

    pub fn find_borrower(&self, name: &str) -> Option<&Borrower> {
        self.borrowers.iter().find(|b| b.name() == name)
    }

    /// first deal with this contract number
    pub fn find_deal(&self, contract_num: &str) -> Option<&Deal> {
        self.deals.iter().find(|d| d.contract_num() == contract_num)
    }

    pub fn find_deal_mut(&mut self, contract_num: &str) -> Option<&mut Deal> {
        self.deals.iter_mut().find(|d| d.contract_num() == contract_num)
    }

    pub fn report(&self) -> crate::errors::Result<SessionReport> {
        SessionReport::build(&self.deals, &self.facilities)
    }

    fn resolve_lenders(&self, names: &[String]) -> Result<Vec<Lender>, AppError> {
        names
            .iter()
            .map(|name| {
                self.find_lender(name).cloned().ok_or_else(|| AppError::UnknownSeedParty {
                    kind: "lender",
                    name: name.clone(),
                })
            })
            .collect()
    }
}

enum Flow {
    Continue,
    Exit,
}

/// menu loop reading from `input` and writing to `output`
pub struct Session<R, W> {
    state: AppState,
    input: R,
    output: W,
    tokens: VecDeque<String>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(state: AppState, input: R, output: W) -> Self {
        Self {
            state,
            input,
            output,
            tokens: VecDeque::new(),
        }
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    /// run until `0` is chosen or input runs out
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "\n{}", MENU)?;
            self.output.flush()?;

            let Some(token) = self.next_token()? else {
                debug!("input exhausted");
                return Ok(());
            };

            let flow = match token.parse::<u32>() {
                Ok(choice) => {
                    debug!(choice, "menu choice");
                    self.dispatch(choice)?
                }
                Err(_) => {
                    self.invalid_choice()?;
                    Flow::Continue
                }
            };

            if let Flow::Exit = flow {
                return Ok(());
            }
        }
    }

    fn dispatch(&mut self, choice: u32) -> io::Result<Flow> {
        match choice {
            0 => {
                writeln!(self.output, "Goodbye!")?;
                Ok(Flow::Exit)
            }
            1 => self.create_deal(),
            2 => self.create_borrower(),
            3 => self.create_lender(),
            4 => self.add_lender_to_pool(),
            5 => self.create_facility(),
            6 => self.pay(),
            7 => self.first_part_interest(),
            8 => self.portfolio(),
            9 => self.terminate_deal(),
            10 => self.deal_details(),
            11 => self.list_parties(),
            12 => self.display_facilities(),
            13 => self.display_parts(),
            _ => {
                self.invalid_choice()?;
                Ok(Flow::Continue)
            }
        }
    }

    fn invalid_choice(&mut self) -> io::Result<()> {
        writeln!(self.output, "Invalid choice. Please enter a number between 0 and 13.")
    }

    fn next_token(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(token) = self.tokens.pop_front() {
                return Ok(Some(token));
            }

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.tokens.extend(line.split_whitespace().map(str::to_string));
        }
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        self.next_token()
    }

    /// prompt for an amount; `Ok(None)` on end of input or an unparsable value
    fn prompt_money(&mut self, text: &str) -> io::Result<Option<Option<Money>>> {
        let Some(token) = self.prompt(text)? else {
            return Ok(None);
        };
        match Money::from_str_exact(&token) {
            Ok(amount) => Ok(Some(Some(amount))),
            Err(_) => {
                writeln!(self.output, "Invalid amount: {}", token)?;
                Ok(Some(None))
            }
        }
    }

    fn create_deal(&mut self) -> io::Result<Flow> {
        let Some(contract_num) =
            self.prompt("\nEnter contract number (Format: Letter + 4 digits, e.g., S1234): ")?
        else {
            return Ok(Flow::Exit);
        };
        let Some(agent) = self.prompt("\nEnter agent: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(amount) = self.prompt_money("\nEnter project amount: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(currency) = self.prompt("\nEnter currency (3 letters, e.g., EUR): ")? else {
            return Ok(Flow::Exit);
        };
        let Some(sign_date) = self.prompt("\nEnter contract sign date (YYYY-MM-DD): ")? else {
            return Ok(Flow::Exit);
        };
        let Some(end_date) = self.prompt("\nEnter contract end date (YYYY-MM-DD): ")? else {
            return Ok(Flow::Exit);
        };
        writeln!(self.output)?;

        let Some(amount) = amount else {
            return Ok(Flow::Continue);
        };
        let Some(borrower) = self.state.borrowers.first().cloned() else {
            writeln!(self.output, "No borrowers available. Create a borrower first.")?;
            return Ok(Flow::Continue);
        };

        match Deal::new(
            &contract_num,
            &agent,
            self.state.pool.clone(),
            borrower,
            amount,
            &currency,
            &sign_date,
            &end_date,
            DealStatus::Closed,
        ) {
            Ok(deal) => {
                self.state.deals.push(deal);
                writeln!(self.output, "Deal created successfully!")?;
            }
            Err(e) => writeln!(self.output, "Failed to create deal: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn create_borrower(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompt("Enter borrower's name: ")? else {
            return Ok(Flow::Exit);
        };

        let borrower = match Borrower::new(name) {
            Ok(borrower) => borrower,
            Err(e) => {
                writeln!(self.output, "Failed to create borrower: {}", e)?;
                Borrower::default()
            }
        };
        writeln!(self.output, "Borrower {} created.", borrower.name())?;
        self.state.borrowers.push(borrower);
        Ok(Flow::Continue)
    }

    fn create_lender(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompt("Enter lender's name: ")? else {
            return Ok(Flow::Exit);
        };

        match Lender::new(name) {
            Ok(lender) => {
                writeln!(self.output, "Lender {} created.", lender.name())?;
                self.state.lenders.push(lender);
            }
            Err(e) => writeln!(self.output, "Failed to create lender: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn add_lender_to_pool(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompt("Enter the lender's name: ")? else {
            return Ok(Flow::Exit);
        };

        match self.state.find_lender(&name).cloned() {
            Some(lender) => {
                self.state.pool.push(lender);
                writeln!(self.output, "Lender {} added to the pool.", name)?;
            }
            None => writeln!(self.output, "Error: Lender {} does not exist.", name)?,
        }
        Ok(Flow::Continue)
    }

    /// new facility over the first deal's date range, attached to that deal
    fn create_facility(&mut self) -> io::Result<Flow> {
        if self.state.deals.is_empty() {
            writeln!(self.output, "No deals available. Create a deal first.")?;
            return Ok(Flow::Continue);
        }

        let Some(amount) = self.prompt_money("Enter the amount: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(currency) = self.prompt("Enter the currency: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(rate) = self.prompt("Enter the annual interest rate (e.g., 0.05 for 5%): ")? else {
            return Ok(Flow::Exit);
        };
        let Some(count) = self.prompt("How many lenders would you like to add to this facility? ")?
        else {
            return Ok(Flow::Exit);
        };

        let count = match count.parse::<usize>() {
            Ok(count) => count,
            Err(_) => {
                writeln!(self.output, "Invalid lender count: {}", count)?;
                return Ok(Flow::Continue);
            }
        };

        // the count is user input: no preallocation from it
        let mut selected = Vec::new();
        for i in 0..count {
            let Some(name) = self.prompt(&format!("Enter the name of lender {}: ", i + 1))? else {
                return Ok(Flow::Exit);
            };
            match self.state.find_lender(&name) {
                Some(lender) => selected.push(lender.clone()),
                None => writeln!(self.output, "Lender {} not found.", name)?,
            }
        }

        let Some(amount) = amount else {
            return Ok(Flow::Continue);
        };
        let rate = match rate.parse::<Rate>() {
            Ok(rate) => rate,
            Err(_) => {
                writeln!(self.output, "Invalid interest rate: {}", rate)?;
                return Ok(Flow::Continue);
            }
        };

        let deal = &mut self.state.deals[0];
        let created = Facility::new(
            &deal.contract_sign_date_string(),
            &deal.contract_end_date_string(),
            amount,
            &currency,
            selected,
            rate,
        )
        .and_then(|facility| deal.add_facility(facility.clone()).map(|()| facility));

        match created {
            Ok(facility) => {
                self.state.facilities.push(RefCell::new(facility));
                writeln!(self.output, "Facility created successfully!")?;
            }
            Err(e) => writeln!(self.output, "Failed to create facility: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn pay(&mut self) -> io::Result<Flow> {
        let count = self.state.facilities.len();
        if count == 0 {
            writeln!(self.output, "No facilities available for payment.")?;
            return Ok(Flow::Continue);
        }

        let Some(number) = self.prompt(&format!("Enter the facility number (1-{}): ", count))? else {
            return Ok(Flow::Exit);
        };
        let Some(amount) = self.prompt_money("Enter the amount to pay: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(date) = self.prompt("Enter the date of payment (YYYY-MM-DD): ")? else {
            return Ok(Flow::Exit);
        };

        let index = match number.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => n - 1,
            _ => {
                writeln!(self.output, "No facility number {}.", number)?;
                return Ok(Flow::Continue);
            }
        };
        let Some(amount) = amount else {
            return Ok(Flow::Continue);
        };

        let mut facility = self.state.facilities[index].borrow_mut();
        match facility.pay_part(amount, &date) {
            Ok(()) => {
                writeln!(self.output, "Payment successful!")?;
                writeln!(self.output, "Remaining amount: {}", facility.remaining_amount())?;
            }
            Err(ValidationError::ExceedsRemainingAmount { .. }) => {
                writeln!(self.output, "Payment amount exceeds remaining facility amount.")?;
            }
            Err(e) => writeln!(self.output, "Payment failed: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn first_part_interest(&mut self) -> io::Result<Flow> {
        let Some(cell) = self.state.facilities.first() else {
            writeln!(self.output, "No parts available for interest calculation.")?;
            return Ok(Flow::Continue);
        };
        let facility = cell.borrow();
        let Some(part) = facility.parts().first() else {
            writeln!(self.output, "No parts available for interest calculation.")?;
            return Ok(Flow::Continue);
        };

        writeln!(self.output, "Calculate the interest of first part")?;
        match facility.calculate_interest(part) {
            Ok(interest) => writeln!(self.output, "The interest is: {}", interest.round_dp(2))?,
            Err(e) => writeln!(self.output, "Interest calculation failed: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    /// aggregates over the first facility, read at the time of the query
    fn portfolio(&mut self) -> io::Result<Flow> {
        let portfolio = match Portfolio::new(self.state.facilities.first()) {
            Ok(portfolio) => portfolio,
            Err(e) => {
                writeln!(self.output, "Portfolio unavailable: {}", e)?;
                return Ok(Flow::Continue);
            }
        };

        match portfolio.summary() {
            Ok(summary) => writeln!(self.output, "{}", summary)?,
            Err(e) => writeln!(self.output, "Portfolio calculation failed: {}", e)?,
        }
        Ok(Flow::Continue)
    }

    fn terminate_deal(&mut self) -> io::Result<Flow> {
        if self.state.deals.is_empty() {
            writeln!(self.output, "No deals to terminate.")?;
            return Ok(Flow::Continue);
        }
        let Some(contract_num) = self.prompt("Enter the contract number of the deal to terminate: ")?
        else {
            return Ok(Flow::Exit);
        };

        match self.state.find_deal_mut(&contract_num) {
            Some(deal) => match deal.terminate() {
                Ok(()) => writeln!(self.output, "Deal terminated successfully.")?,
                Err(e) => writeln!(self.output, "Failed to terminate deal: {}", e)?,
            },
            None => writeln!(self.output, "No deal found with contract number {}.", contract_num)?,
        }
        Ok(Flow::Continue)
    }

    fn deal_details(&mut self) -> io::Result<Flow> {
        if self.state.deals.is_empty() {
            writeln!(self.output, "No deals to display.")?;
            return Ok(Flow::Continue);
        }
        let Some(contract_num) = self.prompt("Enter the contract number: ")? else {
            return Ok(Flow::Exit);
        };

        match self.state.find_deal(&contract_num) {
            Some(deal) => writeln!(self.output, "{}", deal.details())?,
            None => writeln!(self.output, "No deal found with contract number {}.", contract_num)?,
        }
        Ok(Flow::Continue)
    }

    fn list_parties(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "List of lenders:")?;
        for lender in &self.state.lenders {
            writeln!(self.output, "- {}", lender.name())?;
        }
        writeln!(self.output, "\nList of borrowers:")?;
        for borrower in &self.state.borrowers {
            writeln!(self.output, "- {}", borrower.name())?;
        }
        Ok(Flow::Continue)
    }

    fn display_facilities(&mut self) -> io::Result<Flow> {
        if self.state.facilities.is_empty() {
            writeln!(self.output, "No facilities to display.")?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output, "\n=== FACILITIES ===")?;
        for (i, cell) in self.state.facilities.iter().enumerate() {
            let facility = cell.borrow();
            writeln!(self.output, "Facility {}:", i + 1)?;
            writeln!(self.output, "  Amount: {} {}", facility.amount(), facility.currency())?;
            writeln!(self.output, "  Remaining: {}", facility.remaining_amount())?;
            writeln!(self.output, "  Interest Rate: {}", facility.annual_interest_rate())?;
            writeln!(self.output, "  Parts Count: {}", facility.parts_count())?;
            writeln!(self.output, "  Start Date: {}", facility.start_date_string())?;
            writeln!(self.output, "  End Date: {}", facility.end_date_string())?;
            writeln!(self.output, "-------------------")?;
        }
        Ok(Flow::Continue)
    }

    fn display_parts(&mut self) -> io::Result<Flow> {
        if self.state.facilities.is_empty() {
            writeln!(self.output, "No facilities available.")?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output, "\n=== PARTS ===")?;
        for (i, cell) in self.state.facilities.iter().enumerate() {
            let facility = cell.borrow();
            writeln!(self.output, "Facility {} Parts:", i + 1)?;
            if facility.parts().is_empty() {
                writeln!(self.output, "  No parts in this facility.")?;
            }
            for (j, part) in facility.parts().iter().enumerate() {
                writeln!(self.output, "  Part {}: {} on {}", j + 1, part.amount(), part.date_string())?;
            }
            writeln!(self.output, "-------------------")?;
        }
        Ok(Flow::Continue)
    }
}
